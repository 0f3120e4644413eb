use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::workflows::forms::submission::{FormData, FormValue, SubEntry};
use crate::workflows::forms::{FieldDescriptor, FieldType, FormSchema};

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn job_schema_value() -> Value {
    json!({
        "fields": [
            { "name": "full_name", "label": "Full Name", "type": "text", "required": true },
            { "name": "email", "label": "Email", "type": "email", "required": true },
            {
                "name": "photo",
                "label": "Photograph",
                "type": "file",
                "required": true,
                "accept": ["image/jpeg", "image/png"]
            },
            {
                "name": "work_experience",
                "label": "Work Experience",
                "type": "array",
                "item_label": "Experience",
                "subfields": {
                    "designation": { "type": "text", "label": "Designation" },
                    "from_date": { "type": "date", "label": "From Date" },
                    "to_date": { "type": "date", "label": "To Date" }
                }
            }
        ],
        "as_on_date": "2024-03-31"
    })
}

pub(super) fn text_field(name: &str, field_type: FieldType) -> FieldDescriptor {
    FieldDescriptor::new(name, name.replace('_', " "), field_type)
}

pub(super) fn schema_with(names: &[&str]) -> FormSchema {
    FormSchema::new(
        names
            .iter()
            .map(|name| text_field(name, FieldType::Text))
            .collect(),
    )
}

pub(super) fn experience_entry(from: &str, to: &str) -> SubEntry {
    let mut entry = SubEntry::new();
    entry.insert("designation".to_string(), FormValue::text("Clerk"));
    entry.insert("from_date".to_string(), FormValue::text(from));
    entry.insert("to_date".to_string(), FormValue::text(to));
    entry
}

pub(super) fn form_with_experience(entries: Vec<SubEntry>) -> FormData {
    let mut data = FormData::new();
    data.insert("full_name", FormValue::text("Asha Rao"));
    data.insert("work_experience", FormValue::Entries(entries));
    data
}
