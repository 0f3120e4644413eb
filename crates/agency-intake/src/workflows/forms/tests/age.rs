use super::common::*;
use serde_json::json;

use crate::workflows::forms::submission::FormValue;
use crate::workflows::forms::{age_as_on, applicant_ages, FieldType, FormData, FormSchema};

#[test]
fn borrows_days_and_months() {
    let age = age_as_on(date(1990, 5, 20), date(2024, 3, 10)).expect("age");

    assert_eq!((age.years, age.months, age.days), (33, 9, 19));
    assert_eq!(age.to_string(), "33 years, 9 months, 19 days");
}

#[test]
fn singular_units_and_leading_zero_units() {
    let age = age_as_on(date(2022, 2, 1), date(2023, 3, 2)).expect("age");
    assert_eq!(age.to_string(), "1 year, 1 month, 1 day");

    let age = age_as_on(date(2024, 1, 15), date(2024, 3, 15)).expect("age");
    assert_eq!(age.to_string(), "2 months, 0 days");

    let age = age_as_on(date(2024, 3, 1), date(2024, 3, 2)).expect("age");
    assert_eq!(age.to_string(), "1 day");
}

#[test]
fn future_birth_dates_have_no_age() {
    assert!(age_as_on(date(2030, 1, 1), date(2024, 1, 1)).is_none());
}

#[test]
fn field_hint_then_cutoff_then_today() {
    let schema = FormSchema::from_value(json!({
        "fields": [
            { "name": "date_of_birth", "label": "DOB", "type": "date" },
            { "name": "spouse_dob", "label": "Spouse DOB", "type": "date", "age_as_on": "2020-01-01" },
            { "name": "birth_place", "label": "Birth place", "type": "text" }
        ],
        "as_on_date": "2024-01-01"
    }))
    .expect("schema decodes");

    let mut data = FormData::new();
    data.insert("date_of_birth", FormValue::text("2000-01-01"));
    data.insert("spouse_dob", FormValue::text("2000-01-01"));
    data.insert("birth_place", FormValue::text("Mysuru"));

    let ages = applicant_ages(&schema, &data, date(2025, 6, 1));
    assert_eq!(ages.len(), 2);
    assert_eq!(ages[0].field, "date_of_birth");
    assert_eq!(ages[0].as_on, date(2024, 1, 1));
    assert_eq!(ages[0].age.years, 24);
    assert_eq!(ages[1].as_on, date(2020, 1, 1));
    assert_eq!(ages[1].age.years, 20);

    let without_cutoff = FormSchema::new(vec![text_field("dob", FieldType::Date)]);
    let mut data = FormData::new();
    data.insert("dob", FormValue::text("2000-06-01"));
    let ages = applicant_ages(&without_cutoff, &data, date(2025, 6, 1));
    assert_eq!(ages[0].as_on, date(2025, 6, 1));
    assert_eq!(ages[0].age.to_string(), "25 years, 0 months, 0 days");
}
