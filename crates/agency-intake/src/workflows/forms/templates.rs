//! Built-in schema fragments installed when administrators do not supply their own.

use super::experience::{FROM_DATE_KEY, TO_DATE_KEY, WORK_EXPERIENCE_FIELD};
use super::field::{FieldDescriptor, FieldType, FormSchema, SubfieldDescriptor, SubfieldMap};

pub const EDUCATION_QUALIFICATIONS_FIELD: &str = "education_qualifications";
pub const CERTIFICATE_KEY: &str = "certificate";

/// Schema given to a new agency that was created without one.
pub fn agency_default_schema() -> FormSchema {
    FormSchema::new(vec![
        FieldDescriptor::new("full_name", "Full Name", FieldType::Text).required(),
        FieldDescriptor::new("email", "Email", FieldType::Email).required(),
        FieldDescriptor::new("phone", "Phone Number", FieldType::Text).required(),
        FieldDescriptor::new("resume", "Resume", FieldType::File)
            .required()
            .accepting([".pdf", ".doc", ".docx"]),
    ])
}

pub fn education_qualifications() -> FieldDescriptor {
    let subfields: SubfieldMap = [
        ("class", SubfieldDescriptor::new("Class/Course", FieldType::Text)),
        ("course", SubfieldDescriptor::new("Course", FieldType::Text)),
        ("percentage", SubfieldDescriptor::new("Percentage", FieldType::Text)),
        (CERTIFICATE_KEY, SubfieldDescriptor::new("Certificate", FieldType::File)),
        ("year_of_passing", SubfieldDescriptor::new("Year of Passing", FieldType::Text)),
        ("board", SubfieldDescriptor::new("Board/University", FieldType::Text)),
    ]
    .into_iter()
    .collect();

    FieldDescriptor::new(
        EDUCATION_QUALIFICATIONS_FIELD,
        "Education Qualifications",
        FieldType::Array,
    )
    .with_subfields(subfields)
}

pub fn work_experience() -> FieldDescriptor {
    let subfields: SubfieldMap = [
        ("designation", SubfieldDescriptor::new("Designation", FieldType::Text)),
        ("institution", SubfieldDescriptor::new("Institution/Company", FieldType::Text)),
        (FROM_DATE_KEY, SubfieldDescriptor::new("From Date", FieldType::Date)),
        (TO_DATE_KEY, SubfieldDescriptor::new("To Date", FieldType::Date)),
        ("tasks_duties", SubfieldDescriptor::new("Tasks and Duties", FieldType::Textarea)),
        (CERTIFICATE_KEY, SubfieldDescriptor::new("Experience Certificate", FieldType::File)),
    ]
    .into_iter()
    .collect();

    FieldDescriptor::new(WORK_EXPERIENCE_FIELD, "Work Experience", FieldType::Array)
        .with_subfields(subfields)
}
