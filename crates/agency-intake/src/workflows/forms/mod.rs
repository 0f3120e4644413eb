//! Dynamic form schema engine: descriptor model, structural validation, default/job merge,
//! exact-match submission checks, and derived values (experience, age) computed from form data.

pub mod age;
pub mod experience;
pub mod field;
pub mod merge;
pub mod submission;
pub mod templates;
pub mod validator;

#[cfg(test)]
mod tests;

pub use age::{age_as_on, applicant_ages, AgeBreakdown, ApplicantAge};
pub use experience::{
    compute_total_experience, total_experience_as_of, ExperienceDuration, WORK_EXPERIENCE_FIELD,
};
pub use field::{
    parse_form_date, FieldDescriptor, FieldType, FormSchema, SubfieldDescriptor, SubfieldMap,
};
pub use merge::merge_schemas;
pub use submission::{validate_form_data, FormData, FormValue, SchemaMismatch, SubEntry};
pub use templates::agency_default_schema;
pub use validator::{validate_form_schema, SchemaStructureError};
