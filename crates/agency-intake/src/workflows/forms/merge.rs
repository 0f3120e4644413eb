use std::collections::HashMap;

use tracing::debug;

use super::field::{FieldDescriptor, FormSchema};

/// Compose an agency default schema with a job post schema into the effective schema.
///
/// Default fields keep their order. A job field sharing a name with an earlier field replaces
/// that descriptor wholesale at the same position; job-only fields are appended in job order.
/// The job's `as_on_date` wins when present.
pub fn merge_schemas(default_schema: &FormSchema, job_schema: &FormSchema) -> FormSchema {
    let mut fields: Vec<FieldDescriptor> = Vec::with_capacity(
        default_schema.fields.len() + job_schema.fields.len(),
    );
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for field in &default_schema.fields {
        match positions.get(field.name.as_str()) {
            Some(&position) => fields[position] = field.clone(),
            None => {
                positions.insert(field.name.as_str(), fields.len());
                fields.push(field.clone());
            }
        }
    }

    let mut overridden = 0usize;
    let mut appended = 0usize;
    for field in &job_schema.fields {
        match positions.get(field.name.as_str()) {
            Some(&position) => {
                fields[position] = field.clone();
                overridden += 1;
            }
            None => {
                positions.insert(field.name.as_str(), fields.len());
                fields.push(field.clone());
                appended += 1;
            }
        }
    }

    debug!(
        default_fields = default_schema.fields.len(),
        overridden, appended, "merged form schemas"
    );

    FormSchema {
        fields,
        as_on_date: job_schema
            .as_on_date
            .clone()
            .or_else(|| default_schema.as_on_date.clone()),
    }
}
