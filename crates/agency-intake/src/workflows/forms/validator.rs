use serde_json::Value;

use super::field::FormSchema;

const REQUIRED_FIELD_KEYS: [&str; 3] = ["name", "type", "label"];

/// Structural problems found in an administrator-supplied form schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaStructureError {
    #[error("form schema must be a JSON object")]
    NotAnObject,
    #[error("form schema must contain \"fields\" key")]
    MissingFields,
    #[error("form schema \"fields\" must be a list")]
    FieldsNotAList,
    #[error("field #{index} must be an object")]
    FieldNotAnObject { index: usize },
    #[error("each field must contain: name, type, label (field #{index} is missing \"{key}\")")]
    MissingFieldKey { index: usize, key: &'static str },
    #[error("file field '{field}' must specify accepted file types")]
    MissingAccept { field: String },
    #[error("file field '{field}' \"accept\" must be a list of file types")]
    AcceptNotAList { field: String },
    #[error("form schema could not be decoded: {0}")]
    Malformed(String),
}

/// Check a raw schema document against the field descriptor rules.
///
/// Stops at the first violation. Array `subfields` are not inspected here.
pub fn validate_form_schema(schema: &Value) -> Result<(), SchemaStructureError> {
    let document = schema.as_object().ok_or(SchemaStructureError::NotAnObject)?;
    let fields = document
        .get("fields")
        .ok_or(SchemaStructureError::MissingFields)?
        .as_array()
        .ok_or(SchemaStructureError::FieldsNotAList)?;

    for (index, field) in fields.iter().enumerate() {
        let field = field
            .as_object()
            .ok_or(SchemaStructureError::FieldNotAnObject { index })?;

        if let Some(key) = REQUIRED_FIELD_KEYS
            .iter()
            .find(|key| !field.contains_key(**key))
        {
            return Err(SchemaStructureError::MissingFieldKey { index, key: *key });
        }

        if field.get("type").and_then(Value::as_str) == Some("file") {
            let label = field_label(field.get("name"), index);
            match field.get("accept") {
                None => return Err(SchemaStructureError::MissingAccept { field: label }),
                Some(Value::Array(_)) => {}
                Some(_) => return Err(SchemaStructureError::AcceptNotAList { field: label }),
            }
        }
    }

    Ok(())
}

fn field_label(name: Option<&Value>, index: usize) -> String {
    match name {
        Some(Value::String(name)) => name.clone(),
        Some(other) => other.to_string(),
        None => format!("#{index}"),
    }
}

impl FormSchema {
    /// Validate a raw document, then decode it into the typed model.
    pub fn from_value(value: Value) -> Result<Self, SchemaStructureError> {
        validate_form_schema(&value)?;
        serde_json::from_value(value).map_err(|err| SchemaStructureError::Malformed(err.to_string()))
    }

    /// Encode back into the JSON wire format.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}
