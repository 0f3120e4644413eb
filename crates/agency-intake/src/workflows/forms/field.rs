use std::fmt;

use chrono::NaiveDate;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` string. Surrounding whitespace makes the value unparsable.
pub fn parse_form_date(raw: &str) -> Option<NaiveDate> {
    if raw.trim().len() != raw.len() {
        return None;
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

// Administrator-authored descriptors are only checked for key presence, so the typed decode
// reads values leniently instead of refusing documents that pass validation.

fn text_from(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Value::deserialize(deserializer).map(text_from)
}

fn lenient_field_type<'de, D: Deserializer<'de>>(deserializer: D) -> Result<FieldType, D::Error> {
    lenient_text(deserializer).map(FieldType::from)
}

/// Anything but `true` reads as not required.
fn lenient_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Value::deserialize(deserializer).map(|value| value.as_bool().unwrap_or(false))
}

fn lenient_accept<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<String>>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(items.into_iter().map(text_from).collect()),
        Value::String(single) => Some(vec![single]),
        _ => None,
    })
}

/// Subfield descriptors that are not objects are dropped; a non-object map reads as absent.
fn lenient_subfields<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<SubfieldMap>, D::Error> {
    let Value::Object(entries) = Value::deserialize(deserializer)? else {
        return Ok(None);
    };
    Ok(Some(
        entries
            .into_iter()
            .filter_map(|(name, descriptor)| {
                serde_json::from_value::<SubfieldDescriptor>(descriptor)
                    .ok()
                    .map(|descriptor| (name, descriptor))
            })
            .collect(),
    ))
}

fn untyped() -> FieldType {
    FieldType::Other(String::new())
}

/// Non-string cutoffs are dropped, which disables the cutoff like any unparsable date.
fn lenient_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(raw) => Some(raw),
        _ => None,
    })
}

/// Input control kinds understood by the intake forms.
///
/// Unknown kinds are kept as [`FieldType::Other`] so administrator-authored schemas round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    Text,
    Email,
    File,
    Date,
    Textarea,
    Array,
    Number,
    Checkbox,
    Group,
    Signature,
    MonthYear,
    Other(String),
}

impl FieldType {
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Text => "text",
            FieldType::Email => "email",
            FieldType::File => "file",
            FieldType::Date => "date",
            FieldType::Textarea => "textarea",
            FieldType::Array => "array",
            FieldType::Number => "number",
            FieldType::Checkbox => "checkbox",
            FieldType::Group => "group",
            FieldType::Signature => "signature",
            FieldType::MonthYear => "month_year",
            FieldType::Other(kind) => kind,
        }
    }
}

impl From<String> for FieldType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "text" => FieldType::Text,
            "email" => FieldType::Email,
            "file" => FieldType::File,
            "date" => FieldType::Date,
            "textarea" => FieldType::Textarea,
            "array" => FieldType::Array,
            "number" => FieldType::Number,
            "checkbox" => FieldType::Checkbox,
            "group" => FieldType::Group,
            "signature" => FieldType::Signature,
            "month_year" => FieldType::MonthYear,
            _ => FieldType::Other(value),
        }
    }
}

impl From<FieldType> for String {
    fn from(value: FieldType) -> Self {
        match value {
            FieldType::Other(kind) => kind,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One top-level field of a form schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    #[serde(deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(deserialize_with = "lenient_text")]
    pub label: String,
    #[serde(rename = "type", deserialize_with = "lenient_field_type")]
    pub field_type: FieldType,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub required: bool,
    #[serde(
        default,
        deserialize_with = "lenient_accept",
        skip_serializing_if = "Option::is_none"
    )]
    pub accept: Option<Vec<String>>,
    #[serde(
        default,
        deserialize_with = "lenient_subfields",
        skip_serializing_if = "Option::is_none"
    )]
    pub subfields: Option<SubfieldMap>,
    /// Renderer hints (`min_items`, `item_label`, `format`, `age_as_on`, ...) kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            field_type,
            required: false,
            accept: None,
            subfields: None,
            extra: Map::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn accepting<I, S>(mut self, accept: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accept = Some(accept.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_subfields(mut self, subfields: SubfieldMap) -> Self {
        self.subfields = Some(subfields);
        self
    }

    /// Returns a string-valued renderer hint such as `age_as_on`.
    pub fn hint(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }

    /// Date-of-birth fields get an age display next to them.
    pub fn is_birth_date(&self) -> bool {
        if self.field_type != FieldType::Date {
            return false;
        }
        let name = self.name.to_ascii_lowercase();
        name.contains("birth") || name.contains("dob")
    }
}

/// Descriptor for a column of an array-typed field; the name is the key in [`SubfieldMap`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubfieldDescriptor {
    #[serde(default, deserialize_with = "lenient_text")]
    pub label: String,
    #[serde(rename = "type", default = "untyped", deserialize_with = "lenient_field_type")]
    pub field_type: FieldType,
    #[serde(
        default,
        deserialize_with = "lenient_flag",
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub required: bool,
    #[serde(
        default,
        deserialize_with = "lenient_accept",
        skip_serializing_if = "Option::is_none"
    )]
    pub accept: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SubfieldDescriptor {
    pub fn new(label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            label: label.into(),
            field_type,
            required: false,
            accept: None,
            extra: Map::new(),
        }
    }
}

/// Ordered `name -> descriptor` mapping; document order survives decode and encode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubfieldMap(Vec<(String, SubfieldDescriptor)>);

impl SubfieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a subfield. Replacement keeps the original position.
    pub fn insert(&mut self, name: impl Into<String>, descriptor: SubfieldDescriptor) {
        let name = name.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = descriptor,
            None => self.0.push((name, descriptor)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&SubfieldDescriptor> {
        self.0
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, descriptor)| descriptor)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SubfieldDescriptor)> {
        self.0
            .iter()
            .map(|(name, descriptor)| (name.as_str(), descriptor))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, SubfieldDescriptor)> for SubfieldMap {
    fn from_iter<T: IntoIterator<Item = (S, SubfieldDescriptor)>>(iter: T) -> Self {
        let mut map = SubfieldMap::new();
        for (name, descriptor) in iter {
            map.insert(name, descriptor);
        }
        map
    }
}

impl Serialize for SubfieldMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, descriptor) in &self.0 {
            map.serialize_entry(name, descriptor)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SubfieldMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SubfieldMapVisitor;

        impl<'de> Visitor<'de> for SubfieldMapVisitor {
            type Value = SubfieldMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of subfield names to descriptors")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<SubfieldMap, A::Error> {
                let mut map = SubfieldMap::new();
                while let Some((name, descriptor)) =
                    access.next_entry::<String, SubfieldDescriptor>()?
                {
                    map.insert(name, descriptor);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(SubfieldMapVisitor)
    }
}

/// A form schema: the ordered field list plus the optional experience/age cutoff.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormSchema {
    pub fields: Vec<FieldDescriptor>,
    /// Raw `YYYY-MM-DD` cutoff. Kept unparsed so a bad value only disables the cutoff.
    #[serde(
        default,
        deserialize_with = "lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub as_on_date: Option<String>,
}

impl FormSchema {
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        Self {
            fields,
            as_on_date: None,
        }
    }

    pub fn with_as_on_date(mut self, as_on_date: impl Into<String>) -> Self {
        self.as_on_date = Some(as_on_date.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }

    /// Parsed cutoff date, `None` when absent or unparsable.
    pub fn cutoff_date(&self) -> Option<NaiveDate> {
        self.as_on_date.as_deref().and_then(parse_form_date)
    }
}
