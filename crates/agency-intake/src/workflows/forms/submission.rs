use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::field::{parse_form_date, FormSchema};

/// One row of an array-typed field, keyed by subfield name.
pub type SubEntry = BTreeMap<String, FormValue>;

/// A submitted value. Dates and file references travel as text and are read through the
/// field's declared type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    Empty,
    Flag(bool),
    Number(serde_json::Number),
    Text(String),
    Entries(Vec<SubEntry>),
    List(Vec<FormValue>),
    Group(BTreeMap<String, FormValue>),
}

impl FormValue {
    pub fn text(value: impl Into<String>) -> Self {
        FormValue::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FormValue::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Text holding a `YYYY-MM-DD` date.
    pub fn as_date(&self) -> Option<NaiveDate> {
        self.as_text().and_then(parse_form_date)
    }

    pub fn as_entries(&self) -> Option<&[SubEntry]> {
        match self {
            FormValue::Entries(entries) => Some(entries),
            _ => None,
        }
    }

    /// Rows of an array value. Items that are not objects come through as `None` so callers
    /// can skip them one by one.
    pub fn entry_items(&self) -> impl Iterator<Item = Option<&SubEntry>> {
        let (rows, items): (&[SubEntry], &[FormValue]) = match self {
            FormValue::Entries(rows) => (rows.as_slice(), Default::default()),
            FormValue::List(items) => (Default::default(), items.as_slice()),
            _ => (Default::default(), Default::default()),
        };
        rows.iter().map(Some).chain(items.iter().map(|item| match item {
            FormValue::Group(row) => Some(row),
            _ => None,
        }))
    }

    /// Mutable object rows of an array value; other items are passed over.
    pub fn entries_mut(&mut self) -> impl Iterator<Item = &mut SubEntry> {
        let (rows, items): (&mut [SubEntry], &mut [FormValue]) = match self {
            FormValue::Entries(rows) => (rows.as_mut_slice(), Default::default()),
            FormValue::List(items) => (Default::default(), items.as_mut_slice()),
            _ => (Default::default(), Default::default()),
        };
        rows.iter_mut().chain(items.iter_mut().filter_map(|item| match item {
            FormValue::Group(row) => Some(row),
            _ => None,
        }))
    }

    pub fn is_blank(&self) -> bool {
        match self {
            FormValue::Empty => true,
            FormValue::Text(value) => value.trim().is_empty(),
            FormValue::Entries(entries) => entries.is_empty(),
            FormValue::List(items) => items.is_empty(),
            FormValue::Group(group) => group.is_empty(),
            FormValue::Flag(_) | FormValue::Number(_) => false,
        }
    }
}

/// Applicant-supplied form payload keyed by top-level field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormData(BTreeMap<String, FormValue>);

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: FormValue) -> Option<FormValue> {
        self.0.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<&FormValue> {
        self.0.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut FormValue> {
        self.0.get_mut(name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, FormValue)> for FormData {
    fn from_iter<T: IntoIterator<Item = (S, FormValue)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        )
    }
}

/// A submission whose field set differs from the job post's schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", mismatch_message(.missing, .extra))]
pub struct SchemaMismatch {
    pub missing: BTreeSet<String>,
    pub extra: BTreeSet<String>,
}

fn mismatch_message(missing: &BTreeSet<String>, extra: &BTreeSet<String>) -> String {
    let join = |names: &BTreeSet<String>| {
        names
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut parts = Vec::new();
    if !missing.is_empty() {
        parts.push(format!("Missing required fields: {}", join(missing)));
    }
    if !extra.is_empty() {
        parts.push(format!("Extra fields not allowed: {}", join(extra)));
    }
    parts.join("; ")
}

/// Require the submission's keys to equal the schema's top-level field names exactly.
///
/// Callers pass the job post's own schema, not the merged effective schema.
pub fn validate_form_data(schema: &FormSchema, data: &FormData) -> Result<(), SchemaMismatch> {
    let expected: BTreeSet<&str> = schema.field_names().collect();
    let submitted: BTreeSet<&str> = data.field_names().collect();

    let missing: BTreeSet<String> = expected
        .difference(&submitted)
        .map(|name| name.to_string())
        .collect();
    let extra: BTreeSet<String> = submitted
        .difference(&expected)
        .map(|name| name.to_string())
        .collect();

    if missing.is_empty() && extra.is_empty() {
        Ok(())
    } else {
        Err(SchemaMismatch { missing, extra })
    }
}
