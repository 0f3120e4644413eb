use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use unicode_normalization::UnicodeNormalization;

use crate::workflows::forms::FormSchema;

/// URL-safe agency identifier derived from the agency name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgencyCode(pub String);

impl AgencyCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Prefix used for agency-scoped application ids.
    pub fn id_prefix(&self) -> String {
        self.0.to_uppercase()
    }
}

impl fmt::Display for AgencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobPostId(pub u64);

impl fmt::Display for JobPostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Organization publishing job posts; owns the default form schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agency {
    pub code: AgencyCode,
    pub name: String,
    pub description: String,
    /// Shown on the agency landing page.
    pub instructions: String,
    pub default_form_schema: FormSchema,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Agency creation payload. A missing or empty schema installs the built-in template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAgency {
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub default_form_schema: Option<Value>,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
}

/// A postable role under an agency; owns its own form schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPost {
    pub id: JobPostId,
    pub agency_code: AgencyCode,
    pub title: String,
    pub description: String,
    pub form_schema: FormSchema,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewJobPost {
    pub agency_code: AgencyCode,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub form_schema: Value,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
}

fn active_by_default() -> bool {
    true
}

/// Fold to ASCII via NFKD, lowercase, drop punctuation, and collapse whitespace/hyphen runs
/// into single hyphens.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;

    for ch in name
        .nfkd()
        .filter(char::is_ascii)
        .map(|ch| ch.to_ascii_lowercase())
    {
        if ch.is_ascii_whitespace() || ch == '-' {
            pending_separator = true;
        } else if ch.is_ascii_alphanumeric() || ch == '_' {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(ch);
        }
    }

    slug.trim_matches(|ch| ch == '-' || ch == '_').to_string()
}
