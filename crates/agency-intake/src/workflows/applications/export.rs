use std::io::Write;

use serde::Serialize;

use super::repository::ApplicationRecord;
use crate::workflows::forms::ExperienceDuration;

const ROSTER_HEADERS: [&str; 7] = [
    "application_id",
    "full_name",
    "email",
    "phone",
    "status",
    "total_experience",
    "created_at",
];

/// One line of a job post's application roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterRow {
    pub application_id: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub status: &'static str,
    pub total_experience: String,
    pub created_at: String,
}

impl RosterRow {
    pub fn new(record: &ApplicationRecord, total_experience: ExperienceDuration) -> Self {
        Self {
            application_id: record.application_id.to_string(),
            full_name: record.full_name.clone(),
            email: record.email.clone(),
            phone: record.phone.clone(),
            status: record.status.label(),
            total_experience: total_experience.to_string(),
            created_at: record.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// Write rows as CSV under a header line, returning how many rows were written.
///
/// The header is written even when there are no rows.
pub fn write_roster<W, I>(writer: W, rows: I) -> Result<usize, csv::Error>
where
    W: Write,
    I: IntoIterator<Item = RosterRow>,
{
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(ROSTER_HEADERS)?;

    let mut written = 0;
    for row in rows {
        csv_writer.serialize(row)?;
        written += 1;
    }
    csv_writer.flush()?;
    Ok(written)
}
