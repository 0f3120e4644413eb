use std::fmt;

use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use tracing::trace;

use super::field::FormSchema;
use super::submission::{FormData, SubEntry};

pub const WORK_EXPERIENCE_FIELD: &str = "work_experience";
pub const FROM_DATE_KEY: &str = "from_date";
pub const TO_DATE_KEY: &str = "to_date";

const DAYS_PER_YEAR: u64 = 365;

/// Accumulated work experience in days, displayed as `"<years> years <days> days"`.
///
/// Years are flat 365-day blocks; leap days are not calendar-adjusted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExperienceDuration {
    pub total_days: u64,
}

impl ExperienceDuration {
    pub fn from_days(total_days: u64) -> Self {
        Self { total_days }
    }

    pub fn years(&self) -> u64 {
        self.total_days / DAYS_PER_YEAR
    }

    pub fn remainder_days(&self) -> u64 {
        self.total_days % DAYS_PER_YEAR
    }
}

impl fmt::Display for ExperienceDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} years {} days", self.years(), self.remainder_days())
    }
}

impl Serialize for ExperienceDuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Sum the inclusive day spans of the applicant's work experience entries.
///
/// The cutoff comes from the job post schema's `as_on_date`; an unparsable cutoff is ignored.
/// Entries with missing or malformed dates are skipped, never reported.
pub fn compute_total_experience(job_schema: &FormSchema, form_data: &FormData) -> ExperienceDuration {
    total_experience_as_of(job_schema.cutoff_date(), form_data)
}

/// Same as [`compute_total_experience`] with an explicit cutoff.
pub fn total_experience_as_of(cutoff: Option<NaiveDate>, form_data: &FormData) -> ExperienceDuration {
    let Some(value) = form_data.get(WORK_EXPERIENCE_FIELD) else {
        return ExperienceDuration::default();
    };

    let total_days: u64 = value
        .entry_items()
        .enumerate()
        .filter_map(|(index, entry)| {
            let days = entry.and_then(|entry| entry_days(entry, cutoff));
            if days.is_none() {
                trace!(index, "skipping work experience entry without a usable date range");
            }
            days
        })
        .sum();

    ExperienceDuration::from_days(total_days)
}

fn entry_days(entry: &SubEntry, cutoff: Option<NaiveDate>) -> Option<u64> {
    let from = entry.get(FROM_DATE_KEY)?.as_date()?;
    let mut to = entry.get(TO_DATE_KEY)?.as_date()?;

    if let Some(cutoff) = cutoff {
        if to > cutoff {
            to = cutoff;
        }
    }

    let days = (to - from).num_days() + 1;
    u64::try_from(days).ok().filter(|days| *days > 0)
}
