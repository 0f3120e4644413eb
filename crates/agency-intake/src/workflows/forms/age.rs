use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};

use super::field::{parse_form_date, FieldDescriptor, FormSchema};
use super::submission::FormData;

pub const AGE_AS_ON_HINT: &str = "age_as_on";

/// Calendar age broken into whole years, months and days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeBreakdown {
    pub years: u32,
    pub months: u32,
    pub days: u32,
}

/// Age on `as_on`, borrowing days from the month preceding `as_on` and months from the year.
///
/// Returns `None` when the birth date falls after the reference date.
pub fn age_as_on(birth: NaiveDate, as_on: NaiveDate) -> Option<AgeBreakdown> {
    if birth > as_on {
        return None;
    }

    let mut years = as_on.year() - birth.year();
    let mut months = as_on.month() as i32 - birth.month() as i32;
    let mut days = as_on.day() as i32 - birth.day() as i32;

    if days < 0 {
        months -= 1;
        days += days_in_previous_month(as_on) as i32;
    }
    if months < 0 {
        years -= 1;
        months += 12;
    }

    Some(AgeBreakdown {
        years: u32::try_from(years).ok()?,
        months: u32::try_from(months).ok()?,
        days: u32::try_from(days).ok()?,
    })
}

fn days_in_previous_month(date: NaiveDate) -> u32 {
    date.with_day(1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(30)
}

fn unit(count: u32, singular: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {singular}s")
    }
}

impl fmt::Display for AgeBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.years > 0 {
            write!(
                f,
                "{}, {}, {}",
                unit(self.years, "year"),
                unit(self.months, "month"),
                unit(self.days, "day")
            )
        } else if self.months > 0 {
            write!(f, "{}, {}", unit(self.months, "month"), unit(self.days, "day"))
        } else {
            f.write_str(&unit(self.days, "day"))
        }
    }
}

impl Serialize for AgeBreakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Age shown next to a date-of-birth field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicantAge {
    pub field: String,
    pub as_on: NaiveDate,
    pub age: AgeBreakdown,
}

/// Reference date for a birth-date field: its own hint, then the schema cutoff, then `today`.
pub fn age_reference_date(
    field: &FieldDescriptor,
    schema: &FormSchema,
    today: NaiveDate,
) -> NaiveDate {
    field
        .hint(AGE_AS_ON_HINT)
        .and_then(parse_form_date)
        .or_else(|| schema.cutoff_date())
        .unwrap_or(today)
}

/// Ages for every birth-date field the applicant filled in.
pub fn applicant_ages(schema: &FormSchema, form_data: &FormData, today: NaiveDate) -> Vec<ApplicantAge> {
    schema
        .fields
        .iter()
        .filter(|field| field.is_birth_date())
        .filter_map(|field| {
            let birth = form_data.get(&field.name)?.as_date()?;
            let as_on = age_reference_date(field, schema, today);
            let age = age_as_on(birth, as_on)?;
            Some(ApplicantAge {
                field: field.name.clone(),
                as_on,
                age,
            })
        })
        .collect()
}
