use agency_intake::error::AppError;
use agency_intake::workflows::forms::templates::{education_qualifications, work_experience};
use agency_intake::workflows::forms::{
    agency_default_schema, merge_schemas, total_experience_as_of, validate_form_data,
    ExperienceDuration, FormData, FormSchema,
};
use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct SchemaValidateArgs {
    /// Path to a JSON form schema document
    pub(crate) path: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct SchemaMergeArgs {
    /// Agency default schema (JSON)
    pub(crate) default: PathBuf,
    /// Job post schema (JSON)
    pub(crate) job: PathBuf,
}

#[derive(Args, Debug, Default)]
pub(crate) struct SchemaTemplateArgs {
    /// Append the education qualification and work experience sections
    #[arg(long)]
    pub(crate) with_sections: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ExperienceArgs {
    /// Job post schema (JSON); its as_on_date is the default cutoff
    #[arg(long)]
    pub(crate) schema: PathBuf,
    /// Submitted form data (JSON)
    #[arg(long)]
    pub(crate) form_data: PathBuf,
    /// Override the cutoff date (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) as_on: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ExperienceReport {
    pub(crate) cutoff: Option<NaiveDate>,
    pub(crate) total_days: u64,
    pub(crate) total_experience: ExperienceDuration,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) schema_mismatch: Option<String>,
}

pub(crate) fn run_schema_validate(args: SchemaValidateArgs) -> Result<(), AppError> {
    println!("{}", validation_summary(&args.path)?);
    Ok(())
}

pub(crate) fn run_schema_merge(args: SchemaMergeArgs) -> Result<(), AppError> {
    let merged = merged_schema(&args.default, &args.job)?;
    println!("{}", serde_json::to_string_pretty(&merged)?);
    Ok(())
}

pub(crate) fn run_schema_template(args: SchemaTemplateArgs) -> Result<(), AppError> {
    let template = template_schema(args.with_sections)?;
    println!("{}", serde_json::to_string_pretty(&template)?);
    Ok(())
}

pub(crate) fn run_experience(args: ExperienceArgs) -> Result<(), AppError> {
    let report = experience_report(&args)?;
    if let Some(mismatch) = &report.schema_mismatch {
        eprintln!("warning: form data does not match the schema: {mismatch}");
    }
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn read_json(path: &Path) -> Result<Value, AppError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn load_schema(path: &Path) -> Result<FormSchema, AppError> {
    Ok(FormSchema::from_value(read_json(path)?)?)
}

pub(crate) fn validation_summary(path: &Path) -> Result<String, AppError> {
    let schema = load_schema(path)?;
    let cutoff = match (&schema.as_on_date, schema.cutoff_date()) {
        (Some(_), Some(date)) => format!(", cutoff {date}"),
        (Some(raw), None) => format!(", unparsable as_on_date '{raw}' ignored"),
        (None, _) => String::new(),
    };

    Ok(format!(
        "{}: valid form schema with {} field(s){}",
        path.display(),
        schema.fields.len(),
        cutoff
    ))
}

pub(crate) fn merged_schema(default: &Path, job: &Path) -> Result<Value, AppError> {
    let default = load_schema(default)?;
    let job = load_schema(job)?;
    Ok(merge_schemas(&default, &job).to_value()?)
}

pub(crate) fn template_schema(with_sections: bool) -> Result<Value, AppError> {
    let mut template = agency_default_schema();
    if with_sections {
        template.fields.push(education_qualifications());
        template.fields.push(work_experience());
    }
    Ok(template.to_value()?)
}

pub(crate) fn experience_report(args: &ExperienceArgs) -> Result<ExperienceReport, AppError> {
    let schema = load_schema(&args.schema)?;
    let form_data: FormData = serde_json::from_value(read_json(&args.form_data)?)?;

    let cutoff = args.as_on.or_else(|| schema.cutoff_date());
    let total_experience = total_experience_as_of(cutoff, &form_data);
    let schema_mismatch = validate_form_data(&schema, &form_data)
        .err()
        .map(|mismatch| mismatch.to_string());

    Ok(ExperienceReport {
        cutoff,
        total_days: total_experience.total_days,
        total_experience,
        schema_mismatch,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write_fixture(name: &str, contents: &Value) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "agency-intake-{}-{name}.json",
            std::process::id()
        ));
        fs::write(&path, contents.to_string()).expect("fixture written");
        path
    }

    fn job_schema() -> Value {
        json!({
            "fields": [
                { "name": "email", "label": "Work Email", "type": "text" },
                {
                    "name": "work_experience",
                    "label": "Work Experience",
                    "type": "array",
                    "subfields": {
                        "from_date": { "type": "date", "label": "From" },
                        "to_date": { "type": "date", "label": "To" }
                    }
                }
            ],
            "as_on_date": "2020-06-30"
        })
    }

    #[test]
    fn validation_summary_reports_field_count_and_cutoff() {
        let path = write_fixture("validate-ok", &job_schema());
        let summary = validation_summary(&path).expect("valid schema");
        assert!(summary.ends_with("valid form schema with 2 field(s), cutoff 2020-06-30"));
    }

    #[test]
    fn validation_rejects_file_field_without_accept() {
        let path = write_fixture(
            "validate-bad",
            &json!({ "fields": [{ "name": "cv", "label": "CV", "type": "file" }] }),
        );
        match validation_summary(&path) {
            Err(AppError::Schema(err)) => {
                assert_eq!(err.to_string(), "file field 'cv' must specify accepted file types")
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn invalid_json_is_reported_as_json_error() {
        let path = std::env::temp_dir().join(format!(
            "agency-intake-{}-broken.json",
            std::process::id()
        ));
        fs::write(&path, "{ not json").expect("fixture written");
        assert!(matches!(validation_summary(&path), Err(AppError::Json(_))));
    }

    #[test]
    fn merge_overrides_in_place_and_appends() {
        let default_path = write_fixture("merge-default", &template_schema(false).expect("template encodes"));
        let job_path = write_fixture("merge-job", &job_schema());

        let merged = merged_schema(&default_path, &job_path).expect("merged");
        let names: Vec<&str> = merged["fields"]
            .as_array()
            .expect("fields")
            .iter()
            .filter_map(|field| field["name"].as_str())
            .collect();
        assert_eq!(names, vec!["full_name", "email", "phone", "resume", "work_experience"]);
        assert_eq!(merged["fields"][1]["label"], json!("Work Email"));
        assert_eq!(merged["as_on_date"], json!("2020-06-30"));
    }

    #[test]
    fn template_with_sections_adds_repeating_groups() {
        let template = template_schema(true).expect("template encodes");
        let fields = template["fields"].as_array().expect("fields");
        assert_eq!(fields.len(), 6);
        assert_eq!(fields[4]["name"], json!("education_qualifications"));
        assert_eq!(fields[5]["subfields"]["from_date"]["type"], json!("date"));
    }

    #[test]
    fn experience_report_clamps_to_schema_cutoff_or_override() {
        let schema_path = write_fixture("experience-schema", &job_schema());
        let data_path = write_fixture(
            "experience-data",
            &json!({
                "email": "asha@example.com",
                "work_experience": [{ "from_date": "2020-01-01", "to_date": "2020-12-31" }]
            }),
        );

        let mut args = ExperienceArgs {
            schema: schema_path,
            form_data: data_path,
            as_on: None,
        };
        let report = experience_report(&args).expect("report");
        assert_eq!(report.total_experience.to_string(), "0 years 182 days");
        assert!(report.schema_mismatch.is_none());

        args.as_on = NaiveDate::from_ymd_opt(2021, 1, 1);
        let report = experience_report(&args).expect("report");
        assert_eq!(report.total_days, 366);
        assert_eq!(report.total_experience.to_string(), "1 years 1 days");
    }
}
