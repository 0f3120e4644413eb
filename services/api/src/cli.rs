use crate::commands::{
    run_experience, run_schema_merge, run_schema_template, run_schema_validate, ExperienceArgs,
    SchemaMergeArgs, SchemaTemplateArgs, SchemaValidateArgs,
};
use crate::server;
use agency_intake::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Agency Intake",
    about = "Serve the agency intake API or work with form schemas from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Validate, merge, or print form schemas
    Schema {
        #[command(subcommand)]
        command: SchemaCommand,
    },
    /// Compute total work experience for a form submission
    Experience(ExperienceArgs),
}

#[derive(Subcommand, Debug)]
enum SchemaCommand {
    /// Check a schema document's structure
    Validate(SchemaValidateArgs),
    /// Print the effective schema for an agency default and a job schema
    Merge(SchemaMergeArgs),
    /// Print the built-in agency default schema
    Template(SchemaTemplateArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Schema {
            command: SchemaCommand::Validate(args),
        } => run_schema_validate(args),
        Command::Schema {
            command: SchemaCommand::Merge(args),
        } => run_schema_merge(args),
        Command::Schema {
            command: SchemaCommand::Template(args),
        } => run_schema_template(args),
        Command::Experience(args) => run_experience(args),
    }
}
