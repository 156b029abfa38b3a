use clap::{ArgGroup, Args, ValueEnum};
use std::path::PathBuf;

#[derive(Args)]
pub struct InitArgs {
    /// Directory to scaffold (default: current directory)
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Workflow name written into workflow.json (default: directory name)
    #[arg(long)]
    pub name: Option<String>,

    /// Optional description stored alongside the workflow
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Args)]
pub struct DeployArgs {
    /// Workflow document to upload (default: default_workflow_file from config.yml)
    #[arg(long, short = 'f', value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Replace the remote workflow with the same name instead of creating a copy
    #[arg(long)]
    pub update: bool,

    /// Activate the workflow after it is stored
    #[arg(long)]
    pub activate: bool,
}

#[derive(Args)]
pub struct CreateArgs {
    /// Workflow document to upload (default: default_workflow_file from config.yml)
    #[arg(long, short = 'f', value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Activate the workflow after it is created
    #[arg(long)]
    pub activate: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    #[default]
    Text,
    Json,
}

#[derive(Args)]
pub struct ListArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = ListFormat::Text)]
    pub format: ListFormat,
}

#[derive(Args)]
pub struct UpdateArgs {
    /// Id of the stored workflow to replace
    #[arg(long, value_name = "ID")]
    pub id: String,

    /// Workflow document to upload (default: default_workflow_file from config.yml)
    #[arg(long, short = 'f', value_name = "FILE")]
    pub file: Option<PathBuf>,
}

#[derive(Args)]
pub struct DeleteArgs {
    #[arg(long, value_name = "ID")]
    pub id: String,

    /// Delete without asking for confirmation
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct IdArgs {
    #[arg(long, value_name = "ID")]
    pub id: String,
}

#[derive(Args)]
#[command(group(ArgGroup::new("target").required(true).args(["id", "webhook"])))]
pub struct TestArgs {
    /// Run the server-side test of a stored workflow
    #[arg(long, value_name = "ID")]
    pub id: Option<String>,

    /// Send the configured test cases to this webhook path
    #[arg(long, value_name = "PATH")]
    pub webhook: Option<String>,
}

#[derive(Args)]
pub struct CleanupArgs {
    /// Name filter (default: default_workflow_pattern from config.yml)
    #[arg(long, short = 'p')]
    pub pattern: Option<String>,

    /// Interpret the pattern as a regular expression
    #[arg(long)]
    pub regex: bool,

    /// Only list the workflows that would be deleted
    #[arg(long)]
    pub dry_run: bool,

    /// Delete without asking for confirmation
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct ResolveArgs {
    /// Workflow document to resolve (default: default_workflow_file from config.yml)
    #[arg(long, short = 'f', value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Print the full submission payload instead of the connections only
    #[arg(long)]
    pub payload: bool,
}
