pub mod args;
pub mod commands;
pub mod context;
pub mod init;

pub use args::{
    CleanupArgs, CreateArgs, DeleteArgs, DeployArgs, IdArgs, InitArgs, ListArgs, ListFormat,
    ResolveArgs, TestArgs, UpdateArgs,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{name} {version}\n\
{about-with-newline}\n\
USAGE:\n    {usage}\n\
\nOPTIONS:\n{options}\n\
WORKFLOW COMMANDS:\n{subcommands}\n";

#[derive(Parser)]
#[command(name = "n8n-workflow")]
#[command(version = crate::VERSION)]
#[command(about = "Deploy and manage n8n workflows from the command line")]
#[command(help_template = HELP_TEMPLATE)]
#[command(
    after_long_help = "Typical flow: init a project, edit workflow.json, deploy it, then test the webhook."
)]
pub struct Args {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Args, Clone)]
pub struct GlobalArgs {
    /// Path to config.yml
    #[arg(long, global = true, value_name = "FILE", default_value = "config.yml")]
    pub config: PathBuf,

    /// Environment profile from config.yml (overrides N8N_ENV and NODE_ENV)
    #[arg(long, global = true, value_name = "NAME")]
    pub env: Option<String>,

    /// Log debug output to stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    #[command(
        about = "Scaffold a new workflow project",
        long_about = "Init writes workflow.json, docker-compose.yml and .gitignore. An existing workflow.json is never overwritten.",
        after_help = "Example:\n    n8n-workflow init ./stock-alerts --name \"Stock alerts\""
    )]
    Init(InitArgs),
    #[command(
        about = "Create or update a workflow from a file",
        long_about = "Deploy converts name-keyed connections to id-keyed ones and uploads the workflow. With --update an existing workflow of the same name is replaced.",
        after_help = "Example:\n    n8n-workflow deploy --file workflow.json --update --activate"
    )]
    Deploy(DeployArgs),
    #[command(
        about = "Create a new workflow from a file",
        after_help = "Example:\n    n8n-workflow create --file workflow.json"
    )]
    Create(CreateArgs),
    #[command(
        about = "List workflows on the server",
        after_help = "Example:\n    n8n-workflow list --format json"
    )]
    List(ListArgs),
    #[command(
        about = "Replace a stored workflow",
        after_help = "Example:\n    n8n-workflow update --id 42 --file workflow.json"
    )]
    Update(UpdateArgs),
    #[command(
        about = "Delete a stored workflow",
        after_help = "Example:\n    n8n-workflow delete --id 42 --force"
    )]
    Delete(DeleteArgs),
    #[command(about = "Activate a workflow")]
    Activate(IdArgs),
    #[command(about = "Deactivate a workflow")]
    Deactivate(IdArgs),
    #[command(
        about = "Test a workflow or its webhook",
        long_about = "With --id the server runs the stored workflow. With --webhook every test case from config.yml is posted to the webhook and the response is checked against its expectations.",
        after_help = "Examples:\n    n8n-workflow test --id 42\n    n8n-workflow test --webhook stock-alert"
    )]
    Test(TestArgs),
    #[command(
        about = "Delete workflows whose names match a pattern",
        after_help = "Example:\n    n8n-workflow cleanup --pattern \"[TEST]\" --dry-run"
    )]
    Cleanup(CleanupArgs),
    #[command(
        about = "Print id-keyed connections for a workflow file",
        long_about = "Resolve runs the connection conversion offline and reports dangling references. Nothing is sent to the server.",
        after_help = "Example:\n    n8n-workflow resolve --file workflow.json"
    )]
    Resolve(ResolveArgs),
    #[command(about = "Show n8n-related environment variables with secrets masked")]
    Env,
}

pub async fn run(args: Args) -> crate::Result<()> {
    let global = args.global;
    match args.command {
        Command::Init(init_args) => init::run(init_args).await,
        Command::Deploy(deploy_args) => commands::deploy(&global, deploy_args).await,
        Command::Create(create_args) => commands::create(&global, create_args).await,
        Command::List(list_args) => commands::list(&global, list_args).await,
        Command::Update(update_args) => commands::update(&global, update_args).await,
        Command::Delete(delete_args) => commands::delete(&global, delete_args).await,
        Command::Activate(id_args) => commands::activate(&global, id_args).await,
        Command::Deactivate(id_args) => commands::deactivate(&global, id_args).await,
        Command::Test(test_args) => commands::test(&global, test_args).await,
        Command::Cleanup(cleanup_args) => commands::cleanup(&global, cleanup_args).await,
        Command::Resolve(resolve_args) => commands::resolve(&global, resolve_args).await,
        Command::Env => commands::env().await,
    }
}
