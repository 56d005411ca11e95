use crate::demo::{run_demo, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use talentflow::config::AppConfig;
use talentflow::error::AppError;
use talentflow::workflows::status::StatusCatalog;

#[derive(Parser, Debug)]
#[command(
    name = "Applicant Pipeline Orchestrator",
    about = "Run and demonstrate the applicant status workflow service from the command line",
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
    /// Run a scripted end-to-end walk of the status confirmation flow
    Demo(DemoArgs),
    /// Print the configured status catalog in pipeline order
    Catalog,
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
        Command::Demo(args) => run_demo(args),
        Command::Catalog => print_catalog(),
    }
}

fn print_catalog() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let catalog = load_catalog(&config)?;

    for (position, status) in catalog.statuses().iter().enumerate() {
        println!("{:>2}. {status}", position + 1);
    }
    Ok(())
}

pub(crate) fn load_catalog(config: &AppConfig) -> Result<StatusCatalog, AppError> {
    match &config.workflow.catalog_override {
        Some(statuses) => Ok(StatusCatalog::new(statuses.clone())?),
        None => Ok(StatusCatalog::standard()),
    }
}
