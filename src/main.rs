//! docket - documentation reminders for AI coding tools.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use docket::cli::{self, setup::SetupOptions, Cli, Commands, Project};
use docket::Error;

fn init_logging(verbose: bool) {
    let default = if verbose { "docket=debug" } else { "docket=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // stdout belongs to the host tool when running as a hook
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() {
    let args = Cli::parse();
    init_logging(args.verbose);

    if let Commands::Hook { event } = args.command {
        cli::hook::run(event, args.project).await;
        return;
    }

    if let Err(e) = run(args).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: Cli) -> Result<(), Error> {
    let root = cli::resolve_root(args.project)?;

    match args.command {
        Commands::Doc { mode, dry_run } => {
            let project = Project::open(&root)?;
            cli::doc::run(&project, mode, dry_run).await?;
        }
        Commands::Pending { clear } => {
            let project = Project::open(&root)?;
            cli::pending::run(&project, clear)?;
        }
        Commands::Setup {
            config_dir,
            git_hooks,
        } => {
            let project = Project::open(&root)?;
            cli::setup::run(
                &project,
                SetupOptions {
                    config_dir,
                    git_hooks,
                },
            )
            .await?;
        }
        Commands::Teardown { config_dir } => {
            let project = Project::open_lenient(&root);
            cli::setup::teardown(&project, config_dir)?;
        }
        Commands::Hook { event } => {
            cli::hook::run(event, Some(root)).await;
        }
    }

    Ok(())
}
