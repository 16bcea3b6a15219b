//! CLI entry point - the composition root.
//!
//! Parses arguments, initialises logging, bootstraps the dispatcher via
//! `bootstrap` and routes to a handler. Errors are mapped to exit codes
//! here and nowhere else.

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use devpilot_cli::{Cli, CliConfig, CliError, Commands, bootstrap, handlers};

/// Filter used with `-v` when `RUST_LOG` is unset.
const VERBOSE_FILTER: &str = "warn,devpilot=debug";

/// Log to stderr so stdout only carries results.
///
/// `RUST_LOG` wins; otherwise `-v` enables debug output for devpilot crates.
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { VERBOSE_FILTER } else { "warn" })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let Some(command) = cli.command.as_ref() else {
        // No command provided - show help
        Cli::command().print_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    // Bootstrap the CLI context (composition root)
    let ctx = bootstrap(CliConfig::from_cli(&cli)?)?;

    match command {
        Commands::Run { input, args, json } => {
            return handlers::run::execute(&ctx, input, args, *json).await;
        }
        Commands::Explain { input, json } => handlers::explain::execute(&ctx, input, *json)?,
        Commands::Recipes => handlers::list::recipes(&ctx)?,
        Commands::Commands => handlers::list::commands(&ctx)?,
        Commands::Config => handlers::config::execute(&ctx)?,
        Commands::Shell => handlers::shell::execute(&ctx).await?,
    }

    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err}");
            let code = err
                .downcast_ref::<CliError>()
                .map_or(1, CliError::exit_code);
            ExitCode::from(code)
        }
    }
}
