//! bpconsole - validate and apply BindPlane resource forms.
//!
//! Commands:
//! - `bpconsole validate --definitions <file> [--values <file>]`: Check values against definitions
//! - `bpconsole groups --definitions <file>`: Show basic/advanced parameter sections
//! - `bpconsole apply --kind <kind> --type <type> --values <file>`: Validate and apply a resource
//!
//! Exit codes:
//! - 0: Success
//! - 1: Error
//! - 2: Validation blocked, or the resource was rejected as invalid

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use bpconsole_cli::{apply, groups, validate, Cli, Commands, EXIT_FAILURE};

async fn run(cli: Cli) -> anyhow::Result<i32> {
    let code = match cli.command {
        Commands::Validate {
            definitions,
            values,
            kind,
            name_field,
            existing_names,
            json,
        } => validate::run_validate(
            &definitions,
            values.as_deref(),
            kind.into(),
            name_field,
            &existing_names,
            json,
        )
        .context("validate failed")?,

        Commands::Groups { definitions, json } => {
            groups::run_groups(&definitions, json).context("groups failed")?
        }

        Commands::Apply {
            kind,
            type_name,
            values,
            definitions,
            json,
        } => apply::run_apply(
            cli.config.as_deref(),
            kind.into(),
            &type_name,
            &values,
            definitions.as_deref(),
            json,
        )
        .await
        .context("apply failed")?,
    };
    Ok(code)
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing with appropriate level
    let filter = if cli.debug {
        EnvFilter::new("bpconsole=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            EXIT_FAILURE
        }
    };

    std::process::exit(exit_code);
}
