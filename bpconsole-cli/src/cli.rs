//! CLI definition for the bpconsole command-line interface.

use std::path::PathBuf;

use bpconsole_parameters::ResourceKind;
use clap::{Parser, Subcommand, ValueEnum};

/// bpconsole - validate and apply BindPlane resource forms from YAML files.
///
/// Parameter definitions and values are read from YAML. Values are seeded
/// from each definition's default, then overridden by the values file.
#[derive(Parser, Debug)]
#[command(name = "bpconsole")]
#[command(version)]
#[command(about = "Validate and apply BindPlane resource forms")]
#[command(
    long_about = "bpconsole drives the same parameter forms the BindPlane console shows: \
    defaults, relevance conditions and per-type validation.\n\n\
    Environment variables:\n  \
    BPCONSOLE_ENDPOINT      BindPlane server URL (default http://localhost:3001)\n  \
    BPCONSOLE_API_KEY       API key sent as X-Bindplane-Api-Key\n  \
    BPCONSOLE_USERNAME      Basic auth username\n  \
    BPCONSOLE_PASSWORD      Basic auth password\n  \
    BPCONSOLE_TIMEOUT_SECS  Request timeout in seconds"
)]
pub struct Cli {
    /// Enable debug output to stderr
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Configuration file (replaces ./bpconsole.yaml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a values file against parameter definitions
    Validate {
        /// YAML list of parameter definitions
        #[arg(long, value_name = "FILE")]
        definitions: PathBuf,
        /// YAML mapping of parameter name to value
        #[arg(long, value_name = "FILE")]
        values: Option<PathBuf>,
        /// Kind of resource the form creates
        #[arg(long, value_enum, default_value_t = KindArg::Source)]
        kind: KindArg,
        /// Also validate the reserved `name` value
        #[arg(long)]
        name_field: bool,
        /// Names already in use, for the uniqueness check
        #[arg(long = "existing-name", value_name = "NAME")]
        existing_names: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show how definitions group into basic and advanced sections
    Groups {
        /// YAML list of parameter definitions
        #[arg(long, value_name = "FILE")]
        definitions: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a values file and apply the resource to BindPlane
    Apply {
        /// Kind of resource to apply
        #[arg(long, value_enum)]
        kind: KindArg,
        /// Resource type, e.g. `otlp`
        #[arg(long = "type", value_name = "TYPE")]
        type_name: String,
        /// YAML mapping of parameter name to value, including `name`
        #[arg(long, value_name = "FILE")]
        values: PathBuf,
        /// Local definitions instead of fetching the resource type
        #[arg(long, value_name = "FILE")]
        definitions: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Resource kinds a form can create.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindArg {
    Source,
    Destination,
    Processor,
}

impl From<KindArg> for ResourceKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Source => ResourceKind::Source,
            KindArg::Destination => ResourceKind::Destination,
            KindArg::Processor => ResourceKind::Processor,
        }
    }
}
