//! SEO CLI - meta tag and structured-data engine.
//!
//! Provides commands for:
//! - `meta`: Resolve meta tags for a catalog entity
//! - `jsonld`: Generate JSON-LD structured data for a catalog entity
//! - `variables`: List template variables for an entity type
//! - `validate`: Validate a structured-data document

mod commands;
mod error;
mod output;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{JsonLdArgs, MetaArgs, ValidateArgs, VariablesArgs};
use output::Output;

/// Application version from Cargo.toml.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// SEO - meta tag and structured-data engine.
#[derive(Parser)]
#[command(name = "seo", version, about)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command.
#[derive(Args)]
pub(crate) struct GlobalArgs {
    /// Path to configuration file (default: auto-discover seo.toml).
    #[arg(short, long, global = true, env = "SEO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Store view id (overrides config).
    #[arg(long, global = true)]
    pub store_id: Option<u32>,

    /// Disable the persistent cache.
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// Enable verbose output (info-level logs).
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve meta tags for an entity.
    Meta(MetaArgs),
    /// Generate JSON-LD structured data for an entity.
    Jsonld(JsonLdArgs),
    /// List template variables for an entity type.
    Variables(VariablesArgs),
    /// Validate a structured-data JSON document.
    Validate(ValidateArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.global.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Meta(args) => args.execute(&cli.global, VERSION),
        Commands::Jsonld(args) => args.execute(&cli.global, VERSION),
        Commands::Variables(args) => args.execute(&cli.global, VERSION),
        Commands::Validate(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
