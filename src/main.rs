//! Route compiler command-line front end.
//!
//! # Architecture Overview
//!
//! ```text
//!   routes.toml ──▶ config::load_config ──▶ Router::from_config
//!                                              │
//!        ┌─────────────────────────────────────┼──────────────────────┐
//!        ▼                                     ▼                      ▼
//!   parse <template> / sugar                table              dispatch <method> <path>
//!   (token sequences, aliases)      (compiled table JSON)       (outcome JSON)
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use indexmap::IndexMap;

use route_compiler::config::{load_config, RouterConfig};
use route_compiler::observability::logging::init_logging;
use route_compiler::{PatternParser, Router, SugarTable};

#[derive(Parser)]
#[command(name = "route-compiler")]
#[command(about = "Compile route templates and resolve requests against them", long_about = None)]
struct Cli {
    /// Routes file (TOML). Without it an empty configuration is used.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the token sequences a template expands to
    Parse {
        template: String,
    },
    /// List the placeholder aliases in effect
    Sugar,
    /// Print the compiled route table
    Table,
    /// Resolve a request against the configured routes
    Dispatch {
        method: String,
        path: String,
        /// Report methods that would match when the requested one does not
        #[arg(long)]
        allowed: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RouterConfig::default(),
    };

    init_logging(&config.observability)?;
    tracing::debug!(config = ?cli.config, "route-compiler starting");

    match cli.command {
        Commands::Parse { template } => {
            let parser = configured_parser(&config);
            let routes = parser.parse(&template)?;
            println!("{}", serde_json::to_string_pretty(&routes)?);
        }
        Commands::Sugar => {
            let parser = configured_parser(&config);
            let aliases: IndexMap<&str, &str> = parser.sugar().iter().collect();
            println!("{}", serde_json::to_string_pretty(&aliases)?);
        }
        Commands::Table => {
            let mut router = Router::from_config(&config)?;
            let snapshot = router.route_data().to_snapshot();
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        Commands::Dispatch {
            method,
            path,
            allowed,
        } => {
            let mut router = Router::from_config(&config)?;
            let outcome = router.dispatch(&method, &path, allowed);
            tracing::info!(method = %method, path = %path, outcome = outcome.label(), "Dispatch complete");
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
    }

    Ok(())
}

fn configured_parser(config: &RouterConfig) -> PatternParser {
    let parser = PatternParser::with_sugar(SugarTable::default().merged(config.sugar.clone()));
    tracing::debug!(aliases = parser.sugar().len(), "Sugar table ready");
    parser
}
