// CLI module for handling command-line interface

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "labext-catalog")]
#[command(about = "Catalog of prebuilt JupyterLab extensions published on PyPI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (default: labext-catalog.toml in $LABEXT_CATALOG_DIR)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Root URL of the package index RPC and JSON APIs
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Download statistics URL template containing {package}
    #[arg(long, global = true)]
    pub stats_url: Option<String>,

    /// Seconds multiplied into the wait after a rate-limit response
    #[arg(long, global = true)]
    pub throttle: Option<f64>,

    /// HTTP request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the catalog and write it as JSON
    Build {
        /// Output file
        #[arg(short, long, default_value = crate::constants::CATALOG_FILE)]
        output: PathBuf,
    },
    /// Build the catalog and print a summary
    List,
}
