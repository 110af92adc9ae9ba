//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tempo incremental extraction connector CLI
#[derive(Parser, Debug)]
#[command(name = "tempo-connect")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Inline config JSON
    #[arg(long, global = true)]
    pub config_json: Option<String>,

    /// State file (JSON), read at start and checkpointed during sync
    #[arg(short, long, global = true)]
    pub state: Option<PathBuf>,

    /// Inline state JSON
    #[arg(long, global = true)]
    pub state_json: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Test connection to the API
    Check,

    /// Print available streams and their schemas
    Discover,

    /// Extract records and emit them as JSON lines
    Sync {
        /// Streams to sync (default: all)
        #[arg(long, value_delimiter = ',')]
        streams: Option<Vec<String>>,
    },
}
