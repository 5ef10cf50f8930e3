//! Command-line interface definition for Ledgermind
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for the interactive panel and record summaries.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Ledgermind - AI assistant panel for business data
///
/// Chat with a backend assistant about your records, with chart
/// extraction from model replies and one-shot record summaries.
#[derive(Parser, Debug, Clone)]
#[command(name = "ledgermind")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Ledgermind
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the interactive assistant panel
    Chat {
        /// Override the chat endpoint from config
        #[arg(short, long)]
        endpoint: Option<String>,
    },

    /// Summarize a record from a JSON file
    Summarize {
        /// Analysis to run (lead, invoice)
        #[arg(short, long, default_value = "lead")]
        kind: String,

        /// Path to the record JSON file
        #[arg(short, long)]
        record: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
