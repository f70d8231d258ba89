//! CLI argument definitions using clap
//!
//! Commands:
//! - bookstore init --config <path> [--force]
//! - bookstore serve --config <path> [--port <port>]
//! - bookstore list --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Bookstore - a small catalog web service
#[derive(Parser, Debug)]
#[command(name = "bookstore")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a default configuration file
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./bookstore.json")]
        config: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Connect to the store and serve HTTP until Ctrl-C
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./bookstore.json")]
        config: PathBuf,

        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print the catalog as JSON and exit
    List {
        /// Path to configuration file
        #[arg(long, default_value = "./bookstore.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
