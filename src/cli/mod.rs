//! CLI module for the bookstore service
//!
//! Provides command-line interface for:
//! - init: Write a default configuration file
//! - serve: Boot and serve HTTP until Ctrl-C
//! - list: Print the catalog and exit

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{boot, init, list, run, run_command, serve};
pub use config::{Config, DATABASE_URI_ENV};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_response, write_response_to};
