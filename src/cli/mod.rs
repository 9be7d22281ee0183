//! CLI interface for gatekeep

pub mod commands;
mod output;

pub use output::*;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gatekeep")]
#[command(version)]
#[command(about = "User registration, login and token-protected endpoints", long_about = None)]
pub struct Cli {
    /// Path to gatekeep.toml (defaults to searching upward from the current directory)
    #[arg(short, long, global = true, env = "GATEKEEP_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a new gatekeep.toml with a freshly generated signing secret
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Run the HTTP API server
    Serve {
        /// Host to bind to (overrides server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// List registered users
    Users {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}
