//! CLI interface for Stride
//!
//! This module provides the command-line interface using clap's derive API.
//! It defines all commands and global flags for the Stride goal assistant.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Stride Goal Assistant
///
/// A conversational assistant that helps you create goals, track milestones,
/// and log progress through natural language, backed by a local SQLite store.
#[derive(Parser, Debug)]
#[command(name = "stride")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log: Option<String>,

    /// Specify alternate configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start an interactive chat session (default)
    Chat,

    /// Send a single message and print the reply
    Run {
        /// The message to send
        message: String,
    },

    /// Show goal analytics for a user
    Analytics {
        /// User to report on
        #[arg(short, long, default_value = "default")]
        user: String,
    },
}
