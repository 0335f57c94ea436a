//! # CLI Commands
//!
//! Subcommand definitions and implementations.

pub mod completions;
pub mod migrate;
pub mod notify;
pub mod validate;

use clap::{Args, Subcommand};

/// Available commands for the fieldserve CLI
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the API server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),

    /// Send open-point reminders (one pass; schedule externally)
    NotifyOpenPoints,

    /// Generate shell completions
    Completions(CompletionsArgs),

    /// Verify configuration
    Validate,
}

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Server host to bind to
    #[arg(long, env = "FIELDSERVE_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Server port to bind to
    #[arg(short, long, env = "FIELDSERVE_PORT", default_value = "8080")]
    pub port: u16,
}

/// Arguments for the migrate command
#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Show pending migrations without applying them
    #[arg(long)]
    pub dry_run: bool,

    /// Rollback the last migration
    #[arg(long)]
    pub rollback: bool,

    /// Seed the bootstrap admin account after migrating
    #[arg(long)]
    pub seed: bool,
}

/// Arguments for the completions command
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
