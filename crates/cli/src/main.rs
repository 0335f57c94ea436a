//! # Fieldserve CLI
//!
//! Command-line interface for the fieldserve backend.
//!
//! ## Usage
//!
//! ```bash
//! fieldserve serve               # Start the API server (runs migrations automatically)
//! fieldserve migrate --seed      # Run migrations and seed the bootstrap admin
//! fieldserve notify-open-points  # One reminder pass over open points (cron target)
//! fieldserve --help              # Show help
//! ```

mod commands;
mod server;

use clap::Parser;
use commands::Commands;
use error::Result;
use tracing::info;

/// Fieldserve - industrial-equipment service management
#[derive(Parser, Debug)]
#[command(name = "fieldserve")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (debug, info, warn, error)
    #[arg(short = 'L', long, env = "RUST_LOG", default_value = "info")]
    log_level: String,

    /// Output format (json, pretty, compact)
    #[arg(short, long, env = "FIELDSERVE_LOG_FORMAT", default_value = "pretty")]
    log_format: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&cli.log_level, &cli.log_format, None)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!(target: "app", command = ?cli.command, "fieldserve starting");

    match cli.command {
        Commands::Serve(args) => server::serve(&args).await?,
        Commands::Migrate(args) => commands::migrate::migrate(args).await?,
        Commands::NotifyOpenPoints => commands::notify::notify_open_points().await?,
        Commands::Completions(args) => {
            use clap::CommandFactory as _;
            commands::completions::completions(args.shell, &mut Cli::command())?;
        },
        Commands::Validate => commands::validate::validate()?,
    }

    Ok(())
}
