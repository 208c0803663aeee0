//! Snippets API - Application entry point
//!
//! CLI-based entry point that dispatches to the server and migration commands.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use snippets_api::{
    cli::{args::LogFormat, Cli, Commands},
    commands,
};

#[tokio::main]
async fn main() {
    // Values from .env fill in for unset environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_tracing(&cli);

    let result = match cli.command {
        Commands::Server(args) => commands::server::execute(args).await,
        Commands::Migrate(args) => commands::migrate::execute(args).await,
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing subscriber.
///
/// `--verbose` wins over `RUST_LOG`, which wins over `--log-level`.
fn init_tracing(cli: &Cli) {
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level.as_filter()))
    };

    let registry = tracing_subscriber::registry().with(filter);

    match cli.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}
