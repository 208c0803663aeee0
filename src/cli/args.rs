//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing. Every option can
//! also be set through the environment variable named next to it.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::{
    DEFAULT_LISTEN_ADDR, DEFAULT_MIGRATIONS_DIR, DEFAULT_POSTGRES_DATABASE, DEFAULT_POSTGRES_HOST,
    DEFAULT_POSTGRES_PORT, DEFAULT_POSTGRES_TLS_MODE, DEFAULT_POSTGRES_USER,
};

/// Snippets API - starter REST service with embedded SQL migrations
#[derive(Parser, Debug)]
#[command(name = "snippets-api")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging (same as --log-level debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log level
    #[arg(long, global = true, env = "LOG_LEVEL", value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log output format
    #[arg(long, global = true, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply pending migrations and start the HTTP server
    #[command(alias = "serve")]
    Server(ServerArgs),

    /// Manage database migrations
    Migrate(MigrateArgs),
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    /// Directive understood by `EnvFilter`
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// PostgreSQL connection options
#[derive(Args, Debug, Clone)]
pub struct DatabaseArgs {
    /// Full connection URL; takes precedence over the individual --postgres-* options
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    #[arg(long, env = "POSTGRES_HOST", default_value = DEFAULT_POSTGRES_HOST)]
    pub postgres_host: String,

    #[arg(long, env = "POSTGRES_PORT", default_value_t = DEFAULT_POSTGRES_PORT)]
    pub postgres_port: u16,

    #[arg(long, env = "POSTGRES_USERNAME", default_value = DEFAULT_POSTGRES_USER)]
    pub postgres_username: String,

    #[arg(long, env = "POSTGRES_PASSWORD", default_value = "", hide_env_values = true)]
    pub postgres_password: String,

    #[arg(long, env = "POSTGRES_DATABASE", default_value = DEFAULT_POSTGRES_DATABASE)]
    pub postgres_database: String,

    /// sslmode: disable, allow, prefer, require, verify-ca or verify-full
    #[arg(long, env = "POSTGRES_TLS_MODE", default_value = DEFAULT_POSTGRES_TLS_MODE)]
    pub postgres_tls_mode: String,
}

/// How migrations are located and applied
#[derive(Args, Debug, Clone)]
pub struct MigrationArgs {
    /// Read migrations from this directory instead of the ones built into the binary
    #[arg(long, env = "MIGRATIONS_DIR")]
    pub migrations_dir: Option<PathBuf>,

    /// Seconds to wait for the migration lock before giving up (waits forever when unset)
    #[arg(long, env = "MIGRATIONS_LOCK_TIMEOUT")]
    pub lock_timeout: Option<u64>,

    /// Run everything in one transaction, or keep migrations that succeeded before a failure
    #[arg(long, env = "MIGRATIONS_TRANSACTION_MODE", value_enum, default_value_t = TransactionModeArg::Batch)]
    pub transaction_mode: TransactionModeArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionModeArg {
    Batch,
    PerMigration,
}

/// Arguments for the server command
#[derive(Args, Debug)]
pub struct ServerArgs {
    /// Address to listen on
    #[arg(long, env = "HTTP_LISTEN", default_value = DEFAULT_LISTEN_ADDR)]
    pub listen: String,

    /// Token clients must send as `Authorization: Bearer <token>`
    #[arg(long, env = "API_TOKEN", hide_env_values = true)]
    pub token: String,

    #[command(flatten)]
    pub database: DatabaseArgs,

    #[command(flatten)]
    pub migrations: MigrationArgs,
}

/// Arguments for the migrate command
#[derive(Args, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

/// Migration actions
#[derive(Subcommand, Debug)]
pub enum MigrateAction {
    /// Create a new, empty migration file
    Create(CreateArgs),
    /// Apply all pending migrations
    Up(RunArgs),
    /// Revert the most recently applied migrations
    Down(DownArgs),
    /// Show which migrations are applied
    Status(RunArgs),
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Migration name (letters, digits, '_' and '-'), e.g. "add_tags"
    pub name: String,

    /// Directory to write the file to
    #[arg(long, default_value = DEFAULT_MIGRATIONS_DIR)]
    pub dir: PathBuf,
}

/// Options shared by the migrate actions that talk to the database
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub database: DatabaseArgs,

    #[command(flatten)]
    pub migrations: MigrationArgs,
}

#[derive(Args, Debug)]
pub struct DownArgs {
    /// How many migrations to revert, 0 reverts all of them
    #[arg(long, default_value_t = 1)]
    pub steps: usize,

    #[command(flatten)]
    pub run: RunArgs,
}
