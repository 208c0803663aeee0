//! Migrate command - Database migration management.

use chrono::{SecondsFormat, Utc};
use pgmigrate::MigrationStatus;

use crate::cli::args::{MigrateAction, MigrateArgs, RunArgs};
use crate::config::DatabaseConfig;
use crate::errors::AppResult;
use crate::infra::{Database, SchemaMigrator};

/// Execute the migrate command
pub async fn execute(args: MigrateArgs) -> AppResult<()> {
    match args.action {
        MigrateAction::Create(args) => {
            let path = pgmigrate::create(&args.dir, &args.name, Utc::now())?;
            println!("Created migration: {}", path.display());
            println!("Don't forget to add it to src/infra/db/migrations/mod.rs to embed it!");
        }
        MigrateAction::Up(args) => {
            let migrator = connect(&args).await?;
            tracing::info!("Running pending migrations...");
            let applied = migrator.up().await?;
            tracing::info!(applied, "Migrations completed successfully");
        }
        MigrateAction::Down(args) => {
            let migrator = connect(&args.run).await?;
            tracing::info!(steps = args.steps, "Rolling back migrations...");
            let reverted = migrator.down(args.steps).await?;
            tracing::info!(reverted, "Rollback completed successfully");
        }
        MigrateAction::Status(args) => {
            let migrator = connect(&args).await?;
            for line in render_status(&migrator.status().await?) {
                println!("{}", line);
            }
        }
    }

    Ok(())
}

async fn connect(args: &RunArgs) -> AppResult<SchemaMigrator> {
    let config = DatabaseConfig::from_args(&args.database, &args.migrations)?;
    let db = Database::connect(&config).await?;
    Ok(db.migrator(&config))
}

fn render_status(status: &[MigrationStatus]) -> Vec<String> {
    status
        .iter()
        .map(|s| match s.applied_at {
            Some(at) => format!(
                "{}: applied at {}",
                s.id,
                at.to_rfc3339_opts(SecondsFormat::Secs, true)
            ),
            None => format!("{}: pending", s.id),
        })
        .collect()
}
