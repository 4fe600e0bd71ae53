//! Database migration management commands.

use clap::{Args, Subcommand};
use sqlx::PgPool;

use crate::output;
use grimoire_core::error::AppError;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations and seed the root folder
    Run,
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, pool: &PgPool) -> Result<(), AppError> {
    match &args.command {
        MigrateCommand::Run => {
            println!("Running database migrations...");
            grimoire_database::migration::run_migrations(pool).await?;
            output::print_success("All migrations applied successfully.");
        }
    }

    Ok(())
}
