//! CLI command definitions and dispatch.

pub mod character;
pub mod folder;
pub mod migrate;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use sqlx::PgPool;

use crate::output::OutputFormat;
use grimoire_core::config::AppConfig;
use grimoire_core::error::AppError;
use grimoire_database::DatabasePool;
use grimoire_database::repositories::{
    PgCharacterRepository, PgFolderRepository, PgSpellRepository,
};
use grimoire_service::{FolderService, RelationshipService, TreeService};

/// Grimoire spell catalog manager
#[derive(Debug, Parser)]
#[command(name = "grimoire", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Load `config/default` layered with `config/{ENV}` instead of `--config`
    #[arg(short, long, conflicts_with = "config")]
    pub env: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Folder management
    Folder(folder::FolderArgs),
    /// Character spell management
    Character(character::CharacterArgs),
}

impl Cli {
    /// Load the configuration selected by `--env` or `--config`
    pub fn load_config(&self) -> Result<AppConfig, AppError> {
        match &self.env {
            Some(env) => AppConfig::load(env),
            None => AppConfig::load_file(&self.config),
        }
    }

    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        let pool = DatabasePool::connect(&config.database).await?;

        let result = match &self.command {
            Commands::Migrate(args) => migrate::execute(args, pool.pool()).await,
            Commands::Folder(args) => {
                folder::execute(args, &Catalog::new(pool.pool().clone()), self.format).await
            }
            Commands::Character(args) => {
                character::execute(args, &Catalog::new(pool.pool().clone()), self.format).await
            }
        };

        pool.close().await;
        result
    }
}

/// Services wired to PostgreSQL repositories.
pub struct Catalog {
    /// Folder hierarchy operations.
    pub folders: FolderService,
    /// Tree views and path resolution.
    pub trees: TreeService,
    /// Character spell relationships.
    pub relationships: RelationshipService,
}

impl Catalog {
    /// Build every service over one pool.
    pub fn new(pool: PgPool) -> Self {
        let folder_repo = Arc::new(PgFolderRepository::new(pool.clone()));
        let spell_repo = Arc::new(PgSpellRepository::new(pool.clone()));
        let character_repo = Arc::new(PgCharacterRepository::new(pool));

        Self {
            folders: FolderService::new(folder_repo.clone(), spell_repo.clone()),
            trees: TreeService::new(folder_repo, spell_repo.clone()),
            relationships: RelationshipService::new(character_repo, spell_repo),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_and_config_are_exclusive() {
        let cli = Cli::try_parse_from(["grimoire", "--env", "staging", "migrate", "run"])
            .expect("env alone should parse");
        assert_eq!(cli.env.as_deref(), Some("staging"));
        assert_eq!(cli.config, "config/default.toml");

        let err = Cli::try_parse_from([
            "grimoire", "--env", "staging", "--config", "other.toml", "migrate", "run",
        ]);
        assert!(err.is_err());
    }
}
