//! Character spell management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use super::Catalog;
use crate::output::{self, OutputFormat};
use grimoire_core::error::AppError;
use grimoire_core::{CharacterId, SpellId};
use grimoire_entity::Spell;

/// Arguments for character commands
#[derive(Debug, Args)]
pub struct CharacterArgs {
    /// Character subcommand
    #[command(subcommand)]
    pub command: CharacterCommand,
}

/// Character subcommands
#[derive(Debug, Subcommand)]
pub enum CharacterCommand {
    /// Teach a spell to a character
    Learn {
        /// Character ID
        character: i64,
        /// Spell ID
        spell: i64,
    },
    /// Remove a spell from a character
    Forget {
        /// Character ID
        character: i64,
        /// Spell ID
        spell: i64,
    },
    /// List the spells a character knows
    Spells {
        /// Character ID
        character: i64,
    },
}

/// Spell display row for table output
#[derive(Debug, Serialize, Tabled)]
struct SpellRow {
    /// Spell ID
    id: i64,
    /// Name
    name: String,
    /// Convocation
    convocation: String,
    /// Level
    level: i32,
    /// Folder ID
    folder: i64,
}

impl From<&Spell> for SpellRow {
    fn from(spell: &Spell) -> Self {
        Self {
            id: spell.id.get(),
            name: spell.name.clone(),
            convocation: spell.convocation.to_string(),
            level: spell.level,
            folder: spell.folder_id.get(),
        }
    }
}

/// Execute character commands
pub async fn execute(
    args: &CharacterArgs,
    catalog: &Catalog,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        CharacterCommand::Learn { character, spell } => {
            catalog
                .relationships
                .add_spell_to_character(CharacterId(*character), SpellId(*spell))
                .await?;
            output::print_success(&format!(
                "Character {} now knows spell {}",
                character, spell
            ));
        }
        CharacterCommand::Forget { character, spell } => {
            catalog
                .relationships
                .remove_spell_from_character(CharacterId(*character), SpellId(*spell))
                .await?;
            output::print_success(&format!(
                "Character {} no longer knows spell {}",
                character, spell
            ));
        }
        CharacterCommand::Spells { character } => {
            let spells = catalog
                .relationships
                .get_character_spells(CharacterId(*character))
                .await?;
            let rows: Vec<SpellRow> = spells.iter().map(SpellRow::from).collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}
