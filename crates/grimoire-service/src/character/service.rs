//! The character/spell association and its convocation gate.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, warn};

use grimoire_core::{AppError, AppResult, CharacterId, SpellId};
use grimoire_database::{CharacterRepository, SpellRepository};
use grimoire_entity::{Character, Spell};

/// Whether `character` may know `spell`: neutral spells are open to all,
/// others require membership in the spell's convocation.
pub fn is_eligible(character: &Character, spell: &Spell) -> bool {
    character.can_learn(spell)
}

/// Guards which spells a character knows.
#[derive(Debug, Clone)]
pub struct RelationshipService {
    /// Character repository.
    character_repo: Arc<dyn CharacterRepository>,
    /// Spell repository.
    spell_repo: Arc<dyn SpellRepository>,
}

impl RelationshipService {
    /// Creates a new relationship service.
    pub fn new(
        character_repo: Arc<dyn CharacterRepository>,
        spell_repo: Arc<dyn SpellRepository>,
    ) -> Self {
        Self {
            character_repo,
            spell_repo,
        }
    }

    async fn require_character(&self, character_id: CharacterId) -> AppResult<Character> {
        self.character_repo
            .find_by_id(character_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Character {character_id} not found")))
    }

    /// Teaches a spell to a character.
    pub async fn add_spell_to_character(
        &self,
        character_id: CharacterId,
        spell_id: SpellId,
    ) -> AppResult<()> {
        let character = self.require_character(character_id).await?;

        let spell = self
            .spell_repo
            .find_by_id(spell_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Spell {spell_id} not found")))?;

        if self.character_repo.has_spell(character_id, spell_id).await? {
            return Err(AppError::conflict(format!(
                "Character '{}' already knows spell '{}'",
                character.name, spell.name
            )));
        }

        if !is_eligible(&character, &spell) {
            warn!(
                character_id = %character_id,
                spell_id = %spell_id,
                convocation = %spell.convocation,
                "Rejected spell outside character convocations"
            );
            return Err(AppError::validation(format!(
                "Spell '{}' belongs to convocation '{}', but character '{}' only has: {}",
                spell.name,
                spell.convocation,
                character.name,
                character.convocation_list()
            ))
            .with_details(json!({
                "character_id": character_id,
                "spell_id": spell_id,
                "spell_convocation": spell.convocation,
                "character_convocations": character.convocations,
            })));
        }

        self.character_repo.add_spell(character_id, spell_id).await?;

        info!(
            character_id = %character_id,
            spell_id = %spell_id,
            convocation = %spell.convocation,
            "Spell added to character"
        );

        Ok(())
    }

    /// Removes a spell from a character. A missing pair is `NotFound`.
    pub async fn remove_spell_from_character(
        &self,
        character_id: CharacterId,
        spell_id: SpellId,
    ) -> AppResult<()> {
        let character = self.require_character(character_id).await?;

        if !self.character_repo.has_spell(character_id, spell_id).await? {
            return Err(AppError::not_found(format!(
                "Character '{}' does not know spell {spell_id}",
                character.name
            )));
        }

        self.character_repo
            .remove_spell(character_id, spell_id)
            .await?;

        info!(
            character_id = %character_id,
            spell_id = %spell_id,
            "Spell removed from character"
        );

        Ok(())
    }

    /// Resolves the spells a character knows, ordered by name.
    pub async fn get_character_spells(&self, character_id: CharacterId) -> AppResult<Vec<Spell>> {
        let character = self.require_character(character_id).await?;
        let spells = self
            .spell_repo
            .find_by_ids(&character.known_spell_ids)
            .await?;

        debug!(
            character_id = %character_id,
            known = character.known_spell_ids.len(),
            resolved = spells.len(),
            "Character spells read"
        );

        Ok(spells)
    }
}
