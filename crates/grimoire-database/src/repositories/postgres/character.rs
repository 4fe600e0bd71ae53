//! Character repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use grimoire_core::error::{AppError, ErrorKind};
use grimoire_core::result::AppResult;
use grimoire_core::{CharacterId, SpellId};
use grimoire_entity::Character;

use super::read_error;
use crate::repositories::CharacterRepository;

/// Repository for characters and the `character_spells` association.
#[derive(Debug, Clone)]
pub struct PgCharacterRepository {
    pool: PgPool,
}

impl PgCharacterRepository {
    /// Create a new character repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CharacterRepository for PgCharacterRepository {
    async fn find_by_id(&self, id: CharacterId) -> AppResult<Option<Character>> {
        sqlx::query_as::<_, Character>(
            "SELECT c.id, c.name, c.convocations, c.created_at, \
                ARRAY(SELECT cs.spell_id FROM character_spells cs \
                      WHERE cs.character_id = c.id ORDER BY cs.spell_id) AS known_spell_ids \
             FROM characters c WHERE c.id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(read_error("Failed to find character"))
    }

    async fn has_spell(&self, character_id: CharacterId, spell_id: SpellId) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM character_spells \
             WHERE character_id = $1 AND spell_id = $2)",
        )
        .bind(character_id)
        .bind(spell_id)
        .fetch_one(&self.pool)
        .await
        .map_err(read_error("Failed to check character spell"))
    }

    async fn add_spell(&self, character_id: CharacterId, spell_id: SpellId) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO character_spells (character_id, spell_id) VALUES ($1, $2) \
             ON CONFLICT (character_id, spell_id) DO NOTHING",
        )
        .bind(character_id)
        .bind(spell_id)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                AppError::not_found(format!(
                    "Character {character_id} or spell {spell_id} not found"
                ))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to add character spell", e),
        })?;
        Ok(())
    }

    async fn remove_spell(&self, character_id: CharacterId, spell_id: SpellId) -> AppResult<bool> {
        let result =
            sqlx::query("DELETE FROM character_spells WHERE character_id = $1 AND spell_id = $2")
                .bind(character_id)
                .bind(spell_id)
                .execute(&self.pool)
                .await
                .map_err(read_error("Failed to remove character spell"))?;
        Ok(result.rows_affected() > 0)
    }
}
