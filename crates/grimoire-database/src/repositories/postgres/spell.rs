//! Spell repository implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;

use grimoire_core::result::AppResult;
use grimoire_core::{FolderId, SpellId};
use grimoire_entity::Spell;

use super::read_error;
use crate::repositories::SpellRepository;

/// Repository for spell lookups and refiling.
#[derive(Debug, Clone)]
pub struct PgSpellRepository {
    pool: PgPool,
}

impl PgSpellRepository {
    /// Create a new spell repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SpellRepository for PgSpellRepository {
    async fn find_by_id(&self, id: SpellId) -> AppResult<Option<Spell>> {
        sqlx::query_as::<_, Spell>("SELECT * FROM spells WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(read_error("Failed to find spell"))
    }

    async fn find_by_ids(&self, ids: &[SpellId]) -> AppResult<Vec<Spell>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, Spell>("SELECT * FROM spells WHERE id = ANY($1) ORDER BY name ASC")
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(read_error("Failed to find spells"))
    }

    async fn find_by_folder_id(&self, folder_id: FolderId) -> AppResult<Vec<Spell>> {
        sqlx::query_as::<_, Spell>("SELECT * FROM spells WHERE folder_id = $1 ORDER BY name ASC")
            .bind(folder_id)
            .fetch_all(&self.pool)
            .await
            .map_err(read_error("Failed to list spells in folder"))
    }

    async fn move_spells_to_folder(&self, from: FolderId, to: FolderId) -> AppResult<u64> {
        let result = sqlx::query("UPDATE spells SET folder_id = $2 WHERE folder_id = $1")
            .bind(from)
            .bind(to)
            .execute(&self.pool)
            .await
            .map_err(read_error("Failed to move spells"))?;
        Ok(result.rows_affected())
    }

    async fn count_by_folders(
        &self,
        folder_ids: &[FolderId],
    ) -> AppResult<HashMap<FolderId, u64>> {
        if folder_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(FolderId, i64)> = sqlx::query_as(
            "SELECT folder_id, COUNT(*) FROM spells WHERE folder_id = ANY($1) GROUP BY folder_id",
        )
        .bind(folder_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(read_error("Failed to count spells per folder"))?;

        Ok(rows
            .into_iter()
            .map(|(folder_id, count)| (folder_id, count as u64))
            .collect())
    }
}
