//! Spell entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use grimoire_core::{FolderId, SpellId};

use crate::spell::convocation::Convocation;

/// A spell in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Spell {
    /// Unique spell identifier.
    pub id: SpellId,
    /// Spell name.
    pub name: String,
    /// The convocation (school) the spell belongs to.
    pub convocation: Convocation,
    /// Spell level.
    pub level: i32,
    /// Folder the spell is filed in.
    #[serde(default = "root_folder")]
    pub folder_id: FolderId,
    /// When the spell was created.
    pub created_at: DateTime<Utc>,
}

impl Spell {
    /// Returns whether any character may learn this spell.
    pub fn is_neutral(&self) -> bool {
        self.convocation.is_neutral()
    }
}

fn root_folder() -> FolderId {
    FolderId::ROOT
}
