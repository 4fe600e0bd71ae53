//! Character entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use grimoire_core::{CharacterId, SpellId};

use crate::spell::{Convocation, Spell};

/// A character and the spells it knows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Character {
    /// Unique character identifier.
    pub id: CharacterId,
    /// Character name.
    pub name: String,
    /// Convocations the character is affiliated with.
    pub convocations: Vec<Convocation>,
    /// Spells the character knows, ordered by id.
    pub known_spell_ids: Vec<SpellId>,
    /// When the character was created.
    pub created_at: DateTime<Utc>,
}

impl Character {
    /// Returns whether the character may learn `spell`.
    ///
    /// Neutral spells are open to everyone; any other spell requires the
    /// character to belong to its convocation.
    pub fn can_learn(&self, spell: &Spell) -> bool {
        spell.convocation.is_neutral() || self.convocations.contains(&spell.convocation)
    }

    /// The character's convocations as a comma-separated list.
    pub fn convocation_list(&self) -> String {
        if self.convocations.is_empty() {
            return "none".to_string();
        }
        self.convocations
            .iter()
            .map(Convocation::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
