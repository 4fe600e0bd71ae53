//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use grimoire_core::FolderId;

/// Characters that may never appear in a folder name.
pub const PATH_SEPARATORS: [char; 2] = ['/', '\\'];

/// A folder in the spell hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: FolderId,
    /// Folder name, unique among its siblings.
    pub name: String,
    /// Parent folder ID (null only for the root).
    pub parent_id: Option<FolderId>,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
}

impl Folder {
    /// Check if this is the root folder.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}
