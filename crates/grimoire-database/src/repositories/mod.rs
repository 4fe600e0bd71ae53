//! Repository traits consumed by the service layer.
//!
//! Each trait is implemented by a PostgreSQL repository in [`postgres`] and
//! by [`MemoryStore`](crate::memory::MemoryStore). Services hold them as
//! `Arc<dyn Trait>` so either backer can be injected.

pub mod postgres;

use std::collections::HashMap;
use std::fmt::Debug;

use async_trait::async_trait;

use grimoire_core::result::AppResult;
use grimoire_core::{CharacterId, FolderId, SpellId};
use grimoire_entity::{Character, Folder, FolderListing, Spell};

pub use postgres::{PgCharacterRepository, PgFolderRepository, PgSpellRepository};

/// Storage access for the folder hierarchy.
#[async_trait]
pub trait FolderRepository: Send + Sync + Debug + 'static {
    /// Every folder, root included. Used as a consistent snapshot.
    async fn list_all(&self) -> AppResult<Vec<Folder>>;

    /// Find a folder by ID.
    async fn find_by_id(&self, id: FolderId) -> AppResult<Option<Folder>>;

    /// Resolve a sequence of folder names, starting below the root.
    /// An empty sequence resolves to the root.
    async fn find_by_path(&self, segments: &[String]) -> AppResult<Option<Folder>>;

    /// Find the direct child of `parent_id` called `name`.
    async fn find_child(&self, parent_id: FolderId, name: &str) -> AppResult<Option<Folder>>;

    /// Create a folder and return its ID.
    async fn create(&self, name: &str, parent_id: FolderId) -> AppResult<FolderId>;

    /// Delete a single folder. Returns `true` if a row was removed.
    async fn delete(&self, id: FolderId) -> AppResult<bool>;

    /// Rename a folder.
    async fn rename(&self, id: FolderId, name: &str) -> AppResult<Folder>;

    /// Attach a folder to a new parent.
    async fn move_folder(&self, id: FolderId, parent_id: FolderId) -> AppResult<Folder>;

    /// Check whether a folder exists.
    async fn exists(&self, id: FolderId) -> AppResult<bool>;

    /// Check whether a folder has neither spells nor subfolders.
    async fn is_empty(&self, id: FolderId) -> AppResult<bool>;

    /// Check whether any spell is filed directly in the folder.
    async fn has_spells(&self, id: FolderId) -> AppResult<bool>;

    /// Check whether the folder has direct child folders.
    async fn has_subfolders(&self, id: FolderId) -> AppResult<bool>;

    /// Direct subfolders and spells of a folder.
    async fn get_contents(&self, id: FolderId) -> AppResult<FolderListing>;

    /// Atomically delete a folder, its descendants, and every spell they
    /// contain. Returns the number of folders removed.
    async fn delete_recursive(&self, id: FolderId) -> AppResult<u64>;

    /// Atomically hand direct subfolders and spells to the folder's parent,
    /// then delete the folder. A child may share the removed folder's name.
    async fn move_contents_to_parent(&self, id: FolderId) -> AppResult<()>;
}

/// Storage access for spells, limited to what the folder and relationship
/// services need.
#[async_trait]
pub trait SpellRepository: Send + Sync + Debug + 'static {
    /// Find a spell by ID.
    async fn find_by_id(&self, id: SpellId) -> AppResult<Option<Spell>>;

    /// Batch lookup. Unknown IDs are skipped.
    async fn find_by_ids(&self, ids: &[SpellId]) -> AppResult<Vec<Spell>>;

    /// Spells filed directly in a folder.
    async fn find_by_folder_id(&self, folder_id: FolderId) -> AppResult<Vec<Spell>>;

    /// Refile every spell from one folder to another. Returns the count moved.
    async fn move_spells_to_folder(&self, from: FolderId, to: FolderId) -> AppResult<u64>;

    /// Direct spell counts per folder. Folders without spells are absent.
    async fn count_by_folders(
        &self,
        folder_ids: &[FolderId],
    ) -> AppResult<HashMap<FolderId, u64>>;
}

/// Storage access for characters and the spells they know.
#[async_trait]
pub trait CharacterRepository: Send + Sync + Debug + 'static {
    /// Find a character, with its known spell IDs, by ID.
    async fn find_by_id(&self, id: CharacterId) -> AppResult<Option<Character>>;

    /// Check whether the character knows the spell.
    async fn has_spell(&self, character_id: CharacterId, spell_id: SpellId) -> AppResult<bool>;

    /// Record that the character knows the spell. Inserting an existing pair
    /// is a no-op.
    async fn add_spell(&self, character_id: CharacterId, spell_id: SpellId) -> AppResult<()>;

    /// Forget the spell. Returns `true` if a pair was removed.
    async fn remove_spell(&self, character_id: CharacterId, spell_id: SpellId) -> AppResult<bool>;
}
