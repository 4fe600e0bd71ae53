//! Shared test helpers for service integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use grimoire_core::{CharacterId, FolderId, SpellId};
use grimoire_database::MemoryStore;
use grimoire_entity::Convocation;
use grimoire_service::{FolderService, RelationshipService, TreeService};

/// Services wired to one in-memory store.
pub struct TestApp {
    /// The backing store, for seeding and direct inspection.
    pub store: Arc<MemoryStore>,
    /// Folder service under test.
    pub folders: FolderService,
    /// Tree service under test.
    pub trees: TreeService,
    /// Relationship service under test.
    pub relationships: RelationshipService,
}

impl TestApp {
    /// Create services over a freshly seeded store.
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            folders: FolderService::new(store.clone(), store.clone()),
            trees: TreeService::new(store.clone(), store.clone()),
            relationships: RelationshipService::new(store.clone(), store.clone()),
            store,
        }
    }

    /// Create a folder, panicking on failure.
    pub async fn folder(&self, name: &str, parent: FolderId) -> FolderId {
        self.folders
            .create_folder(name, Some(parent))
            .await
            .expect("Failed to create folder")
    }

    /// File a spell, panicking on failure.
    pub async fn spell(&self, name: &str, convocation: Convocation, folder: FolderId) -> SpellId {
        self.store
            .insert_spell(name, convocation, 1, Some(folder))
            .await
            .expect("Failed to insert spell")
    }

    /// Register a character, panicking on failure.
    pub async fn character(&self, name: &str, convocations: &[Convocation]) -> CharacterId {
        self.store
            .insert_character(name, convocations.to_vec())
            .await
            .expect("Failed to insert character")
    }
}
