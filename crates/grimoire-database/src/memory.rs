//! In-memory implementation of every repository trait.
//!
//! One lock guards folders, spells, characters, and the association, so
//! each multi-step primitive is applied as a unit. The store mirrors the
//! PostgreSQL constraints: sibling names are unique, folders holding spells
//! cannot be deleted singly, and removing a spell drops its associations.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use grimoire_core::error::AppError;
use grimoire_core::result::AppResult;
use grimoire_core::{CharacterId, FolderId, SpellId};
use grimoire_entity::{Character, Convocation, Folder, FolderListing, Spell};

use crate::repositories::{CharacterRepository, FolderRepository, SpellRepository};

/// Name given to the seeded root folder.
pub const ROOT_FOLDER_NAME: &str = "root";

/// Shared in-memory catalog.
#[derive(Debug)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

#[derive(Debug)]
struct MemoryState {
    folders: BTreeMap<FolderId, Folder>,
    spells: BTreeMap<SpellId, Spell>,
    characters: BTreeMap<CharacterId, Character>,
    relations: BTreeSet<(CharacterId, SpellId)>,
    next_folder_id: i64,
    next_spell_id: i64,
    next_character_id: i64,
}

impl MemoryState {
    fn seeded() -> Self {
        let root = Folder {
            id: FolderId::ROOT,
            name: ROOT_FOLDER_NAME.to_string(),
            parent_id: None,
            created_at: Utc::now(),
        };

        Self {
            folders: BTreeMap::from([(root.id, root)]),
            spells: BTreeMap::new(),
            characters: BTreeMap::new(),
            relations: BTreeSet::new(),
            next_folder_id: FolderId::ROOT.get() + 1,
            next_spell_id: 1,
            next_character_id: 1,
        }
    }

    fn children(&self, parent_id: FolderId) -> impl Iterator<Item = &Folder> {
        self.folders
            .values()
            .filter(move |f| f.parent_id == Some(parent_id))
    }

    fn name_taken(&self, parent_id: FolderId, name: &str, except: Option<FolderId>) -> bool {
        self.children(parent_id)
            .any(|f| f.name == name && Some(f.id) != except)
    }

    fn has_spells(&self, id: FolderId) -> bool {
        self.spells.values().any(|s| s.folder_id == id)
    }

    fn has_subfolders(&self, id: FolderId) -> bool {
        self.children(id).next().is_some()
    }

    fn sibling_conflict() -> AppError {
        AppError::conflict("A folder with that name already exists in the target folder")
    }

    fn folder_not_found(id: FolderId) -> AppError {
        AppError::not_found(format!("Folder {id} not found"))
    }

    fn character_view(&self, character: &Character) -> Character {
        let mut view = character.clone();
        view.known_spell_ids = self
            .relations
            .range((character.id, SpellId(i64::MIN))..=(character.id, SpellId(i64::MAX)))
            .map(|(_, spell_id)| *spell_id)
            .collect();
        view
    }
}

impl MemoryStore {
    /// Create a store holding only the root folder.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MemoryState::seeded()),
        }
    }

    /// File a new spell. `None` files it in the root folder.
    pub async fn insert_spell(
        &self,
        name: &str,
        convocation: Convocation,
        level: i32,
        folder_id: Option<FolderId>,
    ) -> AppResult<SpellId> {
        let mut state = self.state.write().await;
        let folder_id = folder_id.unwrap_or(FolderId::ROOT);
        if !state.folders.contains_key(&folder_id) {
            return Err(MemoryState::folder_not_found(folder_id));
        }

        let id = SpellId(state.next_spell_id);
        state.next_spell_id += 1;
        state.spells.insert(
            id,
            Spell {
                id,
                name: name.to_string(),
                convocation,
                level,
                folder_id,
                created_at: Utc::now(),
            },
        );
        Ok(id)
    }

    /// Register a new character with no known spells.
    pub async fn insert_character(
        &self,
        name: &str,
        convocations: Vec<Convocation>,
    ) -> AppResult<CharacterId> {
        let mut state = self.state.write().await;
        let id = CharacterId(state.next_character_id);
        state.next_character_id += 1;
        state.characters.insert(
            id,
            Character {
                id,
                name: name.to_string(),
                convocations,
                known_spell_ids: Vec::new(),
                created_at: Utc::now(),
            },
        );
        Ok(id)
    }

    /// Number of spells in the catalog.
    pub async fn spell_count(&self) -> usize {
        self.state.read().await.spells.len()
    }

    /// Number of folders, root included.
    pub async fn folder_count(&self) -> usize {
        self.state.read().await.folders.len()
    }

    /// Every (character, spell) pair in the association.
    pub async fn relations(&self) -> Vec<(CharacterId, SpellId)> {
        self.state.read().await.relations.iter().copied().collect()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FolderRepository for MemoryStore {
    async fn list_all(&self) -> AppResult<Vec<Folder>> {
        Ok(self.state.read().await.folders.values().cloned().collect())
    }

    async fn find_by_id(&self, id: FolderId) -> AppResult<Option<Folder>> {
        Ok(self.state.read().await.folders.get(&id).cloned())
    }

    async fn find_by_path(&self, segments: &[String]) -> AppResult<Option<Folder>> {
        let state = self.state.read().await;
        let mut current = FolderId::ROOT;
        for segment in segments {
            match state.children(current).find(|f| &f.name == segment) {
                Some(folder) => current = folder.id,
                None => return Ok(None),
            }
        }
        Ok(state.folders.get(&current).cloned())
    }

    async fn find_child(&self, parent_id: FolderId, name: &str) -> AppResult<Option<Folder>> {
        let state = self.state.read().await;
        Ok(state.children(parent_id).find(|f| f.name == name).cloned())
    }

    async fn create(&self, name: &str, parent_id: FolderId) -> AppResult<FolderId> {
        let mut state = self.state.write().await;
        if !state.folders.contains_key(&parent_id) {
            return Err(AppError::not_found("Parent folder not found"));
        }
        if state.name_taken(parent_id, name, None) {
            return Err(MemoryState::sibling_conflict());
        }

        let id = FolderId(state.next_folder_id);
        state.next_folder_id += 1;
        state.folders.insert(
            id,
            Folder {
                id,
                name: name.to_string(),
                parent_id: Some(parent_id),
                created_at: Utc::now(),
            },
        );
        Ok(id)
    }

    async fn delete(&self, id: FolderId) -> AppResult<bool> {
        let mut state = self.state.write().await;
        match state.folders.get(&id) {
            Some(folder) if !folder.is_root() => {}
            _ => return Ok(false),
        }
        if state.has_spells(id) || state.has_subfolders(id) {
            return Err(AppError::database(format!(
                "Folder {id} is still referenced by spells or subfolders"
            )));
        }
        Ok(state.folders.remove(&id).is_some())
    }

    async fn rename(&self, id: FolderId, name: &str) -> AppResult<Folder> {
        let mut state = self.state.write().await;
        let parent_id = state
            .folders
            .get(&id)
            .and_then(|f| f.parent_id)
            .ok_or_else(|| MemoryState::folder_not_found(id))?;
        if state.name_taken(parent_id, name, Some(id)) {
            return Err(MemoryState::sibling_conflict());
        }

        let folder = state
            .folders
            .get_mut(&id)
            .ok_or_else(|| MemoryState::folder_not_found(id))?;
        folder.name = name.to_string();
        Ok(folder.clone())
    }

    async fn move_folder(&self, id: FolderId, parent_id: FolderId) -> AppResult<Folder> {
        let mut state = self.state.write().await;
        let name = match state.folders.get(&id) {
            Some(folder) if !folder.is_root() => folder.name.clone(),
            _ => return Err(MemoryState::folder_not_found(id)),
        };
        if !state.folders.contains_key(&parent_id) {
            return Err(AppError::not_found("Parent folder not found"));
        }
        if state.name_taken(parent_id, &name, Some(id)) {
            return Err(MemoryState::sibling_conflict());
        }

        let folder = state
            .folders
            .get_mut(&id)
            .ok_or_else(|| MemoryState::folder_not_found(id))?;
        folder.parent_id = Some(parent_id);
        Ok(folder.clone())
    }

    async fn exists(&self, id: FolderId) -> AppResult<bool> {
        Ok(self.state.read().await.folders.contains_key(&id))
    }

    async fn is_empty(&self, id: FolderId) -> AppResult<bool> {
        let state = self.state.read().await;
        Ok(!state.has_spells(id) && !state.has_subfolders(id))
    }

    async fn has_spells(&self, id: FolderId) -> AppResult<bool> {
        Ok(self.state.read().await.has_spells(id))
    }

    async fn has_subfolders(&self, id: FolderId) -> AppResult<bool> {
        Ok(self.state.read().await.has_subfolders(id))
    }

    async fn get_contents(&self, id: FolderId) -> AppResult<FolderListing> {
        let state = self.state.read().await;
        let mut subfolders: Vec<Folder> = state.children(id).cloned().collect();
        subfolders.sort_by(|a, b| a.name.cmp(&b.name));
        let mut spells: Vec<Spell> = state
            .spells
            .values()
            .filter(|s| s.folder_id == id)
            .cloned()
            .collect();
        spells.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(FolderListing { subfolders, spells })
    }

    async fn delete_recursive(&self, id: FolderId) -> AppResult<u64> {
        let mut state = self.state.write().await;
        match state.folders.get(&id) {
            Some(folder) if !folder.is_root() => {}
            _ => return Err(MemoryState::folder_not_found(id)),
        }

        let mut subtree = BTreeSet::from([id]);
        let mut frontier = vec![id];
        while let Some(current) = frontier.pop() {
            let children: Vec<FolderId> = state.children(current).map(|f| f.id).collect();
            for child in children {
                if subtree.insert(child) {
                    frontier.push(child);
                }
            }
        }

        let doomed: BTreeSet<SpellId> = state
            .spells
            .values()
            .filter(|s| subtree.contains(&s.folder_id))
            .map(|s| s.id)
            .collect();

        state.spells.retain(|spell_id, _| !doomed.contains(spell_id));
        state
            .relations
            .retain(|(_, spell_id)| !doomed.contains(spell_id));
        state.folders.retain(|folder_id, _| !subtree.contains(folder_id));

        debug!(
            folder_id = %id,
            folders = subtree.len(),
            spells = doomed.len(),
            "Subtree removed"
        );

        Ok(subtree.len() as u64)
    }

    async fn move_contents_to_parent(&self, id: FolderId) -> AppResult<()> {
        let mut state = self.state.write().await;
        let parent_id = match state.folders.get(&id) {
            Some(folder) => folder
                .parent_id
                .ok_or_else(|| AppError::validation("The root folder cannot be deleted"))?,
            None => return Err(MemoryState::folder_not_found(id)),
        };

        let moving: Vec<(FolderId, String)> = state
            .children(id)
            .map(|f| (f.id, f.name.clone()))
            .collect();
        if moving
            .iter()
            .any(|(_, name)| state.name_taken(parent_id, name, Some(id)))
        {
            return Err(MemoryState::sibling_conflict());
        }

        for (child_id, _) in &moving {
            if let Some(child) = state.folders.get_mut(child_id) {
                child.parent_id = Some(parent_id);
            }
        }
        for spell in state.spells.values_mut().filter(|s| s.folder_id == id) {
            spell.folder_id = parent_id;
        }
        state.folders.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl SpellRepository for MemoryStore {
    async fn find_by_id(&self, id: SpellId) -> AppResult<Option<Spell>> {
        Ok(self.state.read().await.spells.get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[SpellId]) -> AppResult<Vec<Spell>> {
        let state = self.state.read().await;
        let wanted: BTreeSet<SpellId> = ids.iter().copied().collect();
        let mut spells: Vec<Spell> = wanted
            .iter()
            .filter_map(|id| state.spells.get(id).cloned())
            .collect();
        spells.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(spells)
    }

    async fn find_by_folder_id(&self, folder_id: FolderId) -> AppResult<Vec<Spell>> {
        let state = self.state.read().await;
        let mut spells: Vec<Spell> = state
            .spells
            .values()
            .filter(|s| s.folder_id == folder_id)
            .cloned()
            .collect();
        spells.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(spells)
    }

    async fn move_spells_to_folder(&self, from: FolderId, to: FolderId) -> AppResult<u64> {
        let mut state = self.state.write().await;
        if !state.folders.contains_key(&to) {
            return Err(MemoryState::folder_not_found(to));
        }
        let mut moved = 0;
        for spell in state.spells.values_mut().filter(|s| s.folder_id == from) {
            spell.folder_id = to;
            moved += 1;
        }
        Ok(moved)
    }

    async fn count_by_folders(
        &self,
        folder_ids: &[FolderId],
    ) -> AppResult<HashMap<FolderId, u64>> {
        let state = self.state.read().await;
        let wanted: BTreeSet<FolderId> = folder_ids.iter().copied().collect();
        let mut counts = HashMap::new();
        for spell in state.spells.values() {
            if wanted.contains(&spell.folder_id) {
                *counts.entry(spell.folder_id).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }
}

#[async_trait]
impl CharacterRepository for MemoryStore {
    async fn find_by_id(&self, id: CharacterId) -> AppResult<Option<Character>> {
        let state = self.state.read().await;
        Ok(state
            .characters
            .get(&id)
            .map(|character| state.character_view(character)))
    }

    async fn has_spell(&self, character_id: CharacterId, spell_id: SpellId) -> AppResult<bool> {
        Ok(self
            .state
            .read()
            .await
            .relations
            .contains(&(character_id, spell_id)))
    }

    async fn add_spell(&self, character_id: CharacterId, spell_id: SpellId) -> AppResult<()> {
        let mut state = self.state.write().await;
        if !state.characters.contains_key(&character_id) || !state.spells.contains_key(&spell_id) {
            return Err(AppError::not_found(format!(
                "Character {character_id} or spell {spell_id} not found"
            )));
        }
        state.relations.insert((character_id, spell_id));
        Ok(())
    }

    async fn remove_spell(&self, character_id: CharacterId, spell_id: SpellId) -> AppResult<bool> {
        Ok(self
            .state
            .write()
            .await
            .relations
            .remove(&(character_id, spell_id)))
    }
}
