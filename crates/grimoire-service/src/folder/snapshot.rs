//! In-memory view of the whole folder hierarchy.
//!
//! Structural checks (cycles, descendants, sibling names) run against one
//! snapshot loaded with a single `list_all` call, so a decision never mixes
//! two states of the tree.

use std::collections::HashMap;

use grimoire_core::{AppError, AppResult, FolderId};
use grimoire_database::FolderRepository;
use grimoire_entity::Folder;

/// A consistent, read-only copy of every folder.
#[derive(Debug, Clone)]
pub struct FolderSnapshot {
    folders: HashMap<FolderId, Folder>,
    children: HashMap<FolderId, Vec<FolderId>>,
}

impl FolderSnapshot {
    /// Build a snapshot from a flat folder list.
    pub fn new(folders: Vec<Folder>) -> Self {
        let mut children: HashMap<FolderId, Vec<FolderId>> = HashMap::new();
        for folder in &folders {
            if let Some(parent_id) = folder.parent_id {
                children.entry(parent_id).or_default().push(folder.id);
            }
        }

        let folders: HashMap<FolderId, Folder> =
            folders.into_iter().map(|f| (f.id, f)).collect();

        for ids in children.values_mut() {
            ids.sort_by(|a, b| folders[a].name.cmp(&folders[b].name));
        }

        Self { folders, children }
    }

    /// Load a snapshot through the repository.
    pub async fn load(repo: &dyn FolderRepository) -> AppResult<Self> {
        Ok(Self::new(repo.list_all().await?))
    }

    /// Look up a folder.
    pub fn get(&self, id: FolderId) -> Option<&Folder> {
        self.folders.get(&id)
    }

    /// Look up a folder, failing with `NotFound`.
    pub fn require(&self, id: FolderId) -> AppResult<&Folder> {
        self.get(id)
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))
    }

    /// Direct children of a folder, ordered by name.
    pub fn children(&self, id: FolderId) -> impl Iterator<Item = &Folder> {
        self.children
            .get(&id)
            .into_iter()
            .flatten()
            .filter_map(|child| self.folders.get(child))
    }

    /// The child of `parent_id` called `name`, ignoring `except`.
    pub fn sibling_named(
        &self,
        parent_id: FolderId,
        name: &str,
        except: Option<FolderId>,
    ) -> Option<&Folder> {
        self.children(parent_id)
            .find(|f| f.name == name && Some(f.id) != except)
    }

    /// Every descendant of `id` in breadth-first order, excluding `id`.
    pub fn descendants(&self, id: FolderId) -> Vec<FolderId> {
        let mut out = Vec::new();
        let mut cursor = 0;
        out.extend(self.children(id).map(|f| f.id));
        while cursor < out.len() {
            let current = out[cursor];
            cursor += 1;
            out.extend(self.children(current).map(|f| f.id));
        }
        out
    }

    /// Whether `ancestor` is `id` itself or lies on the chain from `id` up
    /// to the root.
    ///
    /// Fails with an internal error if the stored parent links are broken
    /// (dangling parent or a pre-existing loop).
    pub fn is_self_or_ancestor(&self, ancestor: FolderId, id: FolderId) -> AppResult<bool> {
        let mut current = id;
        for _ in 0..=self.folders.len() {
            if current == ancestor {
                return Ok(true);
            }
            let folder = self.folders.get(&current).ok_or_else(|| {
                AppError::internal(format!("Folder {current} references a missing parent"))
            })?;
            match folder.parent_id {
                Some(parent_id) => current = parent_id,
                None => return Ok(false),
            }
        }
        Err(AppError::internal(format!(
            "Folder hierarchy above {id} contains a cycle"
        )))
    }

    /// Folders from the root down to `id`, inclusive.
    pub fn path_to(&self, id: FolderId) -> AppResult<Vec<&Folder>> {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(folder_id) = current {
            if chain.len() > self.folders.len() {
                return Err(AppError::internal(format!(
                    "Folder hierarchy above {id} contains a cycle"
                )));
            }
            let folder = self.require(folder_id)?;
            chain.push(folder);
            current = folder.parent_id;
        }
        chain.reverse();
        Ok(chain)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use grimoire_core::ErrorKind;

    use super::*;

    fn folder(id: i64, name: &str, parent: Option<i64>) -> Folder {
        Folder {
            id: FolderId(id),
            name: name.to_string(),
            parent_id: parent.map(FolderId),
            created_at: Utc::now(),
        }
    }

    fn sample() -> FolderSnapshot {
        FolderSnapshot::new(vec![
            folder(1, "root", None),
            folder(2, "Fire", Some(1)),
            folder(3, "Bolts", Some(2)),
            folder(4, "Walls", Some(2)),
            folder(5, "Water", Some(1)),
            folder(6, "Lances", Some(3)),
        ])
    }

    #[test]
    fn test_children_sorted_by_name() {
        let snapshot = sample();
        let names: Vec<&str> = snapshot
            .children(FolderId(2))
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["Bolts", "Walls"]);
    }

    #[test]
    fn test_descendants() {
        let snapshot = sample();
        let mut ids = snapshot.descendants(FolderId(2));
        ids.sort();
        assert_eq!(ids, vec![FolderId(3), FolderId(4), FolderId(6)]);
        assert!(snapshot.descendants(FolderId(6)).is_empty());
    }

    #[test]
    fn test_is_self_or_ancestor() {
        let snapshot = sample();
        assert!(snapshot.is_self_or_ancestor(FolderId(2), FolderId(6)).unwrap());
        assert!(snapshot.is_self_or_ancestor(FolderId(6), FolderId(6)).unwrap());
        assert!(!snapshot.is_self_or_ancestor(FolderId(5), FolderId(6)).unwrap());
        assert!(!snapshot.is_self_or_ancestor(FolderId(3), FolderId(2)).unwrap());
    }

    #[test]
    fn test_corrupt_loop_is_reported() {
        let snapshot = FolderSnapshot::new(vec![
            folder(1, "root", None),
            folder(2, "A", Some(3)),
            folder(3, "B", Some(2)),
        ]);
        let err = snapshot
            .is_self_or_ancestor(FolderId(1), FolderId(2))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Internal);
    }

    #[test]
    fn test_sibling_named_excludes_self() {
        let snapshot = sample();
        assert!(snapshot.sibling_named(FolderId(2), "Bolts", None).is_some());
        assert!(
            snapshot
                .sibling_named(FolderId(2), "Bolts", Some(FolderId(3)))
                .is_none()
        );
    }

    #[test]
    fn test_path_to() {
        let snapshot = sample();
        let names: Vec<&str> = snapshot
            .path_to(FolderId(6))
            .unwrap()
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["root", "Fire", "Bolts", "Lances"]);
        assert_eq!(
            snapshot.path_to(FolderId(99)).unwrap_err().kind,
            ErrorKind::NotFound
        );
    }
}
