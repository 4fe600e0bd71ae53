//! Folder deletion strategies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use grimoire_core::{AppError, FolderId};

/// How the contents of a folder are handled when it is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeletionStrategy {
    /// Refuse unless the folder has no spells and no subfolders.
    EmptyOnly,
    /// Hand direct subfolders and spells to the parent, then delete.
    MoveToParent,
    /// Delete the whole subtree and every spell inside it.
    Recursive,
}

impl DeletionStrategy {
    /// Return the strategy as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmptyOnly => "empty-only",
            Self::MoveToParent => "move-to-parent",
            Self::Recursive => "recursive",
        }
    }
}

impl fmt::Display for DeletionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DeletionStrategy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "empty-only" => Ok(Self::EmptyOnly),
            "move-to-parent" => Ok(Self::MoveToParent),
            "recursive" => Ok(Self::Recursive),
            _ => Err(AppError::validation(format!(
                "Invalid deletion strategy: '{s}'. Expected one of: empty-only, move-to-parent, recursive"
            ))),
        }
    }
}

/// What a folder deletion did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionOutcome {
    /// The deleted folder.
    pub folder_id: FolderId,
    /// The strategy that was applied.
    pub strategy: DeletionStrategy,
    /// Folders removed, including the target.
    pub folders_removed: u64,
    /// Spells removed along with the folders.
    pub spells_removed: u64,
    /// Subfolders handed to the parent.
    pub folders_reparented: u64,
    /// Spells handed to the parent.
    pub spells_reparented: u64,
}

#[cfg(test)]
mod tests {
    use grimoire_core::ErrorKind;

    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!(
            "empty-only".parse::<DeletionStrategy>().unwrap(),
            DeletionStrategy::EmptyOnly
        );
        assert_eq!(
            "Move-To-Parent".parse::<DeletionStrategy>().unwrap(),
            DeletionStrategy::MoveToParent
        );
        assert_eq!(
            "recursive".parse::<DeletionStrategy>().unwrap(),
            DeletionStrategy::Recursive
        );
    }

    #[test]
    fn test_unknown_strategy_is_validation() {
        let err = "shred".parse::<DeletionStrategy>().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(err.message.contains("shred"));
    }

    #[test]
    fn test_serde_uses_kebab_case() {
        let json = serde_json::to_string(&DeletionStrategy::MoveToParent).unwrap();
        assert_eq!(json, "\"move-to-parent\"");
    }
}
