//! Core type definitions used across the Grimoire workspace.

pub mod id;

pub use id::{CharacterId, FolderId, SpellId};
