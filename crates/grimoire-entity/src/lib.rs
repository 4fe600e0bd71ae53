//! # grimoire-entity
//!
//! Domain entity models for Grimoire. Every struct in this crate represents
//! a database table row or a domain value object. All entities derive
//! `Debug`, `Clone`, `Serialize`, `Deserialize`, and database rows
//! additionally derive `sqlx::FromRow`.

pub mod character;
pub mod folder;
pub mod spell;

pub use character::Character;
pub use folder::{
    DeletionOutcome, DeletionStrategy, Folder, FolderContents, FolderListing, FolderNode,
};
pub use spell::{Convocation, Spell};
