//! Folder domain entities.

pub mod contents;
pub mod model;
pub mod strategy;
pub mod tree;

pub use contents::{FolderContents, FolderListing};
pub use model::Folder;
pub use strategy::{DeletionOutcome, DeletionStrategy};
pub use tree::FolderNode;
