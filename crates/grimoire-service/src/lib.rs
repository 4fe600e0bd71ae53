//! # grimoire-service
//!
//! Domain-consistency layer for Grimoire. [`FolderService`] and
//! [`TreeService`] own the folder hierarchy invariants; [`RelationshipService`]
//! owns the character/spell association and its convocation gate.
//!
//! Services follow constructor injection: repositories are provided at
//! construction time as `Arc<dyn ...>` handles and no state is kept
//! between calls.

pub mod character;
pub mod folder;
pub mod validation;

pub use character::{RelationshipService, is_eligible};
pub use folder::{FolderService, FolderSnapshot, TreeService};
