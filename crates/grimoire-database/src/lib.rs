//! # grimoire-database
//!
//! Repository traits consumed by the service layer, their PostgreSQL
//! implementations, connection management, and an in-memory store that
//! implements the same traits.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use repositories::{CharacterRepository, FolderRepository, SpellRepository};
