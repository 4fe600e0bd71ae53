//! Folder hierarchy management and tree services.

pub mod service;
pub mod snapshot;
pub mod tree;

pub use service::FolderService;
pub use snapshot::FolderSnapshot;
pub use tree::TreeService;
