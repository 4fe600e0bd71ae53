//! Character and spell relationship services.

pub mod service;

pub use service::{RelationshipService, is_eligible};
