//! Spell domain entities.

pub mod convocation;
pub mod model;

pub use convocation::Convocation;
pub use model::Spell;
