//! Convenience result type alias for Grimoire.

use crate::error::AppError;

/// A specialized `Result` type for Grimoire operations.
pub type AppResult<T> = Result<T, AppError>;
