//! PostgreSQL repository implementations.

pub mod character;
pub mod folder;
pub mod spell;

pub use character::PgCharacterRepository;
pub use folder::PgFolderRepository;
pub use spell::PgSpellRepository;

use grimoire_core::error::{AppError, ErrorKind};

/// Unique constraint on `(parent_id, name)`.
const SIBLING_NAME_CONSTRAINT: &str = "folders_parent_id_name_key";

/// Foreign key from a folder to its parent.
const PARENT_FK_CONSTRAINT: &str = "folders_parent_id_fkey";

/// Map a failed read to a database error.
pub(crate) fn read_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Database, context, e)
}

/// Map a failed folder write, translating known constraint violations.
pub(crate) fn folder_write_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| match e {
        sqlx::Error::Database(ref db_err)
            if db_err.constraint() == Some(SIBLING_NAME_CONSTRAINT) =>
        {
            AppError::conflict("A folder with that name already exists in the target folder")
        }
        sqlx::Error::Database(ref db_err) if db_err.constraint() == Some(PARENT_FK_CONSTRAINT) => {
            AppError::not_found("Parent folder not found")
        }
        _ => AppError::with_source(ErrorKind::Database, context, e),
    }
}
