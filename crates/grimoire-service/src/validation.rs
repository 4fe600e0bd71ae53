//! Input shape checks shared by the services.

use grimoire_core::{AppError, AppResult};
use grimoire_entity::folder::model::PATH_SEPARATORS;

/// Validate a folder name and return it trimmed.
pub fn validate_folder_name(name: &str) -> AppResult<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("Folder name cannot be empty"));
    }
    if let Some(sep) = trimmed.chars().find(|c| PATH_SEPARATORS.contains(c)) {
        return Err(AppError::validation(format!(
            "Folder name '{trimmed}' cannot contain '{sep}'"
        )));
    }
    Ok(trimmed)
}

/// Split a slash-separated folder path into trimmed, non-empty segments.
pub fn split_path(path: &str) -> Vec<String> {
    path.split('/')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use grimoire_core::ErrorKind;

    use super::*;

    #[test]
    fn test_name_is_trimmed() {
        assert_eq!(validate_folder_name("  Elementalism ").unwrap(), "Elementalism");
    }

    #[test]
    fn test_blank_name_rejected() {
        assert_eq!(
            validate_folder_name("   ").unwrap_err().kind,
            ErrorKind::Validation
        );
        assert!(validate_folder_name("").is_err());
    }

    #[test]
    fn test_separators_rejected() {
        assert!(validate_folder_name("Fire/Bolts").is_err());
        assert!(validate_folder_name("Fire\\Bolts").is_err());
        assert!(validate_folder_name("Fire-Bolts").is_ok());
    }

    #[test]
    fn test_split_path() {
        assert_eq!(split_path("/Fire/ Bolts /"), vec!["Fire", "Bolts"]);
        assert!(split_path("/").is_empty());
        assert!(split_path("").is_empty());
    }
}
