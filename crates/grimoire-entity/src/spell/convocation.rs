//! Convocation (magic school) enumeration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use grimoire_core::AppError;

/// The magic school a spell belongs to.
///
/// Six schools plus `Neutral`, which every character may learn. Stored as
/// the PostgreSQL enum `convocation` (arrays as `_convocation`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "convocation", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Convocation {
    /// Light and air.
    Lyahvi,
    /// Fire.
    Peleahn,
    /// Metal and crafting.
    Jmorvi,
    /// Earth and growth.
    Fyvria,
    /// Water.
    Odivshe,
    /// Mind and spirit.
    Savorya,
    /// Belongs to no school.
    Neutral,
}

impl Convocation {
    /// The six schools, excluding `Neutral`.
    pub const SCHOOLS: [Convocation; 6] = [
        Self::Lyahvi,
        Self::Peleahn,
        Self::Jmorvi,
        Self::Fyvria,
        Self::Odivshe,
        Self::Savorya,
    ];

    /// Returns whether this is the neutral tag.
    pub fn is_neutral(&self) -> bool {
        matches!(self, Self::Neutral)
    }

    /// Return the convocation as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lyahvi => "lyahvi",
            Self::Peleahn => "peleahn",
            Self::Jmorvi => "jmorvi",
            Self::Fyvria => "fyvria",
            Self::Odivshe => "odivshe",
            Self::Savorya => "savorya",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Convocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Convocation {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lyahvi" => Ok(Self::Lyahvi),
            "peleahn" => Ok(Self::Peleahn),
            "jmorvi" => Ok(Self::Jmorvi),
            "fyvria" => Ok(Self::Fyvria),
            "odivshe" => Ok(Self::Odivshe),
            "savorya" => Ok(Self::Savorya),
            "neutral" => Ok(Self::Neutral),
            _ => Err(AppError::validation(format!(
                "Invalid convocation: '{s}'. Expected one of: lyahvi, peleahn, jmorvi, fyvria, odivshe, savorya, neutral"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!("Lyahvi".parse::<Convocation>().unwrap(), Convocation::Lyahvi);
        assert_eq!("PELEAHN".parse::<Convocation>().unwrap(), Convocation::Peleahn);
        assert!("necromancy".parse::<Convocation>().is_err());
    }

    #[test]
    fn test_schools_exclude_neutral() {
        assert_eq!(Convocation::SCHOOLS.len(), 6);
        assert!(!Convocation::SCHOOLS.contains(&Convocation::Neutral));
        assert!(Convocation::Neutral.is_neutral());
    }

    #[test]
    fn test_display_matches_serde() {
        for conv in Convocation::SCHOOLS {
            let json = serde_json::to_string(&conv).unwrap();
            assert_eq!(json, format!("\"{conv}\""));
        }
    }
}
