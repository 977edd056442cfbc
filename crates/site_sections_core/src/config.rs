//! Runtime configuration for the section policy.
//!
//! # Responsibility
//! - Carry the reserved languages slug and logging settings.
//! - Report configuration faults as `ConfigurationError`.
//!
//! # Invariants
//! - A validated config always has a normalized, non-empty languages slug.

use crate::logging::default_log_level;
use crate::model::term::{normalize_slug, LANGUAGES_SLUG};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Configuration faults the host must surface instead of proceeding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// The reserved languages term cannot be resolved by slug.
    MissingLanguagesTerm { slug: String },
    /// The configured languages slug is blank or malformed.
    InvalidLanguagesSlug(String),
}

impl Display for ConfigurationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingLanguagesTerm { slug } => {
                write!(f, "reserved languages term `{slug}` does not exist")
            }
            Self::InvalidLanguagesSlug(value) => {
                write!(f, "invalid languages slug: `{value}`")
            }
        }
    }
}

impl Error for ConfigurationError {}

/// Section policy configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionsConfig {
    /// Slug of the languages branch root and of the page that carries it.
    pub languages_slug: String,
    /// Log level passed to `init_logging`.
    pub log_level: String,
    /// Absolute log directory. `None` leaves logging to the host.
    pub log_dir: Option<String>,
}

impl Default for SectionsConfig {
    fn default() -> Self {
        Self {
            languages_slug: LANGUAGES_SLUG.to_string(),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl SectionsConfig {
    /// Returns a copy with the languages slug normalized.
    pub fn validate(mut self) -> Result<Self, ConfigurationError> {
        self.languages_slug = normalize_slug(&self.languages_slug)
            .map_err(|_| ConfigurationError::InvalidLanguagesSlug(self.languages_slug.clone()))?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigurationError, SectionsConfig};

    #[test]
    fn default_config_uses_languages_slug() {
        let config = SectionsConfig::default().validate().unwrap();
        assert_eq!(config.languages_slug, "languages");
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn validate_normalizes_slug_case() {
        let config = SectionsConfig {
            languages_slug: " Lenguas ".to_string(),
            ..SectionsConfig::default()
        };
        assert_eq!(config.validate().unwrap().languages_slug, "lenguas");
    }

    #[test]
    fn validate_rejects_blank_slug() {
        let config = SectionsConfig {
            languages_slug: "  ".to_string(),
            ..SectionsConfig::default()
        };
        assert_eq!(
            config.validate().unwrap_err(),
            ConfigurationError::InvalidLanguagesSlug("  ".to_string())
        );
    }
}
