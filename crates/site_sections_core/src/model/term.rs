//! Section term domain model.
//!
//! # Responsibility
//! - Define the taxonomy node used to partition the site into projects.
//! - Normalize and validate term slugs before they reach storage.
//!
//! # Invariants
//! - `slug` is lowercase, non-empty and unique across all terms.
//! - The `parent_id` relation forms a forest (no cycles).
//! - Term sets iterate in a deterministic order.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

static SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(?:[-_][a-z0-9]+)*$").expect("valid slug regex"));

/// Stable identifier of one section term.
pub type TermId = Uuid;

/// Set of assigned section terms.
///
/// `BTreeSet` keeps iteration stable so written-back assignments and log
/// output are reproducible.
pub type TermSet = BTreeSet<TermId>;

/// Default slug of the reserved languages branch root.
pub const LANGUAGES_SLUG: &str = "languages";

/// One node of the site section taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionTerm {
    pub id: TermId,
    /// Lowercase URL-safe key, unique across the taxonomy.
    pub slug: String,
    /// Human-readable label.
    pub name: String,
    /// Parent term. `None` means top-level.
    pub parent_id: Option<TermId>,
}

impl SectionTerm {
    /// Creates a term with a generated id after validating slug and name.
    pub fn new(
        slug: &str,
        name: impl Into<String>,
        parent_id: Option<TermId>,
    ) -> Result<Self, TermValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(TermValidationError::EmptyName);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            slug: normalize_slug(slug)?,
            name: name.trim().to_string(),
            parent_id,
        })
    }

    /// Returns whether this term sits at the top of the forest.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Validation errors for section term input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermValidationError {
    EmptySlug,
    InvalidSlug(String),
    EmptyName,
}

impl Display for TermValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySlug => write!(f, "term slug must not be empty"),
            Self::InvalidSlug(value) => write!(f, "invalid term slug: `{value}`"),
            Self::EmptyName => write!(f, "term name must not be blank"),
        }
    }
}

impl Error for TermValidationError {}

/// Normalizes one slug value (trim + lowercase) and validates its shape.
pub fn normalize_slug(value: &str) -> Result<String, TermValidationError> {
    let normalized = value.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(TermValidationError::EmptySlug);
    }
    if !SLUG_RE.is_match(&normalized) {
        return Err(TermValidationError::InvalidSlug(value.to_string()));
    }
    Ok(normalized)
}
