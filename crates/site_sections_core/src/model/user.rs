//! Site user domain model.

use crate::model::term::TermSet;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of one site user.
pub type UserId = Uuid;

/// Editor account with its section assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteUser {
    pub id: UserId,
    pub display_name: String,
    pub assigned_terms: TermSet,
    /// Elevated capability that bypasses every section restriction.
    pub is_administrator: bool,
}

impl SiteUser {
    /// Creates a user with a generated id and no sections.
    pub fn new(display_name: impl Into<String>, is_administrator: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            display_name: display_name.into(),
            assigned_terms: TermSet::new(),
            is_administrator,
        }
    }
}
