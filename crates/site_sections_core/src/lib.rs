//! Site section taxonomy policy.
//!
//! Section terms are assigned to pages, media and users; editors may only
//! touch content that shares a section with them. This crate holds the
//! propagation and access rules plus a SQLite-backed assignment store.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod policy;
pub mod repo;
pub mod service;

pub use config::{ConfigurationError, SectionsConfig};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::content::{ContentId, ContentItem, ContentKind};
pub use model::term::{SectionTerm, TermId, TermSet, TermValidationError, LANGUAGES_SLUG};
pub use model::user::{SiteUser, UserId};
pub use model::{Action, EntityRef};
pub use policy::access::{
    can_edit, can_perform, filter_selectable_parents, filter_visible_items, filter_visible_media,
    restrict_term_choices, ParentSelection,
};
pub use policy::propagation::{attachment_terms, propagate_terms, LanguagesBranch};
pub use repo::section_store::{NewContentItem, SectionStore, StoreError, StoreResult};
pub use repo::sqlite_store::SqliteSectionStore;
pub use service::section_service::{SectionService, SectionServiceError, SectionServiceResult};

/// Minimal health-check API for host integration probes.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
