//! Section assignment store contract.
//!
//! # Responsibility
//! - Describe the narrow read/write surface the policy consumes.
//! - Provide semantic store errors in addition to DB transport errors.
//!
//! # Invariants
//! - `set_assigned_terms(.., append=false)` replaces the whole set atomically.
//! - `ancestor_chain` is ordered nearest to furthest.
//! - `descendant_term_ids` never contains the queried term itself.

use crate::db::DbError;
use crate::model::content::{ContentId, ContentItem, ContentKind};
use crate::model::term::{SectionTerm, TermId, TermSet, TermValidationError};
use crate::model::user::{SiteUser, UserId};
use crate::model::EntityRef;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from section store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Term input failed validation.
    InvalidTerm(TermValidationError),
    TermNotFound(TermId),
    ContentNotFound(ContentId),
    UserNotFound(UserId),
    /// Another term already uses this slug.
    DuplicateSlug(String),
    /// Requested parent link would create a cycle.
    CycleDetected { id: uuid::Uuid, parent_id: uuid::Uuid },
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Persisted data cannot be converted to a valid read model.
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidTerm(err) => write!(f, "{err}"),
            Self::TermNotFound(id) => write!(f, "section term not found: {id}"),
            Self::ContentNotFound(id) => write!(f, "content item not found: {id}"),
            Self::UserNotFound(id) => write!(f, "site user not found: {id}"),
            Self::DuplicateSlug(slug) => write!(f, "section term slug already exists: {slug}"),
            Self::CycleDetected { id, parent_id } => {
                write!(f, "parent {parent_id} would create cycle for {id}")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "section store requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "section store requires table `{table}`")
            }
            Self::InvalidData(message) => write!(f, "invalid section data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidTerm(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<TermValidationError> for StoreError {
    fn from(value: TermValidationError) -> Self {
        Self::InvalidTerm(value)
    }
}

/// Insert payload for one content item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContentItem {
    pub kind: ContentKind,
    pub parent_id: Option<ContentId>,
    pub author_id: UserId,
    pub slug: String,
    pub title: String,
}

/// Storage contract for terms, content, users and their assignments.
pub trait SectionStore {
    /// Returns the terms assigned to one content item or user.
    fn assigned_terms(&self, entity: EntityRef) -> StoreResult<TermSet>;
    /// Writes terms for one entity; `append=false` replaces, `true` unions.
    fn set_assigned_terms(
        &self,
        entity: EntityRef,
        terms: &TermSet,
        append: bool,
    ) -> StoreResult<()>;
    /// Removes the given terms from one entity.
    fn remove_assigned_terms(&self, entity: EntityRef, terms: &TermSet) -> StoreResult<()>;
    /// Looks up one term by slug.
    fn term_by_slug(&self, slug: &str) -> StoreResult<Option<SectionTerm>>;
    /// Returns every term below `term_id`, at any depth.
    fn descendant_term_ids(&self, term_id: TermId) -> StoreResult<TermSet>;
    /// Returns the ancestors of one content item, nearest first.
    fn ancestor_chain(&self, content_id: ContentId) -> StoreResult<Vec<ContentItem>>;
    /// Returns the parent of one content item.
    fn parent_id(&self, content_id: ContentId) -> StoreResult<Option<ContentId>>;

    /// Creates one section term.
    fn create_term(
        &self,
        slug: &str,
        name: &str,
        parent_id: Option<TermId>,
    ) -> StoreResult<SectionTerm>;
    /// Moves one term under another parent (or to the top level).
    fn set_term_parent(&self, term_id: TermId, parent_id: Option<TermId>) -> StoreResult<()>;
    /// Lists all terms ordered by slug.
    fn list_terms(&self) -> StoreResult<Vec<SectionTerm>>;
    /// Creates one content item with no assigned terms.
    fn create_content(&self, item: &NewContentItem) -> StoreResult<ContentItem>;
    /// Moves one content item under another parent (or to the top level).
    fn set_content_parent(
        &self,
        content_id: ContentId,
        parent_id: Option<ContentId>,
    ) -> StoreResult<()>;
    /// Loads one content item with its assigned terms.
    fn get_content(&self, content_id: ContentId) -> StoreResult<Option<ContentItem>>;
    /// Lists content items of one kind in creation order.
    fn list_content(&self, kind: ContentKind) -> StoreResult<Vec<ContentItem>>;
    /// Creates one site user with no sections.
    fn create_user(&self, display_name: &str, is_administrator: bool) -> StoreResult<SiteUser>;
    /// Loads one user with its assigned terms.
    fn get_user(&self, user_id: UserId) -> StoreResult<Option<SiteUser>>;
}
