//! Section policy service used by the host at its invocation points.
//!
//! # Responsibility
//! - Load snapshots from the store, run the pure policy, write results back.
//! - Resolve the languages branch once per call and surface a missing root
//!   as a configuration fault.
//!
//! # Invariants
//! - Propagation writes use replace semantics, so repeated saves converge.
//! - Attachment inheritance runs only through `on_attachment_created`.
//! - Access checks never fail for missing terms; unknown users/items do.

use crate::config::{ConfigurationError, SectionsConfig};
use crate::model::content::{ContentId, ContentItem, ContentKind};
use crate::model::term::{SectionTerm, TermId, TermSet};
use crate::model::user::{SiteUser, UserId};
use crate::model::{Action, EntityRef};
use crate::policy::access::{
    can_perform, filter_selectable_parents, filter_visible_items, filter_visible_media,
    restrict_term_choices, ParentSelection,
};
use crate::policy::propagation::{attachment_terms, propagate_terms, LanguagesBranch};
use crate::policy::term_set::collect_terms;
use crate::repo::section_store::{SectionStore, StoreError};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from section service operations.
#[derive(Debug)]
pub enum SectionServiceError {
    /// Host configuration is unusable (e.g. languages root deleted).
    Configuration(ConfigurationError),
    ContentNotFound(ContentId),
    UserNotFound(UserId),
    TermNotFound(TermId),
    /// Store-level failure.
    Store(StoreError),
}

impl Display for SectionServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration(err) => write!(f, "{err}"),
            Self::ContentNotFound(id) => write!(f, "content item not found: {id}"),
            Self::UserNotFound(id) => write!(f, "site user not found: {id}"),
            Self::TermNotFound(id) => write!(f, "section term not found: {id}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SectionServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Configuration(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for SectionServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::ContentNotFound(id) => Self::ContentNotFound(id),
            StoreError::UserNotFound(id) => Self::UserNotFound(id),
            StoreError::TermNotFound(id) => Self::TermNotFound(id),
            other => Self::Store(other),
        }
    }
}

impl From<ConfigurationError> for SectionServiceError {
    fn from(value: ConfigurationError) -> Self {
        Self::Configuration(value)
    }
}

pub type SectionServiceResult<T> = Result<T, SectionServiceError>;

/// Section service façade over a store implementation.
pub struct SectionService<S: SectionStore> {
    store: S,
    config: SectionsConfig,
}

impl<S: SectionStore> SectionService<S> {
    /// Creates a service with default configuration.
    pub fn new(store: S) -> Self {
        Self {
            store,
            config: SectionsConfig::default(),
        }
    }

    /// Creates a service with a validated configuration.
    pub fn with_config(store: S, config: SectionsConfig) -> Result<Self, ConfigurationError> {
        Ok(Self {
            store,
            config: config.validate()?,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &SectionsConfig {
        &self.config
    }

    /// Resolves the languages root term and its descendants.
    pub fn resolve_languages(&self) -> SectionServiceResult<LanguagesBranch> {
        let slug = self.config.languages_slug.as_str();
        let Some(root) = self.store.term_by_slug(slug)? else {
            warn!(
                "event=resolve_languages module=service status=error error_code=missing_languages_term slug={slug}"
            );
            return Err(ConfigurationError::MissingLanguagesTerm {
                slug: slug.to_string(),
            }
            .into());
        };
        let descendant_ids = self.store.descendant_term_ids(root.id)?;
        Ok(LanguagesBranch {
            slug: root.slug,
            root_id: root.id,
            descendant_ids,
        })
    }

    /// Recomputes and stores the terms of a saved content item.
    pub fn on_content_saved(&self, content_id: ContentId) -> SectionServiceResult<TermSet> {
        let item = self.load_content(content_id)?;
        let languages = self.resolve_languages()?;
        let ancestor_terms: Vec<TermSet> = if item.parent_id.is_some() {
            self.store
                .ancestor_chain(content_id)?
                .into_iter()
                .map(|ancestor| ancestor.assigned_terms)
                .collect()
        } else {
            Vec::new()
        };

        let terms = propagate_terms(&item, &ancestor_terms, &languages);
        if terms != item.assigned_terms {
            self.store
                .set_assigned_terms(EntityRef::Content(content_id), &terms, false)?;
        }
        info!(
            "event=propagate_terms module=service status=ok content_id={} ancestors={} before={} after={}",
            content_id,
            ancestor_terms.len(),
            item.assigned_terms.len(),
            terms.len()
        );
        Ok(terms)
    }

    /// Assigns inherited language terms to a newly created attachment.
    ///
    /// Attachments without a page parent are left unchanged.
    pub fn on_attachment_created(&self, attachment_id: ContentId) -> SectionServiceResult<TermSet> {
        let attachment = self.load_content(attachment_id)?;
        let parent = match attachment.parent_id {
            Some(parent_id) => self.store.get_content(parent_id)?,
            None => None,
        };
        let Some(parent) = parent.filter(|parent| attachment.is_attachment() && parent.is_page())
        else {
            debug!(
                "event=attachment_terms module=service status=skipped content_id={attachment_id}"
            );
            return Ok(attachment.assigned_terms);
        };

        let languages = self.resolve_languages()?;
        let terms = attachment_terms(&parent.assigned_terms, &languages);
        self.store
            .set_assigned_terms(EntityRef::Content(attachment_id), &terms, false)?;
        info!(
            "event=attachment_terms module=service status=ok content_id={} parent_id={} terms={}",
            attachment_id,
            parent.id,
            terms.len()
        );
        Ok(terms)
    }

    /// Capability check for one user/item/action triple.
    pub fn can_perform(
        &self,
        user_id: UserId,
        content_id: ContentId,
        action: Action,
    ) -> SectionServiceResult<bool> {
        let user = self.load_user(user_id)?;
        let item = self.load_content(content_id)?;
        let allowed = can_perform(&user, &item, action);
        debug!(
            "event=capability_check module=service status=ok user_id={} content_id={} action={} allowed={}",
            user_id,
            content_id,
            action.as_str(),
            allowed
        );
        Ok(allowed)
    }

    /// Capability check keyed by a host capability name.
    ///
    /// Returns `None` for capabilities the section policy does not govern.
    pub fn check_capability(
        &self,
        user_id: UserId,
        content_id: ContentId,
        capability: &str,
    ) -> SectionServiceResult<Option<bool>> {
        match Action::from_capability(capability) {
            Some(action) => self.can_perform(user_id, content_id, action).map(Some),
            None => Ok(None),
        }
    }

    /// Content listing filtered for one user.
    pub fn visible_items(
        &self,
        user_id: UserId,
        kind: ContentKind,
    ) -> SectionServiceResult<Vec<ContentItem>> {
        let user = self.load_user(user_id)?;
        let all_items = self.store.list_content(kind)?;
        let visible = match kind {
            ContentKind::Page => filter_visible_items(&user, &all_items),
            ContentKind::Attachment => filter_visible_media(&user, &all_items),
        };
        debug!(
            "event=list_filter module=service status=ok user_id={} kind={} total={} visible={}",
            user_id,
            kind.as_str(),
            all_items.len(),
            visible.len()
        );
        Ok(visible)
    }

    /// Parent-selector restriction for one user.
    pub fn selectable_parents(&self, user_id: UserId) -> SectionServiceResult<ParentSelection> {
        let user = self.load_user(user_id)?;
        let pages = self.store.list_content(ContentKind::Page)?;
        let languages = self.resolve_languages()?;
        Ok(filter_selectable_parents(
            &user,
            &pages,
            &languages.descendant_ids,
        ))
    }

    /// Term choices offered to one user on the edit screen.
    pub fn assignable_terms(&self, user_id: UserId) -> SectionServiceResult<Vec<SectionTerm>> {
        let user = self.load_user(user_id)?;
        let terms = self.store.list_terms()?;
        Ok(restrict_term_choices(&user, &terms))
    }

    /// Replaces the sections of one user (profile form save).
    pub fn set_user_sections(
        &self,
        user_id: UserId,
        term_ids: Vec<TermId>,
    ) -> SectionServiceResult<TermSet> {
        let terms = collect_terms(term_ids);
        self.store
            .set_assigned_terms(EntityRef::User(user_id), &terms, false)?;
        info!(
            "event=set_user_sections module=service status=ok user_id={} terms={}",
            user_id,
            terms.len()
        );
        Ok(terms)
    }

    /// Replaces the sections of one content item (administrator assignment).
    pub fn set_content_sections(
        &self,
        content_id: ContentId,
        term_ids: Vec<TermId>,
    ) -> SectionServiceResult<TermSet> {
        let terms = collect_terms(term_ids);
        self.store
            .set_assigned_terms(EntityRef::Content(content_id), &terms, false)?;
        info!(
            "event=set_content_sections module=service status=ok content_id={} terms={}",
            content_id,
            terms.len()
        );
        Ok(terms)
    }

    fn load_user(&self, user_id: UserId) -> SectionServiceResult<SiteUser> {
        self.store
            .get_user(user_id)?
            .ok_or(SectionServiceError::UserNotFound(user_id))
    }

    fn load_content(&self, content_id: ContentId) -> SectionServiceResult<ContentItem> {
        self.store
            .get_content(content_id)?
            .ok_or(SectionServiceError::ContentNotFound(content_id))
    }
}
