//! Content item domain model.
//!
//! # Responsibility
//! - Define the page/attachment record that section terms are assigned to.
//!
//! # Invariants
//! - `parent_id` links form a forest mirroring the page hierarchy.
//! - `assigned_terms` starts empty for newly created items.

use crate::model::term::TermSet;
use crate::model::user::UserId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of one content item.
pub type ContentId = Uuid;

/// Content kinds that carry section terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    /// Hierarchical page.
    Page,
    /// Uploaded media, optionally attached to a page.
    Attachment,
}

impl ContentKind {
    /// Stable storage value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Attachment => "attachment",
        }
    }

    /// Parses a storage value.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "page" => Some(Self::Page),
            "attachment" => Some(Self::Attachment),
            _ => None,
        }
    }
}

/// Page or attachment with its section assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: ContentId,
    /// Parent item. `None` means top-level.
    pub parent_id: Option<ContentId>,
    pub author_id: UserId,
    /// URL slug; the reserved languages slug triggers special propagation.
    pub slug: String,
    pub title: String,
    pub kind: ContentKind,
    pub assigned_terms: TermSet,
}

impl ContentItem {
    /// Creates an item with a generated id and no assigned terms.
    pub fn new(
        kind: ContentKind,
        author_id: UserId,
        parent_id: Option<ContentId>,
        slug: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            parent_id,
            author_id,
            slug: slug.into(),
            title: title.into(),
            kind,
            assigned_terms: TermSet::new(),
        }
    }

    pub fn is_page(&self) -> bool {
        self.kind == ContentKind::Page
    }

    pub fn is_attachment(&self) -> bool {
        self.kind == ContentKind::Attachment
    }
}
