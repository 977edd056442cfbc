//! Domain model for section terms, content items and users.
//!
//! # Responsibility
//! - Define the records the policy reads and the store persists.
//! - Provide typed references and actions in place of host strings.
//!
//! # Invariants
//! - Every entity is identified by a stable UUID.
//! - The policy never owns these records; it only reads and rewrites
//!   term assignments.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub mod content;
pub mod term;
pub mod user;

use content::ContentId;
use user::UserId;

/// Entity that section terms can be assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum EntityRef {
    Content(ContentId),
    User(UserId),
}

impl EntityRef {
    /// Stable storage value for the entity kind.
    pub fn kind_str(self) -> &'static str {
        match self {
            Self::Content(_) => "content",
            Self::User(_) => "user",
        }
    }

    pub fn id(self) -> uuid::Uuid {
        match self {
            Self::Content(id) | Self::User(id) => id,
        }
    }
}

impl Display for EntityRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind_str(), self.id())
    }
}

/// Guarded content action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Edit,
    Delete,
}

impl Action {
    /// Maps a host capability name onto an action.
    ///
    /// Accepts the page/post/attachment capability families including their
    /// `others` and `published` variants. Unknown names return `None` and are
    /// left to the host.
    pub fn from_capability(capability: &str) -> Option<Self> {
        let normalized = capability.trim();
        let (verb, rest) = normalized.split_once('_')?;
        let object = rest
            .strip_prefix("others_")
            .or_else(|| rest.strip_prefix("published_"))
            .or_else(|| rest.strip_prefix("private_"))
            .unwrap_or(rest);
        if !matches!(object, "page" | "pages" | "post" | "posts") {
            return None;
        }
        match verb {
            "edit" => Some(Self::Edit),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Edit => "edit",
            Self::Delete => "delete",
        }
    }
}
