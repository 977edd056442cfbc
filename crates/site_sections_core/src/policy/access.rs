//! Section-based access policy.
//!
//! # Responsibility
//! - Decide whether a user may edit or delete one content item.
//! - Derive listing visibility and parent-selector exclusions from that
//!   single predicate.
//!
//! # Invariants
//! - Administrators bypass every restriction.
//! - Authors may always edit their own items.
//! - Otherwise access requires at least one shared section term.
//! - Listing visibility may include non-editable ancestors of editable pages;
//!   it never includes items from unrelated branches.

use crate::model::content::{ContentId, ContentItem};
use crate::model::term::{SectionTerm, TermSet};
use crate::model::user::SiteUser;
use crate::model::Action;
use crate::policy::term_set::{ancestor_ids, difference, intersects, parent_map};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Parent-selector restriction for one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentSelection {
    /// Pages the selector must not offer, in input order.
    pub excluded: Vec<ContentId>,
    /// Whether the "no parent" option must be hidden.
    pub hide_no_parent: bool,
}

/// Returns whether `user` may edit `item`.
pub fn can_edit(user: &SiteUser, item: &ContentItem) -> bool {
    if user.is_administrator {
        return true;
    }
    if user.id == item.author_id {
        return true;
    }
    intersects(&user.assigned_terms, &item.assigned_terms)
}

/// Returns whether `user` may perform `action` on `item`.
///
/// Edit and delete share one predicate.
pub fn can_perform(user: &SiteUser, item: &ContentItem, action: Action) -> bool {
    match action {
        Action::Edit | Action::Delete => can_edit(user, item),
    }
}

/// Filters a page listing down to what `user` should see.
///
/// Editable items are kept together with every ancestor of an editable item,
/// so a hierarchical listing stays connected.
pub fn filter_visible_items(user: &SiteUser, all_items: &[ContentItem]) -> Vec<ContentItem> {
    if user.is_administrator {
        return all_items.to_vec();
    }

    let parents = parent_map(all_items);
    let mut visible = HashSet::new();
    for item in all_items.iter().filter(|item| can_edit(user, item)) {
        visible.insert(item.id);
        visible.extend(ancestor_ids(&parents, item.id));
    }

    all_items
        .iter()
        .filter(|item| visible.contains(&item.id))
        .cloned()
        .collect()
}

/// Filters a media listing down to what `user` should see.
///
/// Media is visible when authored by the user or sharing a section term. No
/// ancestor relaxation applies.
pub fn filter_visible_media(user: &SiteUser, all_items: &[ContentItem]) -> Vec<ContentItem> {
    all_items
        .iter()
        .filter(|item| can_edit(user, item))
        .cloned()
        .collect()
}

/// Computes which pages a parent selector must exclude for `user`.
///
/// Selectable pages are the editable ones plus the direct parent of each.
pub fn filter_selectable_parents(
    user: &SiteUser,
    all_pages: &[ContentItem],
    languages_descendant_ids: &TermSet,
) -> ParentSelection {
    if user.is_administrator {
        return ParentSelection::default();
    }

    let mut selectable = HashSet::new();
    for page in all_pages.iter().filter(|page| can_edit(user, page)) {
        selectable.insert(page.id);
        if let Some(parent_id) = page.parent_id {
            selectable.insert(parent_id);
        }
    }

    let excluded = all_pages
        .iter()
        .map(|page| page.id)
        .filter(|id| !selectable.contains(id))
        .collect();

    ParentSelection {
        excluded,
        hide_no_parent: difference(&user.assigned_terms, languages_descendant_ids).is_empty(),
    }
}

/// Restricts the term choices offered to `user` on the edit screen.
pub fn restrict_term_choices(user: &SiteUser, all_terms: &[SectionTerm]) -> Vec<SectionTerm> {
    if user.is_administrator {
        return all_terms.to_vec();
    }
    all_terms
        .iter()
        .filter(|term| user.assigned_terms.contains(&term.id))
        .cloned()
        .collect()
}
