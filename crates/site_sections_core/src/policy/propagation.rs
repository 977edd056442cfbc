//! Section term propagation from ancestors onto saved content.
//!
//! # Responsibility
//! - Compute the term set a saved page/attachment should carry.
//! - Narrow attachment inheritance to language sub-project terms.
//!
//! # Invariants
//! - Propagation is a set union and therefore order independent.
//! - Re-running propagation on unchanged input yields the same set.
//! - The languages root term is carried only by the page whose slug is the
//!   languages slug.

use crate::model::content::ContentItem;
use crate::model::term::{SectionTerm, TermId, TermSet};
use crate::policy::term_set::{intersection, remove_all, union_into};

/// Resolved languages branch of the taxonomy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguagesBranch {
    /// Slug the root was resolved from; also the reserved page slug.
    pub slug: String,
    /// Id of the branch root term.
    pub root_id: TermId,
    /// Every term below the root, at any depth.
    pub descendant_ids: TermSet,
}

/// Computes the term set `item` should carry after a save.
///
/// `ancestor_terms` holds the assignment of every ancestor, nearest first.
/// It is ignored when `item` has no parent.
pub fn propagate_terms(
    item: &ContentItem,
    ancestor_terms: &[TermSet],
    languages: &LanguagesBranch,
) -> TermSet {
    let mut terms = item.assigned_terms.clone();

    if item.parent_id.is_some() {
        let mut inherited = ancestor_terms
            .iter()
            .filter(|terms| !terms.is_empty())
            .peekable();
        if inherited.peek().is_some() {
            // A stale language tag is dropped once, before any ancestor
            // contributes, so a nearer ancestor's language is never undone by
            // a further one.
            remove_all(&mut terms, &languages.descendant_ids);
        }
        for ancestor in inherited {
            union_into(&mut terms, ancestor);
        }
    }

    if item.slug == languages.slug {
        terms.insert(languages.root_id);
    } else {
        terms.remove(&languages.root_id);
    }

    terms
}

/// Computes the initial term set of an attachment created under a page.
///
/// Only language sub-project terms are inherited by media.
pub fn attachment_terms(parent_page_terms: &TermSet, languages: &LanguagesBranch) -> TermSet {
    intersection(parent_page_terms, &languages.descendant_ids)
}

/// Returns whether `term` is a direct child of the languages root.
pub fn is_language_term(term: &SectionTerm, languages_root_id: TermId) -> bool {
    term.parent_id == Some(languages_root_id)
}
