//! Set helpers over term assignments and parent links.

use crate::model::content::{ContentId, ContentItem};
use crate::model::term::{TermId, TermSet};
use std::collections::{HashMap, HashSet};

/// Returns whether two term sets share at least one term.
pub fn intersects(left: &TermSet, right: &TermSet) -> bool {
    // Iterate the smaller side; both are ordered so `contains` is logarithmic.
    let (small, large) = if left.len() <= right.len() {
        (left, right)
    } else {
        (right, left)
    };
    small.iter().any(|term| large.contains(term))
}

/// Returns the terms present in both sets.
pub fn intersection(left: &TermSet, right: &TermSet) -> TermSet {
    left.intersection(right).copied().collect()
}

/// Returns the terms of `left` that are absent from `right`.
pub fn difference(left: &TermSet, right: &TermSet) -> TermSet {
    left.difference(right).copied().collect()
}

/// Adds every term of `extra` into `target`.
pub fn union_into(target: &mut TermSet, extra: &TermSet) {
    target.extend(extra.iter().copied());
}

/// Removes every term of `unwanted` from `target`.
pub fn remove_all(target: &mut TermSet, unwanted: &TermSet) {
    target.retain(|term| !unwanted.contains(term));
}

/// Builds a term set from arbitrary ids, dropping duplicates.
pub fn collect_terms(ids: impl IntoIterator<Item = TermId>) -> TermSet {
    ids.into_iter().collect()
}

/// Maps every item id onto its parent id.
pub fn parent_map(items: &[ContentItem]) -> HashMap<ContentId, Option<ContentId>> {
    items.iter().map(|item| (item.id, item.parent_id)).collect()
}

/// Walks parent links upward from `start`, nearest ancestor first.
///
/// `start` itself is not included. The walk stops at a root, at an id missing
/// from `parents`, or when a cycle is detected.
pub fn ancestor_ids(
    parents: &HashMap<ContentId, Option<ContentId>>,
    start: ContentId,
) -> Vec<ContentId> {
    let mut chain = Vec::new();
    let mut visited = HashSet::from([start]);
    let mut cursor = parents.get(&start).copied().flatten();
    while let Some(current) = cursor {
        if !visited.insert(current) {
            break;
        }
        chain.push(current);
        cursor = parents.get(&current).copied().flatten();
    }
    chain
}

#[cfg(test)]
mod tests {
    use super::{
        ancestor_ids, collect_terms, difference, intersection, intersects, remove_all, union_into,
    };
    use crate::model::term::TermSet;
    use std::collections::HashMap;
    use uuid::Uuid;

    #[test]
    fn intersects_detects_shared_terms_only() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        assert!(intersects(&collect_terms([a, b]), &collect_terms([b, c])));
        assert!(!intersects(&collect_terms([a]), &collect_terms([c])));
        assert!(!intersects(&TermSet::new(), &collect_terms([a])));
    }

    #[test]
    fn set_arithmetic_matches_expectations() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let left = collect_terms([a, b]);
        let right = collect_terms([b, c]);

        assert_eq!(intersection(&left, &right), collect_terms([b]));
        assert_eq!(difference(&left, &right), collect_terms([a]));

        let mut target = left.clone();
        union_into(&mut target, &right);
        assert_eq!(target, collect_terms([a, b, c]));

        remove_all(&mut target, &right);
        assert_eq!(target, collect_terms([a]));
    }

    #[test]
    fn ancestor_walk_is_nearest_first_and_survives_cycles() {
        let root = Uuid::new_v4();
        let mid = Uuid::new_v4();
        let leaf = Uuid::new_v4();
        let parents = HashMap::from([(root, None), (mid, Some(root)), (leaf, Some(mid))]);
        assert_eq!(ancestor_ids(&parents, leaf), vec![mid, root]);
        assert!(ancestor_ids(&parents, root).is_empty());

        let x = Uuid::new_v4();
        let y = Uuid::new_v4();
        let cyclic = HashMap::from([(x, Some(y)), (y, Some(x))]);
        assert_eq!(ancestor_ids(&cyclic, x), vec![y]);
    }
}
