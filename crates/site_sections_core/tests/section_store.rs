use site_sections_core::db::open_db_in_memory;
use site_sections_core::{
    ContentKind, EntityRef, NewContentItem, SectionStore, SqliteSectionStore, StoreError, TermSet,
};
use uuid::Uuid;

fn setup() -> rusqlite::Connection {
    open_db_in_memory().unwrap()
}

fn page(author: Uuid, parent: Option<Uuid>, slug: &str) -> NewContentItem {
    NewContentItem {
        kind: ContentKind::Page,
        parent_id: parent,
        author_id: author,
        slug: slug.to_string(),
        title: slug.to_string(),
    }
}

fn terms(ids: &[Uuid]) -> TermSet {
    ids.iter().copied().collect()
}

#[test]
fn set_assigned_terms_replaces_or_appends() {
    let conn = setup();
    let store = SqliteSectionStore::try_new(&conn).unwrap();
    let a = store.create_term("project-a", "Project A", None).unwrap();
    let b = store.create_term("project-b", "Project B", None).unwrap();
    let user = store.create_user("editor", false).unwrap();
    let entity = EntityRef::User(user.id);

    store.set_assigned_terms(entity, &terms(&[a.id]), false).unwrap();
    store.set_assigned_terms(entity, &terms(&[b.id]), true).unwrap();
    assert_eq!(store.assigned_terms(entity).unwrap(), terms(&[a.id, b.id]));

    store.set_assigned_terms(entity, &terms(&[b.id]), false).unwrap();
    assert_eq!(store.assigned_terms(entity).unwrap(), terms(&[b.id]));

    store.remove_assigned_terms(entity, &terms(&[b.id])).unwrap();
    assert!(store.assigned_terms(entity).unwrap().is_empty());
}

#[test]
fn user_and_content_assignments_do_not_collide() {
    let conn = setup();
    let store = SqliteSectionStore::try_new(&conn).unwrap();
    let a = store.create_term("project-a", "Project A", None).unwrap();
    let user = store.create_user("editor", false).unwrap();
    let item = store.create_content(&page(user.id, None, "home")).unwrap();

    store
        .set_assigned_terms(EntityRef::Content(item.id), &terms(&[a.id]), false)
        .unwrap();
    assert!(store.assigned_terms(EntityRef::User(user.id)).unwrap().is_empty());

    let loaded = store.get_content(item.id).unwrap().unwrap();
    assert_eq!(loaded.assigned_terms, terms(&[a.id]));
}

#[test]
fn set_assigned_terms_rejects_unknown_entities_and_terms() {
    let conn = setup();
    let store = SqliteSectionStore::try_new(&conn).unwrap();
    let a = store.create_term("project-a", "Project A", None).unwrap();
    let user = store.create_user("editor", false).unwrap();

    let missing_user = Uuid::new_v4();
    let err = store
        .set_assigned_terms(EntityRef::User(missing_user), &terms(&[a.id]), false)
        .unwrap_err();
    assert!(matches!(err, StoreError::UserNotFound(id) if id == missing_user));

    let missing_term = Uuid::new_v4();
    let err = store
        .set_assigned_terms(EntityRef::User(user.id), &terms(&[missing_term]), false)
        .unwrap_err();
    assert!(matches!(err, StoreError::TermNotFound(id) if id == missing_term));
}

#[test]
fn term_lookup_and_descendants_cover_all_depths() {
    let conn = setup();
    let store = SqliteSectionStore::try_new(&conn).unwrap();
    let languages = store.create_term("languages", "Languages", None).unwrap();
    let spanish = store
        .create_term("spanish", "Spanish", Some(languages.id))
        .unwrap();
    let dialect = store
        .create_term("spanish-andean", "Andean Spanish", Some(spanish.id))
        .unwrap();
    store.create_term("archive", "Archive", None).unwrap();

    let found = store.term_by_slug(" Languages ").unwrap().unwrap();
    assert_eq!(found.id, languages.id);
    assert!(store.term_by_slug("missing").unwrap().is_none());

    assert_eq!(
        store.descendant_term_ids(languages.id).unwrap(),
        terms(&[spanish.id, dialect.id])
    );
    assert!(store.descendant_term_ids(dialect.id).unwrap().is_empty());
}

#[test]
fn create_term_rejects_duplicates_and_missing_parent() {
    let conn = setup();
    let store = SqliteSectionStore::try_new(&conn).unwrap();
    store.create_term("archive", "Archive", None).unwrap();

    let err = store.create_term("ARCHIVE", "Again", None).unwrap_err();
    assert!(matches!(err, StoreError::DuplicateSlug(slug) if slug == "archive"));

    let err = store
        .create_term("orphan", "Orphan", Some(Uuid::new_v4()))
        .unwrap_err();
    assert!(matches!(err, StoreError::TermNotFound(_)));

    let err = store.create_term("bad slug", "Bad", None).unwrap_err();
    assert!(matches!(err, StoreError::InvalidTerm(_)));
}

#[test]
fn term_parent_changes_reject_cycles() {
    let conn = setup();
    let store = SqliteSectionStore::try_new(&conn).unwrap();
    let root = store.create_term("root", "Root", None).unwrap();
    let child = store.create_term("child", "Child", Some(root.id)).unwrap();

    let err = store.set_term_parent(root.id, Some(child.id)).unwrap_err();
    assert!(matches!(err, StoreError::CycleDetected { .. }));
    let err = store.set_term_parent(root.id, Some(root.id)).unwrap_err();
    assert!(matches!(err, StoreError::CycleDetected { .. }));

    store.set_term_parent(child.id, None).unwrap();
    assert!(store.descendant_term_ids(root.id).unwrap().is_empty());
}

#[test]
fn ancestor_chain_is_nearest_first() {
    let conn = setup();
    let store = SqliteSectionStore::try_new(&conn).unwrap();
    let user = store.create_user("author", false).unwrap();
    let root = store.create_content(&page(user.id, None, "root")).unwrap();
    let mid = store
        .create_content(&page(user.id, Some(root.id), "mid"))
        .unwrap();
    let leaf = store
        .create_content(&page(user.id, Some(mid.id), "leaf"))
        .unwrap();

    let chain: Vec<Uuid> = store
        .ancestor_chain(leaf.id)
        .unwrap()
        .into_iter()
        .map(|item| item.id)
        .collect();
    assert_eq!(chain, vec![mid.id, root.id]);
    assert_eq!(store.parent_id(leaf.id).unwrap(), Some(mid.id));
    assert_eq!(store.parent_id(root.id).unwrap(), None);
    assert!(store.ancestor_chain(root.id).unwrap().is_empty());

    let missing = Uuid::new_v4();
    assert!(matches!(
        store.parent_id(missing).unwrap_err(),
        StoreError::ContentNotFound(id) if id == missing
    ));
}

#[test]
fn content_parent_changes_reject_cycles() {
    let conn = setup();
    let store = SqliteSectionStore::try_new(&conn).unwrap();
    let user = store.create_user("author", false).unwrap();
    let root = store.create_content(&page(user.id, None, "root")).unwrap();
    let child = store
        .create_content(&page(user.id, Some(root.id), "child"))
        .unwrap();

    let err = store.set_content_parent(root.id, Some(child.id)).unwrap_err();
    assert!(matches!(err, StoreError::CycleDetected { .. }));

    store.set_content_parent(child.id, None).unwrap();
    assert_eq!(store.parent_id(child.id).unwrap(), None);
}

#[test]
fn create_content_requires_existing_author_and_parent() {
    let conn = setup();
    let store = SqliteSectionStore::try_new(&conn).unwrap();
    let err = store
        .create_content(&page(Uuid::new_v4(), None, "home"))
        .unwrap_err();
    assert!(matches!(err, StoreError::UserNotFound(_)));

    let user = store.create_user("author", false).unwrap();
    let err = store
        .create_content(&page(user.id, Some(Uuid::new_v4()), "child"))
        .unwrap_err();
    assert!(matches!(err, StoreError::ContentNotFound(_)));
}

#[test]
fn list_content_filters_kind_in_insertion_order() {
    let conn = setup();
    let store = SqliteSectionStore::try_new(&conn).unwrap();
    let user = store.create_user("author", false).unwrap();
    let first = store.create_content(&page(user.id, None, "first")).unwrap();
    let media = store
        .create_content(&NewContentItem {
            kind: ContentKind::Attachment,
            parent_id: Some(first.id),
            author_id: user.id,
            slug: "photo".to_string(),
            title: "Photo".to_string(),
        })
        .unwrap();
    let second = store.create_content(&page(user.id, None, "second")).unwrap();

    let pages: Vec<Uuid> = store
        .list_content(ContentKind::Page)
        .unwrap()
        .into_iter()
        .map(|item| item.id)
        .collect();
    assert_eq!(pages, vec![first.id, second.id]);

    let attachments = store.list_content(ContentKind::Attachment).unwrap();
    assert_eq!(attachments.len(), 1);
    assert_eq!(attachments[0].id, media.id);
    assert_eq!(attachments[0].parent_id, Some(first.id));
}

#[test]
fn get_user_round_trips_flags_and_terms() {
    let conn = setup();
    let store = SqliteSectionStore::try_new(&conn).unwrap();
    let a = store.create_term("project-a", "Project A", None).unwrap();
    let admin = store.create_user("  Admin  ", true).unwrap();
    store
        .set_assigned_terms(EntityRef::User(admin.id), &terms(&[a.id]), false)
        .unwrap();

    let loaded = store.get_user(admin.id).unwrap().unwrap();
    assert_eq!(loaded.display_name, "Admin");
    assert!(loaded.is_administrator);
    assert_eq!(loaded.assigned_terms, terms(&[a.id]));
    assert!(store.get_user(Uuid::new_v4()).unwrap().is_none());
}
