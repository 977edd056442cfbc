use site_sections_core::{
    Action, ContentItem, ContentKind, EntityRef, ParentSelection, SectionTerm, SectionsConfig,
};
use uuid::Uuid;

#[test]
fn content_item_serializes_with_snake_case_kind() {
    let author = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let term = Uuid::parse_str("66666666-7777-4888-8999-aaaaaaaaaaaa").unwrap();
    let mut item = ContentItem::new(ContentKind::Attachment, author, None, "photo", "Photo");
    item.assigned_terms.insert(term);

    let json = serde_json::to_value(&item).unwrap();
    assert_eq!(json["kind"], "attachment");
    assert_eq!(json["author_id"], author.to_string());
    assert_eq!(json["parent_id"], serde_json::Value::Null);
    assert_eq!(json["assigned_terms"][0], term.to_string());

    let decoded: ContentItem = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, item);
}

#[test]
fn entity_ref_and_action_use_tagged_wire_shape() {
    let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let json = serde_json::to_value(EntityRef::User(id)).unwrap();
    assert_eq!(json["kind"], "user");
    assert_eq!(json["id"], id.to_string());

    assert_eq!(serde_json::to_value(Action::Delete).unwrap(), "delete");
}

#[test]
fn parent_selection_serializes_exclusions() {
    let id = Uuid::new_v4();
    let selection = ParentSelection {
        excluded: vec![id],
        hide_no_parent: true,
    };
    let json = serde_json::to_value(&selection).unwrap();
    assert_eq!(json["excluded"][0], id.to_string());
    assert_eq!(json["hide_no_parent"], true);
}

#[test]
fn config_deserializes_with_defaults() {
    let config: SectionsConfig =
        serde_json::from_str(r#"{"log_dir": "/var/log/sections"}"#).unwrap();
    assert_eq!(config.languages_slug, "languages");
    assert_eq!(config.log_dir.as_deref(), Some("/var/log/sections"));
}

#[test]
fn section_term_keeps_parent_link() {
    let root = SectionTerm::new("languages", "Languages", None).unwrap();
    let child = SectionTerm::new("Spanish", " Spanish ", Some(root.id)).unwrap();
    assert!(root.is_root());
    assert_eq!(child.slug, "spanish");
    assert_eq!(child.name, "Spanish");
    assert_eq!(child.parent_id, Some(root.id));
}
