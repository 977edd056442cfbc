//! SQLite implementation of the section assignment store.
//!
//! # Responsibility
//! - Persist terms, content items, users and term assignments.
//! - Keep SQL details and ordering behavior inside the store boundary.
//!
//! # Invariants
//! - Assignment replacement runs in one immediate transaction.
//! - Content listing is deterministic: insertion order.
//! - Parent links of terms and content never form cycles.

use crate::db::migrations::latest_version;
use crate::model::content::{ContentId, ContentItem, ContentKind};
use crate::model::term::{SectionTerm, TermId, TermSet};
use crate::model::user::{SiteUser, UserId};
use crate::model::EntityRef;
use crate::repo::section_store::{NewContentItem, SectionStore, StoreError, StoreResult};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use std::collections::HashSet;
use uuid::Uuid;

const REQUIRED_TABLES: &[&str] = &[
    "section_terms",
    "site_users",
    "content_items",
    "term_assignments",
];

const CONTENT_SELECT_SQL: &str = "SELECT
    id,
    kind,
    parent_id,
    author_id,
    slug,
    title
FROM content_items";

/// SQLite-backed section store.
pub struct SqliteSectionStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSectionStore<'conn> {
    /// Creates a store from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_store_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn ensure_entity_exists(&self, entity: EntityRef) -> StoreResult<()> {
        let sql = match entity {
            EntityRef::Content(_) => "SELECT EXISTS(SELECT 1 FROM content_items WHERE id = ?1);",
            EntityRef::User(_) => "SELECT EXISTS(SELECT 1 FROM site_users WHERE id = ?1);",
        };
        let exists: i64 = self
            .conn
            .query_row(sql, [entity.id().to_string()], |row| row.get(0))?;
        if exists == 1 {
            return Ok(());
        }
        Err(match entity {
            EntityRef::Content(id) => StoreError::ContentNotFound(id),
            EntityRef::User(id) => StoreError::UserNotFound(id),
        })
    }

    fn ensure_terms_exist(&self, terms: &TermSet) -> StoreResult<()> {
        for term_id in terms {
            let exists: i64 = self.conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM section_terms WHERE id = ?1);",
                [term_id.to_string()],
                |row| row.get(0),
            )?;
            if exists == 0 {
                return Err(StoreError::TermNotFound(*term_id));
            }
        }
        Ok(())
    }

    fn get_term(&self, term_id: TermId) -> StoreResult<Option<SectionTerm>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, slug, name, parent_id
             FROM section_terms
             WHERE id = ?1;",
        )?;
        let mut rows = stmt.query([term_id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_term_row(row)?));
        }
        Ok(None)
    }
}

impl SectionStore for SqliteSectionStore<'_> {
    fn assigned_terms(&self, entity: EntityRef) -> StoreResult<TermSet> {
        load_assigned_terms(self.conn, entity)
    }

    fn set_assigned_terms(
        &self,
        entity: EntityRef,
        terms: &TermSet,
        append: bool,
    ) -> StoreResult<()> {
        self.ensure_entity_exists(entity)?;
        self.ensure_terms_exist(terms)?;

        let entity_id = entity.id().to_string();
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if !append {
            tx.execute(
                "DELETE FROM term_assignments
                 WHERE entity_kind = ?1
                   AND entity_id = ?2;",
                params![entity.kind_str(), entity_id],
            )?;
        }
        for term_id in terms {
            tx.execute(
                "INSERT OR IGNORE INTO term_assignments (entity_kind, entity_id, term_id)
                 VALUES (?1, ?2, ?3);",
                params![entity.kind_str(), entity_id, term_id.to_string()],
            )?;
        }
        touch_content(&tx, entity)?;
        tx.commit()?;
        Ok(())
    }

    fn remove_assigned_terms(&self, entity: EntityRef, terms: &TermSet) -> StoreResult<()> {
        if terms.is_empty() {
            return Ok(());
        }

        let entity_id = entity.id().to_string();
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        for term_id in terms {
            tx.execute(
                "DELETE FROM term_assignments
                 WHERE entity_kind = ?1
                   AND entity_id = ?2
                   AND term_id = ?3;",
                params![entity.kind_str(), entity_id, term_id.to_string()],
            )?;
        }
        touch_content(&tx, entity)?;
        tx.commit()?;
        Ok(())
    }

    fn term_by_slug(&self, slug: &str) -> StoreResult<Option<SectionTerm>> {
        let normalized = slug.trim().to_lowercase();
        let mut stmt = self.conn.prepare(
            "SELECT id, slug, name, parent_id
             FROM section_terms
             WHERE slug = ?1;",
        )?;
        let mut rows = stmt.query([normalized.as_str()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_term_row(row)?));
        }
        Ok(None)
    }

    fn descendant_term_ids(&self, term_id: TermId) -> StoreResult<TermSet> {
        let mut stmt = self.conn.prepare(
            "WITH RECURSIVE subtree(id) AS (
                SELECT id
                FROM section_terms
                WHERE parent_id = ?1
                UNION
                SELECT child.id
                FROM section_terms child
                INNER JOIN subtree parent ON child.parent_id = parent.id
            )
            SELECT id FROM subtree WHERE id <> ?1;",
        )?;
        let mut rows = stmt.query([term_id.to_string()])?;
        let mut result = TermSet::new();
        while let Some(row) = rows.next()? {
            let value: String = row.get(0)?;
            result.insert(parse_uuid(&value, "section_terms.id")?);
        }
        Ok(result)
    }

    fn ancestor_chain(&self, content_id: ContentId) -> StoreResult<Vec<ContentItem>> {
        let mut cursor = self.parent_id(content_id)?;
        let mut visited = HashSet::from([content_id]);
        let mut chain = Vec::new();
        while let Some(current) = cursor {
            if !visited.insert(current) {
                break;
            }
            let Some(ancestor) = self.get_content(current)? else {
                break;
            };
            cursor = ancestor.parent_id;
            chain.push(ancestor);
        }
        Ok(chain)
    }

    fn parent_id(&self, content_id: ContentId) -> StoreResult<Option<ContentId>> {
        let value: Option<Option<String>> = self
            .conn
            .query_row(
                "SELECT parent_id FROM content_items WHERE id = ?1;",
                [content_id.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        match value {
            None => Err(StoreError::ContentNotFound(content_id)),
            Some(parent) => parent
                .map(|value| parse_uuid(&value, "content_items.parent_id"))
                .transpose(),
        }
    }

    fn create_term(
        &self,
        slug: &str,
        name: &str,
        parent_id: Option<TermId>,
    ) -> StoreResult<SectionTerm> {
        let term = SectionTerm::new(slug, name, parent_id)?;
        if let Some(parent_id) = parent_id {
            if self.get_term(parent_id)?.is_none() {
                return Err(StoreError::TermNotFound(parent_id));
            }
        }
        if self.term_by_slug(&term.slug)?.is_some() {
            return Err(StoreError::DuplicateSlug(term.slug));
        }

        self.conn.execute(
            "INSERT INTO section_terms (id, slug, name, parent_id)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                term.id.to_string(),
                term.slug,
                term.name,
                term.parent_id.map(|value| value.to_string()),
            ],
        )?;
        Ok(term)
    }

    fn set_term_parent(&self, term_id: TermId, parent_id: Option<TermId>) -> StoreResult<()> {
        if self.get_term(term_id)?.is_none() {
            return Err(StoreError::TermNotFound(term_id));
        }
        if let Some(parent_id) = parent_id {
            let mut cursor = Some(parent_id);
            let mut visited = HashSet::new();
            while let Some(current) = cursor {
                if current == term_id || !visited.insert(current) {
                    return Err(StoreError::CycleDetected {
                        id: term_id,
                        parent_id,
                    });
                }
                cursor = self
                    .get_term(current)?
                    .ok_or(StoreError::TermNotFound(current))?
                    .parent_id;
            }
        }

        self.conn.execute(
            "UPDATE section_terms SET parent_id = ?2 WHERE id = ?1;",
            params![term_id.to_string(), parent_id.map(|value| value.to_string())],
        )?;
        Ok(())
    }

    fn list_terms(&self) -> StoreResult<Vec<SectionTerm>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, slug, name, parent_id
             FROM section_terms
             ORDER BY slug ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut terms = Vec::new();
        while let Some(row) = rows.next()? {
            terms.push(parse_term_row(row)?);
        }
        Ok(terms)
    }

    fn create_content(&self, item: &NewContentItem) -> StoreResult<ContentItem> {
        self.ensure_entity_exists(EntityRef::User(item.author_id))?;
        if let Some(parent_id) = item.parent_id {
            self.ensure_entity_exists(EntityRef::Content(parent_id))?;
        }

        let id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO content_items (id, kind, parent_id, author_id, slug, title)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                id.to_string(),
                item.kind.as_str(),
                item.parent_id.map(|value| value.to_string()),
                item.author_id.to_string(),
                item.slug.trim(),
                item.title,
            ],
        )?;
        self.get_content(id)?
            .ok_or_else(|| StoreError::InvalidData(format!("created content {id} not found")))
    }

    fn set_content_parent(
        &self,
        content_id: ContentId,
        parent_id: Option<ContentId>,
    ) -> StoreResult<()> {
        self.ensure_entity_exists(EntityRef::Content(content_id))?;
        if let Some(parent_id) = parent_id {
            if parent_id == content_id {
                return Err(StoreError::CycleDetected {
                    id: content_id,
                    parent_id,
                });
            }
            self.ensure_entity_exists(EntityRef::Content(parent_id))?;
            let ancestors = self.ancestor_chain(parent_id)?;
            if ancestors.iter().any(|ancestor| ancestor.id == content_id) {
                return Err(StoreError::CycleDetected {
                    id: content_id,
                    parent_id,
                });
            }
        }

        self.conn.execute(
            "UPDATE content_items
             SET parent_id = ?2,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![content_id.to_string(), parent_id.map(|value| value.to_string())],
        )?;
        Ok(())
    }

    fn get_content(&self, content_id: ContentId) -> StoreResult<Option<ContentItem>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CONTENT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([content_id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_content_row(self.conn, row)?));
        }
        Ok(None)
    }

    fn list_content(&self, kind: ContentKind) -> StoreResult<Vec<ContentItem>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CONTENT_SELECT_SQL} WHERE kind = ?1 ORDER BY rowid ASC;"
        ))?;
        let mut rows = stmt.query([kind.as_str()])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_content_row(self.conn, row)?);
        }
        Ok(items)
    }

    fn create_user(&self, display_name: &str, is_administrator: bool) -> StoreResult<SiteUser> {
        let user = SiteUser::new(display_name.trim(), is_administrator);
        self.conn.execute(
            "INSERT INTO site_users (id, display_name, is_administrator)
             VALUES (?1, ?2, ?3);",
            params![
                user.id.to_string(),
                user.display_name,
                i64::from(user.is_administrator),
            ],
        )?;
        Ok(user)
    }

    fn get_user(&self, user_id: UserId) -> StoreResult<Option<SiteUser>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, display_name, is_administrator
             FROM site_users
             WHERE id = ?1;",
        )?;
        let mut rows = stmt.query([user_id.to_string()])?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };

        let id_text: String = row.get("id")?;
        let id = parse_uuid(&id_text, "site_users.id")?;
        let is_administrator =
            parse_flag(row.get("is_administrator")?, "site_users.is_administrator")?;
        Ok(Some(SiteUser {
            id,
            display_name: row.get("display_name")?,
            assigned_terms: load_assigned_terms(self.conn, EntityRef::User(id))?,
            is_administrator,
        }))
    }
}

fn load_assigned_terms(conn: &Connection, entity: EntityRef) -> StoreResult<TermSet> {
    let mut stmt = conn.prepare(
        "SELECT term_id
         FROM term_assignments
         WHERE entity_kind = ?1
           AND entity_id = ?2;",
    )?;
    let mut rows = stmt.query(params![entity.kind_str(), entity.id().to_string()])?;
    let mut terms = TermSet::new();
    while let Some(row) = rows.next()? {
        let value: String = row.get(0)?;
        terms.insert(parse_uuid(&value, "term_assignments.term_id")?);
    }
    Ok(terms)
}

fn touch_content(conn: &Connection, entity: EntityRef) -> StoreResult<()> {
    if let EntityRef::Content(id) = entity {
        conn.execute(
            "UPDATE content_items
             SET updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            [id.to_string()],
        )?;
    }
    Ok(())
}

fn parse_term_row(row: &Row<'_>) -> StoreResult<SectionTerm> {
    let id_text: String = row.get("id")?;
    let parent_id = row
        .get::<_, Option<String>>("parent_id")?
        .map(|value| parse_uuid(&value, "section_terms.parent_id"))
        .transpose()?;
    Ok(SectionTerm {
        id: parse_uuid(&id_text, "section_terms.id")?,
        slug: row.get("slug")?,
        name: row.get("name")?,
        parent_id,
    })
}

fn parse_content_row(conn: &Connection, row: &Row<'_>) -> StoreResult<ContentItem> {
    let id_text: String = row.get("id")?;
    let id = parse_uuid(&id_text, "content_items.id")?;
    let parent_id = row
        .get::<_, Option<String>>("parent_id")?
        .map(|value| parse_uuid(&value, "content_items.parent_id"))
        .transpose()?;
    let author_text: String = row.get("author_id")?;
    let kind_text: String = row.get("kind")?;
    let kind = ContentKind::parse(&kind_text).ok_or_else(|| {
        StoreError::InvalidData(format!(
            "invalid content kind `{kind_text}` in content_items.kind"
        ))
    })?;

    Ok(ContentItem {
        id,
        parent_id,
        author_id: parse_uuid(&author_text, "content_items.author_id")?,
        slug: row.get("slug")?,
        title: row.get("title")?,
        kind,
        assigned_terms: load_assigned_terms(conn, EntityRef::Content(id))?,
    })
}

fn parse_flag(value: i64, column: &'static str) -> StoreResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(StoreError::InvalidData(format!(
            "invalid flag value `{other}` in {column}"
        ))),
    }
}

fn parse_uuid(value: &str, column: &'static str) -> StoreResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| StoreError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}

fn ensure_store_connection_ready(conn: &Connection) -> StoreResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in REQUIRED_TABLES.iter().copied() {
        if !table_exists(conn, table)? {
            return Err(StoreError::MissingRequiredTable(table));
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> StoreResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
