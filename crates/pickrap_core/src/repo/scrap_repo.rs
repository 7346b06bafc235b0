//! Scrap repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Scraps of one category are returned in persisted insertion order
//!   (`rowid ASC`); the "last" scrap is the highest rowid.
//! - `category_id` always references an existing category (FK `RESTRICT`).

use crate::model::category::CategoryId;
use crate::model::member::MemberId;
use crate::model::scrap::{Scrap, ScrapId, ScrapKind};
use crate::repo::{ensure_schema, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const SCRAP_SELECT_SQL: &str = "SELECT id, category_id, kind, content, file_url FROM scraps";

/// Repository interface for scraps.
pub trait ScrapRepository {
    fn create_scrap(&self, scrap: &Scrap) -> RepoResult<ScrapId>;
    fn get_scrap(&self, id: ScrapId) -> RepoResult<Option<Scrap>>;
    /// Lists scraps of one category in insertion order.
    fn list_category_scraps(&self, category_id: CategoryId) -> RepoResult<Vec<Scrap>>;
    /// Returns the most recently inserted scrap of one category.
    fn last_category_scrap(&self, category_id: CategoryId) -> RepoResult<Option<Scrap>>;
    fn move_scrap(&self, id: ScrapId, category_id: CategoryId) -> RepoResult<()>;
    /// Counts scraps across all categories of one member.
    fn count_member_scraps(&self, member_id: MemberId) -> RepoResult<u64>;
}

/// SQLite-backed scrap repository.
#[derive(Clone, Copy)]
pub struct SqliteScrapRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteScrapRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema(
            conn,
            &[(
                "scraps",
                &["id", "category_id", "kind", "content", "file_url"],
            )],
        )?;
        Ok(Self { conn })
    }
}

impl ScrapRepository for SqliteScrapRepository<'_> {
    fn create_scrap(&self, scrap: &Scrap) -> RepoResult<ScrapId> {
        self.conn.execute(
            "INSERT INTO scraps (id, category_id, kind, content, file_url)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                scrap.id.to_string(),
                scrap.category_id.to_string(),
                scrap.kind.as_db_str(),
                scrap.content.as_deref(),
                scrap.file_url.as_deref(),
            ],
        )?;
        Ok(scrap.id)
    }

    fn get_scrap(&self, id: ScrapId) -> RepoResult<Option<Scrap>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SCRAP_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_scrap_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_category_scraps(&self, category_id: CategoryId) -> RepoResult<Vec<Scrap>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SCRAP_SELECT_SQL} WHERE category_id = ?1 ORDER BY rowid ASC;"
        ))?;
        let mut rows = stmt.query([category_id.to_string()])?;
        let mut scraps = Vec::new();
        while let Some(row) = rows.next()? {
            scraps.push(parse_scrap_row(row)?);
        }
        Ok(scraps)
    }

    fn last_category_scrap(&self, category_id: CategoryId) -> RepoResult<Option<Scrap>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SCRAP_SELECT_SQL} WHERE category_id = ?1 ORDER BY rowid DESC LIMIT 1;"
        ))?;
        let mut rows = stmt.query([category_id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_scrap_row(row)?)),
            None => Ok(None),
        }
    }

    fn move_scrap(&self, id: ScrapId, category_id: CategoryId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE scraps SET category_id = ?2 WHERE id = ?1;",
            params![id.to_string(), category_id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: "scrap", id });
        }
        Ok(())
    }

    fn count_member_scraps(&self, member_id: MemberId) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*)
             FROM scraps s
             INNER JOIN categories c ON c.id = s.category_id
             WHERE c.member_id = ?1;",
            [member_id.to_string()],
            |row| row.get(0),
        )?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative scrap count `{count}`")))
    }
}

fn parse_scrap_row(row: &Row<'_>) -> RepoResult<Scrap> {
    let id: String = row.get("id")?;
    let category_id: String = row.get("category_id")?;
    let kind_text: String = row.get("kind")?;
    let kind = ScrapKind::from_db_str(&kind_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid scrap kind `{kind_text}` in scraps.kind"))
    })?;

    Ok(Scrap {
        id: parse_uuid(&id, "scraps.id")?,
        category_id: parse_uuid(&category_id, "scraps.category_id")?,
        kind,
        content: row.get("content")?,
        file_url: row.get("file_url")?,
    })
}
