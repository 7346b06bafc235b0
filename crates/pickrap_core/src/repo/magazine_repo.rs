//! Magazine repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist magazines with their page lists as one unit of work.
//! - Replace page lists wholesale on update (delete all, re-insert).
//!
//! # Invariants
//! - A magazine and its pages are written in one transaction; a failed page
//!   insert leaves neither behind.
//! - Pages are returned in insertion order (`rowid ASC`).
//! - Deleting a magazine cascades to its pages, never to scraps.

use crate::db::run_in_transaction;
use crate::model::magazine::{Magazine, MagazineId, MagazinePage};
use crate::model::member::MemberId;
use crate::repo::{bool_to_int, ensure_schema, int_to_bool, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row, Transaction};

const MAGAZINE_SELECT_SQL: &str =
    "SELECT id, member_id, title, open_status, cover, created_at FROM magazines";

/// Repository interface for magazines and their pages.
pub trait MagazineRepository {
    /// Inserts a magazine and all of its pages atomically.
    fn create_magazine(&self, magazine: &Magazine, pages: &[MagazinePage])
        -> RepoResult<MagazineId>;
    fn get_magazine(&self, id: MagazineId) -> RepoResult<Option<Magazine>>;
    /// Lists magazines written by one member in creation order.
    fn list_member_magazines(&self, member_id: MemberId) -> RepoResult<Vec<Magazine>>;
    fn list_magazine_pages(&self, id: MagazineId) -> RepoResult<Vec<MagazinePage>>;
    /// Updates magazine fields and replaces its full page list atomically.
    fn replace_magazine(&self, magazine: &Magazine, pages: &[MagazinePage]) -> RepoResult<()>;
    /// Deletes one magazine; pages cascade.
    fn delete_magazine(&self, id: MagazineId) -> RepoResult<()>;
}

/// SQLite-backed magazine repository.
#[derive(Clone, Copy)]
pub struct SqliteMagazineRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMagazineRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema(
            conn,
            &[
                (
                    "magazines",
                    &["id", "member_id", "title", "open_status", "cover", "created_at"],
                ),
                ("magazine_pages", &["id", "magazine_id", "scrap_id", "text"]),
            ],
        )?;
        Ok(Self { conn })
    }
}

impl MagazineRepository for SqliteMagazineRepository<'_> {
    fn create_magazine(
        &self,
        magazine: &Magazine,
        pages: &[MagazinePage],
    ) -> RepoResult<MagazineId> {
        run_in_transaction(self.conn, "magazine_create", |tx| {
            tx.execute(
                "INSERT INTO magazines (id, member_id, title, open_status, cover, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
                params![
                    magazine.id.to_string(),
                    magazine.member_id.to_string(),
                    magazine.title.as_str(),
                    bool_to_int(magazine.open_status),
                    magazine.cover.as_deref(),
                    magazine.created_at,
                ],
            )?;
            insert_pages(tx, magazine.id, pages)?;
            Ok(magazine.id)
        })
    }

    fn get_magazine(&self, id: MagazineId) -> RepoResult<Option<Magazine>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{MAGAZINE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_magazine_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_member_magazines(&self, member_id: MemberId) -> RepoResult<Vec<Magazine>> {
        let mut stmt = self.conn.prepare(&format!(
            "{MAGAZINE_SELECT_SQL} WHERE member_id = ?1 ORDER BY created_at ASC, rowid ASC;"
        ))?;
        let mut rows = stmt.query([member_id.to_string()])?;
        let mut magazines = Vec::new();
        while let Some(row) = rows.next()? {
            magazines.push(parse_magazine_row(row)?);
        }
        Ok(magazines)
    }

    fn list_magazine_pages(&self, id: MagazineId) -> RepoResult<Vec<MagazinePage>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, magazine_id, scrap_id, text
             FROM magazine_pages
             WHERE magazine_id = ?1
             ORDER BY rowid ASC;",
        )?;
        let mut rows = stmt.query([id.to_string()])?;
        let mut pages = Vec::new();
        while let Some(row) = rows.next()? {
            pages.push(parse_page_row(row)?);
        }
        Ok(pages)
    }

    fn replace_magazine(&self, magazine: &Magazine, pages: &[MagazinePage]) -> RepoResult<()> {
        run_in_transaction(self.conn, "magazine_replace", |tx| {
            let changed = tx.execute(
                "UPDATE magazines
                 SET
                    title = ?2,
                    open_status = ?3,
                    cover = ?4,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE id = ?1;",
                params![
                    magazine.id.to_string(),
                    magazine.title.as_str(),
                    bool_to_int(magazine.open_status),
                    magazine.cover.as_deref(),
                ],
            )?;
            if changed == 0 {
                return Err(RepoError::NotFound {
                    entity: "magazine",
                    id: magazine.id,
                });
            }

            tx.execute(
                "DELETE FROM magazine_pages WHERE magazine_id = ?1;",
                [magazine.id.to_string()],
            )?;
            insert_pages(tx, magazine.id, pages)
        })
    }

    fn delete_magazine(&self, id: MagazineId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM magazines WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "magazine",
                id,
            });
        }
        Ok(())
    }
}

fn insert_pages(
    tx: &Transaction<'_>,
    magazine_id: MagazineId,
    pages: &[MagazinePage],
) -> RepoResult<()> {
    let mut stmt = tx.prepare(
        "INSERT INTO magazine_pages (id, magazine_id, scrap_id, text)
         VALUES (?1, ?2, ?3, ?4);",
    )?;
    for page in pages {
        if page.magazine_id != magazine_id {
            return Err(RepoError::InvalidData(format!(
                "page {} belongs to magazine {}, not {magazine_id}",
                page.id, page.magazine_id
            )));
        }
        stmt.execute(params![
            page.id.to_string(),
            magazine_id.to_string(),
            page.scrap_id.to_string(),
            page.text.as_str(),
        ])?;
    }
    Ok(())
}

fn parse_magazine_row(row: &Row<'_>) -> RepoResult<Magazine> {
    let id: String = row.get("id")?;
    let member_id: String = row.get("member_id")?;
    Ok(Magazine {
        id: parse_uuid(&id, "magazines.id")?,
        member_id: parse_uuid(&member_id, "magazines.member_id")?,
        title: row.get("title")?,
        open_status: int_to_bool(row.get("open_status")?, "magazines.open_status")?,
        cover: row.get("cover")?,
        created_at: row.get("created_at")?,
    })
}

fn parse_page_row(row: &Row<'_>) -> RepoResult<MagazinePage> {
    let id: String = row.get("id")?;
    let magazine_id: String = row.get("magazine_id")?;
    let scrap_id: String = row.get("scrap_id")?;
    Ok(MagazinePage {
        id: parse_uuid(&id, "magazine_pages.id")?,
        magazine_id: parse_uuid(&magazine_id, "magazine_pages.magazine_id")?,
        scrap_id: parse_uuid(&scrap_id, "magazine_pages.scrap_id")?,
        text: row.get("text")?,
    })
}
