//! Category repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist per-member categories and answer reverse lookups by owner.
//! - Own the delete-with-reassignment unit of work.
//!
//! # Invariants
//! - Listing order is creation order (`rowid ASC`).
//! - Deleting a category never deletes scraps: they are moved first, in the
//!   same transaction as the row removal.

use crate::db::run_in_transaction;
use crate::model::category::{Category, CategoryId};
use crate::model::member::MemberId;
use crate::repo::{conflict_or_db, ensure_schema, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const CATEGORY_SELECT_SQL: &str = "SELECT id, member_id, name FROM categories";

/// Repository interface for categories.
pub trait CategoryRepository {
    fn create_category(&self, category: &Category) -> RepoResult<CategoryId>;
    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>>;
    /// Finds the category of `member_id` with exactly `name`.
    fn find_member_category_by_name(
        &self,
        member_id: MemberId,
        name: &str,
    ) -> RepoResult<Option<Category>>;
    /// Lists all categories of one member in creation order.
    fn list_member_categories(&self, member_id: MemberId) -> RepoResult<Vec<Category>>;
    fn rename_category(&self, id: CategoryId, name: &str) -> RepoResult<()>;
    /// Moves every scrap of `id` into `fallback_id`, then deletes `id`.
    ///
    /// Returns the number of reassigned scraps.
    fn delete_category_reassigning_scraps(
        &self,
        id: CategoryId,
        fallback_id: CategoryId,
    ) -> RepoResult<usize>;
}

/// SQLite-backed category repository.
#[derive(Clone, Copy)]
pub struct SqliteCategoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCategoryRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema(
            conn,
            &[
                ("categories", &["id", "member_id", "name"]),
                ("scraps", &["id", "category_id"]),
            ],
        )?;
        Ok(Self { conn })
    }
}

impl CategoryRepository for SqliteCategoryRepository<'_> {
    fn create_category(&self, category: &Category) -> RepoResult<CategoryId> {
        self.conn
            .execute(
                "INSERT INTO categories (id, member_id, name) VALUES (?1, ?2, ?3);",
                params![
                    category.id.to_string(),
                    category.member_id.to_string(),
                    category.name.as_str(),
                ],
            )
            .map_err(|err| conflict_or_db(err, "category", &category.name))?;
        Ok(category.id)
    }

    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        self.conn
            .query_row(
                &format!("{CATEGORY_SELECT_SQL} WHERE id = ?1;"),
                [id.to_string()],
                read_category_columns,
            )
            .optional()?
            .map(parse_category)
            .transpose()
    }

    fn find_member_category_by_name(
        &self,
        member_id: MemberId,
        name: &str,
    ) -> RepoResult<Option<Category>> {
        self.conn
            .query_row(
                &format!("{CATEGORY_SELECT_SQL} WHERE member_id = ?1 AND name = ?2;"),
                params![member_id.to_string(), name],
                read_category_columns,
            )
            .optional()?
            .map(parse_category)
            .transpose()
    }

    fn list_member_categories(&self, member_id: MemberId) -> RepoResult<Vec<Category>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CATEGORY_SELECT_SQL} WHERE member_id = ?1 ORDER BY rowid ASC;"
        ))?;
        let mut rows = stmt.query([member_id.to_string()])?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next()? {
            categories.push(parse_category(read_category_columns(row)?)?);
        }
        Ok(categories)
    }

    fn rename_category(&self, id: CategoryId, name: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute(
                "UPDATE categories SET name = ?2 WHERE id = ?1;",
                params![id.to_string(), name],
            )
            .map_err(|err| conflict_or_db(err, "category", name))?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "category",
                id,
            });
        }
        Ok(())
    }

    fn delete_category_reassigning_scraps(
        &self,
        id: CategoryId,
        fallback_id: CategoryId,
    ) -> RepoResult<usize> {
        run_in_transaction(self.conn, "category_delete", |tx| {
            let moved = tx.execute(
                "UPDATE scraps SET category_id = ?2 WHERE category_id = ?1;",
                params![id.to_string(), fallback_id.to_string()],
            )?;
            let deleted = tx.execute("DELETE FROM categories WHERE id = ?1;", [id.to_string()])?;
            if deleted == 0 {
                return Err(RepoError::NotFound {
                    entity: "category",
                    id,
                });
            }
            Ok(moved)
        })
    }
}

fn read_category_columns(row: &Row<'_>) -> rusqlite::Result<(String, String, String)> {
    Ok((row.get("id")?, row.get("member_id")?, row.get("name")?))
}

fn parse_category((id, member_id, name): (String, String, String)) -> RepoResult<Category> {
    Ok(Category {
        id: parse_uuid(&id, "categories.id")?,
        member_id: parse_uuid(&member_id, "categories.member_id")?,
        name,
    })
}
