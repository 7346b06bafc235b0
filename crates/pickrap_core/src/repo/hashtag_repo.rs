//! Hashtag repository contracts and SQLite implementation.

use crate::model::hashtag::{Hashtag, HashtagId};
use crate::model::member::MemberId;
use crate::repo::{conflict_or_db, ensure_schema, parse_uuid, RepoResult};
use rusqlite::{params, Connection};

/// Repository interface for member hashtags.
pub trait HashtagRepository {
    /// Inserts one hashtag. Duplicate `(member, tag)` pairs yield `Conflict`.
    fn create_hashtag(&self, hashtag: &Hashtag) -> RepoResult<HashtagId>;
    /// Lists hashtags of one member sorted by tag.
    fn list_member_hashtags(&self, member_id: MemberId) -> RepoResult<Vec<Hashtag>>;
}

/// SQLite-backed hashtag repository.
#[derive(Clone, Copy)]
pub struct SqliteHashtagRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteHashtagRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema(conn, &[("hashtags", &["id", "member_id", "tag"])])?;
        Ok(Self { conn })
    }
}

impl HashtagRepository for SqliteHashtagRepository<'_> {
    fn create_hashtag(&self, hashtag: &Hashtag) -> RepoResult<HashtagId> {
        self.conn
            .execute(
                "INSERT INTO hashtags (id, member_id, tag) VALUES (?1, ?2, ?3);",
                params![
                    hashtag.id.to_string(),
                    hashtag.member_id.to_string(),
                    hashtag.tag.as_str(),
                ],
            )
            .map_err(|err| conflict_or_db(err, "hashtag", &hashtag.tag))?;
        Ok(hashtag.id)
    }

    fn list_member_hashtags(&self, member_id: MemberId) -> RepoResult<Vec<Hashtag>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, member_id, tag
             FROM hashtags
             WHERE member_id = ?1
             ORDER BY tag ASC;",
        )?;
        let mut rows = stmt.query([member_id.to_string()])?;
        let mut hashtags = Vec::new();
        while let Some(row) = rows.next()? {
            let id: String = row.get("id")?;
            let owner: String = row.get("member_id")?;
            hashtags.push(Hashtag {
                id: parse_uuid(&id, "hashtags.id")?,
                member_id: parse_uuid(&owner, "hashtags.member_id")?,
                tag: row.get("tag")?,
            });
        }
        Ok(hashtags)
    }
}
