//! Member repository contracts and SQLite implementation.
//!
//! # Invariants
//! - A member row is never visible without its default category: both are
//!   inserted in one transaction.
//! - Email lookups use the normalized (lowercase) form.

use crate::db::run_in_transaction;
use crate::model::category::Category;
use crate::model::member::{normalize_email, Member, MemberId};
use crate::repo::{conflict_or_db, ensure_schema, parse_uuid, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

/// Repository interface for member accounts.
pub trait MemberRepository {
    /// Inserts a member together with its default category.
    fn create_member(&self, member: &Member, default_category: &Category) -> RepoResult<MemberId>;
    fn find_member_by_email(&self, email: &str) -> RepoResult<Option<Member>>;
    fn get_member(&self, id: MemberId) -> RepoResult<Option<Member>>;
}

/// SQLite-backed member repository.
#[derive(Clone, Copy)]
pub struct SqliteMemberRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMemberRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema(
            conn,
            &[
                ("members", &["id", "email"]),
                ("categories", &["id", "member_id", "name"]),
            ],
        )?;
        Ok(Self { conn })
    }
}

impl MemberRepository for SqliteMemberRepository<'_> {
    fn create_member(&self, member: &Member, default_category: &Category) -> RepoResult<MemberId> {
        run_in_transaction(self.conn, "member_create", |tx| {
            tx.execute(
                "INSERT INTO members (id, email) VALUES (?1, ?2);",
                params![member.id.to_string(), member.email.as_str()],
            )
            .map_err(|err| conflict_or_db(err, "member", &member.email))?;
            tx.execute(
                "INSERT INTO categories (id, member_id, name) VALUES (?1, ?2, ?3);",
                params![
                    default_category.id.to_string(),
                    member.id.to_string(),
                    default_category.name.as_str(),
                ],
            )?;
            Ok(member.id)
        })
    }

    fn find_member_by_email(&self, email: &str) -> RepoResult<Option<Member>> {
        self.conn
            .query_row(
                "SELECT id, email FROM members WHERE email = ?1;",
                [normalize_email(email)],
                read_member_columns,
            )
            .optional()?
            .map(parse_member)
            .transpose()
    }

    fn get_member(&self, id: MemberId) -> RepoResult<Option<Member>> {
        self.conn
            .query_row(
                "SELECT id, email FROM members WHERE id = ?1;",
                [id.to_string()],
                read_member_columns,
            )
            .optional()?
            .map(parse_member)
            .transpose()
    }
}

fn read_member_columns(row: &Row<'_>) -> rusqlite::Result<(String, String)> {
    Ok((row.get("id")?, row.get("email")?))
}

fn parse_member((id, email): (String, String)) -> RepoResult<Member> {
    Ok(Member {
        id: parse_uuid(&id, "members.id")?,
        email,
    })
}
