//! Member use-case service.
//!
//! # Responsibility
//! - Register members together with their default category.
//! - Resolve callers by email for the other services.
//! - Manage member hashtags.
//!
//! # Invariants
//! - A registered member always owns exactly one default category.
//! - Hashtags are normalized and unique per member.

use crate::model::category::Category;
use crate::model::hashtag::{normalize_hashtag, Hashtag};
use crate::model::member::{is_valid_email, normalize_email, Member};
use crate::repo::hashtag_repo::{HashtagRepository, SqliteHashtagRepository};
use crate::repo::member_repo::{MemberRepository, SqliteMemberRepository};
use crate::repo::{RepoError, RepoResult};
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::resolve_member;
use log::{info, warn};
use rusqlite::Connection;

/// Member service facade over repository implementations.
pub struct MemberService<M: MemberRepository, H: HashtagRepository> {
    members: M,
    hashtags: H,
}

impl<'conn> MemberService<SqliteMemberRepository<'conn>, SqliteHashtagRepository<'conn>> {
    /// Wires the service to SQLite repositories on one connection.
    pub fn from_connection(conn: &'conn Connection) -> RepoResult<Self> {
        Ok(Self::new(
            SqliteMemberRepository::try_new(conn)?,
            SqliteHashtagRepository::try_new(conn)?,
        ))
    }
}

impl<M: MemberRepository, H: HashtagRepository> MemberService<M, H> {
    pub fn new(members: M, hashtags: H) -> Self {
        Self { members, hashtags }
    }

    /// Creates a member and its default "Uncategorized" category.
    pub fn register(&self, email: &str) -> ServiceResult<Member> {
        let normalized = normalize_email(email);
        if !is_valid_email(&normalized) {
            warn!("event=member_register module=service status=rejected reason=invalid_email");
            return Err(ServiceError::InvalidEmail(normalized));
        }
        if self.members.find_member_by_email(&normalized)?.is_some() {
            warn!("event=member_register module=service status=rejected reason=exist_account");
            return Err(ServiceError::ExistAccount(normalized));
        }

        let member = Member::new(&normalized);
        self.members
            .create_member(&member, &Category::default_for(member.id))?;
        info!(
            "event=member_register module=service status=ok member_id={}",
            member.id
        );
        Ok(member)
    }

    /// Resolves a member by email.
    pub fn find_by_email(&self, email: &str) -> ServiceResult<Member> {
        resolve_member(&self.members, email)
    }

    /// Adds one hashtag for the member; re-adding an existing tag is a no-op.
    pub fn add_hashtag(&self, email: &str, tag: &str) -> ServiceResult<Hashtag> {
        let member = self.find_by_email(email)?;
        let normalized =
            normalize_hashtag(tag).ok_or_else(|| ServiceError::InvalidHashtag(tag.to_string()))?;

        let hashtag = Hashtag::new(member.id, normalized);
        match self.hashtags.create_hashtag(&hashtag) {
            Ok(_) => Ok(hashtag),
            Err(RepoError::Conflict { .. }) => self
                .hashtags
                .list_member_hashtags(member.id)?
                .into_iter()
                .find(|existing| existing.tag == hashtag.tag)
                .ok_or_else(|| {
                    ServiceError::Repo(RepoError::InvalidData(format!(
                        "hashtag `{}` conflicted but was not found",
                        hashtag.tag
                    )))
                }),
            Err(err) => Err(err.into()),
        }
    }

    /// Lists the member's hashtags sorted by tag.
    pub fn list_hashtags(&self, email: &str) -> ServiceResult<Vec<Hashtag>> {
        let member = self.find_by_email(email)?;
        Ok(self.hashtags.list_member_hashtags(member.id)?)
    }
}
