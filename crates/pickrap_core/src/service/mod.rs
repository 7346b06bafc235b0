//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Enforce business invariants and map failures to [`ErrorStatus`].
//! - Keep boundary layers decoupled from storage details.

pub mod category_service;
pub mod error;
pub mod magazine_service;
pub mod member_service;
pub mod scrap_service;

use crate::model::member::{normalize_email, Member};
use crate::repo::member_repo::MemberRepository;
use error::{ServiceError, ServiceResult};

pub use error::ErrorStatus;

/// Resolves the calling member by email, failing fast when unknown.
pub(crate) fn resolve_member<M: MemberRepository>(members: &M, email: &str) -> ServiceResult<Member> {
    members
        .find_member_by_email(email)?
        .ok_or_else(|| ServiceError::MemberNotFound(normalize_email(email)))
}
