//! Business error taxonomy shared by all services.
//!
//! # Invariants
//! - Every failure maps to one [`ErrorStatus`] with a stable numeric code.
//! - Codes are part of the external contract and must never be reused.

use crate::model::category::{CategoryId, MAX_CATEGORY_NAME_CHARS};
use crate::model::magazine::{MagazineId, MAX_PAGE_TEXT_CHARS};
use crate::model::scrap::{ScrapId, ScrapKind};
use crate::repo::RepoError;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable business status reported to the boundary layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorStatus {
    InvalidEmail,
    ExistAccount,
    NotFoundMember,
    InvalidHashtag,
    NotSupportFile,
    EmptyScrapContent,
    ExistCategory,
    SameCategory,
    DontExistCategory,
    CantDeleteCate,
    CategoryTitleLong,
    EmptyCategoryName,
    CantUpdateCate,
    NotFoundScrap,
    ExceedTextLength,
    NotMatchWriter,
    NotFoundMagazine,
    DatabaseError,
}

impl ErrorStatus {
    pub fn code(self) -> u32 {
        match self {
            Self::InvalidEmail => 2002,
            Self::ExistAccount => 2004,
            Self::NotFoundMember => 3001,
            Self::InvalidHashtag => 3002,
            Self::NotSupportFile => 4001,
            Self::EmptyScrapContent => 4012,
            Self::ExistCategory => 4004,
            Self::SameCategory => 4005,
            Self::DontExistCategory => 4006,
            Self::CantDeleteCate => 4007,
            Self::CategoryTitleLong => 4008,
            Self::EmptyCategoryName => 4009,
            Self::CantUpdateCate => 4010,
            Self::NotFoundScrap => 4011,
            Self::ExceedTextLength => 5001,
            Self::NotMatchWriter => 5002,
            Self::NotFoundMagazine => 5003,
            Self::DatabaseError => 9000,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::InvalidEmail => "check the email format",
            Self::ExistAccount => "member already exists",
            Self::NotFoundMember => "member does not exist",
            Self::InvalidHashtag => "hashtag must not be blank",
            Self::NotSupportFile => "media scraps require an uploaded file",
            Self::EmptyScrapContent => "link and text scraps require content",
            Self::ExistCategory => "category already exists",
            Self::SameCategory => "category already has this name",
            Self::DontExistCategory => "category does not exist",
            Self::CantDeleteCate => "the default category cannot be deleted",
            Self::CategoryTitleLong => "category name exceeds 20 characters",
            Self::EmptyCategoryName => "category name must not be blank",
            Self::CantUpdateCate => "the default category cannot be renamed",
            Self::NotFoundScrap => "scrap does not exist",
            Self::ExceedTextLength => "page text exceeds 400 characters",
            Self::NotMatchWriter => "only the writer can modify this magazine",
            Self::NotFoundMagazine => "magazine does not exist",
            Self::DatabaseError => "storage failure",
        }
    }
}

impl Display for ErrorStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.code(), self.message())
    }
}

/// Result type used by service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service-level failure with enough context for diagnostics.
#[derive(Debug)]
pub enum ServiceError {
    InvalidEmail(String),
    ExistAccount(String),
    MemberNotFound(String),
    InvalidHashtag(String),
    MissingFile(ScrapKind),
    EmptyScrapContent(ScrapKind),
    ExistCategory(String),
    SameCategory(String),
    CategoryNotFound(CategoryId),
    CantDeleteDefaultCategory,
    CategoryTitleLong { chars: usize },
    EmptyCategoryName,
    CantRenameDefaultCategory,
    ScrapNotFound(ScrapId),
    ExceedTextLength { chars: usize },
    NotMatchWriter(MagazineId),
    MagazineNotFound(MagazineId),
    Repo(RepoError),
}

impl ServiceError {
    /// Stable status for the boundary layer.
    pub fn status(&self) -> ErrorStatus {
        match self {
            Self::InvalidEmail(_) => ErrorStatus::InvalidEmail,
            Self::ExistAccount(_) => ErrorStatus::ExistAccount,
            Self::MemberNotFound(_) => ErrorStatus::NotFoundMember,
            Self::InvalidHashtag(_) => ErrorStatus::InvalidHashtag,
            Self::MissingFile(_) => ErrorStatus::NotSupportFile,
            Self::EmptyScrapContent(_) => ErrorStatus::EmptyScrapContent,
            Self::ExistCategory(_) => ErrorStatus::ExistCategory,
            Self::SameCategory(_) => ErrorStatus::SameCategory,
            Self::CategoryNotFound(_) => ErrorStatus::DontExistCategory,
            Self::CantDeleteDefaultCategory => ErrorStatus::CantDeleteCate,
            Self::CategoryTitleLong { .. } => ErrorStatus::CategoryTitleLong,
            Self::EmptyCategoryName => ErrorStatus::EmptyCategoryName,
            Self::CantRenameDefaultCategory => ErrorStatus::CantUpdateCate,
            Self::ScrapNotFound(_) => ErrorStatus::NotFoundScrap,
            Self::ExceedTextLength { .. } => ErrorStatus::ExceedTextLength,
            Self::NotMatchWriter(_) => ErrorStatus::NotMatchWriter,
            Self::MagazineNotFound(_) => ErrorStatus::NotFoundMagazine,
            Self::Repo(_) => ErrorStatus::DatabaseError,
        }
    }

    /// Shorthand for `self.status().code()`.
    pub fn code(&self) -> u32 {
        self.status().code()
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEmail(email) => write!(f, "invalid email: `{email}`"),
            Self::ExistAccount(email) => write!(f, "member already exists: `{email}`"),
            Self::MemberNotFound(email) => write!(f, "member not found: `{email}`"),
            Self::InvalidHashtag(tag) => write!(f, "invalid hashtag: `{tag}`"),
            Self::MissingFile(kind) => write!(f, "{kind:?} scrap requires a file url"),
            Self::EmptyScrapContent(kind) => write!(f, "{kind:?} scrap requires content"),
            Self::ExistCategory(name) => write!(f, "category already exists: `{name}`"),
            Self::SameCategory(name) => write!(f, "category is already named `{name}`"),
            Self::CategoryNotFound(id) => write!(f, "category not found: {id}"),
            Self::CantDeleteDefaultCategory => {
                write!(f, "default category cannot be deleted")
            }
            Self::CategoryTitleLong { chars } => write!(
                f,
                "category name has {chars} characters, limit is {MAX_CATEGORY_NAME_CHARS}"
            ),
            Self::EmptyCategoryName => write!(f, "category name must not be blank"),
            Self::CantRenameDefaultCategory => write!(f, "default category cannot be renamed"),
            Self::ScrapNotFound(id) => write!(f, "scrap not found: {id}"),
            Self::ExceedTextLength { chars } => write!(
                f,
                "page text has {chars} characters, limit is {MAX_PAGE_TEXT_CHARS}"
            ),
            Self::NotMatchWriter(id) => write!(f, "caller is not the writer of magazine {id}"),
            Self::MagazineNotFound(id) => write!(f, "magazine not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Conflict {
                entity: "category",
                value,
            } => Self::ExistCategory(value),
            RepoError::Conflict {
                entity: "member",
                value,
            } => Self::ExistAccount(value),
            other => Self::Repo(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorStatus, ServiceError};
    use crate::repo::RepoError;
    use std::collections::HashSet;

    const ALL: [ErrorStatus; 18] = [
        ErrorStatus::InvalidEmail,
        ErrorStatus::ExistAccount,
        ErrorStatus::NotFoundMember,
        ErrorStatus::InvalidHashtag,
        ErrorStatus::NotSupportFile,
        ErrorStatus::EmptyScrapContent,
        ErrorStatus::ExistCategory,
        ErrorStatus::SameCategory,
        ErrorStatus::DontExistCategory,
        ErrorStatus::CantDeleteCate,
        ErrorStatus::CategoryTitleLong,
        ErrorStatus::EmptyCategoryName,
        ErrorStatus::CantUpdateCate,
        ErrorStatus::NotFoundScrap,
        ErrorStatus::ExceedTextLength,
        ErrorStatus::NotMatchWriter,
        ErrorStatus::NotFoundMagazine,
        ErrorStatus::DatabaseError,
    ];

    #[test]
    fn status_codes_are_unique() {
        let codes: HashSet<u32> = ALL.iter().map(|status| status.code()).collect();
        assert_eq!(codes.len(), ALL.len());
    }

    #[test]
    fn unique_conflicts_map_to_business_statuses() {
        let err = ServiceError::from(RepoError::Conflict {
            entity: "category",
            value: "Travel".to_string(),
        });
        assert_eq!(err.status(), ErrorStatus::ExistCategory);

        let err = ServiceError::from(RepoError::Conflict {
            entity: "member",
            value: "a@b.io".to_string(),
        });
        assert_eq!(err.code(), 2004);

        let err = ServiceError::from(RepoError::InvalidData("bad".to_string()));
        assert_eq!(err.status(), ErrorStatus::DatabaseError);
    }

    #[test]
    fn status_serializes_as_screaming_snake_case() {
        let json = serde_json::to_string(&ErrorStatus::CantDeleteCate).unwrap();
        assert_eq!(json, "\"CANT_DELETE_CATE\"");
    }
}
