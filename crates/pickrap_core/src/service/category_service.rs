//! Category use-case service.
//!
//! # Responsibility
//! - Create, rename and delete member categories.
//! - Project categories with their scraps for list/preview screens.
//!
//! # Invariants
//! - Category names are unique per member and at most 20 characters.
//! - The default category is never renamed or deleted.
//! - Deleting a category moves its scraps to the default category; the
//!   member's scrap count is unchanged.
//! - Categories owned by another member behave as missing.

use crate::model::category::{
    normalize_category_name, Category, CategoryId, CategoryNameError, DEFAULT_CATEGORY_NAME,
};
use crate::model::member::Member;
use crate::model::scrap::{Scrap, ScrapId, ScrapKind};
use crate::preview::{LinkPreview, LinkPreviewFetcher};
use crate::repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
use crate::repo::member_repo::{MemberRepository, SqliteMemberRepository};
use crate::repo::scrap_repo::{ScrapRepository, SqliteScrapRepository};
use crate::repo::{RepoError, RepoResult};
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::resolve_member;
use log::{info, warn};
use rusqlite::Connection;
use serde::Serialize;

/// Id + name projection of one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRecord {
    pub id: CategoryId,
    pub name: String,
}

impl From<Category> for CategoryRecord {
    fn from(value: Category) -> Self {
        Self {
            id: value.id,
            name: value.name,
        }
    }
}

/// Preview fields taken from one scrap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScrapPreview {
    #[serde(rename = "scrap_type")]
    pub kind: ScrapKind,
    pub content: Option<String>,
    pub file_url: Option<String>,
}

/// Category with a preview of its most recently inserted scrap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryScrapPreview {
    pub id: CategoryId,
    pub name: String,
    /// `None` when the category has no scraps.
    pub latest_scrap: Option<ScrapPreview>,
}

/// Scrap payload shaped by scrap kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "body", rename_all = "snake_case")]
pub enum ScrapBody {
    /// Image/video/pdf scraps.
    File { file_url: Option<String> },
    Link {
        content: Option<String>,
        url_preview: LinkPreview,
    },
    Text { content: Option<String> },
}

/// One scrap inside [`CategoryContents`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScrapView {
    pub scrap_id: ScrapId,
    #[serde(rename = "scrap_type")]
    pub kind: ScrapKind,
    /// Name of the category holding the scrap.
    pub category: String,
    #[serde(flatten)]
    pub body: ScrapBody,
}

/// Category with every contained scrap in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryContents {
    pub category_id: CategoryId,
    pub name: String,
    pub scraps: Vec<ScrapView>,
}

/// Category service facade over repository implementations.
pub struct CategoryService<M, C, S, P>
where
    M: MemberRepository,
    C: CategoryRepository,
    S: ScrapRepository,
    P: LinkPreviewFetcher,
{
    members: M,
    categories: C,
    scraps: S,
    previews: P,
}

impl<'conn, P: LinkPreviewFetcher>
    CategoryService<
        SqliteMemberRepository<'conn>,
        SqliteCategoryRepository<'conn>,
        SqliteScrapRepository<'conn>,
        P,
    >
{
    /// Wires the service to SQLite repositories on one connection.
    pub fn from_connection(conn: &'conn Connection, previews: P) -> RepoResult<Self> {
        Ok(Self::new(
            SqliteMemberRepository::try_new(conn)?,
            SqliteCategoryRepository::try_new(conn)?,
            SqliteScrapRepository::try_new(conn)?,
            previews,
        ))
    }
}

impl<M, C, S, P> CategoryService<M, C, S, P>
where
    M: MemberRepository,
    C: CategoryRepository,
    S: ScrapRepository,
    P: LinkPreviewFetcher,
{
    pub fn new(members: M, categories: C, scraps: S, previews: P) -> Self {
        Self {
            members,
            categories,
            scraps,
            previews,
        }
    }

    /// Creates the member's default category. Called once per new member.
    pub fn initial(&self, member: &Member) -> ServiceResult<CategoryRecord> {
        if self
            .categories
            .find_member_category_by_name(member.id, DEFAULT_CATEGORY_NAME)?
            .is_some()
        {
            return Err(ServiceError::ExistCategory(DEFAULT_CATEGORY_NAME.to_string()));
        }

        let category = Category::default_for(member.id);
        self.categories.create_category(&category)?;
        info!(
            "event=category_initial module=service status=ok member_id={}",
            member.id
        );
        Ok(category.into())
    }

    /// Creates a named category for the member.
    pub fn save(&self, name: &str, email: &str) -> ServiceResult<CategoryRecord> {
        let name = checked_name(name)?;
        let member = resolve_member(&self.members, email)?;
        if self
            .categories
            .find_member_category_by_name(member.id, &name)?
            .is_some()
        {
            warn!("event=category_save module=service status=rejected reason=exist_category");
            return Err(ServiceError::ExistCategory(name));
        }

        let category = Category::new(member.id, name);
        self.categories.create_category(&category)?;
        info!(
            "event=category_save module=service status=ok category_id={}",
            category.id
        );
        Ok(category.into())
    }

    /// Lists id + name of every category of the member.
    pub fn find_member_categories(&self, email: &str) -> ServiceResult<Vec<CategoryRecord>> {
        let member = resolve_member(&self.members, email)?;
        Ok(self
            .categories
            .list_member_categories(member.id)?
            .into_iter()
            .map(CategoryRecord::from)
            .collect())
    }

    /// Lists categories with a preview of their last inserted scrap.
    pub fn find_member_categories_scrap(
        &self,
        email: &str,
    ) -> ServiceResult<Vec<CategoryScrapPreview>> {
        let member = resolve_member(&self.members, email)?;
        let categories = self.categories.list_member_categories(member.id)?;

        let mut previews = Vec::with_capacity(categories.len());
        for category in categories {
            let latest_scrap = self
                .scraps
                .last_category_scrap(category.id)?
                .map(|scrap| ScrapPreview {
                    kind: scrap.kind,
                    content: scrap.content,
                    file_url: scrap.file_url,
                });
            previews.push(CategoryScrapPreview {
                id: category.id,
                name: category.name,
                latest_scrap,
            });
        }
        Ok(previews)
    }

    /// Lists categories with all of their scraps shaped by scrap kind.
    ///
    /// Link scraps carry a fetched URL preview; fetch failures yield an
    /// empty preview and never fail the listing.
    pub fn find_member_categories_all_scrap(
        &self,
        email: &str,
    ) -> ServiceResult<Vec<CategoryContents>> {
        let member = resolve_member(&self.members, email)?;
        let categories = self.categories.list_member_categories(member.id)?;

        let mut contents = Vec::with_capacity(categories.len());
        for category in categories {
            let scraps = self
                .scraps
                .list_category_scraps(category.id)?
                .into_iter()
                .map(|scrap| self.scrap_view(scrap, &category.name))
                .collect();
            contents.push(CategoryContents {
                category_id: category.id,
                name: category.name,
                scraps,
            });
        }
        Ok(contents)
    }

    /// Renames one of the member's categories in place.
    pub fn update(&self, name: &str, category_id: CategoryId, email: &str) -> ServiceResult<()> {
        let name = checked_name(name)?;
        let member = resolve_member(&self.members, email)?;
        let category = self.owned_category(&member, category_id)?;

        if category.is_default() {
            warn!("event=category_update module=service status=rejected reason=default_category");
            return Err(ServiceError::CantRenameDefaultCategory);
        }
        if category.name == name {
            warn!("event=category_update module=service status=rejected reason=same_category");
            return Err(ServiceError::SameCategory(name));
        }
        if self
            .categories
            .find_member_category_by_name(member.id, &name)?
            .is_some()
        {
            warn!("event=category_update module=service status=rejected reason=exist_category");
            return Err(ServiceError::ExistCategory(name));
        }

        self.categories.rename_category(category.id, &name)?;
        info!(
            "event=category_update module=service status=ok category_id={}",
            category.id
        );
        Ok(())
    }

    /// Deletes a category after moving its scraps to the default category.
    pub fn delete(&self, category_id: CategoryId, email: &str) -> ServiceResult<()> {
        let member = resolve_member(&self.members, email)?;
        let category = self.owned_category(&member, category_id)?;
        if category.is_default() {
            warn!("event=category_delete module=service status=rejected reason=default_category");
            return Err(ServiceError::CantDeleteDefaultCategory);
        }

        let fallback = self
            .categories
            .find_member_category_by_name(member.id, DEFAULT_CATEGORY_NAME)?
            .ok_or_else(|| {
                ServiceError::Repo(RepoError::InvalidData(format!(
                    "member {} has no default category",
                    member.id
                )))
            })?;

        let moved = self
            .categories
            .delete_category_reassigning_scraps(category.id, fallback.id)?;
        info!(
            "event=category_delete module=service status=ok category_id={} moved_scraps={moved}",
            category.id
        );
        Ok(())
    }

    fn owned_category(&self, member: &Member, category_id: CategoryId) -> ServiceResult<Category> {
        match self.categories.get_category(category_id)? {
            Some(category) if category.member_id == member.id => Ok(category),
            _ => Err(ServiceError::CategoryNotFound(category_id)),
        }
    }

    fn scrap_view(&self, scrap: Scrap, category_name: &str) -> ScrapView {
        let body = match scrap.kind {
            kind if kind.is_media() => ScrapBody::File {
                file_url: scrap.file_url,
            },
            ScrapKind::Link => {
                let url_preview = scrap
                    .content
                    .as_deref()
                    .map(|url| self.previews.fetch(url))
                    .unwrap_or_default();
                ScrapBody::Link {
                    content: scrap.content,
                    url_preview,
                }
            }
            _ => ScrapBody::Text {
                content: scrap.content,
            },
        };

        ScrapView {
            scrap_id: scrap.id,
            kind: scrap.kind,
            category: category_name.to_string(),
            body,
        }
    }
}

fn checked_name(name: &str) -> ServiceResult<String> {
    normalize_category_name(name).map_err(|err| match err {
        CategoryNameError::TooLong { chars } => ServiceError::CategoryTitleLong { chars },
        CategoryNameError::Empty => ServiceError::EmptyCategoryName,
    })
}
