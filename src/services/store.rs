//! The storage seam shared by the REST handlers and the SEO pipeline.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    blog_post::{BlogPost, BlogPostPatch, NewBlogPost, PostSearch},
    trial_request::{NewTrialRequest, TrialRequest},
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("slug `{0}` is already used by another post")]
    SlugTaken(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Blog post and trial request persistence.
///
/// Payloads arrive normalized and validated; implementations only enforce
/// storage-level constraints (slug uniqueness). Listings are ordered newest
/// first.
#[async_trait]
pub trait BlogStore: Send + Sync {
    /// Short backend label for logs and readiness output.
    fn backend(&self) -> &'static str;

    async fn all_posts(&self) -> StoreResult<Vec<BlogPost>>;

    async fn published_posts(&self) -> StoreResult<Vec<BlogPost>>;

    /// Published posts matching the text query and/or exact category.
    async fn search_posts(&self, search: &PostSearch) -> StoreResult<Vec<BlogPost>>;

    /// Distinct categories of published posts, sorted.
    async fn categories(&self) -> StoreResult<Vec<String>>;

    async fn post(&self, id: Uuid) -> StoreResult<Option<BlogPost>>;

    async fn post_by_slug(&self, slug: &str) -> StoreResult<Option<BlogPost>>;

    async fn create_post(&self, new: NewBlogPost) -> StoreResult<BlogPost>;

    /// Returns `None` when no post has this id.
    async fn update_post(&self, id: Uuid, patch: BlogPostPatch) -> StoreResult<Option<BlogPost>>;

    /// Returns whether a post was removed.
    async fn delete_post(&self, id: Uuid) -> StoreResult<bool>;

    async fn create_trial_request(&self, new: NewTrialRequest) -> StoreResult<TrialRequest>;

    async fn trial_requests(&self) -> StoreResult<Vec<TrialRequest>>;

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

/// Sort newest first, the order every listing endpoint promises.
pub(crate) fn newest_first<T>(items: &mut [T], created_at: impl Fn(&T) -> DateTime<Utc>) {
    items.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
}
