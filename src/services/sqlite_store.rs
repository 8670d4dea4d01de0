//! SQLite-backed store.
//!
//! Posts and trial requests live in two tables created by
//! `migrations/0001_init.sql`. The schema statements are idempotent, so
//! [`SqliteStore::migrate`] runs on every startup as well as in `--migrate`
//! mode.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{QueryBuilder, SqlitePool, sqlite::Sqlite};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use super::store::{BlogStore, StoreError, StoreResult};
use crate::models::{
    blog_post::{BlogPost, BlogPostPatch, NewBlogPost, PostSearch},
    trial_request::{NewTrialRequest, TrialRequest},
};

const SCHEMA_SQL: &str = include_str!("../../migrations/0001_init.sql");

const POST_COLUMNS: &str = "id, title, slug, content, excerpt, category, author, image_url, \
                            published, created_at, updated_at";

const TRIAL_COLUMNS: &str = "id, name, email, company, twitter_handle, message, created_at";

#[derive(Clone)]
pub struct SqliteStore {
    /// Shared SQLite connection pool.
    pub db: Arc<SqlitePool>,
}

impl SqliteStore {
    pub fn new(db: Arc<SqlitePool>) -> Self {
        Self { db }
    }

    /// Apply the embedded schema, one statement at a time.
    pub async fn migrate(&self) -> StoreResult<usize> {
        let statements = SCHEMA_SQL
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        for stmt in &statements {
            debug!("Executing migration SQL: {}", stmt);
            sqlx::query(stmt).execute(&*self.db).await?;
        }

        Ok(statements.len())
    }

    async fn fetch_posts(&self, published_only: bool) -> StoreResult<Vec<BlogPost>> {
        let mut builder =
            QueryBuilder::<Sqlite>::new(format!("SELECT {POST_COLUMNS} FROM blog_posts"));
        if published_only {
            builder.push(" WHERE published = 1");
        }
        builder.push(" ORDER BY created_at DESC");
        let posts: Vec<BlogPost> = builder.build_query_as().fetch_all(&*self.db).await?;
        Ok(posts)
    }
}

#[async_trait]
impl BlogStore for SqliteStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    async fn all_posts(&self) -> StoreResult<Vec<BlogPost>> {
        self.fetch_posts(false).await
    }

    async fn published_posts(&self) -> StoreResult<Vec<BlogPost>> {
        self.fetch_posts(true).await
    }

    async fn search_posts(&self, search: &PostSearch) -> StoreResult<Vec<BlogPost>> {
        let mut builder = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {POST_COLUMNS} FROM blog_posts WHERE published = 1"
        ));

        if let Some(query) = &search.query {
            // LIKE is case-insensitive for ASCII; lower() both sides for the rest.
            let pattern = format!("%{}%", escape_like(&query.to_lowercase()));
            builder.push(" AND (lower(title) LIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" ESCAPE '\\' OR lower(excerpt) LIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" ESCAPE '\\' OR lower(content) LIKE ");
            builder.push_bind(pattern);
            builder.push(" ESCAPE '\\')");
        }

        if let Some(category) = &search.category {
            builder.push(" AND category = ");
            builder.push_bind(category.clone());
        }

        builder.push(" ORDER BY created_at DESC");
        let posts: Vec<BlogPost> = builder.build_query_as().fetch_all(&*self.db).await?;
        Ok(posts)
    }

    async fn categories(&self) -> StoreResult<Vec<String>> {
        let rows = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT category FROM blog_posts WHERE published = 1 ORDER BY category ASC",
        )
        .fetch_all(&*self.db)
        .await?;
        Ok(rows)
    }

    async fn post(&self, id: Uuid) -> StoreResult<Option<BlogPost>> {
        let post = sqlx::query_as::<_, BlogPost>(&format!(
            "SELECT {POST_COLUMNS} FROM blog_posts WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&*self.db)
        .await?;
        Ok(post)
    }

    async fn post_by_slug(&self, slug: &str) -> StoreResult<Option<BlogPost>> {
        let post = sqlx::query_as::<_, BlogPost>(&format!(
            "SELECT {POST_COLUMNS} FROM blog_posts WHERE slug = ?"
        ))
        .bind(slug)
        .fetch_optional(&*self.db)
        .await?;
        Ok(post)
    }

    async fn create_post(&self, new: NewBlogPost) -> StoreResult<BlogPost> {
        let post = new.into_post(Utc::now());
        let result = sqlx::query(&format!(
            "INSERT INTO blog_posts ({POST_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        ))
        .bind(post.id)
        .bind(&post.title)
        .bind(&post.slug)
        .bind(&post.content)
        .bind(&post.excerpt)
        .bind(&post.category)
        .bind(&post.author)
        .bind(&post.image_url)
        .bind(post.published)
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&*self.db)
        .await;

        match result {
            Ok(_) => Ok(post),
            Err(err) if is_unique_violation(&err) => Err(StoreError::SlugTaken(post.slug)),
            Err(err) => Err(StoreError::Sqlx(err)),
        }
    }

    async fn update_post(&self, id: Uuid, patch: BlogPostPatch) -> StoreResult<Option<BlogPost>> {
        let mut tx = self.db.begin().await?;

        let existing = sqlx::query_as::<_, BlogPost>(&format!(
            "SELECT {POST_COLUMNS} FROM blog_posts WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(mut post) = existing else {
            return Ok(None);
        };
        patch.apply(&mut post, Utc::now());

        let result = sqlx::query(
            "UPDATE blog_posts SET title = ?, slug = ?, content = ?, excerpt = ?, category = ?,
                    author = ?, image_url = ?, published = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&post.title)
        .bind(&post.slug)
        .bind(&post.content)
        .bind(&post.excerpt)
        .bind(&post.category)
        .bind(&post.author)
        .bind(&post.image_url)
        .bind(post.published)
        .bind(post.updated_at)
        .bind(post.id)
        .execute(&mut *tx)
        .await;

        match result {
            Ok(_) => {
                tx.commit().await?;
                Ok(Some(post))
            }
            Err(err) if is_unique_violation(&err) => Err(StoreError::SlugTaken(post.slug)),
            Err(err) => Err(StoreError::Sqlx(err)),
        }
    }

    async fn delete_post(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM blog_posts WHERE id = ?")
            .bind(id)
            .execute(&*self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_trial_request(&self, new: NewTrialRequest) -> StoreResult<TrialRequest> {
        let request = new.into_request(Utc::now());
        sqlx::query(&format!(
            "INSERT INTO trial_requests ({TRIAL_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?)"
        ))
        .bind(request.id)
        .bind(&request.name)
        .bind(&request.email)
        .bind(&request.company)
        .bind(&request.twitter_handle)
        .bind(&request.message)
        .bind(request.created_at)
        .execute(&*self.db)
        .await?;
        Ok(request)
    }

    async fn trial_requests(&self) -> StoreResult<Vec<TrialRequest>> {
        let rows = sqlx::query_as::<_, TrialRequest>(&format!(
            "SELECT {TRIAL_COLUMNS} FROM trial_requests ORDER BY created_at DESC"
        ))
        .fetch_all(&*self.db)
        .await?;
        Ok(rows)
    }

    async fn ping(&self) -> StoreResult<()> {
        match sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&*self.db)
            .await?
        {
            1 => Ok(()),
            other => Err(StoreError::Unavailable(format!("unexpected result: {}", other))),
        }
    }
}

/// Return true if SQLx error indicates a unique constraint violation.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.message().to_ascii_lowercase().contains("unique")
    )
}

/// Escape `%`, `_` and the escape character itself for a LIKE pattern.
fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
