//! HTTP handlers for the blog content API.
//! Payloads are normalized and validated here; the store only enforces
//! slug uniqueness.

use crate::{
    errors::AppError,
    models::blog_post::{BlogPost, BlogPostPatch, NewBlogPost, PostSearch},
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

/// `GET /api/blog/posts`: published posts, newest first.
pub async fn list_published(
    State(state): State<AppState>,
) -> Result<Json<Vec<BlogPost>>, AppError> {
    Ok(Json(state.store.published_posts().await?))
}

/// `GET /api/blog/posts/all`: every post including drafts.
pub async fn list_all(State(state): State<AppState>) -> Result<Json<Vec<BlogPost>>, AppError> {
    Ok(Json(state.store.all_posts().await?))
}

/// `GET /api/blog/posts/search?q=&category=`
pub async fn search(
    State(state): State<AppState>,
    Query(search): Query<PostSearch>,
) -> Result<Json<Vec<BlogPost>>, AppError> {
    let search = search.normalize();
    Ok(Json(state.store.search_posts(&search).await?))
}

/// `GET /api/blog/categories`
pub async fn categories(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(state.store.categories().await?))
}

/// `GET /api/blog/posts/{id}`
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BlogPost>, AppError> {
    let id = parse_post_id(&id)?;
    state
        .store
        .post(id)
        .await?
        .map(Json)
        .ok_or_else(post_not_found)
}

/// `GET /api/blog/posts/slug/{slug}`
pub async fn get_post_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<BlogPost>, AppError> {
    state
        .store
        .post_by_slug(&slug)
        .await?
        .map(Json)
        .ok_or_else(post_not_found)
}

/// `POST /api/blog/posts`
pub async fn create_post(
    State(state): State<AppState>,
    payload: Result<Json<NewBlogPost>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(new) = payload.map_err(invalid_body)?;
    let new = new.normalize();
    new.validate().map_err(AppError::validation)?;

    let post = state.store.create_post(new).await?;
    tracing::info!(id = %post.id, slug = %post.slug, "blog post created");
    Ok((StatusCode::CREATED, Json(post)))
}

/// `PUT /api/blog/posts/{id}`
pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<BlogPostPatch>, JsonRejection>,
) -> Result<Json<BlogPost>, AppError> {
    let id = parse_post_id(&id)?;
    let Json(patch) = payload.map_err(invalid_body)?;
    let patch = patch.normalize();
    patch.validate().map_err(AppError::validation)?;

    let post = state
        .store
        .update_post(id, patch)
        .await?
        .ok_or_else(post_not_found)?;
    tracing::info!(id = %post.id, slug = %post.slug, "blog post updated");
    Ok(Json(post))
}

/// `DELETE /api/blog/posts/{id}`
pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_post_id(&id)?;
    if !state.store.delete_post(id).await? {
        return Err(post_not_found());
    }
    tracing::info!(%id, "blog post deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Non-UUID ids can never match a post, so they are reported as missing.
fn parse_post_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| post_not_found())
}

fn post_not_found() -> AppError {
    AppError::not_found("Blog post not found")
}

pub(crate) fn invalid_body(rejection: JsonRejection) -> AppError {
    AppError::bad_request(format!("Invalid request body: {}", rejection.body_text()))
}
