//! Data models for the marketing site's content backend.
//!
//! Stored entities map to SQLite rows via `sqlx::FromRow` and serialize as
//! camelCase JSON via `serde`. Write payloads carry their own normalization
//! and validation.

pub mod blog_post;
pub mod trial_request;
pub mod validation;
