//! Blog posts, the content entities behind `/blog` and `/blog/{slug}`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::validation::{FieldError, Validator, non_blank};

const EXCERPT_MAX_CHARS: usize = 500;

/// A stored blog post.
///
/// Serialized with camelCase keys to match what the web client sends and
/// expects (`imageUrl`, `createdAt`, ...).
#[derive(Serialize, Deserialize, Clone, FromRow, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    /// Primary key.
    pub id: Uuid,

    pub title: String,

    /// URL-safe unique identifier used in `/blog/{slug}`.
    pub slug: String,

    /// Long-form markdown body.
    pub content: String,

    /// Short teaser; may be empty, in which case SEO copy falls back to the body.
    pub excerpt: String,

    pub category: String,

    pub author: String,

    /// Cover image; either absolute or site-relative (`/images/x.png`).
    pub image_url: Option<String>,

    /// Unpublished posts are only visible through the admin listing.
    pub published: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Payload for `POST /api/blog/posts`.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct NewBlogPost {
    pub title: String,
    /// Derived from the title when left blank.
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub category: String,
    pub author: String,
    pub image_url: Option<String>,
    pub published: bool,
}

impl NewBlogPost {
    /// Trim free text and fill in the slug if the client left it out.
    pub fn normalize(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self.slug = self.slug.trim().to_string();
        if self.slug.is_empty() {
            self.slug = slugify(&self.title);
        }
        self.category = self.category.trim().to_string();
        self.author = self.author.trim().to_string();
        self.excerpt = self.excerpt.trim().to_string();
        self.image_url = non_blank(self.image_url);
        self
    }

    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        Validator::new()
            .required("title", &self.title)
            .required("slug", &self.slug)
            .slug("slug", &self.slug)
            .required("content", &self.content)
            .required("category", &self.category)
            .required("author", &self.author)
            .max_chars("excerpt", &self.excerpt, EXCERPT_MAX_CHARS)
            .finish()
    }

    /// Materialize a post with a fresh id and timestamps.
    pub fn into_post(self, now: DateTime<Utc>) -> BlogPost {
        BlogPost {
            id: Uuid::new_v4(),
            title: self.title,
            slug: self.slug,
            content: self.content,
            excerpt: self.excerpt,
            category: self.category,
            author: self.author,
            image_url: self.image_url,
            published: self.published,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Payload for `PUT /api/blog/posts/{id}`; absent fields keep their value.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct BlogPostPatch {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub category: Option<String>,
    pub author: Option<String>,
    /// An empty string removes the cover image.
    pub image_url: Option<String>,
    pub published: Option<bool>,
}

impl BlogPostPatch {
    pub fn normalize(mut self) -> Self {
        let trim = |v: Option<String>| v.map(|s| s.trim().to_string());
        self.title = trim(self.title);
        self.slug = trim(self.slug);
        self.category = trim(self.category);
        self.author = trim(self.author);
        self.excerpt = trim(self.excerpt);
        self.image_url = trim(self.image_url);
        self
    }

    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut v = Validator::new();
        if let Some(title) = &self.title {
            v.required("title", title);
        }
        if let Some(slug) = &self.slug {
            v.required("slug", slug).slug("slug", slug);
        }
        if let Some(content) = &self.content {
            v.required("content", content);
        }
        if let Some(category) = &self.category {
            v.required("category", category);
        }
        if let Some(author) = &self.author {
            v.required("author", author);
        }
        if let Some(excerpt) = &self.excerpt {
            v.max_chars("excerpt", excerpt, EXCERPT_MAX_CHARS);
        }
        v.finish()
    }

    /// Merge the present fields into `post` and bump `updated_at`.
    pub fn apply(self, post: &mut BlogPost, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            post.title = title;
        }
        if let Some(slug) = self.slug {
            post.slug = slug;
        }
        if let Some(content) = self.content {
            post.content = content;
        }
        if let Some(excerpt) = self.excerpt {
            post.excerpt = excerpt;
        }
        if let Some(category) = self.category {
            post.category = category;
        }
        if let Some(author) = self.author {
            post.author = author;
        }
        if let Some(image_url) = self.image_url {
            post.image_url = non_blank(Some(image_url));
        }
        if let Some(published) = self.published {
            post.published = published;
        }
        post.updated_at = now;
    }
}

/// Search parameters for `GET /api/blog/posts/search`.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct PostSearch {
    #[serde(rename = "q")]
    pub query: Option<String>,
    pub category: Option<String>,
}

impl PostSearch {
    /// Blank filters are dropped so `?q=&category=` behaves like no filter.
    pub fn normalize(self) -> Self {
        Self {
            query: non_blank(self.query),
            category: non_blank(self.category),
        }
    }

    /// In-memory equivalent of the SQL search predicate.
    pub fn matches(&self, post: &BlogPost) -> bool {
        if let Some(category) = &self.category {
            if &post.category != category {
                return false;
            }
        }
        match &self.query {
            Some(query) => {
                let needle = query.to_lowercase();
                [&post.title, &post.excerpt, &post.content]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            }
            None => true,
        }
    }
}

/// Lowercase, hyphen-separated slug derived from a title.
pub fn slugify(title: &str) -> String {
    slug::slugify(title)
}
