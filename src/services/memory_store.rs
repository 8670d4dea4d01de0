//! In-memory fallback store.
//!
//! Used when no database is configured or the database cannot be reached.
//! Starts with a handful of published sample posts so the blog is never empty.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::{BTreeSet, HashMap};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::store::{BlogStore, StoreError, StoreResult, newest_first};
use crate::models::{
    blog_post::{BlogPost, BlogPostPatch, NewBlogPost, PostSearch},
    trial_request::{NewTrialRequest, TrialRequest},
};

#[derive(Default)]
pub struct MemoryStore {
    posts: RwLock<HashMap<Uuid, BlogPost>>,
    trial_requests: RwLock<Vec<TrialRequest>>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with the sample posts.
    pub fn seeded() -> Self {
        let posts = sample_posts()
            .into_iter()
            .map(|post| (post.id, post))
            .collect();
        Self {
            posts: RwLock::new(posts),
            trial_requests: RwLock::default(),
        }
    }
}

#[async_trait]
impl BlogStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn all_posts(&self) -> StoreResult<Vec<BlogPost>> {
        let mut posts: Vec<_> = self.posts.read().await.values().cloned().collect();
        newest_first(&mut posts, |p| p.created_at);
        Ok(posts)
    }

    async fn published_posts(&self) -> StoreResult<Vec<BlogPost>> {
        let mut posts: Vec<_> = self
            .posts
            .read()
            .await
            .values()
            .filter(|p| p.published)
            .cloned()
            .collect();
        newest_first(&mut posts, |p| p.created_at);
        Ok(posts)
    }

    async fn search_posts(&self, search: &PostSearch) -> StoreResult<Vec<BlogPost>> {
        let mut posts: Vec<_> = self
            .posts
            .read()
            .await
            .values()
            .filter(|p| p.published && search.matches(p))
            .cloned()
            .collect();
        newest_first(&mut posts, |p| p.created_at);
        Ok(posts)
    }

    async fn categories(&self) -> StoreResult<Vec<String>> {
        let categories: BTreeSet<String> = self
            .posts
            .read()
            .await
            .values()
            .filter(|p| p.published)
            .map(|p| p.category.clone())
            .collect();
        Ok(categories.into_iter().collect())
    }

    async fn post(&self, id: Uuid) -> StoreResult<Option<BlogPost>> {
        Ok(self.posts.read().await.get(&id).cloned())
    }

    async fn post_by_slug(&self, slug: &str) -> StoreResult<Option<BlogPost>> {
        Ok(self
            .posts
            .read()
            .await
            .values()
            .find(|p| p.slug == slug)
            .cloned())
    }

    async fn create_post(&self, new: NewBlogPost) -> StoreResult<BlogPost> {
        let mut posts = self.posts.write().await;
        if posts.values().any(|p| p.slug == new.slug) {
            return Err(StoreError::SlugTaken(new.slug));
        }
        let post = new.into_post(Utc::now());
        posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update_post(&self, id: Uuid, patch: BlogPostPatch) -> StoreResult<Option<BlogPost>> {
        let mut posts = self.posts.write().await;
        if let Some(slug) = &patch.slug {
            if posts.values().any(|p| p.id != id && &p.slug == slug) {
                return Err(StoreError::SlugTaken(slug.clone()));
            }
        }
        let Some(post) = posts.get_mut(&id) else {
            return Ok(None);
        };
        patch.apply(post, Utc::now());
        Ok(Some(post.clone()))
    }

    async fn delete_post(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.posts.write().await.remove(&id).is_some())
    }

    async fn create_trial_request(&self, new: NewTrialRequest) -> StoreResult<TrialRequest> {
        let request = new.into_request(Utc::now());
        self.trial_requests.write().await.push(request.clone());
        Ok(request)
    }

    async fn trial_requests(&self) -> StoreResult<Vec<TrialRequest>> {
        let mut requests = self.trial_requests.read().await.clone();
        newest_first(&mut requests, |r| r.created_at);
        Ok(requests)
    }
}

fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .unwrap_or_default()
}

fn sample_posts() -> Vec<BlogPost> {
    let post = |title: &str,
                slug: &str,
                excerpt: &str,
                content: &str,
                category: &str,
                author: &str,
                image: &str,
                created: DateTime<Utc>| BlogPost {
        id: Uuid::new_v4(),
        title: title.into(),
        slug: slug.into(),
        content: content.trim().into(),
        excerpt: excerpt.into(),
        category: category.into(),
        author: author.into(),
        image_url: Some(image.into()),
        published: true,
        created_at: created,
        updated_at: created,
    };

    vec![
        post(
            "How AI is Revolutionizing Twitter Engagement for Entrepreneurs",
            "ai-revolutionizing-twitter-engagement",
            "Discover how modern entrepreneurs are leveraging AI to scale their Twitter presence while maintaining authentic engagement...",
            r#"
# How AI is Revolutionizing Twitter Engagement for Entrepreneurs

Entrepreneurs have to stay visible on social media while running a business. Twitter rewards
real-time conversation, which makes it both an opportunity and a time sink.

## The Traditional Approach Falls Short

Manual engagement eats hours every day. Generic automation produces robotic replies that damage
a brand. Neither builds relationships.

## Enter AI-Powered Engagement

Language models can read a thread, understand its context, keep your voice consistent and draw
on your own knowledge base to answer like an expert.
"#,
            "AI Automation",
            "EngageBot Team",
            "https://images.unsplash.com/photo-1485827404703-89b55fcc595e?auto=format&fit=crop&w=800&h=400",
            date(2023, 12, 15),
        ),
        post(
            "Building Authentic Relationships Through Automated Engagement",
            "building-authentic-relationships-automated-engagement",
            "Learn how to maintain genuine connections and build meaningful relationships while scaling your engagement through intelligent automation...",
            r#"
# Building Authentic Relationships Through Automated Engagement

Automation does not have to destroy authenticity. Authentic engagement is relevant, carries
your personality and shares real expertise.

## The Relationship-First Approach

Every interaction is a chance to demonstrate expertise, add value and build trust. Automate
the discovery, keep the quality bar where it belongs.
"#,
            "Growth Strategy",
            "Sarah Martinez",
            "https://images.unsplash.com/photo-1432888622747-4eb9a8efeb07?auto=format&fit=crop&w=800&h=400",
            date(2023, 12, 12),
        ),
        post(
            "Measuring ROI: Twitter Engagement Metrics That Actually Matter",
            "measuring-roi-twitter-engagement-metrics",
            "Beyond likes and retweets: discover the key metrics successful entrepreneurs track to measure real Twitter engagement success...",
            r#"
# Measuring ROI: Twitter Engagement Metrics That Actually Matter

Likes, retweets and follower counts tell an incomplete story. They rarely correlate with
business outcomes and are easy to inflate.

## Metrics Worth Tracking

Track conversations started with qualified prospects, profile visits from replies and the
leads that trace back to a thread.
"#,
            "Best Practices",
            "David Thompson",
            "https://images.unsplash.com/photo-1551434678-e076c223a692?auto=format&fit=crop&w=800&h=400",
            date(2023, 12, 10),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_post(title: &str, category: &str, published: bool) -> NewBlogPost {
        NewBlogPost {
            title: title.into(),
            content: "Body".into(),
            category: category.into(),
            author: "Tester".into(),
            published,
            ..Default::default()
        }
        .normalize()
    }

    #[tokio::test]
    async fn seeded_store_lists_newest_first() {
        let store = MemoryStore::seeded();
        let posts = store.published_posts().await.unwrap();
        assert_eq!(posts.len(), 3);
        assert_eq!(posts[0].slug, "ai-revolutionizing-twitter-engagement");
        assert_eq!(posts[2].slug, "measuring-roi-twitter-engagement-metrics");
    }

    #[tokio::test]
    async fn drafts_are_hidden_from_published_views() {
        let store = MemoryStore::new();
        store.create_post(new_post("Draft Post", "Misc", false)).await.unwrap();
        store.create_post(new_post("Live Post", "News", true)).await.unwrap();

        assert_eq!(store.all_posts().await.unwrap().len(), 2);
        let published = store.published_posts().await.unwrap();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].slug, "live-post");
        assert_eq!(store.categories().await.unwrap(), ["News"]);
    }

    #[tokio::test]
    async fn duplicate_slug_is_rejected() {
        let store = MemoryStore::new();
        store.create_post(new_post("Same Title", "A", true)).await.unwrap();
        let err = store
            .create_post(new_post("Same Title", "B", true))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::SlugTaken(slug) if slug == "same-title"));
    }

    #[tokio::test]
    async fn update_rejects_slug_of_other_post_but_allows_own() {
        let store = MemoryStore::new();
        let first = store.create_post(new_post("First", "A", true)).await.unwrap();
        store.create_post(new_post("Second", "A", true)).await.unwrap();

        let clash = BlogPostPatch {
            slug: Some("second".into()),
            ..Default::default()
        };
        assert!(matches!(
            store.update_post(first.id, clash).await,
            Err(StoreError::SlugTaken(_))
        ));

        let same = BlogPostPatch {
            slug: Some("first".into()),
            excerpt: Some("Updated".into()),
            ..Default::default()
        };
        let updated = store.update_post(first.id, same).await.unwrap().unwrap();
        assert_eq!(updated.excerpt, "Updated");
        assert!(updated.updated_at >= first.updated_at);
    }

    #[tokio::test]
    async fn update_and_delete_missing_post() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();
        assert!(
            store
                .update_post(id, BlogPostPatch::default())
                .await
                .unwrap()
                .is_none()
        );
        assert!(!store.delete_post(id).await.unwrap());
    }

    #[tokio::test]
    async fn lookup_by_slug_and_delete() {
        let store = MemoryStore::seeded();
        let post = store
            .post_by_slug("building-authentic-relationships-automated-engagement")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(post.category, "Growth Strategy");
        assert!(store.delete_post(post.id).await.unwrap());
        assert!(store.post(post.id).await.unwrap().is_none());
        assert!(store.post_by_slug("no-such-post").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn search_filters_text_and_category() {
        let store = MemoryStore::seeded();
        let by_text = store
            .search_posts(&PostSearch {
                query: Some("RETWEETS".into()),
                category: None,
            })
            .await
            .unwrap();
        assert_eq!(by_text.len(), 1);
        assert_eq!(by_text[0].category, "Best Practices");

        let by_category = store
            .search_posts(&PostSearch {
                query: None,
                category: Some("Growth Strategy".into()),
            })
            .await
            .unwrap();
        assert_eq!(by_category.len(), 1);
    }

    #[tokio::test]
    async fn trial_requests_round_trip() {
        let store = MemoryStore::new();
        let created = store
            .create_trial_request(NewTrialRequest {
                name: "Ada".into(),
                email: "ada@example.com".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        let all = store.trial_requests().await.unwrap();
        assert_eq!(all, vec![created]);
    }
}
