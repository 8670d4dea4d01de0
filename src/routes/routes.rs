//! Defines routes for the content API and the SEO-aware page fallback.
//!
//! ## Structure
//! - **Blog API**
//!   - `GET    /api/blog/posts`               published posts
//!   - `POST   /api/blog/posts`               create post
//!   - `GET    /api/blog/posts/all`           every post (admin)
//!   - `GET    /api/blog/posts/search`        `?q=&category=`
//!   - `GET    /api/blog/posts/slug/{slug}`   post by slug
//!   - `GET    /api/blog/posts/{id}`          post by id
//!   - `PUT    /api/blog/posts/{id}`          update post
//!   - `DELETE /api/blog/posts/{id}`          delete post
//!   - `GET    /api/blog/categories`          published categories
//!
//! - **Trial requests**
//!   - `GET    /api/trial-requests`
//!   - `POST   /api/trial-requests`
//!
//! Everything else falls through to the page handler, which serves the
//! client shell with head tags for the requested path.

use crate::{
    handlers::{
        blog_handlers::{
            categories, create_post, delete_post, get_post, get_post_by_slug, list_all,
            list_published, search, update_post,
        },
        health_handlers::{healthz, readyz},
        page_handlers::serve_page,
        trial_handlers::{create_trial_request, list_trial_requests},
    },
    state::AppState,
};
use axum::{Router, routing::get};

/// Build the router; state is attached by the caller.
pub fn routes() -> Router<AppState> {
    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // blog
        .route("/api/blog/posts", get(list_published).post(create_post))
        .route("/api/blog/posts/all", get(list_all))
        .route("/api/blog/posts/search", get(search))
        .route("/api/blog/posts/slug/{slug}", get(get_post_by_slug))
        .route(
            "/api/blog/posts/{id}",
            get(get_post).put(update_post).delete(delete_post),
        )
        .route("/api/blog/categories", get(categories))
        // trial signups
        .route(
            "/api/trial-requests",
            get(list_trial_requests).post(create_trial_request),
        )
        .fallback(serve_page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seo::metadata::SiteProfile;
    use crate::services::memory_store::MemoryStore;
    use crate::state::DEFAULT_SHELL;
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode, header},
        response::Response,
    };
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        let state = AppState::new(
            Arc::new(MemoryStore::seeded()),
            SiteProfile::default(),
            DEFAULT_SHELL,
        );
        routes().with_state(state)
    }

    fn request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder().method(method).uri(uri);
        match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(app: &Router, req: Request<Body>) -> Response {
        app.clone().oneshot(req).await.unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn body_json(response: Response) -> Value {
        serde_json::from_str(&body_text(response).await).unwrap()
    }

    fn new_post_json(title: &str) -> Value {
        json!({
            "title": title,
            "content": "# Heading\nBody",
            "category": "AI & Growth",
            "author": "Tester",
            "published": true
        })
    }

    #[tokio::test]
    async fn lists_published_posts_and_categories() {
        let app = app();
        let res = send(&app, request(Method::GET, "/api/blog/posts", None)).await;
        assert_eq!(res.status(), StatusCode::OK);
        let posts = body_json(res).await;
        assert_eq!(posts.as_array().unwrap().len(), 3);
        assert!(posts[0].get("createdAt").is_some());

        let res = send(&app, request(Method::GET, "/api/blog/categories", None)).await;
        assert_eq!(
            body_json(res).await,
            json!(["AI Automation", "Best Practices", "Growth Strategy"])
        );
    }

    #[tokio::test]
    async fn post_crud_lifecycle() {
        let app = app();

        let res = send(
            &app,
            request(Method::POST, "/api/blog/posts", Some(new_post_json("My Test Post"))),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let created = body_json(res).await;
        assert_eq!(created["slug"], "my-test-post");
        let id = created["id"].as_str().unwrap().to_string();

        let res = send(&app, request(Method::GET, &format!("/api/blog/posts/{id}"), None)).await;
        assert_eq!(res.status(), StatusCode::OK);

        let res = send(
            &app,
            request(Method::GET, "/api/blog/posts/slug/my-test-post", None),
        )
        .await;
        assert_eq!(body_json(res).await["id"], id.as_str());

        let res = send(
            &app,
            request(
                Method::PUT,
                &format!("/api/blog/posts/{id}"),
                Some(json!({ "excerpt": "Updated teaser", "published": false })),
            ),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let updated = body_json(res).await;
        assert_eq!(updated["excerpt"], "Updated teaser");
        assert_eq!(updated["title"], "My Test Post");

        let res = send(&app, request(Method::GET, "/api/blog/posts", None)).await;
        assert_eq!(body_json(res).await.as_array().unwrap().len(), 3);
        let res = send(&app, request(Method::GET, "/api/blog/posts/all", None)).await;
        assert_eq!(body_json(res).await.as_array().unwrap().len(), 4);

        let uri = format!("/api/blog/posts/{id}");
        let res = send(&app, request(Method::DELETE, &uri, None)).await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
        let res = send(&app, request(Method::DELETE, &uri, None)).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn duplicate_slug_is_a_conflict() {
        let app = app();
        let body = json!({
            "title": "Another take",
            "slug": "ai-revolutionizing-twitter-engagement",
            "content": "Body",
            "category": "AI",
            "author": "Tester"
        });
        let res = send(&app, request(Method::POST, "/api/blog/posts", Some(body))).await;
        assert_eq!(res.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(res).await["status"], 409);
    }

    #[tokio::test]
    async fn invalid_posts_are_rejected_with_field_errors() {
        let app = app();
        let res = send(
            &app,
            request(Method::POST, "/api/blog/posts", Some(json!({ "title": "Only a title" }))),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body = body_json(res).await;
        let fields: Vec<_> = body["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["field"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(fields, ["content", "category", "author"]);

        let malformed = Request::builder()
            .method(Method::POST)
            .uri("/api/blog/posts")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let res = send(&app, malformed).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_or_malformed_ids_are_not_found() {
        let app = app();
        for uri in [
            "/api/blog/posts/not-a-uuid".to_string(),
            format!("/api/blog/posts/{}", uuid::Uuid::new_v4()),
            "/api/blog/posts/slug/nope".to_string(),
        ] {
            let res = send(&app, request(Method::GET, &uri, None)).await;
            assert_eq!(res.status(), StatusCode::NOT_FOUND, "{uri}");
        }
        let res = send(
            &app,
            request(
                Method::PUT,
                &format!("/api/blog/posts/{}", uuid::Uuid::new_v4()),
                Some(json!({ "title": "x" })),
            ),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn search_filters_by_query_and_category() {
        let app = app();
        let res = send(
            &app,
            request(Method::GET, "/api/blog/posts/search?q=roi&category=", None),
        )
        .await;
        let posts = body_json(res).await;
        assert_eq!(posts.as_array().unwrap().len(), 1);
        assert_eq!(posts[0]["slug"], "measuring-roi-twitter-engagement-metrics");

        let res = send(
            &app,
            request(
                Method::GET,
                "/api/blog/posts/search?category=Growth%20Strategy",
                None,
            ),
        )
        .await;
        assert_eq!(body_json(res).await.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn trial_requests_are_validated_and_listed() {
        let app = app();
        let res = send(
            &app,
            request(
                Method::POST,
                "/api/trial-requests",
                Some(json!({ "name": "Ada", "email": "not-an-email" })),
            ),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(res).await["errors"][0]["field"], "email");

        let res = send(
            &app,
            request(
                Method::POST,
                "/api/trial-requests",
                Some(json!({
                    "name": "Ada",
                    "email": "ada@example.com",
                    "twitterHandle": "@ada",
                    "company": ""
                })),
            ),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let created = body_json(res).await;
        assert_eq!(created["twitterHandle"], "@ada");
        assert!(created["company"].is_null());

        let res = send(&app, request(Method::GET, "/api/trial-requests", None)).await;
        assert_eq!(body_json(res).await.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_api_paths_return_json_404() {
        let res = send(&app(), request(Method::GET, "/api/nope", None)).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(res).await["status"], 404);
    }

    #[tokio::test]
    async fn blog_pages_get_post_metadata() {
        let res = send(
            &app(),
            request(
                Method::GET,
                "/blog/building-authentic-relationships-automated-engagement",
                None,
            ),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(
            res.headers()[header::CONTENT_TYPE]
                .to_str()
                .unwrap()
                .starts_with("text/html")
        );
        let html = body_text(res).await;
        assert!(html.contains(
            "<title>Building Authentic Relationships Through Automated Engagement | EngageBot</title>"
        ));
        assert!(html.contains(r#"<meta name="description" content="Learn how to maintain genuine connections"#));
        assert_eq!(html.matches("<title>").count(), 1);
        assert!(html.contains(
            r#"<link rel="canonical" href="https://engagebot.live/blog/building-authentic-relationships-automated-engagement">"#
        ));
    }

    #[tokio::test]
    async fn static_and_unknown_pages_use_fixed_copy() {
        let app = app();
        let mut req = request(Method::GET, "/pricing?plan=pro", None);
        req.headers_mut()
            .insert(header::ACCEPT, "text/html,application/xhtml+xml".parse().unwrap());
        let html = body_text(send(&app, req).await).await;
        assert!(html.contains("<title>Pricing - EngageBot AI Twitter Automation</title>"));

        let html = body_text(send(&app, request(Method::GET, "/somewhere/else", None)).await).await;
        assert!(html.contains("<title>EngageBot - AI-Powered Twitter Engagement Automation</title>"));

        let html = body_text(send(&app, request(Method::GET, "/blog/missing-post", None)).await).await;
        assert!(html.contains("<title>Twitter Automation Blog | EngageBot Insights &amp; Strategies</title>"));
    }

    #[tokio::test]
    async fn non_html_clients_get_the_raw_shell() {
        let mut req = request(Method::GET, "/pricing", None);
        req.headers_mut()
            .insert(header::ACCEPT, "application/json".parse().unwrap());
        let res = send(&app(), req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_text(res).await, DEFAULT_SHELL);
    }

    #[tokio::test]
    async fn page_fallback_rejects_assets_and_other_methods() {
        let app = app();
        let res = send(&app, request(Method::GET, "/assets/index.js", None)).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let res = send(&app, request(Method::POST, "/pricing", None)).await;
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body_json(res).await["status"], 405);

        let res = send(&app, request(Method::HEAD, "/features", None)).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn health_probes_report_memory_backend() {
        let app = app();
        let res = send(&app, request(Method::GET, "/healthz", None)).await;
        assert_eq!(res.status(), StatusCode::OK);

        let res = send(&app, request(Method::GET, "/readyz", None)).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = body_json(res).await;
        assert_eq!(body["backend"], "memory");
        assert_eq!(body["checks"]["store"]["ok"], true);
    }
}
