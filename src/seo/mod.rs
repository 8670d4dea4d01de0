//! Request-time SEO: classify the path, resolve metadata, rewrite the shell head.

pub mod head;
pub mod metadata;
pub mod route;

use head::HeadInjector;
use metadata::{MetadataResolver, SiteProfile};

use crate::services::store::BlogStore;

/// Render `shell` for `path` with page-specific head tags.
pub async fn render_page(store: &dyn BlogStore, site: &SiteProfile, shell: &str, path: &str) -> String {
    let meta = MetadataResolver::new(store, site).resolve_path(path).await;
    HeadInjector::new(site).inject(shell, &meta)
}
