//! Shared, read-only application state handed to every handler.

use std::path::Path;
use std::sync::Arc;

use crate::seo::metadata::SiteProfile;
use crate::services::store::BlogStore;

/// Used when the client build is missing, so page requests still get a head.
pub const DEFAULT_SHELL: &str = r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <title>EngageBot</title>
    <meta name="description" content="AI-powered Twitter engagement automation" />
  </head>
  <body>
    <div id="root"></div>
  </body>
</html>
"#;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BlogStore>,
    pub site: Arc<SiteProfile>,
    /// The SPA's index.html, rewritten per request.
    pub shell: Arc<str>,
}

impl AppState {
    pub fn new(store: Arc<dyn BlogStore>, site: SiteProfile, shell: impl Into<Arc<str>>) -> Self {
        Self {
            store,
            site: Arc::new(site),
            shell: shell.into(),
        }
    }
}

/// Read the HTML shell, falling back to [`DEFAULT_SHELL`] when it can't be read.
pub async fn load_shell(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    match tokio::fs::read_to_string(path).await {
        Ok(html) => {
            tracing::info!(path = %path.display(), "loaded HTML shell");
            html
        }
        Err(err) => {
            tracing::warn!(
                path = %path.display(),
                error = %err,
                "HTML shell unavailable, using built-in shell"
            );
            DEFAULT_SHELL.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_shell_falls_back_to_default() {
        let html = load_shell("/definitely/not/here/index.html").await;
        assert_eq!(html, DEFAULT_SHELL);
    }

    #[tokio::test]
    async fn shell_is_read_from_disk() {
        let path = std::env::temp_dir().join(format!("shell-{}.html", uuid::Uuid::new_v4()));
        tokio::fs::write(&path, "<html><head></head></html>").await.unwrap();
        assert_eq!(load_shell(&path).await, "<html><head></head></html>");
        tokio::fs::remove_file(&path).await.unwrap();
    }
}
