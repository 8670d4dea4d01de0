use anyhow::{Context, Result};
use axum::{Router, http::Request};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::{io::ErrorKind, str::FromStr, sync::Arc};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::Level;
use tracing_subscriber::EnvFilter;

mod config;
mod errors;
mod handlers;
mod models;
mod routes;
mod seo;
mod services;
mod state;

use seo::metadata::SiteProfile;
use services::{memory_store::MemoryStore, sqlite_store::SqliteStore, store::BlogStore};
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // --- Logging setup ---
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // --- Parse config + migrate flag ---
    let (cfg, migrate) = config::AppConfig::from_env_and_args()?;

    tracing::info!("Starting engagebot-site with config: {:?}", cfg);

    // --- Handle migration mode ---
    if migrate {
        let url = cfg
            .database_url
            .as_deref()
            .context("--migrate needs --database-url or SITE_DATABASE_URL")?;
        connect_sqlite(url).await?;
        tracing::info!("Database migration complete.");
        return Ok(()); // exit after migration
    }

    // --- Initialize content store ---
    let store: Arc<dyn BlogStore> = match cfg.database_url.as_deref() {
        Some(url) => match connect_sqlite(url).await {
            Ok(store) => Arc::new(store),
            Err(err) => {
                tracing::warn!(
                    "Database unavailable ({:#}); serving sample content from memory",
                    err
                );
                Arc::new(MemoryStore::seeded())
            }
        },
        None => {
            tracing::info!("No database configured; serving sample content from memory");
            Arc::new(MemoryStore::seeded())
        }
    };
    tracing::info!(backend = store.backend(), "content store ready");

    // --- Build router ---
    let shell = state::load_shell(&cfg.shell_path).await;
    let site = SiteProfile::new(cfg.site_name.clone(), cfg.base_url.clone());
    let app: Router = routes::routes::routes()
        .with_state(AppState::new(store, site, shell))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                tracing::span!(
                    Level::INFO,
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        );

    // --- Start server ---
    let addr = cfg.addr();
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err)
            if err.kind() == ErrorKind::PermissionDenied
                && matches!(cfg.host.as_str(), "0.0.0.0" | "::") =>
        {
            let fallback_addr = format!("127.0.0.1:{}", cfg.port);
            tracing::warn!(
                "Permission denied binding to {} ({}). Falling back to {}",
                addr,
                err,
                fallback_addr
            );
            TcpListener::bind(&fallback_addr)
                .await
                .with_context(|| format!("binding {}", fallback_addr))?
        }
        Err(err) => return Err(err).with_context(|| format!("binding {}", addr)),
    };

    tracing::info!("Server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Open the SQLite database (creating the file and its directory if needed)
/// and bring the schema up to date.
async fn connect_sqlite(url: &str) -> Result<SqliteStore> {
    tracing::debug!("Connecting using raw URL => {}", url);

    let options = SqliteConnectOptions::from_str(url)
        .with_context(|| format!("parsing database URL `{}`", url))?
        .create_if_missing(true);

    if let Some(parent) = options.get_filename().parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating database directory {:?}", parent))?;
            tracing::info!("Created missing directory {:?}", parent);
        }
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .with_context(|| format!("connecting to {}", url))?;

    let store = SqliteStore::new(Arc::new(pool));
    let applied = store.migrate().await.context("applying database schema")?;
    tracing::info!("Applied {} schema statements", applied);
    Ok(store)
}
