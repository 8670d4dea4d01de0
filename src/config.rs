use anyhow::{Context, Result};
use clap::Parser;
use std::env;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_BASE_URL: &str = "https://engagebot.live";
const DEFAULT_SITE_NAME: &str = "EngageBot";
const DEFAULT_SHELL_PATH: &str = "client/dist/index.html";

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` serves content from the in-memory store.
    pub database_url: Option<String>,
    /// Public origin used in canonical and Open Graph URLs, without trailing `/`.
    pub base_url: String,
    pub site_name: String,
    /// HTML shell the SEO injector rewrites for every page request.
    pub shell_path: String,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug, Default)]
#[command(author, version, about = "EngageBot marketing site and content API")]
pub struct Args {
    /// Host to bind to (overrides SITE_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides SITE_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// SQLite database URL (overrides SITE_DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Public base URL of the site (overrides SITE_BASE_URL)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Site name used in titles and Open Graph tags (overrides SITE_NAME)
    #[arg(long)]
    pub site_name: Option<String>,

    /// Path to the client's index.html (overrides SITE_SHELL_PATH)
    #[arg(long = "shell")]
    pub shell_path: Option<String>,

    /// Apply the database schema and exit
    #[arg(long)]
    pub migrate: bool,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig and migrate flag.
    pub fn from_env_and_args() -> Result<(Self, bool)> {
        let args = Args::parse();
        let migrate = args.migrate;
        Ok((Self::from_args(args)?, migrate))
    }

    /// Merge already-parsed CLI args over the environment.
    pub fn from_args(args: Args) -> Result<Self> {
        let env_port = match env::var("SITE_PORT") {
            Ok(value) => value
                .trim()
                .parse::<u16>()
                .with_context(|| format!("parsing SITE_PORT value `{}`", value))?,
            Err(env::VarError::NotPresent) => DEFAULT_PORT,
            Err(err) => return Err(err).context("reading SITE_PORT"),
        };

        let base_url = args
            .base_url
            .or_else(|| env_string("SITE_BASE_URL"))
            .unwrap_or_else(|| DEFAULT_BASE_URL.into());

        Ok(Self {
            host: args
                .host
                .or_else(|| env_string("SITE_HOST"))
                .unwrap_or_else(|| DEFAULT_HOST.into()),
            port: args.port.unwrap_or(env_port),
            database_url: args
                .database_url
                .or_else(|| env_string("SITE_DATABASE_URL")),
            base_url: base_url.trim_end_matches('/').to_string(),
            site_name: args
                .site_name
                .or_else(|| env_string("SITE_NAME"))
                .unwrap_or_else(|| DEFAULT_SITE_NAME.into()),
            shell_path: args
                .shell_path
                .or_else(|| env_string("SITE_SHELL_PATH"))
                .unwrap_or_else(|| DEFAULT_SHELL_PATH.into()),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// A set, non-blank environment variable.
fn env_string(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
