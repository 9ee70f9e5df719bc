//! Centralized configuration (environment variables + defaults).

use crate::app::session::{SessionConfig, Theme};
use crate::domain::query::DEFAULT_PAGE_SIZE;
use crate::storage::{MemoryStore, PostgresShipmentStore, RestShipmentStore, ShipmentStore};
use anyhow::Context;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Postgres,
    Rest,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "memory" => Ok(StoreBackend::Memory),
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "rest" | "postgrest" | "supabase" => Ok(StoreBackend::Rest),
            other => Err(anyhow::anyhow!(
                "CATALOG_STORE must be one of memory, postgres, rest (got '{}')",
                other
            )),
        }
    }
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn required(name: &str) -> anyhow::Result<String> {
    optional(name).with_context(|| format!("{} must be set", name))
}

/// Which store to talk to (default: in-memory).
pub fn store_backend() -> anyhow::Result<StoreBackend> {
    optional("CATALOG_STORE").unwrap_or_default().parse()
}

/// Database URL (required for the postgres backend, no default).
pub fn database_url() -> anyhow::Result<String> {
    required("DATABASE_URL")
}

/// PostgREST base URL, e.g. `https://<project>.supabase.co/rest/v1/`.
pub fn rest_url() -> anyhow::Result<String> {
    required("CATALOG_REST_URL")
}

pub fn api_key() -> anyhow::Result<String> {
    required("CATALOG_API_KEY")
}

/// Token of the signed-in user, issued by the external auth provider.
pub fn session_token() -> Option<String> {
    optional("CATALOG_SESSION_TOKEN")
}

pub fn theme() -> anyhow::Result<Theme> {
    match optional("CATALOG_THEME") {
        Some(raw) => raw.parse::<Theme>().map_err(anyhow::Error::msg),
        None => Ok(Theme::default()),
    }
}

/// Rows per page (default 5, at least 1).
pub fn page_size() -> anyhow::Result<u64> {
    match optional("CATALOG_PAGE_SIZE") {
        Some(raw) => {
            let v = raw
                .trim()
                .parse::<u64>()
                .context("CATALOG_PAGE_SIZE must be a valid u64")?;
            Ok(v.max(1))
        }
        None => Ok(DEFAULT_PAGE_SIZE),
    }
}

pub fn http_addr() -> String {
    optional("CATALOG_HTTP_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string())
}

/// Everything the binaries need, read once at startup.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub backend: StoreBackend,
    pub session: SessionConfig,
    pub page_size: u64,
    pub http_addr: String,
}

impl CatalogConfig {
    /// Loads `.env` (if present) and reads the environment.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        Ok(Self {
            backend: store_backend()?,
            session: SessionConfig::new(session_token(), theme()?),
            page_size: page_size()?,
            http_addr: http_addr(),
        })
    }

    /// Builds the configured store. Backend-specific variables are only read here.
    pub async fn open_store(&self) -> anyhow::Result<Arc<dyn ShipmentStore>> {
        let store: Arc<dyn ShipmentStore> = match self.backend {
            StoreBackend::Memory => Arc::new(MemoryStore::new()),
            StoreBackend::Postgres => {
                Arc::new(PostgresShipmentStore::connect(&database_url()?).await?)
            }
            StoreBackend::Rest => Arc::new(RestShipmentStore::new(
                &rest_url()?,
                &api_key()?,
                self.session.session_token.as_deref(),
            )?),
        };
        Ok(store)
    }
}
