//! Fetching CSV exports from URLs and local files.

use crate::cache::SourceCache;
use crate::error::{DataError, Result};
use crate::source::Source;
use crate::table::RawTable;
use std::sync::Arc;
use tracing::{debug, info};

/// User agent sent with remote requests.
const USER_AGENT: &str = concat!("navtrack/", env!("CARGO_PKG_VERSION"));

/// Configuration for cache-aware loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchConfig {
    /// Whether to use the cache.
    pub use_cache: bool,
    /// Whether to force refresh (ignore cached entries, then repopulate).
    pub force_refresh: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            use_cache: true,
            force_refresh: false,
        }
    }
}

/// Reads a source into a [`RawTable`].
///
/// Each call performs exactly one read; failures are returned as-is, without retries.
#[derive(Debug, Clone)]
pub struct CsvLoader {
    client: reqwest::Client,
}

impl CsvLoader {
    /// Create a loader with a default HTTP client.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client })
    }

    /// Fetch and parse a source.
    pub async fn load(&self, source: &Source) -> Result<RawTable> {
        debug!(source = %source, "loading source");
        let table = match source {
            Source::Url(url) => self.fetch_url(url).await?,
            Source::File(path) => {
                let bytes = tokio::fs::read(path).await?;
                RawTable::from_bytes(&bytes)?
            }
        };
        info!(source = %source, records = table.len(), "source loaded");
        Ok(table)
    }

    /// Fetch a source through a caller-owned cache.
    ///
    /// With `use_cache` unset the cache is neither read nor written. With
    /// `force_refresh` set the cached entry is invalidated before fetching.
    pub async fn load_cached(
        &self,
        cache: &mut SourceCache,
        source: &Source,
        config: FetchConfig,
    ) -> Result<Arc<RawTable>> {
        if !config.use_cache {
            return Ok(Arc::new(self.load(source).await?));
        }

        if config.force_refresh {
            cache.invalidate(source);
        } else if let Some(table) = cache.get(source) {
            debug!(source = %source, "cache hit");
            return Ok(table);
        }

        let table = self.load(source).await?;
        Ok(cache.insert(source, table))
    }

    async fn fetch_url(&self, url: &str) -> Result<RawTable> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = response.bytes().await?;
        RawTable::from_bytes(&bytes)
    }
}
