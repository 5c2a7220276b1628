use std::sync::Arc;

use anyhow::Result;
use futures::future::try_join_all;
use tracing::{debug, info, warn};

use crate::cache::{Cache, CacheStorage};
use crate::fetch::{FetchError, FetchRequest, FetchedResponse, Fetcher};

/// Current cache version name.
pub const CACHE_NAME: &str = "clamping-admin-v1";

/// Assets precached at install. Everything else is routed per request.
pub const ASSETS_TO_CACHE: &[&str] = &["/", "/static/css/style.css", "/static/manifest.json"];

/// Lifecycle of one worker version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Parsed,
    Installing,
    Installed,
    Activating,
    Activated,
    Redundant,
}

/// Service-worker-style cache worker for a single origin.
///
/// Install populates the current cache version all-or-nothing; activate
/// purges every other version; `handle_fetch` applies the routing policy.
pub struct OfflineWorker {
    storage: CacheStorage,
    fetcher: Arc<dyn Fetcher>,
    origin: String,
    cache_name: String,
    assets: Vec<String>,
    state: WorkerState,
}

impl OfflineWorker {
    pub fn new(storage: CacheStorage, fetcher: Arc<dyn Fetcher>, origin: impl Into<String>) -> Self {
        let origin = origin.into();
        Self {
            storage,
            fetcher,
            origin: origin.trim_end_matches('/').to_string(),
            cache_name: CACHE_NAME.to_string(),
            assets: ASSETS_TO_CACHE.iter().map(|s| s.to_string()).collect(),
            state: WorkerState::Parsed,
        }
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    pub fn cache_name(&self) -> &str {
        &self.cache_name
    }

    pub fn storage(&self) -> &CacheStorage {
        &self.storage
    }

    fn asset_url(&self, path: &str) -> String {
        format!("{}{}", self.origin, path)
    }

    /// Install: fetch every precache asset and persist them as one cache
    /// version. All-or-nothing: any failure aborts the install and leaves
    /// any previously stored version untouched. Readiness is immediate
    /// (skip waiting), so a successful install may be activated right away.
    pub async fn install(&mut self) -> Result<()> {
        self.state = WorkerState::Installing;
        info!(version = %self.cache_name, assets = self.assets.len(), "installing cache version");

        let fetches = self.assets.iter().map(|path| {
            let request = FetchRequest::get(self.asset_url(path));
            let fetcher = Arc::clone(&self.fetcher);
            async move {
                let response = fetcher.fetch(&request).await?;
                if !response.is_success() {
                    return Err(FetchError::from_status(response.status, &response.body_text()));
                }
                Ok::<_, FetchError>((request.url, response))
            }
        });

        let fetched = match try_join_all(fetches).await {
            Ok(fetched) => fetched,
            Err(e) => {
                self.state = WorkerState::Redundant;
                return Err(anyhow::Error::from(e).context("Failed to precache assets"));
            }
        };

        let mut cache = Cache::new(&self.cache_name);
        for (url, response) in fetched {
            cache.put(url, response);
        }

        if let Err(e) = self.storage.save(&cache) {
            self.state = WorkerState::Redundant;
            return Err(e);
        }

        self.state = WorkerState::Installed;
        Ok(())
    }

    /// Activate: delete every stored cache version except the current one,
    /// then claim open clients.
    pub async fn activate(&mut self) -> Result<()> {
        self.state = WorkerState::Activating;

        for name in self.storage.version_names()? {
            if name != self.cache_name {
                info!(version = %name, "purging stale cache version");
                self.storage.delete(&name)?;
            }
        }

        self.state = WorkerState::Activated;
        info!(version = %self.cache_name, "cache worker active");
        Ok(())
    }

    /// Install then activate, logging the outcome instead of propagating it.
    /// Returns whether registration reached the active state.
    pub async fn register(&mut self) -> bool {
        if let Err(e) = self.install().await {
            warn!(error = %e, "worker install failed");
            return false;
        }
        if let Err(e) = self.activate().await {
            warn!(error = %e, "worker activate failed");
            return false;
        }
        info!("service worker registered");
        true
    }

    /// Requests under `/api/` and non-GET requests must see fresh data;
    /// everything else is assumed to be a static asset.
    fn is_network_first(request: &FetchRequest) -> bool {
        request.url.contains("/api/") || !request.is_get()
    }

    fn match_cached(&self, url: &str) -> Option<FetchedResponse> {
        match self.storage.open(&self.cache_name) {
            Ok(cache) => cache.match_url(url).cloned(),
            Err(e) => {
                warn!(error = %e, "failed to open cache, treating as miss");
                None
            }
        }
    }

    /// Route one intercepted request.
    ///
    /// Network-first requests fall back to the cache on network failure;
    /// cache-first requests fall through to the network on a miss. A
    /// request that fails both legs surfaces the fetch error.
    pub async fn handle_fetch(&self, request: &FetchRequest) -> Result<FetchedResponse, FetchError> {
        if Self::is_network_first(request) {
            match self.fetcher.fetch(request).await {
                Ok(response) => Ok(response),
                Err(e) => match self.match_cached(&request.url) {
                    Some(cached) => {
                        debug!(url = %request.url, "network failed, serving cached entry");
                        Ok(cached)
                    }
                    None => Err(e),
                },
            }
        } else {
            match self.match_cached(&request.url) {
                Some(cached) => {
                    debug!(url = %request.url, "serving from cache");
                    Ok(cached)
                }
                None => self.fetcher.fetch(request).await,
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
