//! History cache — known saved-screenshot ids plus a coalescing preview
//! cache.
//!
//! This is the one piece of state shared between the capture session, the
//! processing session, and the coordinator. All mutation goes through
//! [`HistoryCache::refresh`] and [`HistoryCache::get_preview`]; sessions
//! never write to it directly.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use tokio::sync::OnceCell;

use crate::backend::CaptureClient;
use crate::error::{ShellError, ShellResult};

/// How many of the most-recently-listed items get their previews fetched
/// eagerly after a refresh. Everything past the window loads on demand.
pub const PREFETCH_WINDOW: usize = 12;

pub struct HistoryCache {
    client: CaptureClient,
    ids: Mutex<Vec<String>>,
    previews: Mutex<HashMap<String, Arc<OnceCell<Bytes>>>>,
}

impl HistoryCache {
    pub fn new(client: CaptureClient) -> Self {
        Self {
            client,
            ids: Mutex::new(Vec::new()),
            previews: Mutex::new(HashMap::new()),
        }
    }

    /// Replace the known-id set with a fresh listing.
    ///
    /// Previews for ids that survive the refresh are kept; previews for
    /// ids no longer listed are dropped, so no orphan entries remain.
    /// Two refreshes landing back-to-back are safe; the later listing
    /// wins.
    pub async fn refresh(&self) -> ShellResult<()> {
        let listed = self.client.list_history().await?;

        let mut ids = self.ids.lock().unwrap();
        let mut previews = self.previews.lock().unwrap();
        let before = previews.len();
        previews.retain(|id, _| listed.contains(id));
        if previews.len() < before {
            log::debug!("[HISTORY] Dropped {} stale previews", before - previews.len());
        }
        *ids = listed;
        log::debug!("[HISTORY] Refreshed — {} known items", ids.len());
        Ok(())
    }

    /// Cached preview bytes for `id`, fetching them once if missing.
    ///
    /// Concurrent callers for the same id share a single in-flight
    /// `load_screenshot`; a failed fetch leaves the slot empty so a later
    /// call retries.
    pub async fn get_preview(&self, id: &str) -> ShellResult<Bytes> {
        let cell = {
            let ids = self.ids.lock().unwrap();
            if !ids.iter().any(|known| known == id) {
                return Err(ShellError::InvalidReference(id.to_string()));
            }
            let mut previews = self.previews.lock().unwrap();
            previews
                .entry(id.to_string())
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .clone()
        };

        let bytes = cell.get_or_try_init(|| self.client.load_preview(id)).await?;
        Ok(bytes.clone())
    }

    /// Eagerly fetch previews for the newest [`PREFETCH_WINDOW`] items.
    ///
    /// Individual failures are logged and left for on-demand retry; the
    /// gallery tolerates a missing thumbnail.
    pub async fn prefetch_window(&self) {
        let window: Vec<String> = {
            let ids = self.ids.lock().unwrap();
            ids.iter().take(PREFETCH_WINDOW).cloned().collect()
        };
        for id in window {
            if let Err(err) = self.get_preview(&id).await {
                log::warn!("[HISTORY] Prefetch failed for {}: {}", id, err);
            }
        }
    }

    /// Ordered known ids, newest first.
    pub fn ids(&self) -> Vec<String> {
        self.ids.lock().unwrap().clone()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.lock().unwrap().iter().any(|known| known == id)
    }

    /// Previews already resident in memory, keyed by id.
    pub fn loaded_previews(&self) -> HashMap<String, Bytes> {
        self.previews
            .lock()
            .unwrap()
            .iter()
            .filter_map(|(id, cell)| cell.get().map(|bytes| (id.clone(), bytes.clone())))
            .collect()
    }
}
