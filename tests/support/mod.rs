//! Shared in-memory backend for integration tests.
//!
//! Tracks per-operation call counts so tests can assert exactly how many
//! round trips a flow produced, and exposes gates that hold capture or
//! processing calls in flight until the test releases them.

// Each test binary uses its own subset of the helpers.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use snap_shell::backend::{BackendError, CaptureBackend, ImageFormat};
use snap_shell::settings::Settings;
use tokio::sync::Notify;

pub const FRAME: &[u8] = b"\x89PNG-mock-frame";

#[derive(Default)]
pub struct MockBackend {
    pub screenshots: Mutex<Vec<String>>,
    pub previews: Mutex<HashMap<String, Bytes>>,
    pub stored_settings: Mutex<Settings>,
    pub clipboard: Mutex<Vec<Bytes>>,

    pub capture_calls: AtomicUsize,
    pub save_calls: AtomicUsize,
    pub list_calls: AtomicUsize,
    pub process_calls: AtomicUsize,
    pub load_calls: Mutex<HashMap<String, usize>>,

    pub fail_capture: AtomicBool,
    pub fail_save: AtomicBool,
    pub fail_process: AtomicBool,
    pub fail_list: AtomicBool,

    capture_entered: Notify,
    capture_gate: Mutex<Option<Arc<Notify>>>,
    process_entered: Notify,
    process_gate: Mutex<Option<Arc<Notify>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the backend with saved screenshots (listing order as given).
    pub fn with_history(ids: &[&str]) -> Self {
        let backend = Self::default();
        {
            let mut screenshots = backend.screenshots.lock().unwrap();
            let mut previews = backend.previews.lock().unwrap();
            for id in ids {
                screenshots.push((*id).to_string());
                previews.insert((*id).to_string(), Bytes::from(format!("bytes-of-{}", id)));
            }
        }
        backend
    }

    /// Hold every subsequent capture call in flight until released.
    pub fn hold_captures(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.capture_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    /// Wait until a capture call has entered the backend.
    pub async fn wait_capture_entered(&self) {
        self.capture_entered.notified().await;
    }

    /// Hold every subsequent resize/convert call in flight until released.
    pub fn hold_processing(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.process_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub async fn wait_processing_entered(&self) {
        self.process_entered.notified().await;
    }

    pub fn load_count(&self, id: &str) -> usize {
        self.load_calls.lock().unwrap().get(id).copied().unwrap_or(0)
    }

    fn record_new_item(&self, id: &str, bytes: Bytes) {
        // Newest first, like the real backend listing.
        self.screenshots.lock().unwrap().insert(0, id.to_string());
        self.previews.lock().unwrap().insert(id.to_string(), bytes);
    }

    async fn captured_frame(&self) -> Result<Bytes, BackendError> {
        self.capture_calls.fetch_add(1, Ordering::SeqCst);
        self.capture_entered.notify_one();
        let gate = self.capture_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.fail_capture.load(Ordering::SeqCst) {
            return Err(BackendError("network unreachable".to_string()));
        }
        Ok(Bytes::from_static(FRAME))
    }
}

#[async_trait]
impl CaptureBackend for MockBackend {
    async fn capture_fullscreen(&self) -> Result<(Bytes, u32, u32), BackendError> {
        let bytes = self.captured_frame().await?;
        Ok((bytes, 800, 600))
    }

    async fn capture_window(&self) -> Result<(Bytes, u32, u32), BackendError> {
        let bytes = self.captured_frame().await?;
        Ok((bytes, 640, 400))
    }

    async fn capture_area(
        &self,
        _x: u32,
        _y: u32,
        _width: u32,
        _height: u32,
    ) -> Result<Bytes, BackendError> {
        self.captured_frame().await
    }

    async fn save_screenshot(
        &self,
        bytes: Bytes,
        _width: u32,
        _height: u32,
        filename: &str,
    ) -> Result<String, BackendError> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(BackendError("disk full".to_string()));
        }
        self.record_new_item(filename, bytes);
        Ok(filename.to_string())
    }

    async fn list_screenshots(&self) -> Result<Vec<String>, BackendError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(BackendError("listing unavailable".to_string()));
        }
        Ok(self.screenshots.lock().unwrap().clone())
    }

    async fn load_screenshot(&self, filename: &str) -> Result<Bytes, BackendError> {
        *self.load_calls.lock().unwrap().entry(filename.to_string()).or_insert(0) += 1;
        // Widen the race window so coalescing is actually exercised.
        tokio::time::sleep(Duration::from_millis(5)).await;
        self.previews
            .lock()
            .unwrap()
            .get(filename)
            .cloned()
            .ok_or_else(|| BackendError(format!("no such file: {}", filename)))
    }

    async fn resize_screenshot(
        &self,
        filename: &str,
        width: u32,
        height: u32,
    ) -> Result<String, BackendError> {
        self.process_calls.fetch_add(1, Ordering::SeqCst);
        self.process_entered.notify_one();
        let gate = self.process_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.fail_process.load(Ordering::SeqCst) {
            return Err(BackendError("decode error".to_string()));
        }
        let stem = filename.trim_end_matches(".png");
        let new_id = format!("{}_resized_{}x{}.png", stem, width, height);
        self.record_new_item(&new_id, Bytes::from_static(FRAME));
        Ok(new_id)
    }

    async fn convert_screenshot_format(
        &self,
        filename: &str,
        format: ImageFormat,
    ) -> Result<String, BackendError> {
        self.process_calls.fetch_add(1, Ordering::SeqCst);
        self.process_entered.notify_one();
        let gate = self.process_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.fail_process.load(Ordering::SeqCst) {
            return Err(BackendError("decode error".to_string()));
        }
        let stem = filename.trim_end_matches(".png");
        let new_id = format!("{}.{}", stem, format.as_str());
        self.record_new_item(&new_id, Bytes::from_static(FRAME));
        Ok(new_id)
    }

    async fn copy_to_clipboard(&self, bytes: Bytes) -> Result<(), BackendError> {
        self.clipboard.lock().unwrap().push(bytes);
        Ok(())
    }

    async fn clear_history(&self) -> Result<(), BackendError> {
        self.screenshots.lock().unwrap().clear();
        self.previews.lock().unwrap().clear();
        Ok(())
    }

    async fn load_settings(&self) -> Result<Settings, BackendError> {
        Ok(self.stored_settings.lock().unwrap().clone())
    }

    async fn save_settings(&self, settings: &Settings) -> Result<(), BackendError> {
        *self.stored_settings.lock().unwrap() = settings.clone();
        Ok(())
    }
}
