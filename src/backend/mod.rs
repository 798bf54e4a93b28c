//! Capture/storage backend port.
//!
//! The real backend — pixel capture, codecs, the screenshot directory,
//! the OS clipboard — lives behind the app shell. This crate sees only
//! the narrow async command surface below. Implementations must be
//! thread-safe: the coordinator shares one handle between both sessions
//! and the history cache.

mod client;

pub use client::CaptureClient;

use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::{ShellError, ShellResult};
use crate::settings::Settings;

/// Error reported by the backend service.
///
/// Opaque beyond its message; the client normalizes it into
/// [`ShellError::Backend`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct BackendError(pub String);

impl From<BackendError> for ShellError {
    fn from(err: BackendError) -> Self {
        ShellError::Backend(err.0)
    }
}

/// Raw pixels from a capture that has not been saved yet.
///
/// Owned exclusively by the active capture session until it is saved or
/// discarded. The payload is opaque to this layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapturedImage {
    pub bytes: Bytes,
    pub width: u32,
    pub height: u32,
}

/// A screen-space rectangle selected for region capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    /// Local validity check, run before any backend round trip.
    pub fn validate(&self) -> ShellResult<()> {
        if self.x < 0 || self.y < 0 {
            return Err(ShellError::Validation(format!(
                "region origin must be non-negative, got ({}, {})",
                self.x, self.y
            )));
        }
        if self.width == 0 || self.height == 0 {
            return Err(ShellError::Validation(format!(
                "region dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// Output format for a format-conversion operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
    Bmp,
    Tiff,
}

impl ImageFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Bmp => "bmp",
            ImageFormat::Tiff => "tiff",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Async command surface of the capture/storage backend.
///
/// One operation per backend capability; a single attempt per call, no
/// retries at this layer.
#[async_trait::async_trait]
pub trait CaptureBackend: Send + Sync {
    /// Capture the primary monitor. Returns bytes plus pixel dimensions.
    async fn capture_fullscreen(&self) -> Result<(Bytes, u32, u32), BackendError>;

    /// Capture the currently focused window. Backends may fall back to a
    /// fullscreen grab.
    async fn capture_window(&self) -> Result<(Bytes, u32, u32), BackendError>;

    /// Capture a screen region. Coordinates are pre-validated by the client.
    async fn capture_area(
        &self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> Result<Bytes, BackendError>;

    /// Persist a capture under `filename`; returns the saved item's id.
    async fn save_screenshot(
        &self,
        bytes: Bytes,
        width: u32,
        height: u32,
        filename: &str,
    ) -> Result<String, BackendError>;

    /// Full ordered listing of saved screenshot ids, newest first.
    async fn list_screenshots(&self) -> Result<Vec<String>, BackendError>;

    /// Load the preview payload for one saved screenshot.
    async fn load_screenshot(&self, filename: &str) -> Result<Bytes, BackendError>;

    /// Resize a saved screenshot; the result is a new history item.
    async fn resize_screenshot(
        &self,
        filename: &str,
        width: u32,
        height: u32,
    ) -> Result<String, BackendError>;

    /// Re-encode a saved screenshot; the result is a new history item.
    async fn convert_screenshot_format(
        &self,
        filename: &str,
        format: ImageFormat,
    ) -> Result<String, BackendError>;

    /// Put an image payload on the OS clipboard.
    async fn copy_to_clipboard(&self, bytes: Bytes) -> Result<(), BackendError>;

    /// Remove every saved screenshot.
    async fn clear_history(&self) -> Result<(), BackendError>;

    async fn load_settings(&self) -> Result<Settings, BackendError>;

    async fn save_settings(&self, settings: &Settings) -> Result<(), BackendError>;
}
