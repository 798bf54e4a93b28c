//! Typed client over the backend port.
//!
//! Request/response mapping and error normalization only; no retries,
//! no state. Known-invalid input fails fast here, before the round trip.

use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;

use super::{CaptureBackend, CapturedImage, ImageFormat, Region};
use crate::error::{ShellError, ShellResult};
use crate::settings::Settings;

#[derive(Clone)]
pub struct CaptureClient {
    backend: Arc<dyn CaptureBackend>,
}

impl CaptureClient {
    pub fn new(backend: Arc<dyn CaptureBackend>) -> Self {
        Self { backend }
    }

    pub async fn capture_fullscreen(&self) -> ShellResult<CapturedImage> {
        let start = Instant::now();
        let (bytes, width, height) = self.backend.capture_fullscreen().await?;
        log::info!(
            "[CLIENT] Fullscreen capture {}x{} in {}ms — {} bytes",
            width,
            height,
            start.elapsed().as_millis(),
            bytes.len()
        );
        Ok(CapturedImage { bytes, width, height })
    }

    pub async fn capture_window(&self) -> ShellResult<CapturedImage> {
        let start = Instant::now();
        let (bytes, width, height) = self.backend.capture_window().await?;
        log::info!(
            "[CLIENT] Window capture {}x{} in {}ms — {} bytes",
            width,
            height,
            start.elapsed().as_millis(),
            bytes.len()
        );
        Ok(CapturedImage { bytes, width, height })
    }

    /// Capture a region of the screen.
    ///
    /// The rectangle is validated locally first; a known-bad request never
    /// reaches the backend. The backend returns bytes only, so the result's
    /// dimensions come from the validated request.
    pub async fn capture_region(&self, region: Region) -> ShellResult<CapturedImage> {
        region.validate()?;
        let start = Instant::now();
        let bytes = self
            .backend
            .capture_area(region.x as u32, region.y as u32, region.width, region.height)
            .await?;
        log::info!(
            "[CLIENT] Region capture {}x{} at ({},{}) in {}ms",
            region.width,
            region.height,
            region.x,
            region.y,
            start.elapsed().as_millis()
        );
        Ok(CapturedImage { bytes, width: region.width, height: region.height })
    }

    pub async fn save_capture(&self, image: &CapturedImage, filename: &str) -> ShellResult<String> {
        let id = self
            .backend
            .save_screenshot(image.bytes.clone(), image.width, image.height, filename)
            .await?;
        log::info!("[CLIENT] Saved capture as {}", id);
        Ok(id)
    }

    pub async fn list_history(&self) -> ShellResult<Vec<String>> {
        let ids = self.backend.list_screenshots().await?;
        log::debug!("[CLIENT] Listed {} history items", ids.len());
        Ok(ids)
    }

    pub async fn load_preview(&self, id: &str) -> ShellResult<Bytes> {
        let bytes = self.backend.load_screenshot(id).await?;
        log::debug!("[CLIENT] Loaded preview {} — {} bytes", id, bytes.len());
        Ok(bytes)
    }

    /// Resize a saved screenshot into a new history item.
    ///
    /// Dimensions are checked locally; zero is rejected before the call.
    pub async fn resize(&self, id: &str, width: u32, height: u32) -> ShellResult<String> {
        if width == 0 || height == 0 {
            return Err(ShellError::Validation(format!(
                "resize dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        let new_id = self.backend.resize_screenshot(id, width, height).await?;
        log::info!("[CLIENT] Resized {} to {}x{} as {}", id, width, height, new_id);
        Ok(new_id)
    }

    pub async fn convert_format(&self, id: &str, format: ImageFormat) -> ShellResult<String> {
        let new_id = self.backend.convert_screenshot_format(id, format).await?;
        log::info!("[CLIENT] Converted {} to {} as {}", id, format, new_id);
        Ok(new_id)
    }

    pub async fn copy_to_clipboard(&self, bytes: Bytes) -> ShellResult<()> {
        self.backend.copy_to_clipboard(bytes).await?;
        Ok(())
    }

    pub async fn clear_history(&self) -> ShellResult<()> {
        self.backend.clear_history().await?;
        log::info!("[CLIENT] History cleared");
        Ok(())
    }

    pub async fn load_settings(&self) -> ShellResult<Settings> {
        Ok(self.backend.load_settings().await?)
    }

    pub async fn save_settings(&self, settings: &Settings) -> ShellResult<()> {
        self.backend.save_settings(settings).await?;
        Ok(())
    }
}
