//! Capture session — the lifecycle of one screenshot from trigger to
//! saved file.
//!
//! Exactly one logical session exists; a new capture intent while a round
//! trip is in flight is rejected, never queued. Illegal combinations the
//! original UI allowed (saving with no pixels in hand) are unrepresentable
//! here: the image travels with the state that owns it.

use serde::Serialize;

use crate::backend::{CapturedImage, Region};
use crate::error::{ShellError, ShellResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureStatus {
    #[default]
    Idle,
    Capturing,
    Captured,
    Saving,
    Saved,
    Failed,
}

/// What the user asked to capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureMode {
    Fullscreen,
    Window,
    Region(Region),
}

#[derive(Debug, Default)]
pub struct CaptureSession {
    status: CaptureStatus,
    image: Option<CapturedImage>,
    error: Option<ShellError>,
    saved_id: Option<String>,
}

impl CaptureSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> CaptureStatus {
        self.status
    }

    pub fn image(&self) -> Option<&CapturedImage> {
        self.image.as_ref()
    }

    pub fn error(&self) -> Option<&ShellError> {
        self.error.as_ref()
    }

    pub fn saved_id(&self) -> Option<&str> {
        self.saved_id.as_deref()
    }

    /// Start a new capture round trip.
    ///
    /// Only Idle or a terminal state (Saved, Failed) may start one;
    /// anything else is a busy rejection. Starting anew discards the
    /// previous result, error, and saved id.
    pub fn begin_capture(&mut self) -> ShellResult<()> {
        match self.status {
            CaptureStatus::Idle | CaptureStatus::Saved | CaptureStatus::Failed => {
                *self = Self { status: CaptureStatus::Capturing, ..Self::default() };
                Ok(())
            }
            _ => Err(ShellError::Busy("capture")),
        }
    }

    /// Record a successful backend capture.
    pub fn complete_capture(&mut self, image: CapturedImage) {
        debug_assert_eq!(self.status, CaptureStatus::Capturing);
        self.status = CaptureStatus::Captured;
        self.image = Some(image);
        self.error = None;
    }

    /// Record a failed backend capture. No pixels are kept.
    pub fn fail_capture(&mut self, error: ShellError) {
        debug_assert_eq!(self.status, CaptureStatus::Capturing);
        self.status = CaptureStatus::Failed;
        self.image = None;
        self.error = Some(error);
    }

    /// Move into Saving and hand back the image to persist.
    ///
    /// Allowed from Captured, or from Failed while an image is still held
    /// (a failed save retries without recapturing). Saving is busy;
    /// every other state has nothing to save and is rejected without a
    /// transition.
    pub fn begin_save(&mut self) -> ShellResult<CapturedImage> {
        match self.status {
            CaptureStatus::Captured => {}
            CaptureStatus::Failed if self.image.is_some() => {}
            CaptureStatus::Saving => return Err(ShellError::Busy("save")),
            CaptureStatus::Saved => {
                return Err(ShellError::Validation("capture already saved".to_string()))
            }
            _ => return Err(ShellError::Validation("no captured image to save".to_string())),
        }
        let image = self
            .image
            .clone()
            .ok_or_else(|| ShellError::Validation("no captured image to save".to_string()))?;
        self.status = CaptureStatus::Saving;
        self.error = None;
        Ok(image)
    }

    /// Record a successful save. The image stays resident for display.
    pub fn complete_save(&mut self, id: String) {
        debug_assert_eq!(self.status, CaptureStatus::Saving);
        self.status = CaptureStatus::Saved;
        self.saved_id = Some(id);
    }

    /// Record a failed save, keeping the image so the user can retry.
    pub fn fail_save(&mut self, error: ShellError) {
        debug_assert_eq!(self.status, CaptureStatus::Saving);
        self.status = CaptureStatus::Failed;
        self.error = Some(error);
    }

    /// Clear everything back to Idle.
    ///
    /// Rejected while a round trip is in flight; nothing here is
    /// cancellable mid-flight.
    pub fn reset(&mut self) -> ShellResult<()> {
        match self.status {
            CaptureStatus::Capturing => Err(ShellError::Busy("capture")),
            CaptureStatus::Saving => Err(ShellError::Busy("save")),
            _ => {
                *self = Self::default();
                Ok(())
            }
        }
    }

    pub fn snapshot(&self) -> CaptureSnapshot {
        CaptureSnapshot {
            status: self.status,
            image: self.image.clone(),
            error: self.error.as_ref().map(|e| e.to_string()),
            saved_id: self.saved_id.clone(),
        }
    }
}

/// Immutable projection of a capture session for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct CaptureSnapshot {
    pub status: CaptureStatus,
    pub image: Option<CapturedImage>,
    pub error: Option<String>,
    pub saved_id: Option<String>,
}
