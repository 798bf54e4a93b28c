//! View coordinator — the single entry point for user intents.
//!
//! Buttons, hotkeys, and tab switches all land in
//! [`ViewCoordinator::dispatch`], which consults the owning session
//! before any backend work starts. Session mutexes are held only across
//! synchronous transitions, never across an await; suspension happens
//! inside the client calls alone. The render layer reads one immutable
//! [`Snapshot`] of the combined state.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use serde::Serialize;

use crate::backend::{CaptureBackend, CaptureClient};
use crate::error::{ErrorKind, ShellError, ShellResult};
use crate::history::HistoryCache;
use crate::session::capture::{CaptureMode, CaptureSession, CaptureSnapshot};
use crate::session::processing::{Operation, ProcessingSession, ProcessingSnapshot};
use crate::settings::Settings;

/// Which part of the app an error notification belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Capture,
    Processing,
    History,
    Settings,
}

/// A transient, dismissible error notification. Only the most recent one
/// per source is kept.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub source: Source,
    pub kind: ErrorKind,
    pub message: String,
}

/// A user-originated request, regardless of which control produced it.
#[derive(Debug, Clone)]
pub enum Intent {
    Capture(CaptureMode),
    Save,
    ResetCapture,
    Process { target: String, operation: Operation },
    ResetProcessing,
    OpenHistory,
    ShowPreview(String),
    ClearHistory,
    UpdateSettings(Settings),
    DismissNotification(Source),
}

/// Combined read-only projection for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub capture: CaptureSnapshot,
    pub processing: ProcessingSnapshot,
    pub history_ids: Vec<String>,
    pub previews: HashMap<String, Bytes>,
    pub notifications: Vec<Notification>,
}

pub struct ViewCoordinator {
    client: CaptureClient,
    history: HistoryCache,
    capture: Mutex<CaptureSession>,
    processing: Mutex<ProcessingSession>,
    settings: Mutex<Settings>,
    notifications: Mutex<HashMap<Source, Notification>>,
}

impl ViewCoordinator {
    pub fn new(backend: Arc<dyn CaptureBackend>) -> Self {
        let client = CaptureClient::new(backend);
        Self {
            history: HistoryCache::new(client.clone()),
            client,
            capture: Mutex::new(CaptureSession::new()),
            processing: Mutex::new(ProcessingSession::new()),
            settings: Mutex::new(Settings::default()),
            notifications: Mutex::new(HashMap::new()),
        }
    }

    /// Load settings and the initial history view.
    ///
    /// A backend without stored settings is not fatal; defaults apply
    /// until the user saves new ones.
    pub async fn initialize(&self) -> ShellResult<()> {
        match self.client.load_settings().await {
            Ok(settings) => *self.settings.lock().unwrap() = settings,
            Err(err) => log::warn!("[COORD] Using default settings: {}", err),
        }
        self.history.refresh().await.map_err(|e| self.notify(Source::History, e))?;
        self.history.prefetch_window().await;
        log::info!("[COORD] Initialized — {} history items", self.history.ids().len());
        Ok(())
    }

    pub async fn dispatch(&self, intent: Intent) -> ShellResult<()> {
        match intent {
            Intent::Capture(mode) => self.start_capture(mode).await,
            Intent::Save => self.save_capture().await.map(|_| ()),
            Intent::ResetCapture => self.reset_capture(),
            Intent::Process { target, operation } => {
                self.process(&target, operation).await.map(|_| ())
            }
            Intent::ResetProcessing => self.reset_processing(),
            Intent::OpenHistory => self.open_history().await,
            Intent::ShowPreview(id) => self.show_preview(&id).await.map(|_| ()),
            Intent::ClearHistory => self.clear_history().await,
            Intent::UpdateSettings(settings) => self.update_settings(settings).await,
            Intent::DismissNotification(source) => {
                self.dismiss_notification(source);
                Ok(())
            }
        }
    }

    /// Route a configured hotkey action to the identical capture intent a
    /// button press would produce.
    ///
    /// A busy session makes the event a no-op, never a queued second
    /// capture.
    pub async fn hotkey(&self, action: &str) -> ShellResult<()> {
        let intent = match action {
            "capture_fullscreen" => Intent::Capture(CaptureMode::Fullscreen),
            "capture_window" => Intent::Capture(CaptureMode::Window),
            other => {
                return Err(self.notify(
                    Source::Capture,
                    ShellError::Validation(format!("unknown hotkey action: {}", other)),
                ))
            }
        };
        match self.dispatch(intent).await {
            Err(ShellError::Busy(_)) => {
                log::debug!("[COORD] Hotkey {} ignored — session busy", action);
                Ok(())
            }
            outcome => outcome,
        }
    }

    /// Run one capture round trip: busy gate, backend call, transition.
    pub async fn start_capture(&self, mode: CaptureMode) -> ShellResult<()> {
        if let CaptureMode::Region(region) = mode {
            // Known-bad rectangles are rejected before the session moves.
            region.validate().map_err(|e| self.notify(Source::Capture, e))?;
        }
        {
            let mut session = self.capture.lock().unwrap();
            session.begin_capture().map_err(|e| self.notify(Source::Capture, e))?;
        }
        log::info!("[COORD] Capture started ({:?})", mode);

        let outcome = match mode {
            CaptureMode::Fullscreen => self.client.capture_fullscreen().await,
            CaptureMode::Window => self.client.capture_window().await,
            CaptureMode::Region(region) => self.client.capture_region(region).await,
        };
        match outcome {
            Ok(image) => {
                self.capture.lock().unwrap().complete_capture(image);
                Ok(())
            }
            Err(err) => {
                self.capture.lock().unwrap().fail_capture(err.clone());
                Err(self.notify(Source::Capture, err))
            }
        }
    }

    /// Persist the captured image under a timestamped filename.
    ///
    /// Exactly one history refresh follows a successful save; a failed
    /// save keeps the pixels and triggers no refresh.
    pub async fn save_capture(&self) -> ShellResult<String> {
        let image = {
            let mut session = self.capture.lock().unwrap();
            session.begin_save().map_err(|e| self.notify(Source::Capture, e))?
        };
        let (filename, auto_copy) = {
            let settings = self.settings.lock().unwrap();
            (suggested_filename(&settings), settings.auto_copy)
        };

        match self.client.save_capture(&image, &filename).await {
            Ok(id) => {
                self.capture.lock().unwrap().complete_save(id.clone());
                if let Err(err) = self.history.refresh().await {
                    // The save itself stands; the gallery catches up on the
                    // next refresh.
                    log::warn!("[COORD] History refresh after save failed: {}", err);
                    self.notify(Source::History, err);
                }
                if auto_copy {
                    if let Err(err) = self.client.copy_to_clipboard(image.bytes.clone()).await {
                        log::warn!("[COORD] Auto-copy failed: {}", err);
                        self.notify(Source::Capture, err);
                    }
                }
                Ok(id)
            }
            Err(err) => {
                self.capture.lock().unwrap().fail_save(err.clone());
                Err(self.notify(Source::Capture, err))
            }
        }
    }

    pub fn reset_capture(&self) -> ShellResult<()> {
        self.capture.lock().unwrap().reset().map_err(|e| self.notify(Source::Capture, e))
    }

    /// Run one resize/convert against a known history item.
    ///
    /// Validation and the reference check are synchronous rejections: the
    /// session stays where it was and the backend is never contacted.
    pub async fn process(&self, target: &str, operation: Operation) -> ShellResult<String> {
        operation.validate().map_err(|e| self.notify(Source::Processing, e))?;
        if !self.history.contains(target) {
            return Err(self.notify(
                Source::Processing,
                ShellError::InvalidReference(target.to_string()),
            ));
        }
        {
            let mut session = self.processing.lock().unwrap();
            session
                .begin(target.to_string(), operation)
                .map_err(|e| self.notify(Source::Processing, e))?;
        }
        log::info!("[COORD] Processing {} ({:?})", target, operation);

        let outcome = match operation {
            Operation::Resize { width, height } => self.client.resize(target, width, height).await,
            Operation::Convert { format } => self.client.convert_format(target, format).await,
        };
        match outcome {
            Ok(output_id) => {
                self.processing.lock().unwrap().complete(output_id.clone());
                // The transformed image is itself a new history item.
                if let Err(err) = self.history.refresh().await {
                    log::warn!("[COORD] History refresh after processing failed: {}", err);
                    self.notify(Source::History, err);
                }
                Ok(output_id)
            }
            Err(err) => {
                self.processing.lock().unwrap().fail(err.clone());
                Err(self.notify(Source::Processing, err))
            }
        }
    }

    pub fn reset_processing(&self) -> ShellResult<()> {
        self.processing.lock().unwrap().reset().map_err(|e| self.notify(Source::Processing, e))
    }

    /// Refresh the gallery and warm the preview window.
    pub async fn open_history(&self) -> ShellResult<()> {
        self.history.refresh().await.map_err(|e| self.notify(Source::History, e))?;
        self.history.prefetch_window().await;
        Ok(())
    }

    /// Fetch (or reuse) the preview for one item, e.g. on selection.
    pub async fn show_preview(&self, id: &str) -> ShellResult<Bytes> {
        self.history.get_preview(id).await.map_err(|e| self.notify(Source::History, e))
    }

    /// Drop every saved screenshot, then resync the now-empty listing.
    pub async fn clear_history(&self) -> ShellResult<()> {
        self.client.clear_history().await.map_err(|e| self.notify(Source::History, e))?;
        self.history.refresh().await.map_err(|e| self.notify(Source::History, e))
    }

    pub async fn update_settings(&self, settings: Settings) -> ShellResult<()> {
        self.client
            .save_settings(&settings)
            .await
            .map_err(|e| self.notify(Source::Settings, e))?;
        *self.settings.lock().unwrap() = settings;
        Ok(())
    }

    pub fn settings(&self) -> Settings {
        self.settings.lock().unwrap().clone()
    }

    pub fn dismiss_notification(&self, source: Source) {
        self.notifications.lock().unwrap().remove(&source);
    }

    /// Project the combined state for rendering.
    pub fn snapshot(&self) -> Snapshot {
        let mut notifications: Vec<Notification> =
            self.notifications.lock().unwrap().values().cloned().collect();
        notifications.sort_by_key(|n| n.source);

        Snapshot {
            capture: self.capture.lock().unwrap().snapshot(),
            processing: self.processing.lock().unwrap().snapshot(),
            history_ids: self.history.ids(),
            previews: self.history.loaded_previews(),
            notifications,
        }
    }

    /// Record `error` as the latest notification for `source` and hand it
    /// back for propagation.
    fn notify(&self, source: Source, error: ShellError) -> ShellError {
        log::debug!("[COORD] {:?} error surfaced: {}", source, error);
        self.notifications.lock().unwrap().insert(
            source,
            Notification { source, kind: error.kind(), message: error.to_string() },
        );
        error
    }
}

/// `screenshot_<unix-ts>.<ext>`, matching the backend's own naming.
fn suggested_filename(settings: &Settings) -> String {
    format!(
        "screenshot_{}.{}",
        chrono::Utc::now().timestamp(),
        settings.file_format.extension()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SaveFormat;

    #[test]
    fn suggested_filename_uses_configured_format() {
        let mut settings = Settings::default();
        let name = suggested_filename(&settings);
        assert!(name.starts_with("screenshot_"), "unexpected name: {}", name);
        assert!(name.ends_with(".png"), "unexpected name: {}", name);

        settings.file_format = SaveFormat::Jpg;
        assert!(suggested_filename(&settings).ends_with(".jpg"));
    }

    #[test]
    fn notifications_sort_by_source() {
        let a = Notification {
            source: Source::Processing,
            kind: ErrorKind::Busy,
            message: "x".to_string(),
        };
        let b = Notification {
            source: Source::Capture,
            kind: ErrorKind::Backend,
            message: "y".to_string(),
        };
        let mut list = vec![a.clone(), b.clone()];
        list.sort_by_key(|n| n.source);
        assert_eq!(list, vec![b, a]);
    }
}
