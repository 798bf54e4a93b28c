//! Snap-Shell — orchestration core of a screenshot application.
//!
//! This crate is the client-side control layer that sits between the UI
//! shell and the capture/storage backend:
//! - Backend port + validating service client (backend/)
//! - Known-id set and coalescing preview cache (history/)
//! - Capture and processing session state machines (session/)
//! - View coordinator: intent dispatch and the render projection
//!   (coordinator/)
//!
//! The pixel work (capture, codecs, resize, the clipboard) happens
//! behind the async [`backend::CaptureBackend`] port. This crate owns the
//! control flow: who may start what, when history refreshes, and how
//! failures surface.

pub mod backend;
pub mod coordinator;
pub mod error;
pub mod history;
pub mod session;
pub mod settings;

pub use backend::{BackendError, CaptureBackend, CaptureClient, CapturedImage, ImageFormat, Region};
pub use coordinator::{Intent, Notification, Snapshot, Source, ViewCoordinator};
pub use error::{ErrorKind, ShellError, ShellResult};
pub use history::{HistoryCache, PREFETCH_WINDOW};
pub use session::capture::{CaptureMode, CaptureSession, CaptureStatus};
pub use session::processing::{Operation, ProcessingSession, ProcessingStatus};
pub use settings::{SaveFormat, Settings};
