//! Processing session — one in-flight resize or format conversion
//! against a selected history item.
//!
//! Independent from the capture session; the two may run concurrently.
//! The busy policy mirrors capture: one operation in flight, new intents
//! rejected, never queued.

use serde::Serialize;

use crate::backend::ImageFormat;
use crate::error::{ShellError, ShellResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStatus {
    #[default]
    Idle,
    Processing,
    Done,
    Failed,
}

/// A transformation applied to an existing history item. The output is
/// itself a new history item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "op")]
pub enum Operation {
    Resize { width: u32, height: u32 },
    Convert { format: ImageFormat },
}

impl Operation {
    /// Local validity check, run before the session leaves Idle.
    pub fn validate(&self) -> ShellResult<()> {
        match self {
            Operation::Resize { width, height } if *width == 0 || *height == 0 => {
                Err(ShellError::Validation(format!(
                    "resize dimensions must be positive, got {}x{}",
                    width, height
                )))
            }
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Default)]
pub struct ProcessingSession {
    status: ProcessingStatus,
    target_id: Option<String>,
    operation: Option<Operation>,
    output_id: Option<String>,
    error: Option<ShellError>,
}

impl ProcessingSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> ProcessingStatus {
        self.status
    }

    pub fn target_id(&self) -> Option<&str> {
        self.target_id.as_deref()
    }

    pub fn output_id(&self) -> Option<&str> {
        self.output_id.as_deref()
    }

    pub fn error(&self) -> Option<&ShellError> {
        self.error.as_ref()
    }

    /// Claim the session for one transformation.
    pub fn begin(&mut self, target_id: String, operation: Operation) -> ShellResult<()> {
        match self.status {
            ProcessingStatus::Processing => Err(ShellError::Busy("processing")),
            _ => {
                *self = Self {
                    status: ProcessingStatus::Processing,
                    target_id: Some(target_id),
                    operation: Some(operation),
                    ..Self::default()
                };
                Ok(())
            }
        }
    }

    /// Record the new history item produced by the backend.
    pub fn complete(&mut self, output_id: String) {
        debug_assert_eq!(self.status, ProcessingStatus::Processing);
        self.status = ProcessingStatus::Done;
        self.output_id = Some(output_id);
    }

    pub fn fail(&mut self, error: ShellError) {
        debug_assert_eq!(self.status, ProcessingStatus::Processing);
        self.status = ProcessingStatus::Failed;
        self.error = Some(error);
    }

    /// Back to Idle; rejected while an operation is in flight.
    pub fn reset(&mut self) -> ShellResult<()> {
        if self.status == ProcessingStatus::Processing {
            return Err(ShellError::Busy("processing"));
        }
        *self = Self::default();
        Ok(())
    }

    pub fn snapshot(&self) -> ProcessingSnapshot {
        ProcessingSnapshot {
            status: self.status,
            target_id: self.target_id.clone(),
            operation: self.operation,
            output_id: self.output_id.clone(),
            error: self.error.as_ref().map(|e| e.to_string()),
        }
    }
}

/// Immutable projection of a processing session for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingSnapshot {
    pub status: ProcessingStatus,
    pub target_id: Option<String>,
    pub operation: Option<Operation>,
    pub output_id: Option<String>,
    pub error: Option<String>,
}
