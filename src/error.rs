//! Error types.
//!
//! - [`ViewError`] is returned by the view library (window, panes, controller).
//! - [`AppError`] carries a process exit code and is what the `nv` binary reports.

use crate::view::PaneId;

/// Errors raised by the windowed view subsystem.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ViewError {
    /// A requested display duration is not above the minimum.
    ///
    /// Durations are user intent, so they are rejected rather than clamped.
    #[error("invalid duration {requested}: must be a number greater than {minimum}")]
    InvalidDuration { requested: f64, minimum: f64 },
    /// The minimum duration itself is not a finite, positive time.
    #[error("invalid minimum duration {0}: must be a finite number greater than 0")]
    InvalidMinimum(f64),
    /// The data extent reported upstream is negative or not finite.
    #[error("invalid data extent {0}: the response signal must span a finite, non-negative time")]
    InvalidExtent(f64),
    #[error("no pane with id {0}")]
    UnknownPane(PaneId),
    #[error("pane {pane} has no plot mode #{index}")]
    UnknownMode { pane: PaneId, index: usize },
    #[error("invalid modelname '{0}': expected keywords separated by '-', e.g. wc.18x2.g-fir.2x15-lvl.1")]
    InvalidModelname(String),
}

impl ViewError {
    /// Process exit code used when this error reaches the binary.
    ///
    /// An invalid extent means the data source broke its contract, which is a
    /// configuration failure rather than bad user input.
    pub fn exit_code(&self) -> u8 {
        match self {
            ViewError::InvalidExtent(_) => 3,
            _ => 2,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<ViewError> for AppError {
    fn from(err: ViewError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
