//! Data sources the panes read from.
//!
//! The browser never owns signal semantics: it only needs a sampling rate to
//! convert window seconds into sample indices, and an extent to bound the
//! window. [`Recording`] is the in-memory source used by the binary.

pub mod recording;
pub mod sample;

pub use recording::{Recording, Signal};
pub use sample::{SyntheticSpec, generate_recording};

/// Name of the signal whose length bounds the global time window.
pub const RESPONSE_SIGNAL: &str = "resp";

/// Read-only view of per-signal timing.
pub trait SignalSource {
    /// Sampling rate in Hz, if the signal exists and declares one.
    fn sample_rate(&self, signal: &str) -> Option<f64>;

    /// Duration of the signal in seconds (`samples / rate`).
    fn extent(&self, signal: &str) -> Option<f64>;
}
