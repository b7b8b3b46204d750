//! Windowed view synchronization.
//!
//! - [`TimeWindow`]: the one time window of a session, with its bounds arithmetic
//! - [`PlotPane`] / [`PaneSet`]: per-stage panes in display order
//! - [`WindowController`]: applies window changes and redraws the affected panes

pub mod controller;
pub mod pane;
pub mod window;

pub use controller::{PaneSnapshot, ViewSnapshot, WindowController, ZOOM_STEP};
pub use pane::{DEFAULT_SIGNAL, PaneId, PaneSet, PlotPane};
pub use window::{DEFAULT_DURATION, DEFAULT_MIN_DURATION, TimeWindow};
