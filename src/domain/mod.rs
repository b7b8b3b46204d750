//! Domain types used throughout the browser.
//!
//! This module defines:
//!
//! - plot modes and the static table of which ones scroll (`PlotMode`)
//! - model stages parsed from a shorthand modelname (`ModelStage`, `StageKind`)

pub mod types;

pub use types::*;
