//! `nems-view` library crate.
//!
//! The binary (`nv`) is a thin wrapper around this library so that:
//!
//! - the window/pane synchronization is testable without a terminal
//! - front-ends (TUI, ASCII plots) share one controller
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod debug;
pub mod domain;
pub mod error;
pub mod plot;
pub mod render;
pub mod tui;
pub mod view;
