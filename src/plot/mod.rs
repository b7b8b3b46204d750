//! Plain-text plots for non-interactive output.

pub mod ascii;

pub use ascii::render_pane_ascii;
