//! Command-line parsing for the model stage browser.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! view and rendering code.

use clap::{Args, Parser, Subcommand};

use crate::data::SyntheticSpec;
use crate::view::{DEFAULT_DURATION, DEFAULT_MIN_DURATION};

/// Default modelname: channel weighting, temporal filter, level shift, output nonlinearity.
pub const DEFAULT_MODELNAME: &str = "wc.18x2.g-fir.2x15-lvl.1-dexp.1";

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "nv", version, about = "Browse model stages over a shared time window")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive TUI (the default when no subcommand is given).
    Tui(ViewArgs),
    /// Print an ASCII plot of every pane for one window position.
    Plot(PlotArgs),
    /// List plot modes and whether they follow the time window.
    Modes,
}

/// Session options shared by all viewing commands.
#[derive(Debug, Args, Clone)]
pub struct ViewArgs {
    /// Shorthand modelname; one pane per `-`-separated stage keyword.
    #[arg(short = 'm', long, default_value = DEFAULT_MODELNAME)]
    pub modelname: String,

    /// Length of the synthetic recording in seconds.
    #[arg(long, default_value_t = 60.0)]
    pub seconds: f64,

    /// Sampling rate of the synthetic recording in Hz.
    #[arg(long, default_value_t = 100.0)]
    pub fs: f64,

    /// Number of stimulus channels.
    #[arg(long, default_value_t = 18)]
    pub channels: usize,

    /// Random seed for the synthetic recording.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Initial display duration in seconds.
    #[arg(short = 'd', long, default_value_t = DEFAULT_DURATION)]
    pub duration: f64,

    /// Smallest display duration in seconds.
    #[arg(long, default_value_t = DEFAULT_MIN_DURATION)]
    pub min_duration: f64,
}

impl ViewArgs {
    pub fn synthetic_spec(&self) -> SyntheticSpec {
        SyntheticSpec {
            seconds: self.seconds,
            fs: self.fs,
            channels: self.channels,
            seed: self.seed,
        }
    }
}

/// Options for printing panes.
#[derive(Debug, Args, Clone)]
pub struct PlotArgs {
    #[command(flatten)]
    pub view: ViewArgs,

    /// Window start in seconds (clamped to the recording).
    #[arg(short = 's', long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub start: f64,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 12)]
    pub height: usize,
}
