//! Shared session setup used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the workflow:
//! modelname -> stages -> recording -> window -> controller
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use crate::cli::ViewArgs;
use crate::data::{Recording, generate_recording};
use crate::domain::parse_modelname;
use crate::error::AppError;
use crate::render::RedrawQueue;
use crate::view::{PaneSet, TimeWindow, WindowController};

/// The controller type every front-end drives.
pub type Session = WindowController<Recording, RedrawQueue>;

/// Build a ready-to-draw session from CLI options.
pub fn build_session(args: &ViewArgs) -> Result<Session, AppError> {
    let stages = parse_modelname(&args.modelname)?;
    let recording = generate_recording(&args.synthetic_spec())?;

    // The extent is filled in by the controller from the recording.
    let window = TimeWindow::new(args.duration, args.min_duration, 0.0)?;
    let controller = WindowController::new(window, PaneSet::from_stages(stages), recording, RedrawQueue::default())?;
    Ok(controller)
}
