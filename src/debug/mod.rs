//! Debug bundle writer for inspecting the window and pane extents.

use std::fs::{File, create_dir_all};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::data::SignalSource;
use crate::error::AppError;
use crate::render::Renderer;
use crate::view::WindowController;

/// Default directory for bundles, relative to the working directory.
pub const DEBUG_DIR: &str = "debug";

pub fn write_debug_bundle<S, R>(session: &WindowController<S, R>, dir: &Path) -> Result<PathBuf, AppError>
where
    S: SignalSource,
    R: Renderer,
{
    create_dir_all(dir).map_err(|e| AppError::new(4, format!("Failed to create debug dir: {e}")))?;

    let now = Local::now();
    let path = dir.join(format!("nv_debug_{}.md", now.format("%Y%m%d_%H%M%S_%3f")));
    let mut file = File::create(&path)
        .map_err(|e| AppError::new(4, format!("Failed to create debug file: {e}")))?;

    let snapshot = session.snapshot();
    let w = &snapshot.window;
    let json = serde_json::to_string_pretty(&snapshot)
        .map_err(|e| AppError::new(4, format!("Failed to serialize view snapshot: {e}")))?;

    let write_err = |e: std::io::Error| AppError::new(4, format!("Failed to write debug: {e}"));

    writeln!(file, "# nv debug bundle").map_err(write_err)?;
    writeln!(file, "- generated: {}", now.to_rfc3339()).map_err(write_err)?;
    writeln!(
        file,
        "- window: [{:.3}, {:.3}] s, duration {:.3} s (min {}), extent {:.3} s",
        w.start(),
        w.stop(),
        w.duration(),
        w.min_duration(),
        w.max_extent()
    )
    .map_err(write_err)?;
    if w.visible_span() < w.duration() {
        writeln!(
            file,
            "- note: data is shorter than the duration; showing {:.3} s",
            w.visible_span()
        )
        .map_err(write_err)?;
    }

    writeln!(file, "\n## Panes").map_err(write_err)?;
    writeln!(file, "| id | stage | mode | visible | scrollable | x_range |").map_err(write_err)?;
    writeln!(file, "| - | - | - | - | - | - |").map_err(write_err)?;
    for p in &snapshot.panes {
        writeln!(
            file,
            "| {} | {} | {} | {} | {} | {} |",
            p.id,
            p.stage,
            p.mode.name(),
            p.visible,
            p.scrollable,
            fmt_range(p.x_range)
        )
        .map_err(write_err)?;
    }

    writeln!(file, "\n## Snapshot\n```json\n{json}\n```").map_err(write_err)?;
    Ok(path)
}

fn fmt_range(range: Option<[f64; 2]>) -> String {
    match range {
        Some([a, b]) => format!("[{a:.1}, {b:.1}]"),
        None => "all".to_string(),
    }
}
