//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` configuration
//! - parses CLI arguments
//! - installs logging
//! - builds the view session
//! - runs the TUI or prints plots

use clap::Parser;

use crate::cli::{Command, PlotArgs, ViewArgs};
use crate::domain::PlotMode;
use crate::error::AppError;

pub mod logging;
pub mod session;

use logging::{LogTarget, init_logging};

/// Entry point for the `nv` binary.
pub fn run() -> Result<(), AppError> {
    // `.env` is optional; a missing file is not an error.
    let _ = dotenvy::dotenv();

    // We want `nv` and `nv -m lvl.1` to behave like `nv tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing. This preserves a clean clap structure while
    // retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => handle_tui(args),
        Command::Plot(args) => handle_plot(args),
        Command::Modes => handle_modes(),
    }
}

fn handle_tui(args: ViewArgs) -> Result<(), AppError> {
    init_logging(LogTarget::Tui)?;
    let session = session::build_session(&args)?;
    crate::tui::run(session)
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    init_logging(LogTarget::Console)?;
    let mut session = session::build_session(&args.view)?;
    session.scroll_to(args.start);
    print!("{}", format_plots(&session, args.width, args.height));
    Ok(())
}

fn handle_modes() -> Result<(), AppError> {
    init_logging(LogTarget::Console)?;
    print!("{}", format_modes());
    Ok(())
}

/// Window summary followed by an ASCII plot of every visible pane.
pub fn format_plots(session: &session::Session, width: usize, height: usize) -> String {
    let w = session.window();
    let mut out = format!(
        "window: [{:.3}, {:.3}] s of {:.3} s (duration {:.3} s)\n",
        w.start(),
        w.stop(),
        w.max_extent(),
        w.duration()
    );
    for pane in session.panes().iter().filter(|p| p.is_visible()) {
        out.push('\n');
        out.push_str(&crate::plot::render_pane_ascii(pane, session.source(), width, height));
    }
    out
}

pub fn format_modes() -> String {
    let mut out = String::from("mode               scrolls  signals\n");
    for mode in PlotMode::ALL {
        out.push_str(&format!(
            "{:<18} {:<8} {}\n",
            mode.name(),
            if mode.is_scrollable() { "yes" } else { "no" },
            mode.signals().join(", ")
        ));
    }
    out
}

/// Rewrite argv so `nv` defaults to `nv tui`.
///
/// Rules:
/// - `nv`                      -> `nv tui`
/// - `nv -m lvl.1 ...`         -> `nv tui -m lvl.1 ...`
/// - `nv --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "plot" | "modes");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn rewrite_defaults_to_tui() {
        assert_eq!(rewrite_args(argv(&["nv"])), argv(&["nv", "tui"]));
        assert_eq!(
            rewrite_args(argv(&["nv", "-m", "lvl.1"])),
            argv(&["nv", "tui", "-m", "lvl.1"])
        );
        assert_eq!(rewrite_args(argv(&["nv", "--help"])), argv(&["nv", "--help"]));
        assert_eq!(rewrite_args(argv(&["nv", "plot", "-s", "3"])), argv(&["nv", "plot", "-s", "3"]));
    }

    #[test]
    fn modes_table_lists_every_mode() {
        let table = format_modes();
        assert_eq!(table.lines().count(), PlotMode::ALL.len() + 1);
        assert!(table.contains("pred_resp          yes      resp, pred"));
        assert!(table.contains("scatter            no       pred, resp"));
    }

    #[test]
    fn plots_follow_scrolled_window() {
        let cli = crate::cli::Cli::parse_from([
            "nv", "plot", "-m", "lvl.1-wc.2x1", "--seconds", "30", "--fs", "10", "--channels", "2",
            "--start", "100",
        ]);
        let Command::Plot(args) = cli.command else {
            panic!("expected plot command");
        };
        let mut session = session::build_session(&args.view).unwrap();
        session.scroll_to(args.start);

        let out = format_plots(&session, 40, 6);
        assert!(out.starts_with("window: [20.000, 30.000] s of 30.000 s (duration 10.000 s)\n"));
        assert!(out.contains("Pane #0 lvl.1 [pred_resp] samples=[200.0, 300.0]"));
        assert!(out.contains("Pane #1 wc.2x1 [strf_heatmap] samples=[0.0, 300.0]"));
    }
}
