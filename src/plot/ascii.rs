//! ASCII/Unicode plotting of a pane for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - line series: `-`, `+`, `~` (in draw order)
//! - scatter points: `o`
//! - heatmaps: intensity ramp ` .:-=+*#%@`, one row per channel

use crate::data::Recording;
use crate::render::series::{PaneSeries, SeriesKind, pane_series};
use crate::view::PlotPane;

const LINE_CHARS: [char; 3] = ['-', '+', '~'];
const HEAT_RAMP: [char; 10] = [' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Render one pane (header line + grid) in its current mode and window.
pub fn render_pane_ascii(pane: &PlotPane, recording: &Recording, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);
    let series = pane_series(pane, recording, width);

    let mut out = String::new();
    let legend = series
        .series
        .iter()
        .enumerate()
        .map(|(i, s)| match series.kind {
            SeriesKind::Line => format!("{}={}", LINE_CHARS[i % LINE_CHARS.len()], s.label),
            _ => format!("o={}", s.label),
        })
        .collect::<Vec<_>>()
        .join(" ");
    out.push_str(&format!(
        "Pane {} {} [{}] {}=[{:.1}, {:.1}] | {}=[{:.2}, {:.2}] {legend}\n",
        pane.id(),
        pane.stage().keyword,
        pane.mode().name(),
        series.x_label,
        series.x_bounds[0],
        series.x_bounds[1],
        series.y_label,
        series.y_bounds[0],
        series.y_bounds[1],
    ));

    let grid = match series.kind {
        SeriesKind::Heatmap => heat_grid(&series, width, height),
        SeriesKind::Line | SeriesKind::Scatter => xy_grid(&series, width, height),
    };
    for row in grid {
        out.push_str(row.iter().collect::<String>().trim_end());
        out.push('\n');
    }
    out
}

/// Heatmap rows as text, highest channel first. Used by the TUI as well.
pub fn heat_rows(series: &PaneSeries, width: usize, height: usize) -> Vec<String> {
    heat_grid(series, width, height)
        .into_iter()
        .map(|row| row.into_iter().collect())
        .collect()
}

fn xy_grid(series: &PaneSeries, width: usize, height: usize) -> Vec<Vec<char>> {
    let mut grid = vec![vec![' '; width]; height];
    let [x_min, x_max] = series.x_bounds;
    let [y_min, y_max] = series.y_bounds;

    for (i, s) in series.series.iter().enumerate() {
        match series.kind {
            SeriesKind::Line => {
                let ch = LINE_CHARS[i % LINE_CHARS.len()];
                let mut prev = None;
                for &(x, y) in &s.points {
                    let gx = map_x(x, x_min, x_max, width);
                    let gy = map_y(y, y_min, y_max, height);
                    match prev {
                        Some((x0, y0)) => draw_line(&mut grid, x0, y0, gx, gy, ch),
                        None => grid[gy][gx] = ch,
                    }
                    prev = Some((gx, gy));
                }
            }
            _ => {
                for &(x, y) in &s.points {
                    grid[map_y(y, y_min, y_max, height)][map_x(x, x_min, x_max, width)] = 'o';
                }
            }
        }
    }
    grid
}

fn heat_grid(series: &PaneSeries, width: usize, height: usize) -> Vec<Vec<char>> {
    let rows = series.heat.len().min(height);
    let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
    for v in series.heat.iter().flatten().filter(|v| v.is_finite()) {
        lo = lo.min(*v);
        hi = hi.max(*v);
    }
    let span = if hi > lo { hi - lo } else { 1.0 };

    // Highest channel on top.
    (0..rows)
        .map(|r| {
            let ch_idx = (rows - 1 - r) * series.heat.len() / rows;
            let row = &series.heat[ch_idx];
            (0..width.min(row.len()))
                .map(|c| {
                    let v = row[c];
                    if !v.is_finite() {
                        return ' ';
                    }
                    let level = ((v - lo) / span * (HEAT_RAMP.len() - 1) as f64).round() as usize;
                    HEAT_RAMP[level.min(HEAT_RAMP.len() - 1)]
                })
                .collect()
        })
        .collect()
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish). Earlier series win on overlap.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
