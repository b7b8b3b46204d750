//! Turn a pane + recording into drawable series.
//!
//! Both the TUI chart and the ASCII plot consume [`PaneSeries`]; keeping the
//! data prep here keeps the widgets focused on drawing.

use crate::data::{Recording, Signal};
use crate::domain::PlotMode;
use crate::view::PlotPane;

/// Number of prediction bins for the nonlinearity curve.
const NL_BINS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    Line,
    Scatter,
    Heatmap,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaneSeries {
    pub kind: SeriesKind,
    pub series: Vec<Series>,
    /// Channel x time-bin intensities; only filled for [`SeriesKind::Heatmap`].
    pub heat: Vec<Vec<f64>>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub x_label: &'static str,
    pub y_label: &'static str,
}

/// Build the series for `pane` in its current mode.
///
/// `max_points` caps the number of points per series (and heatmap columns);
/// longer data is decimated by a fixed stride.
pub fn pane_series(pane: &PlotPane, recording: &Recording, max_points: usize) -> PaneSeries {
    let max_points = max_points.max(2);
    let mode = pane.mode();
    match mode {
        PlotMode::PredResp | PlotMode::BeforeAndAfter | PlotMode::StrfTimeseries => {
            time_series(pane, recording, mode, max_points)
        }
        PlotMode::Scatter => scatter(recording, max_points),
        PlotMode::NlCurve => nl_curve(recording),
        PlotMode::StrfHeatmap => heatmap(recording, max_points),
    }
}

fn trace_of(signal: &Signal) -> Vec<f64> {
    if signal.channel_count() == 1 {
        signal.channels[0].clone()
    } else {
        signal.channel_mean()
    }
}

fn time_series(pane: &PlotPane, recording: &Recording, mode: PlotMode, max_points: usize) -> PaneSeries {
    let traces: Vec<(&str, Vec<f64>)> = mode
        .signals()
        .iter()
        .filter_map(|name| recording.signal(name).map(|s| (*name, trace_of(s))))
        .collect();
    let len = traces.iter().map(|(_, t)| t.len()).max().unwrap_or(0);

    let [x0, x1] = pane.x_range().unwrap_or([0.0, len as f64]);
    let x_bounds = if x1 > x0 { [x0, x1] } else { [x0, x0 + 1.0] };
    let lo = x0.floor().max(0.0) as usize;
    let hi = (x1.ceil().max(0.0) as usize).min(len);
    let stride = (hi.saturating_sub(lo) / max_points).max(1);

    let series = traces
        .into_iter()
        .map(|(name, trace)| Series {
            label: name.to_string(),
            points: (lo..hi.min(trace.len()))
                .step_by(stride)
                .map(|i| (i as f64, trace[i]))
                .collect(),
        })
        .collect::<Vec<_>>();

    let y_bounds = y_bounds(&series);
    PaneSeries {
        kind: SeriesKind::Line,
        series,
        heat: Vec::new(),
        x_bounds,
        y_bounds,
        x_label: "samples",
        y_label: "value",
    }
}

fn pred_resp(recording: &Recording) -> (Vec<f64>, Vec<f64>) {
    let pred = recording.signal("pred").map(trace_of).unwrap_or_default();
    let resp = recording.signal("resp").map(trace_of).unwrap_or_default();
    (pred, resp)
}

fn scatter(recording: &Recording, max_points: usize) -> PaneSeries {
    let (pred, resp) = pred_resp(recording);
    let n = pred.len().min(resp.len());
    let stride = (n / max_points).max(1);
    let points: Vec<(f64, f64)> = (0..n).step_by(stride).map(|i| (pred[i], resp[i])).collect();

    let x_bounds = value_bounds(points.iter().map(|p| p.0));
    let y_bounds = value_bounds(points.iter().map(|p| p.1));
    PaneSeries {
        kind: SeriesKind::Scatter,
        series: vec![Series {
            label: "pred vs resp".to_string(),
            points,
        }],
        heat: Vec::new(),
        x_bounds,
        y_bounds,
        x_label: "pred",
        y_label: "resp",
    }
}

fn nl_curve(recording: &Recording) -> PaneSeries {
    let (pred, resp) = pred_resp(recording);
    let n = pred.len().min(resp.len());
    let [p_min, p_max] = value_bounds(pred.iter().copied());
    let width = (p_max - p_min) / NL_BINS as f64;

    let mut sums = [0.0; NL_BINS];
    let mut counts = [0usize; NL_BINS];
    for i in 0..n {
        let bin = (((pred[i] - p_min) / width) as usize).min(NL_BINS - 1);
        sums[bin] += resp[i];
        counts[bin] += 1;
    }

    let points: Vec<(f64, f64)> = (0..NL_BINS)
        .filter(|&b| counts[b] > 0)
        .map(|b| (p_min + (b as f64 + 0.5) * width, sums[b] / counts[b] as f64))
        .collect();

    let series = vec![Series {
        label: "mean resp".to_string(),
        points,
    }];
    let y_bounds = y_bounds(&series);
    PaneSeries {
        kind: SeriesKind::Line,
        series,
        heat: Vec::new(),
        x_bounds: [p_min, p_max],
        y_bounds,
        x_label: "pred",
        y_label: "resp",
    }
}

fn heatmap(recording: &Recording, columns: usize) -> PaneSeries {
    let Some(stim) = recording.signal("stim") else {
        return PaneSeries {
            kind: SeriesKind::Heatmap,
            series: Vec::new(),
            heat: Vec::new(),
            x_bounds: [0.0, 1.0],
            y_bounds: [0.0, 1.0],
            x_label: "samples",
            y_label: "channel",
        };
    };

    let len = stim.len();
    let columns = columns.min(len).max(1);
    let heat = stim
        .channels
        .iter()
        .map(|ch| {
            (0..columns)
                .map(|c| {
                    let lo = c * len / columns;
                    let hi = ((c + 1) * len / columns).max(lo + 1).min(len);
                    let bin = &ch[lo.min(hi)..hi];
                    if bin.is_empty() {
                        0.0
                    } else {
                        bin.iter().sum::<f64>() / bin.len() as f64
                    }
                })
                .collect()
        })
        .collect();

    PaneSeries {
        kind: SeriesKind::Heatmap,
        series: Vec::new(),
        heat,
        x_bounds: [0.0, len.max(1) as f64],
        y_bounds: [0.0, stim.channel_count().max(1) as f64],
        x_label: "samples",
        y_label: "channel",
    }
}

fn y_bounds(series: &[Series]) -> [f64; 2] {
    value_bounds(series.iter().flat_map(|s| s.points.iter().map(|p| p.1)))
}

/// Padded min/max of finite values; `[0, 1]` when there is no usable range.
fn value_bounds(values: impl Iterator<Item = f64>) -> [f64; 2] {
    let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
    for v in values.filter(|v| v.is_finite()) {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if !lo.is_finite() || !hi.is_finite() {
        return [0.0, 1.0];
    }
    if hi <= lo {
        return [lo - 0.5, hi + 0.5];
    }
    let pad = ((hi - lo) * 0.05).max(1e-12);
    [lo - pad, hi + pad]
}
