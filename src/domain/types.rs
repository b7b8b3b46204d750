//! Shared domain types.
//!
//! These types are small, copyable descriptors of *what* a pane shows. They carry
//! no signal data; panes look data up through a [`crate::data::SignalSource`].

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::ViewError;

/// How a pane draws its stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PlotMode {
    /// Prediction overlaid on the measured response.
    PredResp,
    /// Stage input (stimulus) and output (prediction) over time.
    BeforeAndAfter,
    /// Stimulus channels over time.
    StrfTimeseries,
    /// Prediction vs response, one dot per sample.
    Scatter,
    /// Stimulus channel x time intensity map over the whole recording.
    StrfHeatmap,
    /// Binned mean response as a function of prediction.
    NlCurve,
}

/// Modes that support windowed scrolling.
///
/// Only panes in one of these modes follow the global time window; everything
/// else always shows the whole recording.
const SCROLLABLE_MODES: &[PlotMode] = &[
    PlotMode::StrfTimeseries,
    PlotMode::BeforeAndAfter,
    PlotMode::PredResp,
];

impl PlotMode {
    pub const ALL: [PlotMode; 6] = [
        PlotMode::PredResp,
        PlotMode::BeforeAndAfter,
        PlotMode::StrfTimeseries,
        PlotMode::Scatter,
        PlotMode::StrfHeatmap,
        PlotMode::NlCurve,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PlotMode::PredResp => "pred_resp",
            PlotMode::BeforeAndAfter => "before_and_after",
            PlotMode::StrfTimeseries => "strf_timeseries",
            PlotMode::Scatter => "scatter",
            PlotMode::StrfHeatmap => "strf_heatmap",
            PlotMode::NlCurve => "nl_curve",
        }
    }

    pub fn is_scrollable(self) -> bool {
        SCROLLABLE_MODES.contains(&self)
    }

    /// Signals drawn by this mode, in draw order.
    pub fn signals(self) -> &'static [&'static str] {
        match self {
            PlotMode::PredResp => &["resp", "pred"],
            PlotMode::BeforeAndAfter => &["stim", "pred"],
            PlotMode::StrfTimeseries | PlotMode::StrfHeatmap => &["stim"],
            PlotMode::Scatter | PlotMode::NlCurve => &["pred", "resp"],
        }
    }
}

/// Kind of a model stage, taken from the first token of its keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageKind {
    /// Weighted channel reduction (`wc`).
    Wc,
    /// Finite impulse response filter (`fir`).
    Fir,
    /// Level shift (`lvl`).
    Lvl,
    /// Double-exponential output nonlinearity (`dexp`).
    Dexp,
    /// Any keyword we have no specific plots for.
    Other,
}

impl StageKind {
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword.split('.').next().unwrap_or_default() {
            "wc" => StageKind::Wc,
            "fir" => StageKind::Fir,
            "lvl" => StageKind::Lvl,
            "dexp" => StageKind::Dexp,
            _ => StageKind::Other,
        }
    }

    /// Plot modes offered for this kind; the first one is the default.
    ///
    /// Never empty.
    pub fn plot_modes(self) -> &'static [PlotMode] {
        match self {
            StageKind::Wc => &[PlotMode::StrfHeatmap, PlotMode::StrfTimeseries],
            StageKind::Fir => &[PlotMode::StrfTimeseries, PlotMode::StrfHeatmap, PlotMode::BeforeAndAfter],
            StageKind::Lvl => &[PlotMode::PredResp, PlotMode::Scatter],
            StageKind::Dexp => &[PlotMode::NlCurve, PlotMode::BeforeAndAfter, PlotMode::PredResp],
            StageKind::Other => &[PlotMode::PredResp, PlotMode::BeforeAndAfter, PlotMode::Scatter],
        }
    }
}

/// One module of the model chain. Each stage owns exactly one plot pane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelStage {
    pub index: usize,
    pub keyword: String,
    pub kind: StageKind,
}

impl ModelStage {
    pub fn new(index: usize, keyword: impl Into<String>) -> Self {
        let keyword = keyword.into();
        let kind = StageKind::from_keyword(&keyword);
        Self { index, keyword, kind }
    }
}

/// Parse a shorthand modelname (`wc.18x2.g-fir.2x15-lvl.1-dexp.1`) into stages.
pub fn parse_modelname(modelname: &str) -> Result<Vec<ModelStage>, ViewError> {
    let trimmed = modelname.trim();
    if trimmed.is_empty() {
        return Err(ViewError::InvalidModelname(modelname.to_string()));
    }

    let mut stages = Vec::new();
    for (index, keyword) in trimmed.split('-').enumerate() {
        let keyword = keyword.trim();
        if keyword.is_empty() || keyword.starts_with('.') {
            return Err(ViewError::InvalidModelname(modelname.to_string()));
        }
        stages.push(ModelStage::new(index, keyword));
    }
    Ok(stages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_modelname_splits_keywords() {
        let stages = parse_modelname("wc.18x2.g-fir.2x15-lvl.1-dexp.1").unwrap();
        let kinds: Vec<StageKind> = stages.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![StageKind::Wc, StageKind::Fir, StageKind::Lvl, StageKind::Dexp]);
        assert_eq!(stages[1].keyword, "fir.2x15");
        assert_eq!(stages[3].index, 3);
    }

    #[test]
    fn parse_modelname_rejects_empty_keywords() {
        assert!(parse_modelname("").is_err());
        assert!(parse_modelname("wc.18x1--lvl.1").is_err());
        assert!(parse_modelname("wc.18x1-.1").is_err());
    }

    #[test]
    fn unknown_keywords_get_generic_modes() {
        let stage = ModelStage::new(0, "stp.2");
        assert_eq!(stage.kind, StageKind::Other);
        assert!(!stage.kind.plot_modes().is_empty());
    }

    #[test]
    fn only_time_series_modes_scroll() {
        let scrollable: Vec<&str> = PlotMode::ALL
            .iter()
            .filter(|m| m.is_scrollable())
            .map(|m| m.name())
            .collect();
        assert_eq!(scrollable, vec!["pred_resp", "before_and_after", "strf_timeseries"]);
    }
}
