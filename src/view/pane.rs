//! Plot panes: one per model stage.

use serde::Serialize;
use tracing::{trace, warn};

use crate::data::SignalSource;
use crate::domain::{ModelStage, PlotMode};
use crate::error::ViewError;
use crate::render::Renderer;

use super::window::TimeWindow;

/// Signal whose sampling rate converts window seconds into pane samples.
pub const DEFAULT_SIGNAL: &str = "pred";

/// Rate used when a pane's signal has no usable sampling rate.
const FALLBACK_SAMPLE_RATE: f64 = 1.0;

/// Stable pane identifier, unique within a [`PaneSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PaneId(pub u32);

impl std::fmt::Display for PaneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlotPane {
    id: PaneId,
    stage: ModelStage,
    modes: &'static [PlotMode],
    mode_index: usize,
    signal: String,
    visible: bool,
    scrollable: bool,
    x_range: Option<[f64; 2]>,
}

impl PlotPane {
    pub fn new(id: PaneId, stage: ModelStage) -> Self {
        let modes = stage.kind.plot_modes();
        let scrollable = modes.first().is_some_and(|m| m.is_scrollable());
        Self {
            id,
            stage,
            modes,
            mode_index: 0,
            signal: DEFAULT_SIGNAL.to_string(),
            visible: true,
            scrollable,
            x_range: None,
        }
    }

    pub fn id(&self) -> PaneId {
        self.id
    }

    pub fn stage(&self) -> &ModelStage {
        &self.stage
    }

    /// Modes this pane's stage can be drawn in.
    pub fn modes(&self) -> &'static [PlotMode] {
        self.modes
    }

    pub fn mode_index(&self) -> usize {
        self.mode_index
    }

    pub fn mode(&self) -> PlotMode {
        self.modes[self.mode_index]
    }

    /// Signal used for this pane's sampling rate.
    pub fn signal(&self) -> &str {
        &self.signal
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_scrollable(&self) -> bool {
        self.scrollable
    }

    /// Visible horizontal extent in samples, or `None` when showing all data.
    pub fn x_range(&self) -> Option<[f64; 2]> {
        self.x_range
    }

    /// Sampling rate of the pane's signal, or 1 Hz with a warning.
    pub fn sample_rate<S: SignalSource + ?Sized>(&self, source: &S) -> f64 {
        match source.sample_rate(&self.signal) {
            Some(fs) if fs.is_finite() && fs > 0.0 => fs,
            other => {
                warn!(
                    pane = %self.id,
                    signal = %self.signal,
                    rate = ?other,
                    "no sampling rate for signal, falling back to {FALLBACK_SAMPLE_RATE}"
                );
                FALLBACK_SAMPLE_RATE
            }
        }
    }

    /// Retarget the pane to `window`. Non-scrollable panes ignore this.
    pub fn render<S, R>(&mut self, window: &TimeWindow, source: &S, renderer: &mut R)
    where
        S: SignalSource + ?Sized,
        R: Renderer + ?Sized,
    {
        if !self.scrollable {
            return;
        }
        let fs = self.sample_rate(source);
        let x_range = [window.start() * fs, window.stop() * fs];
        self.x_range = Some(x_range);
        trace!(pane = %self.id, x0 = x_range[0], x1 = x_range[1], "render pane");
        renderer.draw(self, x_range);
    }

    /// Switch to the mode at `index` in [`Self::modes`].
    ///
    /// The drawn extent is reset; the caller re-renders against the current window.
    pub fn set_mode(&mut self, index: usize) -> Result<(), ViewError> {
        let mode = *self.modes.get(index).ok_or(ViewError::UnknownMode {
            pane: self.id,
            index,
        })?;
        self.mode_index = index;
        self.scrollable = mode.is_scrollable();
        self.x_range = None;
        Ok(())
    }

    /// Index of the mode after the current one, wrapping around.
    pub fn next_mode_index(&self) -> usize {
        (self.mode_index + 1) % self.modes.len()
    }

    /// Flip visibility and return the new state. The drawn extent is kept.
    pub fn toggle_visibility(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }
}

/// Panes in display order.
#[derive(Debug, Clone, Default)]
pub struct PaneSet {
    panes: Vec<PlotPane>,
    next_id: u32,
}

impl PaneSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_stages(stages: impl IntoIterator<Item = ModelStage>) -> Self {
        let mut set = Self::new();
        for stage in stages {
            set.add(stage);
        }
        set
    }

    /// Append a pane for `stage`; ids are never reused.
    pub fn add(&mut self, stage: ModelStage) -> PaneId {
        let id = PaneId(self.next_id);
        self.next_id += 1;
        self.panes.push(PlotPane::new(id, stage));
        id
    }

    pub fn remove(&mut self, id: PaneId) -> Option<PlotPane> {
        let idx = self.position(id)?;
        Some(self.panes.remove(idx))
    }

    pub fn get(&self, id: PaneId) -> Option<&PlotPane> {
        self.panes.iter().find(|p| p.id == id)
    }

    pub fn get_mut(&mut self, id: PaneId) -> Option<&mut PlotPane> {
        self.panes.iter_mut().find(|p| p.id == id)
    }

    pub fn position(&self, id: PaneId) -> Option<usize> {
        self.panes.iter().position(|p| p.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlotPane> {
        self.panes.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, PlotPane> {
        self.panes.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.panes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panes.is_empty()
    }
}
