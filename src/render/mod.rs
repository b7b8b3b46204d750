//! Renderer backends.
//!
//! Panes call [`Renderer::draw`] after retargeting themselves to the window.
//! The TUI uses a [`RedrawQueue`] and pulls data at frame time; the ASCII
//! backend in [`crate::plot`] reads the same [`series`] data.

use tracing::trace;

use crate::view::{PaneId, PlotPane};

pub mod series;

/// Something that can show a pane over a sample range.
pub trait Renderer {
    fn draw(&mut self, pane: &PlotPane, x_range: [f64; 2]);
}

/// Collects panes that need to be redrawn, in first-draw order.
#[derive(Debug, Clone, Default)]
pub struct RedrawQueue {
    dirty: Vec<PaneId>,
}

impl RedrawQueue {
    pub fn is_empty(&self) -> bool {
        self.dirty.is_empty()
    }

    pub fn contains(&self, id: PaneId) -> bool {
        self.dirty.contains(&id)
    }

    pub fn drain(&mut self) -> Vec<PaneId> {
        std::mem::take(&mut self.dirty)
    }
}

impl Renderer for RedrawQueue {
    fn draw(&mut self, pane: &PlotPane, x_range: [f64; 2]) {
        trace!(pane = %pane.id(), ?x_range, "queue redraw");
        if !self.dirty.contains(&pane.id()) {
            self.dirty.push(pane.id());
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;

    use super::Renderer;
    use crate::data::SignalSource;
    use crate::view::{PaneId, PlotPane};

    /// Records every draw call.
    #[derive(Debug, Default)]
    pub struct RecordingRenderer {
        pub calls: Vec<(PaneId, [f64; 2])>,
    }

    impl Renderer for RecordingRenderer {
        fn draw(&mut self, pane: &PlotPane, x_range: [f64; 2]) {
            self.calls.push((pane.id(), x_range));
        }
    }

    /// Source with hand-set rates and extents.
    #[derive(Debug, Default, Clone)]
    pub struct MapSource {
        rates: HashMap<String, f64>,
        extents: HashMap<String, f64>,
    }

    impl MapSource {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn rate(mut self, signal: &str, fs: f64) -> Self {
            self.rates.insert(signal.to_string(), fs);
            self
        }

        pub fn extent(mut self, signal: &str, seconds: f64) -> Self {
            self.extents.insert(signal.to_string(), seconds);
            self
        }

        pub fn set_extent(&mut self, signal: &str, seconds: f64) {
            self.extents.insert(signal.to_string(), seconds);
        }
    }

    impl SignalSource for MapSource {
        fn sample_rate(&self, signal: &str) -> Option<f64> {
            self.rates.get(signal).copied()
        }

        fn extent(&self, signal: &str) -> Option<f64> {
            self.extents.get(signal).copied()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ModelStage;

    #[test]
    fn redraw_queue_dedupes_and_drains() {
        let a = PlotPane::new(PaneId(0), ModelStage::new(0, "lvl.1"));
        let b = PlotPane::new(PaneId(1), ModelStage::new(1, "dexp.1"));
        let mut queue = RedrawQueue::default();

        queue.draw(&b, [0.0, 1.0]);
        queue.draw(&a, [0.0, 1.0]);
        queue.draw(&b, [1.0, 2.0]);
        assert!(queue.contains(PaneId(0)));

        assert_eq!(queue.drain(), vec![PaneId(1), PaneId(0)]);
        assert!(queue.is_empty());
    }
}
