//! Couples the time window to the pane set.
//!
//! Every mutation goes through the controller, which re-renders the affected
//! panes before returning. Nothing is deferred: once a call returns, every
//! visible scrollable pane shows the current window.

use serde::Serialize;
use tracing::{debug, info};

use crate::data::{RESPONSE_SIGNAL, SignalSource};
use crate::domain::{ModelStage, PlotMode};
use crate::error::ViewError;
use crate::render::Renderer;

use super::pane::{PaneId, PaneSet, PlotPane};
use super::window::TimeWindow;

/// Duration change for one zoom-in/zoom-out action, in seconds.
pub const ZOOM_STEP: f64 = 1.0;

pub struct WindowController<S, R> {
    window: TimeWindow,
    panes: PaneSet,
    source: S,
    renderer: R,
}

impl<S: SignalSource, R: Renderer> WindowController<S, R> {
    /// Take ownership of the session state and do the first extent + render pass.
    pub fn new(window: TimeWindow, panes: PaneSet, source: S, renderer: R) -> Result<Self, ViewError> {
        let mut controller = Self {
            window,
            panes,
            source,
            renderer,
        };
        controller.on_pane_set_changed()?;
        info!(
            panes = controller.panes.len(),
            max_extent = controller.window.max_extent(),
            "view session ready"
        );
        Ok(controller)
    }

    pub fn window(&self) -> &TimeWindow {
        &self.window
    }

    pub fn panes(&self) -> &PaneSet {
        &self.panes
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Render every visible, scrollable pane against the current window.
    pub fn on_window_change(&mut self) {
        let Self {
            window,
            panes,
            source,
            renderer,
        } = self;
        for pane in panes.iter_mut().filter(|p| p.is_visible() && p.is_scrollable()) {
            pane.render(&*window, &*source, renderer);
        }
    }

    /// Recompute the data extent after panes were added or removed.
    pub fn on_pane_set_changed(&mut self) -> Result<(), ViewError> {
        let extent = self.data_extent();
        debug!(extent, panes = self.panes.len(), "pane set changed");
        self.window.refresh_extent(extent)?;
        self.on_window_change();
        Ok(())
    }

    /// Response-signal length in seconds.
    ///
    /// Without a response signal, the longest pane signal is used, and an
    /// empty session has extent 0.
    fn data_extent(&self) -> f64 {
        if let Some(extent) = self.source.extent(RESPONSE_SIGNAL) {
            return extent;
        }
        self.panes
            .iter()
            .filter_map(|p| self.source.extent(p.signal()))
            .reduce(f64::max)
            .unwrap_or(0.0)
    }

    pub fn set_duration(&mut self, duration: f64) -> Result<bool, ViewError> {
        let changed = self.window.set_duration(duration)?;
        self.on_window_change();
        Ok(changed)
    }

    pub fn scroll_to(&mut self, start: f64) -> bool {
        let changed = self.window.scroll_to(start);
        self.on_window_change();
        changed
    }

    pub fn step(&mut self, steps: i32) -> bool {
        let changed = self.window.step(steps);
        self.on_window_change();
        changed
    }

    pub fn page(&mut self, pages: i32) -> bool {
        let changed = self.window.page(pages);
        self.on_window_change();
        changed
    }

    pub fn zoom(&mut self, delta: f64) -> Result<bool, ViewError> {
        let changed = self.window.zoom(delta)?;
        self.on_window_change();
        Ok(changed)
    }

    /// Show more time.
    pub fn zoom_out(&mut self) -> bool {
        self.zoom(ZOOM_STEP).unwrap_or(false)
    }

    /// Show less time, down to the minimum duration.
    pub fn zoom_in(&mut self) -> bool {
        self.zoom(-ZOOM_STEP).unwrap_or(false)
    }

    pub fn refresh_extent(&mut self, max_extent: f64) -> Result<bool, ViewError> {
        let changed = self.window.refresh_extent(max_extent)?;
        self.on_window_change();
        Ok(changed)
    }

    pub fn add_pane(&mut self, stage: ModelStage) -> Result<PaneId, ViewError> {
        let id = self.panes.add(stage);
        self.on_pane_set_changed()?;
        Ok(id)
    }

    pub fn remove_pane(&mut self, id: PaneId) -> Result<PlotPane, ViewError> {
        let pane = self.panes.remove(id).ok_or(ViewError::UnknownPane(id))?;
        self.on_pane_set_changed()?;
        Ok(pane)
    }

    /// Switch a pane's mode and redraw it against the current window.
    pub fn set_pane_mode(&mut self, id: PaneId, index: usize) -> Result<PlotMode, ViewError> {
        let Self {
            window,
            panes,
            source,
            renderer,
        } = self;
        let pane = panes.get_mut(id).ok_or(ViewError::UnknownPane(id))?;
        pane.set_mode(index)?;
        if pane.is_visible() {
            pane.render(&*window, &*source, renderer);
        }
        debug!(pane = %id, mode = pane.mode().name(), scrollable = pane.is_scrollable(), "pane mode changed");
        Ok(pane.mode())
    }

    pub fn cycle_pane_mode(&mut self, id: PaneId) -> Result<PlotMode, ViewError> {
        let next = self
            .panes
            .get(id)
            .ok_or(ViewError::UnknownPane(id))?
            .next_mode_index();
        self.set_pane_mode(id, next)
    }

    /// Hide or show a pane. A pane that becomes visible catches up with the window.
    pub fn toggle_pane_visibility(&mut self, id: PaneId) -> Result<bool, ViewError> {
        let Self {
            window,
            panes,
            source,
            renderer,
        } = self;
        let pane = panes.get_mut(id).ok_or(ViewError::UnknownPane(id))?;
        let visible = pane.toggle_visibility();
        if visible {
            pane.render(&*window, &*source, renderer);
        }
        Ok(visible)
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            window: self.window,
            panes: self
                .panes
                .iter()
                .map(|p| PaneSnapshot {
                    id: p.id(),
                    stage: p.stage().keyword.clone(),
                    mode: p.mode(),
                    visible: p.is_visible(),
                    scrollable: p.is_scrollable(),
                    x_range: p.x_range(),
                })
                .collect(),
        }
    }
}

/// Serializable picture of the window and what every pane shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewSnapshot {
    pub window: TimeWindow,
    pub panes: Vec<PaneSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaneSnapshot {
    pub id: PaneId,
    pub stage: String,
    pub mode: PlotMode,
    pub visible: bool,
    pub scrollable: bool,
    pub x_range: Option<[f64; 2]>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parse_modelname;
    use crate::render::testing::{MapSource, RecordingRenderer};
    use crate::view::window::DEFAULT_MIN_DURATION;

    type TestController = WindowController<MapSource, RecordingRenderer>;

    /// Panes: #0 wc (heatmap, static), #1 fir (timeseries), #2 lvl (pred_resp), #3 dexp (nl curve, static).
    fn controller(source: MapSource) -> TestController {
        let stages = parse_modelname("wc.18x2.g-fir.2x15-lvl.1-dexp.1").unwrap();
        let window = TimeWindow::new(10.0, DEFAULT_MIN_DURATION, 0.0).unwrap();
        WindowController::new(window, PaneSet::from_stages(stages), source, RecordingRenderer::default())
            .unwrap()
    }

    fn default_source() -> MapSource {
        MapSource::new().rate("pred", 100.0).extent("resp", 100.0)
    }

    #[test]
    fn new_picks_up_extent_and_renders_scrollable_panes() {
        let c = controller(default_source());
        assert_eq!(c.window().max_extent(), 100.0);
        let drawn: Vec<PaneId> = c.renderer().calls.iter().map(|(id, _)| *id).collect();
        assert_eq!(drawn, vec![PaneId(1), PaneId(2)]);
        assert_eq!(c.panes().get(PaneId(0)).unwrap().x_range(), None);
    }

    #[test]
    fn scroll_retargets_only_scrollable_panes() {
        let mut c = controller(default_source());
        c.renderer_mut().calls.clear();

        assert!(c.scroll_to(95.0));
        assert_eq!((c.window().start(), c.window().stop()), (90.0, 100.0));
        assert_eq!(
            c.renderer().calls,
            vec![(PaneId(1), [9000.0, 10000.0]), (PaneId(2), [9000.0, 10000.0])]
        );
        assert_eq!(c.panes().get(PaneId(3)).unwrap().x_range(), None);
    }

    #[test]
    fn on_window_change_is_idempotent() {
        let mut c = controller(default_source());
        c.scroll_to(12.5);
        c.on_window_change();
        let first = c.snapshot();
        c.on_window_change();
        assert_eq!(c.snapshot(), first);
    }

    #[test]
    fn set_duration_zero_leaves_everything_unchanged() {
        let mut c = controller(default_source());
        c.scroll_to(30.0);
        let before = c.snapshot();
        c.renderer_mut().calls.clear();

        let err = c.set_duration(0.0).unwrap_err();
        assert!(matches!(err, ViewError::InvalidDuration { .. }));
        assert_eq!(c.snapshot(), before);
        assert!(c.renderer().calls.is_empty());
    }

    #[test]
    fn hidden_panes_are_skipped_then_caught_up() {
        let mut c = controller(default_source());
        assert!(!c.toggle_pane_visibility(PaneId(2)).unwrap());
        c.renderer_mut().calls.clear();

        c.scroll_to(50.0);
        let drawn: Vec<PaneId> = c.renderer().calls.iter().map(|(id, _)| *id).collect();
        assert_eq!(drawn, vec![PaneId(1)]);
        assert_eq!(c.panes().get(PaneId(2)).unwrap().x_range(), Some([0.0, 1000.0]));

        assert!(c.toggle_pane_visibility(PaneId(2)).unwrap());
        assert_eq!(c.panes().get(PaneId(2)).unwrap().x_range(), Some([5000.0, 6000.0]));
    }

    #[test]
    fn mode_change_renders_with_current_window() {
        let mut c = controller(default_source());
        c.scroll_to(40.0);

        // wc: heatmap -> timeseries makes the pane scrollable.
        let mode = c.cycle_pane_mode(PaneId(0)).unwrap();
        assert_eq!(mode, PlotMode::StrfTimeseries);
        assert_eq!(c.panes().get(PaneId(0)).unwrap().x_range(), Some([4000.0, 5000.0]));

        // lvl: pred_resp -> scatter drops the window.
        c.set_pane_mode(PaneId(2), 1).unwrap();
        let lvl = c.panes().get(PaneId(2)).unwrap();
        assert!(!lvl.is_scrollable());
        assert_eq!(lvl.x_range(), None);

        assert_eq!(c.set_pane_mode(PaneId(9), 0), Err(ViewError::UnknownPane(PaneId(9))));
    }

    #[test]
    fn pane_set_change_refreshes_extent() {
        // No response signal: fall back to the panes' own signal extent.
        let source = MapSource::new().rate("pred", 10.0).extent("pred", 5.0);
        let mut c = controller(source);
        assert_eq!(c.window().max_extent(), 5.0);
        assert_eq!((c.window().start(), c.window().stop()), (0.0, 5.0));
        assert_eq!(c.window().duration(), 10.0);

        let id = c.add_pane(ModelStage::new(4, "lvl.2")).unwrap();
        assert_eq!(c.panes().get(id).unwrap().x_range(), Some([0.0, 50.0]));

        c.remove_pane(id).unwrap();
        assert_eq!(c.remove_pane(id).unwrap_err(), ViewError::UnknownPane(id));
    }

    #[test]
    fn negative_extent_is_fatal() {
        let stages = parse_modelname("lvl.1").unwrap();
        let window = TimeWindow::new(10.0, DEFAULT_MIN_DURATION, 0.0).unwrap();
        let source = MapSource::new().extent("resp", -1.0);
        let err = WindowController::new(window, PaneSet::from_stages(stages), source, RecordingRenderer::default())
            .err()
            .unwrap();
        assert_eq!(err, ViewError::InvalidExtent(-1.0));

        let mut c = controller(default_source());
        assert!(c.refresh_extent(f64::NAN).is_err());
        assert_eq!(c.window().max_extent(), 100.0);
    }

    #[test]
    fn zoom_in_and_out_move_by_one_second() {
        let mut c = controller(default_source());
        assert!(c.zoom_out());
        assert_eq!(c.window().duration(), 11.0);
        assert!(c.zoom_in());
        assert!(c.zoom_in());
        assert_eq!(c.window().duration(), 9.0);
        assert_eq!(c.panes().get(PaneId(1)).unwrap().x_range(), Some([0.0, 900.0]));
    }

    #[test]
    fn snapshot_serializes() {
        let c = controller(default_source());
        let json = serde_json::to_value(c.snapshot()).unwrap();
        assert_eq!(json["window"]["max_extent"], 100.0);
        assert_eq!(json["panes"][2]["mode"], "pred_resp");
        assert_eq!(json["panes"][0]["x_range"], serde_json::Value::Null);
    }
}
