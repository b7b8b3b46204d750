//! The global time window shared by all scrollable panes.

use serde::Serialize;
use tracing::debug;

use crate::error::ViewError;

/// Initial display duration in seconds.
pub const DEFAULT_DURATION: f64 = 10.0;
/// Smallest duration the window may shrink to, in seconds.
pub const DEFAULT_MIN_DURATION: f64 = 0.001;

/// Visible time span `[start, stop]` in seconds, bounded by the data extent.
///
/// Invariants after every mutation:
/// - `0 <= start <= stop <= max_extent`
/// - `duration >= min_duration`
/// - `stop - start == duration` unless `max_extent < duration`, in which case
///   the window shows the whole extent and `duration` is kept as requested.
///
/// `start` is always clamped; `duration` is never silently changed by a
/// scroll or an extent refresh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeWindow {
    start: f64,
    stop: f64,
    duration: f64,
    min_duration: f64,
    max_extent: f64,
}

impl TimeWindow {
    pub fn new(duration: f64, min_duration: f64, max_extent: f64) -> Result<Self, ViewError> {
        if !(min_duration.is_finite() && min_duration > 0.0) {
            return Err(ViewError::InvalidMinimum(min_duration));
        }
        check_duration(duration, min_duration)?;
        check_extent(max_extent)?;

        let mut window = Self {
            start: 0.0,
            stop: 0.0,
            duration,
            min_duration,
            max_extent,
        };
        window.clamp();
        Ok(window)
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn stop(&self) -> f64 {
        self.stop
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn min_duration(&self) -> f64 {
        self.min_duration
    }

    pub fn max_extent(&self) -> f64 {
        self.max_extent
    }

    /// Time actually shown; smaller than `duration` only when the data is shorter.
    pub fn visible_span(&self) -> f64 {
        self.stop - self.start
    }

    /// Valid range for `start`.
    pub fn scroll_range(&self) -> [f64; 2] {
        [0.0, (self.max_extent - self.duration).max(0.0)]
    }

    /// Scroll increment for a single step: a tenth of the duration, rounded
    /// up to whole seconds but never more than the duration itself.
    pub fn single_step(&self) -> f64 {
        (self.duration / 10.0).ceil().min(self.duration)
    }

    pub fn page_step(&self) -> f64 {
        self.duration
    }

    /// Set a new display duration.
    ///
    /// Returns whether the window changed. On error the window is untouched.
    pub fn set_duration(&mut self, duration: f64) -> Result<bool, ViewError> {
        check_duration(duration, self.min_duration)?;
        let before = *self;
        self.duration = duration;
        self.clamp();
        Ok(self.log_change(before, "set_duration"))
    }

    /// Move the window to `start`, clamped into [`Self::scroll_range`].
    pub fn scroll_to(&mut self, start: f64) -> bool {
        let before = *self;
        let start = if start.is_nan() { 0.0 } else { start };
        let [lo, hi] = self.scroll_range();
        self.start = start.clamp(lo, hi);
        self.clamp();
        self.log_change(before, "scroll_to")
    }

    /// Scroll by `steps` single steps (negative scrolls back).
    pub fn step(&mut self, steps: i32) -> bool {
        self.scroll_to(self.start + f64::from(steps) * self.single_step())
    }

    /// Scroll by `pages` whole durations (negative scrolls back).
    pub fn page(&mut self, pages: i32) -> bool {
        self.scroll_to(self.start + f64::from(pages) * self.page_step())
    }

    /// Grow (positive) or shrink (negative) the duration, stopping at the minimum.
    pub fn zoom(&mut self, delta: f64) -> Result<bool, ViewError> {
        if !delta.is_finite() {
            return Err(ViewError::InvalidDuration {
                requested: self.duration + delta,
                minimum: self.min_duration,
            });
        }
        let before = *self;
        self.duration = (self.duration + delta).max(self.min_duration);
        self.clamp();
        Ok(self.log_change(before, "zoom"))
    }

    /// Adopt a new data extent and pull the window back inside it.
    ///
    /// A negative or non-finite extent is an upstream contract violation and
    /// leaves the window untouched.
    pub fn refresh_extent(&mut self, max_extent: f64) -> Result<bool, ViewError> {
        check_extent(max_extent)?;
        let before = *self;
        self.max_extent = max_extent;
        self.clamp();
        Ok(self.log_change(before, "refresh_extent"))
    }

    /// `stop = min(start + duration, max_extent)`, then
    /// `start = max(0, stop - duration)`.
    ///
    /// When nothing is cut off `start` is kept as is instead of being
    /// re-derived from `stop`, so repeated clamps do not drift.
    fn clamp(&mut self) {
        let end = self.start + self.duration;
        if end > self.max_extent {
            self.stop = self.max_extent;
            self.start = (self.stop - self.duration).max(0.0);
        } else {
            self.start = self.start.max(0.0);
            self.stop = end;
        }
    }

    fn log_change(&self, before: TimeWindow, op: &str) -> bool {
        let changed = *self != before;
        if changed {
            debug!(
                op,
                start = self.start,
                stop = self.stop,
                duration = self.duration,
                max_extent = self.max_extent,
                "time window changed"
            );
        }
        changed
    }
}

fn check_duration(duration: f64, min_duration: f64) -> Result<(), ViewError> {
    if duration.is_finite() && duration > min_duration {
        Ok(())
    } else {
        Err(ViewError::InvalidDuration {
            requested: duration,
            minimum: min_duration,
        })
    }
}

fn check_extent(max_extent: f64) -> Result<(), ViewError> {
    if max_extent.is_finite() && max_extent >= 0.0 {
        Ok(())
    } else {
        Err(ViewError::InvalidExtent(max_extent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(duration: f64, max_extent: f64) -> TimeWindow {
        TimeWindow::new(duration, DEFAULT_MIN_DURATION, max_extent).unwrap()
    }

    #[test]
    fn scroll_past_end_keeps_duration() {
        let mut w = window(10.0, 100.0);
        assert!(w.scroll_to(95.0));
        assert_eq!(w.stop(), 100.0);
        assert_eq!(w.start(), 90.0);
        assert_eq!(w.duration(), 10.0);
    }

    #[test]
    fn scroll_before_zero_clamps_to_zero() {
        let mut w = window(10.0, 100.0);
        w.scroll_to(40.0);
        w.scroll_to(-3.0);
        assert_eq!((w.start(), w.stop()), (0.0, 10.0));

        w.scroll_to(f64::NAN);
        assert_eq!(w.start(), 0.0);

        w.scroll_to(f64::INFINITY);
        assert_eq!((w.start(), w.stop()), (90.0, 100.0));
    }

    #[test]
    fn set_duration_zero_is_rejected_and_state_unchanged() {
        let mut w = window(10.0, 100.0);
        w.scroll_to(20.0);
        let before = w;

        let err = w.set_duration(0.0).unwrap_err();
        assert!(matches!(err, ViewError::InvalidDuration { requested, .. } if requested == 0.0));
        assert_eq!(w, before);

        assert!(w.set_duration(DEFAULT_MIN_DURATION).is_err());
        assert!(w.set_duration(f64::NAN).is_err());
        assert!(w.set_duration(-5.0).is_err());
        assert_eq!(w, before);
    }

    #[test]
    fn set_duration_reclamps_against_extent() {
        let mut w = window(10.0, 100.0);
        w.scroll_to(85.0);
        assert!(w.set_duration(30.0).unwrap());
        assert_eq!((w.start(), w.stop()), (70.0, 100.0));
    }

    #[test]
    fn refresh_extent_shrinks_window_but_not_duration() {
        let mut w = window(10.0, 100.0);
        w.scroll_to(50.0);
        assert!(w.refresh_extent(5.0).unwrap());
        assert_eq!(w.start(), 0.0);
        assert_eq!(w.stop(), 5.0);
        assert_eq!(w.duration(), 10.0);
        assert_eq!(w.visible_span(), 5.0);
    }

    #[test]
    fn refresh_extent_rejects_negative_extent() {
        let mut w = window(10.0, 100.0);
        let before = w;
        assert_eq!(w.refresh_extent(-1.0), Err(ViewError::InvalidExtent(-1.0)));
        assert!(w.refresh_extent(f64::INFINITY).is_err());
        assert_eq!(w, before);

        assert!(TimeWindow::new(10.0, DEFAULT_MIN_DURATION, -0.5).is_err());
        assert!(TimeWindow::new(10.0, 0.0, 100.0).is_err());
    }

    #[test]
    fn zoom_stops_at_minimum_duration() {
        let mut w = window(2.0, 100.0);
        assert!(w.zoom(-5.0).unwrap());
        assert_eq!(w.duration(), DEFAULT_MIN_DURATION);
        assert!(w.zoom(1.0).unwrap());
        assert!((w.duration() - (1.0 + DEFAULT_MIN_DURATION)).abs() < 1e-12);
        assert!(w.zoom(f64::NAN).is_err());
    }

    #[test]
    fn zoom_out_near_end_pulls_start_back() {
        let mut w = window(10.0, 100.0);
        w.scroll_to(90.0);
        w.zoom(5.0).unwrap();
        assert_eq!((w.start(), w.stop()), (85.0, 100.0));
    }

    #[test]
    fn steps_and_pages_follow_duration() {
        let mut w = window(25.0, 100.0);
        assert_eq!(w.single_step(), 3.0);
        assert_eq!(w.page_step(), 25.0);

        w.step(2);
        assert_eq!(w.start(), 6.0);
        w.page(1);
        assert_eq!(w.start(), 31.0);
        w.page(-5);
        assert_eq!(w.start(), 0.0);
        assert!(!w.step(-1));

        let small = window(0.5, 100.0);
        assert_eq!(small.single_step(), 0.5);
    }

    #[test]
    fn clamp_invariants_hold_over_grid() {
        let values = [0.0, 0.25, 1.0, 3.0, 9.5, 10.0, 42.0, 100.0, 1e6];
        for &duration in &values[1..] {
            for &max_extent in &values {
                for &start in &values {
                    let mut w = window(duration, max_extent);
                    w.scroll_to(start);
                    assert!(w.start() >= 0.0);
                    assert!(w.start() <= w.stop());
                    assert!(w.stop() <= max_extent);
                    assert_eq!(w.duration(), duration);
                    let span = w.visible_span();
                    assert!(span <= duration);
                    if max_extent >= duration {
                        assert_eq!(span, duration, "d={duration} m={max_extent} s={start}");
                    } else {
                        assert_eq!(span, max_extent);
                    }
                }
            }
        }
    }
}
