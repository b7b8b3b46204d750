//! Plotters-powered pane chart widget for Ratatui.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.
//! All series and bounds are computed beforehand in [`crate::render::series`];
//! this widget only draws.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::render::series::{PaneSeries, SeriesKind};

/// High-contrast palette for terminal readability, in series draw order.
const SERIES_COLORS: [RGBColor; 3] = [
    RGBColor(255, 255, 255), // white
    RGBColor(0, 255, 255),   // cyan
    RGBColor(255, 200, 0),   // amber
];

/// A render-only chart of one pane's line or scatter series.
pub struct PaneChart<'a> {
    pub series: &'a PaneSeries,
}

impl<'a> Widget for PaneChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 5 {
            buf.set_string(
                area.x,
                area.y,
                "Pane too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.series.x_bounds;
        let [y0, y1] = self.series.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let data = self.series;
        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 2)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(data.x_label)
                .y_desc(data.y_label)
                .x_labels(5)
                .y_labels(3)
                .x_label_formatter(&|v| format!("{v:.0}"))
                .y_label_formatter(&|v| format!("{v:.2}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            for (i, s) in data.series.iter().enumerate() {
                let color = SERIES_COLORS[i % SERIES_COLORS.len()];
                match data.kind {
                    SeriesKind::Line => {
                        chart.draw_series(LineSeries::new(s.points.iter().copied(), &color))?;
                    }
                    // `Pixel` rather than `Circle`: the ratatui backend maps circle
                    // radii to canvas units, which produces huge markers.
                    SeriesKind::Scatter | SeriesKind::Heatmap => {
                        chart.draw_series(s.points.iter().map(|&(x, y)| Pixel::new((x, y), color)))?;
                    }
                }
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}
