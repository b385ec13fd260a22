//! Loss / accuracy charts using egui_plot

use eframe::egui;
use egui_plot::{Corner, Legend, Line, Plot, PlotBounds, PlotPoints, Points};

use super::color32;
use nn_anim_core::{ChartPanel, LegendCorner};

fn corner(legend: LegendCorner) -> Corner {
    match legend {
        LegendCorner::UpperRight => Corner::RightTop,
        LegendCorner::LowerRight => Corner::RightBottom,
    }
}

/// Render one chart with fixed bounds; navigation is disabled so the axes
/// stay put while the curves grow.
pub fn show(ui: &mut egui::Ui, id: &str, panel: &ChartPanel) {
    ui.vertical_centered(|ui| {
        ui.label(egui::RichText::new(panel.title).strong());
    });

    let (x0, x1) = panel.x_range;
    let x1 = if x1 > x0 { x1 } else { x0 + 1.0 };
    let (y0, y1) = panel.y_range;

    Plot::new(id)
        .legend(Legend::default().position(corner(panel.legend)))
        .x_axis_label(panel.x_label)
        .y_axis_label(panel.y_label)
        .height(ui.available_height())
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .allow_double_click_reset(false)
        .show(ui, |plot_ui| {
            plot_ui.set_plot_bounds(PlotBounds::from_min_max([x0, y0], [x1, y1]));

            for series in panel.series() {
                let points = PlotPoints::new(series.visible_points().to_vec());
                plot_ui.line(
                    Line::new(points)
                        .color(color32(series.color, 1.0))
                        .name(series.label),
                );
            }

            if let Some(marker) = panel.marker {
                plot_ui.points(
                    Points::new(vec![marker])
                        .radius(3.0)
                        .color(color32(panel.marker_color, 1.0)),
                );
            }
        });
}
