//! Offscreen frame rendering with plotters
//!
//! Draws the same three-region figure the window shows into an RGB24 canvas.
//! Sizes are given in points and scaled by `dpi / 72`.

use anyhow::Result;
use image::RgbImage;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use nn_anim_core::scene::NETWORK_HEIGHT_SHARE;
use nn_anim_core::{ChartPanel, LegendCorner, Rgb, Scene};

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

const FONT: &str = "sans-serif";

fn pt(points: f64, scale: f64) -> f64 {
    points * scale
}

fn px(points: f64, scale: f64) -> u32 {
    (points * scale).round().max(1.0) as u32
}

fn color(rgb: Rgb) -> RGBColor {
    RGBColor(rgb.0, rgb.1, rgb.2)
}

fn legend_position(corner: LegendCorner) -> SeriesLabelPosition {
    match corner {
        LegendCorner::UpperRight => SeriesLabelPosition::UpperRight,
        LegendCorner::LowerRight => SeriesLabelPosition::LowerRight,
    }
}

/// Render the full figure for the scene's current state.
pub fn draw_frame(scene: &Scene, canvas: &mut RgbImage, scale: f64) -> Result<()> {
    let size = canvas.dimensions();
    let root = BitMapBackend::with_buffer(canvas, size).into_drawing_area();
    root.fill(&WHITE)?;

    let title_font = (FONT, pt(14.0, scale)).into_font().style(FontStyle::Bold);
    let body = root.titled(scene.title, title_font)?;
    let (width, height) = body.dim_in_pixel();
    let (top, bottom) = body.split_vertically((f64::from(height) * NETWORK_HEIGHT_SHARE) as u32);
    let (left, right) = bottom.split_horizontally(width / 2);

    draw_network(&top, scene, scale)?;
    draw_layer_labels(&top, scene, scale)?;
    draw_chart(&left, &scene.loss, scale)?;
    draw_chart(&right, &scene.accuracy, scale)?;

    root.present()?;
    Ok(())
}

/// Connections and nodes on the unit square. No axes, no text.
pub(crate) fn draw_network(area: &Area, scene: &Scene, scale: f64) -> Result<()> {
    let mut chart = ChartBuilder::on(area)
        .margin(px(4.0, scale))
        .build_cartesian_2d(0f64..1f64, 0f64..1f64)?;

    chart.draw_series(scene.segments.iter().map(|seg| {
        let style = color(seg.color)
            .mix(seg.opacity)
            .stroke_width(px(seg.width, scale));
        PathElement::new(
            vec![(seg.start[0], seg.start[1]), (seg.end[0], seg.end[1])],
            style,
        )
    }))?;

    // markersize 12 is a diameter
    let node_color = color(scene.network.node_color);
    let radius = px(6.0, scale);
    chart.draw_series(
        scene
            .network
            .nodes()
            .map(|[x, y]| Circle::new((x, y), radius, node_color.filled())),
    )?;
    Ok(())
}

fn draw_layer_labels(area: &Area, scene: &Scene, scale: f64) -> Result<()> {
    let mut chart = ChartBuilder::on(area)
        .margin(px(4.0, scale))
        .build_cartesian_2d(0f64..1f64, 0f64..1f64)?;
    let style = TextStyle::from((FONT, pt(9.0, scale)).into_font())
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));
    let label_y = scene.network.label_y;
    chart.draw_series(
        scene
            .network
            .layers
            .iter()
            .map(|layer| Text::new(layer.label, (layer.x, label_y), style.clone())),
    )?;
    Ok(())
}

fn draw_chart(area: &Area, panel: &ChartPanel, scale: f64) -> Result<()> {
    let (x0, x1) = panel.x_range;
    // A single epoch still needs a non-empty axis
    let x1 = if x1 > x0 { x1 } else { x0 + 1.0 };
    let (y0, y1) = panel.y_range;

    let mut chart = ChartBuilder::on(area)
        .caption(panel.title, (FONT, pt(12.0, scale)))
        .margin(px(8.0, scale))
        .x_label_area_size(px(24.0, scale))
        .y_label_area_size(px(32.0, scale))
        .build_cartesian_2d(x0..x1, y0..y1)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc(panel.x_label)
        .y_desc(panel.y_label)
        .label_style((FONT, pt(8.0, scale)))
        .axis_desc_style((FONT, pt(10.0, scale)))
        .draw()?;

    let legend_len = px(14.0, scale) as i32;
    for series in panel.series() {
        let rgb = color(series.color);
        let points = series.visible_points().iter().map(|p| (p[0], p[1]));
        chart
            .draw_series(LineSeries::new(points, rgb.stroke_width(px(1.5, scale))))?
            .label(series.label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + legend_len, y)], rgb.stroke_width(2)));
    }

    if let Some([x, y]) = panel.marker {
        let style = color(panel.marker_color).filled();
        chart.draw_series(std::iter::once(Circle::new((x, y), px(2.0, scale), style)))?;
    }

    chart
        .configure_series_labels()
        .position(legend_position(panel.legend))
        .label_font((FONT, pt(8.0, scale)))
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK.mix(0.3))
        .draw()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nn_anim_core::{apply_frame, generate_training_curves};

    fn render_network(scene: &Scene) -> Result<RgbImage> {
        let mut canvas = RgbImage::new(300, 120);
        {
            let size = canvas.dimensions();
            let root = BitMapBackend::with_buffer(&mut canvas, size).into_drawing_area();
            root.fill(&WHITE)?;
            draw_network(&root, scene, 1.0)?;
            root.present()?;
        }
        Ok(canvas)
    }

    #[test]
    fn test_network_pixels_follow_activation() -> Result<()> {
        let mut scene = Scene::build(&generate_training_curves(50, 42)?);

        apply_frame(&mut scene, 0);
        let early = render_network(&scene)?;
        apply_frame(&mut scene, 49);
        let late = render_network(&scene)?;

        let node = image::Rgb([0x4C, 0x72, 0xB0]);
        assert!(early.pixels().any(|p| *p == node), "nodes not drawn");
        assert_ne!(early, late);

        // Every connection is brighter at the end, so fewer pixels stay white
        let white = |img: &RgbImage| img.pixels().filter(|p| p.0 == [255, 255, 255]).count();
        assert!(white(&late) < white(&early));
        Ok(())
    }

    #[test]
    fn test_point_scaling() {
        assert_eq!(px(6.0, 150.0 / 72.0), 13);
        assert_eq!(px(0.1, 1.0), 1);
        assert!((pt(12.0, 2.0) - 24.0).abs() < 1e-12);
    }
}
