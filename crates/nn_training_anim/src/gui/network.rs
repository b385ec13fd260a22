//! Network schematic painted directly with egui shapes.

use eframe::egui;

use super::color32;
use nn_anim_core::Scene;

const NODE_RADIUS: f32 = 8.0;
/// Line widths are in points; the window runs at ~120 dpi.
const WIDTH_SCALE: f32 = 120.0 / 72.0;

pub fn show(ui: &mut egui::Ui, scene: &Scene, size: egui::Vec2) {
    let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
    let rect = response.rect.shrink(NODE_RADIUS);

    // Unit square, y up
    let to_screen = |p: [f64; 2]| {
        egui::pos2(
            rect.left() + p[0] as f32 * rect.width(),
            rect.bottom() - p[1] as f32 * rect.height(),
        )
    };

    for seg in &scene.segments {
        painter.line_segment(
            [to_screen(seg.start), to_screen(seg.end)],
            egui::Stroke::new(seg.width as f32 * WIDTH_SCALE, color32(seg.color, seg.opacity)),
        );
    }

    let node_color = color32(scene.network.node_color, 1.0);
    for node in scene.network.nodes() {
        painter.circle_filled(to_screen(node), NODE_RADIUS, node_color);
    }

    for layer in &scene.network.layers {
        painter.text(
            to_screen([layer.x, scene.network.label_y]),
            egui::Align2::CENTER_CENTER,
            layer.label,
            egui::FontId::proportional(13.0),
            egui::Color32::BLACK,
        );
    }
}
