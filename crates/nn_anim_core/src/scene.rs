//! Scene Builder - static layout plus the mutable display state
//!
//! Three regions: the network schematic on top (unit square, no axes) and the
//! loss / accuracy charts below. Everything a frontend needs to draw a frame
//! lives in `Scene`; there is no backend state behind it.

use crate::curves::{MetricCurve, TrainingCurves};
use crate::palette::{self, Rgb};

pub const FIGURE_TITLE: &str = "Neural Network Training - Loss, Accuracy and Schematic";

/// Schematic : charts height ratio is 1 : 1.3.
pub const NETWORK_HEIGHT_SHARE: f64 = 1.0 / 2.3;

/// Nodes per layer: input, hidden, output.
pub const LAYER_SIZES: [usize; 3] = [4, 5, 1];
pub const LAYER_X: [f64; 3] = [0.1, 0.5, 0.9];
pub const LAYER_LABELS: [&str; 3] = ["Input layer", "Hidden layer", "Output layer"];
pub const LAYER_LABEL_Y: f64 = 0.9;

/// 4 x 5 input->hidden plus 5 x 1 hidden->output.
pub const SEGMENT_COUNT: usize = LAYER_SIZES[0] * LAYER_SIZES[1] + LAYER_SIZES[1] * LAYER_SIZES[2];

pub const INITIAL_OPACITY: f64 = 0.15;
pub const RESET_OPACITY: f64 = 0.1;
const INPUT_HIDDEN_WIDTH: f64 = 1.2;
const HIDDEN_OUTPUT_WIDTH: f64 = 1.4;

pub const ACCURACY_Y_RANGE: (f64, f64) = (0.4, 1.0);

/// One synapse of the schematic. Geometry is fixed; display attributes are
/// rewritten by every frame.
#[derive(Clone, Debug, PartialEq)]
pub struct ConnectionSegment {
    pub start: [f64; 2],
    pub end: [f64; 2],
    pub opacity: f64,
    pub width: f64,
    pub color: Rgb,
    pub active: bool,
}

impl ConnectionSegment {
    fn new(start: [f64; 2], end: [f64; 2], width: f64) -> Self {
        Self {
            start,
            end,
            opacity: INITIAL_OPACITY,
            width,
            color: palette::NEUTRAL,
            active: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    pub label: &'static str,
    pub x: f64,
    pub ys: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NetworkLayout {
    pub layers: Vec<Layer>,
    pub node_color: Rgb,
    pub label_y: f64,
}

impl NetworkLayout {
    fn new() -> Self {
        let layers = LAYER_SIZES
            .iter()
            .zip(LAYER_X)
            .zip(LAYER_LABELS)
            .map(|((&count, x), label)| Layer {
                label,
                x,
                ys: node_positions(count),
            })
            .collect();
        Self {
            layers,
            node_color: palette::NODE,
            label_y: LAYER_LABEL_Y,
        }
    }

    /// Every node centre, layer by layer.
    pub fn nodes(&self) -> impl Iterator<Item = [f64; 2]> + '_ {
        self.layers
            .iter()
            .flat_map(|layer| layer.ys.iter().map(move |&y| [layer.x, y]))
    }

    /// Fully connect adjacent layers, source-major order.
    fn connect(&self) -> Vec<ConnectionSegment> {
        let mut segments = Vec::with_capacity(SEGMENT_COUNT);
        for (i, pair) in self.layers.windows(2).enumerate() {
            let width = if i == 0 { INPUT_HIDDEN_WIDTH } else { HIDDEN_OUTPUT_WIDTH };
            let (src, dst) = (&pair[0], &pair[1]);
            for &ys in &src.ys {
                for &yd in &dst.ys {
                    segments.push(ConnectionSegment::new([src.x, ys], [dst.x, yd], width));
                }
            }
        }
        segments
    }
}

/// Evenly spaced in [0.2, 0.8]; a lone node sits at the centre.
fn node_positions(count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![0.5],
        _ => {
            let step = 0.6 / (count - 1) as f64;
            (0..count).map(|i| 0.2 + step * i as f64).collect()
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LegendCorner {
    UpperRight,
    LowerRight,
}

/// A curve whose data is fixed but only a prefix of it is shown.
#[derive(Clone, Debug, PartialEq)]
pub struct LineSeries {
    pub label: &'static str,
    pub color: Rgb,
    points: Vec<[f64; 2]>,
    visible: usize,
}

impl LineSeries {
    fn new(epochs: &[usize], curve: &MetricCurve, color: Rgb) -> Self {
        let points = epochs
            .iter()
            .zip(&curve.values)
            .map(|(&e, &v)| [e as f64, v])
            .collect();
        Self {
            label: curve.kind.label(),
            color,
            points,
            visible: 0,
        }
    }

    pub fn visible_points(&self) -> &[[f64; 2]] {
        &self.points[..self.visible]
    }

    pub fn visible_len(&self) -> usize {
        self.visible
    }

    pub fn point(&self, index: usize) -> [f64; 2] {
        self.points[index]
    }

    pub(crate) fn reveal(&mut self, count: usize) {
        self.visible = count.min(self.points.len());
    }
}

/// Loss or accuracy chart: fixed axes, two series and a current-epoch marker.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartPanel {
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub legend: LegendCorner,
    pub train: LineSeries,
    pub val: LineSeries,
    pub marker: Option<[f64; 2]>,
    pub marker_color: Rgb,
}

impl ChartPanel {
    pub fn series(&self) -> [&LineSeries; 2] {
        [&self.train, &self.val]
    }

    pub(crate) fn clear(&mut self) {
        self.train.reveal(0);
        self.val.reveal(0);
        self.marker = None;
    }
}

/// Everything drawable, plus the frame pointer.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    pub title: &'static str,
    pub network: NetworkLayout,
    pub segments: Vec<ConnectionSegment>,
    pub loss: ChartPanel,
    pub accuracy: ChartPanel,
    n_epochs: usize,
    current_frame: Option<usize>,
}

impl Scene {
    /// Build the static scene from generated curves. Each call returns an
    /// independent scene.
    pub fn build(curves: &TrainingCurves) -> Self {
        let n = curves.n_epochs();
        let x_range = (0.0, n.saturating_sub(1) as f64);
        let epochs = &curves.epochs;

        let loss_top = curves.train_loss.first().max(curves.val_loss.first()) * 1.1;
        let loss = ChartPanel {
            title: "Loss vs Epoch",
            x_label: "Epoch",
            y_label: "Loss",
            x_range,
            y_range: (0.0, loss_top),
            legend: LegendCorner::UpperRight,
            train: LineSeries::new(epochs, &curves.train_loss, palette::TRAIN_LOSS),
            val: LineSeries::new(epochs, &curves.val_loss, palette::VAL_LOSS),
            marker: None,
            marker_color: palette::MARKER,
        };
        let accuracy = ChartPanel {
            title: "Accuracy vs Epoch",
            x_label: "Epoch",
            y_label: "Accuracy",
            x_range,
            y_range: ACCURACY_Y_RANGE,
            legend: LegendCorner::LowerRight,
            train: LineSeries::new(epochs, &curves.train_acc, palette::TRAIN_ACC),
            val: LineSeries::new(epochs, &curves.val_acc, palette::VAL_ACC),
            marker: None,
            marker_color: palette::MARKER,
        };

        let network = NetworkLayout::new();
        let segments = network.connect();

        Self {
            title: FIGURE_TITLE,
            network,
            segments,
            loss,
            accuracy,
            n_epochs: n,
            current_frame: None,
        }
    }

    pub fn n_epochs(&self) -> usize {
        self.n_epochs
    }

    pub fn current_frame(&self) -> Option<usize> {
        self.current_frame
    }

    pub(crate) fn set_current_frame(&mut self, frame: usize) {
        self.current_frame = Some(frame);
    }

    /// Pre-roll state: empty charts, hidden markers, faint connections.
    pub fn reset(&mut self) {
        self.loss.clear();
        self.accuracy.clear();
        for seg in &mut self.segments {
            seg.opacity = RESET_OPACITY;
            seg.active = false;
        }
        self.current_frame = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::generate_training_curves;
    use anyhow::Result;

    #[test]
    fn test_segment_layout() -> Result<()> {
        let scene = Scene::build(&generate_training_curves(10, 42)?);
        assert_eq!(SEGMENT_COUNT, 25);
        assert_eq!(scene.segments.len(), SEGMENT_COUNT);

        let (in_hidden, hidden_out) = scene.segments.split_at(20);
        assert!(in_hidden.iter().all(|s| s.start[0] == 0.1 && s.end[0] == 0.5));
        assert!(in_hidden.iter().all(|s| s.width == 1.2));
        assert!(hidden_out.iter().all(|s| s.start[0] == 0.5 && s.end == [0.9, 0.5]));
        assert!(hidden_out.iter().all(|s| s.width == 1.4));
        assert!(scene.segments.iter().all(|s| s.opacity == INITIAL_OPACITY && !s.active));

        // Source-major order: first input node fans out to every hidden node
        assert_eq!(scene.segments[0].start, [0.1, 0.2]);
        assert_eq!(scene.segments[0].end, [0.5, 0.2]);
        assert_eq!(scene.segments[4].end, [0.5, 0.8]);
        assert!((scene.segments[5].start[1] - 0.4).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn test_node_positions() {
        assert_eq!(node_positions(1), vec![0.5]);
        let hidden = node_positions(5);
        let expected = [0.2, 0.35, 0.5, 0.65, 0.8];
        for (a, b) in hidden.iter().zip(expected) {
            assert!((a - b).abs() < 1e-12);
        }
        let input = node_positions(4);
        assert!((input[3] - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_chart_ranges() -> Result<()> {
        let curves = generate_training_curves(120, 42)?;
        let scene = Scene::build(&curves);
        let top = curves.train_loss.first().max(curves.val_loss.first()) * 1.1;

        assert_eq!(scene.loss.x_range, (0.0, 119.0));
        assert_eq!(scene.loss.y_range, (0.0, top));
        assert_eq!(scene.accuracy.y_range, (0.4, 1.0));
        assert_eq!(scene.loss.legend, LegendCorner::UpperRight);
        assert_eq!(scene.accuracy.legend, LegendCorner::LowerRight);
        assert_eq!(scene.loss.train.label, "Train loss");
        assert_eq!(scene.accuracy.val.label, "Val acc");
        Ok(())
    }

    #[test]
    fn test_build_is_idempotent() -> Result<()> {
        let curves = generate_training_curves(30, 42)?;
        assert_eq!(Scene::build(&curves), Scene::build(&curves));
        Ok(())
    }

    #[test]
    fn test_starts_empty() -> Result<()> {
        let scene = Scene::build(&generate_training_curves(30, 42)?);
        assert!(scene.loss.series().iter().all(|s| s.visible_points().is_empty()));
        assert!(scene.loss.marker.is_none());
        assert_eq!(scene.current_frame(), None);
        assert_eq!(scene.network.nodes().count(), 10);
        Ok(())
    }
}
