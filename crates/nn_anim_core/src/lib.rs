//! Neural Network Training Animation Core
//!
//! Synthetic training curves, the schematic/chart scene model and the per-frame
//! update logic. No rendering backend lives here: the display and export
//! frontends read the `Scene` after every `apply_frame`.

pub mod curves;
pub mod frame;
pub mod palette;
pub mod playback;
pub mod scene;

pub use curves::{generate_training_curves, CurveKind, MetricCurve, TrainingCurves};
pub use frame::{apply_frame, FrameState};
pub use palette::Rgb;
pub use playback::{render_sequence, FrameSink, Playback};
pub use scene::{ChartPanel, ConnectionSegment, LegendCorner, LineSeries, NetworkLayout, Scene};
