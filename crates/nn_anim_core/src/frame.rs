//! Frame Updater - maps a frame index onto the scene's display state
//!
//! Frame `f` reveals curve data for epochs `0..=f` and highlights an evenly
//! sampled subset of the schematic's connections whose size and intensity
//! grow with training progress.

use crate::palette;
use crate::scene::Scene;

pub const IDLE_OPACITY: f64 = 0.08;
pub const IDLE_WIDTH: f64 = 1.0;

/// What `apply_frame` changed, for logging and tests.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameState {
    pub frame: usize,
    pub progress: f64,
    pub k_active: usize,
    /// Sampled segment indices. May repeat when `k_active` is small.
    pub active_indices: Vec<usize>,
}

impl FrameState {
    /// Number of different segments actually highlighted.
    pub fn distinct_active(&self) -> usize {
        let mut idx = self.active_indices.clone();
        idx.dedup();
        idx.len()
    }
}

/// Normalized position of `frame` in `[0, 1]`.
pub fn progress(frame: usize, n_frames: usize) -> f64 {
    frame as f64 / n_frames.saturating_sub(1).max(1) as f64
}

/// `floor(progress * total)`, never below one.
pub fn active_count(progress: f64, total: usize) -> usize {
    ((progress * total as f64) as usize).clamp(1, total.max(1))
}

/// `k` points spread evenly over `[0, total - 1]`, truncated to integers.
///
/// Sample `i` is `i * step` with the last pinned to `total - 1`; truncation can
/// map neighbouring samples onto the same index.
pub fn active_indices(k: usize, total: usize) -> Vec<usize> {
    let last = total.saturating_sub(1);
    if k <= 1 {
        return vec![0; k];
    }
    let step = last as f64 / (k - 1) as f64;
    (0..k)
        .map(|i| if i == k - 1 { last } else { (i as f64 * step) as usize })
        .collect()
}

pub fn active_opacity(progress: f64) -> f64 {
    0.4 + 0.4 * progress
}

pub fn active_width(progress: f64) -> f64 {
    1.4 + 0.8 * progress
}

/// Overwrite every dynamic element of `scene` for `frame`.
///
/// # Panics
/// If `frame >= scene.n_epochs()`; the drivers never produce such a frame.
pub fn apply_frame(scene: &mut Scene, frame: usize) -> FrameState {
    let n = scene.n_epochs();
    assert!(frame < n, "frame {} out of range for {} epochs", frame, n);

    for panel in [&mut scene.loss, &mut scene.accuracy] {
        panel.train.reveal(frame + 1);
        panel.val.reveal(frame + 1);
        panel.marker = Some(panel.train.point(frame));
    }

    let total = scene.segments.len();
    let progress = progress(frame, n);
    let k_active = active_count(progress, total);
    let active_indices = active_indices(k_active, total);

    for (i, seg) in scene.segments.iter_mut().enumerate() {
        if active_indices.contains(&i) {
            seg.opacity = active_opacity(progress);
            seg.width = active_width(progress);
            seg.color = palette::ACTIVE;
            seg.active = true;
        } else {
            seg.opacity = IDLE_OPACITY;
            seg.width = IDLE_WIDTH;
            seg.color = palette::NEUTRAL;
            seg.active = false;
        }
    }
    scene.set_current_frame(frame);

    FrameState {
        frame,
        progress,
        k_active,
        active_indices,
    }
}
