//! Playback drivers
//!
//! Interactive mode asks `Playback` which frame is due on each repaint;
//! export pushes every frame through a `FrameSink` synchronously.

use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::debug;

use crate::frame::{apply_frame, FrameState};
use crate::scene::Scene;

/// Receives each frame once the scene has been updated for it.
pub trait FrameSink {
    fn present(&mut self, scene: &Scene, state: &FrameState) -> Result<()>;
}

/// Apply every frame `0..N` in order and hand it to `sink`.
/// Stops at the first sink error. Returns the number of frames presented.
pub fn render_sequence<S: FrameSink + ?Sized>(scene: &mut Scene, sink: &mut S) -> Result<usize> {
    let n = scene.n_epochs();
    for frame in 0..n {
        let state = apply_frame(scene, frame);
        sink.present(scene, &state)?;
    }
    debug!(frames = n, "frame sequence rendered");
    Ok(n)
}

/// Fixed-interval frame clock. Plays each frame once, then holds.
#[derive(Debug, Clone)]
pub struct Playback {
    n_frames: usize,
    interval: Duration,
    next_frame: usize,
    last_tick: Option<Instant>,
}

impl Playback {
    pub fn new(n_frames: usize, interval: Duration) -> Self {
        Self {
            n_frames,
            interval,
            next_frame: 0,
            last_tick: None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.next_frame >= self.n_frames
    }

    /// Frame to apply at `now`, if one is due. The first call is always due.
    pub fn poll(&mut self, now: Instant) -> Option<usize> {
        if self.is_finished() {
            return None;
        }
        let due = match self.last_tick {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        };
        if !due {
            return None;
        }
        let frame = self.next_frame;
        self.next_frame += 1;
        self.last_tick = Some(now);
        Some(frame)
    }

    /// How long until the next frame is due; `None` once playback is done.
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        if self.is_finished() {
            return None;
        }
        Some(match self.last_tick {
            None => Duration::ZERO,
            Some(last) => self
                .interval
                .saturating_sub(now.saturating_duration_since(last)),
        })
    }
}
