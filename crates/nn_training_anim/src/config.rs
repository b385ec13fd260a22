//! Animation Configuration
//!
//! The numeric parameters plus export constants. Built in code only; nothing
//! is read from or written to disk.

use std::path::PathBuf;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AnimationConfig {
    pub n_epochs: usize,
    pub seed: u64,
    /// Delay between frames, both on screen and as the video frame rate.
    pub interval_ms: u64,
    // Export
    pub output: PathBuf,
    pub dpi: u32,
    pub bitrate_kbps: u32,
    pub figure_inches: [f64; 2],
    pub encoder: String,
    // Display
    pub window_dpi: u32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            n_epochs: 120,
            seed: nn_anim_core::curves::DEFAULT_SEED,
            interval_ms: 80,
            output: PathBuf::from("nn_training_animation.mp4"),
            dpi: 150,
            bitrate_kbps: 2400,
            figure_inches: [10.0, 6.0],
            encoder: "ffmpeg".to_string(),
            window_dpi: 120,
        }
    }
}

impl AnimationConfig {
    /// Reject anything that would fail later, before a window or encoder exists.
    pub fn validate(&self) -> Result<()> {
        if self.n_epochs == 0 {
            bail!("n_epochs must be positive, got {}", self.n_epochs);
        }
        if self.interval_ms == 0 {
            bail!("interval_ms must be positive");
        }
        if self.dpi == 0 || self.window_dpi == 0 {
            bail!("dpi must be positive");
        }
        if self.bitrate_kbps == 0 {
            bail!("bitrate_kbps must be positive");
        }
        if !self.figure_inches.iter().all(|v| v.is_finite() && *v > 0.0) {
            bail!("figure size must be positive, got {:?}", self.figure_inches);
        }
        let (w, h) = self.frame_size();
        // yuv420p needs even dimensions
        if w % 2 != 0 || h % 2 != 0 {
            bail!("frame size {}x{} must be even in both dimensions", w, h);
        }
        Ok(())
    }

    /// Export frame size in pixels.
    pub fn frame_size(&self) -> (u32, u32) {
        Self::pixels(self.figure_inches, self.dpi)
    }

    /// Logical window size for the interactive display.
    pub fn window_size(&self) -> [f32; 2] {
        let (w, h) = Self::pixels(self.figure_inches, self.window_dpi);
        [w as f32, h as f32]
    }

    pub fn fps(&self) -> f64 {
        1000.0 / self.interval_ms as f64
    }

    /// Pixels per typographic point in exported frames.
    pub fn point_scale(&self) -> f64 {
        f64::from(self.dpi) / 72.0
    }

    fn pixels(inches: [f64; 2], dpi: u32) -> (u32, u32) {
        let px = |v: f64| (v * f64::from(dpi)).round() as u32;
        (px(inches[0]), px(inches[1]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() -> Result<()> {
        let config = AnimationConfig::default();
        config.validate()?;
        assert_eq!(config.frame_size(), (1500, 900));
        assert_eq!(config.window_size(), [1200.0, 720.0]);
        assert_eq!(config.fps(), 12.5);
        assert_eq!(config.output, PathBuf::from("nn_training_animation.mp4"));
        Ok(())
    }

    #[test]
    fn test_rejects_bad_parameters() {
        let cases = [
            AnimationConfig { n_epochs: 0, ..Default::default() },
            AnimationConfig { interval_ms: 0, ..Default::default() },
            AnimationConfig { bitrate_kbps: 0, ..Default::default() },
            AnimationConfig { figure_inches: [10.0, -1.0], ..Default::default() },
            AnimationConfig { figure_inches: [10.1, 6.0], ..Default::default() },
        ];
        for config in cases {
            assert!(config.validate().is_err(), "{:?} should be rejected", config);
        }
    }

    #[test]
    fn test_partial_json_uses_defaults() -> Result<()> {
        let config: AnimationConfig = serde_json::from_str(r#"{"n_epochs": 30, "seed": 7}"#)?;
        assert_eq!(config.n_epochs, 30);
        assert_eq!(config.seed, 7);
        assert_eq!(config.dpi, 150);
        Ok(())
    }
}
