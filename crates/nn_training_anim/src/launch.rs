//! Wires curves, scene and the selected frontend together.

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::cli::Mode;
use crate::config::AnimationConfig;
use crate::{export, gui};
use nn_anim_core::{generate_training_curves, Scene};

/// Validate parameters and build the static scene. Nothing is opened yet.
pub fn prepare(config: &AnimationConfig) -> Result<Scene> {
    config.validate()?;
    debug!(config = %serde_json::to_string(config)?, "Configuration");

    let curves = generate_training_curves(config.n_epochs, config.seed)?;
    let scene = Scene::build(&curves);
    info!(
        n_epochs = scene.n_epochs(),
        segments = scene.segments.len(),
        seed = config.seed,
        "Scene built"
    );
    Ok(scene)
}

pub fn run(mode: Mode, config: &AnimationConfig) -> Result<()> {
    let scene = prepare(config)?;

    match mode {
        Mode::Display => gui::run(scene, config),
        Mode::Save => save_or_fallback(scene, config, |scene| gui::run(scene, config)),
    }
}

/// Export the animation; if that fails, warn and hand the scene to `display`.
pub fn save_or_fallback<F>(mut scene: Scene, config: &AnimationConfig, display: F) -> Result<()>
where
    F: FnOnce(Scene) -> Result<()>,
{
    println!(
        "[INFO] Saving animation to {:?} (requires {} installed)...",
        config.output, config.encoder
    );
    match export::export_animation(&mut scene, config) {
        Ok(_) => {
            println!("[INFO] Done.");
            Ok(())
        }
        Err(e) => {
            warn!("Export failed, falling back to interactive display: {:#}", e);
            println!("[WARN] Could not save MP4: {:#}", e);
            println!("       You can still view the animation interactively.");
            display(scene)
        }
    }
}
