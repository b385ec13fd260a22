//! Interactive playback window

pub mod graph;
pub mod network;

use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use eframe::egui;
use tracing::{debug, info};

use crate::config::AnimationConfig;
use nn_anim_core::scene::NETWORK_HEIGHT_SHARE;
use nn_anim_core::{apply_frame, Playback, Rgb, Scene};

pub(crate) fn color32(rgb: Rgb, opacity: f64) -> egui::Color32 {
    let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    egui::Color32::from_rgba_unmultiplied(rgb.0, rgb.1, rgb.2, alpha)
}

pub struct AnimationApp {
    scene: Scene,
    playback: Playback,
}

impl AnimationApp {
    pub fn new(mut scene: Scene, interval: Duration) -> Self {
        scene.reset();
        let playback = Playback::new(scene.n_epochs(), interval);
        Self { scene, playback }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Apply the frame due at `now`; returns when to repaint next.
    pub fn tick(&mut self, now: Instant) -> Option<Duration> {
        if let Some(frame) = self.playback.poll(now) {
            let state = apply_frame(&mut self.scene, frame);
            if frame % 20 == 0 {
                debug!(frame, progress = state.progress, k_active = state.k_active, "frame");
            }
            if self.playback.is_finished() {
                info!("Playback finished, holding final frame.");
            }
        }
        self.playback.time_until_next(now)
    }
}

impl eframe::App for AnimationApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(wait) = self.tick(Instant::now()) {
            ctx.request_repaint_after(wait);
        }

        egui::TopBottomPanel::top("figure_title").show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading(egui::RichText::new(self.scene.title).strong());
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            let network_height = available.y * NETWORK_HEIGHT_SHARE as f32;
            network::show(ui, &self.scene, egui::vec2(available.x, network_height));

            ui.columns(2, |columns| {
                graph::show(&mut columns[0], "loss_plot", &self.scene.loss);
                graph::show(&mut columns[1], "accuracy_plot", &self.scene.accuracy);
            });
        });
    }
}

/// Open the window and play the scene once. Blocks until the window closes.
pub fn run(scene: Scene, config: &AnimationConfig) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size())
            .with_title(scene.title),
        ..Default::default()
    };

    info!(frames = scene.n_epochs(), interval_ms = config.interval_ms, "Opening animation window");
    let app = AnimationApp::new(scene, Duration::from_millis(config.interval_ms));

    eframe::run_native(
        "nn_training_anim",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::light());
            Box::new(app)
        }),
    )
    .map_err(|e| anyhow!("display window failed: {}", e))
}
