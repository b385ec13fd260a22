//! Video export through an external encoder
//!
//! Frames are rendered offscreen and streamed as raw RGB24 on the encoder's
//! stdin, so a missing encoder is detected before any frame is drawn.

pub mod raster;

use std::fs::{self, File};
use std::io::{BufWriter, Read, Seek, SeekFrom, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command, Stdio};

use anyhow::{bail, Context, Result};
use image::RgbImage;
use tracing::{debug, info};

use crate::config::AnimationConfig;
use nn_anim_core::{render_sequence, FrameSink, FrameState, Scene};

/// Encoder command line for raw RGB24 frames on stdin.
pub fn encoder_args(config: &AnimationConfig) -> Vec<String> {
    let (width, height) = config.frame_size();
    let mut args: Vec<String> = [
        "-hide_banner",
        "-loglevel",
        "error",
        "-y",
        "-f",
        "rawvideo",
        "-pix_fmt",
        "rgb24",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    args.extend([
        "-s".to_string(),
        format!("{}x{}", width, height),
        "-r".to_string(),
        config.fps().to_string(),
        "-i".to_string(),
        "-".to_string(),
        "-c:v".to_string(),
        "libx264".to_string(),
        "-pix_fmt".to_string(),
        "yuv420p".to_string(),
        "-b:v".to_string(),
        format!("{}k", config.bitrate_kbps),
    ]);
    args.push(config.output.to_string_lossy().into_owned());
    args
}

/// Child encoder process. Its stderr goes to an anonymous temp file so a
/// chatty encoder can never block on a full pipe while we stream frames.
struct EncoderProcess {
    program: String,
    child: Child,
    stdin: Option<BufWriter<ChildStdin>>,
    stderr_log: File,
}

impl EncoderProcess {
    fn spawn(program: &str, args: &[String]) -> Result<Self> {
        debug!("$ {} {}", program, args.join(" "));
        let stderr_log = tempfile::tempfile().context("failed to create encoder log file")?;

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::from(stderr_log.try_clone()?))
            .spawn()
            .with_context(|| format!("failed to launch video encoder `{}`", program))?;
        let stdin = child
            .stdin
            .take()
            .context("video encoder stdin is not available")?;

        Ok(Self {
            program: program.to_string(),
            child,
            stdin: Some(BufWriter::new(stdin)),
            stderr_log,
        })
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        let stdin = self
            .stdin
            .as_mut()
            .context("video encoder input already closed")?;
        stdin
            .write_all(bytes)
            .with_context(|| format!("failed to stream to `{}`", self.program))
    }

    fn stderr_text(&mut self) -> String {
        let mut text = String::new();
        if self.stderr_log.seek(SeekFrom::Start(0)).is_ok() {
            let _ = self.stderr_log.read_to_string(&mut text);
        }
        text.trim().to_string()
    }

    /// Close stdin and wait; a non-zero exit carries the encoder's stderr.
    fn wait(mut self) -> Result<()> {
        if let Some(mut stdin) = self.stdin.take() {
            stdin
                .flush()
                .with_context(|| format!("failed to flush frames to `{}`", self.program))?;
        }
        let status = self
            .child
            .wait()
            .with_context(|| format!("failed to wait for `{}`", self.program))?;
        if !status.success() {
            let stderr = self.stderr_text();
            bail!("`{}` exited with {}: {}", self.program, status, stderr);
        }
        Ok(())
    }

    /// Kill the encoder and return whatever it reported.
    fn kill(mut self) -> String {
        drop(self.stdin.take());
        let _ = self.child.kill();
        let _ = self.child.wait();
        self.stderr_text()
    }
}

/// A running encoder fed one frame per `present`.
pub struct VideoEncoder {
    process: EncoderProcess,
    canvas: RgbImage,
    scale: f64,
    output: PathBuf,
}

impl VideoEncoder {
    pub fn spawn(config: &AnimationConfig) -> Result<Self> {
        if let Some(parent) = config.output.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create output directory {:?}", parent))?;
            }
        }

        let process = EncoderProcess::spawn(&config.encoder, &encoder_args(config))?;
        let (width, height) = config.frame_size();
        Ok(Self {
            process,
            canvas: RgbImage::new(width, height),
            scale: config.point_scale(),
            output: config.output.clone(),
        })
    }

    /// Close the stream and wait for the encoder to finish the file.
    pub fn finish(self) -> Result<PathBuf> {
        self.process.wait()?;
        Ok(self.output)
    }

    /// Stop the encoder after a failed frame, attaching whatever it reported.
    fn abort(self, err: anyhow::Error) -> anyhow::Error {
        let program = self.process.program.clone();
        let reported = self.process.kill();
        if reported.is_empty() {
            err
        } else {
            err.context(format!("`{}` reported: {}", program, reported))
        }
    }
}

impl FrameSink for VideoEncoder {
    fn present(&mut self, scene: &Scene, state: &FrameState) -> Result<()> {
        raster::draw_frame(scene, &mut self.canvas, self.scale)
            .with_context(|| format!("failed to render frame {}", state.frame))?;
        self.process
            .write_all(self.canvas.as_raw())
            .with_context(|| format!("failed to stream frame {}", state.frame))?;
        if state.frame % 20 == 0 {
            debug!(frame = state.frame, k_active = state.k_active, "frame encoded");
        }
        Ok(())
    }
}

/// Render every frame of `scene` into `config.output`.
pub fn export_animation(scene: &mut Scene, config: &AnimationConfig) -> Result<PathBuf> {
    let (width, height) = config.frame_size();
    info!(
        output = %config.output.display(),
        width,
        height,
        fps = config.fps(),
        bitrate_kbps = config.bitrate_kbps,
        "Exporting animation"
    );

    let mut encoder = VideoEncoder::spawn(config)?;
    match render_sequence(scene, &mut encoder) {
        Ok(frames) => {
            let path = encoder.finish()?;
            info!(frames, path = %path.display(), "Export complete");
            Ok(path)
        }
        Err(err) => Err(encoder.abort(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nn_anim_core::generate_training_curves;

    #[test]
    fn test_encoder_args() {
        let config = AnimationConfig::default();
        let args = encoder_args(&config);
        let joined = args.join(" ");

        assert!(joined.contains("-f rawvideo -pix_fmt rgb24"));
        assert!(joined.contains("-s 1500x900"));
        assert!(joined.contains("-r 12.5"));
        assert!(joined.contains("-i -"));
        assert!(joined.contains("-b:v 2400k"));
        assert_eq!(args.last().map(String::as_str), Some("nn_training_animation.mp4"));
    }

    #[cfg(unix)]
    #[test]
    fn test_noisy_encoder_does_not_block_streaming() -> Result<()> {
        // Writes ~200 KiB of errors before reading any input, then fails
        let script = "head -c 200000 /dev/zero | tr '\\0' e >&2; cat > /dev/null; exit 3";
        let args = vec!["-c".to_string(), script.to_string()];
        let mut process = EncoderProcess::spawn("sh", &args)?;

        let frame = vec![0u8; 1 << 20];
        for _ in 0..4 {
            process.write_all(&frame)?;
        }

        let err = process.wait().unwrap_err().to_string();
        assert!(err.contains("exited with"), "{}", err);
        assert!(err.contains("eeee"), "stderr not captured: {}", &err[..err.len().min(200)]);
        Ok(())
    }

    #[test]
    fn test_missing_encoder_fails_before_rendering() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let config = AnimationConfig {
            n_epochs: 5,
            output: dir.path().join("out.mp4"),
            encoder: "nn-anim-encoder-that-does-not-exist".to_string(),
            ..Default::default()
        };
        let mut scene = Scene::build(&generate_training_curves(config.n_epochs, config.seed)?);

        let err = export_animation(&mut scene, &config).unwrap_err();
        assert!(format!("{:#}", err).contains("failed to launch video encoder"));
        assert_eq!(scene.current_frame(), None);
        assert!(!config.output.exists());
        Ok(())
    }
}
