use anyhow::Result;
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use nn_training_anim::cli::Cli;
use nn_training_anim::config::AnimationConfig;
use nn_training_anim::launch;

/// Console plus a daily log file under `logs/`. Keep the guard alive until exit.
fn init_logging() -> WorkerGuard {
    let file_appender = tracing_appender::rolling::daily("logs", "nn_training_anim.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false),
        )
        .init();
    guard
}

fn install_panic_hook() {
    std::panic::set_hook(Box::new(|panic_info| {
        let payload = panic_info.payload();
        let msg = payload
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
            .unwrap_or("unknown panic");
        let location = panic_info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_default();

        tracing::error!(target: "panic", "panicked at {}: {}", location, msg);
        eprintln!("panicked at {}: {}", location, msg);
    }));
}

fn main() -> Result<()> {
    let _log_guard = init_logging();
    install_panic_hook();

    let mode = Cli::parse().mode();
    tracing::info!(?mode, "nn_training_anim started");

    launch::run(mode, &AnimationConfig::default())
}
