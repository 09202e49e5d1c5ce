use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::ServiceConfig;

const LOG_FILE_NAME: &str = "treefs.log";

/// Flushes buffered log lines when dropped; keep it for the life of the process.
pub(crate) struct LogGuards {
    _guards: Vec<WorkerGuard>,
}

/// `RUST_LOG` wins, the configured level is the default.
fn env_filter(level: tracing::Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy()
}

/// Install the global subscriber: compact stdout, plus a daily rolling
///  file when a log directory is configured. Also hooks panics into the
///  log and records what build is starting.
pub(crate) fn init(config: &ServiceConfig) -> anyhow::Result<LogGuards> {
    let (stdout, stdout_guard) = tracing_appender::non_blocking(std::io::stdout());
    let mut guards = vec![stdout_guard];

    let stdout_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(stdout)
        .with_filter(env_filter(config.log_level));

    let file_layer = match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            guards.push(guard);
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_span_events(FmtSpan::CLOSE)
                    .with_filter(env_filter(config.log_level)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .context("installing the tracing subscriber")?;

    log_panics();

    let build = common::prelude::build_info();
    tracing::info!(
        version = build.version,
        build_profile = build.build_profile,
        target = build.target,
        storage = ?config.storage,
        "treefs starting"
    );

    Ok(LogGuards { _guards: guards })
}

fn log_panics() {
    std::panic::set_hook(Box::new(|panic| match panic.location() {
        Some(loc) => tracing::error!(
            message = %panic,
            panic.file = loc.file(),
            panic.line = loc.line(),
            panic.column = loc.column(),
        ),
        None => tracing::error!(message = %panic),
    }));
}
