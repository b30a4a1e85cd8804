//! Tracing setup for the probe binary
//!
//! - JSON formatted logs to `./logs/ravenlink.log`, rotated daily or at 10MB
//! - Human-readable console output

use anyhow::Result;
use rolling_file::{RollingConditionBasic, RollingFileAppender};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber
///
/// Returns a guard that must be kept alive to ensure logs are flushed
pub fn init_telemetry() -> Result<WorkerGuard> {
    let log_dir = Path::new("./logs");
    std::fs::create_dir_all(log_dir)?;

    let file_appender = RollingFileAppender::new(
        log_dir.join("ravenlink.log"),
        RollingConditionBasic::new()
            .daily()
            .max_size(10 * 1024 * 1024),
        9,
    )?;

    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("ravenlink=debug,ravenlink_rs=debug,ravenlink_core=debug")
    });

    let file_layer = fmt::layer()
        .json()
        .with_writer(non_blocking_file)
        .with_current_span(true)
        .with_target(true)
        .with_thread_ids(true);

    let console_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()?;

    tracing::debug!("Telemetry initialized with file logging to {:?}", log_dir);

    Ok(guard)
}
