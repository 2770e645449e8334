//! File-based logging
//!
//! Logging goes to a file rather than stdout because the TUI owns the
//! terminal. Events emitted by the player core land here too, through the
//! tracing sink installed on the event bus.

use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

const LOG_DIR: &str = ".logs";
const LOG_FILE_PREFIX: &str = "vidsync-rs";

/// Initialize the logging system.
///
/// Logs are written to `.logs/vidsync-rs.YYYY-MM-DD.log` with daily
/// rotation. The log level can be controlled via the `RUST_LOG`
/// environment variable; player modules default to DEBUG, everything else
/// to WARN.
pub fn init_logging() -> anyhow::Result<()> {
    let log_dir = Path::new(LOG_DIR);
    if !log_dir.exists() {
        std::fs::create_dir_all(log_dir)?;
    }

    let file_appender = RollingFileAppender::new(Rotation::DAILY, LOG_DIR, LOG_FILE_PREFIX);

    // Non-blocking writer so logging never stalls the event loop.
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // The guard must outlive the application; leak it instead of storing
    // it somewhere it could be dropped early.
    Box::leak(Box::new(guard));

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("vidsync_rs=debug,warn"));

    let fmt_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Logging initialized - logs written to {}/", LOG_DIR);

    Ok(())
}
