//! Logger setup for frame replay tools.
//!
//! Detectors only emit through the `log` macros. A replay binary installs
//! either [`init_with_level`] / [`init_from_env`] (plain stderr lines) or,
//! with the `tracing` feature, [`init_tracing`] for per-stage span timings.
//!
//! Stderr lines look like `[  0.012s DEBUG goals::detector] 2 goals`: the
//! `fieldvision_` crate prefix is dropped from the target.

use std::io::Write;
use std::str::FromStr;
use std::sync::OnceLock;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable read by [`init_from_env`].
pub const LOG_LEVEL_ENV: &str = "FIELDVISION_LOG";

struct FrameLogger {
    level: LevelFilter,
    started: Instant,
}

impl Log for FrameLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!(
            "[{:7.3}s {:>5} {}] {}",
            self.started.elapsed().as_secs_f64(),
            record.level(),
            short_target(record.target()),
            record.args()
        );
        let _ = writeln!(std::io::stderr().lock(), "{line}");
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<FrameLogger> = OnceLock::new();

fn short_target(target: &str) -> &str {
    target.strip_prefix("fieldvision_").unwrap_or(target)
}

/// Level named by `value` (`"debug"`, `"TRACE"`, `"off"`, ...), or `default`
/// when unset or unparsable.
fn parse_level(value: Option<&str>, default: LevelFilter) -> LevelFilter {
    value
        .and_then(|v| LevelFilter::from_str(v.trim()).ok())
        .unwrap_or(default)
}

/// Install the stderr logger at `level`.
///
/// Only the first call installs anything; later calls keep the first level.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_some() {
        return Ok(());
    }
    let logger = LOGGER.get_or_init(|| FrameLogger {
        level,
        started: Instant::now(),
    });
    log::set_logger(logger)?;
    log::set_max_level(logger.level);
    Ok(())
}

/// [`init_with_level`] with the level taken from [`LOG_LEVEL_ENV`].
pub fn init_from_env(default: LevelFilter) -> Result<LevelFilter, log::SetLoggerError> {
    let level = parse_level(std::env::var(LOG_LEVEL_ENV).ok().as_deref(), default);
    init_with_level(level)?;
    Ok(level)
}

/// Output format of [`init_tracing`].
#[cfg(feature = "tracing")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TracingFormat {
    /// Human readable, uptime-stamped lines.
    Text,
    /// One flattened JSON object per event, for offline frame timing analysis.
    Json,
}

/// Install a `tracing` subscriber that reports the detector stage spans on close.
///
/// The filter comes from `RUST_LOG`, falling back to `fieldvision=info` style
/// directives for every workspace crate.
#[cfg(feature = "tracing")]
pub fn init_tracing(format: TracingFormat) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(
            "fieldvision=info,fieldvision_core=info,fieldvision_lines=info,fieldvision_goals=info",
        )
    });
    let builder = fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(true);
    match format {
        TracingFormat::Json => builder.json().flatten_event(true).finish().try_init(),
        TracingFormat::Text => builder
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init(),
    }
}
