// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Telemetry initialization and configuration.

use std::io;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Shape of each log line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// One short line per event.
    #[default]
    Compact,
    /// Module path, source location and span timings.
    Full,
}

/// How the stderr log subscriber is set up.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Level used when RUST_LOG is not set.
    pub default_level: Level,
    pub format: LogFormat,
    /// Disable when stderr is not a terminal.
    pub ansi_colors: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            default_level: Level::WARN,
            format: LogFormat::Compact,
            ansi_colors: true,
        }
    }
}

impl TelemetryConfig {
    pub fn with_level(mut self, level: Level) -> Self {
        self.default_level = level;
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi_colors = ansi;
        self
    }

    fn span_events(&self) -> FmtSpan {
        match self.format {
            LogFormat::Compact => FmtSpan::NONE,
            LogFormat::Full => FmtSpan::CLOSE,
        }
    }
}

/// Parse a level name such as `"debug"` or `"WARN"`.
pub fn parse_level(name: &str) -> Option<Level> {
    name.trim().parse().ok()
}

/// Install the global tracing subscriber, writing to stderr.
///
/// Call once at startup. `RUST_LOG` takes precedence over `default_level`.
pub fn init_telemetry(config: &TelemetryConfig) -> io::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_level.to_string()));
    let full = config.format == LogFormat::Full;

    let fmt_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(config.ansi_colors)
        .with_target(full)
        .with_file(full)
        .with_line_number(full)
        .with_span_events(config.span_events());

    let registry = tracing_subscriber::registry().with(filter);
    let installed = match config.format {
        LogFormat::Compact => registry.with(fmt_layer.compact()).try_init(),
        LogFormat::Full => registry.with(fmt_layer).try_init(),
    };
    installed.map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))
}
