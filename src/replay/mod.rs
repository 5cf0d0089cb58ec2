// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Replay of recorded lifecycle traces.
//!
//! A trace is a JSON Lines file of [`TraceEvent`]s. Replaying it drives a
//! [`ViewMetricsRegistry`] exactly as the live trackers would, which makes it
//! possible to inspect the network settled outcome of a recorded session.

mod trace;

pub use trace::TraceEvent;

use std::io::BufRead;

use tracing::debug;

use crate::error::TraceError;
use crate::metric::{ViewMetricsRegistry, ViewReport};

/// Outcome of a replay.
#[derive(Debug, Clone, Default)]
pub struct ReplaySummary {
    /// Number of events applied.
    pub events: usize,
    /// Views in order of first appearance.
    pub views: Vec<String>,
}

impl ReplaySummary {
    /// Report every view seen during the replay.
    pub fn reports(&self, registry: &ViewMetricsRegistry) -> Vec<ViewReport> {
        self.views
            .iter()
            .filter_map(|view| registry.report(view))
            .collect()
    }
}

/// Apply every event of `reader` to `registry`.
///
/// Stops at the first malformed line; events before it stay applied.
pub fn replay_trace<R: BufRead>(
    reader: R,
    registry: &ViewMetricsRegistry,
) -> Result<ReplaySummary, TraceError> {
    let mut summary = ReplaySummary::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let Some(event) = TraceEvent::parse_line(&line, index + 1)? else {
            continue;
        };
        if !summary.views.iter().any(|v| v == event.view()) {
            summary.views.push(event.view().to_string());
        }
        event.apply(registry);
        summary.events += 1;
    }

    debug!(events = summary.events, views = summary.views.len(), "Trace replayed");
    Ok(summary)
}
