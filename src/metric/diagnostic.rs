// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Per-view resource counters used to explain a missing metric.

use serde::Serialize;

use crate::types::NoValueReason;

/// Resource counters for the current view.
///
/// Replaced wholesale whenever a new view is created. Only read to classify why
/// no settle duration is available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Diagnostic {
    started: u32,
    initial: u32,
    stopped: u32,
    dropped: u32,
}

impl Diagnostic {
    pub(crate) fn record_started(&mut self) {
        self.started = self.started.saturating_add(1);
    }

    pub(crate) fn record_initial(&mut self) {
        self.initial = self.initial.saturating_add(1);
    }

    pub(crate) fn record_stopped(&mut self) {
        self.stopped = self.stopped.saturating_add(1);
    }

    pub(crate) fn record_dropped(&mut self) {
        self.dropped = self.dropped.saturating_add(1);
    }

    pub(crate) fn snapshot(&self) -> DiagnosticSnapshot {
        DiagnosticSnapshot {
            started: self.started,
            initial: self.initial,
            stopped: self.stopped,
            dropped: self.dropped,
        }
    }
}

/// A consistent read of the diagnostic counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiagnosticSnapshot {
    /// Resources started for the view.
    pub started: u32,
    /// Started resources accepted by the initial-resource policy.
    pub initial: u32,
    /// Initial resources that stopped after the view was created.
    pub stopped: u32,
    /// Resources dropped, initial or not.
    pub dropped: u32,
}

impl DiagnosticSnapshot {
    /// Classify the missing value. The first matching rule wins.
    pub fn resolve_no_value_reason(&self) -> NoValueReason {
        let settled = u64::from(self.dropped) + u64::from(self.stopped);
        if self.started == 0 {
            NoValueReason::NoResources
        } else if self.initial == 0 {
            NoValueReason::NoInitialResources
        } else if u64::from(self.initial) > settled {
            NoValueReason::NotSettledYet
        } else {
            NoValueReason::Unknown
        }
    }
}
