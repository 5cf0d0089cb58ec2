// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Trace record format.

use serde::{Deserialize, Serialize};

use crate::error::TraceError;
use crate::metric::ViewMetricsRegistry;
use crate::types::ResourceLifecycleEvent;

/// One recorded lifecycle event.
///
/// ```json
/// {"type": "view_created", "view": "home", "at": 1000}
/// {"type": "resource_started", "view": "home", "id": "img-1", "at": 1050}
/// {"type": "resource_stopped", "view": "home", "id": "img-1", "at": 5000}
/// {"type": "resource_dropped", "view": "home", "id": "img-2"}
/// {"type": "view_stopped", "view": "home"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TraceEvent {
    ViewCreated { view: String, at: i64 },
    ResourceStarted { view: String, id: String, at: i64 },
    ResourceStopped { view: String, id: String, at: i64 },
    ResourceDropped { view: String, id: String },
    ViewStopped { view: String },
}

impl TraceEvent {
    /// View the event belongs to.
    pub fn view(&self) -> &str {
        match self {
            Self::ViewCreated { view, .. }
            | Self::ResourceStarted { view, .. }
            | Self::ResourceStopped { view, .. }
            | Self::ResourceDropped { view, .. }
            | Self::ViewStopped { view } => view,
        }
    }

    /// Parse one line; `Ok(None)` for blank lines and `#` comments.
    pub fn parse_line(line: &str, line_number: usize) -> Result<Option<Self>, TraceError> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(None);
        }
        serde_json::from_str(trimmed)
            .map(Some)
            .map_err(|e| TraceError::Parse {
                line: line_number,
                message: e.to_string(),
            })
    }

    /// Apply the event to a registry.
    pub fn apply(&self, registry: &ViewMetricsRegistry) {
        match self {
            Self::ViewCreated { view, at } => registry.start_view(view, *at),
            Self::ResourceStarted { view, id, at } => {
                registry.resource_started(view, &ResourceLifecycleEvent::new(id.as_str(), *at))
            }
            Self::ResourceStopped { view, id, at } => {
                registry.resource_stopped(view, &ResourceLifecycleEvent::new(id.as_str(), *at))
            }
            Self::ResourceDropped { view, id } => registry.resource_dropped(view, id),
            Self::ViewStopped { view } => registry.stop_view(view),
        }
    }
}
