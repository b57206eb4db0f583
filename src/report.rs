//! Run Summary
//!
//! goose prints its own metrics tables when an attack ends. This module
//! condenses the final [`GooseMetrics`] into the per-request counts that
//! decide the process exit code and that are written as JSON for CI.

use anyhow::Context;
use chrono::{DateTime, Utc};
use goose::metrics::GooseMetrics;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use uuid::Uuid;

/// Request counts for one goose request key, e.g. `GET /login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSummary {
    pub name: String,
    pub requests: usize,
    pub failures: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_secs: i64,
    /// Sorted by name.
    pub requests: Vec<RequestSummary>,
    pub total_requests: usize,
    pub total_failures: usize,
}

impl RunSummary {
    pub fn new(
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        mut requests: Vec<RequestSummary>,
    ) -> Self {
        requests.sort_by(|a, b| a.name.cmp(&b.name));
        let total_requests = requests.iter().map(|r| r.requests).sum();
        let total_failures = requests.iter().map(|r| r.failures).sum();

        Self {
            run_id: Uuid::new_v4(),
            started_at,
            finished_at,
            duration_secs: (finished_at - started_at).num_seconds(),
            requests,
            total_requests,
            total_failures,
        }
    }

    pub fn from_metrics(
        metrics: &GooseMetrics,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        let requests = metrics
            .requests
            .iter()
            .map(|(name, aggregate)| RequestSummary {
                name: name.clone(),
                requests: aggregate.success_count + aggregate.fail_count,
                failures: aggregate.fail_count,
            })
            .collect();
        Self::new(started_at, finished_at, requests)
    }

    pub fn has_failures(&self) -> bool {
        self.total_failures > 0
    }

    /// `fail_code` when at least one request failed, otherwise 0.
    pub fn exit_code(&self, fail_code: i32) -> i32 {
        if self.has_failures() {
            fail_code
        } else {
            0
        }
    }

    /// Pretty JSON, creating missing parent directories.
    pub fn write_json(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating report directory {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("writing report {}", path.display()))?;
        Ok(())
    }
}
