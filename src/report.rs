//! Result aggregation for a single export run.
//!
//! One [`SyncReport`] is owned per export invocation.  Counters increment
//! exactly once per successful create/update call and never decrement;
//! per-node failures accumulate as ordered human-readable strings.

use serde::{Deserialize, Serialize};

/// Remote resource kind a counter refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Organization,
    Team,
    Repository,
}

/// Counters per resource kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindCounts {
    pub orgs: u32,
    pub teams: u32,
    pub repos: u32,
}

impl KindCounts {
    fn bump(&mut self, kind: ResourceKind) {
        match kind {
            ResourceKind::Organization => self.orgs += 1,
            ResourceKind::Team => self.teams += 1,
            ResourceKind::Repository => self.repos += 1,
        }
    }

    /// Sum across all kinds.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.orgs + self.teams + self.repos
    }
}

/// Aggregated outcome of an export run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    /// Resources created, per kind.
    pub created: KindCounts,
    /// Resources updated, per kind.
    pub updated: KindCounts,
    /// Non-fatal per-node errors, in traversal order.
    pub errors: Vec<String>,
}

impl SyncReport {
    /// Record one successful create call.
    pub fn record_created(&mut self, kind: ResourceKind) {
        self.created.bump(kind);
    }

    /// Record one successful update call.
    pub fn record_updated(&mut self, kind: ResourceKind) {
        self.updated.bump(kind);
    }

    /// Record a non-fatal per-node error.
    pub fn record_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// Whether the run completed without recorded errors.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}
