//! Session-local audit trail of user mutations.
//!
//! Entries are kept newest first and are never persisted or evicted.

use chrono::{DateTime, Local};

use crate::api::Resource;

/// Local clock format for audit timestamps, e.g. `3/14/2025, 9:05:12 AM`.
const TIMESTAMP_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    Added,
    Deleted,
}

impl AuditAction {
    pub fn verb(&self) -> &'static str {
        match self {
            AuditAction::Added => "Added",
            AuditAction::Deleted => "Deleted",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditLogEntry {
    pub timestamp: String,
    /// e.g. "Added Company", "Deleted Metric"
    pub action: String,
    pub details: String,
}

impl AuditLogEntry {
    pub fn summary(&self) -> String {
        format!("{}: {}", self.action, self.details)
    }
}

#[derive(Debug, Default)]
pub struct AuditTrail {
    entries: Vec<AuditLogEntry>,
}

impl AuditTrail {
    /// Record an action at the current local time.
    pub fn record(&mut self, action: AuditAction, resource: Resource, details: &str) -> &AuditLogEntry {
        self.record_at(action, resource, details, Local::now())
    }

    pub fn record_at(
        &mut self,
        action: AuditAction,
        resource: Resource,
        details: &str,
        at: DateTime<Local>,
    ) -> &AuditLogEntry {
        let entry = AuditLogEntry {
            timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
            action: format!("{} {}", action.verb(), resource.entity_name()),
            details: details.to_string(),
        };
        self.entries.insert(0, entry);
        &self.entries[0]
    }

    /// All entries, newest first.
    pub fn entries(&self) -> &[AuditLogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
