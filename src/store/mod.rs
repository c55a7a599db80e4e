//! In-memory entity store.
//!
//! The store holds the last fetched snapshot of each collection plus the
//! session audit trail. It is only mutated from the UI loop: network work
//! runs in the tasks of [`tasks`], which report back as [`StoreEvent`]s.
//!
//! Every fetch is tagged with a per-collection sequence number. A result is
//! applied only if it belongs to the most recently issued fetch, so an older
//! request that finishes late can never overwrite newer data.

pub mod audit;
pub mod resolve;
pub mod summary;
pub mod tasks;

use tracing::{debug, warn};

use crate::api::{Records, Resource};
use crate::models::{BusinessUnit, Company, EntityId, Metric};

pub use audit::{AuditAction, AuditTrail};

/// One cached collection with its fetch state.
#[derive(Debug)]
pub struct Collection<T> {
    pub items: Vec<T>,
    pub loading: bool,
    /// Set by a failed fetch, cleared by the next successful one.
    pub error: Option<String>,
    issued: u64,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
            issued: 0,
        }
    }
}

impl<T> Collection<T> {
    fn begin_fetch(&mut self) -> u64 {
        self.issued += 1;
        self.loading = true;
        self.issued
    }

    fn is_current(&self, seq: u64) -> bool {
        seq == self.issued
    }

    fn replace(&mut self, items: Vec<T>) {
        self.items = items;
        self.loading = false;
        self.error = None;
    }

    fn fail(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
    }
}

/// Result of a network task, delivered to the UI loop.
#[derive(Debug)]
pub enum StoreEvent {
    Fetched {
        resource: Resource,
        seq: u64,
        result: Result<Records, String>,
    },
    Created {
        resource: Resource,
        name: String,
    },
    CreateFailed {
        resource: Resource,
        error: String,
    },
    Deleted {
        resource: Resource,
        id: EntityId,
        details: String,
    },
    DeleteFailed {
        resource: Resource,
        id: EntityId,
        error: String,
    },
}

/// What happened when a fetch result was offered to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    Failed,
    /// A newer fetch was issued after this one; the result was dropped.
    Stale,
}

#[derive(Debug, Default)]
pub struct EntityStore {
    pub companies: Collection<Company>,
    pub business_units: Collection<BusinessUnit>,
    pub metrics: Collection<Metric>,
    pub audit: AuditTrail,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a fetch of `resource` as issued and return its sequence number.
    pub fn begin_fetch(&mut self, resource: Resource) -> u64 {
        match resource {
            Resource::Companies => self.companies.begin_fetch(),
            Resource::BusinessUnits => self.business_units.begin_fetch(),
            Resource::Metrics => self.metrics.begin_fetch(),
        }
    }

    fn is_current(&self, resource: Resource, seq: u64) -> bool {
        match resource {
            Resource::Companies => self.companies.is_current(seq),
            Resource::BusinessUnits => self.business_units.is_current(seq),
            Resource::Metrics => self.metrics.is_current(seq),
        }
    }

    /// Apply the result of fetch `seq` for `resource`.
    ///
    /// On success the collection is replaced wholesale with the server's
    /// records. On failure the previous records stay and the error is kept.
    pub fn apply_fetch(
        &mut self,
        resource: Resource,
        seq: u64,
        result: Result<Records, String>,
    ) -> FetchOutcome {
        if !self.is_current(resource, seq) {
            debug!(resource = resource.path(), seq, "Dropping stale fetch result");
            return FetchOutcome::Stale;
        }

        match result {
            Ok(Records::Companies(items)) if resource == Resource::Companies => {
                self.companies.replace(items)
            }
            Ok(Records::BusinessUnits(items)) if resource == Resource::BusinessUnits => {
                self.business_units.replace(items)
            }
            Ok(Records::Metrics(items)) if resource == Resource::Metrics => {
                self.metrics.replace(items)
            }
            Ok(other) => {
                warn!(
                    resource = resource.path(),
                    got = other.resource().path(),
                    "Fetch result does not match its resource"
                );
                self.fail(resource, "Unexpected response".to_string());
                return FetchOutcome::Failed;
            }
            Err(e) => {
                warn!(resource = resource.path(), error = %e, "Fetch failed");
                self.fail(resource, format!("Failed to fetch {}", resource.plural_name()));
                return FetchOutcome::Failed;
            }
        }
        FetchOutcome::Applied
    }

    fn fail(&mut self, resource: Resource, message: String) {
        match resource {
            Resource::Companies => self.companies.fail(message),
            Resource::BusinessUnits => self.business_units.fail(message),
            Resource::Metrics => self.metrics.fail(message),
        }
    }

    pub fn is_loading(&self, resource: Resource) -> bool {
        match resource {
            Resource::Companies => self.companies.loading,
            Resource::BusinessUnits => self.business_units.loading,
            Resource::Metrics => self.metrics.loading,
        }
    }

    pub fn fetch_error(&self, resource: Resource) -> Option<&str> {
        match resource {
            Resource::Companies => self.companies.error.as_deref(),
            Resource::BusinessUnits => self.business_units.error.as_deref(),
            Resource::Metrics => self.metrics.error.as_deref(),
        }
    }

    pub fn contains(&self, resource: Resource, id: EntityId) -> bool {
        match resource {
            Resource::Companies => self.companies.items.iter().any(|c| c.id == id),
            Resource::BusinessUnits => self.business_units.items.iter().any(|b| b.id == id),
            Resource::Metrics => self.metrics.items.iter().any(|m| m.id == id),
        }
    }

    /// Display name of a record for the audit trail, or `ID <id>` if absent.
    pub fn display_name(&self, resource: Resource, id: EntityId) -> String {
        let name = match resource {
            Resource::Companies => self.companies.items.iter().find(|c| c.id == id).map(|c| &c.name),
            Resource::BusinessUnits => self
                .business_units
                .items
                .iter()
                .find(|b| b.id == id)
                .map(|b| &b.name),
            Resource::Metrics => self.metrics.items.iter().find(|m| m.id == id).map(|m| &m.name),
        };
        match name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("ID {}", id),
        }
    }

    pub fn company_name(&self, id: EntityId) -> String {
        resolve::company_name(&self.companies.items, id)
    }

    pub fn business_unit_label(&self, id: EntityId) -> String {
        resolve::business_unit_label(&self.business_units.items, &self.companies.items, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sector;

    fn company(id: EntityId, name: &str) -> Company {
        Company {
            id,
            name: name.to_string(),
            sector: Sector::Retail,
            location: "Lyon".to_string(),
            reporting_period_start: "2024-01-01".to_string(),
            reporting_period_end: "2024-12-31".to_string(),
            description: None,
        }
    }

    #[test]
    fn test_successful_fetch_replaces_collection_exactly() {
        let mut store = EntityStore::new();
        let seq = store.begin_fetch(Resource::Companies);
        assert!(store.is_loading(Resource::Companies));

        let records = vec![company(1, "Acme"), company(2, "Globex")];
        let outcome = store.apply_fetch(Resource::Companies, seq, Ok(Records::Companies(records.clone())));

        assert_eq!(outcome, FetchOutcome::Applied);
        assert_eq!(store.companies.items, records);
        assert!(!store.is_loading(Resource::Companies));
        assert_eq!(store.fetch_error(Resource::Companies), None);
    }

    #[test]
    fn test_stale_fetch_is_discarded() {
        let mut store = EntityStore::new();
        let first = store.begin_fetch(Resource::Companies);
        let second = store.begin_fetch(Resource::Companies);

        let newer = vec![company(2, "Newer")];
        store.apply_fetch(Resource::Companies, second, Ok(Records::Companies(newer.clone())));
        let outcome = store.apply_fetch(
            Resource::Companies,
            first,
            Ok(Records::Companies(vec![company(1, "Older")])),
        );

        assert_eq!(outcome, FetchOutcome::Stale);
        assert_eq!(store.companies.items, newer);
    }

    #[test]
    fn test_stale_result_keeps_loading_until_latest_arrives() {
        let mut store = EntityStore::new();
        let first = store.begin_fetch(Resource::Metrics);
        let _second = store.begin_fetch(Resource::Metrics);

        store.apply_fetch(Resource::Metrics, first, Ok(Records::Metrics(vec![])));
        assert!(store.is_loading(Resource::Metrics));
    }

    #[test]
    fn test_failed_fetch_flags_error_and_keeps_data() {
        let mut store = EntityStore::new();
        let seq = store.begin_fetch(Resource::BusinessUnits);
        store.apply_fetch(Resource::BusinessUnits, seq, Ok(Records::BusinessUnits(vec![])));

        let seq = store.begin_fetch(Resource::Companies);
        store.apply_fetch(Resource::Companies, seq, Ok(Records::Companies(vec![company(1, "Acme")])));
        let seq = store.begin_fetch(Resource::Companies);
        let outcome = store.apply_fetch(Resource::Companies, seq, Err("connection refused".to_string()));

        assert_eq!(outcome, FetchOutcome::Failed);
        assert_eq!(store.companies.items.len(), 1);
        assert_eq!(store.fetch_error(Resource::Companies), Some("Failed to fetch companies"));
        assert!(!store.is_loading(Resource::Companies));

        let seq = store.begin_fetch(Resource::Companies);
        store.apply_fetch(Resource::Companies, seq, Ok(Records::Companies(vec![])));
        assert_eq!(store.fetch_error(Resource::Companies), None);
    }

    #[test]
    fn test_errors_are_flagged_for_every_collection() {
        let mut store = EntityStore::new();
        for resource in Resource::ALL {
            let seq = store.begin_fetch(resource);
            store.apply_fetch(resource, seq, Err("boom".to_string()));
        }
        assert_eq!(store.fetch_error(Resource::BusinessUnits), Some("Failed to fetch business units"));
        assert_eq!(store.fetch_error(Resource::Metrics), Some("Failed to fetch metrics"));
    }

    #[test]
    fn test_mismatched_records_are_rejected() {
        let mut store = EntityStore::new();
        let seq = store.begin_fetch(Resource::Metrics);
        let outcome = store.apply_fetch(Resource::Metrics, seq, Ok(Records::Companies(vec![company(1, "A")])));
        assert_eq!(outcome, FetchOutcome::Failed);
        assert!(store.metrics.items.is_empty());
        assert!(store.companies.items.is_empty());
    }

    #[test]
    fn test_display_name_falls_back_to_id() {
        let mut store = EntityStore::new();
        let seq = store.begin_fetch(Resource::Companies);
        store.apply_fetch(Resource::Companies, seq, Ok(Records::Companies(vec![company(1, "Acme")])));

        assert_eq!(store.display_name(Resource::Companies, 1), "Acme");
        assert_eq!(store.display_name(Resource::Companies, 9), "ID 9");
        assert_eq!(store.display_name(Resource::Metrics, 1), "ID 1");
        assert!(store.contains(Resource::Companies, 1));
        assert!(!store.contains(Resource::Companies, 9));
    }
}
