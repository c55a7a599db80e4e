//! Network tasks behind the entity store.
//!
//! Each function performs one request against the API and reports the
//! outcome through the store channel. They are spawned onto the tokio
//! runtime by `App` and never touch store state directly. No request is
//! retried or cancelled once started.

use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::api::{ApiClient, Resource};
use crate::models::{EntityId, NewRecord};

use super::StoreEvent;

/// Helper to send task results, logging any channel errors
async fn send_event(tx: &mpsc::Sender<StoreEvent>, event: StoreEvent) {
    if let Err(e) = tx.send(event).await {
        error!(error = %e, "Failed to send store event - channel closed");
    }
}

/// Fetch a full collection as fetch number `seq`.
pub async fn fetch_collection(api: ApiClient, resource: Resource, seq: u64, tx: mpsc::Sender<StoreEvent>) {
    let result = match api.fetch_records(resource).await {
        Ok(records) => {
            debug!(resource = resource.path(), seq, count = records.len(), "Fetch complete");
            Ok(records)
        }
        Err(e) => {
            error!(resource = resource.path(), seq, error = %format!("{:#}", e), "Fetch failed");
            Err(format!("{:#}", e))
        }
    };
    send_event(&tx, StoreEvent::Fetched { resource, seq, result }).await;
}

/// Submit a new record.
pub async fn create_record(api: ApiClient, record: NewRecord, tx: mpsc::Sender<StoreEvent>) {
    let resource = record.resource();
    let event = match api.create(resource, &record).await {
        Ok(_) => {
            info!(resource = resource.path(), name = record.name(), "Record created");
            StoreEvent::Created {
                resource,
                name: record.name().to_string(),
            }
        }
        Err(e) => {
            error!(resource = resource.path(), error = %format!("{:#}", e), "Create failed");
            StoreEvent::CreateFailed {
                resource,
                error: format!("{:#}", e),
            }
        }
    };
    send_event(&tx, event).await;
}

/// Delete a record. `details` is the display name captured before the
/// request was issued, for the audit trail.
pub async fn delete_record(
    api: ApiClient,
    resource: Resource,
    id: EntityId,
    details: String,
    tx: mpsc::Sender<StoreEvent>,
) {
    let event = match api.delete(resource, id).await {
        Ok(()) => {
            info!(resource = resource.path(), id, "Record deleted");
            StoreEvent::Deleted { resource, id, details }
        }
        Err(e) => {
            error!(resource = resource.path(), id, error = %format!("{:#}", e), "Delete failed");
            StoreEvent::DeleteFailed {
                resource,
                id,
                error: format!("{:#}", e),
            }
        }
    };
    send_event(&tx, event).await;
}
