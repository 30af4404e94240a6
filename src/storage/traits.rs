//! The event store contract

use async_trait::async_trait;

use super::error::StorageResult;
use super::types::{Event, NewEvent};

/// Contract with the managed event store.
///
/// The store is treated as a plain bulk record keeper: full-collection reads,
/// whole-record inserts, whole-attendee-array updates, deletes. No server-side
/// filtering, sorting, or aggregation is ever requested; all of that happens
/// client-side over the fetched collection.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Full-collection read.
    async fn fetch_all(&self) -> StorageResult<Vec<Event>>;

    /// Insert a single record, returning it as created (with store-assigned
    /// `id` and `created_at`).
    async fn insert(&self, event: NewEvent) -> StorageResult<Event>;

    /// Bulk-import path: insert records, replacing existing rows that share
    /// the conflict key `(event_name, start_date, location)`.
    async fn upsert_many(&self, events: Vec<NewEvent>) -> StorageResult<Vec<Event>>;

    /// Replace the whole attendee array of one record (last write wins).
    async fn update_attendees(&self, id: &str, attendees: Vec<String>) -> StorageResult<Event>;

    /// Delete one record by id.
    async fn delete(&self, id: &str) -> StorageResult<()>;
}
