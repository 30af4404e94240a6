//! In-memory event store backend for tests and offline use

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::storage::error::{StorageError, StorageResult};
use crate::storage::traits::EventStore;
use crate::storage::types::{Event, NewEvent};

/// In-memory event table with the same last-write-wins semantics as the
/// remote store. Insertion order is preserved.
#[derive(Default)]
pub struct MemoryStore {
    events: Arc<RwLock<Vec<Event>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeded store, handy in tests.
    pub fn with_events(events: Vec<Event>) -> Self {
        Self {
            events: Arc::new(RwLock::new(events)),
        }
    }

    fn materialize(new: NewEvent) -> Event {
        let new = new.normalize();
        let end_date = new.end_date.unwrap_or_else(|| new.start_date.clone());
        Event {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            product: new.product,
            event_name: new.event_name,
            organizer: new.organizer,
            location: new.location,
            start_date: new.start_date,
            end_date,
            pm_attend: new.pm_attend,
            attendees: new.attendees,
            booth_size: new.booth_size,
        }
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn fetch_all(&self) -> StorageResult<Vec<Event>> {
        Ok(self.events.read().await.clone())
    }

    async fn insert(&self, event: NewEvent) -> StorageResult<Event> {
        let created = Self::materialize(event);
        self.events.write().await.push(created.clone());
        Ok(created)
    }

    async fn upsert_many(&self, new_events: Vec<NewEvent>) -> StorageResult<Vec<Event>> {
        let mut table = self.events.write().await;
        let mut result = Vec::with_capacity(new_events.len());
        for new in new_events {
            let created = Self::materialize(new);
            let conflict = table.iter_mut().find(|ev| {
                ev.event_name == created.event_name
                    && ev.start_date == created.start_date
                    && ev.location == created.location
            });
            match conflict {
                Some(existing) => {
                    // On-conflict replace, but the row keeps its identity.
                    let replaced = Event {
                        id: existing.id.clone(),
                        created_at: existing.created_at,
                        ..created
                    };
                    *existing = replaced.clone();
                    result.push(replaced);
                }
                None => {
                    table.push(created.clone());
                    result.push(created);
                }
            }
        }
        Ok(result)
    }

    async fn update_attendees(&self, id: &str, attendees: Vec<String>) -> StorageResult<Event> {
        let mut table = self.events.write().await;
        let event = table
            .iter_mut()
            .find(|ev| ev.id == id)
            .ok_or_else(|| StorageError::NotFound(format!("event {id}")))?;
        event.attendees = attendees;
        Ok(event.clone())
    }

    async fn delete(&self, id: &str) -> StorageResult<()> {
        let mut table = self.events.write().await;
        let before = table.len();
        table.retain(|ev| ev.id != id);
        if table.len() == before {
            return Err(StorageError::NotFound(format!("event {id}")));
        }
        Ok(())
    }
}
