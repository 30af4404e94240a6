//! In-memory event cache with a single refresh entry point
//!
//! The hub owns the cached event collection exclusively. Every mutating
//! operation performs the store write and then a full refetch before anything
//! recomputes, so consumers never see stale-but-partially-updated state.
//! Consistency is "refetch everything, recompute everything", which is fine
//! at this dataset size.

use chrono::{Local, NaiveDate};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::analytics::{self, AttendanceRow, ReportFilter};
use crate::directory::Directory;
use crate::error::{Error, Result};
use crate::import::{ImportBatch, ImportSummary};
use crate::storage::{Event, EventStore, NewEvent};

pub struct EventHub {
    store: Arc<dyn EventStore>,
    directory: Directory,
    events: Vec<Event>,
}

impl EventHub {
    /// Create a hub with an empty cache; call [`EventHub::refresh`] (or any
    /// mutating operation) to populate it.
    pub fn new(store: Arc<dyn EventStore>, directory: Directory) -> Self {
        Self {
            store,
            directory,
            events: Vec::new(),
        }
    }

    /// Fetch the full collection and replace the cache, sorted by start date
    /// for display. The store is never asked to filter or sort.
    pub async fn refresh(&mut self) -> Result<()> {
        let mut events = self.store.fetch_all().await?;
        events.sort_by(|a, b| a.start_date.cmp(&b.start_date));
        debug!("refreshed event cache: {} events", events.len());
        self.events = events;
        Ok(())
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Cached events whose date range covers `date`.
    pub fn events_on(&self, date: NaiveDate) -> Vec<&Event> {
        self.events.iter().filter(|ev| ev.covers(date)).collect()
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    fn find(&self, id: &str) -> Result<&Event> {
        self.events
            .iter()
            .find(|ev| ev.id == id)
            .ok_or_else(|| Error::NotFound(format!("event {id}")))
    }

    /// Register one event: validate, insert, refetch.
    pub async fn register(&mut self, event: NewEvent) -> Result<Event> {
        let event = event.normalize();
        event.validate().map_err(Error::Validation)?;
        let created = self.store.insert(event).await?;
        info!(event = %created.event_name, id = %created.id, "registered event");
        self.refresh().await?;
        Ok(created)
    }

    /// Delete one event by id, then refetch.
    pub async fn delete_event(&mut self, id: &str) -> Result<()> {
        self.store.delete(id).await?;
        info!(id, "deleted event");
        self.refresh().await?;
        Ok(())
    }

    /// Sign an attendee up for an event. Empty names are a validation error,
    /// duplicates a user error caught before the store call; names outside
    /// the directory are accepted with a warning (the join stays string-keyed).
    pub async fn add_attendee(&mut self, id: &str, name: &str) -> Result<Event> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("attendee name must not be empty".to_string()));
        }

        let event = self.find(id)?;
        if event.attendees.iter().any(|a| a.trim() == name) {
            return Err(Error::Duplicate(format!(
                "{name} is already signed up for {}",
                event.event_name
            )));
        }
        if !self.directory.contains(name) {
            warn!(name, "attendee is not in the employee directory");
        }

        let mut attendees = event.attendees.clone();
        attendees.push(name.to_string());
        let updated = self.store.update_attendees(id, attendees).await?;
        self.refresh().await?;
        Ok(updated)
    }

    /// Remove an attendee from an event. Removing a name that is not on the
    /// list is a silent no-op.
    pub async fn remove_attendee(&mut self, id: &str, name: &str) -> Result<Event> {
        let name = name.trim();
        let event = self.find(id)?;
        let attendees: Vec<String> = event
            .attendees
            .iter()
            .filter(|a| a.trim() != name)
            .cloned()
            .collect();
        let updated = self.store.update_attendees(id, attendees).await?;
        self.refresh().await?;
        Ok(updated)
    }

    /// Bulk import: upsert the whole batch, then refetch. A store error
    /// aborts the batch as a whole; there are no partial-failure semantics.
    pub async fn import(&mut self, batch: ImportBatch) -> Result<ImportSummary> {
        let skipped = batch.skipped;
        let imported = if batch.rows.is_empty() {
            0
        } else {
            self.store.upsert_many(batch.rows).await?.len()
        };
        info!(imported, skipped, "bulk import complete");
        self.refresh().await?;
        Ok(ImportSummary { imported, skipped })
    }

    /// Run the aggregation engine over the cached collection as of today.
    pub fn ranking(&self, filter: &ReportFilter) -> Vec<AttendanceRow> {
        self.ranking_as_of(filter, Local::now().date_naive())
    }

    /// Deterministic variant taking an explicit "today".
    pub fn ranking_as_of(&self, filter: &ReportFilter, today: NaiveDate) -> Vec<AttendanceRow> {
        analytics::rank(&self.events, &self.directory, filter, today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::Employee;
    use crate::storage::MemoryStore;

    fn directory() -> Directory {
        Directory::from_employees(vec![
            Employee {
                name: "A".into(),
                affiliation: "D1".into(),
                group: "G1".into(),
            },
            Employee {
                name: "B".into(),
                affiliation: "D1".into(),
                group: "G1".into(),
            },
        ])
        .unwrap()
    }

    fn hub() -> EventHub {
        EventHub::new(Arc::new(MemoryStore::new()), directory())
    }

    fn sample(name: &str, start: &str) -> NewEvent {
        NewEvent {
            product: "EGL".into(),
            event_name: name.into(),
            organizer: String::new(),
            location: "Seoul".into(),
            start_date: start.into(),
            end_date: None,
            pm_attend: false,
            attendees: vec![],
            booth_size: 1,
        }
    }

    #[tokio::test]
    async fn register_refreshes_the_cache() {
        let mut hub = hub();
        hub.register(sample("KSC Spring", "2025-03-01")).await.unwrap();
        assert_eq!(hub.events().len(), 1);
        assert_eq!(hub.events()[0].end_date, "2025-03-01");
    }

    #[tokio::test]
    async fn register_rejects_invalid_events() {
        let mut hub = hub();
        let err = hub.register(sample("", "2025-03-01")).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        let err = hub
            .register(sample("KSC Spring", "not-a-date"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(hub.events().is_empty());
    }

    #[tokio::test]
    async fn cache_is_sorted_by_start_date() {
        let mut hub = hub();
        hub.register(sample("Later", "2025-05-01")).await.unwrap();
        hub.register(sample("Earlier", "2025-02-01")).await.unwrap();
        let names: Vec<&str> = hub.events().iter().map(|e| e.event_name.as_str()).collect();
        assert_eq!(names, vec!["Earlier", "Later"]);
    }

    #[tokio::test]
    async fn add_attendee_trims_and_rejects_duplicates() {
        let mut hub = hub();
        let created = hub.register(sample("KSC Spring", "2025-03-01")).await.unwrap();

        hub.add_attendee(&created.id, "  A ").await.unwrap();
        assert_eq!(hub.events()[0].attendees, vec!["A"]);

        let err = hub.add_attendee(&created.id, "A").await.unwrap_err();
        assert!(matches!(err, Error::Duplicate(_)));

        let err = hub.add_attendee(&created.id, "   ").await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let err = hub.add_attendee("missing", "A").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn remove_attendee_is_a_silent_noop_for_absent_names() {
        let mut hub = hub();
        let created = hub.register(sample("KSC Spring", "2025-03-01")).await.unwrap();
        hub.add_attendee(&created.id, "A").await.unwrap();

        hub.remove_attendee(&created.id, "nobody").await.unwrap();
        assert_eq!(hub.events()[0].attendees, vec!["A"]);

        hub.remove_attendee(&created.id, "A").await.unwrap();
        assert!(hub.events()[0].attendees.is_empty());
    }

    #[tokio::test]
    async fn delete_event_refreshes_the_cache() {
        let mut hub = hub();
        let created = hub.register(sample("KSC Spring", "2025-03-01")).await.unwrap();
        hub.delete_event(&created.id).await.unwrap();
        assert!(hub.events().is_empty());
        assert!(matches!(
            hub.delete_event(&created.id).await.unwrap_err(),
            Error::Storage(_)
        ));
    }

    #[tokio::test]
    async fn events_on_uses_the_date_range() {
        let mut hub = hub();
        let mut event = sample("KSC Spring", "2025-03-01");
        event.end_date = Some("2025-03-03".into());
        hub.register(event).await.unwrap();

        let d = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
        assert_eq!(hub.events_on(d("2025-03-02")).len(), 1);
        assert_eq!(hub.events_on(d("2025-03-04")).len(), 0);
    }

    #[tokio::test]
    async fn ranking_runs_over_the_cache() {
        let mut hub = hub();
        let created = hub.register(sample("KSC Spring", "2025-03-01")).await.unwrap();
        hub.add_attendee(&created.id, "A").await.unwrap();

        let rows = hub.ranking_as_of(
            &ReportFilter::default(),
            NaiveDate::parse_from_str("2025-06-01", "%Y-%m-%d").unwrap(),
        );
        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].name.as_str(), rows[0].count), ("A", 1));
        assert_eq!((rows[1].name.as_str(), rows[1].count), ("B", 0));
    }
}
