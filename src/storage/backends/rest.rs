//! PostgREST-style HTTP backend for the managed event store

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

use crate::storage::error::{StorageError, StorageResult};
use crate::storage::traits::EventStore;
use crate::storage::types::{Event, NewEvent};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const UPSERT_CONFLICT_KEY: &str = "event_name,start_date,location";

/// HTTP client for a PostgREST-style collection endpoint.
///
/// Requests carry the service `apikey` plus a bearer token. Failures are
/// mapped to [`StorageError`] and never retried automatically; callers
/// re-trigger the action themselves.
#[derive(Debug)]
pub struct RestStore {
    client: reqwest::Client,
    endpoint: String,
}

impl RestStore {
    pub fn new(base_url: &str, api_key: &str, table: &str) -> StorageResult<Self> {
        if base_url.trim().is_empty() {
            return Err(StorageError::Configuration(
                "store URL is not configured".to_string(),
            ));
        }
        if api_key.trim().is_empty() {
            return Err(StorageError::Configuration(
                "store API key is not configured".to_string(),
            ));
        }

        let mut headers = HeaderMap::new();
        let key_value = HeaderValue::from_str(api_key)
            .map_err(|_| StorageError::Configuration("store API key is not valid".to_string()))?;
        headers.insert("apikey", key_value);
        let bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| StorageError::Configuration("store API key is not valid".to_string()))?;
        headers.insert(AUTHORIZATION, bearer);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/{}", base_url.trim_end_matches('/'), table),
        })
    }

    async fn decode_rows(response: reqwest::Response) -> StorageResult<Vec<Event>> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(StorageError::backend(status.as_u16(), body));
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl EventStore for RestStore {
    async fn fetch_all(&self) -> StorageResult<Vec<Event>> {
        debug!("GET {}", self.endpoint);
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("select", "*")])
            .send()
            .await?;
        Self::decode_rows(response).await
    }

    async fn insert(&self, event: NewEvent) -> StorageResult<Event> {
        let event = event.normalize();
        debug!("POST {} ({})", self.endpoint, event.event_name);
        let response = self
            .client
            .post(&self.endpoint)
            .header("Prefer", "return=representation")
            .json(&event)
            .send()
            .await?;
        let mut rows = Self::decode_rows(response).await?;
        rows.pop().ok_or_else(|| {
            StorageError::backend(200, "insert returned no representation".to_string())
        })
    }

    async fn upsert_many(&self, events: Vec<NewEvent>) -> StorageResult<Vec<Event>> {
        let events: Vec<NewEvent> = events.into_iter().map(NewEvent::normalize).collect();
        debug!("POST {} (upsert, {} rows)", self.endpoint, events.len());
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("on_conflict", UPSERT_CONFLICT_KEY)])
            .header("Prefer", "return=representation,resolution=merge-duplicates")
            .json(&events)
            .send()
            .await?;
        Self::decode_rows(response).await
    }

    async fn update_attendees(&self, id: &str, attendees: Vec<String>) -> StorageResult<Event> {
        debug!("PATCH {} id={}", self.endpoint, id);
        let response = self
            .client
            .patch(&self.endpoint)
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(&serde_json::json!({ "attendees": attendees }))
            .send()
            .await?;
        let mut rows = Self::decode_rows(response).await?;
        rows.pop()
            .ok_or_else(|| StorageError::NotFound(format!("event {id}")))
    }

    async fn delete(&self, id: &str) -> StorageResult<()> {
        debug!("DELETE {} id={}", self.endpoint, id);
        let response = self
            .client
            .delete(&self.endpoint)
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .send()
            .await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(StorageError::NotFound(format!("event {id}")));
        }
        let rows = Self::decode_rows(response).await?;
        if rows.is_empty() {
            return Err(StorageError::NotFound(format!("event {id}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_missing_configuration() {
        assert!(matches!(
            RestStore::new("", "key", "events").unwrap_err(),
            StorageError::Configuration(_)
        ));
        assert!(matches!(
            RestStore::new("https://store.example.com/rest/v1", "", "events").unwrap_err(),
            StorageError::Configuration(_)
        ));
    }

    #[test]
    fn endpoint_joins_url_and_table() {
        let store = RestStore::new("https://store.example.com/rest/v1/", "key", "events").unwrap();
        assert_eq!(store.endpoint, "https://store.example.com/rest/v1/events");
    }
}
