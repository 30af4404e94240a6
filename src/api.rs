//! HTTP surface for event CRUD, bulk import, ranking, and the calendar feed

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{delete, get, post},
    Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::analytics::{AttendanceRow, ReportFilter};
use crate::calendar::{calendar_entries, CalendarEntry};
use crate::directory::Employee;
use crate::hub::EventHub;
use crate::import::{self, ImportSummary};
use crate::storage::{Event, NewEvent};

/// Shared API state: the hub behind a lock. Mutating handlers take the write
/// lock for the store write plus refetch; read handlers recompute from the
/// cache under the read lock.
pub type SharedHub = Arc<RwLock<EventHub>>;

/// API server wrapping the hub.
pub struct ApiServer {
    hub: SharedHub,
    port: u16,
}

impl ApiServer {
    pub fn new(hub: EventHub, port: u16) -> Self {
        Self {
            hub: Arc::new(RwLock::new(hub)),
            port,
        }
    }

    /// Start the API server.
    pub async fn start(self) -> Result<()> {
        let addr = format!("0.0.0.0:{}", self.port);
        let app = build_router(self.hub);

        info!("Starting schedhub API server on {}", addr);

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}

/// Build the API router. Public so tests can serve it on an ephemeral port.
pub fn build_router(hub: SharedHub) -> Router {
    Router::new()
        .route("/api/v1/health", get(health_check))
        .route("/api/v1/events", get(list_events))
        .route("/api/v1/events", post(register_event))
        .route("/api/v1/events/{id}", delete(delete_event))
        .route("/api/v1/events/{id}/attendees", post(add_attendee))
        .route(
            "/api/v1/events/{id}/attendees/{name}",
            delete(remove_attendee),
        )
        .route("/api/v1/import", post(import_csv))
        .route("/api/v1/attendance/ranking", get(ranking))
        .route("/api/v1/calendar", get(calendar_feed))
        .route("/api/v1/directory", get(directory))
        .layer(CorsLayer::permissive())
        .with_state(hub)
}

/// API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RankingQuery {
    period: Option<String>,
    months: Option<String>,
    from: Option<String>,
    to: Option<String>,
    day_type: Option<String>,
    affiliation: Option<String>,
    group: Option<String>,
    product: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AddAttendeeRequest {
    name: String,
}

// API Handlers

async fn health_check() -> Json<ApiResponse<&'static str>> {
    Json(ApiResponse::success("schedhub API is healthy"))
}

async fn list_events(
    State(hub): State<SharedHub>,
    Query(params): Query<ListQuery>,
) -> Json<ApiResponse<Vec<Event>>> {
    let hub = hub.read().await;
    match params.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        None => Json(ApiResponse::success(hub.events().to_vec())),
        Some(raw) => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(date) => Json(ApiResponse::success(
                hub.events_on(date).into_iter().cloned().collect(),
            )),
            Err(_) => Json(ApiResponse::error(format!("invalid date: {raw:?}"))),
        },
    }
}

async fn register_event(
    State(hub): State<SharedHub>,
    Json(event): Json<NewEvent>,
) -> Json<ApiResponse<Event>> {
    match hub.write().await.register(event).await {
        Ok(created) => Json(ApiResponse::success(created)),
        Err(e) => {
            warn!("Failed to register event: {}", e);
            Json(ApiResponse::error(format!("Failed to register event: {e}")))
        }
    }
}

async fn delete_event(
    State(hub): State<SharedHub>,
    Path(id): Path<String>,
) -> Json<ApiResponse<&'static str>> {
    match hub.write().await.delete_event(&id).await {
        Ok(()) => Json(ApiResponse::success("deleted")),
        Err(e) => {
            warn!("Failed to delete event {}: {}", id, e);
            Json(ApiResponse::error(format!("Failed to delete event: {e}")))
        }
    }
}

async fn add_attendee(
    State(hub): State<SharedHub>,
    Path(id): Path<String>,
    Json(request): Json<AddAttendeeRequest>,
) -> Json<ApiResponse<Event>> {
    match hub.write().await.add_attendee(&id, &request.name).await {
        Ok(updated) => Json(ApiResponse::success(updated)),
        Err(e) => {
            warn!("Failed to add attendee to {}: {}", id, e);
            Json(ApiResponse::error(format!("Failed to add attendee: {e}")))
        }
    }
}

async fn remove_attendee(
    State(hub): State<SharedHub>,
    Path((id, name)): Path<(String, String)>,
) -> Json<ApiResponse<Event>> {
    match hub.write().await.remove_attendee(&id, &name).await {
        Ok(updated) => Json(ApiResponse::success(updated)),
        Err(e) => {
            warn!("Failed to remove attendee from {}: {}", id, e);
            Json(ApiResponse::error(format!("Failed to remove attendee: {e}")))
        }
    }
}

async fn import_csv(State(hub): State<SharedHub>, body: String) -> Json<ApiResponse<ImportSummary>> {
    let batch = match import::parse_csv(body.as_bytes()) {
        Ok(batch) => batch,
        Err(e) => {
            warn!("Failed to parse import file: {}", e);
            return Json(ApiResponse::error(format!("Failed to parse import: {e}")));
        }
    };
    match hub.write().await.import(batch).await {
        Ok(summary) => Json(ApiResponse::success(summary)),
        Err(e) => {
            warn!("Import failed: {}", e);
            Json(ApiResponse::error(format!("Import failed: {e}")))
        }
    }
}

async fn ranking(
    State(hub): State<SharedHub>,
    Query(params): Query<RankingQuery>,
) -> Json<ApiResponse<Vec<AttendanceRow>>> {
    // `months=6` is shorthand for `period=6`.
    let period = params.period.as_deref().or(params.months.as_deref());
    let filter = ReportFilter::from_parts(
        period,
        params.from.as_deref(),
        params.to.as_deref(),
        params.day_type.as_deref(),
        params.affiliation.as_deref(),
        params.group.as_deref(),
        params.product.as_deref(),
    );
    match filter {
        Ok(filter) => Json(ApiResponse::success(hub.read().await.ranking(&filter))),
        Err(e) => Json(ApiResponse::error(e)),
    }
}

async fn calendar_feed(State(hub): State<SharedHub>) -> Json<ApiResponse<Vec<CalendarEntry>>> {
    let hub = hub.read().await;
    Json(ApiResponse::success(calendar_entries(hub.events())))
}

async fn directory(State(hub): State<SharedHub>) -> Json<ApiResponse<Vec<Employee>>> {
    let hub = hub.read().await;
    Json(ApiResponse::success(hub.directory().iter().cloned().collect()))
}
