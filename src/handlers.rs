use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    Json,
};
use serde_json::Value;
use std::sync::Arc;

use crate::config::Config;
use crate::db::DocumentStore;
use crate::db_storage::LeadStorage;
use crate::errors::{AppError, ValidationError};
use crate::models::*;
use crate::validation::{validate_lead, validate_limit};

/// Longest slice of an error message the diagnostic endpoint will echo.
const DIAGNOSTIC_ERROR_CHARS: usize = 50;
/// Number of collection names the diagnostic endpoint reports.
const DIAGNOSTIC_COLLECTIONS: usize = 10;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration, read once at startup.
    pub config: Config,
    /// Document store gateway.
    pub store: Arc<dyn DocumentStore>,
    /// Lead persistence on top of `store`.
    pub storage: LeadStorage,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            config,
            storage: LeadStorage::new(store.clone()),
            store,
        }
    }
}

/// GET /
///
/// Liveness message.
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Dot 2 Connect backend is running".to_string(),
    })
}

/// GET /api/hello
pub async fn hello() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Hello from the backend API!".to_string(),
    })
}

/// POST /api/leads
///
/// Validates the submitted lead and stores it.
///
/// # Returns
///
/// * `Result<Json<CreateLeadResponse>, AppError>` - `{status: "success", id}`,
///   a 422 naming the offending fields, or a 500 carrying the storage error.
pub async fn create_lead(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<CreateLeadResponse>, AppError> {
    let Json(payload) =
        payload.map_err(|rejection| ValidationError::single("body", rejection.body_text()))?;

    let lead = validate_lead(&payload)?;
    tracing::info!("POST /api/leads - name={}, email={}", lead.name, lead.email);

    let id = state.storage.create_lead(&lead).await?;

    Ok(Json(CreateLeadResponse::success(id)))
}

/// GET /api/leads?limit=N
///
/// Lists up to `N` leads (default 10, allowed range 1..=100). The limit is
/// checked before the store is queried.
pub async fn list_leads(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ListLeadsQuery>, QueryRejection>,
) -> Result<Json<Vec<LeadResponse>>, AppError> {
    let Query(params) =
        query.map_err(|rejection| ValidationError::single("limit", rejection.body_text()))?;
    let limit = validate_limit(params.limit)?;
    tracing::info!("GET /api/leads - limit={}", limit);

    let leads = state.storage.list_leads(limit).await?;

    Ok(Json(leads))
}

/// GET /test
///
/// Reports backend and store status. Never fails: every problem is turned
/// into a status string so the endpoint keeps working as a probe while the
/// store is down.
pub async fn test_database(State(state): State<Arc<AppState>>) -> Json<DiagnosticsResponse> {
    let (database, connection_status, collections) = if state.store.is_connected() {
        match state.store.list_collection_names().await {
            Ok(names) => (
                "✅ Connected & Working".to_string(),
                "Connected",
                names.into_iter().take(DIAGNOSTIC_COLLECTIONS).collect(),
            ),
            Err(e) => {
                tracing::warn!("Diagnostic collection listing failed: {}", e);
                (
                    format!(
                        "⚠️  Connected but Error: {}",
                        truncate_chars(&e.to_string(), DIAGNOSTIC_ERROR_CHARS)
                    ),
                    "Connected",
                    Vec::new(),
                )
            }
        }
    } else {
        (
            "⚠️  Available but not initialized".to_string(),
            "Not Connected",
            Vec::new(),
        )
    };

    Json(DiagnosticsResponse {
        backend: "✅ Running".to_string(),
        database,
        database_url: set_marker(state.config.database_url.is_some()),
        database_name: set_marker(state.config.database_name.is_some()),
        connection_status: connection_status.to_string(),
        collections,
    })
}

fn set_marker(is_set: bool) -> String {
    let marker = if is_set { "✅ Set" } else { "❌ Not Set" };
    marker.to_string()
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
