//! Dot 2 Connect lead-capture API library
//!
//! Accepts lead submissions over HTTP, stores them in MongoDB and lists
//! them back.
//!
//! # Modules
//!
//! - `config`: Configuration management.
//! - `db`: Document store gateway and the MongoDB implementation.
//! - `db_storage`: Lead persistence on top of the gateway.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `memory_store`: In-process document store.
//! - `models`: Lead data models and document mapping.
//! - `validation`: Inbound lead schema.

pub mod config;
pub mod db;
pub mod db_storage;
pub mod errors;
pub mod handlers;
pub mod memory_store;
pub mod models;
pub mod validation;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::handlers::AppState;

/// Largest request body accepted, in bytes.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Builds the HTTP router with all routes and middleware.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/api/hello", get(handlers::hello))
        .route(
            "/api/leads",
            post(handlers::create_lead).get(handlers::list_leads),
        )
        .route("/test", get(handlers::test_database))
        .with_state(state)
        .layer(ServiceBuilder::new().layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES)))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
