//! Pet Records Web Front-End
//!
//! Browse, create and edit pet records held in the CRM.
//!
//! # Routes
//!
//! - `GET /` - listing of all records
//! - `GET /update-cobj` - empty create form
//! - `GET /update-cobj/:id` - edit form for the record with that external id
//! - `POST /update-cobj` - create-or-update, then redirect to `/`
//! - `GET /health`, `GET /health/ready` - liveness and CRM readiness
//!
//! Anything else is looked up in the static asset directory.
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_web::create_router;
//!
//! let app = create_router(service, &config.server);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;
pub mod views;

use axum::{
    Router,
    routing::get,
    middleware as axum_middleware,
};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use domain_pet::ReconciliationService;

use crate::config::ServerConfig;
use crate::handlers::{health, pets};
use crate::middleware::request_log_middleware;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: ReconciliationService,
}

/// Creates the application router
///
/// # Arguments
///
/// * `service` - Reconciliation service backed by the CRM port
/// * `config` - Server configuration
pub fn create_router(service: ReconciliationService, config: &ServerConfig) -> Router {
    let static_files = ServeDir::new(&config.static_dir);
    let state = AppState { service };

    let pet_routes = Router::new()
        .route("/", get(pets::list_pets))
        .route("/update-cobj", get(pets::new_pet_form).post(pets::submit_pet))
        .route("/update-cobj/:id", get(pets::edit_pet_form));

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    Router::new()
        .merge(pet_routes)
        .merge(health_routes)
        .fallback_service(static_files)
        .layer(axum_middleware::from_fn(request_log_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}
