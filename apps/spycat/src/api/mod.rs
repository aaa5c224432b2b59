//! # Spycat HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! - `GET /cats`, `POST /cats`, `GET /cats/{id}`, `PUT /cats/{id}` (salary)
//! - `GET /missions`, `POST /missions`
//! - `GET /missions/{id}`, `PUT /missions/{id}`, `DELETE /missions/{id}`
//! - `PUT /complete/{id}` - Complete a mission
//! - `PUT /assigncat` - Assign a cat to a mission
//! - `GET /targets`, `PUT /targets/{id}`, `DELETE /targets/{id}`
//! - `POST /addtarget/{id}` - Add a target to a mission
//! - `PUT /updatenotes/{id}` - Update a target's notes
//! - `GET /health`, `GET /status`, `GET /hello`

mod handlers;
mod middleware;
mod types;

pub use middleware::{GlobalRateLimiter, create_rate_limiter};
pub use handlers::{
    add_target_handler, assign_cat_handler, complete_mission_handler, create_cat_handler,
    create_mission_handler, delete_mission_handler, delete_target_handler, get_cat_handler,
    get_mission_handler, health_handler, hello_handler, list_cats_handler, list_missions_handler,
    list_targets_handler, status_handler, update_mission_handler, update_notes_handler,
    update_salary_handler, update_target_handler,
};
pub use types::{
    ApiError, AssignRequest, AssignResponse, CatRequest, CatResponse, CompleteResponse,
    ErrorResponse, HealthResponse, MissionRequest, MissionResponse, MissionUpdateRequest,
    NotesBody, SalaryRequest, StatusResponse, TargetBody, TargetResponse, status_for,
};

use crate::breeds::BreedCatalog;
use crate::config::ServerConfig;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post, put},
};
use spycat_core::{AgencyError, Engine, StorageBackend};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state.
///
/// Every mutation takes the engine write lock, which serializes each
/// read-decide-write sequence.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RwLock<Engine<StorageBackend>>>,
    pub breeds: Arc<BreedCatalog>,
}

impl AppState {
    #[must_use]
    pub fn new(engine: Engine<StorageBackend>, breeds: BreedCatalog) -> Self {
        Self {
            engine: Arc::new(RwLock::new(engine)),
            breeds: Arc::new(breeds),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

const ALLOWED_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::OPTIONS,
];

/// Build the CORS layer.
///
/// - `None`: localhost only
/// - `["*"]`: every origin
/// - otherwise: the listed origins, falling back to localhost if none parse
fn build_cors_layer(origins: Option<&[String]>) -> CorsLayer {
    match origins {
        Some([only]) if only == "*" => {
            tracing::warn!("CORS: Allowing ALL origins. This is insecure for production!");
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|s| match s.trim().parse::<HeaderValue>() {
                    Ok(hv) => {
                        tracing::info!("CORS: Allowing origin: {}", s.trim());
                        Some(hv)
                    }
                    Err(e) => {
                        tracing::warn!("CORS: Invalid origin '{}': {}", s, e);
                        None
                    }
                })
                .collect();

            if allowed.is_empty() {
                tracing::warn!("CORS: No valid origins configured, defaulting to localhost only");
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed)
                    .allow_methods(ALLOWED_METHODS)
                    .allow_headers([header::CONTENT_TYPE])
            }
        }
        None => build_localhost_cors(),
    }
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:8080",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:8080",
    ]
    .into_iter()
    .filter_map(|o| o.parse().ok())
    .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(ALLOWED_METHODS)
        .allow_headers([header::CONTENT_TYPE])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Body limit
/// 4. Rate Limiting - global quota (if enabled)
pub fn create_router(state: AppState, config: &ServerConfig) -> Router {
    let cors = build_cors_layer(config.cors_origins.as_deref());

    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/status", get(handlers::status_handler))
        .route("/hello", get(handlers::hello_handler))
        .route(
            "/cats",
            get(handlers::list_cats_handler).post(handlers::create_cat_handler),
        )
        .route(
            "/cats/{id}",
            get(handlers::get_cat_handler).put(handlers::update_salary_handler),
        )
        .route(
            "/missions",
            get(handlers::list_missions_handler).post(handlers::create_mission_handler),
        )
        .route(
            "/missions/{id}",
            get(handlers::get_mission_handler)
                .put(handlers::update_mission_handler)
                .delete(handlers::delete_mission_handler),
        )
        .route("/complete/{id}", put(handlers::complete_mission_handler))
        .route("/assigncat", put(handlers::assign_cat_handler))
        .route("/targets", get(handlers::list_targets_handler))
        .route(
            "/targets/{id}",
            put(handlers::update_target_handler).delete(handlers::delete_target_handler),
        )
        .route("/addtarget/{id}", post(handlers::add_target_handler))
        .route("/updatenotes/{id}", put(handlers::update_notes_handler));

    if config.rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", config.rate_limit);
        router = router.layer(axum_middleware::from_fn_with_state(
            create_rate_limiter(config.rate_limit),
            middleware::rate_limit_middleware,
        ));
    } else {
        tracing::info!("Rate limiting disabled");
    }

    router
        .layer(axum::extract::DefaultBodyLimit::max(config.body_limit_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server and run until Ctrl-C.
pub async fn run_server(state: AppState, config: &ServerConfig) -> Result<(), AgencyError> {
    let router = create_router(state, config);
    let addr = config.addr();

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AgencyError::Io(format!("Bind failed: {}", e)))?;

    tracing::info!("Spycat HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AgencyError::Io(format!("Server error: {}", e)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining connections");
}
