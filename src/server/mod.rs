//! HTTP server: the JSON API consumed by the browser front-end.
//!
//! [`build_router`] is shared by `attendlog serve` and the HTTP integration
//! tests so both run the exact same middleware stack.

pub mod auth;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod response;
pub mod state;

use std::time::Duration;

use axum::Router;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use axum::middleware;
use axum::routing::{delete, get, post};
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::{Config, ServerConfig};
use crate::db::initialize::init_db;
use crate::db::pool::{DbPool, SharedPool};
use crate::errors::{AppError, AppResult};
use handlers::{academic_years, attendance, classes, health, settings, students, teachers};
use state::AppState;

/// Every `/api` route. Mutating methods sit behind the API-key guard.
fn api_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/attendance/checkin", post(attendance::checkin))
        .route("/attendance/stats", get(attendance::stats))
        .route("/attendance/entries", get(attendance::entries))
        .route("/attendance/report", get(attendance::report))
        .route("/attendance/report/export", get(attendance::export))
        .route("/attendance/all", delete(attendance::delete_all))
        .route(
            "/settings",
            get(settings::get_settings).put(settings::put_settings),
        )
        .route(
            "/academic-years",
            get(academic_years::list).post(academic_years::create),
        )
        .route(
            "/academic-years/{id}",
            get(academic_years::get)
                .put(academic_years::update)
                .delete(academic_years::delete),
        )
        .route("/classes", get(classes::list).post(classes::create))
        .route(
            "/classes/{id}",
            axum::routing::put(classes::update).delete(classes::delete),
        )
        .route("/students", get(students::list).post(students::create))
        .route(
            "/students/{id}",
            get(students::get)
                .put(students::update)
                .delete(students::delete),
        )
        .route("/teachers", get(teachers::list).post(teachers::create))
        .route(
            "/teachers/{id}",
            get(teachers::get)
                .put(teachers::update)
                .delete(teachers::delete),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key,
        ))
}

/// Build the application router with all middleware layers.
///
/// Layers apply bottom-up: CORS, request id, tracing, request id
/// propagation, timeout, panic recovery.
pub fn build_router(state: AppState) -> AppResult<Router> {
    let cors = build_cors_layer(&state.config.server)?;
    let request_id_header = HeaderName::from_static("x-request-id");
    let timeout = Duration::from_secs(state.config.server.request_timeout_secs.max(1));

    Ok(Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api_routes(&state))
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state))
}

/// CORS from configuration. No origins configured means any origin,
/// without credentials.
pub fn build_cors_layer(config: &ServerConfig) -> AppResult<CorsLayer> {
    let api_key_header = HeaderName::from_static("x-api-key");

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION, api_key_header])
        .max_age(Duration::from_secs(3600));

    if config.cors_origins.is_empty() {
        return Ok(layer.allow_origin(AllowOrigin::any()));
    }

    let origins = config
        .cors_origins
        .iter()
        .map(|o| {
            o.parse::<HeaderValue>()
                .map_err(|e| AppError::Config(format!("Invalid CORS origin '{o}': {e}")))
        })
        .collect::<AppResult<Vec<_>>>()?;

    Ok(layer.allow_origin(origins).allow_credentials(true))
}

/// Migrate the database, bind and serve until SIGINT/SIGTERM.
pub async fn serve(config: Config) -> AppResult<()> {
    {
        let pool = DbPool::new(&config.database)?;
        init_db(&pool.conn)?;
    }

    let pool = SharedPool::open(&config.database)?;
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let auth = config.server.api_key.is_some();
    let database = config.database.clone();

    let app = build_router(AppState::new(pool, config))?;

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, %database, auth, "attendlog server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
