//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, body limit, request ID)
//! - Decode inbound paths and hand them to the site
//! - Expose the live worker count for diagnostics

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Response,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::config::SiteConfig;
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::http::response;
use crate::path::PathSpec;
use crate::site::Site;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub site: Site,
}

/// HTTP front end of one site.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server serving `site`.
    pub fn new(config: &SiteConfig, site: Site) -> Self {
        let state = AppState { site };
        let router = Self::build_router(config, state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &SiteConfig, state: AppState) -> Router {
        Router::new()
            .route("/nrservers", any(worker_count_handler))
            .route("/workers", any(worker_count_handler))
            .route("/{*path}", any(delay_handler))
            .route("/", any(delay_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http())
                    .layer(propagate_request_id_layer())
                    .layer(RequestBodyLimitLayer::new(config.limits.max_body_size)),
            )
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Serve the head of the posted path and relay the rest.
async fn delay_handler(State(state): State<AppState>, headers: HeaderMap, body: Body) -> Response {
    let request_id = request_id(&headers).to_string();

    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Failed to read body");
            return response::text(
                StatusCode::BAD_REQUEST,
                format!("Error occurred on reading body: {}\n", e),
            );
        }
    };

    let path: PathSpec = match serde_json::from_slice(&bytes) {
        Ok(path) => path,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Malformed path");
            return response::text(
                StatusCode::BAD_REQUEST,
                format!("Error occurred on json decoding: {}\n", e),
            );
        }
    };

    if path.is_empty() {
        tracing::warn!(request_id = %request_id, path_id = %path.id, "Path without sites");
        return response::text(StatusCode::BAD_REQUEST, "You should at least specify one site\n");
    }

    tracing::debug!(
        request_id = %request_id,
        path_id = %path.id,
        hops = path.len(),
        "Path received"
    );

    match state.site.process(path).await {
        Ok(report) => response::report(&report),
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Hop failed");
            response::site_error(&e)
        }
    }
}

/// Live worker count as plain text.
async fn worker_count_handler(State(state): State<AppState>) -> String {
    format!("{}\n", state.site.scheduler().worker_count())
}
