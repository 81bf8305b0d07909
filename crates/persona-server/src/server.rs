use std::net::SocketAddr;
use std::time::Duration;

use axum::routing::{get, post};
use axum::{Router, middleware};
use persona_lookup::LookupService;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub lookup: LookupService,
}

impl AppState {
    pub fn new(lookup: LookupService) -> Self {
        Self { lookup }
    }
}

pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        // Lookups
        .route(
            "/api/ident",
            post(handlers::identifiers).delete(handlers::purge),
        )
        .route("/api/person", post(handlers::person))
        .route(
            "/api/historical_identifiers",
            post(handlers::historical_identifiers),
        )
        .route("/api/guardianship", post(handlers::guardianship))
        .route(
            "/api/geographic_affiliation",
            post(handlers::geo_affiliation),
        )
        .route_layer(middleware::from_fn(crate::metrics::track_http))
        // Platform endpoints
        .route("/isalive", get(handlers::isalive))
        .route("/isready", get(handlers::isready))
        .route("/metrics", get(handlers::metrics))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    use tracing::field::Empty;
                    let call_id = req
                        .headers()
                        .get(handlers::CALL_ID_HEADER)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("")
                        .to_string();
                    tracing::info_span!(
                        "http.request",
                        http.method = %req.method(),
                        http.target = %req.uri().path(),
                        http.status_code = Empty,
                        call_id = %call_id
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>, latency: Duration, span: &tracing::Span| {
                        span.record("http.status_code", res.status().as_u16());
                        tracing::debug!(
                            http.status = %res.status().as_u16(),
                            elapsed_ms = %latency.as_millis(),
                            "request handled"
                        );
                    },
                ),
        )
        .layer(TimeoutLayer::new(request_timeout))
        .with_state(state)
}

pub struct PersonaServer {
    addr: SocketAddr,
    app: Router,
}

impl PersonaServer {
    pub fn new(addr: SocketAddr, app: Router) -> Self {
        Self { addr, app }
    }

    /// Serve until a shutdown signal arrives.
    pub async fn run(self) -> std::io::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
