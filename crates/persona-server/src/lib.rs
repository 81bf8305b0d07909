pub mod config;
pub mod handlers;
pub mod metrics;
pub mod observability;
pub mod server;

pub use config::{AppConfig, LogFormat, LoggingConfig, ServerConfig};
pub use handlers::{ApiError, CallId, ResponseSource};
pub use metrics::PrometheusLookupMetrics;
pub use observability::init_tracing;
pub use server::{AppState, PersonaServer, build_router};
