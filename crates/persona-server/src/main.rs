use std::sync::Arc;

use anyhow::Context;
use persona_events::{InvalidationConsumer, KafkaRecordSource, SchemaDecoder};
use persona_lookup::{LookupService, TtlPolicy};
use persona_registry::{ClientCredentialsTokenProvider, RegistryClient};
use persona_server::config::loader::{DEFAULT_CONFIG_FILE, configured_path, load_config};
use persona_server::{AppState, PersonaServer, PrometheusLookupMetrics, build_router};

#[tokio::main]
async fn main() {
    match dotenvy::dotenv() {
        Ok(_) => {}
        Err(e) if e.not_found() => {}
        Err(e) => eprintln!("Warning: failed to load .env file: {e}"),
    }

    let config_path = configured_path();
    let cfg = match load_config(config_path.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(2);
        }
    };

    persona_server::observability::init_tracing(&cfg.logging);
    match &config_path {
        Some(path) => tracing::info!(path = %path.display(), "Configuration loaded"),
        None => tracing::info!(path = DEFAULT_CONFIG_FILE, "Configuration loaded"),
    }

    if let Err(e) = run(cfg).await {
        tracing::error!(error = %format!("{e:#}"), "persona-server exiting");
        eprintln!("Fatal: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cfg: persona_server::AppConfig) -> anyhow::Result<()> {
    persona_server::metrics::init_metrics();

    let store = persona_cache::create_cache_store(&cfg.redis)
        .await
        .context("failed to set up cache store")?;
    tracing::info!(mode = store.mode(), "Cache store ready");

    let ttl = TtlPolicy::from_config(&cfg.cache).context("invalid cache TTLs")?;
    let tokens = Arc::new(
        ClientCredentialsTokenProvider::new(cfg.token.clone())
            .context("failed to build token provider")?,
    );
    let registry = Arc::new(
        RegistryClient::new(cfg.registry.clone(), tokens)
            .context("failed to build registry client")?,
    );
    let lookup = LookupService::new(store, registry, ttl)
        .with_metrics(Arc::new(PrometheusLookupMetrics));

    let consumer = if cfg.events.enabled {
        let source =
            KafkaRecordSource::new(&cfg.events).context("failed to create Kafka consumer")?;
        let decoder = Arc::new(SchemaDecoder::personhendelse().context("invalid event schemas")?);
        let handle = InvalidationConsumer::new(
            source,
            decoder,
            Arc::new(lookup.clone()),
            cfg.events.poll_timeout(),
        )
        .start();
        tracing::info!(topic = %cfg.events.topic, "Invalidation consumer started");
        Some(handle)
    } else {
        tracing::info!("Event consumption disabled, cache entries expire by TTL only");
        None
    };

    let app = build_router(AppState::new(lookup), cfg.request_timeout());
    let server = PersonaServer::new(cfg.addr(), app);

    let Some(consumer) = consumer else {
        return server.run().await.context("server error");
    };

    let served = tokio::select! {
        served = server.run() => served,
        consumed = consumer.join() => {
            consumed.context("invalidation consumer failed")?;
            anyhow::bail!("invalidation consumer stopped unexpectedly")
        }
    };

    consumer.stop();
    consumer.join().await.context("invalidation consumer failed")?;
    served.context("server error")
}
