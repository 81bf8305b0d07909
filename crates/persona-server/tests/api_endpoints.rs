//! End-to-end API tests: the router on an ephemeral port, driven by reqwest.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use persona_cache::{CacheError, CacheStore, LocalCacheStore};
use persona_core::{
    AddressProtection, CacheKey, DeclaredGeoType, GeoAffiliation, Gender, Guardianship,
    GuardianshipType, Ident, IdentGroup, IdentityAliases, LookupError, Person, SourceResult,
};
use persona_lookup::{LookupService, TtlPolicy};
use persona_registry::RegistrySource;
use persona_server::{AppState, build_router};
use serde_json::{Value, json};
use time::macros::date;

const IDENT: &str = "12345678901";

#[derive(Clone, Copy)]
enum Mode {
    Found,
    NotFound,
    BadRequest,
    Generic,
}

struct FakeRegistry {
    mode: Mode,
    calls: AtomicUsize,
}

impl FakeRegistry {
    fn new(mode: Mode) -> Self {
        Self {
            mode,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn respond<T>(&self, value: T) -> SourceResult<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.mode {
            Mode::Found => SourceResult::Found(value),
            Mode::NotFound => SourceResult::NotFound,
            Mode::BadRequest => SourceResult::Error(LookupError::bad_request("invalid ident")),
            Mode::Generic => SourceResult::Error(
                LookupError::generic("registry unavailable").with_code("unauthenticated"),
            ),
        }
    }
}

#[async_trait]
impl RegistrySource for FakeRegistry {
    async fn identity_aliases(
        &self,
        _ident: &str,
        _include_history: bool,
        _trace_id: &str,
    ) -> SourceResult<IdentityAliases> {
        self.respond(IdentityAliases::partition([
            (Ident::new(IDENT, IdentGroup::NationalId), false),
            (Ident::new("1234567890123", IdentGroup::ActorId), false),
            (Ident::new("11111678901", IdentGroup::NationalId), true),
        ]))
    }

    async fn person(&self, _ident: &str, _trace_id: &str) -> SourceResult<Person> {
        self.respond(Person {
            birth_date: date!(1992 - 09 - 16),
            death_date: None,
            first_name: "FORNØYD".into(),
            middle_name: None,
            last_name: "FISK".into(),
            address_protection: AddressProtection::StrictlyConfidential,
            gender: Gender::Female,
        })
    }

    async fn guardianship(&self, _ident: &str, _trace_id: &str) -> SourceResult<Guardianship> {
        self.respond(Guardianship {
            arrangements: vec![GuardianshipType::Adult],
        })
    }

    async fn geo_affiliation(&self, _ident: &str, _trace_id: &str) -> SourceResult<GeoAffiliation> {
        self.respond(GeoAffiliation::classify(
            DeclaredGeoType::District,
            None,
            Some("0301".into()),
            Some("030102".into()),
        ))
    }
}

/// Store whose every operation fails.
struct UnavailableStore;

#[async_trait]
impl CacheStore for UnavailableStore {
    async fn get(&self, _key: &CacheKey) -> Result<Option<Vec<u8>>, CacheError> {
        Err(CacheError::unavailable("connection refused"))
    }

    async fn set(&self, _key: &CacheKey, _value: &[u8], _ttl: Duration) -> Result<(), CacheError> {
        Err(CacheError::unavailable("connection refused"))
    }

    async fn delete(&self, _key: &CacheKey) -> Result<bool, CacheError> {
        Err(CacheError::unavailable("connection refused"))
    }

    async fn is_available(&self) -> bool {
        false
    }

    fn mode(&self) -> &'static str {
        "unavailable"
    }
}

struct TestServer {
    base: String,
    client: reqwest::Client,
    registry: Arc<FakeRegistry>,
}

impl TestServer {
    async fn start(mode: Mode) -> Self {
        Self::start_with_store(mode, Arc::new(LocalCacheStore::new())).await
    }

    async fn start_with_store(mode: Mode, store: Arc<dyn CacheStore>) -> Self {
        let registry = Arc::new(FakeRegistry::new(mode));
        let lookup = LookupService::new(store, registry.clone(), TtlPolicy::default());
        let app = build_router(AppState::new(lookup), Duration::from_secs(5));

        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve");
        });

        Self {
            base: format!("http://{addr}"),
            client: reqwest::Client::new(),
            registry,
        }
    }

    async fn post(&self, path: &str, body: Value) -> (u16, Value) {
        let response = self
            .client
            .post(format!("{}{path}", self.base))
            .header("callId", "call-123")
            .json(&body)
            .send()
            .await
            .expect("request");
        let status = response.status().as_u16();
        (status, response.json().await.expect("json body"))
    }
}

#[tokio::test]
async fn identifiers_are_cached_until_purged() {
    let server = TestServer::start(Mode::Found).await;

    let (status, first) = server.post("/api/ident", json!({ "ident": IDENT })).await;
    assert_eq!(status, 200);
    assert_eq!(first["nationalId"], IDENT);
    assert_eq!(first["actorId"], "1234567890123");
    assert!(first["temporaryId"].is_null());
    assert_eq!(first["source"], "REGISTRY");

    let (status, second) = server.post("/api/ident", json!({ "ident": IDENT })).await;
    assert_eq!(status, 200);
    assert_eq!(second["source"], "CACHE");
    assert_eq!(second["actorId"], first["actorId"]);
    assert_eq!(server.registry.calls(), 1);

    let purged = server
        .client
        .delete(format!("{}/api/ident", server.base))
        .json(&json!({ "identifiers": [IDENT] }))
        .send()
        .await
        .expect("request");
    assert_eq!(purged.status().as_u16(), 200);
    let body: Value = purged.json().await.expect("json body");
    assert_eq!(body, json!({ "status": "OK" }));

    let (_, third) = server.post("/api/ident", json!({ "ident": IDENT })).await;
    assert_eq!(third["source"], "REGISTRY");
    assert_eq!(server.registry.calls(), 2);
}

#[tokio::test]
async fn person_geo_guardianship_and_history_bodies() {
    let server = TestServer::start(Mode::Found).await;

    let (status, person) = server.post("/api/person", json!({ "ident": IDENT })).await;
    assert_eq!(status, 200);
    assert_eq!(person["birthDate"], "1992-09-16");
    assert_eq!(person["addressProtection"], "STRICTLY_CONFIDENTIAL");
    assert_eq!(person["gender"], "FEMALE");
    assert_eq!(person["source"], "REGISTRY");

    let (_, geo) = server
        .post("/api/geographic_affiliation", json!({ "ident": IDENT }))
        .await;
    assert_eq!(geo["kind"], "DISTRICT");
    assert_eq!(geo["district"], "030102");

    let (_, guardianship) = server.post("/api/guardianship", json!({ "ident": IDENT })).await;
    assert_eq!(guardianship["arrangements"], json!(["ADULT"]));

    let (_, history) = server
        .post("/api/historical_identifiers", json!({ "ident": IDENT }))
        .await;
    assert_eq!(history["nationalIds"], json!(["11111678901"]));
}

#[tokio::test]
async fn not_found_is_404_with_call_id() {
    let server = TestServer::start(Mode::NotFound).await;

    let (status, body) = server.post("/api/person", json!({ "ident": IDENT })).await;
    assert_eq!(status, 404);
    assert_eq!(body["callId"], "call-123");
    assert!(body["message"].as_str().is_some());
}

#[tokio::test]
async fn registry_errors_map_to_status_codes() {
    let server = TestServer::start(Mode::BadRequest).await;
    let (status, body) = server.post("/api/ident", json!({ "ident": IDENT })).await;
    assert_eq!(status, 400);
    assert_eq!(body["message"], "invalid ident");

    let server = TestServer::start(Mode::Generic).await;
    let (status, body) = server.post("/api/ident", json!({ "ident": IDENT })).await;
    assert_eq!(status, 500);
    assert_eq!(body["callId"], "call-123");
}

#[tokio::test]
async fn malformed_body_is_400_and_generates_call_id() {
    let server = TestServer::start(Mode::Found).await;

    let response = server
        .client
        .post(format!("{}/api/ident", server.base))
        .header("content-type", "application/json")
        .body("{\"identifier\": 1}")
        .send()
        .await
        .expect("request");
    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.expect("json body");
    assert!(!body["callId"].as_str().unwrap_or_default().is_empty());

    let (status, _) = server.post("/api/ident", json!({ "ident": "  " })).await;
    assert_eq!(status, 400);
    assert_eq!(server.registry.calls(), 0);
}

#[tokio::test]
async fn unavailable_cache_degrades_lookups_but_fails_purge() {
    let server = TestServer::start_with_store(Mode::Found, Arc::new(UnavailableStore)).await;

    let (status, body) = server.post("/api/ident", json!({ "ident": IDENT })).await;
    assert_eq!(status, 200);
    assert_eq!(body["source"], "REGISTRY");

    let purged = server
        .client
        .delete(format!("{}/api/ident", server.base))
        .json(&json!({ "identifiers": [IDENT] }))
        .send()
        .await
        .expect("request");
    assert_eq!(purged.status().as_u16(), 500);

    let ready = server
        .client
        .get(format!("{}/isready", server.base))
        .send()
        .await
        .expect("request");
    assert_eq!(ready.status().as_u16(), 503);
}

#[tokio::test]
async fn platform_endpoints() {
    let server = TestServer::start(Mode::Found).await;

    for (path, expected) in [("/isalive", "ALIVE"), ("/isready", "READY")] {
        let response = server
            .client
            .get(format!("{}{path}", server.base))
            .send()
            .await
            .expect("request");
        assert_eq!(response.status().as_u16(), 200);
        assert_eq!(response.text().await.expect("text"), expected);
    }
}
