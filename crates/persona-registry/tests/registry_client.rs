//! Registry client tests against a mocked registry and token endpoint.

use std::sync::Arc;

use persona_core::{ErrorKind, GeoAffiliationKind, Gender, IdentGroup, SourceResult};
use persona_registry::{
    ClientCredentialsTokenProvider, RegistryClient, RegistryConfig, RegistrySource, TokenConfig,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const IDENT: &str = "12345678901";
const TRACE: &str = "trace-1";

async fn mount_token(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains("scope=api%3A%2F%2Fregistry%2F.default"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "Bearer",
            "access_token": "test-token",
            "expires_in": 3600
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn client(server: &MockServer) -> RegistryClient {
    let tokens = ClientCredentialsTokenProvider::new(TokenConfig {
        endpoint: format!("{}/token", server.uri()),
        client_id: "persona".to_string(),
        client_secret: "secret".to_string(),
        ..TokenConfig::default()
    })
    .expect("token provider");

    RegistryClient::new(
        RegistryConfig {
            url: format!("{}/graphql", server.uri()),
            scope: "api://registry/.default".to_string(),
            ..RegistryConfig::default()
        },
        Arc::new(tokens),
    )
    .expect("registry client")
}

#[tokio::test]
async fn test_identity_aliases_sends_headers_and_variables() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header("Authorization", "Bearer test-token"))
        .and(header("Nav-Call-Id", TRACE))
        .and(header("TEMA", "SYK"))
        .and(header("behandlingsnummer", "B139"))
        .and(body_partial_json(json!({
            "variables": {"ident": IDENT, "historikk": true}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "hentIdenter": {
                    "identer": [
                        {"ident": IDENT, "historisk": false, "gruppe": "FOLKEREGISTERIDENT"},
                        {"ident": "1234567890123", "historisk": false, "gruppe": "AKTORID"},
                        {"ident": "11111678901", "historisk": true, "gruppe": "FOLKEREGISTERIDENT"}
                    ]
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server).identity_aliases(IDENT, true, TRACE).await;

    let SourceResult::Found(aliases) = result else {
        panic!("expected aliases, got {result:?}");
    };
    assert_eq!(aliases.current_of(IdentGroup::ActorId), Some("1234567890123"));
    assert_eq!(aliases.historical.len(), 1);
}

#[tokio::test]
async fn test_token_is_reused_across_calls() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "hentGeografiskTilknytning": {
                    "gtType": "BYDEL",
                    "gtKommune": "0301",
                    "gtBydel": "030102",
                    "gtLand": null
                }
            }
        })))
        .expect(2)
        .mount(&server)
        .await;

    let client = client(&server);
    for _ in 0..2 {
        let result = client.geo_affiliation(IDENT, TRACE).await;
        let SourceResult::Found(geo) = result else {
            panic!("expected geo affiliation, got {result:?}");
        };
        assert_eq!(geo.kind, GeoAffiliationKind::District);
    }
}

#[tokio::test]
async fn test_person_not_found() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{
                "message": "Fant ikke person",
                "path": ["hentPerson"],
                "extensions": {"code": "not_found", "classification": "ExecutionAborted"}
            }],
            "data": {"hentPerson": null}
        })))
        .mount(&server)
        .await;

    let result = client(&server).person(IDENT, TRACE).await;
    assert!(matches!(result, SourceResult::NotFound));
}

#[tokio::test]
async fn test_person_found() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "hentPerson": {
                    "foedselsdato": [{"foedselsdato": "1992-09-16"}],
                    "navn": [{"fornavn": "FORNØYD", "mellomnavn": null, "etternavn": "FISK"}],
                    "adressebeskyttelse": [],
                    "kjoenn": [{"kjoenn": "MANN"}],
                    "doedsfall": []
                }
            }
        })))
        .mount(&server)
        .await;

    let result = client(&server).person(IDENT, TRACE).await;
    let SourceResult::Found(person) = result else {
        panic!("expected person, got {result:?}");
    };
    assert_eq!(person.first_name, "FORNØYD");
    assert_eq!(person.gender, Gender::Male);
}

#[tokio::test]
async fn test_guardianship_bad_request() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{
                "message": "Ugyldig ident",
                "extensions": {"code": "bad_request"}
            }],
            "data": {"hentPerson": null}
        })))
        .mount(&server)
        .await;

    let result = client(&server).guardianship(IDENT, TRACE).await;
    match result {
        SourceResult::Error(e) => {
            assert_eq!(e.kind, ErrorKind::BadRequest);
            assert_eq!(e.message, "Ugyldig ident");
        }
        other => panic!("expected bad request, got {other:?}"),
    }
}

#[tokio::test]
async fn test_non_success_status_is_generic_error() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = client(&server).person(IDENT, TRACE).await;
    match result {
        SourceResult::Error(e) => assert_eq!(e.kind, ErrorKind::Generic),
        other => panic!("expected generic error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_token_failure_is_generic_error_without_registry_call() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid_client"))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = client(&server).person(IDENT, TRACE).await;
    match result {
        SourceResult::Error(e) => assert_eq!(e.kind, ErrorKind::Generic),
        other => panic!("expected generic error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unparseable_body_is_generic_error() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = client(&server).geo_affiliation(IDENT, TRACE).await;
    match result {
        SourceResult::Error(e) => assert_eq!(e.kind, ErrorKind::Generic),
        other => panic!("expected generic error, got {other:?}"),
    }
}
