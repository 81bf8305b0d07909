//! GraphQL response envelope and its error-code taxonomy.

use std::collections::HashMap;

use persona_core::{LookupError, SourceResult};
use serde::Deserialize;

/// Standard `{data, errors}` response from the registry.
///
/// `data` holds exactly one field, named after the query
/// (`hentPerson`, `hentIdenter`, ...), whose value may be null.
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<HashMap<String, Option<T>>>,
    pub errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    pub extensions: Option<GraphQlExtensions>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlExtensions {
    pub code: Option<String>,
}

impl<T> GraphQlResponse<T> {
    /// Map the envelope onto a lookup outcome.
    ///
    /// A payload wins over any errors. Otherwise the first error's code
    /// decides: `not_found` and `bad_request` are recognized, every other
    /// code (including `unauthenticated`) is a generic error carrying it.
    pub fn into_result(self) -> SourceResult<T> {
        if let Some(value) = self.data.and_then(|data| data.into_values().flatten().next()) {
            return SourceResult::Found(value);
        }

        let Some(GraphQlError {
            message,
            extensions,
        }) = self.errors.and_then(|errors| errors.into_iter().next())
        else {
            return SourceResult::Error(LookupError::generic(
                "registry returned no data and no errors",
            ));
        };

        let code = extensions
            .and_then(|ext| ext.code)
            .unwrap_or_else(|| "unknown".to_string());

        match code.as_str() {
            "not_found" => SourceResult::NotFound,
            "bad_request" => SourceResult::Error(LookupError::bad_request(message)),
            _ => SourceResult::Error(LookupError::generic(message).with_code(code)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use persona_core::ErrorKind;
    use serde_json::Value;

    fn parse(body: &str) -> SourceResult<Value> {
        serde_json::from_str::<GraphQlResponse<Value>>(body)
            .expect("valid envelope")
            .into_result()
    }

    fn error_body(code: &str) -> String {
        format!(
            r#"{{
                "errors": [
                    {{
                        "message": "Fant ikke person",
                        "locations": [{{"line": 2, "column": 5}}],
                        "path": ["hentGeografiskTilknytning"],
                        "extensions": {{"code": "{code}", "classification": "ExecutionAborted"}}
                    }}
                ],
                "data": {{"hentGeografiskTilknytning": null}}
            }}"#
        )
    }

    #[test]
    fn test_payload_is_found() {
        let result = parse(
            r#"{"data": {"hentGeografiskTilknytning": {"gtType": "KOMMUNE", "gtKommune": "3112"}}}"#,
        );
        match result {
            SourceResult::Found(value) => assert_eq!(value["gtKommune"], "3112"),
            other => panic!("expected found, got {other:?}"),
        }
    }

    #[test]
    fn test_not_found_code() {
        assert!(matches!(parse(&error_body("not_found")), SourceResult::NotFound));
    }

    #[test]
    fn test_bad_request_code() {
        match parse(&error_body("bad_request")) {
            SourceResult::Error(e) => {
                assert_eq!(e.kind, ErrorKind::BadRequest);
                assert_eq!(e.message, "Fant ikke person");
            }
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn test_unauthenticated_is_generic_with_code() {
        match parse(&error_body("unauthenticated")) {
            SourceResult::Error(e) => {
                assert_eq!(e.kind, ErrorKind::Generic);
                assert_eq!(e.code.as_deref(), Some("unauthenticated"));
            }
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn test_unrecognized_code_is_generic() {
        match parse(&error_body("server_error")) {
            SourceResult::Error(e) => {
                assert_eq!(e.kind, ErrorKind::Generic);
                assert_eq!(e.code.as_deref(), Some("server_error"));
            }
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn test_no_data_and_no_errors_is_generic() {
        for body in [r#"{}"#, r#"{"data": null, "errors": []}"#, r#"{"data": {"hentPerson": null}}"#] {
            match parse(body) {
                SourceResult::Error(e) => assert_eq!(e.kind, ErrorKind::Generic),
                other => panic!("expected error for {body}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_payload_wins_over_errors() {
        let result = parse(
            r#"{
                "data": {"hentPerson": {"navn": []}},
                "errors": [{"message": "partial", "extensions": {"code": "not_found"}}]
            }"#,
        );
        assert!(result.is_found());
    }
}
