//! Change events extracted from decoded `Personhendelse` records.

use apache_avro::types::Value;
use indexmap::IndexSet;

/// Record type marking a change of national identifier.
pub const FOLKEREGISTERIDENTIFIKATOR_V1: &str = "FOLKEREGISTERIDENTIFIKATOR_V1";

/// The parts of a `Personhendelse` that drive invalidation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub opplysningstype: String,
    /// `Folkeregisteridentifikator.identifikasjonsnummer`, when present.
    pub subject: Option<String>,
    /// Subject first, then every related identifier, without duplicates.
    pub subject_identifiers: IndexSet<String>,
}

impl ChangeEvent {
    /// Extract from a decoded record. `None` when the value is not a record
    /// or has no `opplysningstype`.
    pub fn from_record(value: &Value) -> Option<Self> {
        let Value::Record(fields) = value else {
            return None;
        };

        let opplysningstype = string_value(field(fields, "opplysningstype")?)?.to_string();

        let subject = field(fields, "Folkeregisteridentifikator")
            .and_then(|v| match unwrap_union(v) {
                Value::Record(inner) => field(inner, "identifikasjonsnummer"),
                _ => None,
            })
            .and_then(string_value)
            .map(str::to_string);

        let mut subject_identifiers = IndexSet::new();
        if let Some(subject) = &subject {
            subject_identifiers.insert(subject.clone());
        }
        if let Some(Value::Array(related)) = field(fields, "personidenter").map(unwrap_union) {
            subject_identifiers.extend(related.iter().filter_map(string_value).map(str::to_string));
        }

        Some(Self {
            opplysningstype,
            subject,
            subject_identifiers,
        })
    }

    pub fn is_identifier_change(&self) -> bool {
        self.opplysningstype == FOLKEREGISTERIDENTIFIKATOR_V1
    }

    /// Identifiers to purge, in order.
    pub fn identifiers(&self) -> Vec<String> {
        self.subject_identifiers.iter().cloned().collect()
    }
}

fn field<'a>(fields: &'a [(String, Value)], name: &str) -> Option<&'a Value> {
    fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
}

fn unwrap_union(value: &Value) -> &Value {
    match value {
        Value::Union(_, inner) => inner,
        other => other,
    }
}

fn string_value(value: &Value) -> Option<&str> {
    match unwrap_union(value) {
        Value::String(s) => Some(s.as_str()),
        _ => None,
    }
}
