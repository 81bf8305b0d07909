//! Payload builders shared by the integration tests.

#![allow(dead_code)]

use apache_avro::to_avro_datum;
use apache_avro::types::Value;
use persona_events::AvroSchemaDecoder;

pub const V2: &str = include_str!("../../schemas/personhendelse_v2.avsc");
pub const V3: &str = include_str!("../../schemas/personhendelse_v3.avsc");
pub const V4: &str = include_str!("../../schemas/personhendelse_v4.avsc");

#[derive(Clone, Copy)]
pub enum Generation {
    V2,
    V3,
    V4,
}

fn fields(opplysningstype: &str, subject: Option<&str>, related: &[&str]) -> Vec<(String, Value)> {
    let freg = match subject {
        Some(ident) => Value::Union(
            1,
            Box::new(Value::Record(vec![
                ("identifikasjonsnummer".into(), Value::String(ident.into())),
                ("type".into(), Value::String("FNR".into())),
                ("status".into(), Value::String("I_BRUK".into())),
            ])),
        ),
        None => Value::Union(0, Box::new(Value::Null)),
    };

    vec![
        ("hendelseId".into(), Value::String("7f0e2a6c".into())),
        (
            "personidenter".into(),
            Value::Array(related.iter().map(|s| Value::String(s.to_string())).collect()),
        ),
        ("master".into(), Value::String("FREG".into())),
        ("opprettet".into(), Value::Long(1_700_000_000_000)),
        ("opplysningstype".into(), Value::String(opplysningstype.into())),
        ("endringstype".into(), Value::Enum(0, "OPPRETTET".into())),
        ("tidligereHendelseId".into(), Value::Union(0, Box::new(Value::Null))),
        ("Folkeregisteridentifikator".into(), freg),
    ]
}

/// Framed payload written with the given generation.
pub fn payload(
    generation: Generation,
    opplysningstype: &str,
    subject: Option<&str>,
    related: &[&str],
) -> Vec<u8> {
    let mut fields = fields(opplysningstype, subject, related);
    let schema_json = match generation {
        Generation::V2 => V2,
        Generation::V3 => {
            fields.push(("navn".into(), Value::Union(0, Box::new(Value::Null))));
            V3
        }
        Generation::V4 => {
            fields.push(("navn".into(), Value::Union(0, Box::new(Value::Null))));
            fields.push(("doedsfall".into(), Value::Union(0, Box::new(Value::Null))));
            V4
        }
    };

    let decoder = AvroSchemaDecoder::new("test", schema_json).expect("schema");
    let body = to_avro_datum(decoder.schema(), Value::Record(fields)).expect("encode");

    let mut framed = vec![0, 0, 0, 0, 42];
    framed.extend(body);
    framed
}
