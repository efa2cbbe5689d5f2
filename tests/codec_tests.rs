use base64::{engine::general_purpose::STANDARD, Engine};
use confdoc::codec::{decode_envelope, encode_value};
use confdoc::{decode, encode, Class, DecodeError, Error, Foreign, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
enum Shape {
    Point,
    Circle { radius: f64 },
    Polygon(Vec<(i32, i32)>),
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
struct Drawing {
    name: String,
    layers: BTreeMap<String, Vec<Shape>>,
    scale: Option<f32>,
    tag: char,
}

fn drawing() -> Drawing {
    let mut layers = BTreeMap::new();
    layers.insert(
        "base".to_string(),
        vec![
            Shape::Point,
            Shape::Circle { radius: 2.5 },
            Shape::Polygon(vec![(0, 0), (1, 0), (0, 1)]),
        ],
    );
    layers.insert("empty".to_string(), vec![]);
    Drawing {
        name: "sketch".to_string(),
        layers,
        scale: Some(0.75),
        tag: 'λ',
    }
}

#[test]
fn test_nested_structures_round_trip() {
    let payload = encode(&drawing()).unwrap();
    assert_eq!(decode::<Drawing>(&payload).unwrap(), drawing());
}

#[test]
fn test_encoding_is_deterministic() {
    assert_eq!(encode(&drawing()).unwrap(), encode(&drawing()).unwrap());
}

#[test]
fn test_primitives_round_trip() {
    assert_eq!(decode::<i64>(&encode(&i64::MIN).unwrap()).unwrap(), i64::MIN);
    assert_eq!(
        decode::<String>(&encode(&String::new()).unwrap()).unwrap(),
        ""
    );
    assert_eq!(
        decode::<Option<u8>>(&encode(&Some(7u8)).unwrap()).unwrap(),
        Some(7)
    );
}

#[test]
fn test_encode_rejects_null() {
    assert!(matches!(encode(&None::<i32>), Err(Error::NullValue)));
    assert!(matches!(encode(&()), Err(Error::NullValue)));
    assert!(matches!(Foreign::new(None::<Drawing>), Err(Error::NullValue)));

    // only the outermost value is checked
    assert!(encode(&Some(None::<i32>)).is_ok());
    assert!(encode(&vec![None::<i32>]).is_ok());
    assert!(encode(&Drawing { scale: None, ..drawing() }).is_ok());
}

#[test]
fn test_decode_failure_kinds() {
    assert_eq!(decode::<Drawing>(""), Err(DecodeError::NullOrBlankInput));
    assert!(matches!(
        decode::<Drawing>("@@@"),
        Err(DecodeError::Base64(_))
    ));
    assert!(matches!(
        decode::<Drawing>(&STANDARD.encode(b"not an envelope at all")),
        Err(DecodeError::Structural(_))
    ));
    assert!(matches!(
        decode::<Shape>(&encode(&drawing()).unwrap()),
        Err(DecodeError::TypeResolution { .. })
    ));
}

#[test]
fn test_trailing_bytes_rejected() {
    let mut bytes = STANDARD.decode(encode(&7u32).unwrap()).unwrap();
    bytes.push(0);
    assert!(matches!(
        decode::<u32>(&STANDARD.encode(bytes)),
        Err(DecodeError::Structural(_))
    ));
}

#[test]
fn test_envelope_is_type_agnostic() {
    let payload = encode(&drawing()).unwrap();
    let encoded = decode_envelope(&payload).unwrap();
    assert!(encoded.type_name().ends_with("Drawing"));
    assert!(encoded.is::<Drawing>());
    assert_eq!(encoded.decode::<Drawing>().unwrap(), drawing());
}

#[test]
fn test_classification() {
    for native in [
        Value::Null,
        Value::Bool(true),
        Value::Char('c'),
        Value::Enum("A".to_string()),
        Value::Array(vec![]),
        Value::Object(confdoc::Document::new()),
    ] {
        assert_eq!(native.class(), Class::Native);
    }

    let foreign = Value::Foreign(Foreign::new(drawing()).unwrap());
    assert_eq!(foreign.class(), Class::Foreign);
}

#[test]
fn test_encode_value() {
    assert!(matches!(encode_value(&Value::Null), Err(Error::NullValue)));
    assert!(matches!(
        encode_value(&Value::from("text")),
        Err(Error::InvalidValue(_))
    ));

    let foreign = Foreign::new(drawing()).unwrap();
    let payload = encode_value(&Value::Foreign(foreign.clone())).unwrap();
    assert_eq!(payload, foreign.encode());
    assert_eq!(decode::<Drawing>(&payload).unwrap(), drawing());
}

#[test]
fn test_foreign_equality_follows_payload() {
    let a = Foreign::new(drawing()).unwrap();
    let mut other = drawing();
    other.tag = 'x';
    let b = Foreign::new(other).unwrap();

    assert_eq!(a, a.clone());
    assert_ne!(a, b);
    assert!(a.type_name().ends_with("Drawing"));
}
