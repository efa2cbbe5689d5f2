use confdoc::{Document, Error, KeyError, TextOptions, Value};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Copy)]
enum Sample {
    One,
    Two,
    Three,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
struct AdditionalData {
    i: i32,
    s: String,
    e: Sample,
    f: f32,
}

fn additional() -> AdditionalData {
    AdditionalData {
        i: 123,
        s: "Hello World!".to_string(),
        e: Sample::Three,
        f: 456.78,
    }
}

fn reparse(doc: &Document) -> Document {
    Document::parse(&doc.to_text()).unwrap()
}

fn filled() -> Document {
    let doc = Document::new();
    doc.set("bool", true).unwrap();
    doc.set("byte", 99i8).unwrap();
    doc.set("short", 999i16).unwrap();
    doc.set("char", 'r').unwrap();
    doc.set("int", 99999).unwrap();
    doc.set("long", 99999999i64).unwrap();
    doc.set("float", 1.23f32).unwrap();
    doc.set("double", 12345.6789f64).unwrap();
    doc.set("string", "test").unwrap();
    doc.set_enum("enum", &Sample::One).unwrap();
    doc
}

fn assert_scalars(doc: &Document) {
    assert!(doc.get_bool("bool").unwrap());
    assert_eq!(doc.get_byte("byte").unwrap(), 99);
    assert_eq!(doc.get_short("short").unwrap(), 999);
    assert_eq!(doc.get_char("char").unwrap(), 'r');
    assert_eq!(doc.get_int("int").unwrap(), 99999);
    assert_eq!(doc.get_long("long").unwrap(), 99999999);
    assert_eq!(doc.get_float("float").unwrap(), 1.23);
    assert_eq!(doc.get_double("double").unwrap(), 12345.6789);
    assert_eq!(doc.get_string("string").unwrap(), "test");
    assert_eq!(doc.get_enum::<Sample>("enum").unwrap(), Sample::One);
}

#[test]
fn test_scalars_through_typed_getters() {
    let doc = filled();
    assert_scalars(&doc);
    assert_scalars(&reparse(&doc));
}

#[test]
fn test_plain_get_keeps_width_until_reparse() {
    let doc = filled();
    assert_eq!(doc.get("byte").unwrap(), Value::Byte(99));
    assert_eq!(doc.get("float").unwrap(), Value::Float(1.23));
    assert_eq!(doc.get("enum").unwrap(), Value::Enum("One".to_string()));

    let reloaded = reparse(&doc);
    assert_eq!(reloaded.get("byte").unwrap(), Value::Int(99));
    assert!(matches!(reloaded.get("float").unwrap(), Value::Double(_)));
    assert_eq!(reloaded.get("char").unwrap(), Value::String("r".to_string()));
    assert_eq!(reloaded.get("enum").unwrap(), Value::String("One".to_string()));
}

#[test]
fn test_long_narrows_after_reparse() {
    let doc = Document::new();
    doc.set("long", 99999999i64).unwrap();
    assert_eq!(doc.get("long").unwrap(), Value::Long(99999999));

    let reloaded = reparse(&doc);
    assert_eq!(reloaded.get("long").unwrap(), Value::Int(99999999));
    assert_eq!(reloaded.get_long("long").unwrap(), 99999999);
}

#[test]
fn test_encoded_round_trip() {
    let doc = Document::new();
    assert!(doc.set_encoded("extra", &additional()).unwrap().is_none());
    assert_eq!(doc.get_encoded::<AdditionalData>("extra").unwrap(), additional());

    let reloaded = reparse(&doc);
    assert_eq!(
        reloaded.get_encoded::<AdditionalData>("extra").unwrap(),
        additional()
    );

    let raw = reloaded.get("extra").unwrap();
    assert!(raw.is_string());
    assert_eq!(raw, doc.get("extra").unwrap());
}

#[test]
fn test_set_encoded_returns_previous_payload() {
    let doc = Document::new();
    doc.set_encoded("extra", &additional()).unwrap();

    let mut changed = additional();
    changed.i = 7;
    let previous = doc.set_encoded("extra", &changed).unwrap().unwrap();
    assert!(previous.is::<AdditionalData>());
    assert_eq!(previous.decode::<AdditionalData>().unwrap(), additional());

    doc.set("plain", "not a payload").unwrap();
    assert!(doc.set_encoded("plain", &changed).unwrap().is_none());
}

#[test]
fn test_set_encoded_rejects_null() {
    let doc = Document::new();
    doc.set_encoded("window", &(800u32, 600u32)).unwrap();

    assert!(matches!(
        doc.set_encoded("window", &None::<(u32, u32)>),
        Err(Error::NullValue)
    ));
    assert_eq!(doc.get_encoded::<(u32, u32)>("window").unwrap(), (800, 600));
    assert!(matches!(
        doc.set_encoded("fresh", &None::<u8>),
        Err(Error::NullValue)
    ));
    assert!(!doc.has_key("fresh"));
}

#[test]
fn test_get_encoded_errors() {
    let doc = Document::new();
    doc.set("blank", "   ").unwrap();
    doc.set("text", "hello").unwrap();
    doc.set("number", 5).unwrap();
    doc.set_encoded("pair", &(1u8, 2u8)).unwrap();

    assert!(matches!(
        doc.get_encoded::<AdditionalData>("missing"),
        Err(confdoc::DecodeError::Key(KeyError::Missing { .. }))
    ));
    assert!(matches!(
        doc.get_encoded::<AdditionalData>("number"),
        Err(confdoc::DecodeError::Key(KeyError::Mismatch { .. }))
    ));
    assert_eq!(
        doc.get_encoded::<AdditionalData>("blank"),
        Err(confdoc::DecodeError::NullOrBlankInput)
    );
    assert!(doc.get_encoded::<AdditionalData>("text").is_err());
    assert!(matches!(
        doc.get_encoded::<AdditionalData>("pair"),
        Err(confdoc::DecodeError::TypeResolution { .. })
    ));
}

#[test]
fn test_defaults_are_total() {
    let doc = Document::new();
    doc.set("string", "text").unwrap();
    doc.set("array", vec![1, 2]).unwrap();

    for key in ["missing", "string", "array"] {
        assert!(doc.get_bool_or(key, true));
        assert_eq!(doc.get_byte_or(key, -3), -3);
        assert_eq!(doc.get_short_or(key, -4), -4);
        assert_eq!(doc.get_char_or(key, 'z'), 'z');
        assert_eq!(doc.get_int_or(key, 42), 42);
        assert_eq!(doc.get_long_or(key, 43), 43);
        assert_eq!(doc.get_float_or(key, 0.5), 0.5);
        assert_eq!(doc.get_double_or(key, 0.25), 0.25);
        assert_eq!(doc.get_enum_or(key, Sample::Two), Sample::Two);
        assert_eq!(
            doc.get_encoded_or(key, additional()),
            additional()
        );
        assert!(doc.get_document_or(key, Document::new()).is_empty());
    }

    assert_eq!(doc.get_string_or("missing", "fallback"), "fallback");
    assert_eq!(doc.get_string_or("array", "fallback"), "fallback");
    assert_eq!(doc.get_array_or("string", vec![]), Vec::<Value>::new());
    assert_eq!(doc.get_or("missing", 1), Value::Int(1));
}

#[test]
fn test_is_encoded_object() {
    let doc = Document::new();
    doc.set_encoded("extra", &additional()).unwrap();
    doc.set("text", "Hello World!").unwrap();
    doc.set("base64_text", "aGVsbG8gd29ybGQ=").unwrap();
    doc.set("number", 1).unwrap();
    doc.set_foreign("foreign", additional()).unwrap();

    assert!(doc.is_encoded_object("extra"));
    assert!(doc.is_encoded_object_of::<AdditionalData>("extra"));
    assert!(!doc.is_encoded_object_of::<String>("extra"));
    assert!(!doc.is_encoded_object("text"));
    assert!(!doc.is_encoded_object("base64_text"));
    assert!(!doc.is_encoded_object("number"));
    assert!(!doc.is_encoded_object("missing"));
    assert!(!doc.is_encoded_object("foreign"));

    assert!(reparse(&doc).is_encoded_object("extra"));
}

#[test]
fn test_views_share_tree() {
    let root = Document::new();
    let child = Document::new();
    root.set_document("child", &child).unwrap();

    let view = root.get_document("child").unwrap();
    view.set("x", 1).unwrap();
    assert_eq!(child.get_int("x").unwrap(), 1);

    child.set("y", 2).unwrap();
    assert_eq!(
        root.get_document("child").unwrap().get_int("y").unwrap(),
        2
    );
    assert!(view.same_tree(&child));

    let alias = root.share();
    alias.remove("child");
    assert!(!root.has_key("child"));
}

#[test]
fn test_parsed_copies_are_independent() {
    let doc = Document::new();
    doc.set("a", 1).unwrap();

    let copy = reparse(&doc);
    copy.set("a", 2).unwrap();
    assert_eq!(doc.get_int("a").unwrap(), 1);
    assert!(!copy.same_tree(&doc));
}

#[test]
fn test_encode_unknown_only_affects_text() {
    let doc = Document::new();
    doc.set_foreign("extra", additional()).unwrap();
    doc.set("name", "edge").unwrap();

    let plain = Document::parse(&doc.to_text()).unwrap();
    let extra = plain.get_document("extra").unwrap();
    assert_eq!(extra.get_int("i").unwrap(), 123);
    assert_eq!(extra.get_string("e").unwrap(), "Three");
    assert!(!plain.is_encoded_object("extra"));

    let text = doc.to_text_with(&TextOptions::new().with_encode_unknown(true));
    let encoded = Document::parse(&text).unwrap();
    assert_eq!(
        encoded.get_encoded::<AdditionalData>("extra").unwrap(),
        additional()
    );
    assert_eq!(encoded.get_string("name").unwrap(), "edge");

    // the document still holds the live value
    let foreign = doc.get_foreign("extra").unwrap();
    assert_eq!(foreign.downcast_ref::<AdditionalData>(), Some(&additional()));
}

#[test]
fn test_keys_in_insertion_order() {
    let doc = filled();
    let keys: Vec<_> = doc.keys().into_iter().collect();
    assert_eq!(
        keys,
        vec!["bool", "byte", "short", "char", "int", "long", "float", "double", "string", "enum"]
    );
}

#[test]
fn test_to_text_is_compact() {
    let doc = Document::new();
    doc.set("a", 1).unwrap();
    doc.set("b", vec!["x", "y"]).unwrap();
    assert_eq!(doc.to_text(), r#"{"a":1,"b":["x","y"]}"#);
    assert_eq!(doc.to_string(), doc.to_text());
}

#[test]
fn test_invalid_values() {
    let doc = Document::new();
    assert!(matches!(doc.set("nan", f64::NAN), Err(Error::InvalidValue(_))));
    assert!(matches!(
        doc.set_enum("enum", &"not an enum"),
        Err(Error::InvalidValue(_))
    ));
}

#[test]
fn test_mismatch_reports_types() {
    let doc = Document::new();
    doc.set("name", "edge").unwrap();

    match doc.get_int("name") {
        Err(KeyError::Mismatch {
            key,
            expected,
            found,
        }) => {
            assert_eq!(key, "name");
            assert_eq!(expected, "int");
            assert_eq!(found, "string");
        }
        other => panic!("expected mismatch, got {:?}", other),
    }
}
