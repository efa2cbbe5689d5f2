/// Builds a [`Value`](crate::Value) from JSON-like syntax.
///
/// Object keys must be string literals. Any other leaf is converted with
/// [`to_value`](crate::to_value), falling back to `Null` when that fails.
///
/// ```rust
/// use confdoc::{value, Value};
///
/// let v = value!({ "name": "edge", "ports": [80, 443], "tls": true });
/// let doc = v.as_document().unwrap();
/// assert_eq!(doc.get_string("name").unwrap(), "edge");
/// assert_eq!(doc.get("tls").unwrap(), Value::Bool(true));
/// ```
#[macro_export]
macro_rules! value {
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::Array(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array(vec![$($crate::value!($elem)),*])
    };

    ({}) => {
        $crate::Value::Object($crate::Document::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::Map::new();
        $(
            object.insert($key.to_string(), $crate::value!($value));
        )*
        $crate::Value::Object($crate::Document::from_map(object))
    }};

    ($s:expr) => {
        $crate::to_value(&$s).unwrap_or($crate::Value::Null)
    };
}

/// Builds a [`Document`](crate::Document) from JSON-like object syntax.
///
/// Entries whose value is `null` are left out, matching
/// [`Document::set`](crate::Document::set).
///
/// ```rust
/// use confdoc::document;
///
/// let doc = document!({ "host": "localhost", "port": 8080, "proxy": null });
/// assert_eq!(doc.get_int("port").unwrap(), 8080);
/// assert!(!doc.has_key("proxy"));
/// ```
#[macro_export]
macro_rules! document {
    ({}) => {
        $crate::Document::new()
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::Map::new();
        $(
            let value = $crate::value!($value);
            if !value.is_null() {
                object.insert($key.to_string(), value);
            }
        )*
        $crate::Document::from_map(object)
    }};
}
