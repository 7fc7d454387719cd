use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// Typed value read from an AE database.
///
/// Global-info entries are stored as text and decoded into the literal kind
/// they spell out (see [`crate::decode_literal`]). Row payloads of the
/// parameter and field-info tables map their SQL storage class onto the
/// scalar variants directly.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    Set(Vec<Value>),
    /// Key/value pairs in source order.
    Dict(Vec<(Value, Value)>),
}

impl Value {
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Float view; integers widen.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    fn write_repr(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("None"),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write_float(f, *x),
            Value::Str(s) => write_quoted(f, s),
            Value::Bytes(bytes) => {
                f.write_str("b'")?;
                for &b in bytes {
                    match b {
                        b'\\' => f.write_str("\\\\")?,
                        b'\'' => f.write_str("\\'")?,
                        b'\n' => f.write_str("\\n")?,
                        b'\t' => f.write_str("\\t")?,
                        b'\r' => f.write_str("\\r")?,
                        0x20..=0x7e => write!(f, "{}", b as char)?,
                        _ => write!(f, "\\x{:02x}", b)?,
                    }
                }
                f.write_str("'")
            }
            Value::List(items) => write_seq(f, "[", items, "]"),
            Value::Tuple(items) if items.len() == 1 => {
                f.write_str("(")?;
                items[0].write_repr(f)?;
                f.write_str(",)")
            }
            Value::Tuple(items) => write_seq(f, "(", items, ")"),
            Value::Set(items) if items.is_empty() => f.write_str("set()"),
            Value::Set(items) => write_seq(f, "{", items, "}"),
            Value::Dict(pairs) => {
                f.write_str("{")?;
                for (i, (key, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    key.write_repr(f)?;
                    f.write_str(": ")?;
                    value.write_repr(f)?;
                }
                f.write_str("}")
            }
        }
    }
}

fn write_float(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
    if x.is_nan() {
        f.write_str("nan")
    } else if x.is_infinite() {
        f.write_str(if x > 0.0 { "inf" } else { "-inf" })
    } else {
        write!(f, "{:?}", x)
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("'")?;
    for c in s.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '\'' => f.write_str("\\'")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            c => write!(f, "{}", c)?,
        }
    }
    f.write_str("'")
}

fn write_seq(f: &mut fmt::Formatter<'_>, open: &str, items: &[Value], close: &str) -> fmt::Result {
    f.write_str(open)?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        item.write_repr(f)?;
    }
    f.write_str(close)
}

/// Literal-style rendering. A top-level string prints bare; strings nested
/// in containers are quoted.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            other => other.write_repr(f),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::None => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(x) => serializer.serialize_f64(*x),
            Value::Str(s) => serializer.serialize_str(s),
            Value::Bytes(bytes) => bytes.serialize(serializer),
            Value::List(items) | Value::Tuple(items) | Value::Set(items) => {
                items.serialize(serializer)
            }
            Value::Dict(pairs) => {
                let mut map = serializer.serialize_map(Some(pairs.len()))?;
                for (key, value) in pairs {
                    match key {
                        Value::Str(key) => map.serialize_entry(key, value)?,
                        other => map.serialize_entry(&other.to_string(), value)?,
                    }
                }
                map.end()
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_top_level_string_is_bare() {
        assert_eq!(Value::from("Vallen AMSY-6").to_string(), "Vallen AMSY-6");
    }

    #[test]
    fn test_display_nested_values_use_literal_syntax() {
        let value = Value::Dict(vec![
            (Value::from("chans"), Value::List(vec![Value::Int(1), Value::Int(2)])),
            (Value::from("single"), Value::Tuple(vec![Value::Float(1.0)])),
            (Value::from("flag"), Value::Bool(false)),
            (Value::from("none"), Value::None),
        ]);

        assert_eq!(
            value.to_string(),
            "{'chans': [1, 2], 'single': (1.0,), 'flag': False, 'none': None}"
        );
    }

    #[test]
    fn test_as_f64_widens_integers() {
        assert_eq!(Value::Int(3).as_f64(), Some(3.0));
        assert_eq!(Value::from("3").as_f64(), None);
    }

    #[test]
    fn test_scalar_accessors_match_only_their_variant() {
        assert!(Value::None.is_none());
        assert!(!Value::Int(0).is_none());

        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Int(1).as_bool(), None);

        assert_eq!(Value::from("pri").as_str(), Some("pri"));
        assert_eq!(Value::Bytes(b"pri".to_vec()).as_str(), None);
        assert_eq!(Value::Float(1.5).as_i64(), None);
    }

    #[test]
    fn test_dict_serializes_as_object_with_text_keys() {
        let value = Value::Dict(vec![
            (Value::Int(1), Value::from("one")),
            (Value::from("two"), Value::Int(2)),
        ]);

        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json, serde_json::json!({"1": "one", "two": 2}));
    }
}
