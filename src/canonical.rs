//! Canonical JSON encoding.
//!
//! Produces a unique textual form for any JSON value so that structurally equal
//! documents encode to identical bytes:
//! - object keys are emitted in sorted order at every nesting level,
//! - no whitespace: `,` between elements, `:` between key and value,
//! - integers in plain decimal,
//! - strings escaped to ASCII only (`\uXXXX`, with surrogate pairs above the BMP).
//!
//! Non-integer numbers have no fixed textual form across producers and are
//! rejected with the path of the offending value.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Errors raised when a value has no canonical encoding.
#[derive(Debug, Error)]
pub enum CanonicalError {
    /// The value could not be converted into a JSON tree (e.g. a map with non-string keys).
    #[error("cannot serialize value: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A floating point number was found; only integers are encoded canonically.
    #[error("unsupported number {value} at `{path}`: only integers have a canonical form")]
    UnsupportedNumber { path: String, value: String },
}

impl CanonicalError {
    /// Path of the offending value, when the error is tied to one.
    pub fn path(&self) -> Option<&str> {
        match self {
            CanonicalError::UnsupportedNumber { path, .. } => Some(path),
            CanonicalError::Serialization(_) => None,
        }
    }
}

/// Serializes `value` and returns its canonical encoding.
pub fn canonical_json<T: Serialize + ?Sized>(value: &T) -> Result<String, CanonicalError> {
    let tree = serde_json::to_value(value)?;
    to_canonical_string(&tree)
}

/// Canonical encoding of an already-built JSON tree.
pub fn to_canonical_string(value: &Value) -> Result<String, CanonicalError> {
    let mut out = String::new();
    CanonicalWriter::new(&mut out).write_value(value)?;
    Ok(out)
}

/// Appends the canonical encoding of `value` to `out`.
///
/// `field` becomes the first segment of any error path, so a float nested in a
/// named field is reported as `field[0].key`.
pub fn write_canonical_field<'a>(
    out: &mut String,
    field: &'a str,
    value: &'a Value,
) -> Result<(), CanonicalError> {
    let mut writer = CanonicalWriter::new(out);
    writer.path.push(Segment::Key(field));
    writer.write_value(value)
}

enum Segment<'a> {
    Key(&'a str),
    Index(usize),
}

fn render_path(path: &[Segment<'_>]) -> String {
    let mut out = String::new();
    for segment in path {
        match segment {
            Segment::Key(key) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(key);
            }
            Segment::Index(i) => out.push_str(&format!("[{i}]")),
        }
    }
    if out.is_empty() {
        out.push_str("<root>");
    }
    out
}

struct CanonicalWriter<'o, 'v> {
    out: &'o mut String,
    path: Vec<Segment<'v>>,
}

impl<'o, 'v> CanonicalWriter<'o, 'v> {
    fn new(out: &'o mut String) -> Self {
        Self {
            out,
            path: Vec::new(),
        }
    }

    fn write_value(&mut self, value: &'v Value) -> Result<(), CanonicalError> {
        match value {
            Value::Null => self.out.push_str("null"),
            Value::Bool(true) => self.out.push_str("true"),
            Value::Bool(false) => self.out.push_str("false"),
            Value::Number(n) => {
                if let Some(u) = n.as_u64() {
                    self.out.push_str(&u.to_string());
                } else if let Some(i) = n.as_i64() {
                    self.out.push_str(&i.to_string());
                } else {
                    return Err(CanonicalError::UnsupportedNumber {
                        path: render_path(&self.path),
                        value: n.to_string(),
                    });
                }
            }
            Value::String(s) => write_escaped_str(self.out, s),
            Value::Array(items) => {
                self.out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.out.push(',');
                    }
                    self.path.push(Segment::Index(i));
                    self.write_value(item)?;
                    self.path.pop();
                }
                self.out.push(']');
            }
            Value::Object(map) => {
                // The map's own iteration order depends on serde_json features; sort explicitly.
                let mut entries: Vec<(&'v String, &'v Value)> = map.iter().collect();
                entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
                self.out.push('{');
                for (i, (key, item)) in entries.into_iter().enumerate() {
                    if i > 0 {
                        self.out.push(',');
                    }
                    write_escaped_str(self.out, key);
                    self.out.push(':');
                    self.path.push(Segment::Key(key));
                    self.write_value(item)?;
                    self.path.pop();
                }
                self.out.push('}');
            }
        }
        Ok(())
    }
}

fn write_escaped_str(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            ' '..='~' => out.push(c),
            _ => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    out.push_str(&format!("\\u{unit:04x}"));
                }
            }
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    #[test]
    fn keys_sorted_at_every_level() {
        let v = json!({"b": {"z": 1, "a": 2}, "a": [{"y": 0, "x": 1}]});
        assert_eq!(
            to_canonical_string(&v).unwrap(),
            r#"{"a":[{"x":1,"y":0}],"b":{"a":2,"z":1}}"#
        );
    }

    #[test]
    fn insertion_order_does_not_matter() {
        let a: Value = serde_json::from_str(r#"{"id": 73, "amount": 30}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"amount": 30, "id": 73}"#).unwrap();
        assert_eq!(to_canonical_string(&a).unwrap(), to_canonical_string(&b).unwrap());
    }

    #[test]
    fn scalars_and_empty_containers() {
        let v = json!([null, true, false, -5, 0, u64::MAX, "", [], {}]);
        assert_eq!(
            to_canonical_string(&v).unwrap(),
            r#"[null,true,false,-5,0,18446744073709551615,"",[],{}]"#
        );
    }

    #[test]
    fn strings_are_ascii_escaped() {
        let v = json!("a\"b\\c\n\t\u{8}\u{c}\r\u{1}\u{7f}é😀");
        assert_eq!(
            to_canonical_string(&v).unwrap(),
            r#""a\"b\\c\n\t\b\f\r\u0001\u007f\u00e9\ud83d\ude00""#
        );
    }

    #[test]
    fn keys_are_escaped_too() {
        let v = json!({"ü": 1});
        assert_eq!(to_canonical_string(&v).unwrap(), r#"{"\u00fc":1}"#);
    }

    #[test]
    fn float_rejected_with_path() {
        let v = json!({"outputs": [{"amount": 1.5, "id": 1}]});
        let err = to_canonical_string(&v).unwrap_err();
        assert_eq!(err.path(), Some("outputs[0].amount"));
        assert!(err.to_string().contains("1.5"));
    }

    #[test]
    fn float_at_root_reports_root() {
        let err = to_canonical_string(&json!(0.25)).unwrap_err();
        assert_eq!(err.path(), Some("<root>"));
    }

    #[test]
    fn field_prefix_starts_the_path() {
        let v = json!([{"amount": 2.0}]);
        let mut out = String::new();
        let err = write_canonical_field(&mut out, "transactions", &v).unwrap_err();
        assert_eq!(err.path(), Some("transactions[0].amount"));
    }

    #[test]
    fn non_string_map_keys_are_a_serialization_error() {
        let mut m: BTreeMap<Vec<u8>, u8> = BTreeMap::new();
        m.insert(vec![1, 2], 3);
        match canonical_json(&m).unwrap_err() {
            CanonicalError::Serialization(_) => {}
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn serializable_structs_encode_sorted() {
        #[derive(Serialize)]
        struct Out {
            id: u64,
            amount: u64,
        }
        assert_eq!(
            canonical_json(&Out { id: 73, amount: 30 }).unwrap(),
            r#"{"amount":30,"id":73}"#
        );
    }
}
