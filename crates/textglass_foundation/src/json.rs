//! Conversions between [`Document`] and `serde_json` values.

use serde_json::{Map, Number, Value};

use crate::document::Document;

impl From<Value> for Document {
    fn from(value: Value) -> Self {
        Self::from(&value)
    }
}

impl From<&Value> for Document {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => Self::String(s.as_str().into()),
            Value::Array(items) => Self::Array(items.iter().map(Self::from).collect()),
            Value::Object(fields) => Self::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.as_str().into(), Self::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&Document> for Value {
    fn from(doc: &Document) -> Self {
        match doc {
            Document::Null => Self::Null,
            Document::Bool(b) => Self::Bool(*b),
            Document::Int(n) => Self::Number(Number::from(*n)),
            Document::Float(f) => Number::from_f64(*f).map_or(Self::Null, Self::Number),
            Document::String(s) => Self::String(s.to_string()),
            Document::Array(items) => Self::Array(items.iter().map(Self::from).collect()),
            Document::Object(fields) => Self::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.to_string(), Self::from(v)))
                    .collect::<Map<_, _>>(),
            ),
        }
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        Self::from(&doc)
    }
}
