//! Generic structured document value.
//!
//! Domain data arrives as already-decoded trees of objects, arrays, and
//! scalars. [`Document::get`] returns `None` for a missing key and
//! `Some(&Document::Null)` for a key explicitly set to null, so builders can
//! tell "absent" apart from "present but empty".

use std::fmt;
use std::sync::Arc;

use crate::collections::{DocMap, DocVec};

/// Object payload: field name to value, iterated in key order.
pub type DocObject = DocMap<Arc<str>, Document>;

/// Array payload.
pub type DocArray = DocVec<Document>;

/// A decoded structured document.
///
/// Values are immutable and cheaply cloneable; objects and arrays share
/// structure between versions.
#[derive(Clone, Default, PartialEq)]
pub enum Document {
    /// Explicit null.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integral number.
    Int(i64),
    /// Non-integral (or out of `i64` range) number.
    Float(f64),
    /// String value.
    String(Arc<str>),
    /// Ordered array.
    Array(DocArray),
    /// Object with unique field names.
    Object(DocObject),
}

impl Document {
    /// Creates an empty object.
    #[must_use]
    pub fn empty_object() -> Self {
        Self::Object(DocMap::new())
    }

    /// Creates an object from field/value pairs.
    pub fn object<K, I>(fields: I) -> Self
    where
        K: Into<Arc<str>>,
        I: IntoIterator<Item = (K, Document)>,
    {
        Self::Object(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Creates an array from values.
    pub fn array<I: IntoIterator<Item = Document>>(items: I) -> Self {
        Self::Array(items.into_iter().collect())
    }

    /// Returns a short name for the variant, for error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) | Self::Float(_) => "number",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    /// Returns true if this value is null.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns true if this value is an object.
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    /// Returns true if this value is an array.
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Attempts to extract a boolean value.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to extract an integer value.
    ///
    /// Floats with no fractional part are accepted.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Float(f) if f.fract() == 0.0 && f.is_finite() => Some(*f as i64),
            _ => None,
        }
    }

    /// Attempts to extract a string reference.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to extract an array reference.
    #[must_use]
    pub const fn as_array(&self) -> Option<&DocArray> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Attempts to extract an object reference.
    #[must_use]
    pub const fn as_object(&self) -> Option<&DocObject> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Looks up a field of an object.
    ///
    /// Returns `None` when this is not an object or the field is absent.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Document> {
        self.as_object().and_then(|o| o.get(key))
    }

    /// Follows a sequence of object fields.
    #[must_use]
    pub fn get_path(&self, path: &[&str]) -> Option<&Document> {
        path.iter().try_fold(self, |doc, key| doc.get(key))
    }

    /// Renders a scalar as text.
    ///
    /// Strings are returned as-is, numbers and booleans as their JSON text.
    /// Returns `None` for null, arrays, and objects.
    #[must_use]
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            Self::String(s) => Some(s.to_string()),
            Self::Bool(b) => Some(b.to_string()),
            Self::Int(n) => Some(n.to_string()),
            Self::Float(f) => Some(format!("{f:?}")),
            Self::Null | Self::Array(_) | Self::Object(_) => None,
        }
    }
}

impl From<bool> for Document {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Document {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for Document {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<f64> for Document {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<&str> for Document {
    fn from(s: &str) -> Self {
        Self::String(s.into())
    }
}

impl From<String> for Document {
    fn from(s: String) -> Self {
        Self::String(s.into())
    }
}

impl From<DocObject> for Document {
    fn from(o: DocObject) -> Self {
        Self::Object(o)
    }
}

impl From<DocArray> for Document {
    fn from(a: DocArray) -> Self {
        Self::Array(a)
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n:?}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Object(fields) => {
                write!(f, "{{")?;
                for (i, (k, v)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k:?}: {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}
