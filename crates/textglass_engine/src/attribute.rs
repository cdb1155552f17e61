//! Attribute definitions and inheritance along the pattern hierarchy.
//!
//! Each scope (the domain-wide `*` scope or a pattern id) sets or removes
//! keys. A pattern's attributes are the defaults overlaid by every scope from
//! its root ancestor down to itself; the deepest write wins per key. The
//! flattened map is computed once per pattern when the store is built.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::Serialize;
use textglass_foundation::{Document, Error, Result};
use textglass_transform::{TransformerPipeline, TransformerRegistry};
use tracing::debug;

use crate::pattern::PatternStore;

/// Scope holding domain-wide default attributes.
pub const DEFAULT_SCOPE: &str = "*";

const ATTRIBUTES_FIELD: &str = "attributes";

// =============================================================================
// Attributes
// =============================================================================

/// Final key/value attributes of a classification.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, String>);

impl Attributes {
    /// Creates an empty attribute map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets a value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Checks if `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Sets a value, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Returns the number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over key/value pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Consumes the map, returning the underlying `BTreeMap`.
    #[must_use]
    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

// =============================================================================
// Attribute Values
// =============================================================================

/// An attribute computed from the original input at classification time.
#[derive(Clone, Debug)]
pub struct DerivedAttribute {
    pipeline: TransformerPipeline,
    default_value: Option<String>,
}

impl DerivedAttribute {
    /// Runs the pipeline over `input`, falling back to the default value.
    #[must_use]
    pub fn evaluate(&self, input: &str) -> Option<String> {
        self.pipeline
            .try_apply(input)
            .or_else(|| self.default_value.clone())
    }
}

/// A defined attribute value.
#[derive(Clone, Debug)]
pub enum AttributeValue {
    /// A fixed string.
    Fixed(String),
    /// A value computed from the input.
    Derived(DerivedAttribute),
}

impl AttributeValue {
    /// Produces the final value for `input`; `None` omits the key.
    #[must_use]
    pub fn evaluate(&self, input: &str) -> Option<String> {
        match self {
            Self::Fixed(value) => Some(value.clone()),
            Self::Derived(derived) => derived.evaluate(input),
        }
    }
}

/// What a scope does to one key.
#[derive(Clone, Debug)]
enum ScopeEntry {
    Set(AttributeValue),
    Remove,
}

/// Inherited attribute definitions of one pattern, before evaluation.
#[derive(Clone, Debug, Default)]
pub struct ResolvedAttributes {
    values: BTreeMap<String, AttributeValue>,
}

impl ResolvedAttributes {
    /// Gets the definition of `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.values.get(key)
    }

    /// Returns the defined keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Returns the number of defined keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing is defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Evaluates every definition against the original `input`.
    #[must_use]
    pub fn evaluate(&self, input: &str) -> Attributes {
        Attributes(
            self.values
                .iter()
                .filter_map(|(key, value)| value.evaluate(input).map(|v| (key.clone(), v)))
                .collect(),
        )
    }

    fn apply(&mut self, scope: &BTreeMap<String, ScopeEntry>) {
        for (key, entry) in scope {
            match entry {
                ScopeEntry::Set(value) => {
                    self.values.insert(key.clone(), value.clone());
                }
                ScopeEntry::Remove => {
                    self.values.remove(key);
                }
            }
        }
    }
}

// =============================================================================
// Attribute Store
// =============================================================================

/// Precomputed attributes for every pattern of a domain.
#[derive(Clone, Debug, Default)]
pub struct AttributeStore {
    scopes: HashMap<String, BTreeMap<String, ScopeEntry>>,
    resolved: HashMap<Arc<str>, ResolvedAttributes>,
}

impl AttributeStore {
    /// Builds the store from the effective attribute document.
    ///
    /// Without a document every pattern resolves to an empty map.
    ///
    /// # Errors
    ///
    /// Returns `AttributeDefinition` for a scope naming no pattern, a scope
    /// that is not an object, an array value, or an invalid derived attribute.
    pub fn build(
        effective: Option<&Document>,
        patterns: &PatternStore,
        registry: &TransformerRegistry,
    ) -> Result<Self> {
        let mut scopes = HashMap::new();

        let declared = match effective.and_then(|doc| doc.get(ATTRIBUTES_FIELD)) {
            None | Some(Document::Null) => None,
            Some(Document::Object(declared)) => Some(declared),
            Some(other) => {
                return Err(Error::invalid_document(
                    "attribute",
                    format!("'attributes' must be an object, found {}", other.type_name()),
                ));
            }
        };

        for (scope, definition) in declared.into_iter().flat_map(|d| d.iter()) {
            if &**scope != DEFAULT_SCOPE && !patterns.contains(scope) {
                return Err(Error::attribute_definition(
                    &**scope,
                    "scope names no pattern",
                ));
            }
            scopes.insert(scope.to_string(), parse_scope(scope, definition, registry)?);
        }

        let mut store = Self {
            scopes,
            resolved: HashMap::with_capacity(patterns.len()),
        };
        for id in patterns.ids() {
            let path = patterns.hierarchy_path(id).unwrap_or_default();
            let resolved = store.resolve_path(&path);
            store.resolved.insert(id.into(), resolved);
        }

        debug!(
            scopes = store.scopes.len(),
            patterns = store.resolved.len(),
            "built attribute store"
        );

        Ok(store)
    }

    /// Inherits attributes along `path` (root first): defaults, then each
    /// scope in turn; the last write wins and `null` removes.
    #[must_use]
    pub fn resolve_path(&self, path: &[&str]) -> ResolvedAttributes {
        let mut resolved = ResolvedAttributes::default();
        for scope in std::iter::once(DEFAULT_SCOPE).chain(path.iter().copied()) {
            if let Some(entries) = self.scopes.get(scope) {
                resolved.apply(entries);
            }
        }
        resolved
    }

    /// The precomputed definitions for `pattern_id`.
    #[must_use]
    pub fn resolved(&self, pattern_id: &str) -> Option<&ResolvedAttributes> {
        self.resolved.get(pattern_id)
    }

    /// Final attributes of `pattern_id` for the original `input`.
    ///
    /// No pattern (or an unknown one) resolves to an empty map.
    #[must_use]
    pub fn resolve(&self, pattern_id: Option<&str>, input: &str) -> Attributes {
        pattern_id
            .and_then(|id| self.resolved(id))
            .map(|resolved| resolved.evaluate(input))
            .unwrap_or_default()
    }

    /// Returns the number of defined scopes.
    #[must_use]
    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }
}

fn parse_scope(
    scope: &str,
    definition: &Document,
    registry: &TransformerRegistry,
) -> Result<BTreeMap<String, ScopeEntry>> {
    let fields = definition.as_object().ok_or_else(|| {
        Error::attribute_definition(
            scope,
            format!("must be an object, found {}", definition.type_name()),
        )
    })?;

    fields
        .iter()
        .map(|(key, value)| {
            let entry = match value {
                Document::Null => ScopeEntry::Remove,
                Document::Array(_) => {
                    return Err(Error::attribute_definition(
                        scope,
                        format!("'{key}' must not be an array"),
                    ));
                }
                Document::Object(_) => {
                    ScopeEntry::Set(AttributeValue::Derived(parse_derived(scope, key, value, registry)?))
                }
                scalar => match scalar.scalar_text() {
                    Some(text) => ScopeEntry::Set(AttributeValue::Fixed(text)),
                    None => {
                        return Err(Error::attribute_definition(
                            scope,
                            format!("'{key}' has an unsupported value"),
                        ));
                    }
                },
            };
            Ok((key.to_string(), entry))
        })
        .collect()
}

fn parse_derived(
    scope: &str,
    key: &str,
    definition: &Document,
    registry: &TransformerRegistry,
) -> Result<DerivedAttribute> {
    let fail = |message: String| {
        Error::attribute_definition(scope, format!("derived attribute '{key}': {message}"))
    };

    let configs = definition
        .get("transformers")
        .and_then(Document::as_array)
        .ok_or_else(|| fail("needs a 'transformers' array".to_string()))?;
    let pipeline =
        TransformerPipeline::build(configs, registry).map_err(|e| fail(e.to_string()))?;

    let default_value = match definition.get("defaultValue") {
        None | Some(Document::Null) => None,
        Some(value) => Some(
            value
                .scalar_text()
                .ok_or_else(|| fail("'defaultValue' must be a scalar".to_string()))?,
        ),
    };

    Ok(DerivedAttribute {
        pipeline,
        default_value,
    })
}
