//! Registry mapping transformer type tags to constructors.

use std::collections::HashMap;
use std::sync::Arc;

use textglass_foundation::{Document, Error, Result};

use crate::transformer::{
    IsNumber, LowerCase, Params, ReplaceAll, ReplaceFirst, SplitAndGet, Substring, Transformer,
    UpperCase,
};

/// Field of a transformer configuration holding its type tag.
pub const TYPE_FIELD: &str = "type";

/// Builds a transformer from its parameters.
pub type Constructor = fn(&Params<'_>) -> Result<Arc<dyn Transformer>>;

// =============================================================================
// TransformerRegistry
// =============================================================================

/// Registry for looking up transformer constructors by type tag.
///
/// [`TransformerRegistry::standard`] carries the built-in transformers; extra
/// tags can be registered without touching pipelines or engines.
#[derive(Clone, Debug, Default)]
pub struct TransformerRegistry {
    constructors: HashMap<String, Constructor>,
}

impl TransformerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with every built-in transformer registered.
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(ReplaceAll::TAG, replace_all);
        registry.register(ReplaceFirst::TAG, replace_first);
        registry.register(LowerCase::TAG, lower_case);
        registry.register(UpperCase::TAG, upper_case);
        registry.register(Substring::TAG, substring);
        registry.register(SplitAndGet::TAG, split_and_get);
        registry.register(IsNumber::TAG, is_number);
        registry
    }

    /// Registers a constructor, replacing any previous one for `tag`.
    pub fn register(&mut self, tag: impl Into<String>, constructor: Constructor) {
        self.constructors.insert(tag.into(), constructor);
    }

    /// Checks if `tag` is registered.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.constructors.contains_key(tag)
    }

    /// Returns all registered tags, sorted.
    #[must_use]
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<_> = self.constructors.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    /// Returns the number of registered tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }

    /// Builds the transformer described by `config`.
    ///
    /// `index` is the position of the configuration in its pipeline and is
    /// used to name the step when the tag itself is missing.
    ///
    /// # Errors
    ///
    /// Returns `TransformerConfig` when `type` is missing or unknown, or the
    /// constructor rejects the parameters.
    pub fn build(&self, config: &Document, index: usize) -> Result<Arc<dyn Transformer>> {
        let position = format!("transformer #{index}");
        let tag = match config.get(TYPE_FIELD) {
            Some(Document::String(tag)) => tag,
            Some(other) => {
                return Err(Error::transformer_config(
                    position,
                    TYPE_FIELD,
                    format!("must be a string, found {}", other.type_name()),
                ));
            }
            None => {
                return Err(Error::transformer_config(position, TYPE_FIELD, "not defined"));
            }
        };

        let constructor = self.constructors.get(&**tag).ok_or_else(|| {
            Error::transformer_config(&**tag, TYPE_FIELD, "unknown transformer type")
        })?;
        constructor(&Params::new(tag, config)?)
    }
}

fn replace_all(params: &Params<'_>) -> Result<Arc<dyn Transformer>> {
    Ok(Arc::new(ReplaceAll::from_params(params)?))
}

fn replace_first(params: &Params<'_>) -> Result<Arc<dyn Transformer>> {
    Ok(Arc::new(ReplaceFirst::from_params(params)?))
}

fn lower_case(_: &Params<'_>) -> Result<Arc<dyn Transformer>> {
    Ok(Arc::new(LowerCase))
}

fn upper_case(_: &Params<'_>) -> Result<Arc<dyn Transformer>> {
    Ok(Arc::new(UpperCase))
}

fn substring(params: &Params<'_>) -> Result<Arc<dyn Transformer>> {
    Ok(Arc::new(Substring::from_params(params)?))
}

fn split_and_get(params: &Params<'_>) -> Result<Arc<dyn Transformer>> {
    Ok(Arc::new(SplitAndGet::from_params(params)?))
}

fn is_number(_: &Params<'_>) -> Result<Arc<dyn Transformer>> {
    Ok(Arc::new(IsNumber))
}
