//! Integration tests for TransformerRegistry

use std::sync::Arc;

use serde_json::json;
use textglass_foundation::{Document, Result};
use textglass_transform::{Params, Transformer, TransformerPipeline, TransformerRegistry};

#[derive(Debug)]
struct Prefix(String);

impl Transformer for Prefix {
    fn name(&self) -> &'static str {
        "Prefix"
    }

    fn transform(&self, input: &str) -> Option<String> {
        Some(format!("{}{input}", self.0))
    }
}

fn prefix(params: &Params<'_>) -> Result<Arc<dyn Transformer>> {
    Ok(Arc::new(Prefix(params.required_str("value")?.to_string())))
}

#[test]
fn standard_registry_knows_builtins() {
    let registry = TransformerRegistry::standard();
    for tag in [
        "ReplaceAll",
        "ReplaceFirst",
        "LowerCase",
        "UpperCase",
        "Substring",
        "SplitAndGet",
        "IsNumber",
    ] {
        assert!(registry.contains(tag), "{tag}");
    }
}

#[test]
fn unknown_and_missing_types_are_config_errors() {
    let registry = TransformerRegistry::standard();
    let unknown = Document::from(json!({ "type": "Reverse" }));
    let untyped = Document::from(json!({ "find": "a" }));

    assert!(registry.build(&unknown, 0).unwrap_err().is_transformer_config());
    let err = registry.build(&untyped, 3).unwrap_err();
    assert!(err.is_transformer_config());
    assert!(err.to_string().contains("#3"));
}

#[test]
fn custom_transformers_join_pipelines() {
    let mut registry = TransformerRegistry::standard();
    registry.register("Prefix", prefix);

    let configs = [
        Document::from(json!({ "type": "Prefix", "value": ">" })),
        Document::from(json!({ "type": "UpperCase" })),
    ];
    let pipeline = TransformerPipeline::build(&configs, &registry).unwrap();
    assert_eq!(pipeline.apply("x"), ">X");
}

#[test]
fn empty_registry_rejects_everything() {
    let registry = TransformerRegistry::new();
    assert!(registry.is_empty());
    let config = Document::from(json!({ "type": "LowerCase" }));
    assert!(registry.build(&config, 0).is_err());
}
