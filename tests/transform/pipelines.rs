//! Integration tests for TransformerPipeline
//!
//! Tests ordering and applicability of pipeline steps.

use serde_json::{Value, json};
use textglass_foundation::{Document, Result};
use textglass_transform::{TransformerPipeline, TransformerRegistry};

fn pipeline(configs: Value) -> Result<TransformerPipeline> {
    let doc = Document::from(configs);
    let configs: Vec<Document> = doc.as_array().map(|a| a.iter().cloned().collect()).unwrap_or_default();
    TransformerPipeline::build(&configs, &TransformerRegistry::standard())
}

// =============================================================================
// Ordering
// =============================================================================

#[test]
fn steps_compose_sequentially() {
    let p = pipeline(json!([
        { "type": "ReplaceAll", "find": "a", "replaceWith": "b" },
        { "type": "ReplaceAll", "find": "b", "replaceWith": "c" }
    ]))
    .unwrap();
    assert_eq!(p.apply("aa"), "cc");
}

#[test]
fn reversed_order_gives_different_result() {
    let p = pipeline(json!([
        { "type": "ReplaceAll", "find": "b", "replaceWith": "c" },
        { "type": "ReplaceAll", "find": "a", "replaceWith": "b" }
    ]))
    .unwrap();
    assert_eq!(p.apply("aa"), "bb");
}

#[test]
fn user_agent_style_chain() {
    let p = pipeline(json!([
        { "type": "LowerCase" },
        { "type": "SplitAndGet", "delimiter": " ", "get": 0 },
        { "type": "SplitAndGet", "delimiter": "/", "get": -1 }
    ]))
    .unwrap();
    assert_eq!(p.names(), vec!["LowerCase", "SplitAndGet", "SplitAndGet"]);
    assert_eq!(p.apply("Mozilla/5.0 (X11)"), "5.0");
}

// =============================================================================
// Applicability
// =============================================================================

#[test]
fn inapplicable_step_is_skipped_by_apply() {
    let p = pipeline(json!([
        { "type": "IsNumber" },
        { "type": "UpperCase" }
    ]))
    .unwrap();
    assert_eq!(p.apply("abc"), "ABC");
    assert_eq!(p.try_apply("abc"), None);
    assert_eq!(p.try_apply("-1.5").as_deref(), Some("-1.5"));
}

#[test]
fn substring_out_of_range_is_inapplicable() {
    let p = pipeline(json!([{ "type": "Substring", "start": 10 }])).unwrap();
    assert_eq!(p.try_apply("short"), None);
    assert_eq!(p.apply("short"), "short");
}

// =============================================================================
// Configuration Errors
// =============================================================================

#[test]
fn missing_replace_with_is_a_config_error() {
    let err = pipeline(json!([{ "type": "ReplaceAll", "find": "a" }])).unwrap_err();
    assert!(err.is_transformer_config());
    assert!(err.to_string().contains("replaceWith"));
}

#[test]
fn empty_replace_with_is_allowed() {
    let p = pipeline(json!([{ "type": "ReplaceAll", "find": "-", "replaceWith": "" }])).unwrap();
    assert_eq!(p.apply("a-b-c"), "abc");
}

#[test]
fn empty_find_is_allowed() {
    let p = pipeline(json!([{ "type": "ReplaceAll", "find": "", "replaceWith": "x" }])).unwrap();
    assert_eq!(p.apply("ab"), "xaxbx");
}

#[test]
fn split_and_get_last_piece() {
    let p = pipeline(json!([{ "type": "SplitAndGet", "delimiter": " ", "get": -1 }])).unwrap();
    assert_eq!(p.apply("mozilla firefox 120"), "120");
}

#[test]
fn first_bad_step_fails_the_build() {
    let err = pipeline(json!([
        { "type": "LowerCase" },
        { "type": "Substring" }
    ]))
    .unwrap_err();
    assert!(err.is_transformer_config());
    assert!(err.to_string().contains("start"));
}
