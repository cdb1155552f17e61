//! Integration tests for Error types
//!
//! Tests error construction, display, and context.

use textglass_foundation::{Error, ErrorContext, ErrorKind};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn error_patch() {
    let err = Error::patch(Some("p1"), "node already exists");
    assert!(err.is_patch());
    let msg = format!("{err}");
    assert!(msg.contains("p1"));
    assert!(msg.contains("already exists"));
}

#[test]
fn error_pattern_definition_without_id() {
    let err = Error::pattern_definition(None, "duplicate id");
    assert!(err.is_pattern_definition());
    assert!(!format!("{err}").contains(" at '"));
}

#[test]
fn error_transformer_config() {
    let err = Error::transformer_config("ReplaceAll", "replaceWith", "is required");
    assert!(err.is_transformer_config());
    let msg = format!("{err}");
    assert!(msg.contains("ReplaceAll"));
    assert!(msg.contains("replaceWith"));
}

#[test]
fn error_domain_mismatch() {
    let err = Error::domain_mismatch("attribute", "d 1", "d 2");
    assert!(err.is_domain_mismatch());
    assert!(format!("{err}").contains("d 2"));
}

#[test]
fn error_attribute_definition() {
    let err = Error::attribute_definition("ghost", "scope names no pattern");
    assert!(err.is_attribute_definition());
    assert!(matches!(err.kind, ErrorKind::AttributeDefinition { .. }));
}

// =============================================================================
// Error Context
// =============================================================================

#[test]
fn error_with_source() {
    let err = Error::new(ErrorKind::JsonError("bad".to_string())).in_source("patterns.json");
    let msg = format!("{err}");
    assert!(msg.contains("bad"));
    assert!(msg.contains("patterns.json"));
}

#[test]
fn error_frames_accumulate() {
    let err = Error::invalid_document("test", "case has no input")
        .in_frame("case 3")
        .in_frame("domain 'greetings'");
    let msg = format!("{err}");
    assert!(msg.contains("in case 3"));
    assert!(msg.contains("in domain 'greetings'"));
}

#[test]
fn context_display() {
    let ctx = ErrorContext::new().with_source("a.json").with_frame("load");
    assert_eq!(ctx.to_string(), "at a.json in load");
}
