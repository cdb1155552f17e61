//! Integration tests for PatchPlan
//!
//! Tests entry parsing and rejection of contradictory entries.

use serde_json::{Value, json};
use textglass_foundation::Document;
use textglass_patch::{Addressing, OpKind, PatchPlan};

fn plan(entries: Value) -> textglass_foundation::Result<PatchPlan> {
    PatchPlan::from_document(
        &Document::from(json!({ "patch": entries })),
        &Addressing::patterns(),
    )
}

// =============================================================================
// Parsing
// =============================================================================

#[test]
fn parses_entries_in_order() {
    let plan = plan(json!([
        { "op": "add", "id": "p2", "node": { "parentId": "p1" }, "position": 0 },
        { "op": "remove", "id": "p9" }
    ]))
    .unwrap();

    assert_eq!(plan.len(), 2);
    let kinds: Vec<_> = plan.ops().iter().map(|op| op.kind).collect();
    assert_eq!(kinds, vec![OpKind::Add, OpKind::Remove]);
    assert_eq!(plan.ops()[0].position, Some(0));
    assert_eq!(&*plan.ops()[1].id, "p9");
}

#[test]
fn document_without_patch_field_is_empty() {
    let plan = PatchPlan::from_document(&Document::empty_object(), &Addressing::patterns()).unwrap();
    assert!(plan.is_empty());
}

#[test]
fn malformed_entries_are_rejected() {
    for entries in [
        json!({}),
        json!(["add"]),
        json!([{ "op": "add" }]),
        json!([{ "id": "p1" }]),
        json!([{ "op": "rename", "id": "p1" }]),
        json!([{ "op": "add", "id": 7 }]),
        json!([{ "op": "add", "id": "p1", "position": -1 }]),
    ] {
        let err = plan(entries.clone()).unwrap_err();
        assert!(err.is_patch(), "{entries}: {err}");
    }
}

#[test]
fn position_is_rejected_for_keyed_documents() {
    let doc = Document::from(json!({
        "patch": [{ "op": "add", "id": "p1", "node": {}, "position": 0 }]
    }));
    assert!(PatchPlan::from_document(&doc, &Addressing::attributes()).is_err());
}

// =============================================================================
// Addressing
// =============================================================================

#[test]
fn double_add_is_ambiguous() {
    assert!(plan(json!([
        { "op": "add", "id": "p1", "node": {} },
        { "op": "add", "id": "p1", "node": {} }
    ]))
    .is_err());
}

#[test]
fn remove_and_override_is_ambiguous() {
    assert!(plan(json!([
        { "op": "override", "id": "p1", "node": { "x": 1 } },
        { "op": "remove", "id": "p1" }
    ]))
    .is_err());
}

#[test]
fn conflicting_overrides_are_ambiguous() {
    assert!(plan(json!([
        { "op": "override", "id": "p1", "node": { "x": 1 } },
        { "op": "override", "id": "p1", "node": { "x": 2 } }
    ]))
    .is_err());
}

#[test]
fn agreeing_overrides_and_repeated_removes_are_allowed() {
    assert!(plan(json!([
        { "op": "override", "id": "p1", "node": { "x": 1 } },
        { "op": "override", "id": "p1", "node": { "x": 1, "y": 2 } },
        { "op": "remove", "id": "p2" },
        { "op": "remove", "id": "p2" }
    ]))
    .is_ok());
}
