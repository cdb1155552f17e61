//! Integration tests for merging
//!
//! Tests base/patch precedence for both document layouts.

use serde_json::{Value, json};
use textglass_foundation::Document;
use textglass_patch::{Addressing, merge};

fn patterns(ids: &[&str]) -> Document {
    let nodes: Vec<Value> = ids.iter().map(|id| json!({ "patternId": id })).collect();
    Document::from(json!({
        "type": "pattern", "domain": "d", "domainVersion": "1",
        "patternSet": { "patterns": nodes }
    }))
}

fn patch(entries: Value) -> Document {
    Document::from(json!({
        "type": "patternPatch", "domain": "d", "domainVersion": "1",
        "patch": entries
    }))
}

fn ids(doc: &Document) -> Vec<String> {
    doc.get_path(&["patternSet", "patterns"])
        .and_then(Document::as_array)
        .into_iter()
        .flat_map(|nodes| nodes.iter())
        .filter_map(|node| node.get("patternId").and_then(Document::as_str))
        .map(str::to_string)
        .collect()
}

// =============================================================================
// Precedence
// =============================================================================

#[test]
fn add_then_remove_across_patches() {
    let base = patterns(&["p1"]);
    let addressing = Addressing::patterns();

    let added = merge(
        &base,
        Some(&patch(json!([{ "op": "add", "id": "p2", "node": {} }]))),
        &addressing,
    )
    .unwrap();
    assert_eq!(ids(&added), vec!["p1", "p2"]);

    let removed = merge(
        &added,
        Some(&patch(json!([{ "op": "remove", "id": "p1" }]))),
        &addressing,
    )
    .unwrap();
    assert_eq!(ids(&removed), vec!["p2"]);
}

#[test]
fn base_is_untouched() {
    let base = patterns(&["p1"]);
    let _ = merge(
        &base,
        Some(&patch(json!([{ "op": "remove", "id": "p1" }]))),
        &Addressing::patterns(),
    )
    .unwrap();
    assert_eq!(ids(&base), vec!["p1"]);
}

#[test]
fn rejected_patch_applies_nothing() {
    let base = patterns(&["p1", "p2"]);
    let result = merge(
        &base,
        Some(&patch(json!([
            { "op": "remove", "id": "p2" },
            { "op": "override", "id": "ghost", "node": {} }
        ]))),
        &Addressing::patterns(),
    );
    assert!(result.unwrap_err().is_patch());
}

#[test]
fn override_keeps_unspecified_fields() {
    let base = Document::from(json!({
        "patternSet": { "patterns": [
            { "patternId": "p1", "parentId": "root", "match": { "type": "literal", "value": "a" } },
            { "patternId": "root" }
        ] }
    }));
    let merged = merge(
        &base,
        Some(&patch(json!([
            { "op": "override", "id": "p1", "node": { "match": { "type": "literal", "value": "b" } } }
        ]))),
        &Addressing::patterns(),
    )
    .unwrap();

    let p1 = merged
        .get_path(&["patternSet", "patterns"])
        .and_then(Document::as_array)
        .and_then(|nodes| nodes.get(0))
        .unwrap();
    assert_eq!(p1.get("parentId"), Some(&Document::from("root")));
    assert_eq!(p1.get_path(&["match", "value"]), Some(&Document::from("b")));
}

// =============================================================================
// Keyed Layout
// =============================================================================

#[test]
fn attribute_scopes_are_patched_by_key() {
    let base = Document::from(json!({
        "type": "attribute", "domain": "d", "domainVersion": "1",
        "attributes": { "*": { "k": "default" }, "p1": { "k": "x" } }
    }));
    let patch = Document::from(json!({
        "type": "attributePatch", "domain": "d", "domainVersion": "1",
        "patch": [
            { "op": "override", "id": "*", "node": { "extra": "e" } },
            { "op": "remove", "id": "p1" }
        ]
    }));
    let merged = merge(&base, Some(&patch), &Addressing::attributes()).unwrap();

    assert_eq!(merged.get_path(&["attributes", "*", "k"]), Some(&Document::from("default")));
    assert_eq!(merged.get_path(&["attributes", "*", "extra"]), Some(&Document::from("e")));
    assert_eq!(merged.get_path(&["attributes", "p1"]), None);
}
