//! Integration tests for domain loading

use serde_json::json;
use textglass_engine::{ClassificationEngine, DomainSources, EngineLoader};
use textglass_foundation::Document;

use crate::common::{DOMAIN, VERSION, attributes, doc, doc_version, patterns};

fn base() -> Document {
    patterns(json!([
        { "patternId": "p1", "match": { "type": "literal", "value": "one" } }
    ]))
}

#[test]
fn domain_identity_comes_from_patterns() {
    let engine = ClassificationEngine::load(&base(), None, None, None).unwrap();
    assert_eq!(engine.domain_name(), DOMAIN);
    assert_eq!(engine.domain_version(), VERSION);
}

#[test]
fn patch_add_then_remove() {
    let add = doc(
        "patternPatch",
        json!({ "patch": [
            { "op": "add", "id": "p2", "node": { "match": { "type": "literal", "value": "two" } } }
        ] }),
    );
    let engine = ClassificationEngine::load(&base(), Some(&add), None, None).unwrap();
    assert_eq!(engine.classify("one").pattern_id(), Some("p1"));
    assert_eq!(engine.classify("two").pattern_id(), Some("p2"));

    let merged = engine.effective_patterns().clone();
    let remove = doc("patternPatch", json!({ "patch": [{ "op": "remove", "id": "p1" }] }));
    let engine = ClassificationEngine::load(&merged, Some(&remove), None, None).unwrap();
    assert_eq!(engine.classify("one").pattern_id(), None);
    assert_eq!(engine.classify("two").pattern_id(), Some("p2"));
    assert_eq!(engine.patterns().len(), 1);
}

#[test]
fn removed_pattern_takes_its_attributes_scope_with_it() {
    let remove = doc("patternPatch", json!({ "patch": [{ "op": "remove", "id": "p1" }] }));
    let attrs = attributes(json!({ "p1": { "k": "v" } }));
    let err = ClassificationEngine::load(&base(), Some(&remove), Some(&attrs), None).unwrap_err();
    assert!(err.is_attribute_definition());

    let attr_patch = doc("attributePatch", json!({ "patch": [{ "op": "remove", "id": "p1" }] }));
    assert!(ClassificationEngine::load(&base(), Some(&remove), Some(&attrs), Some(&attr_patch)).is_ok());
}

#[test]
fn attribute_patch_without_base() {
    let attr_patch = doc(
        "attributePatch",
        json!({ "patch": [{ "op": "add", "id": "p1", "node": { "k": "v" } }] }),
    );
    let engine = ClassificationEngine::load(&base(), None, None, Some(&attr_patch)).unwrap();
    assert_eq!(engine.classify("one").attributes.get("k"), Some("v"));
}

#[test]
fn every_document_must_share_the_domain() {
    let other = doc_version("patternPatch", "2.0", json!({ "patch": [] }));
    assert!(ClassificationEngine::load(&base(), Some(&other), None, None)
        .unwrap_err()
        .is_domain_mismatch());

    let other = doc_version("attribute", "2.0", json!({ "attributes": {} }));
    assert!(ClassificationEngine::load(&base(), None, Some(&other), None)
        .unwrap_err()
        .is_domain_mismatch());
}

#[test]
fn bad_patch_fails_the_load() {
    let patch = doc(
        "patternPatch",
        json!({ "patch": [{ "op": "override", "id": "ghost", "node": {} }] }),
    );
    let err = EngineLoader::new()
        .load(&DomainSources::new(&base()).with_pattern_patch(Some(&patch)))
        .unwrap_err();
    assert!(err.is_patch());
}

#[test]
fn bad_input_transformer_fails_the_load() {
    let patterns = doc(
        "pattern",
        json!({
            "inputParser": { "transformers": [{ "type": "ReplaceAll", "find": "x" }] },
            "patternSet": { "patterns": [] }
        }),
    );
    assert!(ClassificationEngine::load(&patterns, None, None, None)
        .unwrap_err()
        .is_transformer_config());
}
