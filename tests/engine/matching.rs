//! Integration tests for pattern matching

use serde_json::json;
use textglass_engine::{ClassificationEngine, EngineConfig, EngineLoader, DomainSources};

use crate::common::{doc, patterns};

fn engine(list: serde_json::Value) -> ClassificationEngine {
    ClassificationEngine::load(&patterns(list), None, None, None).unwrap()
}

// =============================================================================
// Match Kinds
// =============================================================================

#[test]
fn hello_and_goodbye() {
    let engine = engine(json!([
        { "patternId": "p1", "match": { "type": "literal", "value": "hello" } }
    ]));

    let hit = engine.classify("hello");
    assert_eq!(hit.pattern_id(), Some("p1"));
    assert!(hit.attributes.is_empty());

    let miss = engine.classify("goodbye");
    assert_eq!(miss.pattern_id(), None);
    assert!(miss.attributes.is_empty());
}

#[test]
fn each_match_kind() {
    let engine = engine(json!([
        { "patternId": "lit", "match": { "type": "literal", "value": "exact" } },
        { "patternId": "pre", "match": { "type": "prefix", "value": "start-" } },
        { "patternId": "suf", "match": { "type": "suffix", "value": "-end" } },
        { "patternId": "con", "match": { "type": "contains", "value": "middle" } },
        { "patternId": "tok", "match": { "type": "tokens", "tokens": ["b", "a"] } },
        { "patternId": "path", "match": { "type": "path", "segments": ["api", "*", "items"] } }
    ]));

    assert_eq!(engine.classify("exact").pattern_id(), Some("lit"));
    assert_eq!(engine.classify("start-x").pattern_id(), Some("pre"));
    assert_eq!(engine.classify("x-end").pattern_id(), Some("suf"));
    assert_eq!(engine.classify("in the middle of").pattern_id(), Some("con"));
    assert_eq!(engine.classify("a c b").pattern_id(), Some("tok"));
    assert_eq!(engine.classify("api/v2/items").pattern_id(), Some("path"));
    assert_eq!(engine.classify("api/v2/items/9").pattern_id(), None);
}

#[test]
fn ordered_tokens_need_order() {
    let engine = engine(json!([
        { "patternId": "p", "match": { "type": "tokens", "tokens": ["a", "b"], "ordered": true } }
    ]));
    assert_eq!(engine.classify("x a y b").pattern_id(), Some("p"));
    assert_eq!(engine.classify("b a").pattern_id(), None);
}

// =============================================================================
// Ordering and Hierarchy
// =============================================================================

#[test]
fn first_declared_sibling_wins() {
    let engine = engine(json!([
        { "patternId": "broad", "match": { "type": "prefix", "value": "a" } },
        { "patternId": "narrow", "match": { "type": "literal", "value": "ab" } }
    ]));
    assert_eq!(engine.classify("ab").pattern_id(), Some("broad"));
}

#[test]
fn only_leaf_patterns_win() {
    let engine = engine(json!([
        { "patternId": "browser", "match": { "type": "contains", "value": "mozilla" } },
        { "patternId": "firefox", "parentId": "browser", "match": { "type": "contains", "value": "firefox" } },
        { "patternId": "firefox-mobile", "parentId": "firefox", "match": { "type": "contains", "value": "mobile" } },
        { "patternId": "firefox-desktop", "parentId": "firefox", "match": { "type": "contains", "value": "x11" } }
    ]));
    assert_eq!(engine.classify("mozilla firefox mobile").pattern_id(), Some("firefox-mobile"));
    assert_eq!(engine.classify("mozilla firefox x11").pattern_id(), Some("firefox-desktop"));
    assert_eq!(engine.classify("mozilla firefox").pattern_id(), None);
    assert_eq!(engine.classify("mozilla").pattern_id(), None);
    assert_eq!(engine.classify("firefox mobile").pattern_id(), None);
}

#[test]
fn failed_subtree_continues_with_next_sibling() {
    let engine = engine(json!([
        { "patternId": "mobile", "match": { "type": "contains", "value": "mobile" } },
        { "patternId": "android", "parentId": "mobile", "match": { "type": "contains", "value": "android" } },
        { "patternId": "catch-all", "match": { "type": "prefix", "value": "" } }
    ]));
    assert_eq!(engine.classify("android mobile").pattern_id(), Some("android"));
    assert_eq!(engine.classify("mobile").pattern_id(), Some("catch-all"));
}

#[test]
fn groups_never_win() {
    let engine = engine(json!([
        { "patternId": "group" },
        { "patternId": "member", "parentId": "group", "match": { "type": "literal", "value": "m" } }
    ]));
    assert_eq!(engine.classify("m").pattern_id(), Some("member"));
    assert_eq!(engine.classify("other").pattern_id(), None);
    assert!(engine.patterns().get("group").unwrap().is_group());
}

#[test]
fn hierarchy_path_runs_root_first() {
    let engine = engine(json!([
        { "patternId": "a" },
        { "patternId": "b", "parentId": "a" },
        { "patternId": "c", "parentId": "b", "match": { "type": "literal", "value": "c" } }
    ]));
    assert_eq!(engine.patterns().hierarchy_path("c"), Some(vec!["a", "b", "c"]));
    assert_eq!(engine.patterns().parent_of("c"), Some("b"));
    assert_eq!(engine.patterns().hierarchy_path("ghost"), None);
}

// =============================================================================
// Input Parser
// =============================================================================

#[test]
fn input_is_transformed_before_matching() {
    let patterns = doc(
        "pattern",
        json!({
            "inputParser": {
                "transformers": [{ "type": "LowerCase" }],
                "tokenSeparators": [" ", ";"]
            },
            "patternSet": { "patterns": [
                { "patternId": "p", "match": { "type": "tokens", "tokens": ["linux", "x11"] } }
            ] }
        }),
    );
    let engine = ClassificationEngine::load(&patterns, None, None, None).unwrap();
    assert_eq!(engine.classify("Mozilla (X11;Linux)").pattern_id(), None);
    assert_eq!(engine.classify("X11;LINUX").pattern_id(), Some("p"));
}

#[test]
fn loader_separators_apply_when_domain_declares_none() {
    let patterns = patterns(json!([
        { "patternId": "p", "match": { "type": "tokens", "tokens": ["a", "b"] } }
    ]));
    let engine = EngineLoader::new()
        .with_config(EngineConfig::default().with_token_separators([",", " "]))
        .load(&DomainSources::new(&patterns))
        .unwrap();
    assert_eq!(engine.classify("a,b").pattern_id(), Some("p"));
}

#[test]
fn default_id_catches_misses() {
    let patterns = doc(
        "pattern",
        json!({ "patternSet": { "defaultId": "unknown", "patterns": [
            { "patternId": "known", "match": { "type": "literal", "value": "k" } },
            { "patternId": "unknown" }
        ] } }),
    );
    let engine = ClassificationEngine::load(&patterns, None, None, None).unwrap();
    assert_eq!(engine.classify("k").pattern_id(), Some("known"));
    assert_eq!(engine.classify("zz").pattern_id(), Some("unknown"));
}

// =============================================================================
// Definition Errors
// =============================================================================

#[test]
fn definition_errors() {
    for list in [
        json!([{ "patternId": "p" }, { "patternId": "p" }]),
        json!([{ "patternId": "p", "parentId": "ghost" }]),
        json!([{ "patternId": "a", "parentId": "b" }, { "patternId": "b", "parentId": "a" }]),
        json!([{ "match": { "type": "literal", "value": "x" } }]),
        json!([{ "patternId": "p", "match": { "type": "regex", "value": "x" } }]),
        json!([{ "patternId": "p", "match": { "type": "tokens", "tokens": [] } }]),
        json!([{ "patternId": "p", "match": { "type": "literal" } }]),
    ] {
        let err = ClassificationEngine::load(&patterns(list.clone()), None, None, None).unwrap_err();
        assert!(err.is_pattern_definition(), "{list}: {err}");
    }
}

#[test]
fn strict_config_limits_depth() {
    let chain: Vec<_> = (0..10)
        .map(|i| {
            if i == 0 {
                json!({ "patternId": "n0" })
            } else {
                json!({ "patternId": format!("n{i}"), "parentId": format!("n{}", i - 1) })
            }
        })
        .collect();
    let doc = patterns(json!(chain));

    assert!(EngineLoader::new().load(&DomainSources::new(&doc)).is_ok());
    let err = EngineLoader::new()
        .with_config(EngineConfig::strict())
        .load(&DomainSources::new(&doc))
        .unwrap_err();
    assert!(err.is_pattern_definition());
}
