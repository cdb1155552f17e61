//! Domain directory tests
//!
//! Builds complete domains on disk and drives them through the runtime.

use std::fs;
use std::path::Path;

use serde_json::{Value, json};
use textglass_engine::{EngineHandle, EngineLoader};
use textglass_runtime::load::{
    ATTRIBUTE_PATCH_FILE, ATTRIBUTES_FILE, PATTERN_PATCH_FILE, PATTERNS_FILE, TEST_FILE,
};
use textglass_runtime::{DomainFiles, load_engine, run_fixture};

fn write(dir: &Path, name: &str, value: &Value) {
    fs::write(dir.join(name), serde_json::to_string_pretty(value).unwrap()).unwrap();
}

fn header(kind: &str) -> Value {
    json!({ "type": kind, "domain": "browsers", "domainVersion": "3" })
}

fn with_header(kind: &str, body: Value) -> Value {
    let mut value = header(kind);
    if let (Some(target), Value::Object(fields)) = (value.as_object_mut(), body) {
        target.extend(fields);
    }
    value
}

/// A small user-agent domain with a patch on each side.
fn browser_domain(dir: &Path) {
    write(
        dir,
        PATTERNS_FILE,
        &with_header(
            "pattern",
            json!({
                "inputParser": {
                    "transformers": [
                        { "type": "LowerCase" },
                        { "type": "ReplaceAll", "find": "_", "replaceWith": " " }
                    ],
                    "tokenSeparators": [" ", "/", ";"]
                },
                "patternSet": {
                    "defaultId": "unknown",
                    "patterns": [
                        { "patternId": "browser", "match": { "type": "tokens", "tokens": ["mozilla"] } },
                        { "patternId": "firefox", "parentId": "browser",
                          "match": { "type": "tokens", "tokens": ["firefox"] } },
                        { "patternId": "chrome", "parentId": "browser",
                          "match": { "type": "tokens", "tokens": ["chrome"] } },
                        { "patternId": "unknown" }
                    ]
                }
            }),
        ),
    );
    write(
        dir,
        PATTERN_PATCH_FILE,
        &with_header(
            "patternPatch",
            json!({ "patch": [
                { "op": "add", "id": "edge", "parentId": "browser", "position": 1,
                  "node": { "match": { "type": "tokens", "tokens": ["edg"] } } },
                { "op": "remove", "id": "chrome" }
            ] }),
        ),
    );
    write(
        dir,
        ATTRIBUTES_FILE,
        &with_header(
            "attribute",
            json!({ "attributes": {
                "*": { "family": "other" },
                "browser": { "family": "browser", "engine": "unknown" },
                "firefox": { "engine": "gecko" },
                "chrome": { "engine": "blink" }
            } }),
        ),
    );
    write(
        dir,
        ATTRIBUTE_PATCH_FILE,
        &with_header(
            "attributePatch",
            json!({ "patch": [
                { "op": "remove", "id": "chrome" },
                { "op": "add", "id": "edge", "node": { "engine": "blink", "vendor": "microsoft" } }
            ] }),
        ),
    );
}

#[test]
fn browser_domain_classifies() {
    let dir = tempfile::tempdir().unwrap();
    browser_domain(dir.path());

    let files = DomainFiles::discover(dir.path()).unwrap();
    let engine = load_engine(&files, &EngineLoader::new()).unwrap();

    let firefox = engine.classify("Mozilla/5.0 (X11; Linux) Firefox/120");
    assert_eq!(firefox.pattern_id(), Some("firefox"));
    assert_eq!(firefox.attributes.get("family"), Some("browser"));
    assert_eq!(firefox.attributes.get("engine"), Some("gecko"));

    let edge = engine.classify("Mozilla/5.0 Chrome/120 Edg/120");
    assert_eq!(edge.pattern_id(), Some("edge"));
    assert_eq!(edge.attributes.get("vendor"), Some("microsoft"));

    let chrome = engine.classify("Mozilla/5.0 Chrome/120");
    assert_eq!(chrome.pattern_id(), Some("unknown"));
    assert_eq!(chrome.attributes.get("family"), Some("other"));
    assert_eq!(chrome.attributes.get("engine"), None);

    let curl = engine.classify("curl/8.0");
    assert_eq!(curl.pattern_id(), Some("unknown"));
    assert_eq!(curl.attributes.get("family"), Some("other"));
}

#[test]
fn effective_documents_reflect_patches() {
    let dir = tempfile::tempdir().unwrap();
    browser_domain(dir.path());
    let engine = load_engine(&DomainFiles::discover(dir.path()).unwrap(), &EngineLoader::new()).unwrap();

    let ids: Vec<&str> = engine.patterns().ids().collect();
    assert_eq!(ids, vec!["browser", "edge", "firefox", "unknown"]);
    let attributes = engine.effective_attributes().unwrap();
    assert!(attributes.get_path(&["attributes", "chrome"]).is_none());
}

#[test]
fn load_errors_name_the_directory() {
    let dir = tempfile::tempdir().unwrap();
    browser_domain(dir.path());
    write(
        dir.path(),
        ATTRIBUTE_PATCH_FILE,
        &with_header("attributePatch", json!({ "patch": [] })),
    );

    let err = load_engine(&DomainFiles::discover(dir.path()).unwrap(), &EngineLoader::new())
        .unwrap_err();
    assert!(err.is_attribute_definition(), "{err}");
    assert!(err.to_string().contains(&dir.path().display().to_string()));
}

#[test]
fn unparsable_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    browser_domain(dir.path());
    fs::write(dir.path().join(ATTRIBUTES_FILE), "{ not json").unwrap();

    let err = DomainFiles::discover(dir.path()).unwrap().read().unwrap_err();
    assert!(err.to_string().contains(ATTRIBUTES_FILE));
}

#[test]
fn handle_reloads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    browser_domain(dir.path());
    let files = DomainFiles::discover(dir.path()).unwrap();
    let loader = EngineLoader::new();
    let handle = EngineHandle::new(load_engine(&files, &loader).unwrap());
    assert_eq!(handle.classify("mozilla edg").pattern_id(), Some("edge"));

    fs::remove_file(dir.path().join(PATTERN_PATCH_FILE)).unwrap();
    fs::remove_file(dir.path().join(ATTRIBUTE_PATCH_FILE)).unwrap();
    let files = DomainFiles::discover(dir.path()).unwrap();
    let documents = files.read().unwrap();
    handle.reload(&loader, &documents.sources()).unwrap();

    let result = handle.classify("mozilla chrome");
    assert_eq!(result.pattern_id(), Some("chrome"));
    assert_eq!(result.attributes.get("engine"), Some("blink"));
}

#[test]
fn fixture_file_is_discovered() {
    let dir = tempfile::tempdir().unwrap();
    browser_domain(dir.path());
    write(
        dir.path(),
        TEST_FILE,
        &with_header(
            "test",
            json!({ "tests": [
                { "input": "Mozilla Firefox", "resultPatternId": "firefox",
                  "resultAttributes": { "engine": "gecko", "family": "browser" } },
                { "input": "wget", "resultPatternId": "unknown" }
            ] }),
        ),
    );

    let files = DomainFiles::discover(dir.path()).unwrap();
    let documents = files.read().unwrap();
    let engine = load_engine(&files, &EngineLoader::new()).unwrap();
    let report = run_fixture(&engine, documents.test.as_ref().unwrap()).unwrap();
    assert!(report.is_success(), "{:?}", report.failures);
    assert_eq!(report.total(), 2);
}
