//! Property tests for merging

use proptest::prelude::*;
use serde_json::json;
use textglass_foundation::Document;
use textglass_patch::{Addressing, merge};

fn base(count: usize) -> Document {
    let nodes: Vec<_> = (0..count)
        .map(|i| json!({ "patternId": format!("p{i}"), "order": i }))
        .collect();
    Document::from(json!({ "patternSet": { "patterns": nodes } }))
}

proptest! {
    #[test]
    fn merge_without_patch_is_identity(count in 0usize..30) {
        let doc = base(count);
        prop_assert_eq!(merge(&doc, None, &Addressing::patterns()).unwrap(), doc);
    }

    #[test]
    fn remerge_is_idempotent(count in 1usize..20, overridden in 0usize..20) {
        let patch = Document::from(json!({
            "patch": [
                { "op": "override", "id": format!("p{}", overridden % count), "node": { "tag": "x" } },
                { "op": "add", "id": "extra", "node": {}, "position": 0 }
            ]
        }));
        let once = merge(&base(count), Some(&patch), &Addressing::patterns()).unwrap();
        let twice = merge(&once, None, &Addressing::patterns()).unwrap();
        prop_assert_eq!(once, twice);
    }
}
