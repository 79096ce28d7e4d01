#![no_main]

use libfuzzer_sys::fuzz_target;
use serde_json::json;

use caretaker_tree::{ContentTree, Manifest, PackageFacts, build_tree};

fuzz_target!(|data: &[u8]| {
    let Ok(params) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };
    let manifest = Manifest::from_value(&json!({
        "mainLibrary": "H5P.Column",
        "preloadedDependencies": [
            { "machineName": "H5P.Column", "majorVersion": 1, "minorVersion": 16 }
        ]
    }));
    let facts = PackageFacts::new(manifest, params);
    let Ok(tree) = build_tree(&facts) else {
        return;
    };

    // 모든 노드는 루트에서 도달 가능하고 부모 체인은 루트에서 끝남
    assert_eq!(tree.depth_first().len(), tree.len());
    for (id, _) in tree.iter() {
        let chain = tree.ancestors(id);
        assert!(chain.len() < tree.len());
        if id != ContentTree::ROOT {
            assert_eq!(chain.last().copied(), Some(ContentTree::ROOT));
        }
    }
});
