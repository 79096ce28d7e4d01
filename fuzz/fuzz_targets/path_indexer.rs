#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use caretaker_tree::PathIndexer;
use caretaker_tree::indexer::resolve;
use caretaker_tree::path;
use serde_json::Value;

/// 퍼저용 구조적 입력
#[derive(Arbitrary, Debug)]
struct FuzzInput {
    /// 파라미터 문서 (JSON 텍스트)
    document: String,
    /// 술어 목록 (속성, 정규식)
    predicates: Vec<(String, String)>,
}

fuzz_target!(|input: FuzzInput| {
    let Ok(doc) = serde_json::from_str::<Value>(&input.document) else {
        return;
    };
    // 구분자를 포함한 키는 경로로 왕복할 수 없음
    if !plain_keys(&doc) {
        return;
    }
    let patterns: Vec<(&str, &str)> = input
        .predicates
        .iter()
        .take(4)
        .map(|(a, p)| (a.as_str(), p.as_str()))
        .collect();
    // 잘못된 정규식은 생성 시점에 거부됨
    let Ok(indexer) = PathIndexer::from_patterns(&patterns) else {
        return;
    };

    let matches = indexer.find_matches(&doc);
    for m in &matches {
        let resolved = resolve(&doc, &m.path);
        assert!(resolved.is_some_and(|node| std::ptr::eq(node, m.node)));

        if let Some(ancestor) = indexer.find_closest_ancestor(&doc, &m.path) {
            assert!(path::is_ancestor(&ancestor.path, &m.path));
            assert_ne!(ancestor.path, m.path);
        }
    }
});

fn plain_keys(node: &Value) -> bool {
    match node {
        Value::Object(map) => map.iter().all(|(k, v)| {
            !k.is_empty() && !k.contains(['.', '[', ']']) && plain_keys(v)
        }),
        Value::Array(items) => items.iter().all(plain_keys),
        _ => true,
    }
}
