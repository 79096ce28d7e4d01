//! 구조 탐색기 -- 속성/정규식 조건으로 JSON 노드 검색
//!
//! [`PathIndexer`]는 JSON 문서(객체와 배열을 동일하게 취급)를 재귀적으로 순회하며
//! 모든 [`Predicate`]를 만족하는 노드를 경로와 함께 반환합니다.
//! 정규식은 조건 생성 시 한 번만 컴파일합니다.
//!
//! # 사용 예시
//! ```
//! use caretaker_tree::indexer::PathIndexer;
//! use serde_json::json;
//!
//! let doc = json!({ "a": [ { "library": "H5P.Image 1.1" } ] });
//! let indexer = PathIndexer::from_patterns(&[("library", r"^H5P\.Image ")]).unwrap();
//! let matches = indexer.find_matches(&doc);
//! assert_eq!(matches[0].path, "a[0]");
//! ```

use regex::Regex;
use serde_json::Value;

use crate::error::TreeError;
use crate::path::{self, Segment};

/// 단일 탐색 조건: 속성 이름 + 값 정규식
#[derive(Debug, Clone)]
pub struct Predicate {
    attribute: String,
    pattern: Regex,
}

impl Predicate {
    /// 조건을 생성합니다. 정규식이 잘못되면 `InvalidPattern`을 반환합니다.
    pub fn new(attribute: impl Into<String>, pattern: &str) -> Result<Self, TreeError> {
        let attribute = attribute.into();
        let pattern = Regex::new(pattern).map_err(|e| TreeError::InvalidPattern {
            attribute: attribute.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self { attribute, pattern })
    }

    /// 대상 속성 이름
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// 노드가 조건을 만족하는지 평가합니다.
    ///
    /// 속성이 없거나 값이 문자열이 아니면 false입니다.
    pub fn matches(&self, node: &Value) -> bool {
        let value = match node {
            Value::Object(map) => map.get(&self.attribute),
            Value::Array(items) => self
                .attribute
                .parse::<usize>()
                .ok()
                .and_then(|idx| items.get(idx)),
            _ => None,
        };
        match value {
            Some(Value::String(s)) => self.pattern.is_match(s),
            _ => false,
        }
    }
}

/// 탐색 결과 한 건
#[derive(Debug, Clone, PartialEq)]
pub struct PathMatch<'a> {
    /// 매칭된 노드의 경로 (루트는 `""`)
    pub path: String,
    /// 매칭된 노드
    pub node: &'a Value,
}

/// 조건 집합으로 문서를 탐색하는 인덱서
///
/// 조건은 AND 결합이며, 조건이 비어 있으면 모든 객체/배열 노드가 매칭됩니다.
#[derive(Debug, Clone, Default)]
pub struct PathIndexer {
    predicates: Vec<Predicate>,
}

impl PathIndexer {
    pub fn new(predicates: Vec<Predicate>) -> Self {
        Self { predicates }
    }

    /// `(속성, 정규식)` 목록으로 인덱서를 생성합니다.
    pub fn from_patterns(patterns: &[(&str, &str)]) -> Result<Self, TreeError> {
        let predicates = patterns
            .iter()
            .map(|(attribute, pattern)| Predicate::new(*attribute, pattern))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(predicates))
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// 노드 하나가 모든 조건을 만족하는지 평가합니다.
    pub fn is_match(&self, node: &Value) -> bool {
        (node.is_object() || node.is_array()) && self.predicates.iter().all(|p| p.matches(node))
    }

    /// 문서 전체에서 매칭 노드를 문서 순서대로 찾습니다.
    ///
    /// 매칭된 노드 내부도 계속 탐색하므로 중첩 매칭이 모두 보고됩니다.
    pub fn find_matches<'a>(&self, document: &'a Value) -> Vec<PathMatch<'a>> {
        let mut out = Vec::new();
        self.visit(document, String::new(), &mut out);
        out
    }

    fn visit<'a>(&self, node: &'a Value, at: String, out: &mut Vec<PathMatch<'a>>) {
        match node {
            Value::Object(map) => {
                if self.is_match(node) {
                    out.push(PathMatch {
                        path: at.clone(),
                        node,
                    });
                }
                for (key, child) in map {
                    self.visit(child, path::join_key(&at, key), out);
                }
            }
            Value::Array(items) => {
                if self.is_match(node) {
                    out.push(PathMatch {
                        path: at.clone(),
                        node,
                    });
                }
                for (idx, child) in items.iter().enumerate() {
                    self.visit(child, path::join_index(&at, idx), out);
                }
            }
            _ => {}
        }
    }

    /// `target` 경로를 감싸는 가장 가까운(가장 긴 경로의) 매칭 조상을 찾습니다.
    ///
    /// `target` 자체는 후보에서 제외됩니다.
    pub fn find_closest_ancestor<'a>(
        &self,
        document: &'a Value,
        target: &str,
    ) -> Option<PathMatch<'a>> {
        let segments = path::segments(target);
        let mut node = document;
        let mut at = String::new();
        let mut closest = None;

        for segment in &segments {
            if self.is_match(node) {
                closest = Some(PathMatch {
                    path: at.clone(),
                    node,
                });
            }
            let next = match segment {
                Segment::Key(key) => {
                    at = path::join_key(&at, key);
                    node.get(key.as_str())
                }
                Segment::Index(idx) => {
                    at = path::join_index(&at, *idx);
                    node.get(*idx)
                }
            };
            match next {
                Some(child) => node = child,
                None => break,
            }
        }
        closest
    }
}

/// 경로에 해당하는 노드를 반환합니다.
pub fn resolve<'a>(document: &'a Value, target: &str) -> Option<&'a Value> {
    path::segments(target)
        .iter()
        .try_fold(document, |node, segment| match segment {
            Segment::Key(key) => node.get(key.as_str()),
            Segment::Index(idx) => node.get(*idx),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn library_indexer() -> PathIndexer {
        PathIndexer::from_patterns(&[("library", r"^H5P\.\w+ \d+\.\d+$")]).unwrap()
    }

    fn nested_doc() -> Value {
        json!({
            "chapters": [
                {
                    "library": "H5P.Column 1.16",
                    "params": {
                        "content": [
                            { "content": { "library": "H5P.Image 1.1", "params": {} } },
                            { "content": { "library": "H5P.Text 1.1", "params": {} } }
                        ]
                    }
                }
            ],
            "cover": { "library": "not a library" }
        })
    }

    #[test]
    fn finds_nested_matches_in_document_order() {
        let doc = nested_doc();
        let paths: Vec<_> = library_indexer()
            .find_matches(&doc)
            .into_iter()
            .map(|m| m.path)
            .collect();
        assert_eq!(
            paths,
            vec![
                "chapters[0]",
                "chapters[0].params.content[0].content",
                "chapters[0].params.content[1].content",
            ]
        );
    }

    #[test]
    fn non_string_values_do_not_match() {
        let doc = json!({ "a": { "library": 5 }, "b": { "library": null } });
        assert!(library_indexer().find_matches(&doc).is_empty());
    }

    #[test]
    fn all_predicates_must_match() {
        let doc = json!({
            "file": { "mime": "image/png", "path": "images/a.png" },
            "other": { "mime": "image/png" }
        });
        let indexer =
            PathIndexer::from_patterns(&[("mime", r"^image/"), ("path", r"^.+$")]).unwrap();
        let matches = indexer.find_matches(&doc);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].path, "file");
        assert_eq!(matches[0].node["path"], "images/a.png");
    }

    #[test]
    fn root_can_match() {
        let doc = json!({ "library": "H5P.Image 1.1" });
        let matches = library_indexer().find_matches(&doc);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].path, "");
    }

    #[test]
    fn array_attribute_by_index() {
        let doc = json!({ "pair": ["x", "y"] });
        let indexer = PathIndexer::from_patterns(&[("1", "^y$")]).unwrap();
        let matches = indexer.find_matches(&doc);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].path, "pair");
    }

    #[test]
    fn empty_predicates_match_every_container() {
        let doc = json!({ "a": [1, { "b": {} }] });
        let paths: Vec<_> = PathIndexer::default()
            .find_matches(&doc)
            .into_iter()
            .map(|m| m.path)
            .collect();
        assert_eq!(paths, vec!["", "a", "a[1]", "a[1].b"]);
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let err = Predicate::new("library", "[unclosed").unwrap_err();
        assert!(matches!(err, TreeError::InvalidPattern { .. }));
    }

    #[test]
    fn closest_ancestor_is_deepest_enclosing_match() {
        let doc = nested_doc();
        let found = library_indexer()
            .find_closest_ancestor(&doc, "chapters[0].params.content[0].content.params.file")
            .unwrap();
        assert_eq!(found.path, "chapters[0].params.content[0].content");
        assert_eq!(found.node["library"], "H5P.Image 1.1");
    }

    #[test]
    fn closest_ancestor_excludes_target_itself() {
        let doc = nested_doc();
        let found = library_indexer()
            .find_closest_ancestor(&doc, "chapters[0].params.content[0].content")
            .unwrap();
        assert_eq!(found.path, "chapters[0]");
    }

    #[test]
    fn closest_ancestor_none_outside_matches() {
        let doc = nested_doc();
        assert!(
            library_indexer()
                .find_closest_ancestor(&doc, "cover.library")
                .is_none()
        );
    }

    #[test]
    fn resolve_follows_segments() {
        let doc = nested_doc();
        assert_eq!(
            resolve(&doc, "chapters[0].params.content[1].content.library"),
            Some(&json!("H5P.Text 1.1"))
        );
        assert_eq!(resolve(&doc, ""), Some(&doc));
        assert!(resolve(&doc, "chapters[3]").is_none());
    }
}
