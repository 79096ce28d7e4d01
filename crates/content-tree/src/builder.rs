//! 트리 구성기 -- 매니페스트와 파라미터로부터 콘텐츠 트리 복원
//!
//! 1. 매니페스트로 루트 노드 생성 (유일한 실패 지점)
//! 2. `library` 필드로 모든 하위 콘텐츠 인스턴스를 한 번에 탐색
//! 3. 경로 정렬 후 최장 조상 경로를 부모로 지정
//! 4. 노드별 파일 도출 (하위 콘텐츠 내부 제외)
//! 5. 미디어/라이브러리/접근성 사실로 보강

use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use crate::content::{Content, ContentFile, ContentRole, NodeId, ROOT_ID};
use crate::error::TreeError;
use crate::facts::PackageFacts;
use crate::indexer::PathIndexer;
use crate::metadata::Metadata;
use crate::path;
use crate::tree::ContentTree;

/// 하위 콘텐츠 인스턴스를 나타내는 `library` 값 형식
pub const LIBRARY_PATTERN: &str = r"^H5P\.\w+ \d+\.\d+$";

const MIME_PATTERN: &str = r"^[\w.+-]+/[\w.+-]+$";

/// 파일 필드 위치가 정해져 있는 미디어 라이브러리
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LeafMedia {
    /// 단일 `file`
    Image,
    /// `files[]`
    Audio,
    /// `sources[]`
    Video,
}

impl LeafMedia {
    fn from_machine_name(name: &str) -> Option<Self> {
        match name {
            "H5P.Image" => Some(Self::Image),
            "H5P.Audio" => Some(Self::Audio),
            "H5P.Video" => Some(Self::Video),
            _ => None,
        }
    }
}

/// 트리 구성기
pub struct TreeBuilder<'a> {
    facts: &'a PackageFacts,
    libraries: PathIndexer,
    files: PathIndexer,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(facts: &'a PackageFacts) -> Result<Self, TreeError> {
        Ok(Self {
            facts,
            libraries: PathIndexer::from_patterns(&[("library", LIBRARY_PATTERN)])?,
            files: PathIndexer::from_patterns(&[("mime", MIME_PATTERN), ("path", r"^.+$")])?,
        })
    }

    /// 트리를 구성합니다.
    ///
    /// 메인 라이브러리를 확인할 수 없을 때만 실패합니다.
    pub fn build(&self) -> Result<ContentTree, TreeError> {
        let manifest = &self.facts.manifest;
        let root_library = manifest.main_library_id()?;

        let root = Content::new(
            ROOT_ID,
            ContentRole::Root {
                metadata_settings: manifest.metadata_settings.clone(),
            },
            root_library,
            "",
            self.facts.params.clone(),
            manifest.metadata.clone(),
        );
        let mut tree = ContentTree::new(root);

        let mut discovered = self.discover();
        discovered.sort_by(|a, b| path::compare(&a.semantics_path, &b.semantics_path));

        // 정렬 순서상 조상이 먼저 오므로 스택 꼭대기의 조상이 최장 접두 경로입니다.
        let mut stack: Vec<(String, NodeId)> = Vec::new();
        for content in discovered {
            let child_path = content.semantics_path.clone();
            while let Some((top, _)) = stack.last() {
                if path::is_ancestor(top, &child_path) {
                    break;
                }
                stack.pop();
            }
            let parent = stack.last().map_or(ContentTree::ROOT, |(_, id)| *id);
            let id = tree.insert(content);
            tree.add_child(parent, id);
            debug!(path = %child_path, parent = %parent, "sub-content attached");
            stack.push((child_path, id));
        }

        for id in tree.depth_first() {
            let files = self.derive_files(&tree[id]);
            if let Some(node) = tree.get_mut(id) {
                node.files = files;
                self.enrich(node);
            }
        }

        info!(
            main_library = %tree.root().versioned_library_id,
            nodes = tree.len(),
            "content tree built"
        );
        Ok(tree)
    }

    /// 루트 파라미터 안의 모든 하위 콘텐츠 인스턴스를 노드로 만듭니다.
    fn discover(&self) -> Vec<Content> {
        self.libraries
            .find_matches(&self.facts.params)
            .into_iter()
            .map(|m| {
                let library = m
                    .node
                    .get("library")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                let id = m
                    .node
                    .get("subContentId")
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty())
                    .map_or_else(|| Uuid::new_v4().to_string(), str::to_owned);
                let metadata = m
                    .node
                    .get("metadata")
                    .map(Metadata::from_h5p_metadata)
                    .unwrap_or_default();
                let params = m.node.get("params").cloned().unwrap_or(Value::Null);

                debug!(path = %m.path, library, id = %id, "sub-content discovered");
                Content::new(
                    id,
                    ContentRole::SubContent {
                        library_path: m.path.clone(),
                    },
                    library,
                    path::join_key(&m.path, "params"),
                    params,
                    metadata,
                )
            })
            .collect()
    }

    /// 노드 자신의 파라미터에서 파일 참조를 도출합니다.
    fn derive_files(&self, content: &Content) -> Vec<ContentFile> {
        let leaf = content.machine_name().and_then(LeafMedia::from_machine_name);
        match leaf {
            Some(kind) => self.leaf_files(content, kind),
            None => self.generic_files(content),
        }
    }

    fn leaf_files(&self, content: &Content, kind: LeafMedia) -> Vec<ContentFile> {
        let params = &content.params;
        let fields: Vec<(String, &Value)> = match kind {
            LeafMedia::Image => params
                .get("file")
                .map(|f| (path::join_key(&content.semantics_path, "file"), f))
                .into_iter()
                .collect(),
            LeafMedia::Audio | LeafMedia::Video => {
                let key = if kind == LeafMedia::Audio {
                    "files"
                } else {
                    "sources"
                };
                let base = path::join_key(&content.semantics_path, key);
                params
                    .get(key)
                    .and_then(Value::as_array)
                    .map(|items| {
                        items
                            .iter()
                            .enumerate()
                            .map(|(idx, f)| (path::join_index(&base, idx), f))
                            .collect()
                    })
                    .unwrap_or_default()
            }
        };

        fields
            .into_iter()
            .filter_map(|(semantics_path, field)| {
                let mut file = ContentFile::from_field(field, semantics_path)?;
                if file.metadata.license.is_none() {
                    file.metadata = content.metadata.clone();
                }
                if kind == LeafMedia::Image {
                    file.alt = params
                        .get("alt")
                        .and_then(Value::as_str)
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_owned);
                    file.decorative = params
                        .get("decorative")
                        .and_then(Value::as_bool)
                        .unwrap_or(false);
                }
                Some(file)
            })
            .collect()
    }

    fn generic_files(&self, content: &Content) -> Vec<ContentFile> {
        let nested: Vec<String> = self
            .libraries
            .find_matches(&content.params)
            .into_iter()
            .map(|m| m.path)
            .collect();

        self.files
            .find_matches(&content.params)
            .into_iter()
            .filter(|m| {
                !nested
                    .iter()
                    .any(|n| *n == m.path || path::is_ancestor(n, &m.path))
            })
            .filter_map(|m| {
                ContentFile::from_field(m.node, path::concat(&content.semantics_path, &m.path))
            })
            .collect()
    }

    fn enrich(&self, content: &mut Content) {
        for file in &mut content.files {
            if let Some(media) = self.facts.media_for(&file.path) {
                file.enrich(media);
            }
        }

        let Some(machine_name) = content.machine_name().map(str::to_owned) else {
            return;
        };
        content.library = self.facts.libraries.get(&machine_name).cloned();
        content.accessibility = self
            .facts
            .accessibility
            .get(&machine_name)
            .cloned()
            .or_else(|| content.library.as_ref().and_then(|l| l.accessibility.clone()));
    }
}

/// 트리를 구성하는 편의 함수
pub fn build_tree(facts: &PackageFacts) -> Result<ContentTree, TreeError> {
    TreeBuilder::new(facts)?.build()
}
