#![doc = include_str!("../README.md")]
//!
//! # 모듈 구조
//!
//! - [`path`]: 시맨틱 경로 결합/분해, 세그먼트 단위 조상 판정
//! - [`indexer`]: 속성/정규식 조건 기반 JSON 구조 탐색 (`PathIndexer`)
//! - [`metadata`]: 저작권/라이선스 메타데이터
//! - [`facts`]: 분석 입력 (`Manifest`, `LibraryFacts`, `MediaFacts`, `PackageFacts`)
//! - [`content`]: 노드/파일 모델 (`Content`, `ContentFile`)
//! - [`tree`]: arena 기반 트리 (`ContentTree`, `TreeView`)
//! - [`builder`]: 트리 구성 (`TreeBuilder`)

pub mod builder;
pub mod content;
pub mod error;
pub mod facts;
pub mod indexer;
pub mod metadata;
pub mod path;
pub mod tree;

// --- 주요 타입 re-export ---

pub use builder::{TreeBuilder, build_tree};
pub use content::{Content, ContentFile, ContentRole, FileKind, NodeId};
pub use error::TreeError;
pub use facts::{
    AccessibilityRecord, LibraryFacts, LibraryRef, Manifest, MediaFacts, PackageFacts,
};
pub use indexer::{PathIndexer, PathMatch, Predicate};
pub use metadata::{Author, Change, Metadata};
pub use tree::{ContentTree, TreeView};
