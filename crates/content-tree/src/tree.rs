//! 콘텐츠 트리 arena
//!
//! 모든 노드를 `Vec<Content>`에 보관하고 부모/자식 관계는 [`NodeId`]로만 참조합니다.
//! 루트는 항상 `NodeId(0)`입니다.

use std::ops::Index;

use serde::Serialize;

use crate::content::{Content, NodeId};

/// 루트가 있는 콘텐츠 트리
#[derive(Debug, Clone)]
pub struct ContentTree {
    nodes: Vec<Content>,
}

impl ContentTree {
    /// 루트 노드로 트리를 생성합니다.
    pub fn new(root: Content) -> Self {
        Self { nodes: vec![root] }
    }

    pub const ROOT: NodeId = NodeId(0);

    pub fn root(&self) -> &Content {
        &self.nodes[0]
    }

    pub fn get(&self, id: NodeId) -> Option<&Content> {
        self.nodes.get(id.0)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Content> {
        self.nodes.get_mut(id.0)
    }

    /// 등록된 노드 수 (연결되지 않은 노드 포함)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// 연결되지 않은 노드를 추가합니다.
    pub fn insert(&mut self, content: Content) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(content);
        id
    }

    /// `child`를 `parent`의 마지막 자식으로 연결합니다.
    ///
    /// 이미 자식이면 아무것도 하지 않습니다. 루트를 자식으로 만들거나 순환이 생기는 연결은 거부합니다.
    /// 다른 부모에 연결되어 있던 노드는 그 부모에서 분리됩니다.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if self.get(parent).is_none() || self.get(child).is_none() || child == Self::ROOT {
            return false;
        }
        if parent == child || self.ancestors(parent).contains(&child) {
            return false;
        }
        if self.nodes[parent.0].children.contains(&child) {
            return false;
        }
        if let Some(previous) = self.nodes[child.0].parent {
            self.nodes[previous.0].children.retain(|c| *c != child);
        }
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
        true
    }

    /// 자식 연결을 끊습니다. 자식이 아니었으면 false
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let Some(node) = self.nodes.get_mut(parent.0) else {
            return false;
        };
        let before = node.children.len();
        node.children.retain(|c| *c != child);
        if node.children.len() == before {
            return false;
        }
        self.nodes[child.0].parent = None;
        true
    }

    pub fn clear_children(&mut self, parent: NodeId) {
        let Some(node) = self.nodes.get_mut(parent.0) else {
            return;
        };
        let children = std::mem::take(&mut node.children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or_default()
    }

    /// 가까운 조상부터 루트까지
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.parent(id);
        while let Some(p) = current {
            if out.contains(&p) {
                break;
            }
            out.push(p);
            current = self.parent(p);
        }
        out
    }

    /// 루트에서 도달 가능한 노드를 전위 순서로 반환합니다.
    pub fn depth_first(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![Self::ROOT];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    /// 전위 순서로 노드를 순회합니다.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Content)> {
        self.depth_first().into_iter().map(|id| (id, &self.nodes[id.0]))
    }

    pub fn find_by_id(&self, id: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.id == id).map(NodeId)
    }

    pub fn find_by_path(&self, semantics_path: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.semantics_path == semantics_path)
            .map(NodeId)
    }

    /// 표시용 트리 뷰
    pub fn view(&self) -> TreeView {
        self.view_of(Self::ROOT)
    }

    fn view_of(&self, id: NodeId) -> TreeView {
        let node = &self.nodes[id.0];
        TreeView {
            id: node.id.clone(),
            title: node.title().to_owned(),
            label: node.describe("{title} ({machineName})"),
            versioned_library_id: node.versioned_library_id.clone(),
            children: node.children.iter().map(|c| self.view_of(*c)).collect(),
        }
    }
}

impl Index<NodeId> for ContentTree {
    type Output = Content;

    fn index(&self, id: NodeId) -> &Content {
        &self.nodes[id.0]
    }
}

/// 직렬화 가능한 트리 뷰
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeView {
    pub id: String,
    pub title: String,
    pub label: String,
    pub versioned_library_id: String,
    pub children: Vec<TreeView>,
}

impl TreeView {
    /// 이 뷰를 포함한 전체 노드 수
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(TreeView::count).sum::<usize>()
    }
}
