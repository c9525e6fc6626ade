//! Directed resource graph produced by materializing a [`JobSpecification`](crate::JobSpecification).
//!
//! The graph is an arena: nodes live in a vector and are addressed by index,
//! containment is stored as per-node child index lists plus a flat edge list.
//! Nodes borrow the resource tree they were built from.

pub mod export;
pub mod materialize;
pub mod triples;

use fxhash::{FxHashMap, FxHashSet};
use serde::Serialize;

use crate::common::error::FieldError;
use crate::resource::ResourceNode;
use crate::{FieldPath, Identity, NodeId};

/// Type name reported by the synthetic root.
pub const ROOT_TYPE: &str = "root";

/// Anything that lives in a resource graph exposes a stable numeric id.
pub trait Node {
    fn id(&self) -> NodeId;
}

impl Node for ResourceNode {
    #[inline]
    fn id(&self) -> NodeId {
        ResourceNode::id(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GraphNode<'a> {
    /// Synthetic anchor of all root resources, always id 0.
    Root,
    Resource(&'a ResourceNode),
}

impl<'a> GraphNode<'a> {
    pub fn resource(&self) -> Option<&'a ResourceNode> {
        match self {
            GraphNode::Root => None,
            GraphNode::Resource(node) => Some(node),
        }
    }

    pub fn resource_type(&self) -> &'a str {
        match self {
            GraphNode::Root => ROOT_TYPE,
            GraphNode::Resource(node) => node.resource_type(),
        }
    }

    pub fn identity(&self) -> Option<Identity> {
        self.resource().and_then(|r| r.identity())
    }

    pub fn is_root(&self) -> bool {
        matches!(self, GraphNode::Root)
    }
}

impl Node for GraphNode<'_> {
    fn id(&self) -> NodeId {
        match self {
            GraphNode::Root => NodeId::UNASSIGNED,
            GraphNode::Resource(node) => node.id(),
        }
    }
}

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize)]
pub enum EdgeLabel {
    #[serde(rename = "with")]
    With,
}

impl EdgeLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeLabel::With => "with",
        }
    }
}

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub label: EdgeLabel,
}

#[derive(Debug, Default)]
pub struct ResourceGraph<'a> {
    nodes: Vec<GraphNode<'a>>,
    children: Vec<Vec<usize>>,
    index: FxHashMap<NodeId, usize>,
    identities: FxHashSet<Identity>,
    edges: Vec<Edge>,
    edge_set: FxHashSet<(NodeId, NodeId)>,
    roots: Vec<usize>,
    anchor: Option<usize>,
}

impl<'a> ResourceGraph<'a> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let mut graph = Self::default();
        graph.nodes.reserve(capacity);
        graph.children.reserve(capacity);
        graph.index.reserve(capacity);
        graph
    }

    pub(crate) fn add_node(&mut self, node: GraphNode<'a>) -> crate::Result<usize> {
        let id = node.id();
        if self.index.contains_key(&id) {
            return Err(FieldError::DuplicateIdentifier(id));
        }
        if let Some(identity) = node.identity() {
            if !self.identities.insert(identity) {
                return Err(FieldError::DuplicateIdentity(identity));
            }
        }
        let idx = self.nodes.len();
        if node.is_root() {
            self.anchor = Some(idx);
        }
        self.nodes.push(node);
        self.children.push(Vec::new());
        self.index.insert(id, idx);
        Ok(idx)
    }

    pub(crate) fn add_edge(
        &mut self,
        parent: usize,
        child: usize,
        path: &FieldPath,
    ) -> crate::Result<()> {
        let source = self.nodes[parent].id();
        let target = self.nodes[child].id();
        if source == target {
            return Err(FieldError::CyclicStructure {
                id: source,
                path: path.clone(),
            });
        }
        if !self.edge_set.insert((source, target)) {
            return Err(FieldError::DuplicateEdge {
                parent: source,
                child: target,
            });
        }
        self.children[parent].push(child);
        self.edges.push(Edge {
            source,
            target,
            label: EdgeLabel::With,
        });
        Ok(())
    }

    pub(crate) fn add_root(&mut self, idx: usize) {
        self.roots.push(idx);
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Nodes in insertion order: the synthetic root first (if any), then resources in post-order.
    pub fn nodes(&self) -> &[GraphNode<'a>] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: NodeId) -> Option<&GraphNode<'a>> {
        self.index.get(&id).map(|idx| &self.nodes[*idx])
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn has_edge(&self, source: NodeId, target: NodeId) -> bool {
        self.edge_set.contains(&(source, target))
    }

    /// Direct children of a node in document order.
    pub fn children_of(&self, id: NodeId) -> impl Iterator<Item = &GraphNode<'a>> {
        self.index
            .get(&id)
            .into_iter()
            .flat_map(move |idx| self.children[*idx].iter().map(move |c| &self.nodes[*c]))
    }

    /// Top-level resources in document order (never the synthetic root).
    pub fn roots(&self) -> impl Iterator<Item = &GraphNode<'a>> {
        self.roots.iter().map(move |idx| &self.nodes[*idx])
    }

    /// The synthetic root, when the graph was materialized with one.
    pub fn anchor(&self) -> Option<&GraphNode<'a>> {
        self.anchor.map(|idx| &self.nodes[idx])
    }

    pub(crate) fn child_indices(&self, idx: usize) -> &[usize] {
        &self.children[idx]
    }

    pub(crate) fn root_indices(&self) -> &[usize] {
        &self.roots
    }
}
