use fxhash::FxHashSet;

use crate::common::error::FieldError;
use crate::graph::{GraphNode, ResourceGraph};
use crate::jobspec::JobSpecification;
use crate::resource::ResourceNode;
use crate::{FieldPath, IdCounter, Identity, NodeId};

/// Turns decoded specifications into graphs with unique node ids and identities.
///
/// A materializer owns its id counter. Specifications materialized by the same
/// instance never share ids; independent instances started at the same value
/// number identical trees identically.
#[derive(Debug, Default)]
pub struct Materializer {
    counter: IdCounter,
    anchor_root: bool,
}

/// What a single assignment pass changed in the tree.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AssignStats {
    pub new_ids: usize,
    pub new_identities: usize,
}

impl Materializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(first_id: u64) -> Self {
        Self::with_counter(IdCounter::starting_at(first_id))
    }

    pub fn with_counter(counter: IdCounter) -> Self {
        Self {
            counter,
            anchor_root: false,
        }
    }

    /// Adds a synthetic root (id 0) with a `with` edge to every root resource.
    pub fn with_anchor_root(mut self, anchor_root: bool) -> Self {
        self.anchor_root = anchor_root;
        self
    }

    pub fn counter(&self) -> &IdCounter {
        &self.counter
    }

    /// Assigns ids (post-order) and identities to every node that lacks them.
    /// Values already present in the tree are kept.
    ///
    /// Neither the tree nor the counter is touched when the remaining ids cannot
    /// cover every unnumbered node.
    pub fn assign(&mut self, spec: &mut JobSpecification) -> crate::Result<AssignStats> {
        let mut counter = self.counter.clone();
        counter.raise_above(spec.max_assigned_id())?;
        let missing = spec
            .iter_resources()
            .filter(|r| !r.id().is_assigned())
            .count() as u64;
        if missing > counter.remaining() {
            return Err(FieldError::IdsExhausted(counter.peek()));
        }
        self.counter = counter;

        let mut stats = AssignStats::default();
        for resource in spec.resources.iter_mut() {
            self.assign_node(resource, &mut stats)?;
        }
        Ok(stats)
    }

    fn assign_node(
        &mut self,
        node: &mut ResourceNode,
        stats: &mut AssignStats,
    ) -> crate::Result<()> {
        for child in node.children_mut() {
            self.assign_node(child, stats)?;
        }
        if !node.id().is_assigned() {
            let id = self.counter.next()?;
            log::trace!("Assigning id {id} to `{}`", node.resource_type());
            node.assign_id(id);
            stats.new_ids += 1;
        }
        if node.assign_identity(Identity::generate) {
            stats.new_identities += 1;
        }
        Ok(())
    }

    /// Assigns missing ids and identities, then builds the containment graph.
    ///
    /// Fails without returning a graph when two nodes share an id or identity, or when
    /// a node would become its own descendant. Such a failure leaves the specification
    /// and the counter as they were.
    pub fn materialize<'a>(
        &mut self,
        spec: &'a mut JobSpecification,
    ) -> crate::Result<ResourceGraph<'a>> {
        check_supplied(spec)?;
        let stats = self.assign(spec)?;
        let spec: &'a JobSpecification = spec;
        let graph = build_graph(spec, self.anchor_root)?;
        log::debug!(
            "Materialized {} node(s) and {} edge(s); {} new id(s), {} new identities",
            graph.node_count(),
            graph.edge_count(),
            stats.new_ids,
            stats.new_identities
        );
        Ok(graph)
    }
}

/// Rejects ids and identities carried in by the document that could not form a graph.
/// Ids handed out by the counter are above all of them, so only these can collide.
fn check_supplied(spec: &JobSpecification) -> crate::Result<()> {
    let mut ids = FxHashSet::default();
    let mut identities = FxHashSet::default();
    let mut ancestors = Vec::new();
    let path = FieldPath::root().key("resources");
    for (i, resource) in spec.resources.iter().enumerate() {
        check_subtree(
            resource,
            &path.index(i),
            &mut ancestors,
            &mut ids,
            &mut identities,
        )?;
    }
    Ok(())
}

fn check_subtree(
    node: &ResourceNode,
    path: &FieldPath,
    ancestors: &mut Vec<NodeId>,
    ids: &mut FxHashSet<NodeId>,
    identities: &mut FxHashSet<Identity>,
) -> crate::Result<()> {
    let id = node.id();
    if id.is_assigned() {
        if ancestors.contains(&id) {
            return Err(FieldError::CyclicStructure {
                id,
                path: path.clone(),
            });
        }
        if !ids.insert(id) {
            return Err(FieldError::DuplicateIdentifier(id));
        }
    }
    if let Some(identity) = node.identity() {
        if !identities.insert(identity) {
            return Err(FieldError::DuplicateIdentity(identity));
        }
    }

    ancestors.push(id);
    for (i, child) in node.children().iter().enumerate() {
        check_subtree(child, &path.key("with").index(i), ancestors, ids, identities)?;
    }
    ancestors.pop();
    Ok(())
}

fn build_graph(spec: &JobSpecification, anchor_root: bool) -> crate::Result<ResourceGraph<'_>> {
    let mut graph = ResourceGraph::with_capacity(spec.resource_count() + 1);
    let anchor = if anchor_root {
        Some(graph.add_node(GraphNode::Root)?)
    } else {
        None
    };

    let path = FieldPath::root().key("resources");
    let mut ancestors = Vec::new();
    for (i, resource) in spec.resources.iter().enumerate() {
        let resource_path = path.index(i);
        let idx = add_subtree(&mut graph, resource, &resource_path, &mut ancestors)?;
        graph.add_root(idx);
        if let Some(anchor) = anchor {
            graph.add_edge(anchor, idx, &resource_path)?;
        }
    }
    Ok(graph)
}

/// Inserts children before their parent and links the parent to each of them.
fn add_subtree<'a>(
    graph: &mut ResourceGraph<'a>,
    node: &'a ResourceNode,
    path: &FieldPath,
    ancestors: &mut Vec<NodeId>,
) -> crate::Result<usize> {
    let id = node.id();
    if ancestors.contains(&id) {
        return Err(FieldError::CyclicStructure {
            id,
            path: path.clone(),
        });
    }

    ancestors.push(id);
    let children = node
        .children()
        .iter()
        .enumerate()
        .map(|(i, child)| add_subtree(graph, child, &path.key("with").index(i), ancestors))
        .collect::<crate::Result<Vec<_>>>()?;
    ancestors.pop();

    let idx = graph.add_node(GraphNode::Resource(node))?;
    for child in children {
        graph.add_edge(idx, child, path)?;
    }
    Ok(idx)
}

#[cfg(test)]
mod test {
    use super::Materializer;
    use crate::common::error::FieldError;
    use crate::graph::Node;
    use crate::{Identity, JobSpecification, NodeId, ResourceNode};

    fn chain() -> JobSpecification {
        JobSpecification::new(vec![
            ResourceNode::new("node")
                .with_child(ResourceNode::new("socket").with_child(ResourceNode::new("core"))),
        ])
    }

    #[test]
    fn test_assign_post_order() {
        let mut spec = chain();
        let stats = Materializer::new().assign(&mut spec).unwrap();
        assert_eq!(stats.new_ids, 3);
        assert_eq!(stats.new_identities, 3);
        let node = &spec.resources[0];
        let socket = &node.children()[0];
        let core = &socket.children()[0];
        assert_eq!(core.id(), NodeId::new(1));
        assert_eq!(socket.id(), NodeId::new(2));
        assert_eq!(node.id(), NodeId::new(3));
    }

    #[test]
    fn test_counter_seeded_above_existing_ids() {
        let mut spec = JobSpecification::new(vec![
            ResourceNode::new("node")
                .with_child(ResourceNode::new("core").with_id(NodeId::new(10)))
                .with_child(ResourceNode::new("core")),
        ]);
        Materializer::new().assign(&mut spec).unwrap();
        let node = &spec.resources[0];
        assert_eq!(node.children()[0].id(), NodeId::new(10));
        assert_eq!(node.children()[1].id(), NodeId::new(11));
        assert_eq!(node.id(), NodeId::new(12));
    }

    #[test]
    fn test_anchor_root() {
        let mut spec = JobSpecification::new(vec![
            ResourceNode::new("node"),
            ResourceNode::new("node"),
        ]);
        let mut materializer = Materializer::new().with_anchor_root(true);
        let graph = materializer.materialize(&mut spec).unwrap();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        let anchor = graph.anchor().unwrap();
        assert!(anchor.is_root());
        assert_eq!(anchor.id(), NodeId::UNASSIGNED);
        assert_eq!(anchor.resource_type(), "root");
        assert!(graph.has_edge(NodeId::UNASSIGNED, NodeId::new(1)));
        assert!(graph.has_edge(NodeId::UNASSIGNED, NodeId::new(2)));
        assert_eq!(graph.roots().count(), 2);
    }

    #[test]
    fn test_duplicate_document_ids() {
        let mut spec = JobSpecification::new(vec![
            ResourceNode::new("node").with_id(NodeId::new(5)),
            ResourceNode::new("node").with_id(NodeId::new(5)),
        ]);
        assert!(matches!(
            Materializer::new().materialize(&mut spec),
            Err(FieldError::DuplicateIdentifier(id)) if id == NodeId::new(5)
        ));
    }

    #[test]
    fn test_ancestor_id_reuse_is_cyclic() {
        let mut spec = JobSpecification::new(vec![
            ResourceNode::new("node").with_id(NodeId::new(5)).with_child(
                ResourceNode::new("socket")
                    .with_child(ResourceNode::new("core").with_id(NodeId::new(5))),
            ),
        ]);
        let err = Materializer::new().materialize(&mut spec).unwrap_err();
        match err {
            FieldError::CyclicStructure { id, path } => {
                assert_eq!(id, NodeId::new(5));
                assert_eq!(path.to_string(), "resources[0].with[0].with[0]");
            }
            err => panic!("unexpected error {err}"),
        }
    }

    #[test]
    fn test_duplicate_document_identities() {
        let identity = Identity::generate();
        let mut spec = JobSpecification::new(vec![
            ResourceNode::new("node").with_identity(identity),
            ResourceNode::new("node").with_identity(identity),
        ]);
        assert!(matches!(
            Materializer::new().materialize(&mut spec),
            Err(FieldError::DuplicateIdentity(_))
        ));
    }

    #[test]
    fn test_shared_materializer_keeps_ids_unique() {
        let mut materializer = Materializer::starting_at(100);
        let mut first = chain();
        let mut second = chain();
        materializer.assign(&mut first).unwrap();
        materializer.assign(&mut second).unwrap();
        assert_eq!(first.resources[0].id(), NodeId::new(102));
        assert_eq!(second.resources[0].id(), NodeId::new(105));
        assert_eq!(materializer.counter().peek(), NodeId::new(106));
    }

    #[test]
    fn test_failed_materialize_changes_nothing() {
        let mut spec = JobSpecification::new(vec![
            ResourceNode::new("node")
                .with_id(NodeId::new(5))
                .with_child(ResourceNode::new("core")),
            ResourceNode::new("node").with_id(NodeId::new(5)),
        ]);
        let before = spec.clone();
        let mut materializer = Materializer::new();
        assert!(matches!(
            materializer.materialize(&mut spec),
            Err(FieldError::DuplicateIdentifier(_))
        ));
        assert_eq!(spec, before);
        assert!(spec.resources[0].children()[0].identity().is_none());
        assert_eq!(materializer.counter().peek(), NodeId::new(1));
    }

    #[test]
    fn test_largest_id_leaves_no_room() {
        let mut spec = JobSpecification::new(vec![
            ResourceNode::new("node").with_id(NodeId::new(u64::MAX)),
        ]);
        let before = spec.clone();
        let mut materializer = Materializer::new();
        assert!(matches!(
            materializer.materialize(&mut spec),
            Err(FieldError::IdsExhausted(id)) if id == NodeId::new(u64::MAX)
        ));
        assert_eq!(spec, before);
        assert_eq!(materializer.counter().peek(), NodeId::new(1));
    }

    #[test]
    fn test_counter_capacity_checked_before_assigning() {
        let mut spec = JobSpecification::new(vec![
            ResourceNode::new("node")
                .with_child(ResourceNode::new("core"))
                .with_child(ResourceNode::new("core")),
        ]);
        let before = spec.clone();
        let mut materializer = Materializer::starting_at(u64::MAX - 2);
        assert!(matches!(
            materializer.assign(&mut spec),
            Err(FieldError::IdsExhausted(_))
        ));
        assert_eq!(spec, before);
        assert_eq!(materializer.counter().peek(), NodeId::new(u64::MAX - 2));

        let mut spec = JobSpecification::new(vec![
            ResourceNode::new("node").with_child(ResourceNode::new("core")),
        ]);
        let stats = materializer.assign(&mut spec).unwrap();
        assert_eq!(stats.new_ids, 2);
        assert_eq!(spec.resources[0].id(), NodeId::new(u64::MAX - 1));
    }
}
