use std::collections::BTreeSet;

use serde::Serialize;

use crate::count::ResourceCount;
use crate::{Attributes, Identity, NodeId};

/// One level of the resource hierarchy together with everything nested under it.
///
/// Children are owned by their parent, so a decoded specification is always a tree.
/// `id` and `identity` stay unassigned until the tree is materialized, unless the
/// document already carried them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceNode {
    #[serde(rename = "type")]
    resource_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,

    count: ResourceCount,

    #[serde(skip_serializing_if = "Option::is_none")]
    unit: Option<String>,

    exclusive: bool,

    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    tags: BTreeSet<String>,

    #[serde(skip_serializing_if = "serde_json::Map::is_empty")]
    attributes: Attributes,

    #[serde(skip_serializing_if = "is_unassigned")]
    id: NodeId,

    #[serde(skip_serializing_if = "Option::is_none")]
    identity: Option<Identity>,

    #[serde(rename = "with", skip_serializing_if = "Vec::is_empty")]
    children: Vec<ResourceNode>,
}

fn is_unassigned(id: &NodeId) -> bool {
    !id.is_assigned()
}

impl ResourceNode {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            name: None,
            count: ResourceCount::default(),
            unit: None,
            exclusive: false,
            tags: Default::default(),
            attributes: Default::default(),
            id: NodeId::UNASSIGNED,
            identity: None,
            children: Vec::new(),
        }
    }

    pub fn with_count(mut self, count: ResourceCount) -> Self {
        self.count = count;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_exclusive(mut self, exclusive: bool) -> Self {
        self.exclusive = exclusive;
        self
    }

    pub fn with_tags<I: IntoIterator<Item = S>, S: Into<String>>(mut self, tags: I) -> Self {
        self.tags = tags.into_iter().map(|t| t.into()).collect();
        self
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_id(mut self, id: NodeId) -> Self {
        self.id = id;
        self
    }

    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identity = Some(identity);
        self
    }

    pub fn with_child(mut self, child: ResourceNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children<I: IntoIterator<Item = ResourceNode>>(mut self, children: I) -> Self {
        self.children.extend(children);
        self
    }

    #[inline]
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[inline]
    pub fn count(&self) -> &ResourceCount {
        &self.count
    }

    #[inline]
    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    #[inline]
    pub fn exclusive(&self) -> bool {
        self.exclusive
    }

    #[inline]
    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    #[inline]
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[inline]
    pub fn identity(&self) -> Option<Identity> {
        self.identity
    }

    #[inline]
    pub fn children(&self) -> &[ResourceNode] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut [ResourceNode] {
        &mut self.children
    }

    /// Sets the id if none is assigned yet; an assigned id is never replaced.
    pub(crate) fn assign_id(&mut self, id: NodeId) -> bool {
        if self.id.is_assigned() {
            return false;
        }
        self.id = id;
        true
    }

    /// Sets the identity if none is present; an existing identity is never regenerated.
    pub(crate) fn assign_identity(&mut self, identity: impl FnOnce() -> Identity) -> bool {
        if self.identity.is_some() {
            return false;
        }
        self.identity = Some(identity());
        true
    }

    /// Pre-order traversal of this node and all its descendants.
    pub fn iter(&self) -> impl Iterator<Item = &ResourceNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    /// Number of nodes in the subtree rooted at this node.
    pub fn node_count(&self) -> usize {
        self.iter().count()
    }
}
