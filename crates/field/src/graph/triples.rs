use serde::Serialize;

use crate::graph::{GraphNode, ResourceGraph};
use crate::resource::ResourceNode;
use crate::Identity;

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize)]
pub enum Predicate {
    #[serde(rename = "type")]
    Type,
    #[serde(rename = "id")]
    Id,
    #[serde(rename = "exclusive")]
    Exclusive,
    #[serde(rename = "with")]
    With,
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "unit")]
    Unit,
    #[serde(rename = "count.min")]
    CountMin,
    #[serde(rename = "count.max")]
    CountMax,
    #[serde(rename = "tag")]
    Tag,
}

impl Predicate {
    pub fn as_str(&self) -> &'static str {
        match self {
            Predicate::Type => "type",
            Predicate::Id => "id",
            Predicate::Exclusive => "exclusive",
            Predicate::With => "with",
            Predicate::Name => "name",
            Predicate::Unit => "unit",
            Predicate::CountMin => "count.min",
            Predicate::CountMax => "count.max",
            Predicate::Tag => "tag",
        }
    }
}

impl std::fmt::Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TripleObject {
    Identity(Identity),
    Text(String),
    Integer(u64),
    Bool(bool),
}

impl std::fmt::Display for TripleObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TripleObject::Identity(identity) => write!(f, "{identity}"),
            TripleObject::Text(text) => f.write_str(text),
            TripleObject::Integer(value) => write!(f, "{value}"),
            TripleObject::Bool(value) => write!(f, "{value}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Triple {
    pub subject: Identity,
    pub predicate: Predicate,
    pub object: TripleObject,
}

/// Which node fields are flattened into triples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PredicateSet {
    /// `type`, `id`, `exclusive` and `with`.
    #[default]
    Core,
    /// The core set plus `name`, `unit`, `count.min`, `count.max` and `tag`.
    Extended,
}

impl<'a> ResourceGraph<'a> {
    pub fn triples(&self) -> Vec<Triple> {
        self.triples_with(PredicateSet::Core)
    }

    /// Flattens the graph into triples: a node's own facts first, then for each child
    /// its whole subtree followed by the `with` triple linking the two.
    ///
    /// Nodes without an identity and the synthetic root produce nothing.
    pub fn triples_with(&self, set: PredicateSet) -> Vec<Triple> {
        let mut out = Vec::with_capacity(self.node_count() * 4);
        for idx in self.root_indices() {
            self.emit_subtree(*idx, set, &mut out);
        }
        log::debug!("Emitted {} triple(s)", out.len());
        out
    }

    fn emit_subtree(&self, idx: usize, set: PredicateSet, out: &mut Vec<Triple>) {
        let node = &self.nodes()[idx];
        let subject = match node {
            GraphNode::Resource(resource) => resource.identity().map(|identity| {
                emit_node(identity, resource, set, out);
                identity
            }),
            GraphNode::Root => None,
        };
        for child_idx in self.child_indices(idx) {
            self.emit_subtree(*child_idx, set, out);
            let child = &self.nodes()[*child_idx];
            if let (Some(subject), Some(object)) = (subject, child.identity()) {
                out.push(Triple {
                    subject,
                    predicate: Predicate::With,
                    object: TripleObject::Identity(object),
                });
            }
        }
    }
}

fn emit_node(subject: Identity, node: &ResourceNode, set: PredicateSet, out: &mut Vec<Triple>) {
    let mut push = |predicate, object| {
        out.push(Triple {
            subject,
            predicate,
            object,
        })
    };
    push(
        Predicate::Type,
        TripleObject::Text(node.resource_type().to_string()),
    );
    push(Predicate::Id, TripleObject::Integer(node.id().as_num()));
    push(Predicate::Exclusive, TripleObject::Bool(node.exclusive()));

    if set == PredicateSet::Extended {
        if let Some(name) = node.name() {
            push(Predicate::Name, TripleObject::Text(name.to_string()));
        }
        if let Some(unit) = node.unit() {
            push(Predicate::Unit, TripleObject::Text(unit.to_string()));
        }
        push(
            Predicate::CountMin,
            TripleObject::Integer(node.count().min()),
        );
        push(
            Predicate::CountMax,
            TripleObject::Integer(node.count().max()),
        );
        for tag in node.tags() {
            push(Predicate::Tag, TripleObject::Text(tag.clone()));
        }
    }
}
