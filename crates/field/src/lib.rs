#[macro_use]
pub mod common;

pub mod count;
pub mod decode;
pub mod document;
pub mod graph;
pub mod jobspec;
pub mod resource;
pub mod task;

#[cfg(test)]
pub(crate) mod tests;

pub use crate::common::idcounter::IdCounter;
pub use crate::common::ids::{Identity, NodeId};
pub use crate::common::path::FieldPath;

pub use crate::count::{CountOperator, ResourceCount};
pub use crate::document::{DocumentFormat, load_documents};
pub use crate::graph::materialize::Materializer;
pub use crate::graph::triples::{Predicate, PredicateSet, Triple, TripleObject};
pub use crate::graph::{Edge, EdgeLabel, GraphNode, Node, ResourceGraph};
pub use crate::jobspec::{JobSpecification, Walltime};
pub use crate::resource::ResourceNode;
pub use crate::task::{Distribution, SlotBinding, TaskCount, TaskSpec};

pub type Error = common::error::FieldError;
pub type Result<T> = std::result::Result<T, Error>;

/// Free-form string-keyed values (`attrs`, `attributes`) taken from the document as-is.
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// The only document schema version understood by the decoder.
pub const SPEC_VERSION: u32 = 1;
