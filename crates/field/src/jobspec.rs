use std::time::Duration;

use serde::{Serialize, Serializer};

use crate::common::timeutils::parse_walltime;
use crate::resource::ResourceNode;
use crate::task::TaskSpec;
use crate::{Attributes, NodeId, SPEC_VERSION};

/// Walltime as written in the document together with its parsed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Walltime {
    text: String,
    duration: Duration,
}

impl Walltime {
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(Self {
            text: text.to_string(),
            duration: parse_walltime(text)?,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl Serialize for Walltime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

/// A decoded job: root resources, tasks and job-wide metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobSpecification {
    pub version: u32,

    pub resources: Vec<ResourceNode>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<TaskSpec>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub walltime: Option<Walltime>,

    #[serde(skip_serializing_if = "serde_json::Map::is_empty")]
    pub attrs: Attributes,
}

impl Default for JobSpecification {
    fn default() -> Self {
        Self {
            version: SPEC_VERSION,
            resources: Vec::new(),
            tasks: Vec::new(),
            walltime: None,
            attrs: Default::default(),
        }
    }
}

impl JobSpecification {
    pub fn new(resources: Vec<ResourceNode>) -> Self {
        Self {
            resources,
            ..Default::default()
        }
    }

    /// All resource nodes of all root trees in pre-order.
    pub fn iter_resources(&self) -> impl Iterator<Item = &ResourceNode> {
        self.resources.iter().flat_map(|r| r.iter())
    }

    pub fn resource_count(&self) -> usize {
        self.resources.iter().map(|r| r.node_count()).sum()
    }

    /// Largest id already present in the document (unassigned when none is).
    pub fn max_assigned_id(&self) -> NodeId {
        self.iter_resources()
            .map(|r| r.id())
            .max()
            .unwrap_or(NodeId::UNASSIGNED)
    }

    /// True when every resource node carries both an id and an identity.
    pub fn is_materialized(&self) -> bool {
        self.iter_resources()
            .all(|r| r.id().is_assigned() && r.identity().is_some())
    }

    /// Serializes the specification back into its document shape.
    pub fn to_yaml(&self) -> crate::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
