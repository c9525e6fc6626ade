use thiserror::Error;

use crate::common::path::FieldPath;
use crate::{Identity, NodeId};

#[derive(Debug, Error)]
pub enum FieldError {
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error("Deserialization error: {0}")]
    DeserializationError(String),
    #[error("Malformed count at `{path}`: {reason}")]
    MalformedCount { path: FieldPath, reason: String },
    #[error("Malformed field `{path}`: {reason}")]
    MalformedField { path: FieldPath, reason: String },
    #[error("Cyclic structure: node {id} at `{path}` is its own ancestor")]
    CyclicStructure { id: NodeId, path: FieldPath },
    #[error("Node id {0} is used by more than one node")]
    DuplicateIdentifier(NodeId),
    #[error("Identity {0} is used by more than one node")]
    DuplicateIdentity(Identity),
    #[error("Edge {parent} -> {child} is defined more than once")]
    DuplicateEdge { parent: NodeId, child: NodeId },
    #[error("No node ids are left above {0}")]
    IdsExhausted(NodeId),
}

impl FieldError {
    pub(crate) fn malformed_field(path: &FieldPath, reason: impl Into<String>) -> Self {
        Self::MalformedField {
            path: path.clone(),
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed_count(path: &FieldPath, reason: impl Into<String>) -> Self {
        Self::MalformedCount {
            path: path.clone(),
            reason: reason.into(),
        }
    }

    /// Path of the offending field for decode errors.
    pub fn path(&self) -> Option<&FieldPath> {
        match self {
            Self::MalformedCount { path, .. }
            | Self::MalformedField { path, .. }
            | Self::CyclicStructure { path, .. } => Some(path),
            _ => None,
        }
    }
}

impl From<serde_json::error::Error> for FieldError {
    fn from(e: serde_json::error::Error) -> Self {
        Self::DeserializationError(e.to_string())
    }
}

impl From<serde_yaml::Error> for FieldError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::DeserializationError(e.to_string())
    }
}

impl From<toml::de::Error> for FieldError {
    fn from(error: toml::de::Error) -> Self {
        Self::DeserializationError(error.to_string())
    }
}
