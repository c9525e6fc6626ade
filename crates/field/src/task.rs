use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::Attributes;

/// How the tasks of a job are spread over the selected slots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Distribution {
    #[default]
    Unspecified,
    Random,
    Named(String),
}

impl Distribution {
    pub fn from_name(name: &str) -> Self {
        match name {
            "random" => Distribution::Random,
            other => Distribution::Named(other.to_string()),
        }
    }

    pub fn is_unspecified(&self) -> bool {
        matches!(self, Distribution::Unspecified)
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distribution::Unspecified => Ok(()),
            Distribution::Random => f.write_str("random"),
            Distribution::Named(name) => f.write_str(name),
        }
    }
}

impl Serialize for Distribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Resource level (or label) a task binds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotBinding<'a> {
    Level(&'a str),
    Label(&'a str),
}

/// Number of task instances, either per bound slot or for the whole job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskCount {
    PerSlot(u64),
    Total(u64),
}

/// Task descriptor living next to the resource tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskSpec {
    pub command: Vec<String>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub slot: BTreeMap<String, String>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub count: BTreeMap<String, u64>,

    #[serde(skip_serializing_if = "Distribution::is_unspecified")]
    pub distribution: Distribution,

    #[serde(skip_serializing_if = "serde_json::Map::is_empty")]
    pub attrs: Attributes,
}

impl TaskSpec {
    pub fn new(command: Vec<String>) -> Self {
        Self {
            command,
            slot: Default::default(),
            count: Default::default(),
            distribution: Distribution::Unspecified,
            attrs: Default::default(),
        }
    }

    /// `level` takes precedence over `label` when both are present.
    pub fn slot_binding(&self) -> Option<SlotBinding<'_>> {
        if let Some(level) = self.slot.get("level") {
            Some(SlotBinding::Level(level))
        } else {
            self.slot.get("label").map(|l| SlotBinding::Label(l))
        }
    }

    /// `total` takes precedence over `per_slot` when both are present.
    pub fn task_count(&self) -> Option<TaskCount> {
        if let Some(total) = self.count.get("total") {
            Some(TaskCount::Total(*total))
        } else {
            self.count.get("per_slot").map(|c| TaskCount::PerSlot(*c))
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Distribution, SlotBinding, TaskCount, TaskSpec};

    fn task() -> TaskSpec {
        TaskSpec::new(vec!["flux".to_string(), "start".to_string()])
    }

    #[test]
    fn test_slot_binding() {
        let mut t = task();
        assert_eq!(t.slot_binding(), None);
        t.slot.insert("label".into(), "big".into());
        assert_eq!(t.slot_binding(), Some(SlotBinding::Label("big")));
        t.slot.insert("level".into(), "core".into());
        assert_eq!(t.slot_binding(), Some(SlotBinding::Level("core")));
    }

    #[test]
    fn test_task_count() {
        let mut t = task();
        assert_eq!(t.task_count(), None);
        t.count.insert("per_slot".into(), 2);
        assert_eq!(t.task_count(), Some(TaskCount::PerSlot(2)));
        t.count.insert("total".into(), 15);
        assert_eq!(t.task_count(), Some(TaskCount::Total(15)));
    }

    #[test]
    fn test_distribution_names() {
        assert_eq!(Distribution::from_name("random"), Distribution::Random);
        assert_eq!(
            Distribution::from_name("block"),
            Distribution::Named("block".to_string())
        );
        assert_eq!(Distribution::Random.to_string(), "random");
    }
}
