//! Walks a format-neutral document tree and builds a [`JobSpecification`].
//!
//! Every failure carries the path of the offending field and aborts the whole
//! decode; a partially decoded specification is never returned.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::common::error::FieldError;
use crate::common::hostlist::expand_hostlist;
use crate::count::{decode_count, describe_value};
use crate::jobspec::{JobSpecification, Walltime};
use crate::resource::ResourceNode;
use crate::task::{Distribution, TaskSpec};
use crate::{Attributes, FieldPath, Identity, NodeId, SPEC_VERSION};

const JOB_FIELDS: &[&str] = &["version", "resources", "tasks", "walltime", "attrs"];
const RESOURCE_FIELDS: &[&str] = &[
    "type",
    "name",
    "count",
    "unit",
    "exclusive",
    "tags",
    "attributes",
    "with",
    "id",
    "identity",
    "uuid",
    "names",
    "ids",
];
/// Keys that describe a single node and so cannot be repeated over `names`/`ids` siblings.
const SINGLE_NODE_FIELDS: &[&str] = &["name", "id", "identity", "uuid"];
const TASK_FIELDS: &[&str] = &["command", "slot", "count", "distribution", "attrs"];

fn expect_object<'a>(value: &'a Value, path: &FieldPath) -> crate::Result<&'a Map<String, Value>> {
    value.as_object().ok_or_else(|| {
        FieldError::malformed_field(
            path,
            format!("expected a mapping, found {}", describe_value(value)),
        )
    })
}

fn check_fields(
    object: &Map<String, Value>,
    allowed: &[&str],
    path: &FieldPath,
) -> crate::Result<()> {
    if let Some(key) = object.keys().find(|k| !allowed.contains(&k.as_str())) {
        return Err(FieldError::malformed_field(
            &path.key(key),
            format!("unknown field `{key}`, expected one of {}", allowed.join(", ")),
        ));
    }
    Ok(())
}

/// Decodes an optional field; an absent key and an explicit null are treated the same.
fn decode_field<T: DeserializeOwned>(
    object: &Map<String, Value>,
    key: &str,
    path: &FieldPath,
) -> crate::Result<Option<T>> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => T::deserialize(value)
            .map(Some)
            .map_err(|e| FieldError::malformed_field(&path.key(key), e.to_string())),
    }
}

fn require_field<T: DeserializeOwned>(
    object: &Map<String, Value>,
    key: &str,
    path: &FieldPath,
) -> crate::Result<T> {
    decode_field(object, key, path)?
        .ok_or_else(|| FieldError::malformed_field(&path.key(key), "missing required field"))
}

/// A single object, a sequence of objects or null all normalize to a list.
fn decode_list<T>(
    value: Option<&Value>,
    path: &FieldPath,
    decode_item: impl Fn(&Value, &FieldPath) -> crate::Result<T>,
) -> crate::Result<Vec<T>> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(item @ Value::Object(_)) => Ok(vec![decode_item(item, path)?]),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(idx, item)| decode_item(item, &path.index(idx)))
            .collect(),
        Some(other) => Err(FieldError::malformed_field(
            path,
            format!(
                "expected a mapping or a sequence of mappings, found {}",
                describe_value(other)
            ),
        )),
    }
}

/// A key holding null counts as absent.
fn has_value(object: &Map<String, Value>, key: &str) -> bool {
    object.get(key).is_some_and(|value| !value.is_null())
}

fn decode_identity(object: &Map<String, Value>, path: &FieldPath) -> crate::Result<Option<Identity>> {
    let key = match (has_value(object, "identity"), has_value(object, "uuid")) {
        (true, true) => {
            return Err(FieldError::malformed_field(
                path,
                "`identity` and `uuid` cannot be combined",
            ));
        }
        (false, true) => "uuid",
        _ => "identity",
    };
    decode_field::<String>(object, key, path)?
        .map(|text| {
            Identity::from_str(&text).map_err(|e| {
                FieldError::malformed_field(&path.key(key), format!("invalid identity token: {e}"))
            })
        })
        .transpose()
}

/// Decodes one resource object and, recursively, everything listed under its `with` key.
///
/// An object carrying `names` or `ids` stands for several nodes and is rejected here;
/// use [`decode_resources`] for those.
pub fn decode_resource(value: &Value, path: &FieldPath) -> crate::Result<ResourceNode> {
    let mut nodes = decode_resources(value, path)?;
    match nodes.len() {
        1 => Ok(nodes.remove(0)),
        n => Err(FieldError::malformed_field(
            path,
            format!("expected a single resource, the object expands to {n}"),
        )),
    }
}

/// Decodes one resource object into its nodes. `names` and `ids` host lists expand into
/// one sibling per entry, each with a copy of the same subtree.
pub fn decode_resources(value: &Value, path: &FieldPath) -> crate::Result<Vec<ResourceNode>> {
    let object = expect_object(value, path)?;
    check_fields(object, RESOURCE_FIELDS, path)?;
    let node = decode_node(object, path)?;

    let names = decode_hostlist(object, "names", path)?;
    let ids = decode_hostlist(object, "ids", path)?;
    if names.is_none() && ids.is_none() {
        return Ok(vec![node]);
    }
    if has_value(object, "count") {
        return Err(FieldError::malformed_field(
            &path.key("count"),
            "`ids` and `names` must not be specified with `count`",
        ));
    }
    if let Some(key) = SINGLE_NODE_FIELDS.iter().find(|k| has_value(object, k)) {
        return Err(FieldError::malformed_field(
            &path.key(key),
            format!("`{key}` cannot be combined with `ids` or `names`"),
        ));
    }

    let nodes: Vec<ResourceNode> = match (names, ids) {
        (Some(_), Some(_)) => {
            return Err(FieldError::malformed_field(
                &path.key("ids"),
                "`ids` and `names` cannot be combined",
            ));
        }
        (Some(names), None) => names
            .into_iter()
            .map(|name| node.clone().with_name(name))
            .collect(),
        (None, Some(ids)) => ids
            .into_iter()
            .map(|id| match id.parse::<u64>() {
                Ok(id) if id > 0 => Ok(node.clone().with_id(NodeId::new(id))),
                _ => Err(FieldError::malformed_field(
                    &path.key("ids"),
                    format!("`{id}` is not a valid node id"),
                )),
            })
            .collect::<crate::Result<Vec<_>>>()?,
        (None, None) => vec![node],
    };
    log::trace!(
        "Expanded `{}` at `{path}` into {} node(s)",
        nodes.first().map(|n| n.resource_type()).unwrap_or_default(),
        nodes.len()
    );
    Ok(nodes)
}

/// A host list is given as a string; a bare integer is taken as a one-entry list.
fn decode_hostlist(
    object: &Map<String, Value>,
    key: &str,
    path: &FieldPath,
) -> crate::Result<Option<Vec<String>>> {
    let text = match object.get(key) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        Some(other) => {
            return Err(FieldError::malformed_field(
                &path.key(key),
                format!("expected a host list string, found {}", describe_value(other)),
            ));
        }
    };
    expand_hostlist(&text)
        .map(Some)
        .map_err(|e| FieldError::malformed_field(&path.key(key), e.to_string()))
}

fn decode_node(object: &Map<String, Value>, path: &FieldPath) -> crate::Result<ResourceNode> {
    let resource_type: String = require_field(object, "type", path)?;
    if resource_type.is_empty() {
        return Err(FieldError::malformed_field(
            &path.key("type"),
            "resource type must not be empty",
        ));
    }

    let mut node = ResourceNode::new(resource_type)
        .with_exclusive(decode_field(object, "exclusive", path)?.unwrap_or(false))
        .with_tags(decode_field::<Vec<String>>(object, "tags", path)?.unwrap_or_default())
        .with_attributes(decode_field::<Attributes>(object, "attributes", path)?.unwrap_or_default());

    if let Some(count) = object.get("count").filter(|v| !v.is_null()) {
        node = node.with_count(decode_count(count, &path.key("count"))?);
    }
    if let Some(name) = decode_field::<String>(object, "name", path)? {
        node = node.with_name(name);
    }
    if let Some(unit) = decode_field::<String>(object, "unit", path)? {
        node = node.with_unit(unit);
    }
    if let Some(id) = decode_field::<u64>(object, "id", path)? {
        node = node.with_id(NodeId::new(id));
    }
    if let Some(identity) = decode_identity(object, path)? {
        node = node.with_identity(identity);
    }

    let children = decode_resource_list(object.get("with"), &path.key("with"))?;
    Ok(node.with_children(children))
}

fn decode_resource_list(value: Option<&Value>, path: &FieldPath) -> crate::Result<Vec<ResourceNode>> {
    Ok(decode_list(value, path, decode_resources)?
        .into_iter()
        .flatten()
        .collect())
}

pub fn decode_task(value: &Value, path: &FieldPath) -> crate::Result<TaskSpec> {
    let object = expect_object(value, path)?;
    check_fields(object, TASK_FIELDS, path)?;

    let command: Vec<String> = require_field(object, "command", path)?;
    if command.first().is_none_or(|c| c.is_empty()) {
        return Err(FieldError::malformed_field(
            &path.key("command"),
            "an empty command is not allowed",
        ));
    }

    let mut task = TaskSpec::new(command);
    task.slot = decode_field::<BTreeMap<String, String>>(object, "slot", path)?.unwrap_or_default();
    task.count = decode_field::<BTreeMap<String, u64>>(object, "count", path)?.unwrap_or_default();
    task.distribution = decode_field::<String>(object, "distribution", path)?
        .map(|d| Distribution::from_name(&d))
        .unwrap_or_default();
    task.attrs = decode_field(object, "attrs", path)?.unwrap_or_default();
    Ok(task)
}

/// Decodes a complete job specification document.
pub fn decode_job_spec(document: &Value) -> crate::Result<JobSpecification> {
    let path = FieldPath::root();
    let object = expect_object(document, &path)?;
    check_fields(object, JOB_FIELDS, &path)?;

    let version = decode_field::<u32>(object, "version", &path)?.unwrap_or(SPEC_VERSION);
    if version != SPEC_VERSION {
        return Err(FieldError::malformed_field(
            &path.key("version"),
            format!("unsupported version {version}, only version {SPEC_VERSION} is supported"),
        ));
    }

    let resources = match object.get("resources") {
        None | Some(Value::Null) => {
            return Err(FieldError::malformed_field(
                &path.key("resources"),
                "missing required field",
            ));
        }
        value => decode_resource_list(value, &path.key("resources"))?,
    };
    let tasks = decode_list(object.get("tasks"), &path.key("tasks"), decode_task)?;

    let walltime = decode_field::<String>(object, "walltime", &path)?
        .map(|text| {
            Walltime::parse(&text)
                .map_err(|e| FieldError::malformed_field(&path.key("walltime"), e.to_string()))
        })
        .transpose()?;

    let spec = JobSpecification {
        version,
        resources,
        tasks,
        walltime,
        attrs: decode_field(object, "attrs", &path)?.unwrap_or_default(),
    };
    log::debug!(
        "Decoded job specification: {} resource node(s), {} task(s)",
        spec.resource_count(),
        spec.tasks.len()
    );
    Ok(spec)
}
