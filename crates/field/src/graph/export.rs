use serde::Serialize;

use crate::graph::{Edge, GraphNode, Node, ResourceGraph};
use crate::{Identity, NodeId, ResourceCount};

/// Node-link view of a [`ResourceGraph`], the shape commonly consumed by graph tooling
/// (`{"directed": true, "nodes": [...], "links": [...]}`).
#[derive(Debug, Serialize)]
pub struct NodeLinkGraph<'a> {
    pub directed: bool,
    pub multigraph: bool,
    pub nodes: Vec<NodeLinkEntry<'a>>,
    pub links: &'a [Edge],
}

#[derive(Debug, Serialize)]
pub struct NodeLinkEntry<'a> {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub resource_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<Identity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<&'a ResourceCount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<&'a str>,
    pub exclusive: bool,
}

impl<'a> NodeLinkEntry<'a> {
    fn new(node: &GraphNode<'a>) -> Self {
        let resource = node.resource();
        Self {
            id: node.id(),
            resource_type: node.resource_type(),
            name: resource.and_then(|r| r.name()),
            identity: node.identity(),
            count: resource.map(|r| r.count()),
            unit: resource.and_then(|r| r.unit()),
            exclusive: resource.is_some_and(|r| r.exclusive()),
        }
    }
}

impl<'a> ResourceGraph<'a> {
    pub fn to_node_link(&self) -> NodeLinkGraph<'_> {
        NodeLinkGraph {
            directed: true,
            multigraph: false,
            nodes: self.nodes().iter().map(NodeLinkEntry::new).collect(),
            links: self.edges(),
        }
    }
}

#[cfg(test)]
mod test {
    use crate::{JobSpecification, Materializer, ResourceNode};

    #[test]
    fn test_node_link_export() {
        let mut spec = JobSpecification::new(vec![
            ResourceNode::new("node")
                .with_name("n1")
                .with_child(ResourceNode::new("core")),
        ]);
        let graph = Materializer::new()
            .with_anchor_root(true)
            .materialize(&mut spec)
            .unwrap();
        let value = serde_json::to_value(graph.to_node_link()).unwrap();

        assert_eq!(value["directed"], true);
        let nodes = value["nodes"].as_array().unwrap();
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0]["type"], "root");
        assert_eq!(nodes[0]["id"], 0);
        assert!(nodes[0].get("identity").is_none());
        assert_eq!(nodes[1]["type"], "core");
        assert_eq!(nodes[2]["name"], "n1");
        assert_eq!(nodes[2]["count"]["min"], 1);

        let links = value["links"].as_array().unwrap();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0]["source"], 2);
        assert_eq!(links[0]["target"], 1);
        assert_eq!(links[0]["label"], "with");
        assert_eq!(links[1]["source"], 0);
    }
}
