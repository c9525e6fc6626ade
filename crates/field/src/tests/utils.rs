use crate::graph::Node;
use crate::{DocumentFormat, JobSpecification, NodeId, ResourceGraph};

pub fn sorted_vec<T: Ord>(mut vec: Vec<T>) -> Vec<T> {
    vec.sort();
    vec
}

pub fn enable_test_logging() {
    env_logger::builder().is_test(true).try_init().ok();
}

pub fn yaml_spec(text: &str) -> JobSpecification {
    crate::document::load_document(text, DocumentFormat::Yaml).unwrap()
}

pub fn node_ids(graph: &ResourceGraph) -> Vec<NodeId> {
    graph.nodes().iter().map(|n| n.id()).collect()
}

pub fn edge_pairs(graph: &ResourceGraph) -> Vec<(u64, u64)> {
    graph
        .edges()
        .iter()
        .map(|e| (e.source.as_num(), e.target.as_num()))
        .collect()
}

pub fn expect_error_message<T>(result: crate::Result<T>, msg: &str) {
    match result {
        Ok(_) => panic!("Expected error, got Ok"),
        Err(error) => {
            let formatted = error.to_string();
            if !formatted.contains(msg) {
                panic!("Did not find `{msg}` in `{formatted}`");
            }
        }
    }
}
