use serde::Serialize;
use serde_json::json;

use field::{JobSpecification, ResourceGraph, Triple};

use crate::output::Output;

/// Prints one JSON value per line.
#[derive(Default)]
pub struct JsonOutput;

impl JsonOutput {
    fn print<T: Serialize>(&self, data: &T) {
        match serde_json::to_string(data) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("Cannot serialize output: {e:?}"),
        }
    }
}

impl Output for JsonOutput {
    fn print_job_spec(&self, spec: &JobSpecification) {
        self.print(spec);
    }

    fn print_graph(&self, graph: &ResourceGraph) {
        self.print(&graph.to_node_link());
    }

    fn print_triples(&self, triples: &[Triple]) {
        self.print(&triples);
    }

    fn print_error(&self, error: anyhow::Error) {
        self.print(&json!({
            "error": format!("{error:?}"),
        }));
    }
}
