use field::{JobSpecification, ResourceGraph, Triple};

#[allow(clippy::upper_case_acronyms)]
#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum Outputs {
    CLI,
    JSON,
}

pub trait Output {
    fn print_job_spec(&self, spec: &JobSpecification);
    fn print_graph(&self, graph: &ResourceGraph);
    fn print_triples(&self, triples: &[Triple]);

    fn print_error(&self, error: anyhow::Error);
}
