use cli_table::format::{Justify, Separator};
use cli_table::{Cell, CellStruct, ColorChoice, Style, Table, TableStruct, print_stdout};

use field::{JobSpecification, Node, NodeId, ResourceGraph, ResourceNode, Triple};

use crate::output::Output;

pub struct CliOutput {
    color_policy: ColorChoice,
}

impl CliOutput {
    pub fn new(color_policy: ColorChoice) -> CliOutput {
        CliOutput { color_policy }
    }

    fn print_vertical_table(&self, rows: Vec<Vec<CellStruct>>) {
        let table = rows.table().separator(
            Separator::builder()
                .column(Some(Default::default()))
                .build(),
        );
        self.print_table(table);
    }

    fn print_horizontal_table(&self, rows: Vec<Vec<CellStruct>>, header: Vec<CellStruct>) {
        let table = rows
            .table()
            .separator(
                Separator::builder()
                    .title(Some(Default::default()))
                    .column(Some(Default::default()))
                    .build(),
            )
            .title(header);
        self.print_table(table);
    }

    fn print_table(&self, table: TableStruct) {
        let table = table.color_choice(self.color_policy);
        if let Err(e) = print_stdout(table) {
            log::error!("Cannot print table to stdout: {e:?}");
        }
    }
}

fn resource_rows(node: &ResourceNode, depth: usize, rows: &mut Vec<Vec<CellStruct>>) {
    rows.push(vec![
        format!("{}{}", "  ".repeat(depth), node.resource_type()).cell(),
        node.name().unwrap_or("").cell(),
        node.count().cell().justify(Justify::Right),
        node.unit().unwrap_or("").cell(),
        if node.exclusive() { "yes" } else { "" }.cell(),
        format_id(node.id()).cell(),
    ]);
    for child in node.children() {
        resource_rows(child, depth + 1, rows);
    }
}

fn format_id(id: NodeId) -> String {
    if id.is_assigned() {
        id.to_string()
    } else {
        String::new()
    }
}

impl Output for CliOutput {
    fn print_job_spec(&self, spec: &JobSpecification) {
        let mut rows = vec![vec!["Version".cell().bold(true), spec.version.cell()]];
        if let Some(walltime) = &spec.walltime {
            rows.push(vec![
                "Walltime".cell().bold(true),
                format!(
                    "{} ({})",
                    walltime.as_str(),
                    humantime::format_duration(walltime.duration())
                )
                .cell(),
            ]);
        }
        rows.push(vec![
            "Resources".cell().bold(true),
            spec.resource_count().cell(),
        ]);
        for (i, task) in spec.tasks.iter().enumerate() {
            rows.push(vec![
                format!("Task {i}").cell().bold(true),
                task.command.join(" ").cell(),
            ]);
        }
        self.print_vertical_table(rows);

        let mut rows = Vec::new();
        for resource in &spec.resources {
            resource_rows(resource, 0, &mut rows);
        }
        let header = vec![
            "Type".cell().bold(true),
            "Name".cell().bold(true),
            "Count".cell().bold(true),
            "Unit".cell().bold(true),
            "Exclusive".cell().bold(true),
            "Id".cell().bold(true),
        ];
        self.print_horizontal_table(rows, header);
    }

    fn print_graph(&self, graph: &ResourceGraph) {
        let rows = graph
            .nodes()
            .iter()
            .map(|node| {
                let children = graph
                    .children_of(node.id())
                    .map(|child| child.id().to_string())
                    .collect::<Vec<_>>()
                    .join(",");
                vec![
                    node.id().cell().justify(Justify::Right),
                    node.resource_type().cell(),
                    node.resource()
                        .map(|r| r.count().to_string())
                        .unwrap_or_default()
                        .cell(),
                    node.identity()
                        .map(|identity| identity.to_string())
                        .unwrap_or_default()
                        .cell(),
                    children.cell(),
                ]
            })
            .collect();
        let header = vec![
            "Id".cell().bold(true),
            "Type".cell().bold(true),
            "Count".cell().bold(true),
            "Identity".cell().bold(true),
            "With".cell().bold(true),
        ];
        self.print_horizontal_table(rows, header);
        log::info!(
            "{} node(s), {} edge(s)",
            graph.node_count(),
            graph.edge_count()
        );
    }

    fn print_triples(&self, triples: &[Triple]) {
        let rows = triples
            .iter()
            .map(|triple| {
                vec![
                    triple.subject.cell(),
                    triple.predicate.cell(),
                    (&triple.object).cell(),
                ]
            })
            .collect();
        let header = vec![
            "Subject".cell().bold(true),
            "Predicate".cell().bold(true),
            "Object".cell().bold(true),
        ];
        self.print_horizontal_table(rows, header);
    }

    fn print_error(&self, error: anyhow::Error) {
        eprintln!("{error:?}");
    }
}

#[cfg(test)]
mod tests {
    use cli_table::ColorChoice;
    use field::document::load_document;
    use field::{DocumentFormat, Materializer, NodeId, PredicateSet};

    use super::{CliOutput, format_id, resource_rows};
    use crate::output::Output;

    const DOCUMENT: &str = r#"
walltime: "01:30:00"
resources:
  type: node
  names: n[1-2]
  with:
    - type: socket
      count: {min: 1, max: 2}
      with: {type: core, count: 8}
    - type: memory
      count: 64
      unit: GB
      exclusive: true
tasks:
  command: [app]
"#;

    #[test]
    fn test_print_materialized_document() {
        let output = CliOutput::new(ColorChoice::Never);
        let mut spec = load_document(DOCUMENT, DocumentFormat::Yaml).unwrap();
        output.print_job_spec(&spec);

        let triples = {
            let graph = Materializer::new()
                .with_anchor_root(true)
                .materialize(&mut spec)
                .unwrap();
            output.print_graph(&graph);
            graph.triples_with(PredicateSet::Extended)
        };
        assert!(!triples.is_empty());
        output.print_triples(&triples);
        output.print_job_spec(&spec);

        let mut rows = Vec::new();
        for resource in &spec.resources {
            resource_rows(resource, 0, &mut rows);
        }
        assert_eq!(rows.len(), 8);
    }

    #[test]
    fn test_format_id() {
        assert_eq!(format_id(NodeId::UNASSIGNED), "");
        assert_eq!(format_id(NodeId::new(7)), "7");
    }
}
