use std::path::Path;

use anyhow::Context;
use field::JobSpecification;

use crate::cli::MaterializeOpts;
use crate::commands::{create_materializer, load_specs};
use crate::globalsettings::GlobalSettings;

pub fn command_materialize(gsettings: &GlobalSettings, opts: MaterializeOpts) -> anyhow::Result<()> {
    let mut specs = load_specs(gsettings, &opts.args.file)?;
    let mut materializer = create_materializer(&opts.args).with_anchor_root(opts.anchor_root);

    for (i, spec) in specs.iter_mut().enumerate() {
        let graph = materializer
            .materialize(spec)
            .with_context(|| format!("Cannot materialize document {i}"))?;
        gsettings.printer().print_graph(&graph);
    }

    if let Some(path) = &opts.write_back {
        write_back(path, &specs)?;
        log::info!("Materialized specification written into {}", path.display());
    }
    Ok(())
}

/// Stores specifications as a YAML stream, one document per specification.
fn write_back(path: &Path, specs: &[JobSpecification]) -> anyhow::Result<()> {
    let documents = specs
        .iter()
        .map(|spec| spec.to_yaml())
        .collect::<field::Result<Vec<_>>>()?;
    std::fs::write(path, documents.join("---\n"))
        .with_context(|| format!("Cannot write {}", path.display()))?;
    Ok(())
}
