use anyhow::Context;
use field::PredicateSet;

use crate::cli::TriplesOpts;
use crate::commands::{create_materializer, load_specs};
use crate::globalsettings::GlobalSettings;

pub fn command_triples(gsettings: &GlobalSettings, opts: TriplesOpts) -> anyhow::Result<()> {
    let mut specs = load_specs(gsettings, &opts.args.file)?;
    let mut materializer = create_materializer(&opts.args);
    let set = if opts.extended {
        PredicateSet::Extended
    } else {
        PredicateSet::Core
    };

    let mut triples = Vec::new();
    for (i, spec) in specs.iter_mut().enumerate() {
        let graph = materializer
            .materialize(spec)
            .with_context(|| format!("Cannot materialize document {i}"))?;
        triples.extend(graph.triples_with(set));
    }
    gsettings.printer().print_triples(&triples);
    Ok(())
}
