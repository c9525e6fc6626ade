pub mod decode;
pub mod materialize;
pub mod triples;

use std::path::Path;

use anyhow::Context;
use field::{JobSpecification, Materializer};

use crate::cli::MaterializeArgs;
use crate::globalsettings::GlobalSettings;

/// Loads every specification document stored in `path`.
pub fn load_specs(gsettings: &GlobalSettings, path: &Path) -> anyhow::Result<Vec<JobSpecification>> {
    let specs = field::document::load_file(path, gsettings.input_format())
        .with_context(|| format!("Cannot load specification from {}", path.display()))?;
    log::debug!("Loaded {} document(s) from {}", specs.len(), path.display());
    Ok(specs)
}

pub(crate) fn create_materializer(args: &MaterializeArgs) -> Materializer {
    match args.start_id {
        Some(start) => Materializer::starting_at(start),
        None => Materializer::new(),
    }
}
