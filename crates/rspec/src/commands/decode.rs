use crate::cli::DecodeOpts;
use crate::commands::load_specs;
use crate::globalsettings::GlobalSettings;

pub fn command_decode(gsettings: &GlobalSettings, opts: DecodeOpts) -> anyhow::Result<()> {
    for spec in load_specs(gsettings, &opts.file)? {
        gsettings.printer().print_job_spec(&spec);
    }
    Ok(())
}
