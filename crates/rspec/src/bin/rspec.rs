use std::io::IsTerminal;

use clap::Parser;
use cli_table::ColorChoice;

use rspec::cli::{ColorPolicy, CommonOpts, RootOptions, SubCommand};
use rspec::commands::decode::command_decode;
use rspec::commands::materialize::command_materialize;
use rspec::commands::triples::command_triples;
use rspec::globalsettings::GlobalSettings;
use rspec::output::cli::CliOutput;
use rspec::output::json::JsonOutput;
use rspec::output::{Output, Outputs};
use rspec::setup::setup_logging;

fn make_global_settings(opts: &CommonOpts) -> GlobalSettings {
    let color_policy = match opts.colors {
        ColorPolicy::Always => ColorChoice::AlwaysAnsi,
        ColorPolicy::Auto => {
            if std::io::stdout().is_terminal() {
                ColorChoice::Auto
            } else {
                ColorChoice::Never
            }
        }
        ColorPolicy::Never => ColorChoice::Never,
    };

    // Create Printer
    let printer: Box<dyn Output> = match opts.output_mode {
        Outputs::CLI => Box::new(CliOutput::new(color_policy)),
        Outputs::JSON => Box::<JsonOutput>::default(),
    };

    GlobalSettings::new(opts.format.document_format(), printer)
}

fn main() -> anyhow::Result<()> {
    let top_opts = RootOptions::parse();

    setup_logging(top_opts.common.debug);

    let gsettings = make_global_settings(&top_opts.common);

    let result = match top_opts.subcmd {
        SubCommand::Decode(opts) => command_decode(&gsettings, opts),
        SubCommand::Materialize(opts) => command_materialize(&gsettings, opts),
        SubCommand::Triples(opts) => command_triples(&gsettings, opts),
    };
    if let Err(e) = result {
        gsettings.printer().print_error(e);
        std::process::exit(1);
    }

    Ok(())
}
