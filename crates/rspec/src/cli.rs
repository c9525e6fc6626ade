use std::path::PathBuf;

use clap::Parser;
use field::DocumentFormat;

use crate::output::Outputs;

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputFormat {
    /// Detect the format from the file extension (YAML when unknown).
    Auto,
    Yaml,
    Toml,
    Json,
}

impl InputFormat {
    pub fn document_format(self) -> Option<DocumentFormat> {
        match self {
            InputFormat::Auto => None,
            InputFormat::Yaml => Some(DocumentFormat::Yaml),
            InputFormat::Toml => Some(DocumentFormat::Toml),
            InputFormat::Json => Some(DocumentFormat::Json),
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorPolicy {
    /// Use colors if the stdout is detected to be a terminal.
    Auto,
    /// Always use colors.
    Always,
    /// Never use colors.
    Never,
}

// Common CLI options
#[derive(Parser)]
pub struct CommonOpts {
    /// Format of the input document
    #[arg(
        long,
        env = "RSPEC_INPUT_FORMAT",
        default_value_t = InputFormat::Auto,
        value_enum,
        global = true,
        help_heading("GLOBAL OPTIONS")
    )]
    pub format: InputFormat,

    /// Sets output formatting
    #[arg(
        long,
        env = "RSPEC_OUTPUT_MODE",
        default_value_t = Outputs::CLI,
        value_enum,
        global = true,
        help_heading("GLOBAL OPTIONS")
    )]
    pub output_mode: Outputs,

    /// Sets console color policy
    #[arg(
        long,
        default_value_t = ColorPolicy::Auto,
        value_enum,
        global = true,
        help_heading("GLOBAL OPTIONS"),
        hide_short_help(true)
    )]
    pub colors: ColorPolicy,

    /// Enables more detailed log output
    #[arg(long, env = "RSPEC_DEBUG", global = true, help_heading("GLOBAL OPTIONS"))]
    pub debug: bool,
}

// Root CLI options
#[derive(Parser)]
#[command(
    author,
    about,
    version(crate::RSPEC_VERSION),
    disable_help_subcommand(true),
    help_expected(true)
)]
pub struct RootOptions {
    #[clap(flatten)]
    pub common: CommonOpts,

    #[clap(subcommand)]
    pub subcmd: SubCommand,
}

#[derive(Parser)]
pub enum SubCommand {
    /// Decode a specification and print it in canonical form
    Decode(DecodeOpts),
    /// Assign node ids and identities and print the resulting graph
    Materialize(MaterializeOpts),
    /// Materialize a specification and print its triples
    Triples(TriplesOpts),
}

#[derive(Parser)]
pub struct DecodeOpts {
    /// Path to the specification document
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub file: PathBuf,
}

#[derive(Parser)]
pub struct MaterializeArgs {
    /// Path to the specification document
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub file: PathBuf,

    /// First id handed out to nodes without one
    #[arg(long)]
    pub start_id: Option<u64>,
}

#[derive(Parser)]
pub struct MaterializeOpts {
    #[clap(flatten)]
    pub args: MaterializeArgs,

    /// Anchor all root resources under a synthetic root node with id 0
    #[arg(long)]
    pub anchor_root: bool,

    /// Write the materialized document (with ids and identities) as YAML into this file
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub write_back: Option<PathBuf>,
}

#[derive(Parser)]
pub struct TriplesOpts {
    #[clap(flatten)]
    pub args: MaterializeArgs,

    /// Also emit name, unit, count and tag triples
    #[arg(long)]
    pub extended: bool,
}
