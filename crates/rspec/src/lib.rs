pub mod cli;
pub mod commands;
pub mod globalsettings;
pub mod output;
pub mod setup;

pub const RSPEC_VERSION: &str = env!("CARGO_PKG_VERSION");
