pub mod cli;
pub mod json;
pub mod outputs;

pub use outputs::{Output, Outputs};
