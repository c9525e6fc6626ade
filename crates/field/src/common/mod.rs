#[macro_use]
pub mod macros;

pub mod error;
pub mod hostlist;
pub mod idcounter;
pub mod ids;
pub mod path;
pub mod timeutils;
