//! Glue between the command line and the library crates.

pub(crate) mod progress;
pub(crate) mod settings;
