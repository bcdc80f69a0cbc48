//! Command-line front end (enabled with the `cli` feature).

pub mod commands;
pub mod params;
