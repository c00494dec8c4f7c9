// LogSieve - platform/mod.rs
//
// Platform abstraction layer: directories, config files, output files.
// Dependencies: standard library, directories, toml, core (LineSink only).
// Must NOT depend on: app, ui.

pub mod config;
pub mod fs;
