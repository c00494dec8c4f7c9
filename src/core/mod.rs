// LogSieve - core/mod.rs
//
// Core business logic layer: predicates, retention buffers, the streaming
// demultiplexer and filter-name sanitizing.
// Dependencies: standard library, regex, serde.
// Must NOT depend on: ui, platform, app, or touch the filesystem directly.

pub mod demux;
pub mod filter_set;
pub mod predicate;
pub mod retention;
pub mod sanitize;
