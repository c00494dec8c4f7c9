// LogSieve - app/mod.rs
//
// Application layer: orchestration, state management, filter loading.
// Dependencies: core layer, platform layer.
// Must NOT depend on: ui.

pub mod display;
pub mod filter_mgr;
pub mod split;
pub mod state;
