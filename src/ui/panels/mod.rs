// LogSieve - ui/panels/mod.rs

pub mod about;
pub mod regions;
pub mod warnings;
