//! Configuration management for the bookfinder service.
//!
//! Settings come from an optional TOML file and are overlaid by environment
//! variables. The signing secret has no default: a configuration without
//! one fails to load.

pub mod bf_config;
pub mod error;
pub mod prelude;
