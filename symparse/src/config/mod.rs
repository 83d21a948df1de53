//! Configuration module for symparse
//!
//! Compile-time limits live in [`constants`]; user preferences that may come
//! from the environment or a TOML file live in [`runtime`].

pub mod constants;
pub mod runtime;

pub use constants::compile_time;
pub use runtime::{ConfigError, RuntimeConfig};
