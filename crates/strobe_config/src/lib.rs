//! Parsing and validation of `strobe.toml` run-configuration files.
//!
//! A configuration names the circuit to bind, the clock divisor and fill
//! seed, and the trace/tee output paths. Command-line flags override any
//! value loaded from the file.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str};
pub use types::{ProjectSection, RunConfig, SimSection};
