//! Strongly-typed representation of `strobe.toml`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// The full run configuration. Every field is optional; the CLI supplies
/// defaults and flag overrides on top.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Project identity and circuit selection.
    #[serde(default)]
    pub project: ProjectSection,
    /// Simulation parameters and output sinks.
    #[serde(default)]
    pub sim: SimSection,
}

/// The `[project]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectSection {
    /// Human-readable project name.
    pub name: Option<String>,
    /// The circuit to bind for the run.
    pub circuit: Option<String>,
}

/// The `[sim]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimSection {
    /// Global ticks per circuit evaluation.
    pub divisor: Option<u64>,
    /// Seed for the fill generator.
    pub seed: Option<u64>,
    /// Primary waveform trace path.
    pub trace: Option<PathBuf>,
    /// Optional transcript echo path.
    pub tee: Option<PathBuf>,
}

impl RunConfig {
    /// Validates cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sim.divisor == Some(0) {
            return Err(ConfigError::ValidationError(
                "divisor must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
