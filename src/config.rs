use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use clap::{Args, ValueEnum};
use crate::error::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub reconvergence: ReconvergenceMode,
    pub max_rounds: Option<u64>,
    pub verify: bool,
    pub format: OutputFormat,
}

/// How routers recover after the topology-update batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ReconvergenceMode {
    /// Pre-relax from the neighbors' converged routing tables, then run rounds.
    #[default]
    Seeded,
    /// Only resynchronize direct links, then run rounds.
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            reconvergence: ReconvergenceMode::Seeded,
            max_rounds: None, // run until a fixed point
            verify: false,
            format: OutputFormat::Text,
        }
    }
}

/// Command-line settings layered over the configuration file.
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigOverrides {
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    #[arg(long, value_enum)]
    pub reconvergence: Option<ReconvergenceMode>,

    /// Give up when a phase needs more rounds than this
    #[arg(long)]
    pub max_rounds: Option<u64>,

    /// Cross-check converged routes against Dijkstra
    #[arg(long)]
    pub verify: bool,
}

impl SimulationConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Options given on the command line win; `verify` can only be switched on.
    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Self {
        if let Some(format) = overrides.format {
            self.format = format;
        }
        if let Some(mode) = overrides.reconvergence {
            self.reconvergence = mode;
        }
        if overrides.max_rounds.is_some() {
            self.max_rounds = overrides.max_rounds;
        }
        self.verify |= overrides.verify;
        self
    }
}
