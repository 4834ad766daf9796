//! Simulation run configuration

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{SimError, SimResult};

/// Configuration for a batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Number of spins to play
    pub spins: u64,

    /// Spins between progress points
    pub log_interval: u64,

    /// Master seed (None = random, reported back in the run)
    pub seed: Option<u64>,

    /// Independent random streams the run is split into
    pub shards: usize,

    /// Directory for report and progress files
    pub output_dir: Option<PathBuf>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            spins: 10_000_000,
            log_interval: 100_000,
            seed: None,
            shards: num_cpus::get().max(1),
            output_dir: None,
        }
    }
}

impl SimConfig {
    /// Short run for tests and CI
    pub fn quick() -> Self {
        Self {
            spins: 10_000,
            log_interval: 1_000,
            shards: 4,
            ..Default::default()
        }
    }

    pub fn with_spins(mut self, spins: u64) -> Self {
        self.spins = spins;
        self
    }

    pub fn with_log_interval(mut self, interval: u64) -> Self {
        self.log_interval = interval;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_shards(mut self, shards: usize) -> Self {
        self.shards = shards;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.spins == 0 {
            return Err(SimError::InvalidConfig("spin count must be positive".into()));
        }
        if self.log_interval == 0 {
            return Err(SimError::InvalidConfig("log interval must be positive".into()));
        }
        if self.shards == 0 {
            return Err(SimError::InvalidConfig("shard count must be positive".into()));
        }
        Ok(())
    }
}
