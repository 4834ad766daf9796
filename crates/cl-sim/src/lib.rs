//! # cl-sim — Chain Lightning batch simulator
//!
//! Plays millions of spins against a [`cl_engine::SpinEngine`] and reports
//! RTP, hit rate, wild-mode frequency and volatility. [`SeedBalancer`]
//! builds seed lists whose replayed wins average out to a target RTP.
//!
//! ## Architecture
//!
//! ```text
//! SimConfig ──> Simulator ──┬── shard 0 (ChaCha8 stream 0) ──┐
//!                           ├── shard 1 (ChaCha8 stream 1) ──┼──> SimStats ──> SimReport
//!                           └── shard N ...                ──┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cl_engine::ParameterSet;
//! use cl_sim::{SimConfig, SimReport, Simulator};
//!
//! let params = ParameterSet::standard();
//! let sim = Simulator::new(params.clone())?;
//! let run = sim.run(&SimConfig::default().with_spins(1_000_000).with_seed(7))?;
//! println!("{}", SimReport::new(&params, &run).to_text());
//! ```

pub mod config;
pub mod report;
pub mod seeds;
pub mod simulator;
pub mod stats;

pub use config::*;
pub use report::*;
pub use seeds::*;
pub use simulator::*;
pub use stats::*;

use thiserror::Error;

/// Simulation errors
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid simulation config: {0}")]
    InvalidConfig(String),

    #[error("Engine setup failed: {0}")]
    Engine(#[from] cl_engine::ConfigError),

    #[error("Found {found} of {wanted} balanced seeds after {candidates} candidates")]
    SeedSearchExhausted {
        found: usize,
        wanted: usize,
        candidates: u64,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SimResult<T> = Result<T, SimError>;
