//! Batch simulator

use std::time::Instant;

use cl_engine::{ParameterSet, SpinEngine};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::stats::SimStats;
use crate::SimResult;

/// Snapshot emitted every `log_interval` spins
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressPoint {
    pub round: u64,
    pub rtp: f64,
    pub hit_rate: f64,
    pub wild_mode_freq: f64,
    pub sigma: f64,
}

impl ProgressPoint {
    pub fn from_stats(stats: &SimStats, bet: u64) -> Self {
        Self {
            round: stats.spins,
            rtp: stats.rtp(),
            hit_rate: stats.hit_rate(),
            wild_mode_freq: stats.wild_mode_frequency(),
            sigma: stats.sigma(bet),
        }
    }
}

/// Completed batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimRun {
    pub stats: SimStats,
    /// Master seed actually used
    pub seed: u64,
    pub shards: usize,
    pub duration_ms: u64,
}

impl SimRun {
    pub fn spins_per_second(&self) -> f64 {
        if self.duration_ms == 0 {
            return 0.0;
        }
        self.stats.spins as f64 * 1000.0 / self.duration_ms as f64
    }
}

/// Plays many spins against one engine
pub struct Simulator {
    engine: SpinEngine,
}

impl Simulator {
    pub fn new(params: ParameterSet) -> SimResult<Self> {
        Ok(Self {
            engine: SpinEngine::new(params)?,
        })
    }

    pub fn from_engine(engine: SpinEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &SpinEngine {
        &self.engine
    }

    pub fn params(&self) -> &ParameterSet {
        self.engine.params()
    }

    /// Play `count` spins on one stream
    pub fn play<R: Rng + ?Sized>(&self, count: u64, rng: &mut R) -> SimStats {
        let bet = self.params().bet;
        let mut stats = SimStats::new();
        for _ in 0..count {
            let result = self.engine.spin(rng);
            stats.record(&result, bet);
        }
        stats
    }

    /// Parallel run split over `config.shards` independent streams
    ///
    /// Shard `i` plays on ChaCha8 stream `i` of the master seed, so a given
    /// seed and shard count always gives the same totals.
    pub fn run(&self, config: &SimConfig) -> SimResult<SimRun> {
        config.validate()?;
        let seed = resolve_seed(config.seed);
        let shards = config.shards;

        log::info!(
            "Simulating {} spins on {} shards (seed {})",
            config.spins,
            shards,
            seed
        );

        let start = Instant::now();
        let partials: Vec<SimStats> = (0..shards)
            .into_par_iter()
            .map(|shard| {
                let mut rng = shard_rng(seed, shard);
                self.play(shard_spins(config.spins, shards, shard), &mut rng)
            })
            .collect();

        let mut stats = SimStats::new();
        for partial in &partials {
            stats.merge(partial);
        }

        let run = SimRun {
            stats,
            seed,
            shards,
            duration_ms: start.elapsed().as_millis() as u64,
        };
        log::info!(
            "Done in {} ms: RTP {:.4}%, hit rate {:.4}%",
            run.duration_ms,
            run.stats.rtp(),
            run.stats.hit_rate()
        );
        Ok(run)
    }

    /// Sequential run on a single stream, reporting every `log_interval` spins
    pub fn run_with_progress<F>(&self, config: &SimConfig, mut on_progress: F) -> SimResult<SimRun>
    where
        F: FnMut(&ProgressPoint) -> SimResult<()>,
    {
        config.validate()?;
        let seed = resolve_seed(config.seed);
        let bet = self.params().bet;
        let mut rng = shard_rng(seed, 0);
        let mut stats = SimStats::new();

        log::info!("Simulating {} spins with progress (seed {})", config.spins, seed);

        let start = Instant::now();
        for round in 1..=config.spins {
            let result = self.engine.spin(&mut rng);
            stats.record(&result, bet);
            if round % config.log_interval == 0 {
                let point = ProgressPoint::from_stats(&stats, bet);
                log::debug!("Round {}: RTP {:.4}%", point.round, point.rtp);
                on_progress(&point)?;
            }
        }

        Ok(SimRun {
            stats,
            seed,
            shards: 1,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}

fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(rand::random)
}

fn shard_rng(seed: u64, shard: usize) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(shard as u64);
    rng
}

/// Even split; the first `total % shards` shards take one extra spin
fn shard_spins(total: u64, shards: usize, shard: usize) -> u64 {
    let shards = shards as u64;
    let shard = shard as u64;
    total / shards + u64::from(shard < total % shards)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shard_split_covers_total() {
        for (total, shards) in [(10, 3), (7, 7), (5, 8), (1_000_003, 16)] {
            let sum: u64 = (0..shards).map(|s| shard_spins(total, shards, s)).sum();
            assert_eq!(sum, total);
        }
        assert_eq!(shard_spins(10, 3, 0), 4);
        assert_eq!(shard_spins(10, 3, 2), 3);
    }

    #[test]
    fn test_run_counts() {
        let sim = Simulator::new(ParameterSet::standard()).unwrap();
        let config = SimConfig::quick().with_spins(1_001).with_shards(4).with_seed(3);
        let run = sim.run(&config).unwrap();

        assert_eq!(run.stats.spins, 1_001);
        assert_eq!(run.stats.total_wagered, 100_100);
        assert_eq!(run.seed, 3);
        assert_eq!(run.shards, 4);
    }

    #[test]
    fn test_run_rejects_bad_config() {
        let sim = Simulator::new(ParameterSet::standard()).unwrap();
        assert!(sim.run(&SimConfig::quick().with_spins(0)).is_err());
    }

    #[test]
    fn test_progress_points() {
        let sim = Simulator::new(ParameterSet::standard()).unwrap();
        let config = SimConfig::quick().with_spins(1_050).with_log_interval(250).with_seed(9);
        let mut rounds = Vec::new();
        let run = sim
            .run_with_progress(&config, |p| {
                rounds.push(p.round);
                Ok(())
            })
            .unwrap();

        assert_eq!(rounds, vec![250, 500, 750, 1000]);
        assert_eq!(run.stats.spins, 1_050);
        assert_eq!(run.shards, 1);
    }

    #[test]
    fn test_progress_matches_single_shard_run() {
        let sim = Simulator::new(ParameterSet::standard()).unwrap();
        let config = SimConfig::quick().with_spins(600).with_shards(1).with_seed(21);
        let parallel = sim.run(&config).unwrap();
        let sequential = sim.run_with_progress(&config, |_| Ok(())).unwrap();
        assert_eq!(parallel.stats, sequential.stats);
    }
}
