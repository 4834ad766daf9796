//! Balanced seed lists
//!
//! Replays consecutive seeds through the engine and keeps the ones that
//! steer the running RTP of the kept set toward a target, while no single
//! win value may fill more than a fixed share of the list. Every kept seed
//! replays to the same win with `ChaCha8Rng::seed_from_u64(seed)`.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use cl_engine::{ParameterSet, SpinEngine};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::{SimError, SimResult};

/// RTP the balancer aims for, in percent
pub const DEFAULT_TARGET_RTP: f64 = 96.5;

/// Balancing rules
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedBalanceConfig {
    /// Seeds to collect
    pub count: usize,

    /// Target RTP of the collected set, in percent
    pub target_rtp: f64,

    /// Largest share of the list one win value may take
    pub max_win_share: f64,

    /// Distance from the target (percentage points) that counts as "on target"
    pub near_window: f64,

    /// While on target, accept spins returning within this many points of it
    pub near_band: f64,

    /// First seed tried (None = current unix time)
    pub base_seed: Option<u64>,

    /// Candidates tried before giving up
    pub max_candidates: u64,
}

impl Default for SeedBalanceConfig {
    fn default() -> Self {
        Self {
            count: 10_000,
            target_rtp: DEFAULT_TARGET_RTP,
            max_win_share: 0.01,
            near_window: 1.0,
            near_band: 50.0,
            base_seed: None,
            max_candidates: 100_000_000,
        }
    }
}

impl SeedBalanceConfig {
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn with_target_rtp(mut self, target: f64) -> Self {
        self.target_rtp = target;
        self
    }

    pub fn with_max_win_share(mut self, share: f64) -> Self {
        self.max_win_share = share;
        self
    }

    pub fn with_base_seed(mut self, seed: u64) -> Self {
        self.base_seed = Some(seed);
        self
    }

    pub fn with_max_candidates(mut self, max: u64) -> Self {
        self.max_candidates = max;
        self
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.count == 0 {
            return Err(SimError::InvalidConfig("seed count must be positive".into()));
        }
        if !self.target_rtp.is_finite() || self.target_rtp <= 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "target RTP must be positive (got {})",
                self.target_rtp
            )));
        }
        if !(self.max_win_share > 0.0 && self.max_win_share <= 1.0) {
            return Err(SimError::InvalidConfig(format!(
                "max win share must be within (0, 1] (got {})",
                self.max_win_share
            )));
        }
        Ok(())
    }

    /// Occurrences allowed per win value (at least one)
    pub fn max_per_win(&self) -> usize {
        ((self.count as f64 * self.max_win_share).floor() as usize).max(1)
    }

    /// Whether a spin returning `spin_return` percent of the bet is kept,
    /// given the running RTP of the kept set (None while it is empty)
    pub fn accepts(&self, current_rtp: Option<f64>, spin_return: f64) -> bool {
        let Some(current) = current_rtp else {
            return true;
        };
        let target = self.target_rtp;
        if current < target && spin_return > current {
            true
        } else if current > target && spin_return < current {
            true
        } else if (current - target).abs() < self.near_window {
            (target - self.near_band..=target + self.near_band).contains(&spin_return)
        } else {
            false
        }
    }
}

/// One kept seed and the win it replays to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalancedSeed {
    pub seed: u64,
    pub win: u64,
}

/// Result of a balancing run
#[derive(Debug, Clone)]
pub struct SeedSet {
    pub seeds: Vec<BalancedSeed>,
    pub base_seed: u64,
    /// Seeds replayed, kept or not
    pub candidates: u64,
    pub bet: u64,
}

impl SeedSet {
    pub fn total_win(&self) -> u64 {
        self.seeds.iter().map(|s| s.win).sum()
    }

    /// RTP of the kept seeds, in percent
    pub fn rtp(&self) -> f64 {
        rtp_of(self.total_win(), self.seeds.len(), self.bet)
    }

    /// `[{"seed": .., "win": ..}, ..]`
    pub fn to_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string(&self.seeds)?)
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> SimResult<()> {
        fs::write(path.as_ref(), self.to_json()?)?;
        log::info!(
            "Saved {} seeds to {}",
            self.seeds.len(),
            path.as_ref().display()
        );
        Ok(())
    }
}

fn rtp_of(total_win: u64, spins: usize, bet: u64) -> f64 {
    if spins == 0 || bet == 0 {
        return 0.0;
    }
    total_win as f64 / (spins as f64 * bet as f64) * 100.0
}

/// Collects seed lists against one engine
pub struct SeedBalancer {
    engine: SpinEngine,
}

impl SeedBalancer {
    pub fn new(params: ParameterSet) -> SimResult<Self> {
        Ok(Self {
            engine: SpinEngine::new(params)?,
        })
    }

    /// Total win of the spin played from `seed`
    pub fn replay(&self, seed: u64) -> u64 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.engine.spin(&mut rng).total_win
    }

    pub fn run(&self, config: &SeedBalanceConfig) -> SimResult<SeedSet> {
        config.validate()?;
        let bet = self.engine.params().bet;
        let base_seed = config
            .base_seed
            .unwrap_or_else(|| chrono::Utc::now().timestamp().max(0) as u64);
        let max_per_win = config.max_per_win();

        log::info!(
            "Balancing {} seeds toward {:.2}% RTP from seed {} (max {} per win value)",
            config.count,
            config.target_rtp,
            base_seed,
            max_per_win
        );

        let mut seeds = Vec::with_capacity(config.count);
        let mut win_counts: HashMap<u64, usize> = HashMap::new();
        let mut total_win = 0u64;
        let mut candidates = 0u64;
        let mut last_percent = 0;

        while seeds.len() < config.count {
            if candidates >= config.max_candidates {
                return Err(SimError::SeedSearchExhausted {
                    found: seeds.len(),
                    wanted: config.count,
                    candidates,
                });
            }
            let seed = base_seed.wrapping_add(candidates);
            candidates += 1;

            let win = self.replay(seed);
            let seen = win_counts.get(&win).copied().unwrap_or(0);
            if seen >= max_per_win {
                continue;
            }

            let current = (!seeds.is_empty()).then(|| rtp_of(total_win, seeds.len(), bet));
            let spin_return = win as f64 / bet as f64 * 100.0;
            if !config.accepts(current, spin_return) {
                continue;
            }

            seeds.push(BalancedSeed { seed, win });
            total_win += win;
            win_counts.insert(win, seen + 1);

            let percent = seeds.len() * 100 / config.count;
            if percent >= last_percent + 5 {
                last_percent = percent;
                log::debug!(
                    "{}% (RTP {:.2}%, {} candidates)",
                    percent,
                    rtp_of(total_win, seeds.len(), bet),
                    candidates
                );
            }
        }

        let set = SeedSet {
            seeds,
            base_seed,
            candidates,
            bet,
        };
        log::info!(
            "Kept {} of {} seeds, RTP {:.2}%",
            set.seeds.len(),
            set.candidates,
            set.rtp()
        );
        Ok(set)
    }
}
