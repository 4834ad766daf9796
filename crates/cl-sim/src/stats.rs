//! Aggregate spin statistics

use std::collections::BTreeMap;

use cl_engine::{SpinResult, SymbolId};
use serde::{Deserialize, Serialize};

/// Per-symbol chain tally
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolTally {
    pub chains: u64,
    pub total_win: u64,
}

/// Running totals over a batch of spins
///
/// Every field is an integer sum or histogram, so merging shards in any
/// order gives identical totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimStats {
    pub spins: u64,
    pub total_wagered: u64,
    pub total_won: u64,
    /// Spins with a positive win
    pub hits: u64,
    pub wild_mode_spins: u64,
    pub wild_mode_won: u64,
    pub base_won: u64,
    pub max_win: u64,
    /// Sum of squared spin wins
    pub sum_sq_win: u128,
    /// Paid chain length → count
    pub chain_lengths: BTreeMap<usize, u64>,
    pub symbol_wins: BTreeMap<SymbolId, SymbolTally>,
    /// Wilds on the grid → wild-mode spins
    pub wilds_distribution: BTreeMap<usize, u64>,
}

impl SimStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one spin into the totals
    pub fn record(&mut self, result: &SpinResult, bet: u64) {
        let win = result.total_win;

        self.spins += 1;
        self.total_wagered += bet;
        self.total_won += win;
        self.sum_sq_win += u128::from(win) * u128::from(win);
        self.max_win = self.max_win.max(win);
        if win > 0 {
            self.hits += 1;
        }

        if result.wild_mode {
            self.wild_mode_spins += 1;
            self.wild_mode_won += win;
            *self.wilds_distribution.entry(result.wild_count).or_default() += 1;
        } else {
            self.base_won += win;
        }

        for chain in &result.chains {
            *self.chain_lengths.entry(chain.length).or_default() += 1;
            let tally = self.symbol_wins.entry(chain.symbol).or_default();
            tally.chains += 1;
            tally.total_win += chain.win;
        }
    }

    /// Add another batch's totals
    pub fn merge(&mut self, other: &SimStats) {
        self.spins += other.spins;
        self.total_wagered += other.total_wagered;
        self.total_won += other.total_won;
        self.hits += other.hits;
        self.wild_mode_spins += other.wild_mode_spins;
        self.wild_mode_won += other.wild_mode_won;
        self.base_won += other.base_won;
        self.max_win = self.max_win.max(other.max_win);
        self.sum_sq_win += other.sum_sq_win;

        for (&len, &count) in &other.chain_lengths {
            *self.chain_lengths.entry(len).or_default() += count;
        }
        for (&symbol, tally) in &other.symbol_wins {
            let entry = self.symbol_wins.entry(symbol).or_default();
            entry.chains += tally.chains;
            entry.total_win += tally.total_win;
        }
        for (&wilds, &count) in &other.wilds_distribution {
            *self.wilds_distribution.entry(wilds).or_default() += count;
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // DERIVED METRICS (percentages)
    // ═══════════════════════════════════════════════════════════════════════════

    fn percent_of_wagered(&self, amount: u64) -> f64 {
        if self.total_wagered == 0 {
            return 0.0;
        }
        amount as f64 / self.total_wagered as f64 * 100.0
    }

    fn percent_of_spins(&self, count: u64) -> f64 {
        if self.spins == 0 {
            return 0.0;
        }
        count as f64 / self.spins as f64 * 100.0
    }

    /// Return to player
    pub fn rtp(&self) -> f64 {
        self.percent_of_wagered(self.total_won)
    }

    pub fn hit_rate(&self) -> f64 {
        self.percent_of_spins(self.hits)
    }

    pub fn wild_mode_frequency(&self) -> f64 {
        self.percent_of_spins(self.wild_mode_spins)
    }

    /// RTP contributed by base-mode spins
    pub fn base_rtp(&self) -> f64 {
        self.percent_of_wagered(self.base_won)
    }

    /// RTP contributed by wild-mode spins
    pub fn wild_rtp(&self) -> f64 {
        self.percent_of_wagered(self.wild_mode_won)
    }

    /// Average win of a wild-mode spin, in credits
    pub fn wild_mode_avg_win(&self) -> f64 {
        if self.wild_mode_spins == 0 {
            return 0.0;
        }
        self.wild_mode_won as f64 / self.wild_mode_spins as f64
    }

    /// Average spins between wild-mode triggers (the N in "1/N")
    pub fn wild_mode_interval(&self) -> Option<f64> {
        if self.wild_mode_spins == 0 {
            return None;
        }
        Some(self.spins as f64 / self.wild_mode_spins as f64)
    }

    pub fn mean_win(&self) -> f64 {
        if self.spins == 0 {
            return 0.0;
        }
        self.total_won as f64 / self.spins as f64
    }

    /// Standard deviation of the spin win in credits
    pub fn std_dev(&self) -> f64 {
        if self.spins == 0 {
            return 0.0;
        }
        let mean = self.mean_win();
        let variance = (self.sum_sq_win as f64 / self.spins as f64 - mean * mean).max(0.0);
        variance.sqrt()
    }

    /// Standard deviation of the spin win in bet units
    pub fn sigma(&self, bet: u64) -> f64 {
        if bet == 0 {
            return 0.0;
        }
        self.std_dev() / bet as f64
    }

    /// Share of all paid chains with this length, in percent
    pub fn chain_length_share(&self, length: usize) -> f64 {
        let total: u64 = self.chain_lengths.values().sum();
        if total == 0 {
            return 0.0;
        }
        self.chain_lengths.get(&length).copied().unwrap_or(0) as f64 / total as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cl_engine::{Cell, Chain, ChainResult, Grid};

    fn spin(win_chains: &[(SymbolId, usize, u32)], wild_mode: bool, wild_count: usize) -> SpinResult {
        let chains: Vec<ChainResult> = win_chains
            .iter()
            .map(|&(symbol, len, pay)| {
                let chain = Chain {
                    symbol,
                    path: (0..len).map(|c| Cell::new(0, c)).collect(),
                    wild_anchor: None,
                };
                ChainResult::new(chain, pay, 1, if wild_mode { 5 } else { 1 })
            })
            .collect();
        SpinResult {
            grid: Grid::from_rows(vec![vec![1; 6]]).unwrap(),
            total_win: chains.iter().map(|c| c.win).sum(),
            chains,
            wild_mode,
            wild_count,
            wild_mode_multiplier: if wild_mode { 5 } else { 1 },
        }
    }

    #[test]
    fn test_empty_stats() {
        let stats = SimStats::new();
        assert_eq!(stats.rtp(), 0.0);
        assert_eq!(stats.hit_rate(), 0.0);
        assert_eq!(stats.sigma(100), 0.0);
        assert_eq!(stats.chain_length_share(3), 0.0);
    }

    #[test]
    fn test_record() {
        let mut stats = SimStats::new();
        stats.record(&spin(&[(1, 3, 15), (2, 4, 10)], false, 1), 100);
        stats.record(&spin(&[], false, 0), 100);
        stats.record(&spin(&[(3, 3, 10)], true, 3), 100);

        assert_eq!(stats.spins, 3);
        assert_eq!(stats.total_wagered, 300);
        assert_eq!(stats.total_won, 25 + 50);
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.wild_mode_spins, 1);
        assert_eq!(stats.wild_mode_won, 50);
        assert_eq!(stats.base_won, 25);
        assert_eq!(stats.max_win, 50);
        assert_eq!(stats.sum_sq_win, 25 * 25 + 50 * 50);
        assert_eq!(stats.chain_lengths[&3], 2);
        assert_eq!(stats.chain_lengths[&4], 1);
        assert_eq!(stats.symbol_wins[&2], SymbolTally { chains: 1, total_win: 10 });
        assert_eq!(stats.wilds_distribution.len(), 1);
        assert_eq!(stats.wilds_distribution[&3], 1);

        assert_relative_eq!(stats.rtp(), 25.0);
        assert_relative_eq!(stats.base_rtp() + stats.wild_rtp(), stats.rtp());
        assert_relative_eq!(stats.hit_rate(), 200.0 / 3.0);
        assert_relative_eq!(stats.chain_length_share(3), 200.0 / 3.0);
        assert_relative_eq!(stats.wild_mode_avg_win(), 50.0);
        assert_relative_eq!(stats.wild_mode_interval().unwrap(), 3.0);
    }

    #[test]
    fn test_wilds_histogram_counts_only_triggers() {
        let mut stats = SimStats::new();
        for _ in 0..1000 {
            stats.record(&spin(&[], false, 0), 100);
        }
        stats.record(&spin(&[], false, 2), 100);
        assert!(stats.wilds_distribution.is_empty());
        assert_eq!(stats.wild_mode_interval(), None);

        stats.record(&spin(&[], true, 4), 100);
        stats.record(&spin(&[(1, 3, 10)], true, 4), 100);
        assert_eq!(stats.wilds_distribution.values().sum::<u64>(), stats.wild_mode_spins);
        assert_eq!(stats.wilds_distribution[&4], 2);
    }

    #[test]
    fn test_sigma() {
        // Wins 0 and 200 on bet 100: mean 100, deviation 100 → 1 bet
        let mut stats = SimStats::new();
        stats.record(&spin(&[], false, 0), 100);
        stats.record(&spin(&[(1, 3, 200)], false, 0), 100);
        assert_relative_eq!(stats.std_dev(), 100.0);
        assert_relative_eq!(stats.sigma(100), 1.0);
        assert_eq!(stats.sigma(0), 0.0);
    }

    #[test]
    fn test_merge_matches_single_pass() {
        let spins = [
            spin(&[(1, 3, 15)], false, 1),
            spin(&[], true, 4),
            spin(&[(2, 5, 30), (4, 3, 2)], false, 0),
            spin(&[(9, 3, 2)], true, 3),
        ];

        let mut whole = SimStats::new();
        for s in &spins {
            whole.record(s, 100);
        }

        let mut left = SimStats::new();
        let mut right = SimStats::new();
        for s in &spins[..2] {
            left.record(s, 100);
        }
        for s in &spins[2..] {
            right.record(s, 100);
        }
        left.merge(&right);

        assert_eq!(left, whole);
    }
}
