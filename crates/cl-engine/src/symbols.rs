//! Symbol ids and weighted symbol sampling

use rand::Rng;

use crate::error::{ConfigError, ConfigResult};

/// Symbol id; the wild is conventionally 0, paying symbols are `1..N`
pub type SymbolId = u32;

/// Weighted draw over the paying symbols
///
/// Weight slot 0 is reserved and never sampled.
#[derive(Debug, Clone)]
pub struct SymbolSampler {
    weights: Vec<f64>,
    total_weight: f64,
}

impl SymbolSampler {
    /// Build from the raw weight table (index = symbol id)
    pub fn new(weights: &[f64]) -> ConfigResult<Self> {
        if weights.len() < 2 {
            return Err(ConfigError::TooFewSymbols(weights.len()));
        }
        let total_weight: f64 = weights[1..].iter().sum();
        if total_weight <= 0.0 || !total_weight.is_finite() {
            return Err(ConfigError::NonPositiveTotalWeight(total_weight));
        }
        Ok(Self {
            weights: weights.to_vec(),
            total_weight,
        })
    }

    /// Sum of the paying weights
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Draw one paying symbol
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> SymbolId {
        self.symbol_at(rng.random::<f64>() * self.total_weight)
    }

    /// Symbol whose cumulative weight band contains `roll`
    fn symbol_at(&self, mut roll: f64) -> SymbolId {
        for (id, &weight) in self.weights.iter().enumerate().skip(1) {
            roll -= weight;
            if roll <= 0.0 {
                return id as SymbolId;
            }
        }
        // Rounding can leave a sliver of remainder: last symbol that can appear
        self.weights
            .iter()
            .rposition(|&w| w > 0.0)
            .unwrap_or(self.weights.len() - 1) as SymbolId
    }
}
