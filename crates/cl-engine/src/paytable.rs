//! Paytable and length-multiplier lookups

use std::collections::BTreeMap;

use crate::config::ParameterSet;
use crate::error::{ConfigError, ConfigResult};
use crate::symbols::SymbolId;

/// Shortest chain that pays
pub const MIN_CHAIN_LENGTH: usize = 3;

/// Pure lookups from chain length to pay and multiplier.
///
/// Lengths beyond a table's end reuse its last entry.
#[derive(Debug, Clone)]
pub struct PayoutResolver {
    paytable: BTreeMap<SymbolId, Vec<u32>>,
    multipliers: Vec<u32>,
}

impl PayoutResolver {
    pub fn new(paytable: BTreeMap<SymbolId, Vec<u32>>, multipliers: Vec<u32>) -> ConfigResult<Self> {
        if multipliers.is_empty() {
            return Err(ConfigError::EmptyMultipliers);
        }
        Ok(Self {
            paytable,
            multipliers,
        })
    }

    pub fn from_params(params: &ParameterSet) -> ConfigResult<Self> {
        Self::new(params.paytable.clone(), params.lightning.multipliers.clone())
    }

    /// Pay for `length` cells of `symbol`; index 0 of a row is length 3
    pub fn base_pay(&self, symbol: SymbolId, length: usize) -> u32 {
        if length < MIN_CHAIN_LENGTH {
            return 0;
        }
        match self.paytable.get(&symbol) {
            Some(pays) if !pays.is_empty() => {
                pays[(length - MIN_CHAIN_LENGTH).min(pays.len() - 1)]
            }
            _ => 0,
        }
    }

    /// Multiplier for `length`; index 0 is length 1
    pub fn length_multiplier(&self, length: usize) -> u32 {
        let idx = length.saturating_sub(1).min(self.multipliers.len() - 1);
        self.multipliers[idx]
    }
}
