//! Parameter set for the spin engine
//!
//! Mirrors the JSON layout the game ships with:
//!
//! ```json
//! {
//!   "grid": { "rows": 5, "cols": 6 },
//!   "bet": 100,
//!   "symbols": { "names": ["WILD", "..."], "weights": [0, 7.0, 9.0] },
//!   "wildProb": 0.0179,
//!   "wildSymbol": 0,
//!   "lightning": { "strikesPerSpin": 3, "multipliers": [1, 2, 3] },
//!   "wildMode": { "minWilds": 3, "multiplier": 5 },
//!   "paytable": { "1": [15, 40, 100] }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::symbols::SymbolId;

/// Largest grid the engine accepts
pub const MAX_GRID_CELLS: usize = 1 << 20;

/// Grid dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    pub rows: usize,
    pub cols: usize,
}

impl GridSize {
    /// Total cell count (saturates; validated sizes never reach the cap)
    pub fn cells(&self) -> usize {
        self.rows.saturating_mul(self.cols)
    }
}

/// Symbol display names and sampling weights, both indexed by symbol id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolTable {
    /// Display names (not used by the engine itself)
    #[serde(default)]
    pub names: Vec<String>,
    /// Sampling weights; index 0 is ignored
    pub weights: Vec<f64>,
}

/// Base-mode strike settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightningConfig {
    /// Independent chain searches per base-mode spin
    pub strikes_per_spin: u32,
    /// Length multipliers; index 0 = chain length 1
    pub multipliers: Vec<u32>,
}

/// Wild bonus mode settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WildModeConfig {
    /// Wild cells needed to enter wild mode
    pub min_wilds: usize,
    /// Win multiplier applied to every wild-mode chain
    pub multiplier: u32,
}

/// Leftover from the served build; kept so existing config files still load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

/// Complete, read-only game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterSet {
    pub grid: GridSize,
    /// Stake per spin, used by reporting only
    pub bet: u64,
    pub symbols: SymbolTable,
    /// Per-cell probability of a wild
    pub wild_prob: f64,
    #[serde(default)]
    pub wild_symbol: SymbolId,
    pub lightning: LightningConfig,
    pub wild_mode: WildModeConfig,
    /// Pay by chain length per symbol; index 0 = length 3
    pub paytable: BTreeMap<SymbolId, Vec<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerConfig>,
}

impl ParameterSet {
    /// The shipped 5×6 game
    pub fn standard() -> Self {
        let paytable: BTreeMap<SymbolId, Vec<u32>> = [
            (1, vec![15, 40, 100, 200, 600, 1500]),
            (2, vec![12, 30, 80, 150, 400, 1000]),
            (3, vec![10, 25, 60, 120, 300, 750]),
            (4, vec![8, 20, 50, 100, 250, 600]),
            (5, vec![6, 15, 40, 80, 200, 500]),
            (6, vec![5, 12, 30, 60, 150, 400]),
            (7, vec![4, 10, 25, 50, 120, 300]),
            (8, vec![3, 8, 20, 40, 100, 250]),
            (9, vec![2, 6, 15, 30, 80, 200]),
        ]
        .into_iter()
        .collect();

        Self {
            grid: GridSize { rows: 5, cols: 6 },
            bet: 100,
            symbols: SymbolTable {
                names: [
                    "WILD", "CROWN", "DIAMOND", "RUBY", "EMERALD", "SAPPHIRE", "ACE", "KING",
                    "QUEEN", "JACK",
                ]
                .iter()
                .map(|s| s.to_string())
                .collect(),
                weights: vec![0.0, 7.0, 9.0, 11.0, 15.0, 17.0, 19.0, 22.0, 24.0, 26.0],
            },
            wild_prob: 0.0179,
            wild_symbol: 0,
            lightning: LightningConfig {
                strikes_per_spin: 3,
                multipliers: vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10],
            },
            wild_mode: WildModeConfig {
                min_wilds: 3,
                multiplier: 5,
            },
            paytable,
            server: None,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // LOADING
    // ═══════════════════════════════════════════════════════════════════════════

    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    /// Read, parse and validate a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        log::debug!("Loaded parameter file {}", path.as_ref().display());
        Self::from_json_str(&json)
    }

    /// Export as pretty JSON
    pub fn to_json_pretty(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // BUILDERS
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn with_grid(mut self, rows: usize, cols: usize) -> Self {
        self.grid = GridSize { rows, cols };
        self
    }

    pub fn with_wild_prob(mut self, wild_prob: f64) -> Self {
        self.wild_prob = wild_prob;
        self
    }

    pub fn with_weights(mut self, weights: Vec<f64>) -> Self {
        self.symbols.weights = weights;
        self
    }

    pub fn with_strikes(mut self, strikes: u32) -> Self {
        self.lightning.strikes_per_spin = strikes;
        self
    }

    pub fn with_multipliers(mut self, multipliers: Vec<u32>) -> Self {
        self.lightning.multipliers = multipliers;
        self
    }

    pub fn with_wild_mode(mut self, min_wilds: usize, multiplier: u32) -> Self {
        self.wild_mode = WildModeConfig {
            min_wilds,
            multiplier,
        };
        self
    }

    pub fn with_paytable(mut self, paytable: BTreeMap<SymbolId, Vec<u32>>) -> Self {
        self.paytable = paytable;
        self
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // VALIDATION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Reject anything the engine cannot run with
    pub fn validate(&self) -> ConfigResult<()> {
        let GridSize { rows, cols } = self.grid;
        let too_large = rows.checked_mul(cols).is_none_or(|n| n > MAX_GRID_CELLS);
        if rows == 0 || cols == 0 || too_large {
            return Err(ConfigError::InvalidGrid { rows, cols });
        }

        let weights = &self.symbols.weights;
        if weights.len() < 2 {
            return Err(ConfigError::TooFewSymbols(weights.len()));
        }
        for (symbol, &weight) in weights.iter().enumerate().skip(1) {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigError::InvalidWeight { symbol, weight });
            }
        }
        let total: f64 = weights[1..].iter().sum();
        if total <= 0.0 {
            return Err(ConfigError::NonPositiveTotalWeight(total));
        }

        if !self.wild_prob.is_finite() || !(0.0..=1.0).contains(&self.wild_prob) {
            return Err(ConfigError::InvalidWildProbability(self.wild_prob));
        }

        let wild = self.wild_symbol as usize;
        if wild > 0 && weights.get(wild).is_some_and(|&w| w > 0.0) {
            return Err(ConfigError::WildIsWeighted(self.wild_symbol));
        }
        if self.paytable.contains_key(&self.wild_symbol) {
            return Err(ConfigError::WildInPaytable(self.wild_symbol));
        }

        if self.lightning.multipliers.is_empty() {
            return Err(ConfigError::EmptyMultipliers);
        }
        if self.bet == 0 {
            return Err(ConfigError::ZeroBet);
        }

        Ok(())
    }

    /// Display name for a symbol id
    pub fn symbol_name(&self, symbol: SymbolId) -> String {
        self.symbols
            .names
            .get(symbol as usize)
            .cloned()
            .unwrap_or_else(|| format!("Symbol{}", symbol))
    }

    /// Flat view used by display clients
    pub fn summary(&self) -> ConfigSummary {
        ConfigSummary {
            rows: self.grid.rows,
            cols: self.grid.cols,
            bet: self.bet,
            symbol_names: self.symbols.names.clone(),
            symbol_weights: self.symbols.weights.clone(),
            wild_prob: self.wild_prob,
            wild_symbol: self.wild_symbol,
            strikes_per_spin: self.lightning.strikes_per_spin,
            multipliers: self.lightning.multipliers.clone(),
            min_wilds_for_mode: self.wild_mode.min_wilds,
            wild_mode_multiplier: self.wild_mode.multiplier,
            paytable: self.paytable.clone(),
        }
    }
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self::standard()
    }
}

/// Flattened configuration for display
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSummary {
    pub rows: usize,
    pub cols: usize,
    pub bet: u64,
    pub symbol_names: Vec<String>,
    pub symbol_weights: Vec<f64>,
    pub wild_prob: f64,
    pub wild_symbol: SymbolId,
    pub strikes_per_spin: u32,
    pub multipliers: Vec<u32>,
    pub min_wilds_for_mode: usize,
    pub wild_mode_multiplier: u32,
    pub paytable: BTreeMap<SymbolId, Vec<u32>>,
}
