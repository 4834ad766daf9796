//! Error types for the spin engine

use thiserror::Error;

use crate::symbols::SymbolId;

/// Invalid parameter set, raised once when an engine is built
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid grid size: {rows}x{cols}")]
    InvalidGrid { rows: usize, cols: usize },

    #[error("Symbol weights need at least one paying symbol (got {0} entries)")]
    TooFewSymbols(usize),

    #[error("Invalid weight for symbol {symbol}: {weight}")]
    InvalidWeight { symbol: usize, weight: f64 },

    #[error("Total symbol weight must be positive (got {0})")]
    NonPositiveTotalWeight(f64),

    #[error("Wild probability must be within [0, 1] (got {0})")]
    InvalidWildProbability(f64),

    #[error("Wild symbol {0} carries a paying weight")]
    WildIsWeighted(SymbolId),

    #[error("Paytable contains a row for the wild symbol {0}")]
    WildInPaytable(SymbolId),

    #[error("Length multiplier table is empty")]
    EmptyMultipliers,

    #[error("Bet must be positive")]
    ZeroBet,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias
pub type ConfigResult<T> = Result<T, ConfigError>;
