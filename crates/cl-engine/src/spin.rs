//! Spin results and their display view

use serde::{Deserialize, Serialize};

use crate::chain::Chain;
use crate::config::ParameterSet;
use crate::grid::{Cell, Grid};
use crate::symbols::SymbolId;

/// A paid chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainResult {
    pub symbol: SymbolId,
    pub length: usize,
    pub base_pay: u32,
    /// Length multiplier
    pub mult: u32,
    /// Wild-mode multiplier (1 in base mode)
    pub wild_mult: u32,
    /// `base_pay × mult × wild_mult`
    pub win: u64,
    pub path: Vec<Cell>,
    pub wild_anchor: Option<Cell>,
}

impl ChainResult {
    /// Price a qualifying chain
    pub fn new(chain: Chain, base_pay: u32, mult: u32, wild_mult: u32) -> Self {
        Self {
            symbol: chain.symbol,
            length: chain.len(),
            base_pay,
            mult,
            wild_mult,
            win: u64::from(base_pay) * u64::from(mult) * u64::from(wild_mult),
            path: chain.path,
            wild_anchor: chain.wild_anchor,
        }
    }
}

/// Outcome of one spin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinResult {
    pub grid: Grid,
    pub total_win: u64,
    /// Paid chains in processing order
    pub chains: Vec<ChainResult>,
    pub wild_mode: bool,
    pub wild_count: usize,
    /// Configured multiplier in wild mode, otherwise 1
    pub wild_mode_multiplier: u32,
}

impl SpinResult {
    pub fn is_win(&self) -> bool {
        self.total_win > 0
    }

    /// Win as a multiple of `bet`
    pub fn win_ratio(&self, bet: u64) -> f64 {
        if bet > 0 {
            self.total_win as f64 / bet as f64
        } else {
            0.0
        }
    }

    /// Display-ready structure with symbol names resolved
    pub fn view(&self, params: &ParameterSet) -> SpinView {
        SpinView {
            grid: self.grid.to_rows(),
            total_win: self.total_win,
            wild_mode: self.wild_mode,
            wild_count: self.wild_count,
            wild_mode_multiplier: self.wild_mode_multiplier,
            chains: self
                .chains
                .iter()
                .map(|c| ChainView {
                    symbol: c.symbol,
                    symbol_name: params.symbol_name(c.symbol),
                    length: c.length,
                    base_pay: c.base_pay,
                    mult: c.mult,
                    wild_mult: c.wild_mult,
                    win: c.win,
                    path: c.path.iter().map(|p| [p.row, p.col]).collect(),
                    wild_start: c.wild_anchor.map(|p| [p.row, p.col]),
                })
                .collect(),
        }
    }
}

/// Serialized form handed to display clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpinView {
    pub grid: Vec<Vec<SymbolId>>,
    pub total_win: u64,
    pub wild_mode: bool,
    pub wild_count: usize,
    pub wild_mode_multiplier: u32,
    pub chains: Vec<ChainView>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainView {
    pub symbol: SymbolId,
    pub symbol_name: String,
    pub length: usize,
    pub base_pay: u32,
    pub mult: u32,
    pub wild_mult: u32,
    pub win: u64,
    pub path: Vec<[usize; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wild_start: Option<[usize; 2]>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(symbol: SymbolId, cells: &[(usize, usize)], anchor: Option<Cell>) -> Chain {
        Chain {
            symbol,
            path: cells.iter().map(|&(r, c)| Cell::new(r, c)).collect(),
            wild_anchor: anchor,
        }
    }

    #[test]
    fn test_wild_mode_win_product() {
        let c = chain(2, &[(0, 0), (0, 1), (0, 2), (1, 2)], Some(Cell::new(1, 1)));
        let result = ChainResult::new(c, 20, 2, 5);
        assert_eq!(result.length, 4);
        assert_eq!(result.win, 200);
        assert_eq!(result.wild_anchor, Some(Cell::new(1, 1)));
    }

    #[test]
    fn test_view_uses_names_and_pairs() {
        let params = ParameterSet::standard();
        let grid = Grid::from_rows(vec![vec![1, 1, 1], vec![0, 2, 3]]).unwrap();
        let paid = ChainResult::new(chain(1, &[(0, 0), (0, 1), (0, 2)], None), 15, 3, 1);
        let result = SpinResult {
            grid,
            total_win: paid.win,
            chains: vec![paid],
            wild_mode: false,
            wild_count: 1,
            wild_mode_multiplier: 1,
        };

        let view = result.view(&params);
        assert_eq!(view.chains[0].symbol_name, "CROWN");
        assert_eq!(view.chains[0].path, vec![[0, 0], [0, 1], [0, 2]]);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["totalWin"], 45);
        assert_eq!(json["grid"][1][0], 0);
        assert!(json["chains"][0].get("wildStart").is_none());
        assert_eq!(json["chains"][0]["basePay"], 15);
    }

    #[test]
    fn test_win_ratio() {
        let result = SpinResult {
            grid: Grid::from_rows(vec![vec![1]]).unwrap(),
            total_win: 250,
            chains: Vec::new(),
            wild_mode: false,
            wild_count: 0,
            wild_mode_multiplier: 1,
        };
        assert!(result.is_win());
        assert_eq!(result.win_ratio(100), 2.5);
        assert_eq!(result.win_ratio(0), 0.0);
    }
}
