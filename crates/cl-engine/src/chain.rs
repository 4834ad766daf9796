//! Chain discovery by self-avoiding random walk

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::grid::{Cell, Grid, UsedCells};
use crate::paytable::MIN_CHAIN_LENGTH;
use crate::symbols::SymbolId;

/// A connected run of one symbol (plus absorbed wilds)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chain {
    /// Connected symbol; meaningless for an empty chain
    pub symbol: SymbolId,
    /// Visited cells in walk order
    pub path: Vec<Cell>,
    /// Wild cell that triggered the search, if any
    pub wild_anchor: Option<Cell>,
}

impl Chain {
    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Long enough to pay and anchored on a real symbol
    pub fn qualifies(&self, wild_symbol: SymbolId) -> bool {
        self.len() >= MIN_CHAIN_LENGTH && self.symbol != wild_symbol
    }
}

/// Random-walk tracer
///
/// Hops from the seed cell to a uniformly chosen unvisited neighbor holding
/// the seed's symbol or a wild, until no such neighbor is left. It finds one
/// plausible path per seed, not the longest one.
#[derive(Debug, Clone, Copy)]
pub struct ChainTracer {
    wild_symbol: SymbolId,
}

impl ChainTracer {
    pub fn new(wild_symbol: SymbolId) -> Self {
        Self { wild_symbol }
    }

    pub fn wild_symbol(&self) -> SymbolId {
        self.wild_symbol
    }

    /// Walk from `start`; wild or already-used seeds give an empty chain
    pub fn trace<R: Rng + ?Sized>(
        &self,
        grid: &Grid,
        start: Cell,
        used: &UsedCells,
        rng: &mut R,
    ) -> Chain {
        let symbol = grid.get(start);
        if symbol == self.wild_symbol || used.contains(start) {
            return Chain::default();
        }

        let mut visited = UsedCells::new(grid.size());
        visited.insert(start);
        let mut path = vec![start];
        let mut current = start;
        let mut candidates = Vec::with_capacity(8);

        loop {
            candidates.clear();
            candidates.extend(grid.neighbors(current).filter(|&n| {
                let s = grid.get(n);
                !visited.contains(n)
                    && !used.contains(n)
                    && (s == symbol || s == self.wild_symbol)
            }));

            if candidates.is_empty() {
                break;
            }

            let next = candidates[rng.random_range(0..candidates.len())];
            visited.insert(next);
            path.push(next);
            current = next;
        }

        Chain {
            symbol,
            path,
            wild_anchor: None,
        }
    }
}
