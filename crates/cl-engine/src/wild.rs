//! Wild-anchored chain selection

use rand::Rng;

use crate::chain::{Chain, ChainTracer};
use crate::grid::{Cell, Grid, UsedCells};

/// Picks the longest chain reachable from the neighbors of a wild
#[derive(Debug, Clone, Copy)]
pub struct WildChainSelector {
    tracer: ChainTracer,
}

impl WildChainSelector {
    pub fn new(tracer: ChainTracer) -> Self {
        Self { tracer }
    }

    /// Trace once from every free, non-wild neighbor of `wild_cell`.
    ///
    /// The first strictly longest chain in neighbor order wins. The result
    /// always carries `wild_cell` as its anchor, even when empty.
    pub fn trace_from_wild<R: Rng + ?Sized>(
        &self,
        grid: &Grid,
        wild_cell: Cell,
        used: &UsedCells,
        rng: &mut R,
    ) -> Chain {
        let wild = self.tracer.wild_symbol();
        let mut best = Chain::default();

        for neighbor in grid.neighbors(wild_cell) {
            if used.contains(neighbor) || grid.get(neighbor) == wild {
                continue;
            }
            let chain = self.tracer.trace(grid, neighbor, used, rng);
            if chain.len() > best.len() {
                best = chain;
            }
        }

        best.wild_anchor = Some(wild_cell);
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn selector() -> WildChainSelector {
        WildChainSelector::new(ChainTracer::new(0))
    }

    #[test]
    fn test_surrounded_by_wilds_is_empty_but_anchored() {
        let grid = Grid::from_rows(vec![vec![0, 0], vec![0, 0]]).unwrap();
        let used = UsedCells::new(grid.size());
        let chain =
            selector().trace_from_wild(&grid, Cell::new(0, 0), &used, &mut StdRng::seed_from_u64(1));
        assert!(chain.is_empty());
        assert_eq!(chain.wild_anchor, Some(Cell::new(0, 0)));
    }

    #[test]
    fn test_keeps_longest_neighbor_chain() {
        // Every walk can step back through the anchor; only the 3s continue past it
        let grid = Grid::from_rows(vec![vec![1, 0, 3], vec![3, 9, 9]]).unwrap();
        let used = UsedCells::new(grid.size());
        let chain =
            selector().trace_from_wild(&grid, Cell::new(0, 1), &used, &mut StdRng::seed_from_u64(8));
        assert_eq!(chain.symbol, 3);
        assert_eq!(
            chain.path,
            vec![Cell::new(0, 2), Cell::new(0, 1), Cell::new(1, 0)]
        );
        assert_eq!(chain.wild_anchor, Some(Cell::new(0, 1)));
    }

    #[test]
    fn test_tie_keeps_first_in_neighbor_order() {
        // Both sides reach length two through the anchor
        let grid = Grid::from_rows(vec![vec![4, 0, 5]]).unwrap();
        let used = UsedCells::new(grid.size());
        let chain =
            selector().trace_from_wild(&grid, Cell::new(0, 1), &used, &mut StdRng::seed_from_u64(8));
        assert_eq!(chain.symbol, 4);
        assert_eq!(chain.path, vec![Cell::new(0, 0), Cell::new(0, 1)]);
    }

    #[test]
    fn test_skips_used_neighbors() {
        let grid = Grid::from_rows(vec![vec![6, 0, 7, 7]]).unwrap();
        let mut used = UsedCells::new(grid.size());
        used.insert(Cell::new(0, 2));
        let chain =
            selector().trace_from_wild(&grid, Cell::new(0, 1), &used, &mut StdRng::seed_from_u64(3));
        assert_eq!(chain.symbol, 6);
        assert_eq!(chain.path, vec![Cell::new(0, 0), Cell::new(0, 1)]);
    }
}
