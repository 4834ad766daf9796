//! Spin engine: one spin from grid generation to total win

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::chain::{Chain, ChainTracer};
use crate::config::ParameterSet;
use crate::error::ConfigResult;
use crate::grid::{Cell, Grid, GridGenerator, UsedCells};
use crate::paytable::PayoutResolver;
use crate::spin::{ChainResult, SpinResult};
use crate::wild::WildChainSelector;

/// Start-cell draws per strike before the strike is dropped
pub const MAX_STRIKE_ATTEMPTS: usize = 30;

/// Chain-discovery strategy chosen for a spin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpinMode {
    /// Random strikes, no extra multiplier
    Base,
    /// Chains anchored on wild cells, wild-mode multiplier applied
    Wild,
}

/// Chain Lightning spin engine
///
/// Immutable once built, so one engine can serve many threads. Every spin
/// draws from the random stream it is handed; the same stream state and
/// parameters always produce the same result.
#[derive(Debug, Clone)]
pub struct SpinEngine {
    params: ParameterSet,
    generator: GridGenerator,
    tracer: ChainTracer,
    selector: WildChainSelector,
    payouts: PayoutResolver,
}

impl SpinEngine {
    /// Validate `params` and build the engine
    pub fn new(params: ParameterSet) -> ConfigResult<Self> {
        params.validate()?;

        let generator = GridGenerator::new(&params)?;
        let payouts = PayoutResolver::from_params(&params)?;
        let tracer = ChainTracer::new(params.wild_symbol);

        log::debug!(
            "Spin engine ready: {}x{} grid, {} strikes, wild mode at {}+ wilds (x{})",
            params.grid.rows,
            params.grid.cols,
            params.lightning.strikes_per_spin,
            params.wild_mode.min_wilds,
            params.wild_mode.multiplier
        );

        Ok(Self {
            params,
            generator,
            tracer,
            selector: WildChainSelector::new(tracer),
            payouts,
        })
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    pub fn payouts(&self) -> &PayoutResolver {
        &self.payouts
    }

    /// Mode implied by the number of wilds on the grid
    pub fn mode_for(&self, wild_count: usize) -> SpinMode {
        if wild_count >= self.params.wild_mode.min_wilds {
            SpinMode::Wild
        } else {
            SpinMode::Base
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SPIN EXECUTION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Generate a grid and evaluate it
    pub fn spin<R: Rng + ?Sized>(&self, rng: &mut R) -> SpinResult {
        let grid = self.generator.generate(rng);
        self.evaluate(grid, rng)
    }

    /// Evaluate a given grid; `rng` still drives strikes and walks
    pub fn evaluate<R: Rng + ?Sized>(&self, grid: Grid, rng: &mut R) -> SpinResult {
        let wilds = grid.cells_with(self.params.wild_symbol);
        let mode = self.mode_for(wilds.len());
        let wild_mode_multiplier = match mode {
            SpinMode::Wild => self.params.wild_mode.multiplier,
            SpinMode::Base => 1,
        };

        log::trace!("{} wilds -> {:?} mode", wilds.len(), mode);

        let mut used = UsedCells::new(grid.size());
        let chains = match mode {
            SpinMode::Wild => self.run_wild_mode(&grid, &wilds, &mut used, rng),
            SpinMode::Base => self.run_base_mode(&grid, &mut used, rng),
        };

        SpinResult {
            total_win: chains.iter().map(|c| c.win).sum(),
            grid,
            chains,
            wild_mode: mode == SpinMode::Wild,
            wild_count: wilds.len(),
            wild_mode_multiplier,
        }
    }

    /// Price a qualifying chain, or `None` if it does not pay
    fn price(&self, chain: Chain, wild_mult: u32) -> Option<ChainResult> {
        if !chain.qualifies(self.params.wild_symbol) {
            return None;
        }
        let base_pay = self.payouts.base_pay(chain.symbol, chain.len());
        let mult = self.payouts.length_multiplier(chain.len());
        Some(ChainResult::new(chain, base_pay, mult, wild_mult))
    }

    fn run_wild_mode<R: Rng + ?Sized>(
        &self,
        grid: &Grid,
        wilds: &[Cell],
        used: &mut UsedCells,
        rng: &mut R,
    ) -> Vec<ChainResult> {
        let multiplier = self.params.wild_mode.multiplier;
        let mut results = Vec::new();

        for &wild in wilds {
            if used.contains(wild) {
                continue;
            }
            let chain = self.selector.trace_from_wild(grid, wild, used, rng);
            // Unproductive wilds stay free for later searches
            if let Some(result) = self.price(chain, multiplier) {
                used.insert(wild);
                used.extend(&result.path);
                results.push(result);
            }
        }

        results
    }

    fn run_base_mode<R: Rng + ?Sized>(
        &self,
        grid: &Grid,
        used: &mut UsedCells,
        rng: &mut R,
    ) -> Vec<ChainResult> {
        let mut results = Vec::new();

        for strike in 0..self.params.lightning.strikes_per_spin {
            let Some(start) = pick_free_cell(grid, used, rng) else {
                log::trace!("Strike {} found no free cell", strike);
                continue;
            };
            let chain = self.tracer.trace(grid, start, used, rng);
            if let Some(result) = self.price(chain, 1) {
                used.extend(&result.path);
                results.push(result);
            }
        }

        results
    }
}

/// Uniform cell draw, retried while it lands on a used cell
fn pick_free_cell<R: Rng + ?Sized>(grid: &Grid, used: &UsedCells, rng: &mut R) -> Option<Cell> {
    for _ in 0..MAX_STRIKE_ATTEMPTS {
        let row = rng.random_range(0..grid.rows());
        let col = rng.random_range(0..grid.cols());
        let cell = Cell::new(row, col);
        if !used.contains(cell) {
            return Some(cell);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridSize;
    use crate::error::ConfigError;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_rejects_invalid_params() {
        let params = ParameterSet::standard().with_grid(0, 0);
        assert!(matches!(
            SpinEngine::new(params),
            Err(ConfigError::InvalidGrid { .. })
        ));
    }

    #[test]
    fn test_mode_threshold() {
        let engine = SpinEngine::new(ParameterSet::standard()).unwrap();
        assert_eq!(engine.mode_for(2), SpinMode::Base);
        assert_eq!(engine.mode_for(3), SpinMode::Wild);
        assert_eq!(engine.mode_for(7), SpinMode::Wild);
    }

    #[test]
    fn test_basic_spin() {
        let engine = SpinEngine::new(ParameterSet::standard()).unwrap();
        let mut rng = StdRng::seed_from_u64(12345);
        let result = engine.spin(&mut rng);
        assert_eq!(result.grid.size(), GridSize { rows: 5, cols: 6 });
        assert_eq!(
            result.total_win,
            result.chains.iter().map(|c| c.win).sum::<u64>()
        );
    }

    #[test]
    fn test_pick_free_cell_gives_up_on_full_grid() {
        let grid = Grid::filled(GridSize { rows: 2, cols: 2 }, 1);
        let mut used = UsedCells::new(grid.size());
        for r in 0..2 {
            for c in 0..2 {
                used.insert(Cell::new(r, c));
            }
        }
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(pick_free_cell(&grid, &used, &mut rng), None);
    }

    #[test]
    fn test_uniform_grid_single_strike_takes_whole_grid() {
        // Every walk on a full 2x2 grid of one symbol visits all four cells
        let params = ParameterSet::standard()
            .with_grid(2, 2)
            .with_wild_prob(0.0)
            .with_strikes(3);
        let engine = SpinEngine::new(params).unwrap();
        let grid = Grid::filled(GridSize { rows: 2, cols: 2 }, 9);
        let result = engine.evaluate(grid, &mut StdRng::seed_from_u64(77));

        assert_eq!(result.chains.len(), 1);
        let chain = &result.chains[0];
        assert_eq!(chain.length, 4);
        assert_eq!(chain.base_pay, 6);
        assert_eq!(chain.mult, 4);
        assert_eq!(chain.wild_mult, 1);
        assert_eq!(result.total_win, 24);
        assert!(!result.wild_mode);
        assert_eq!(result.wild_mode_multiplier, 1);
    }

    #[test]
    fn test_wild_grid_without_payers_is_zero() {
        let params = ParameterSet::standard().with_grid(3, 3);
        let engine = SpinEngine::new(params).unwrap();
        let grid = Grid::filled(GridSize { rows: 3, cols: 3 }, 0);
        let result = engine.evaluate(grid, &mut StdRng::seed_from_u64(5));
        assert!(result.wild_mode);
        assert_eq!(result.wild_count, 9);
        assert_eq!(result.wild_mode_multiplier, 5);
        assert!(result.chains.is_empty());
        assert_eq!(result.total_win, 0);
    }
}
