//! Grid, cell coordinates and per-spin cell bookkeeping

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{GridSize, ParameterSet};
use crate::error::{ConfigError, ConfigResult};
use crate::symbols::{SymbolId, SymbolSampler};

/// 8-connected offsets, row-major, centre skipped
const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Grid coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Symbol grid for one spin (row-major storage)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<SymbolId>,
}

impl Grid {
    /// Build from explicit rows; every row must have the same non-zero length
    pub fn from_rows(rows: Vec<Vec<SymbolId>>) -> ConfigResult<Self> {
        let row_count = rows.len();
        let cols = rows.first().map_or(0, Vec::len);
        if row_count == 0 || cols == 0 || rows.iter().any(|r| r.len() != cols) {
            return Err(ConfigError::InvalidGrid {
                rows: row_count,
                cols,
            });
        }
        Ok(Self {
            rows: row_count,
            cols,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// Grid filled with a single symbol
    pub fn filled(size: GridSize, symbol: SymbolId) -> Self {
        Self {
            rows: size.rows,
            cols: size.cols,
            cells: vec![symbol; size.cells()],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn size(&self) -> GridSize {
        GridSize {
            rows: self.rows,
            cols: self.cols,
        }
    }

    /// Symbol at `cell`; the cell must be in bounds
    pub fn get(&self, cell: Cell) -> SymbolId {
        self.cells[cell.row * self.cols + cell.col]
    }

    pub fn set(&mut self, cell: Cell, symbol: SymbolId) {
        self.cells[cell.row * self.cols + cell.col] = symbol;
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    /// In-bounds 8-connected neighbors in row-major offset order
    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        NEIGHBOR_OFFSETS.iter().filter_map(move |&(dr, dc)| {
            let row = cell.row.checked_add_signed(dr)?;
            let col = cell.col.checked_add_signed(dc)?;
            let next = Cell::new(row, col);
            self.contains(next).then_some(next)
        })
    }

    /// All cells holding `symbol`, row-major
    pub fn cells_with(&self, symbol: SymbolId) -> Vec<Cell> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &s)| s == symbol)
            .map(|(i, _)| Cell::new(i / self.cols, i % self.cols))
            .collect()
    }

    /// Nested rows for display
    pub fn to_rows(&self) -> Vec<Vec<SymbolId>> {
        self.cells.chunks(self.cols).map(<[SymbolId]>::to_vec).collect()
    }
}

/// Unchecked wire form of [`Grid`]
#[derive(Deserialize)]
struct RawGrid {
    rows: usize,
    cols: usize,
    cells: Vec<SymbolId>,
}

impl TryFrom<RawGrid> for Grid {
    type Error = ConfigError;

    fn try_from(raw: RawGrid) -> ConfigResult<Self> {
        let RawGrid { rows, cols, cells } = raw;
        if rows == 0 || cols == 0 || rows.checked_mul(cols) != Some(cells.len()) {
            return Err(ConfigError::InvalidGrid { rows, cols });
        }
        Ok(Self { rows, cols, cells })
    }
}

/// Cells already claimed during one spin
#[derive(Debug, Clone)]
pub struct UsedCells {
    cols: usize,
    marks: Vec<bool>,
}

impl UsedCells {
    pub fn new(size: GridSize) -> Self {
        Self {
            cols: size.cols,
            marks: vec![false; size.cells()],
        }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.marks[cell.row * self.cols + cell.col]
    }

    pub fn insert(&mut self, cell: Cell) {
        self.marks[cell.row * self.cols + cell.col] = true;
    }

    pub fn extend<'a>(&mut self, cells: impl IntoIterator<Item = &'a Cell>) {
        for &cell in cells {
            self.insert(cell);
        }
    }

    /// Number of claimed cells
    pub fn len(&self) -> usize {
        self.marks.iter().filter(|&&m| m).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.marks.contains(&true)
    }
}

/// Fills a fresh grid cell by cell
#[derive(Debug, Clone)]
pub struct GridGenerator {
    size: GridSize,
    wild_prob: f64,
    wild_symbol: SymbolId,
    sampler: SymbolSampler,
}

impl GridGenerator {
    pub fn new(params: &ParameterSet) -> ConfigResult<Self> {
        Ok(Self {
            size: params.grid,
            wild_prob: params.wild_prob,
            wild_symbol: params.wild_symbol,
            sampler: SymbolSampler::new(&params.symbols.weights)?,
        })
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    /// Each cell: wild with `wild_prob`, otherwise a weighted paying symbol
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Grid {
        let mut cells = Vec::with_capacity(self.size.cells());
        for _ in 0..self.size.cells() {
            let symbol = if rng.random::<f64>() < self.wild_prob {
                self.wild_symbol
            } else {
                self.sampler.sample(rng)
            };
            cells.push(symbol);
        }
        Grid {
            rows: self.size.rows,
            cols: self.size.cols,
            cells,
        }
    }
}
