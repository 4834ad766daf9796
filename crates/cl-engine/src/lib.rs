//! # cl-engine — Chain Lightning spin engine
//!
//! Evaluates one spin of a grid-based "chain" slot: a weighted symbol grid is
//! generated, connected same-symbol paths are traced by a random walk, and
//! each paid chain is priced from the paytable and length multipliers.
//!
//! ## Architecture
//!
//! ```text
//! SpinEngine
//!     │
//!     ├── GridGenerator ── SymbolSampler
//!     ├── ChainTracer (base-mode strikes)
//!     ├── WildChainSelector (wild mode, 3+ wilds)
//!     └── PayoutResolver
//!           │
//!           v
//!     SpinResult
//! ```
//!
//! The engine owns no random state: every spin takes `&mut impl Rng`, so a
//! simulation can give each thread its own stream.

pub mod chain;
pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod paytable;
pub mod spin;
pub mod symbols;
pub mod wild;

pub use chain::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use grid::*;
pub use paytable::*;
pub use spin::*;
pub use symbols::*;
pub use wild::*;
