//! Exact discrete optimal transport.
//!
//! Computes minimum-cost transport plans between two weighted point sets
//! by running network simplex on the bipartite transportation graph.
//!
//! ## Core Types
//!
//! - [`Histogram`]: Support points with non-negative masses summing to one
//! - [`Matrix`]: Dense row-major storage for coordinates, costs and plans
//! - [`Metric`]: Ground metric producing raw pairwise cost matrices
//! - [`Solver`]: Immutable configuration: exponent `p`, metric and engine
//! - [`Solution`]: Immutable result of one [`Solver::fit`] call
//!
//! ## Algorithms
//!
//! - [`NetworkSimplex`]: Exact min-cost flow over a strongly feasible spanning tree
//! - [`Transport`]: The engine seam; any exact solver can stand in
//!
//! ## Usage
//!
//! ```ignore
//! let source = Histogram::line(vec![0., 1.], vec![0.5, 0.5])?;
//! let target = Histogram::line(vec![2., 3.], vec![0.5, 0.5])?;
//! let solution = Solver::new(1.)?.fit(&source, &target, None)?;
//! assert!(solution.success());
//! assert!((solution.cost() - 2.).abs() < 1e-9);
//! ```
mod coupling;
mod density;
mod error;
mod histogram;
mod matrix;
mod metric;
mod network;
mod pivot;
mod plan;
mod simplex;
mod solution;
mod solver;
mod status;
mod transport;
mod tree;

pub use coupling::*;
pub use density::*;
pub use error::*;
pub use histogram::*;
pub use matrix::*;
pub use metric::*;
pub use network::*;
pub use pivot::*;
pub use plan::*;
pub use simplex::*;
pub use solution::*;
pub use solver::*;
pub use status::*;
pub use transport::*;
pub use tree::*;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Probability mass carried by support points and transported along arcs.
pub type Mass = f64;
/// Ground distances, exponentiated arc costs and dual potentials.
pub type Cost = f64;
/// Power applied to raw ground distances before solving.
pub type Exponent = f64;

// ============================================================================
// TRAITS
// ============================================================================
/// Random instance generation for testing and benchmarking.
pub trait Arbitrary {
    /// Generate a uniformly random instance.
    fn random() -> Self;
}

// ============================================================================
// SOLVER PARAMETERS
// ============================================================================
/// Cost exponent when none is given (squared ground distance).
pub const DEFAULT_EXPONENT: Exponent = 2.;
/// Allowed deviation of a histogram's total mass from one.
pub const WEIGHT_TOLERANCE: Mass = 1e-6;

// ============================================================================
// NETWORK SIMPLEX
// Exact min-cost flow on the complete bipartite graph plus an artificial root.
// ============================================================================
/// Pivot budget before a solve is reported as exhausted.
pub const SIMPLEX_ITERATIONS: usize = 1 << 24;
/// Reduced-cost tolerance, relative to the costs and potentials each check reads.
pub const SIMPLEX_EPSILON: Cost = 1e-12;
/// Smallest block scanned by block-search pricing.
pub const SIMPLEX_BLOCK: usize = 16;
/// Residual mass tolerated on artificial arcs at optimality.
pub const FEASIBILITY_TOLERANCE: Mass = 1e-9;

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize terminal logging at INFO level.
/// Safe to call more than once; later calls are ignored.
#[cfg(feature = "logging")]
pub fn log() {
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let _ = simplelog::TermLogger::init(
        log::LevelFilter::Info,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
}
