use super::*;

/// An exact solver for the balanced transportation problem.
///
/// Given an N×M matrix of (already exponentiated) arc costs, N supplies
/// and M demands of equal total, produces a minimum-cost flow. The
/// [`Solver`] only talks to its engine through this trait, so another
/// exact algorithm can be substituted without touching callers.
pub trait Transport {
    fn transport(&self, costs: &Matrix, supply: &[Mass], demand: &[Mass]) -> Flow;
}

/// Sparse engine output.
///
/// `arcs` lists `(source, target, mass)` for every arc carrying positive
/// flow. On optimality `lhs` and `rhs` hold dual potentials α and β with
/// α[i] + β[j] ≤ cost[i][j] everywhere and equality wherever mass moves.
/// On any other status `arcs`, `lhs` and `rhs` are empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Flow {
    pub status: Status,
    pub arcs: Vec<(usize, usize, Mass)>,
    pub lhs: Vec<Cost>,
    pub rhs: Vec<Cost>,
    pub pivots: usize,
}

impl Flow {
    /// Empty flow reporting a failed solve.
    pub fn failure(status: Status, pivots: usize) -> Self {
        Self {
            status,
            arcs: Vec::new(),
            lhs: Vec::new(),
            rhs: Vec::new(),
            pivots,
        }
    }
}
