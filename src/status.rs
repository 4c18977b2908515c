/// Outcome of one min-cost flow solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Status {
    /// Feasible and bounded; the flow is cost-minimal.
    Optimal,
    /// Supplies and demands cannot be balanced.
    Infeasible,
    /// A cycle of negative cost and unlimited capacity exists.
    ///
    /// Instances built by [`Solver`](crate::Solver) never get here: their costs are
    /// non-negative and every real arc runs from a supply node to a demand
    /// node. An engine called directly can still meet one, e.g. a negative
    /// cost arc out of a node that must receive mass, which closes an
    /// all-forward cycle through the artificial root.
    Unbounded,
    /// The pivot budget ran out before optimality.
    Exhausted,
}

impl Status {
    pub fn is_optimal(&self) -> bool {
        matches!(self, Self::Optimal)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Optimal => write!(f, "optimal"),
            Self::Infeasible => write!(f, "infeasible"),
            Self::Unbounded => write!(f, "unbounded"),
            Self::Exhausted => write!(f, "iteration limit reached"),
        }
    }
}
