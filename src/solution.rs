use super::*;

/// Immutable result of one [`Solver::fit`] call.
///
/// Holds the raw (pre-exponent) cost matrix the plan was optimized
/// against, the dense plan, and the engine's status. On any status
/// other than [`Status::Optimal`] the plan is all-zero and the dual
/// potentials are empty.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Solution {
    p: Exponent,
    costs: Matrix,
    plan: Plan,
    status: Status,
    lhs: Vec<Cost>,
    rhs: Vec<Cost>,
    pivots: usize,
}

impl Solution {
    pub(crate) fn new(p: Exponent, costs: Matrix, flow: Flow) -> Self {
        let (n, m) = costs.shape();
        let plan = match flow.status {
            Status::Optimal => Plan::scatter(n, m, &flow.arcs),
            _ => Plan::zeros(n, m),
        };
        Self {
            p,
            costs,
            plan,
            status: flow.status,
            lhs: flow.lhs,
            rhs: flow.rhs,
            pivots: flow.pivots,
        }
    }

    /// Exponent the raw costs were raised to.
    pub fn p(&self) -> Exponent {
        self.p
    }
    /// Raw N×M ground costs, before exponentiation.
    pub fn costs(&self) -> &Matrix {
        &self.costs
    }
    pub fn plan(&self) -> &Plan {
        &self.plan
    }
    pub fn status(&self) -> Status {
        self.status
    }
    /// True iff the engine proved the plan optimal.
    pub fn success(&self) -> bool {
        self.status.is_optimal()
    }
    /// Source and target dual potentials (α, β) of the exponentiated problem.
    pub fn duals(&self) -> (&[Cost], &[Cost]) {
        (&self.lhs, &self.rhs)
    }
    /// Number of basis exchanges the engine performed.
    pub fn pivots(&self) -> usize {
        self.pivots
    }
    /// Σ plan[i,j] · costs[i,j]^p.
    pub fn cost(&self) -> Cost {
        self.plan.cost(&self.costs.powf(self.p))
    }
    /// Wasserstein-p distance, cost^(1/p). The square root of the cost for p = 2.
    pub fn distance(&self) -> Cost {
        self.cost().powf(1. / self.p)
    }
}

impl Coupling for Solution {
    fn flow(&self, x: usize, y: usize) -> Mass {
        self.plan.get(x, y)
    }
    fn cost(&self) -> Cost {
        Solution::cost(self)
    }
    fn mass(&self) -> Mass {
        self.plan.mass()
    }
}
