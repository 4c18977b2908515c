use super::*;

/// Dense N×M transport plan.
///
/// Entry (i, j) is the mass moved from source point `i` to target point
/// `j`. A plan from an optimal solve has row sums equal to the source
/// weights and column sums equal to the target weights.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Plan(Matrix);

impl Plan {
    /// The plan that moves nothing.
    pub fn zeros(n: usize, m: usize) -> Self {
        Self(Matrix::zeros(n, m))
    }
    /// Scatters sparse `(source, target, mass)` triples into a dense plan.
    /// Unlisted entries stay zero; repeated entries accumulate.
    pub fn scatter(n: usize, m: usize, arcs: &[(usize, usize, Mass)]) -> Self {
        let mut plan = Self::zeros(n, m);
        for &(i, j, mass) in arcs {
            plan.0.increment(i, j, mass);
        }
        plan
    }

    pub fn matrix(&self) -> &Matrix {
        &self.0
    }
    pub fn shape(&self) -> (usize, usize) {
        self.0.shape()
    }
    pub fn get(&self, i: usize, j: usize) -> Mass {
        self.0.get(i, j)
    }
    /// Total mass moved.
    pub fn mass(&self) -> Mass {
        self.0.sum()
    }
    /// Mass leaving each source point.
    pub fn row_sums(&self) -> Vec<Mass> {
        self.0.row_sums()
    }
    /// Mass arriving at each target point.
    pub fn col_sums(&self) -> Vec<Mass> {
        self.0.col_sums()
    }
    /// Σ plan[i,j] · costs[i,j].
    ///
    /// # Panics
    ///
    /// Panics if `costs` is not the plan's shape.
    pub fn cost(&self, costs: &Matrix) -> Cost {
        self.0.dot(costs)
    }
    /// Entries carrying positive mass, row-major.
    pub fn support(&self) -> impl Iterator<Item = (usize, usize, Mass)> + '_ {
        let m = self.0.cols();
        self.0
            .values()
            .enumerate()
            .filter(|(_, x)| *x > 0.)
            .map(move |(k, x)| (k / m, k % m, x))
    }
}

impl From<Plan> for Matrix {
    fn from(plan: Plan) -> Self {
        plan.0
    }
}
