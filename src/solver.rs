use super::*;

/// Exact optimal transport between two weighted point sets.
///
/// The solver is pure configuration: a cost exponent `p`, the ground
/// [`Metric`] used when no cost matrix is supplied, and the [`Transport`]
/// engine. [`Solver::fit`] takes `&self` and returns a fresh
/// [`Solution`], so one solver can be reused in a loop or shared
/// across threads.
///
/// # Configuration
///
/// Deserializes with defaults for missing fields, so `{"p": 1.0}` yields
/// an L1-cost solver with the Euclidean metric and default pivot budget.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(bound(deserialize = "T: serde::Deserialize<'de> + Default"))]
pub struct Solver<T = NetworkSimplex> {
    #[serde(default = "default_exponent")]
    p: Exponent,
    #[serde(default)]
    metric: Metric,
    #[serde(default)]
    engine: T,
}

fn default_exponent() -> Exponent {
    DEFAULT_EXPONENT
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            p: DEFAULT_EXPONENT,
            metric: Metric::default(),
            engine: NetworkSimplex::default(),
        }
    }
}

impl Solver<NetworkSimplex> {
    /// Network simplex solver with cost exponent `p`.
    pub fn new(p: Exponent) -> Result<Self, TransportError> {
        Self::exponent(p)?;
        Ok(Self {
            p,
            ..Self::default()
        })
    }
}

impl<T> Solver<T>
where
    T: Transport,
{
    /// Replaces the engine, keeping exponent and metric.
    pub fn with_engine<U>(self, engine: U) -> Solver<U>
    where
        U: Transport,
    {
        Solver {
            p: self.p,
            metric: self.metric,
            engine,
        }
    }
    /// Replaces the ground metric used when no cost matrix is supplied.
    pub fn with_metric(self, metric: Metric) -> Self {
        Self { metric, ..self }
    }

    pub fn p(&self) -> Exponent {
        self.p
    }
    pub fn metric(&self) -> Metric {
        self.metric
    }
    pub fn engine(&self) -> &T {
        &self.engine
    }

    /// Computes a minimum-cost transport plan from `source` to `target`.
    ///
    /// `costs`, if given, must be the N×M matrix of raw ground distances;
    /// it is used verbatim. Otherwise it is computed from the coordinates
    /// with the configured metric. Either way the engine sees `costs^p`.
    ///
    /// Malformed inputs are rejected before any solving. A solve that
    /// fails to reach optimality is not an error: check
    /// [`Solution::success`].
    pub fn fit(
        &self,
        source: &Histogram,
        target: &Histogram,
        costs: Option<&Matrix>,
    ) -> Result<Solution, TransportError> {
        Self::exponent(self.p)?;
        source.validate(Side::Source)?;
        target.validate(Side::Target)?;
        if source.dimension() != target.dimension() {
            return Err(TransportError::DimensionMismatch {
                source: source.dimension(),
                target: target.dimension(),
            });
        }
        let expected = (source.n(), target.n());
        let costs = match costs {
            Some(costs) if costs.shape() != expected => {
                return Err(TransportError::ShapeMismatch {
                    expected,
                    found: costs.shape(),
                });
            }
            Some(costs) => costs.clone(),
            None => self.ground(source, target),
        };
        if let Some(c) = costs.values().find(|c| !(*c >= 0. && c.is_finite())) {
            return Err(TransportError::InvalidCost(format!(
                "ground cost {} is not a finite non-negative number",
                c
            )));
        }
        log::debug!(
            "fitting {}x{} transport plan in {} dimensions, p = {}",
            source.n(),
            target.n(),
            source.dimension(),
            self.p
        );
        let ref demand = Self::balance(source, target);
        let flow = self
            .engine
            .transport(&costs.powf(self.p), source.weights(), demand);
        if !flow.status.is_optimal() {
            log::warn!(
                "{}x{} transport plan not optimal: {}",
                source.n(),
                target.n(),
                flow.status
            );
        }
        Ok(Solution::new(self.p, costs, flow))
    }

    /// Raw ground costs from coordinates. One-dimensional points are
    /// embedded in the plane first; a zero second coordinate leaves every
    /// distance unchanged.
    fn ground(&self, source: &Histogram, target: &Histogram) -> Matrix {
        match source.dimension() {
            1 => self
                .metric
                .pairwise(source.embed(2).points(), target.embed(2).points()),
            _ => self.metric.pairwise(source.points(), target.points()),
        }
    }
    /// Target weights rescaled to the source's total mass, so that
    /// validated-but-not-exact inputs still form a balanced instance.
    fn balance(source: &Histogram, target: &Histogram) -> Vec<Mass> {
        let scale = Density::mass(source) / Density::mass(target);
        target.weights().iter().map(|w| w * scale).collect()
    }
}

impl<T> Solver<T> {
    fn exponent(p: Exponent) -> Result<(), TransportError> {
        if p > 0. && p.is_finite() {
            Ok(())
        } else {
            Err(TransportError::InvalidExponent(p))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-6;

    fn line(positions: Vec<f64>, weights: Vec<Mass>) -> Histogram {
        Histogram::line(positions, weights).unwrap()
    }
    fn assert_marginals(solution: &Solution, source: &Histogram, target: &Histogram) {
        assert!(solution.success());
        for (r, w) in solution.plan().row_sums().iter().zip(source.weights()) {
            assert!((r - w).abs() < TOLERANCE, "row {} != {}", r, w);
        }
        for (c, w) in solution.plan().col_sums().iter().zip(target.weights()) {
            assert!((c - w).abs() < TOLERANCE, "col {} != {}", c, w);
        }
        assert!((solution.plan().mass() - 1.).abs() < TOLERANCE);
        assert!(solution.plan().matrix().values().all(|x| x >= -1e-9));
    }

    /// cheapest assignment of a uniform n×n problem, by enumeration
    fn brute(costs: &Matrix) -> Cost {
        fn permute(costs: &Matrix, row: usize, used: &mut [bool], acc: Cost, best: &mut Cost) {
            if row == costs.rows() {
                *best = best.min(acc);
                return;
            }
            for j in 0..costs.cols() {
                if !used[j] {
                    used[j] = true;
                    permute(costs, row + 1, used, acc + costs.get(row, j), best);
                    used[j] = false;
                }
            }
        }
        let mut best = Cost::INFINITY;
        permute(costs, 0, &mut vec![false; costs.cols()], 0., &mut best);
        best / costs.rows() as Cost
    }

    #[test]
    fn is_outlier_pair_plan_optimal() {
        // seven near points and one far pair; squared costs span ten orders
        let solver = Solver::default();
        for _ in 0..16 {
            let mut xs = (0..7).map(|_| 0.01 * rand::random::<f64>()).collect::<Vec<_>>();
            let mut ys = (0..7).map(|_| 0.01 * rand::random::<f64>()).collect::<Vec<_>>();
            xs.push(1000.);
            ys.push(1000.005);
            let ref source = Histogram::uniform(Matrix::column(xs));
            let ref target = Histogram::uniform(Matrix::column(ys));
            let solution = solver.fit(source, target, None).unwrap();
            assert_marginals(&solution, source, target);
            assert!((solution.plan().get(7, 7) - 0.125).abs() < 1e-12);
            let best = brute(&solution.costs().powf(2.));
            assert!(solution.cost() - best <= 1e-9 * best, "{} {}", solution.cost(), best);
        }
    }

    #[test]
    fn is_large_coordinate_plan_optimal() {
        let solver = Solver::default();
        let cloud = |n: usize| {
            (0..n)
                .map(|_| vec![1e4 * rand::random::<f64>(), 1e4 * rand::random::<f64>()])
                .collect::<Vec<_>>()
        };
        for _ in 0..16 {
            let ref source = Histogram::uniform(Matrix::try_from(cloud(8)).unwrap());
            let ref target = Histogram::uniform(Matrix::try_from(cloud(8)).unwrap());
            let solution = solver.fit(source, target, None).unwrap();
            assert_marginals(&solution, source, target);
            let best = brute(&solution.costs().powf(2.));
            assert!(solution.cost() - best <= 1e-9 * best, "{} {}", solution.cost(), best);
        }
    }

    #[test]
    fn is_random_plan_marginal() {
        let solver = Solver::default();
        for _ in 0..32 {
            let ref source = Histogram::random();
            let ref target = Histogram::random();
            let solution = solver.fit(source, target, None).unwrap();
            assert_marginals(&solution, source, target);
        }
    }

    #[test]
    fn is_single_point_plan_exact() {
        let ref source = line(vec![0.], vec![1.]);
        let ref target = line(vec![3.], vec![1.]);
        let solution = Solver::default().fit(source, target, None).unwrap();
        assert!(solution.success());
        assert_eq!(solution.plan().get(0, 0), 1.);
        assert!((solution.cost() - 9.).abs() < 1e-12);
        assert!((solution.distance() - 3.).abs() < 1e-12);
    }

    #[test]
    fn is_identical_plan_diagonal() {
        let solver = Solver::default();
        for _ in 0..16 {
            let ref h = Histogram::random();
            let solution = solver.fit(h, h, None).unwrap();
            assert_marginals(&solution, h, h);
            for i in 0..h.n() {
                for j in 0..h.n() {
                    let expected = if i == j { h.weights()[i] } else { 0. };
                    assert!((solution.plan().get(i, j) - expected).abs() < 1e-9);
                }
            }
            assert!(solution.cost().abs() < 1e-12);
        }
    }

    #[test]
    fn is_shifted_pair_uncrossed() {
        let ref source = line(vec![0., 1.], vec![0.5, 0.5]);
        let ref target = line(vec![2., 3.], vec![0.5, 0.5]);
        let solution = Solver::new(1.).unwrap().fit(source, target, None).unwrap();
        assert_marginals(&solution, source, target);
        assert!((solution.plan().get(0, 0) - 0.5).abs() < 1e-12);
        assert!((solution.plan().get(1, 1) - 0.5).abs() < 1e-12);
        assert!(solution.plan().get(0, 1).abs() < 1e-12);
        assert!(solution.plan().get(1, 0).abs() < 1e-12);
        assert!((solution.cost() - 2.).abs() < 1e-12);
    }

    #[test]
    fn is_line_plan_same_as_planar() {
        let solver = Solver::default();
        for _ in 0..8 {
            let n = 1 + rand::random_range(0..10);
            let m = 1 + rand::random_range(0..10);
            let xs = (0..n).map(|_| rand::random::<f64>()).collect::<Vec<_>>();
            let ys = (0..m).map(|_| rand::random::<f64>()).collect::<Vec<_>>();
            let ref source = Histogram::uniform(Matrix::column(xs));
            let ref target = Histogram::uniform(Matrix::column(ys));
            let flat = solver.fit(source, target, None).unwrap();
            let planar = solver
                .fit(&source.embed(2), &target.embed(2), None)
                .unwrap();
            assert_eq!(flat.costs(), planar.costs());
            for (a, b) in flat.plan().matrix().values().zip(planar.plan().matrix().values()) {
                assert!((a - b).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn is_equidistant_plan_valid() {
        let points = |rows: Vec<Vec<f64>>| Matrix::try_from(rows).unwrap();
        let ref source = Histogram::uniform(points(vec![vec![0., 0.], vec![0., 2.]]));
        let ref target = Histogram::uniform(points(vec![vec![1., 1.], vec![-1., 1.]]));
        let solution = Solver::default().fit(source, target, None).unwrap();
        assert_marginals(&solution, source, target);
        assert!((solution.cost() - 2.).abs() < 1e-9);
    }

    #[test]
    fn is_square_lattice_plan_valid() {
        // many equidistant pairs: every lattice point is unit-spaced from its neighbours
        let k = 6;
        let lattice = (0..k * k)
            .map(|i| vec![(i / k) as f64, (i % k) as f64])
            .collect::<Vec<_>>();
        let ref source = Histogram::uniform(Matrix::try_from(lattice.clone()).unwrap());
        let ref target = Histogram::uniform(
            Matrix::try_from(lattice.into_iter().map(|p| vec![p[0] + 1., p[1]]).collect::<Vec<_>>())
                .unwrap(),
        );
        let solution = Solver::new(1.)
            .unwrap()
            .with_metric(Metric::Manhattan)
            .fit(source, target, None)
            .unwrap();
        assert_marginals(&solution, source, target);
        assert!((solution.cost() - 1.).abs() < 1e-9);
    }

    #[test]
    fn is_supplied_cost_used_verbatim() {
        let ref source = line(vec![0., 1.], vec![0.5, 0.5]);
        let ref target = line(vec![0., 1.], vec![0.5, 0.5]);
        // reversed costs force the crossing plan
        let costs = Matrix::try_from(vec![vec![1., 0.], vec![0., 1.]]).unwrap();
        let solution = Solver::default().fit(source, target, Some(&costs)).unwrap();
        assert_eq!(solution.costs(), &costs);
        assert!((solution.plan().get(0, 1) - 0.5).abs() < 1e-12);
        assert!((solution.plan().get(1, 0) - 0.5).abs() < 1e-12);
        assert_eq!(solution.cost(), 0.);
    }

    #[test]
    fn is_raw_cost_stored_before_exponent() {
        let ref source = line(vec![0.], vec![1.]);
        let ref target = line(vec![2.], vec![1.]);
        let solution = Solver::new(3.).unwrap().fit(source, target, None).unwrap();
        assert_eq!(solution.costs().get(0, 0), 2.);
        assert!((solution.cost() - 8.).abs() < 1e-12);
        assert!((solution.distance() - 2.).abs() < 1e-12);
    }

    #[test]
    fn is_dual_objective_equal_to_cost() {
        let solver = Solver::default();
        for _ in 0..8 {
            let ref source = Histogram::random();
            let ref target = Histogram::random();
            let solution = solver.fit(source, target, None).unwrap();
            let (alpha, beta) = solution.duals();
            let dual = source.weights().iter().zip(alpha).map(|(a, x)| a * x).sum::<Cost>()
                + target.weights().iter().zip(beta).map(|(b, y)| b * y).sum::<Cost>();
            assert!((dual - solution.cost()).abs() < 1e-7);
        }
    }

    #[test]
    fn is_coupling_consistent_with_plan() {
        let ref source = Histogram::random();
        let ref target = Histogram::random();
        let solution = Solver::default().fit(source, target, None).unwrap();
        assert_eq!(Coupling::cost(&solution), solution.cost());
        assert_eq!(Coupling::mass(&solution), solution.plan().mass());
        assert_eq!(solution.flow(0, 0), solution.plan().get(0, 0));
    }

    #[test]
    fn is_solver_reusable() {
        let solver = Solver::default();
        let ref source = Histogram::random();
        let ref target = Histogram::random();
        let a = solver.fit(source, target, None).unwrap();
        let b = solver.fit(source, target, None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn is_slightly_unnormalized_target_balanced() {
        let ref source = line(vec![0., 1.], vec![0.5, 0.5]);
        let ref target = line(vec![0., 1.], vec![0.5, 0.5 + 1e-7]);
        let solution = Solver::default().fit(source, target, None).unwrap();
        assert!(solution.success());
        assert!((solution.plan().mass() - 1.).abs() < 1e-12);
    }

    #[test]
    fn does_reject_cost_shape() {
        let ref source = line(vec![0., 1.], vec![0.5, 0.5]);
        let ref target = line(vec![0., 1., 2.], vec![0.25, 0.25, 0.5]);
        let costs = Matrix::zeros(3, 2);
        assert_eq!(
            Solver::default().fit(source, target, Some(&costs)),
            Err(TransportError::ShapeMismatch {
                expected: (2, 3),
                found: (3, 2),
            })
        );
    }

    #[test]
    fn does_reject_dimension_mismatch() {
        let ref source = line(vec![0., 1.], vec![0.5, 0.5]);
        let ref target = source.embed(3);
        assert_eq!(
            Solver::default().fit(source, target, None),
            Err(TransportError::DimensionMismatch {
                source: 1,
                target: 3,
            })
        );
    }

    #[test]
    fn does_reject_invalid_weights() {
        let ref source = line(vec![0., 1.], vec![0.5, 0.5]);
        let ref target = line(vec![0., 1.], vec![0.7, 0.7]);
        assert!(matches!(
            Solver::default().fit(source, target, None),
            Err(TransportError::InvalidWeights(_))
        ));
    }

    #[test]
    fn does_reject_negative_cost() {
        let ref source = line(vec![0.], vec![1.]);
        let costs = Matrix::new(1, 1, vec![-1.]).unwrap();
        assert!(matches!(
            Solver::default().fit(source, source, Some(&costs)),
            Err(TransportError::InvalidCost(_))
        ));
    }

    #[test]
    fn does_reject_invalid_exponent() {
        assert_eq!(Solver::new(0.), Err(TransportError::InvalidExponent(0.)));
        assert!(Solver::new(f64::NAN).is_err());
        assert!(Solver::new(f64::INFINITY).is_err());
    }

    #[test]
    fn does_report_exhausted_as_data() {
        let ref source = Histogram::uniform(Matrix::column(vec![0., 1., 2., 3.]));
        let ref target = Histogram::uniform(Matrix::column(vec![4., 5., 6., 7.]));
        let solution = Solver::default()
            .with_engine(NetworkSimplex::new(1))
            .fit(source, target, None)
            .unwrap();
        assert!(!solution.success());
        assert_eq!(solution.status(), Status::Exhausted);
        assert_eq!(solution.plan(), &Plan::zeros(4, 4));
        assert!(solution.duals().0.is_empty());
    }

    #[test]
    fn does_load_config_with_defaults() {
        let solver = serde_json::from_str::<Solver>(r#"{ "p": 1.0, "metric": "Manhattan" }"#)
            .unwrap();
        assert_eq!(solver.p(), 1.);
        assert_eq!(solver.metric(), Metric::Manhattan);
        assert_eq!(solver.engine(), &NetworkSimplex::default());
    }

    #[test]
    fn does_reject_deserialized_bad_exponent() {
        let solver = serde_json::from_str::<Solver>(r#"{ "p": -2.0 }"#).unwrap();
        let ref h = line(vec![0.], vec![1.]);
        assert_eq!(
            solver.fit(h, h, None),
            Err(TransportError::InvalidExponent(-2.))
        );
    }

    /// feasible but not optimal; stands in for an alternate engine
    struct NorthWest;

    impl Transport for NorthWest {
        fn transport(&self, costs: &Matrix, supply: &[Mass], demand: &[Mass]) -> Flow {
            let mut arcs = Vec::new();
            let mut pile = supply.to_vec();
            let mut hole = demand.to_vec();
            let (mut i, mut j) = (0, 0);
            while i < costs.rows() && j < costs.cols() {
                let mass = pile[i].min(hole[j]);
                arcs.push((i, j, mass));
                pile[i] -= mass;
                hole[j] -= mass;
                if pile[i] <= hole[j] {
                    i += 1;
                } else {
                    j += 1;
                }
            }
            Flow {
                status: Status::Optimal,
                arcs,
                lhs: Vec::new(),
                rhs: Vec::new(),
                pivots: 0,
            }
        }
    }

    #[test]
    fn does_accept_alternate_engine() {
        let ref source = line(vec![0., 1.], vec![0.5, 0.5]);
        let ref target = line(vec![0., 1.], vec![0.25, 0.75]);
        let exact = Solver::default().fit(source, target, None).unwrap();
        let greedy = Solver::default()
            .with_engine(NorthWest)
            .fit(source, target, None)
            .unwrap();
        assert_marginals(&greedy, source, target);
        assert!(greedy.cost() >= exact.cost() - 1e-12);
    }
}
