use super::*;

/// Primal network simplex for the transportation problem.
///
/// # Algorithm
///
/// 1. Start from the star basis: each node hangs off an artificial root
///    by an artificial arc carrying its whole supply or demand
/// 2. Price real arcs by [`BlockSearch`] to find one with negative reduced cost
/// 3. Push as much flow as the cycle it closes in the tree allows
/// 4. Swap the blocking arc out of the tree and relabel the moved subtree
/// 5. Stop when no real arc prices in; artificial arcs must then be empty
///
/// # Precision
///
/// Each reduced cost is judged against its own arc cost and the
/// potentials it reads, never against the artificial cost. Before
/// declaring optimality, arcs whose sign pricing cannot settle are
/// re-priced by summing costs around their cycle, so one far-away point
/// cannot hide improvements among nearby ones.
///
/// # Degeneracy
///
/// The star basis is strongly feasible: every zero-flow tree arc points
/// toward the root. The leaving arc is the *last* blocking arc met when
/// walking the cycle from its apex in the entering arc's direction
/// (Cunningham's rule), which keeps the basis strongly feasible after
/// every pivot. Under that invariant no basis repeats, so the loop
/// terminates even when many pivots move zero mass.
///
/// # Complexity
///
/// Each pivot costs O(√(NM)) pricing in the common case plus a walk
/// over the cycle and the moved subtree. Pivot counts grow roughly
/// linearly to quadratically in N + M on typical inputs.
///
/// # Panics
///
/// [`Transport::transport`] panics if `costs` is not
/// `supply.len()` × `demand.len()`. [`Solver::fit`] checks shapes first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NetworkSimplex {
    /// Pivot budget before giving up with [`Status::Exhausted`].
    pub iterations: usize,
}

impl Default for NetworkSimplex {
    fn default() -> Self {
        Self {
            iterations: SIMPLEX_ITERATIONS,
        }
    }
}

impl NetworkSimplex {
    pub fn new(iterations: usize) -> Self {
        Self { iterations }
    }
}

/// Which half of the pivot cycle the leaving arc was found on.
#[derive(Debug, Clone, Copy)]
enum Half {
    Tail,
    Head,
}

/// Mutable state of one solve.
struct Pivoting<'a> {
    network: &'a Network<'a>,
    tree: Tree,
    flow: Vec<Mass>,
    basis: Vec<bool>,
    pricing: BlockSearch,
    pivots: usize,
}

impl<'a> Pivoting<'a> {
    fn new(network: &'a Network<'a>) -> Self {
        let mut flow = vec![0.; network.arcs()];
        let mut basis = vec![false; network.arcs()];
        for v in 0..network.root() {
            let e = network.artificial(v);
            flow[e] = network.supply(v).abs();
            basis[e] = true;
        }
        Self {
            network,
            tree: Tree::star(network),
            flow,
            basis,
            pricing: BlockSearch::new(network.real()),
            pivots: 0,
        }
    }

    /// Pivots until optimal, unbounded, or out of budget.
    fn run(&mut self, iterations: usize) -> Status {
        loop {
            let entering = match self
                .pricing
                .find(self.network, &self.tree, &self.basis)
                .or_else(|| self.certify())
            {
                None => return self.feasibility(),
                Some(e) => e,
            };
            if self.pivots >= iterations {
                return Status::Exhausted;
            }
            if !self.pivot(entering) {
                return Status::Unbounded;
            }
            self.pivots += 1;
        }
    }

    /// One basis exchange. Returns false if the cycle has no blocking arc,
    /// which needs negative costs and reversed supplies.
    fn pivot(&mut self, entering: usize) -> bool {
        let tail = self.network.tail(entering);
        let head = self.network.head(entering);
        let apex = self.tree.join(tail, head);
        let Some((leaving, half, delta)) = self.leaving(tail, head, apex) else {
            return false;
        };
        if delta > 0. {
            self.augment(entering, tail, head, apex, delta);
        }
        let out = self.tree.arc(leaving);
        self.flow[out] = 0.;
        self.basis[out] = false;
        self.basis[entering] = true;
        let (inner, outer) = match half {
            Half::Tail => (tail, head),
            Half::Head => (head, tail),
        };
        self.tree
            .exchange(self.network, entering, inner, outer, leaving);
        true
    }

    /// First non-basic arc that pricing left undecided but whose cycle
    /// cost is negative beyond rounding.
    fn certify(&self) -> Option<usize> {
        (0..self.network.real())
            .filter(|&e| !self.basis[e])
            .filter(|&e| {
                self.network.reduced(e, &self.tree) < self.network.tolerance(e, &self.tree)
            })
            .find(|&e| {
                let (reduced, size) = self.network.cycle(e, &self.tree);
                reduced < -SIMPLEX_EPSILON * size
            })
    }

    /// Cunningham's rule.
    ///
    /// The cycle runs apex → tail along the tree, across the entering
    /// arc, then head → apex. Arcs traversed against their orientation
    /// lose flow and can block. Among the minimum-flow blockers, the one
    /// met last on that walk leaves: on the head side ties move upward
    /// (`<=` while climbing from head), on the tail side the first
    /// minimum met while climbing from tail wins (`<`), and any head-side
    /// blocker beats a tail-side one of equal flow.
    fn leaving(&self, tail: usize, head: usize, apex: usize) -> Option<(usize, Half, Mass)> {
        let mut delta = Mass::INFINITY;
        let mut result = None;
        for u in self.tree.path(tail, apex) {
            if self.tree.direction(u) == Direction::Up {
                let d = self.flow[self.tree.arc(u)];
                if d < delta {
                    delta = d;
                    result = Some((u, Half::Tail));
                }
            }
        }
        for u in self.tree.path(head, apex) {
            if self.tree.direction(u) == Direction::Down {
                let d = self.flow[self.tree.arc(u)];
                if d <= delta {
                    delta = d;
                    result = Some((u, Half::Head));
                }
            }
        }
        result.map(|(u, half)| (u, half, delta.max(0.)))
    }

    /// Pushes `delta` around the cycle closed by `entering`.
    fn augment(&mut self, entering: usize, tail: usize, head: usize, apex: usize, delta: Mass) {
        self.flow[entering] += delta;
        for u in self.tree.path(tail, apex) {
            let e = self.tree.arc(u);
            match self.tree.direction(u) {
                Direction::Up => self.flow[e] -= delta,
                Direction::Down => self.flow[e] += delta,
            }
        }
        for u in self.tree.path(head, apex) {
            let e = self.tree.arc(u);
            match self.tree.direction(u) {
                Direction::Up => self.flow[e] += delta,
                Direction::Down => self.flow[e] -= delta,
            }
        }
    }

    /// Optimal only if no mass is left on artificial arcs.
    fn feasibility(&self) -> Status {
        let stranded = (0..self.network.root())
            .map(|v| self.flow[self.network.artificial(v)])
            .fold(0., Mass::max);
        if stranded > FEASIBILITY_TOLERANCE {
            Status::Infeasible
        } else {
            Status::Optimal
        }
    }

    /// Positive real flows as (source, target, mass).
    fn arcs(&self) -> Vec<(usize, usize, Mass)> {
        (0..self.network.real())
            .filter(|&e| self.flow[e] > 0.)
            .map(|e| (self.network.endpoints(e), self.flow[e]))
            .map(|((i, j), mass)| (i, j, mass))
            .collect()
    }

    /// Dual potentials α = −π(source), β = π(target), shifted by a common
    /// constant so that the source and target objectives are balanced.
    /// The first source's offset is taken out before anything is summed.
    fn duals(&self, supply: &[Mass], demand: &[Mass]) -> (Vec<Cost>, Vec<Cost>) {
        let n = self.network.n();
        let m = self.network.m();
        let base = self.tree.offset(0);
        let potential = |v: usize| (self.tree.offset(v) - base) + self.tree.local(v);
        let alpha = (0..n).map(|i| -potential(i)).collect::<Vec<_>>();
        let beta = (0..m).map(|j| potential(n + j)).collect::<Vec<_>>();
        let a = supply.iter().zip(&alpha).map(|(w, x)| w * x).sum::<Cost>();
        let b = demand.iter().zip(&beta).map(|(w, y)| w * y).sum::<Cost>();
        let total = supply.iter().sum::<Mass>() + demand.iter().sum::<Mass>();
        let shift = if total > 0. { (b - a) / total } else { 0. };
        (
            alpha.into_iter().map(|x| x + shift).collect(),
            beta.into_iter().map(|y| y - shift).collect(),
        )
    }
}

impl Transport for NetworkSimplex {
    fn transport(&self, costs: &Matrix, supply: &[Mass], demand: &[Mass]) -> Flow {
        let ref network = Network::new(costs, supply, demand);
        if network.imbalance().abs() > FEASIBILITY_TOLERANCE {
            log::warn!("unbalanced instance, net supply {}", network.imbalance());
            return Flow::failure(Status::Infeasible, 0);
        }
        let mut pivoting = Pivoting::new(network);
        let status = pivoting.run(self.iterations);
        log::debug!(
            "network simplex {}x{}: {} after {} pivots",
            network.n(),
            network.m(),
            status,
            pivoting.pivots
        );
        match status {
            Status::Optimal => {
                let (lhs, rhs) = pivoting.duals(supply, demand);
                Flow {
                    status,
                    arcs: pivoting.arcs(),
                    lhs,
                    rhs,
                    pivots: pivoting.pivots,
                }
            }
            _ => Flow::failure(status, pivoting.pivots),
        }
    }
}
