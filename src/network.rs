use super::*;

/// Complete bipartite transportation network closed by an artificial root.
///
/// # Layout
///
/// Nodes: sources `0..n`, targets `n..n+m`, root `n+m`.
///
/// Arcs: the real arc from source `i` to target `j` sits at `i*m + j`.
/// Each non-root node `v` then owns one artificial arc at `n*m + v`,
/// joining it to the root. That arc points toward the root when `v` has
/// non-negative supply and away from it otherwise, so an artificial arc
/// that starts with zero flow always points rootward.
///
/// Real arcs have unlimited capacity. Artificial arcs cost more than any
/// path through real arcs, which drives their flow to zero whenever the
/// instance is balanced.
pub struct Network<'a> {
    costs: &'a Matrix,
    supply: Vec<Mass>,
    artificial: Cost,
}

impl<'a> Network<'a> {
    /// Sources supply `supply[i]`, targets absorb `demand[j]`, arcs cost `costs[i][j]`.
    ///
    /// # Panics
    ///
    /// Panics if `costs` is not `supply.len()` × `demand.len()`.
    pub fn new(costs: &'a Matrix, supply: &[Mass], demand: &[Mass]) -> Self {
        assert!(costs.shape() == (supply.len(), demand.len()));
        let nodes = supply.len() + demand.len() + 1;
        let artificial = (costs.max().max(0.) + 1.) * nodes as Cost;
        let supply = supply
            .iter()
            .copied()
            .chain(demand.iter().map(|d| -d))
            .collect();
        Self {
            costs,
            supply,
            artificial,
        }
    }

    /// Number of sources.
    pub fn n(&self) -> usize {
        self.costs.rows()
    }
    /// Number of targets.
    pub fn m(&self) -> usize {
        self.costs.cols()
    }
    pub fn root(&self) -> usize {
        self.n() + self.m()
    }
    /// Node count, root included.
    pub fn nodes(&self) -> usize {
        self.root() + 1
    }
    /// Number of real arcs; these are the only pricing candidates.
    pub fn real(&self) -> usize {
        self.n() * self.m()
    }
    /// Number of arcs, artificial ones included.
    pub fn arcs(&self) -> usize {
        self.real() + self.root()
    }
    /// The artificial arc joining `v` to the root.
    pub fn artificial(&self, v: usize) -> usize {
        self.real() + v
    }
    pub fn is_artificial(&self, e: usize) -> bool {
        e >= self.real()
    }
    /// Signed supply of a non-root node; negative for demand.
    pub fn supply(&self, v: usize) -> Mass {
        self.supply[v]
    }
    /// Net supply the root would have to absorb; zero for balanced instances.
    pub fn imbalance(&self) -> Mass {
        self.supply.iter().sum()
    }
    /// (source, target) indices of a real arc.
    pub fn endpoints(&self, e: usize) -> (usize, usize) {
        (e / self.m(), e % self.m())
    }

    /// Node the arc leaves.
    pub fn tail(&self, e: usize) -> usize {
        if self.is_artificial(e) {
            let v = e - self.real();
            if self.supply(v) >= 0. { v } else { self.root() }
        } else {
            e / self.m()
        }
    }
    /// Node the arc enters.
    pub fn head(&self, e: usize) -> usize {
        if self.is_artificial(e) {
            let v = e - self.real();
            if self.supply(v) >= 0. { self.root() } else { v }
        } else {
            self.n() + e % self.m()
        }
    }
    /// Cost per unit of flow along the arc.
    pub fn cost(&self, e: usize) -> Cost {
        if self.is_artificial(e) {
            self.artificial
        } else {
            let (i, j) = self.endpoints(e);
            self.costs.get(i, j)
        }
    }
    /// Reduced cost c(e) + π(tail) − π(head) under the tree's potentials.
    /// Offsets are differenced apart from the rest, so arcs inside one
    /// root subtree are priced at the scale of their own costs.
    pub fn reduced(&self, e: usize, tree: &Tree) -> Cost {
        let (t, h) = (self.tail(e), self.head(e));
        (tree.offset(t) - tree.offset(h)) + (self.cost(e) + tree.local(t) - tree.local(h))
    }
    /// How far below zero a reduced cost must fall before its sign is
    /// trusted: relative to the arc's own cost and the potentials it reads.
    pub fn tolerance(&self, e: usize, tree: &Tree) -> Cost {
        let (t, h) = (self.tail(e), self.head(e));
        SIMPLEX_EPSILON
            * self
                .cost(e)
                .abs()
                .max(tree.magnitude(t))
                .max(tree.magnitude(h))
    }
    /// Reduced cost recomputed as the signed cost of the cycle `e` closes
    /// in the tree, with the total |cost| along that cycle.
    ///
    /// Slower than [`Network::reduced`] but never differences two large
    /// potentials: a large arc elsewhere in the tree cannot drown it.
    pub fn cycle(&self, e: usize, tree: &Tree) -> (Cost, Cost) {
        let (t, h) = (self.tail(e), self.head(e));
        let apex = tree.join(t, h);
        let step = |u: usize| match tree.direction(u) {
            Direction::Up => -self.cost(tree.arc(u)),
            Direction::Down => self.cost(tree.arc(u)),
        };
        let real = |u: &usize| !self.is_artificial(tree.arc(*u));
        let mut sum = self.cost(e);
        let mut size = sum.abs();
        for u in tree.path(t, apex).filter(real) {
            sum += step(u);
            size += step(u).abs();
        }
        for u in tree.path(h, apex).filter(real) {
            sum -= step(u);
            size += step(u).abs();
        }
        ((tree.offset(t) - tree.offset(h)) + sum, size)
    }
}
