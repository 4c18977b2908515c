use super::*;

/// Orientation of a node's tree arc relative to the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// The arc leaves the node toward its parent.
    Up,
    /// The arc enters the node from its parent.
    Down,
}

/// Spanning-tree basis of a [`Network`], rooted at the artificial root.
///
/// Every non-root node records its parent, the tree arc joining them
/// and that arc's [`Direction`]. Depths make apex search a pair of
/// upward walks; explicit child lists let a pivot relabel only the
/// subtree it moved.
///
/// Node potentials satisfy π(head) = π(tail) + c(e) on every tree arc,
/// with π(root) = 0, so tree arcs have zero reduced cost. Each potential
/// is held in two parts: the `offset` of the root child above the node,
/// which is exactly ± the artificial cost, and a `local` sum of real arc
/// costs below it. Nodes under the same root child share their offset,
/// so differencing their potentials never rounds at the artificial scale.
/// `magnitude` is the largest |local| on the way down from the root child
/// and bounds the rounding carried by `local`.
#[derive(Debug, Clone)]
pub struct Tree {
    root: usize,
    parent: Vec<usize>,
    arc: Vec<usize>,
    direction: Vec<Direction>,
    depth: Vec<usize>,
    children: Vec<Vec<usize>>,
    offset: Vec<Cost>,
    local: Vec<Cost>,
    magnitude: Vec<Cost>,
}

impl Tree {
    /// Initial basis: every node hangs off the root by its artificial arc.
    pub fn star(network: &Network) -> Self {
        let root = network.root();
        let nodes = network.nodes();
        let mut tree = Self {
            root,
            parent: vec![root; nodes],
            arc: vec![usize::MAX; nodes],
            direction: vec![Direction::Up; nodes],
            depth: vec![1; nodes],
            children: vec![Vec::new(); nodes],
            offset: vec![0.; nodes],
            local: vec![0.; nodes],
            magnitude: vec![0.; nodes],
        };
        tree.depth[root] = 0;
        tree.children[root] = (0..root).collect();
        for v in 0..root {
            let e = network.artificial(v);
            tree.arc[v] = e;
            tree.direction[v] = Self::orient(network, e, v);
            tree.offset[v] = match tree.direction[v] {
                Direction::Up => -network.cost(e),
                Direction::Down => network.cost(e),
            };
        }
        tree
    }

    pub fn root(&self) -> usize {
        self.root
    }
    pub fn parent(&self, v: usize) -> usize {
        self.parent[v]
    }
    /// Tree arc joining `v` to its parent.
    pub fn arc(&self, v: usize) -> usize {
        self.arc[v]
    }
    pub fn direction(&self, v: usize) -> Direction {
        self.direction[v]
    }
    pub fn depth(&self, v: usize) -> usize {
        self.depth[v]
    }
    /// Full node potential π(v).
    pub fn potential(&self, v: usize) -> Cost {
        self.offset[v] + self.local[v]
    }
    /// Potential of the root child above `v`; zero for the root.
    pub fn offset(&self, v: usize) -> Cost {
        self.offset[v]
    }
    /// Potential of `v` relative to the root child above it.
    pub fn local(&self, v: usize) -> Cost {
        self.local[v]
    }
    /// Largest |local| between the root child above `v` and `v` itself.
    pub fn magnitude(&self, v: usize) -> Cost {
        self.magnitude[v]
    }

    /// Deepest common ancestor of `u` and `v`.
    pub fn join(&self, mut u: usize, mut v: usize) -> usize {
        while u != v {
            if self.depth[u] >= self.depth[v] {
                u = self.parent[u];
            } else {
                v = self.parent[v];
            }
        }
        u
    }
    /// Nodes from `v` up to, but excluding, its ancestor `apex`.
    pub fn path(&self, v: usize, apex: usize) -> impl Iterator<Item = usize> + '_ {
        std::iter::successors(Some(v), move |&u| Some(self.parent[u]))
            .take_while(move |&u| u != apex)
    }

    /// Swaps one tree arc for another.
    ///
    /// The arc above `leaving` is dropped, which detaches the subtree under
    /// `leaving`. `entering` reattaches it: `inner` is its endpoint inside
    /// that subtree and `outer` its endpoint outside. Parent links on the
    /// path from `inner` up to `leaving` are reversed, then depths and
    /// potentials are recomputed below `inner`.
    pub fn exchange(
        &mut self,
        network: &Network,
        entering: usize,
        inner: usize,
        outer: usize,
        leaving: usize,
    ) {
        let mut node = inner;
        let mut above = outer;
        let mut arc = entering;
        loop {
            let next = self.parent[node];
            let prev = self.arc[node];
            self.detach(node);
            self.parent[node] = above;
            self.arc[node] = arc;
            self.direction[node] = Self::orient(network, arc, node);
            self.children[above].push(node);
            if node == leaving {
                break;
            }
            above = node;
            arc = prev;
            node = next;
        }
        self.relabel(network, inner);
    }

    fn orient(network: &Network, arc: usize, node: usize) -> Direction {
        if network.tail(arc) == node {
            Direction::Up
        } else {
            Direction::Down
        }
    }
    fn detach(&mut self, node: usize) {
        let ref mut siblings = self.children[self.parent[node]];
        if let Some(i) = siblings.iter().position(|&c| c == node) {
            siblings.swap_remove(i);
        }
    }
    fn relabel(&mut self, network: &Network, top: usize) {
        let mut stack = vec![top];
        while let Some(v) = stack.pop() {
            let p = self.parent[v];
            let c = match self.direction[v] {
                Direction::Up => -network.cost(self.arc[v]),
                Direction::Down => network.cost(self.arc[v]),
            };
            self.depth[v] = self.depth[p] + 1;
            if p == self.root {
                self.offset[v] = c;
                self.local[v] = 0.;
                self.magnitude[v] = 0.;
            } else {
                self.offset[v] = self.offset[p];
                self.local[v] = self.local[p] + c;
                self.magnitude[v] = self.magnitude[p].max(self.local[v].abs());
            }
            stack.extend(self.children[v].iter().copied());
        }
    }
}
