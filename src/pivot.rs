use super::*;

/// Block-search pricing for the entering arc.
///
/// Scans real arcs cyclically in blocks of roughly √arcs, keeping the
/// most negative reduced cost seen among arcs whose reduced cost clears
/// their own [`Network::tolerance`]. As soon as a block closes with a
/// candidate, that candidate enters and the next scan resumes after it.
/// Ties go to the first arc scanned. A full sweep without a candidate
/// proves optimality.
#[derive(Debug, Clone)]
pub struct BlockSearch {
    block: usize,
    next: usize,
}

impl BlockSearch {
    pub fn new(arcs: usize) -> Self {
        Self {
            block: ((arcs as f64).sqrt().ceil() as usize).max(SIMPLEX_BLOCK),
            next: 0,
        }
    }

    /// Next entering arc, or `None` if no non-basic arc prices in.
    pub fn find(&mut self, network: &Network, tree: &Tree, basis: &[bool]) -> Option<usize> {
        let arcs = network.real();
        let mut best = None;
        let mut min = 0.;
        let mut count = self.block;
        for e in (self.next..arcs).chain(0..self.next) {
            if !basis[e] {
                let reduced = network.reduced(e, tree);
                if reduced < min && reduced < -network.tolerance(e, tree) {
                    min = reduced;
                    best = Some(e);
                }
            }
            count -= 1;
            if count == 0 {
                if let Some(entering) = best {
                    self.next = (e + 1) % arcs;
                    return Some(entering);
                }
                count = self.block;
            }
        }
        if let Some(entering) = best {
            self.next = (entering + 1) % arcs;
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn does_pick_most_negative_in_block() {
        let costs = Matrix::try_from(vec![vec![3., 1.], vec![2., 5.]]).unwrap();
        let ref network = Network::new(&costs, &[0.5, 0.5], &[0.5, 0.5]);
        let tree = Tree::star(network);
        let basis = vec![false; network.arcs()];
        let mut pricing = BlockSearch::new(network.real());
        assert_eq!(pricing.find(network, &tree, &basis), Some(1));
    }

    #[test]
    fn does_skip_basic_arcs() {
        let costs = Matrix::try_from(vec![vec![3., 1.], vec![2., 5.]]).unwrap();
        let ref network = Network::new(&costs, &[0.5, 0.5], &[0.5, 0.5]);
        let tree = Tree::star(network);
        let mut basis = vec![false; network.arcs()];
        basis[1] = true;
        let mut pricing = BlockSearch::new(network.real());
        assert_eq!(pricing.find(network, &tree, &basis), Some(2));
    }

    #[test]
    fn does_report_none_when_priced_out() {
        let costs = Matrix::try_from(vec![vec![3., 1.], vec![2., 5.]]).unwrap();
        let ref network = Network::new(&costs, &[0.5, 0.5], &[0.5, 0.5]);
        let tree = Tree::star(network);
        let basis = vec![true; network.arcs()];
        let mut pricing = BlockSearch::new(network.real());
        assert_eq!(pricing.find(network, &tree, &basis), None);
    }
}
