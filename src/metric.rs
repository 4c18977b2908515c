use super::*;
use rayon::prelude::*;

/// Ground metric between points of the source and target spaces.
///
/// Defines the raw cost of moving one unit of mass from `x` to `y`,
/// before the solver raises it to the power `p`.
pub trait Measure: Sync {
    /// Returns the cost of transporting mass from `x` to `y`.
    fn distance(&self, x: &[f64], y: &[f64]) -> Cost;

    /// N×M matrix of distances between the rows of `x` and the rows of `y`.
    /// Rows are filled in parallel; the result does not depend on scheduling.
    fn pairwise(&self, x: &Matrix, y: &Matrix) -> Matrix {
        let mut costs = Matrix::zeros(x.rows(), y.rows());
        if y.rows() > 0 {
            costs
                .data_mut()
                .par_chunks_mut(y.rows())
                .enumerate()
                .for_each(|(i, row)| {
                    row.iter_mut()
                        .enumerate()
                        .for_each(|(j, c)| *c = self.distance(x.row(i), y.row(j)))
                });
        }
        costs
    }
}

/// Built-in ground metrics over coordinate rows.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Metric {
    /// L2 distance.
    #[default]
    Euclidean,
    /// Squared L2 distance.
    SqEuclidean,
    /// L1 distance.
    Manhattan,
}

impl Measure for Metric {
    fn distance(&self, x: &[f64], y: &[f64]) -> Cost {
        let deltas = x.iter().zip(y.iter()).map(|(a, b)| a - b);
        match self {
            Self::Euclidean => deltas.map(|d| d * d).sum::<Cost>().sqrt(),
            Self::SqEuclidean => deltas.map(|d| d * d).sum::<Cost>(),
            Self::Manhattan => deltas.map(|d| d.abs()).sum::<Cost>(),
        }
    }
}
