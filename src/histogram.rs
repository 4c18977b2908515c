use super::*;

/// A weighted point set: N support points in D dimensions with masses.
///
/// Coordinates are stored as an N×D [`Matrix`], one row per point.
/// Masses are expected to be non-negative and to sum to one; that is
/// checked by [`Histogram::validate`] rather than at construction, so
/// callers can build, inspect and normalize before handing it to a
/// [`Solver`].
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Histogram {
    points: Matrix,
    weights: Vec<Mass>,
}

impl Histogram {
    /// Pairs coordinates with masses, one mass per row.
    pub fn new(points: Matrix, weights: Vec<Mass>) -> Result<Self, TransportError> {
        if points.rows() == weights.len() {
            Ok(Self { points, weights })
        } else {
            Err(TransportError::InvalidWeights(format!(
                "{} weights for {} points",
                weights.len(),
                points.rows()
            )))
        }
    }
    /// Equal mass 1/N on every point.
    pub fn uniform(points: Matrix) -> Self {
        let n = points.rows();
        let weights = vec![1. / n as Mass; n];
        Self { points, weights }
    }
    /// One-dimensional histogram over positions on the real line.
    pub fn line(positions: Vec<f64>, weights: Vec<Mass>) -> Result<Self, TransportError> {
        Self::new(Matrix::column(positions), weights)
    }

    /// Number of support points.
    pub fn n(&self) -> usize {
        self.points.rows()
    }
    /// Dimension of the space the points live in.
    pub fn dimension(&self) -> usize {
        self.points.cols()
    }
    pub fn points(&self) -> &Matrix {
        &self.points
    }
    pub fn weights(&self) -> &[Mass] {
        &self.weights
    }

    /// Rescaled copy whose masses sum to one.
    pub fn normalize(&self) -> Self {
        let mass = Density::mass(self);
        Self {
            points: self.points.clone(),
            weights: self.weights.iter().map(|w| w / mass).collect(),
        }
    }
    /// Copy embedded in `dimension` dimensions by appending zero coordinates.
    /// Pairwise distances between embedded points are unchanged.
    pub fn embed(&self, dimension: usize) -> Self {
        Self {
            points: self.points.pad(dimension.saturating_sub(self.dimension())),
            weights: self.weights.clone(),
        }
    }

    /// Checks that the histogram is a probability distribution:
    /// at least one point, finite non-negative masses summing to one.
    pub fn validate(&self, side: Side) -> Result<(), TransportError> {
        if self.n() == 0 {
            return Err(TransportError::Empty { side });
        }
        if let Some(x) = self
            .support()
            .find(|&x| !(self.density(x) >= 0. && self.density(x).is_finite()))
        {
            return Err(TransportError::InvalidWeights(format!(
                "{} weight {} is {}",
                side,
                x,
                self.density(x)
            )));
        }
        let mass = Density::mass(self);
        if (mass - 1.).abs() > WEIGHT_TOLERANCE {
            return Err(TransportError::InvalidWeights(format!(
                "{} weights sum to {}",
                side, mass
            )));
        }
        Ok(())
    }
}

impl Density for Histogram {
    fn density(&self, x: usize) -> Mass {
        self.weights.density(x)
    }
    fn support(&self) -> impl Iterator<Item = usize> {
        0..self.n()
    }
}

impl Arbitrary for Histogram {
    /// Between 1 and 24 random planar points in the unit square.
    fn random() -> Self {
        use rand::Rng;
        let ref mut rng = rand::rng();
        let n = rng.random_range(1..=24);
        let points = (0..n)
            .map(|_| vec![rng.random::<f64>(), rng.random::<f64>()])
            .collect::<Vec<_>>();
        let weights = (0..n)
            .map(|_| rng.random::<f64>() + 0.05)
            .collect::<Vec<_>>();
        Self::new(Matrix::try_from(points).expect("rectangular"), weights)
            .expect("one weight per point")
            .normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_uniform_normalized() {
        let h = Histogram::uniform(Matrix::column(vec![0., 1., 2., 3.]));
        assert!(h.validate(Side::Source).is_ok());
        assert_eq!(h.density(2), 0.25);
    }

    #[test]
    fn is_random_normalized() {
        for _ in 0..32 {
            let h = Histogram::random();
            assert!(h.validate(Side::Source).is_ok());
            assert_eq!(h.dimension(), 2);
        }
    }

    #[test]
    fn does_reject_weight_count() {
        let result = Histogram::line(vec![0., 1.], vec![1.]);
        assert!(matches!(result, Err(TransportError::InvalidWeights(_))));
    }

    #[test]
    fn does_reject_negative_weight() {
        let h = Histogram::line(vec![0., 1., 2.], vec![0.6, 0.6, -0.2]).unwrap();
        assert!(matches!(
            h.validate(Side::Source),
            Err(TransportError::InvalidWeights(_))
        ));
    }

    #[test]
    fn does_reject_unnormalized() {
        let h = Histogram::line(vec![0., 1.], vec![0.5, 0.6]).unwrap();
        assert!(matches!(
            h.validate(Side::Target),
            Err(TransportError::InvalidWeights(_))
        ));
    }

    #[test]
    fn does_reject_empty() {
        let h = Histogram::line(vec![], vec![]).unwrap();
        assert_eq!(
            h.validate(Side::Source),
            Err(TransportError::Empty { side: Side::Source })
        );
    }

    #[test]
    fn does_embed_with_zero_coordinates() {
        let h = Histogram::line(vec![3., 4.], vec![0.5, 0.5]).unwrap();
        let e = h.embed(2);
        assert_eq!(e.dimension(), 2);
        assert_eq!(e.points().row(1), &[4., 0.]);
        assert_eq!(e.weights(), h.weights());
    }
}
