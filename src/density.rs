use super::*;

/// A discrete distribution over indexed support points.
///
/// Provides access to the mass at each point and iteration over the
/// support. Transport problems only ever address points by index, so
/// the support is the half-open range `0..n`.
pub trait Density {
    /// Returns the mass at support point `x`, or 0 if outside the support.
    fn density(&self, x: usize) -> Mass;
    /// Iterates over every support index.
    fn support(&self) -> impl Iterator<Item = usize>;

    /// Total mass over the support.
    fn mass(&self) -> Mass {
        self.support().map(|x| self.density(x)).sum()
    }
}

impl Density for [Mass] {
    fn density(&self, x: usize) -> Mass {
        self.get(x).copied().unwrap_or(0.)
    }
    fn support(&self) -> impl Iterator<Item = usize> {
        0..self.len()
    }
}

impl Density for Vec<Mass> {
    fn density(&self, x: usize) -> Mass {
        self.as_slice().density(x)
    }
    fn support(&self) -> impl Iterator<Item = usize> {
        0..self.len()
    }
}
