use super::*;

/// A transport plan (coupling) between two discrete distributions.
///
/// In optimal transport theory, a coupling is a joint distribution π(x,y)
/// whose marginals match the source distribution P and target distribution
/// Q. The transport cost is the expected ground cost under this joint
/// distribution.
pub trait Coupling {
    /// Returns the mass transported from source point `x` to target point `y`.
    fn flow(&self, x: usize, y: usize) -> Mass;
    /// Returns the total transport cost of this coupling.
    fn cost(&self) -> Cost;
    /// Returns the total mass moved.
    fn mass(&self) -> Mass;
}
