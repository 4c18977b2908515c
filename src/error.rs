use super::*;

/// Which distribution of a transport problem an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Source,
    Target,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Source => write!(f, "source"),
            Self::Target => write!(f, "target"),
        }
    }
}

/// Precondition violations detected before any graph is built.
///
/// Solver non-convergence is not an error: it surfaces as a
/// non-optimal [`Status`] on the returned [`Solution`].
#[derive(Debug, Clone, PartialEq)]
pub enum TransportError {
    /// A histogram without support points.
    Empty { side: Side },
    /// A matrix whose shape disagrees with its counterpart, as (rows, cols).
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
    /// Source and target points live in spaces of different dimension.
    DimensionMismatch { source: usize, target: usize },
    /// Negative, non-finite or unnormalized masses.
    InvalidWeights(String),
    /// Negative or non-finite ground cost.
    InvalidCost(String),
    /// Cost exponent that is not positive and finite.
    InvalidExponent(Exponent),
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty { side } => write!(f, "empty {} histogram", side),
            Self::ShapeMismatch { expected, found } => write!(
                f,
                "shape mismatch: expected {}x{}, found {}x{}",
                expected.0, expected.1, found.0, found.1
            ),
            Self::DimensionMismatch { source, target } => write!(
                f,
                "dimension mismatch: source is {}-dimensional, target is {}-dimensional",
                source, target
            ),
            Self::InvalidWeights(s) => write!(f, "invalid weights: {}", s),
            Self::InvalidCost(s) => write!(f, "invalid cost: {}", s),
            Self::InvalidExponent(p) => write!(f, "invalid exponent: {}", p),
        }
    }
}

impl std::error::Error for TransportError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn does_display_shape_mismatch() {
        let error = TransportError::ShapeMismatch {
            expected: (2, 3),
            found: (3, 2),
        };
        assert_eq!(error.to_string(), "shape mismatch: expected 2x3, found 3x2");
    }

    #[test]
    fn does_display_empty_side() {
        let error = TransportError::Empty { side: Side::Target };
        assert_eq!(error.to_string(), "empty target histogram");
    }
}
