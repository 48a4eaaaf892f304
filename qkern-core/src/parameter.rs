//! Gate angles: literal values or late-bound placeholders
//!
//! Kernels in the demos take their rotation angles as call arguments
//! (`sample(kernel, params, shots)`). A circuit is built once with
//! placeholders and bound to concrete values at every execution.

use std::fmt;

/// Identifier of a circuit parameter placeholder
///
/// Placeholders are numbered in creation order; the value bound to
/// `ParamId(i)` is `params[i]` of the slice passed at execution time.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ParamId(usize);

impl ParamId {
    pub(crate) const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of the bound value in the parameter slice
    #[inline]
    pub const fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "θ{}", self.0)
    }
}

/// A gate parameter
///
/// # Example
/// ```
/// use qkern_core::{Angle, CircuitBuilder};
///
/// let mut builder = CircuitBuilder::new();
/// let theta = builder.parameter();
///
/// assert_eq!(Angle::Value(0.5).resolve(&[]), Some(0.5));
/// assert_eq!(theta.resolve(&[1.25]), Some(1.25));
/// assert_eq!(theta.resolve(&[]), None);
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Angle {
    /// A literal angle in radians
    Value(f64),
    /// A placeholder resolved from the execution-time parameter slice
    Param(ParamId),
}

impl Angle {
    /// Resolve the angle against concrete parameter values
    ///
    /// Returns `None` when the placeholder has no bound value.
    #[inline]
    pub fn resolve(&self, params: &[f64]) -> Option<f64> {
        match self {
            Angle::Value(v) => Some(*v),
            Angle::Param(id) => params.get(id.index()).copied(),
        }
    }

    /// The placeholder this angle refers to, if any
    pub fn param(&self) -> Option<ParamId> {
        match self {
            Angle::Value(_) => None,
            Angle::Param(id) => Some(*id),
        }
    }

    /// Whether the angle is a literal
    pub fn is_bound(&self) -> bool {
        matches!(self, Angle::Value(_))
    }
}

impl From<f64> for Angle {
    fn from(value: f64) -> Self {
        Angle::Value(value)
    }
}

impl From<ParamId> for Angle {
    fn from(id: ParamId) -> Self {
        Angle::Param(id)
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Angle::Value(v) => write!(f, "{:.4}", v),
            Angle::Param(id) => write!(f, "{}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_resolves_without_params() {
        let angle = Angle::from(std::f64::consts::PI);
        assert!(angle.is_bound());
        assert_eq!(angle.resolve(&[]), Some(std::f64::consts::PI));
        assert_eq!(angle.param(), None);
    }

    #[test]
    fn test_placeholder_resolves_by_position() {
        let angle = Angle::from(ParamId::new(1));
        assert!(!angle.is_bound());
        assert_eq!(angle.resolve(&[0.1, 0.2]), Some(0.2));
        assert_eq!(angle.resolve(&[0.1]), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Angle::Value(0.5).to_string(), "0.5000");
        assert_eq!(Angle::Param(ParamId::new(2)).to_string(), "θ2");
    }
}
