use riesz::{Float, Vector};

/// Bound constraints on the optimization variable.
///
/// Steps accept a bound constraint for interface uniformity with projected
/// variants. The Newton-Krylov step itself never projects.
pub trait BoundConstraint<F: Float, V: Vector<F>> {
    /// Whether any bound is active.
    fn is_activated(&self) -> bool {
        false
    }
}

/// No bounds at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unconstrained;

impl<F: Float, V: Vector<F>> BoundConstraint<F, V> for Unconstrained {}
