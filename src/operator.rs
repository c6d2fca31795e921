use crate::float::Float;
use crate::vector::Vector;

/// A linear map between a vector space and its dual.
///
/// `tol` is in/out: callers pass the accuracy they need, inexact operators
/// may overwrite it with the accuracy they achieved.
pub trait LinearOperator<F: Float, V: Vector<F>> {
    /// Compute `hv ← A·v`.
    fn apply(&self, hv: &mut V, v: &V, tol: &mut F);

    /// Compute `hv ← A⁻¹·v`.
    ///
    /// Default implementation panics. Only operators used as preconditioners
    /// provide it.
    fn apply_inverse(&self, hv: &mut V, v: &V, tol: &mut F) {
        let _ = (hv, v, tol);
        unimplemented!("apply_inverse not implemented for this operator")
    }
}
