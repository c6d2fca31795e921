use crate::float::Float;

/// An element of a primal or dual vector space.
///
/// Implementors own their storage; `Clone` produces an independent vector in
/// the same space. Arithmetic never changes which space a vector belongs to.
/// [`dual`](Vector::dual) returns the Riesz representation in the opposite
/// space, so gradients (dual) can be turned into directions (primal) and back.
pub trait Vector<F: Float>: Clone {
    /// Number of components.
    fn dimension(&self) -> usize;

    /// Overwrite `self` with `other`.
    fn set(&mut self, other: &Self) {
        self.clone_from(other);
    }

    /// `self ← self + other`.
    fn plus(&mut self, other: &Self) {
        self.axpy(F::one(), other);
    }

    /// `self ← self + alpha * x`.
    fn axpy(&mut self, alpha: F, x: &Self);

    /// `self ← alpha * self`.
    fn scale(&mut self, alpha: F);

    /// Set every component to zero.
    fn zero(&mut self);

    /// Inner product of two vectors of the same space.
    fn dot(&self, other: &Self) -> F;

    /// Norm induced by [`dot`](Vector::dot).
    fn norm(&self) -> F {
        self.dot(self).sqrt()
    }

    /// Riesz map into the opposite space.
    ///
    /// The default treats the space as Euclidean, where the map is the identity.
    fn dual(&self) -> Self {
        self.clone()
    }
}

/// Compute the dot product of two slices.
pub fn dot<F: Float>(a: &[F], b: &[F]) -> F {
    debug_assert_eq!(a.len(), b.len());
    let mut s = F::zero();
    for i in 0..a.len() {
        s = s + a[i] * b[i];
    }
    s
}

/// Compute the L2 norm of a slice.
pub fn norm<F: Float>(v: &[F]) -> F {
    let mut s = F::zero();
    for &x in v {
        s = s + x * x;
    }
    s.sqrt()
}

pub(crate) fn axpy_slice<F: Float>(y: &mut [F], alpha: F, x: &[F]) {
    debug_assert_eq!(y.len(), x.len());
    for (yi, &xi) in y.iter_mut().zip(x) {
        *yi = *yi + alpha * xi;
    }
}

impl<F: Float> Vector<F> for Vec<F> {
    fn dimension(&self) -> usize {
        self.len()
    }

    fn axpy(&mut self, alpha: F, x: &Self) {
        axpy_slice(self, alpha, x);
    }

    fn scale(&mut self, alpha: F) {
        for v in self.iter_mut() {
            *v = alpha * *v;
        }
    }

    fn zero(&mut self) {
        self.fill(F::zero());
    }

    fn dot(&self, other: &Self) -> F {
        dot(self, other)
    }

    fn norm(&self) -> F {
        norm(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_axpy_and_scale() {
        let mut y = vec![1.0, 2.0, 3.0];
        y.axpy(2.0, &vec![1.0, 0.0, -1.0]);
        assert_eq!(y, vec![3.0, 2.0, 1.0]);
        y.scale(-1.0);
        assert_eq!(y, vec![-3.0, -2.0, -1.0]);
        y.zero();
        assert_eq!(y, vec![0.0; 3]);
    }

    #[test]
    fn vec_dot_and_norm() {
        let a = vec![3.0_f64, 4.0];
        assert_eq!(a.dot(&vec![1.0, 1.0]), 7.0);
        assert_eq!(Vector::norm(&a), 5.0);
    }

    #[test]
    fn vec_dual_is_identity() {
        let a = vec![1.5_f64, -2.0];
        assert_eq!(a.dual(), a);
    }

    #[test]
    fn set_and_plus() {
        let mut a = vec![0.0_f64; 2];
        a.set(&vec![1.0, 2.0]);
        a.plus(&vec![1.0, 1.0]);
        assert_eq!(a, vec![2.0, 3.0]);
    }
}
