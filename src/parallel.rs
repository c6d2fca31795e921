//! Rayon-backed dense vector.
//!
//! [`ParVector`] behaves like `Vec<F>` as a [`Vector`] but spreads reductions
//! and updates across the rayon thread pool. Worth it only for long vectors;
//! solvers see no difference.

use rayon::prelude::*;

use crate::float::Float;
use crate::vector::Vector;

/// Euclidean vector whose arithmetic runs on the rayon thread pool.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParVector<F>(pub Vec<F>);

impl<F: Float> From<Vec<F>> for ParVector<F> {
    fn from(v: Vec<F>) -> Self {
        ParVector(v)
    }
}

impl<F: Float> Vector<F> for ParVector<F> {
    fn dimension(&self) -> usize {
        self.0.len()
    }

    fn axpy(&mut self, alpha: F, x: &Self) {
        debug_assert_eq!(self.0.len(), x.0.len());
        self.0
            .par_iter_mut()
            .zip(x.0.par_iter())
            .for_each(|(y, &xi)| *y = *y + alpha * xi);
    }

    fn scale(&mut self, alpha: F) {
        self.0.par_iter_mut().for_each(|v| *v = alpha * *v);
    }

    fn zero(&mut self) {
        self.0.par_iter_mut().for_each(|v| *v = F::zero());
    }

    fn dot(&self, other: &Self) -> F {
        debug_assert_eq!(self.0.len(), other.0.len());
        self.0
            .par_iter()
            .zip(other.0.par_iter())
            .map(|(&a, &b)| a * b)
            .reduce(F::zero, |a, b| a + b)
    }
}
