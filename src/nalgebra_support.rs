//! nalgebra adapters for riesz's vector abstraction.
//!
//! `DVector<F>` is a Euclidean [`Vector`]: its Riesz map is the identity.

use nalgebra::DVector;

use crate::float::Float;
use crate::vector::Vector;

impl<F: Float> Vector<F> for DVector<F> {
    fn dimension(&self) -> usize {
        self.len()
    }

    fn axpy(&mut self, alpha: F, x: &Self) {
        debug_assert_eq!(self.len(), x.len());
        for (y, &xi) in self.iter_mut().zip(x.iter()) {
            *y = *y + alpha * xi;
        }
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
        debug_assert_eq!(self.len(), other.len());
        self.iter()
            .zip(other.iter())
            .fold(F::zero(), |acc, (&a, &b)| acc + a * b)
    }
}
