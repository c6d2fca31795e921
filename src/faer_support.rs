//! faer adapters for riesz's vector abstraction.
//!
//! `faer::Col<f64>` is a Euclidean [`Vector`]: its Riesz map is the identity.

use faer::Col;

use crate::vector::Vector;

impl Vector<f64> for Col<f64> {
    fn dimension(&self) -> usize {
        self.nrows()
    }

    fn axpy(&mut self, alpha: f64, x: &Self) {
        debug_assert_eq!(self.nrows(), x.nrows());
        let updated = Col::from_fn(self.nrows(), |i| self[i] + alpha * x[i]);
        *self = updated;
    }

    fn scale(&mut self, alpha: f64) {
        let updated = Col::from_fn(self.nrows(), |i| alpha * self[i]);
        *self = updated;
    }

    fn zero(&mut self) {
        *self = Col::zeros(self.nrows());
    }

    fn dot(&self, other: &Self) -> f64 {
        debug_assert_eq!(self.nrows(), other.nrows());
        (0..self.nrows()).map(|i| self[i] * other[i]).sum()
    }
}
