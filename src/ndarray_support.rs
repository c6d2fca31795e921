//! ndarray adapters for riesz's vector abstraction.
//!
//! `Array1<F>` is a Euclidean [`Vector`]: its Riesz map is the identity.

use ndarray::{Array1, Zip};

use crate::float::Float;
use crate::vector::Vector;

impl<F: Float> Vector<F> for Array1<F> {
    fn dimension(&self) -> usize {
        self.len()
    }

    fn axpy(&mut self, alpha: F, x: &Self) {
        Zip::from(self).and(x).for_each(|y, &xi| *y = *y + alpha * xi);
    }

    fn scale(&mut self, alpha: F) {
        self.mapv_inplace(|v| alpha * v);
    }

    fn zero(&mut self) {
        self.fill(F::zero());
    }

    fn dot(&self, other: &Self) -> F {
        Zip::from(self)
            .and(other)
            .fold(F::zero(), |acc, &a, &b| acc + a * b)
    }
}
