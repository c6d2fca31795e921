//! Weighted vectors whose Riesz map is not the identity.
//!
//! A primal [`ScaledVector`] uses the inner product `⟨u, v⟩ = Σ wᵢ uᵢ vᵢ`; its
//! dual space uses `Σ uᵢ vᵢ / wᵢ`. The Riesz map multiplies by the weights
//! going primal → dual and divides going dual → primal, so
//! `u.dot(&v.dual())` is the duality pairing between the two spaces.

use std::sync::Arc;

use crate::float::Float;
use crate::vector::{axpy_slice, Vector};

/// Which space a [`ScaledVector`] lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Space {
    /// Iterates and steps.
    Primal,
    /// Gradients and Hessian-vector products.
    Dual,
}

impl Space {
    fn flip(self) -> Self {
        match self {
            Space::Primal => Space::Dual,
            Space::Dual => Space::Primal,
        }
    }
}

/// Dense vector with a diagonal metric.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledVector<F> {
    values: Vec<F>,
    weights: Arc<[F]>,
    space: Space,
}

impl<F: Float> ScaledVector<F> {
    /// Create a primal vector. All weights must be positive.
    pub fn primal(values: Vec<F>, weights: Arc<[F]>) -> Self {
        Self::new(values, weights, Space::Primal)
    }

    /// Create a dual vector. All weights must be positive.
    pub fn dual_space(values: Vec<F>, weights: Arc<[F]>) -> Self {
        Self::new(values, weights, Space::Dual)
    }

    fn new(values: Vec<F>, weights: Arc<[F]>, space: Space) -> Self {
        debug_assert_eq!(values.len(), weights.len());
        debug_assert!(weights.iter().all(|&w| w > F::zero()));
        ScaledVector {
            values,
            weights,
            space,
        }
    }

    /// Raw component values.
    pub fn values(&self) -> &[F] {
        &self.values
    }

    /// Mutable access to the raw component values.
    pub fn values_mut(&mut self) -> &mut [F] {
        &mut self.values
    }

    /// Metric weights, shared between all vectors of the same space pair.
    pub fn weights(&self) -> &Arc<[F]> {
        &self.weights
    }

    /// The space this vector belongs to.
    pub fn space(&self) -> Space {
        self.space
    }
}

impl<F: Float> Vector<F> for ScaledVector<F> {
    fn dimension(&self) -> usize {
        self.values.len()
    }

    fn axpy(&mut self, alpha: F, x: &Self) {
        debug_assert_eq!(self.space, x.space, "axpy across primal and dual spaces");
        axpy_slice(&mut self.values, alpha, &x.values);
    }

    fn scale(&mut self, alpha: F) {
        for v in self.values.iter_mut() {
            *v = alpha * *v;
        }
    }

    fn zero(&mut self) {
        self.values.fill(F::zero());
    }

    fn dot(&self, other: &Self) -> F {
        debug_assert_eq!(self.space, other.space, "dot across primal and dual spaces");
        let mut s = F::zero();
        for ((&a, &b), &w) in self.values.iter().zip(&other.values).zip(self.weights.iter()) {
            s = match self.space {
                Space::Primal => s + w * a * b,
                Space::Dual => s + a * b / w,
            };
        }
        s
    }

    fn dual(&self) -> Self {
        let values = self
            .values
            .iter()
            .zip(self.weights.iter())
            .map(|(&v, &w)| match self.space {
                Space::Primal => v * w,
                Space::Dual => v / w,
            })
            .collect();
        ScaledVector {
            values,
            weights: Arc::clone(&self.weights),
            space: self.space.flip(),
        }
    }
}
