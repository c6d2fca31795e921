use riesz::{Float, LinearOperator, Vector};

use super::{scaled_riesz, update_positive_curvature, Secant, SecantState};
use crate::error::ConfigError;

/// Barzilai-Borwein scalar approximation.
///
/// Keeps only the newest pair. Type 1 uses `H = ⟨s, y⟩/⟨y, y⟩`, type 2
/// `H = ⟨s, s⟩/⟨s, y⟩`, each times the Riesz map; `B` is the reciprocal.
#[derive(Debug, Clone)]
pub struct BarzilaiBorwein<F, V> {
    state: SecantState<F, V>,
    kind: u8,
}

impl<F: Float, V: Vector<F>> BarzilaiBorwein<F, V> {
    /// `kind` must be 1 or 2.
    pub fn new(kind: u8) -> Result<Self, ConfigError> {
        if !(1..=2).contains(&kind) {
            return Err(ConfigError::InvalidBarzilaiBorweinType(kind));
        }
        Ok(BarzilaiBorwein {
            state: SecantState::new(1),
            kind,
        })
    }

    /// Current inverse-Hessian scaling, 1 before any pair is stored.
    pub fn step_length(&self) -> F {
        let (Some(s), Some(y), Some(&sy)) = (
            self.state.iter_diff.back(),
            self.state.grad_diff.back(),
            self.state.products.back(),
        ) else {
            return F::one();
        };
        let gamma = match self.kind {
            1 => sy / y.dot(y),
            _ => s.dot(s) / sy,
        };
        if gamma.is_finite() && gamma > F::zero() {
            gamma
        } else {
            F::one()
        }
    }
}

impl<F: Float, V: Vector<F>> Secant<F, V> for BarzilaiBorwein<F, V> {
    fn update_storage(&mut self, x: &V, grad: &V, gp: &V, s: &V, snorm: F, iter: usize) {
        update_positive_curvature(&mut self.state, x, grad, gp, s, snorm, iter);
    }

    fn apply_h(&self, hv: &mut V, v: &V) {
        scaled_riesz(hv, v, self.step_length());
    }

    fn apply_b(&self, bv: &mut V, v: &V) {
        scaled_riesz(bv, v, F::one() / self.step_length());
    }

    fn state(&self) -> &SecantState<F, V> {
        &self.state
    }
}

impl<F: Float, V: Vector<F>> LinearOperator<F, V> for BarzilaiBorwein<F, V> {
    fn apply(&self, hv: &mut V, v: &V, _tol: &mut F) {
        self.apply_b(hv, v);
    }

    fn apply_inverse(&self, hv: &mut V, v: &V, _tol: &mut F) {
        self.apply_h(hv, v);
    }
}
