use riesz::{Float, LinearOperator, Vector};

use super::{
    compact_recursion, inverse_scaling, scaled_riesz, two_loop, update_positive_curvature,
    Secant, SecantState,
};

/// Limited-memory BFGS.
///
/// `H` is applied by the two-loop recursion, `B` by the equivalent direct
/// recursion. Both start from the Riesz map scaled by `⟨s, y⟩ / ⟨y, y⟩` of the
/// newest pair.
#[derive(Debug, Clone)]
pub struct LimitedMemoryBfgs<F, V> {
    state: SecantState<F, V>,
}

impl<F: Float, V: Vector<F>> LimitedMemoryBfgs<F, V> {
    pub fn new(storage: usize) -> Self {
        LimitedMemoryBfgs {
            state: SecantState::new(storage),
        }
    }
}

impl<F: Float, V: Vector<F>> Secant<F, V> for LimitedMemoryBfgs<F, V> {
    fn update_storage(&mut self, x: &V, grad: &V, gp: &V, s: &V, snorm: F, iter: usize) {
        update_positive_curvature(&mut self.state, x, grad, gp, s, snorm, iter);
    }

    fn apply_h(&self, hv: &mut V, v: &V) {
        let gamma = inverse_scaling(&self.state);
        two_loop(
            hv,
            v,
            &self.state.iter_diff,
            &self.state.grad_diff,
            &self.state.products,
            |out, q| scaled_riesz(out, q, gamma),
        );
    }

    fn apply_b(&self, bv: &mut V, v: &V) {
        let gamma = inverse_scaling(&self.state);
        compact_recursion(
            bv,
            v,
            &self.state.iter_diff,
            &self.state.grad_diff,
            &self.state.products,
            |out, q| scaled_riesz(out, q, F::one() / gamma),
        );
    }

    fn state(&self) -> &SecantState<F, V> {
        &self.state
    }
}

impl<F: Float, V: Vector<F>> LinearOperator<F, V> for LimitedMemoryBfgs<F, V> {
    fn apply(&self, hv: &mut V, v: &V, _tol: &mut F) {
        self.apply_b(hv, v);
    }

    fn apply_inverse(&self, hv: &mut V, v: &V, _tol: &mut F) {
        self.apply_h(hv, v);
    }
}
