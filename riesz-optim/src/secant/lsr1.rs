use riesz::{Float, LinearOperator, Vector};

use super::{gradient_difference, pairing, rank_one_recursion, scaled_riesz, Secant, SecantState};

/// Limited-memory symmetric rank-one update.
///
/// Unlike BFGS and DFP the approximation may be indefinite, so pairs with
/// negative curvature are kept. A pair is dropped when
/// `|⟨y − Bs, s⟩| ≤ 10⁻⁸·‖s‖·‖y − Bs‖`, which also covers pairs the current
/// `B` already satisfies.
#[derive(Debug, Clone)]
pub struct LimitedMemorySr1<F, V> {
    state: SecantState<F, V>,
}

impl<F: Float, V: Vector<F>> LimitedMemorySr1<F, V> {
    pub fn new(storage: usize) -> Self {
        LimitedMemorySr1 {
            state: SecantState::new(storage),
        }
    }
}

impl<F: Float, V: Vector<F>> Secant<F, V> for LimitedMemorySr1<F, V> {
    fn update_storage(&mut self, x: &V, grad: &V, gp: &V, s: &V, snorm: F, iter: usize) {
        self.state.record(x, iter);
        let y = gradient_difference(grad, gp);

        let mut u = y.clone();
        self.apply_b(&mut u, s);
        u.scale(-F::one());
        u.plus(&y);

        let us = pairing(&u, s);
        if us.abs() > F::lit(1e-8) * snorm * u.norm() {
            let sy = pairing(s, &y);
            self.state.push(s.clone(), y, sy);
        } else {
            log::trace!("SR1 pair rejected at iteration {iter}: <y - Bs, s> = {us}");
        }
    }

    fn apply_h(&self, hv: &mut V, v: &V) {
        rank_one_recursion(
            hv,
            v,
            &self.state.grad_diff,
            &self.state.iter_diff,
            |out, q| scaled_riesz(out, q, F::one()),
        );
    }

    fn apply_b(&self, bv: &mut V, v: &V) {
        rank_one_recursion(
            bv,
            v,
            &self.state.iter_diff,
            &self.state.grad_diff,
            |out, q| scaled_riesz(out, q, F::one()),
        );
    }

    fn state(&self) -> &SecantState<F, V> {
        &self.state
    }
}

impl<F: Float, V: Vector<F>> LinearOperator<F, V> for LimitedMemorySr1<F, V> {
    fn apply(&self, hv: &mut V, v: &V, _tol: &mut F) {
        self.apply_b(hv, v);
    }

    fn apply_inverse(&self, hv: &mut V, v: &V, _tol: &mut F) {
        self.apply_h(hv, v);
    }
}
