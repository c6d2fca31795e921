use riesz::{Float, LinearOperator, Vector};

use super::{
    compact_recursion, inverse_scaling, scaled_riesz, two_loop, update_positive_curvature,
    Secant, SecantState,
};

/// Limited-memory DFP.
///
/// The dual of BFGS: the roles of `s` and `y` swap, so `B` comes from the
/// two-loop recursion and `H` from the direct one.
#[derive(Debug, Clone)]
pub struct LimitedMemoryDfp<F, V> {
    state: SecantState<F, V>,
}

impl<F: Float, V: Vector<F>> LimitedMemoryDfp<F, V> {
    pub fn new(storage: usize) -> Self {
        LimitedMemoryDfp {
            state: SecantState::new(storage),
        }
    }
}

impl<F: Float, V: Vector<F>> Secant<F, V> for LimitedMemoryDfp<F, V> {
    fn update_storage(&mut self, x: &V, grad: &V, gp: &V, s: &V, snorm: F, iter: usize) {
        update_positive_curvature(&mut self.state, x, grad, gp, s, snorm, iter);
    }

    fn apply_h(&self, hv: &mut V, v: &V) {
        let gamma = inverse_scaling(&self.state);
        compact_recursion(
            hv,
            v,
            &self.state.grad_diff,
            &self.state.iter_diff,
            &self.state.products,
            |out, q| scaled_riesz(out, q, gamma),
        );
    }

    fn apply_b(&self, bv: &mut V, v: &V) {
        let gamma = inverse_scaling(&self.state);
        two_loop(
            bv,
            v,
            &self.state.grad_diff,
            &self.state.iter_diff,
            &self.state.products,
            |out, q| scaled_riesz(out, q, F::one() / gamma),
        );
    }

    fn state(&self) -> &SecantState<F, V> {
        &self.state
    }
}

impl<F: Float, V: Vector<F>> LinearOperator<F, V> for LimitedMemoryDfp<F, V> {
    fn apply(&self, hv: &mut V, v: &V, _tol: &mut F) {
        self.apply_b(hv, v);
    }

    fn apply_inverse(&self, hv: &mut V, v: &V, _tol: &mut F) {
        self.apply_h(hv, v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secant::test_pairs::{assert_close, norm, quadratic_pairs};

    fn filled() -> LimitedMemoryDfp<f64, Vec<f64>> {
        let mut secant = LimitedMemoryDfp::new(10);
        let zero = vec![0.0; 3];
        for (k, (s, y)) in quadratic_pairs().into_iter().enumerate() {
            secant.update_storage(&zero, &y, &zero, &s, norm(&s), k + 1);
        }
        secant
    }

    #[test]
    fn secant_equations_hold_for_newest_pair() {
        let secant = filled();
        let (s, y) = quadratic_pairs().pop().unwrap();

        let mut hy = vec![0.0; 3];
        secant.apply_h(&mut hy, &y);
        assert_close(&hy, &s, 1e-10);

        let mut bs = vec![0.0; 3];
        secant.apply_b(&mut bs, &s);
        assert_close(&bs, &y, 1e-10);
    }

    #[test]
    fn h_and_b_are_inverse() {
        let secant = filled();
        let v = vec![-0.7, 0.4, 1.1];
        let mut hv = vec![0.0; 3];
        let mut bhv = vec![0.0; 3];
        secant.apply_h(&mut hv, &v);
        secant.apply_b(&mut bhv, &hv);
        assert_close(&bhv, &v, 1e-10);
    }
}
