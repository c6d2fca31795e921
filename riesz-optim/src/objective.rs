use riesz::{Float, Vector};

/// Trait for optimization objectives.
///
/// Gradients and Hessian-vector products live in the dual space of `V`;
/// iterates and directions live in the primal space.
///
/// The oracles take `&self`: during a Krylov solve the Hessian and the
/// preconditioner both view the same objective at once. Objectives that cache
/// or count evaluations do so through interior mutability. Every `tol` is
/// in/out: the caller passes the requested accuracy and an inexact oracle may
/// overwrite it with the accuracy it achieved.
pub trait Objective<F: Float, V: Vector<F>> {
    /// Notify the objective that the iterate moved to `x`.
    ///
    /// `flag` is true when `x` is an accepted iterate; `iter` is the outer
    /// iteration that produced it.
    fn update(&mut self, x: &V, flag: bool, iter: usize) {
        let _ = (x, flag, iter);
    }

    /// Evaluate `f(x)`.
    fn value(&self, x: &V, tol: &mut F) -> F;

    /// Compute `g ← ∇f(x)`.
    fn gradient(&self, g: &mut V, x: &V, tol: &mut F);

    /// Compute `hv ← ∇²f(x)·v`.
    ///
    /// Default implementation differences the gradient along `v` with step
    /// `h = max(1, ‖x‖/‖v‖)·tol`. It does not call [`update`](Objective::update)
    /// at the perturbed point, so objectives whose gradient depends on state
    /// refreshed by `update` should override it.
    fn hess_vec(&self, hv: &mut V, v: &V, x: &V, tol: &mut F) {
        let vnorm = v.norm();
        if vnorm == F::zero() {
            hv.zero();
            return;
        }
        let h = F::one().max(x.norm() / vnorm) * *tol;

        let requested = *tol;
        let mut g = hv.clone();
        let mut gtol = requested;
        self.gradient(&mut g, x, &mut gtol);

        let mut xh = x.clone();
        xh.axpy(h, v);
        let mut htol = requested;
        self.gradient(hv, &xh, &mut htol);
        *tol = gtol.max(htol);

        hv.axpy(-F::one(), &g);
        hv.scale(F::one() / h);
    }

    /// Compute `pv ← P(x)⁻¹·v` for a dual-space `v`.
    ///
    /// Default implementation applies the Riesz map, i.e. no preconditioning.
    fn precond(&self, pv: &mut V, v: &V, x: &V, tol: &mut F) {
        let _ = (x, tol);
        pv.set(&v.dual());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// f(x) = x0^2 * x1 + x1^3, gradient only.
    struct Cubic;

    impl Objective<f64, Vec<f64>> for Cubic {
        fn value(&self, x: &Vec<f64>, _tol: &mut f64) -> f64 {
            x[0] * x[0] * x[1] + x[1] * x[1] * x[1]
        }

        fn gradient(&self, g: &mut Vec<f64>, x: &Vec<f64>, _tol: &mut f64) {
            g[0] = 2.0 * x[0] * x[1];
            g[1] = x[0] * x[0] + 3.0 * x[1] * x[1];
        }
    }

    #[test]
    fn finite_difference_hess_vec() {
        let x = vec![1.0, 2.0];
        let v = vec![0.5, -1.0];
        let mut hv = vec![0.0; 2];
        let mut tol = f64::EPSILON.sqrt();
        Cubic.hess_vec(&mut hv, &v, &x, &mut tol);

        // H = [[2 x1, 2 x0], [2 x0, 6 x1]] = [[4, 2], [2, 12]]
        assert!((hv[0] - 0.0).abs() < 1e-6, "hv[0] = {}", hv[0]);
        assert!((hv[1] + 11.0).abs() < 1e-6, "hv[1] = {}", hv[1]);
    }

    /// Gradient of f(x) = ½‖x‖² that records the accuracy it is asked for
    /// and reports a worse one back.
    struct Sloppy {
        requested: std::cell::RefCell<Vec<f64>>,
    }

    impl Objective<f64, Vec<f64>> for Sloppy {
        fn value(&self, x: &Vec<f64>, _tol: &mut f64) -> f64 {
            0.5 * x.dot(x)
        }

        fn gradient(&self, g: &mut Vec<f64>, x: &Vec<f64>, tol: &mut f64) {
            self.requested.borrow_mut().push(*tol);
            g.clone_from(x);
            *tol = 1.0;
        }
    }

    #[test]
    fn hess_vec_requests_same_accuracy_for_both_gradients() {
        let obj = Sloppy {
            requested: std::cell::RefCell::new(Vec::new()),
        };
        let mut hv = vec![0.0; 2];
        let mut tol = 1e-7;
        obj.hess_vec(&mut hv, &vec![1.0, 2.0], &vec![0.5, 0.5], &mut tol);
        assert_eq!(*obj.requested.borrow(), vec![1e-7, 1e-7]);
        assert_eq!(tol, 1.0);
        assert!((hv[0] - 1.0).abs() < 1e-6 && (hv[1] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn hess_vec_of_zero_direction_is_zero() {
        let mut hv = vec![7.0, 7.0];
        let mut tol = 1e-8;
        Cubic.hess_vec(&mut hv, &vec![0.0, 0.0], &vec![1.0, 1.0], &mut tol);
        assert_eq!(hv, vec![0.0, 0.0]);
    }

    #[test]
    fn default_precond_is_riesz_map() {
        let mut pv = vec![0.0; 2];
        let mut tol = 1e-8;
        Cubic.precond(&mut pv, &vec![3.0, -4.0], &vec![0.0, 0.0], &mut tol);
        assert_eq!(pv, vec![3.0, -4.0]);
    }
}
