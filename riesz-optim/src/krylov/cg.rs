use riesz::{Float, LinearOperator, Vector};

use super::{stopping_tolerance, Krylov, KrylovFlag, KrylovOutcome};
use crate::config::KrylovConfig;

/// Preconditioned conjugate gradients.
///
/// Stops with [`KrylovFlag::NegativeCurvature`] as soon as a search direction
/// has `pᵀAp ≤ 0`, leaving the partial solution in `x`.
pub struct ConjugateGradients<F, V> {
    absolute_tolerance: F,
    relative_tolerance: F,
    iteration_limit: usize,
    work: Option<Workspace<V>>,
}

struct Workspace<V> {
    /// Residual (dual).
    r: V,
    /// Preconditioned residual (primal).
    v: V,
    /// Search direction (primal).
    p: V,
    /// `A·p` (dual).
    ap: V,
}

impl<F: Float, V: Vector<F>> ConjugateGradients<F, V> {
    pub fn new(absolute_tolerance: F, relative_tolerance: F, iteration_limit: usize) -> Self {
        ConjugateGradients {
            absolute_tolerance,
            relative_tolerance,
            iteration_limit,
            work: None,
        }
    }

    pub fn from_config(config: &KrylovConfig<F>) -> Self {
        Self::new(
            config.absolute_tolerance,
            config.relative_tolerance,
            config.iteration_limit,
        )
    }
}

impl<F: Float, V: Vector<F>> Krylov<F, V> for ConjugateGradients<F, V> {
    fn run(
        &mut self,
        x: &mut V,
        a: &dyn LinearOperator<F, V>,
        b: &V,
        m: &dyn LinearOperator<F, V>,
    ) -> KrylovOutcome {
        x.zero();
        let bnorm = b.norm();
        if bnorm == F::zero() {
            return KrylovOutcome {
                iterations: 0,
                flag: KrylovFlag::Converged,
            };
        }
        if !bnorm.is_finite() {
            return KrylovOutcome {
                iterations: 0,
                flag: KrylovFlag::Breakdown,
            };
        }
        let rtol = stopping_tolerance(self.absolute_tolerance, self.relative_tolerance, bnorm);

        let stale = self
            .work
            .as_ref()
            .is_some_and(|w| w.r.dimension() != b.dimension());
        if stale {
            self.work = None;
        }
        let Workspace { r, v, p, ap } = self.work.get_or_insert_with(|| Workspace {
            r: b.clone(),
            v: x.clone(),
            p: x.clone(),
            ap: b.clone(),
        });

        let mut itol = F::sqrt_epsilon();
        r.set(b);
        m.apply_inverse(v, r, &mut itol);
        p.set(v);
        let mut gv = v.dot(&r.dual());

        for iter in 0..self.iteration_limit {
            itol = F::sqrt_epsilon();
            a.apply(ap, p, &mut itol);
            let kappa = p.dot(&ap.dual());
            if !kappa.is_finite() || !gv.is_finite() || gv <= F::zero() {
                return KrylovOutcome {
                    iterations: iter + 1,
                    flag: KrylovFlag::Breakdown,
                };
            }
            if kappa <= F::zero() {
                return KrylovOutcome {
                    iterations: iter + 1,
                    flag: KrylovFlag::NegativeCurvature,
                };
            }

            let alpha = gv / kappa;
            x.axpy(alpha, p);
            r.axpy(-alpha, ap);
            if r.norm() < rtol {
                return KrylovOutcome {
                    iterations: iter + 1,
                    flag: KrylovFlag::Converged,
                };
            }

            itol = F::sqrt_epsilon();
            m.apply_inverse(v, r, &mut itol);
            let gv_new = v.dot(&r.dual());
            let beta = gv_new / gv;
            gv = gv_new;
            p.scale(beta);
            p.plus(v);
        }

        KrylovOutcome {
            iterations: self.iteration_limit,
            flag: KrylovFlag::IterationLimit,
        }
    }
}
