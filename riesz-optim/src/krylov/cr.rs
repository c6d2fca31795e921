use riesz::{Float, LinearOperator, Vector};

use super::{stopping_tolerance, Krylov, KrylovFlag, KrylovOutcome};
use crate::config::KrylovConfig;

/// Preconditioned conjugate residuals.
///
/// Minimizes the preconditioned residual norm over the Krylov space. Needs one
/// operator and one preconditioner application per iteration, like
/// [`ConjugateGradients`](super::ConjugateGradients), plus two extra vectors.
/// Negative curvature is reported when `zᵀAz ≤ 0` for the preconditioned
/// residual `z`.
pub struct ConjugateResiduals<F, V> {
    absolute_tolerance: F,
    relative_tolerance: F,
    iteration_limit: usize,
    work: Option<Workspace<V>>,
}

struct Workspace<V> {
    r: V,
    z: V,
    p: V,
    az: V,
    ap: V,
    map: V,
}

impl<F: Float, V: Vector<F>> ConjugateResiduals<F, V> {
    pub fn new(absolute_tolerance: F, relative_tolerance: F, iteration_limit: usize) -> Self {
        ConjugateResiduals {
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

impl<F: Float, V: Vector<F>> Krylov<F, V> for ConjugateResiduals<F, V> {
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
        // r, az, ap are dual; z, p, map are primal
        let Workspace { r, z, p, az, ap, map } = self.work.get_or_insert_with(|| Workspace {
            r: b.clone(),
            z: x.clone(),
            p: x.clone(),
            az: b.clone(),
            ap: b.clone(),
            map: x.clone(),
        });

        let mut itol = F::sqrt_epsilon();
        r.set(b);
        m.apply_inverse(z, r, &mut itol);
        itol = F::sqrt_epsilon();
        a.apply(az, z, &mut itol);
        let mut rho = z.dot(&az.dual());
        p.set(z);
        ap.set(az);

        for iter in 0..self.iteration_limit {
            if !rho.is_finite() {
                return KrylovOutcome {
                    iterations: iter + 1,
                    flag: KrylovFlag::Breakdown,
                };
            }
            if rho <= F::zero() {
                return KrylovOutcome {
                    iterations: iter + 1,
                    flag: KrylovFlag::NegativeCurvature,
                };
            }

            itol = F::sqrt_epsilon();
            m.apply_inverse(map, ap, &mut itol);
            let denom = map.dot(&ap.dual());
            if !denom.is_finite() || denom <= F::zero() {
                return KrylovOutcome {
                    iterations: iter + 1,
                    flag: KrylovFlag::Breakdown,
                };
            }

            let alpha = rho / denom;
            x.axpy(alpha, p);
            r.axpy(-alpha, ap);
            z.axpy(-alpha, map);
            if r.norm() < rtol {
                return KrylovOutcome {
                    iterations: iter + 1,
                    flag: KrylovFlag::Converged,
                };
            }

            itol = F::sqrt_epsilon();
            a.apply(az, z, &mut itol);
            let rho_new = z.dot(&az.dual());
            let beta = rho_new / rho;
            rho = rho_new;
            p.scale(beta);
            p.plus(z);
            ap.scale(beta);
            ap.plus(az);
        }

        KrylovOutcome {
            iterations: self.iteration_limit,
            flag: KrylovFlag::IterationLimit,
        }
    }
}
