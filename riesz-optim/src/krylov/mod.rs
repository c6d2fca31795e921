//! Krylov solvers for the Newton system.
//!
//! A [`Krylov`] solver approximately solves `A·x = b` for a dual-space `b`,
//! applying a preconditioner's [`apply_inverse`](LinearOperator::apply_inverse)
//! once per inner iteration. It stops once the residual drops below
//! `min(absolute, relative·‖b‖)`, on an iteration limit, on negative
//! curvature, or on numerical breakdown.

pub mod cg;
pub mod cr;

use std::fmt;

use riesz::{Float, LinearOperator, Vector};

use crate::config::{KrylovConfig, KrylovKind};
use crate::error::ConfigError;

pub use cg::ConjugateGradients;
pub use cr::ConjugateResiduals;

/// Why a Krylov solve stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KrylovFlag {
    /// Residual fell below tolerance.
    #[default]
    Converged,
    /// Reached the iteration limit.
    IterationLimit,
    /// Found a direction with `dᵀAd ≤ 0`.
    NegativeCurvature,
    /// A recurrence coefficient was non-finite or a preconditioner was not
    /// positive definite.
    Breakdown,
}

impl KrylovFlag {
    /// Integer code as printed in status output.
    ///
    /// `2` is negative curvature; steps test for it.
    pub fn code(self) -> i32 {
        match self {
            KrylovFlag::Converged => 0,
            KrylovFlag::IterationLimit => 1,
            KrylovFlag::NegativeCurvature => 2,
            KrylovFlag::Breakdown => 3,
        }
    }
}

impl fmt::Display for KrylovFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KrylovFlag::Converged => write!(f, "converged"),
            KrylovFlag::IterationLimit => write!(f, "iteration limit reached"),
            KrylovFlag::NegativeCurvature => write!(f, "negative curvature detected"),
            KrylovFlag::Breakdown => write!(f, "numerical breakdown"),
        }
    }
}

/// Iteration count and termination flag of a single solve.
///
/// A solve that stops inside inner iteration `k` (counting from zero) reports
/// `k + 1` iterations; one that hits the limit reports the limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KrylovOutcome {
    pub iterations: usize,
    pub flag: KrylovFlag,
}

/// Iterative solver for `A·x = b`.
pub trait Krylov<F: Float, V: Vector<F>> {
    /// Solve `a·x ≈ b` preconditioned by `m.apply_inverse`.
    ///
    /// `x` receives the approximate solution; its incoming contents are
    /// discarded. On early negative-curvature termination `x` holds the
    /// partial solution, which may be zero.
    fn run(
        &mut self,
        x: &mut V,
        a: &dyn LinearOperator<F, V>,
        b: &V,
        m: &dyn LinearOperator<F, V>,
    ) -> KrylovOutcome;
}

/// Build the Krylov solver named by `config.kind`.
pub fn krylov_factory<F: Float, V: Vector<F> + 'static>(
    config: &KrylovConfig<F>,
) -> Result<Box<dyn Krylov<F, V>>, ConfigError> {
    config.validate()?;
    match config.kind {
        KrylovKind::ConjugateGradients => Ok(Box::new(ConjugateGradients::from_config(config))),
        KrylovKind::ConjugateResiduals => Ok(Box::new(ConjugateResiduals::from_config(config))),
        KrylovKind::UserDefined => Err(ConfigError::UserDefinedKrylov),
    }
}

/// Residual tolerance `min(absolute, relative·‖b‖)`.
fn stopping_tolerance<F: Float>(absolute: F, relative: F, bnorm: F) -> F {
    absolute.min(relative * bnorm)
}

#[cfg(test)]
pub(crate) mod test_operators {
    use riesz::LinearOperator;

    /// Diagonal operator `diag(d)` acting on `Vec<f64>`, inverse included.
    pub struct Diagonal(pub Vec<f64>);

    impl LinearOperator<f64, Vec<f64>> for Diagonal {
        fn apply(&self, hv: &mut Vec<f64>, v: &Vec<f64>, _tol: &mut f64) {
            for i in 0..v.len() {
                hv[i] = self.0[i] * v[i];
            }
        }

        fn apply_inverse(&self, hv: &mut Vec<f64>, v: &Vec<f64>, _tol: &mut f64) {
            for i in 0..v.len() {
                hv[i] = v[i] / self.0[i];
            }
        }
    }

    /// Dense symmetric operator.
    pub struct Dense(pub Vec<Vec<f64>>);

    impl LinearOperator<f64, Vec<f64>> for Dense {
        fn apply(&self, hv: &mut Vec<f64>, v: &Vec<f64>, _tol: &mut f64) {
            for (h, row) in hv.iter_mut().zip(&self.0) {
                *h = row.iter().zip(v).map(|(a, b)| a * b).sum();
            }
        }
    }

    /// Identity, used as "no preconditioner".
    pub struct Identity;

    impl LinearOperator<f64, Vec<f64>> for Identity {
        fn apply(&self, hv: &mut Vec<f64>, v: &Vec<f64>, _tol: &mut f64) {
            hv.clone_from(v);
        }

        fn apply_inverse(&self, hv: &mut Vec<f64>, v: &Vec<f64>, _tol: &mut f64) {
            hv.clone_from(v);
        }
    }
}
