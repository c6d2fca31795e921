//! Inexact Newton step computed by a Krylov solver.
//!
//! Each step solves `∇²f(x)·s = ∇f(x)` approximately with the configured
//! Krylov method and negates the result. Hessian-vector products come from
//! [`Objective::hess_vec`]; the preconditioner is either the objective's own
//! [`Objective::precond`] or, when enabled, a secant approximation fed with the
//! curvature pairs produced by the iteration itself.
//!
//! If the solver meets negative curvature before completing a single inner
//! iteration, there is no usable Newton information and the step falls back
//! to steepest descent, `s = −∇f(x)` mapped into the primal space.

use riesz::{Float, LinearOperator, Vector};

use super::{scientific, Step};
use crate::bounds::BoundConstraint;
use crate::config::{KrylovKind, NewtonKrylovConfig, SecantKind};
use crate::error::{ConfigError, StepError};
use crate::krylov::{krylov_factory, Krylov, KrylovFlag};
use crate::objective::Objective;
use crate::secant::{secant_factory, Secant};
use crate::state::{AlgorithmState, StepState};

/// `∇²f(x)` as a linear operator, for a fixed `x`.
pub struct HessianOperator<'a, O: ?Sized, V> {
    objective: &'a O,
    x: &'a V,
}

impl<'a, O: ?Sized, V> HessianOperator<'a, O, V> {
    pub fn new(objective: &'a O, x: &'a V) -> Self {
        HessianOperator { objective, x }
    }
}

impl<F, V, O> LinearOperator<F, V> for HessianOperator<'_, O, V>
where
    F: Float,
    V: Vector<F>,
    O: Objective<F, V> + ?Sized,
{
    fn apply(&self, hv: &mut V, v: &V, tol: &mut F) {
        self.objective.hess_vec(hv, v, self.x, tol);
    }
}

/// Preconditioner built from [`Objective::precond`].
///
/// `apply` is the Riesz map; `apply_inverse` delegates to the objective.
pub struct RieszPreconditioner<'a, O: ?Sized, V> {
    objective: &'a O,
    x: &'a V,
}

impl<'a, O: ?Sized, V> RieszPreconditioner<'a, O, V> {
    pub fn new(objective: &'a O, x: &'a V) -> Self {
        RieszPreconditioner { objective, x }
    }
}

impl<F, V, O> LinearOperator<F, V> for RieszPreconditioner<'_, O, V>
where
    F: Float,
    V: Vector<F>,
    O: Objective<F, V> + ?Sized,
{
    fn apply(&self, hv: &mut V, v: &V, _tol: &mut F) {
        hv.set(&v.dual());
    }

    fn apply_inverse(&self, hv: &mut V, v: &V, tol: &mut F) {
        self.objective.precond(hv, v, self.x, tol);
    }
}

/// Newton-Krylov step.
///
/// # Example
///
/// ```
/// use riesz_optim::{NewtonKrylovConfig, NewtonKrylovStep};
///
/// let config = NewtonKrylovConfig::<f64>::default();
/// let step = NewtonKrylovStep::<f64, Vec<f64>>::new(&config).unwrap();
/// assert!(!step.uses_secant_preconditioner());
/// ```
pub struct NewtonKrylovStep<F, V> {
    krylov: Box<dyn Krylov<F, V>>,
    secant: Option<Box<dyn Secant<F, V>>>,
    krylov_kind: KrylovKind,
    secant_kind: SecantKind,
    /// Gradient before the last update, kept only for secant preconditioning.
    gp: Option<V>,
    state: Option<StepState<V>>,
    iter_krylov: usize,
    flag_krylov: KrylovFlag,
    verbosity: u32,
    use_secant_precond: bool,
}

impl<F: Float, V: Vector<F> + 'static> NewtonKrylovStep<F, V> {
    /// Build the Krylov solver, and the secant when it is used as
    /// preconditioner, from `config`.
    pub fn new(config: &NewtonKrylovConfig<F>) -> Result<Self, ConfigError> {
        Self::with_components(config, None, None)
    }

    /// Use caller-supplied solver and secant.
    ///
    /// Supplied components are reported as "User Defined". A missing Krylov
    /// solver is built from `config`; a missing secant is built only when
    /// `config.secant.use_as_preconditioner` is set. Only the sections of
    /// `config` that are built from are validated.
    pub fn with_components(
        config: &NewtonKrylovConfig<F>,
        krylov: Option<Box<dyn Krylov<F, V>>>,
        secant: Option<Box<dyn Secant<F, V>>>,
    ) -> Result<Self, ConfigError> {
        let use_secant_precond = config.secant.use_as_preconditioner;

        let (secant, secant_kind) = match secant {
            Some(secant) => (Some(secant), SecantKind::UserDefined),
            None if use_secant_precond => (
                Some(secant_factory(&config.secant)?),
                config.secant.kind,
            ),
            None => (None, config.secant.kind),
        };

        let (krylov, krylov_kind) = match krylov {
            Some(krylov) => (krylov, KrylovKind::UserDefined),
            None => (krylov_factory(&config.krylov)?, config.krylov.kind),
        };

        Ok(NewtonKrylovStep {
            krylov,
            secant,
            krylov_kind,
            secant_kind,
            gp: None,
            state: None,
            iter_krylov: 0,
            flag_krylov: KrylovFlag::Converged,
            verbosity: config.print_verbosity,
            use_secant_precond,
        })
    }
}

impl<F: Float, V: Vector<F>> NewtonKrylovStep<F, V> {
    /// Inner iterations of the most recent Krylov solve.
    pub fn krylov_iterations(&self) -> usize {
        self.iter_krylov
    }

    /// Termination flag of the most recent Krylov solve.
    pub fn krylov_flag(&self) -> KrylovFlag {
        self.flag_krylov
    }

    pub fn uses_secant_preconditioner(&self) -> bool {
        self.use_secant_precond
    }

    pub fn krylov_kind(&self) -> KrylovKind {
        self.krylov_kind
    }

    pub fn secant_kind(&self) -> SecantKind {
        self.secant_kind
    }

    /// Gradient and last step, once initialized.
    pub fn step_state(&self) -> Option<&StepState<V>> {
        self.state.as_ref()
    }

    pub fn secant(&self) -> Option<&dyn Secant<F, V>> {
        self.secant.as_deref()
    }
}

impl<F: Float, V: Vector<F>> Step<F, V> for NewtonKrylovStep<F, V> {
    fn initialize<O, B>(
        &mut self,
        _x: &V,
        s: &V,
        g: &V,
        _obj: &mut O,
        _bnd: &B,
        _state: &mut AlgorithmState<F, V>,
    ) where
        O: Objective<F, V> + ?Sized,
        B: BoundConstraint<F, V> + ?Sized,
    {
        self.state = Some(StepState {
            gradient_vec: g.clone(),
            descent_vec: s.clone(),
        });
        self.gp = self.use_secant_precond.then(|| g.clone());
        self.iter_krylov = 0;
        self.flag_krylov = KrylovFlag::Converged;
    }

    fn compute<O, B>(
        &mut self,
        s: &mut V,
        _x: &V,
        obj: &O,
        _bnd: &B,
        state: &AlgorithmState<F, V>,
    ) -> Result<(), StepError>
    where
        O: Objective<F, V> + ?Sized,
        B: BoundConstraint<F, V> + ?Sized,
    {
        let step_state = self.state.as_ref().ok_or(StepError::NotInitialized)?;

        let hessian = HessianOperator::new(obj, &state.iterate_vec);
        let riesz_map = RieszPreconditioner::new(obj, &state.iterate_vec);
        let precond: &dyn LinearOperator<F, V> = match self.secant.as_deref() {
            Some(secant) if self.use_secant_precond => secant,
            _ => &riesz_map,
        };

        self.flag_krylov = KrylovFlag::Converged;
        let outcome = self
            .krylov
            .run(s, &hessian, &step_state.gradient_vec, precond);
        self.iter_krylov = outcome.iterations;
        self.flag_krylov = outcome.flag;
        log::debug!(
            "Krylov solve at iteration {}: {} inner iterations, {}",
            state.iter,
            outcome.iterations,
            outcome.flag
        );

        if outcome.flag == KrylovFlag::NegativeCurvature && outcome.iterations <= 1 {
            log::debug!("negative curvature on the first Krylov iteration, using steepest descent");
            s.set(&step_state.gradient_vec.dual());
        }
        s.scale(-F::one());
        Ok(())
    }

    /// Take the step, then evaluate value and gradient at the new iterate.
    ///
    /// Both evaluations are counted, so `#fval` grows by one per iteration
    /// alongside `#grad`.
    fn update<O, B>(
        &mut self,
        x: &mut V,
        s: &V,
        obj: &mut O,
        _bnd: &B,
        state: &mut AlgorithmState<F, V>,
    ) -> Result<(), StepError>
    where
        O: Objective<F, V> + ?Sized,
        B: BoundConstraint<F, V> + ?Sized,
    {
        let step_state = self.state.as_mut().ok_or(StepError::NotInitialized)?;
        let tol = F::sqrt_epsilon();

        state.iter += 1;
        x.plus(s);
        step_state.descent_vec.set(s);
        state.snorm = s.norm();

        if let Some(gp) = self.gp.as_mut() {
            gp.set(&step_state.gradient_vec);
        }
        obj.update(x, true, state.iter);
        let mut ftol = tol;
        state.value = obj.value(x, &mut ftol);
        state.nfval += 1;
        let mut gtol = tol;
        obj.gradient(&mut step_state.gradient_vec, x, &mut gtol);
        state.ngrad += 1;

        if self.use_secant_precond {
            if let (Some(secant), Some(gp)) = (self.secant.as_mut(), self.gp.as_ref()) {
                secant.update_storage(
                    x,
                    &step_state.gradient_vec,
                    gp,
                    s,
                    state.snorm,
                    state.iter + 1,
                );
            }
        }

        state.iterate_vec.set(x);
        state.gnorm = step_state.gradient_vec.norm();
        Ok(())
    }

    fn print_header(&self) -> String {
        let mut hist = String::new();
        if self.verbosity > 0 {
            let rule = "-".repeat(109);
            hist.push_str(&rule);
            hist.push('\n');
            hist.push_str("Newton-Krylov status output definitions\n\n");
            hist.push_str("  iter     - Number of iterates (steps taken) \n");
            hist.push_str("  value    - Objective function value \n");
            hist.push_str("  gnorm    - Norm of the gradient\n");
            hist.push_str("  snorm    - Norm of the step (update to optimization vector)\n");
            hist.push_str(
                "  #fval    - Cumulative number of times the objective function was evaluated\n",
            );
            hist.push_str("  #grad    - Number of times the gradient was computed\n");
            hist.push_str(
                "  iterCG   - Number of Krylov iterations used to compute search direction\n",
            );
            hist.push_str("  flagCG   - Krylov solver flag\n");
            hist.push_str(&rule);
            hist.push('\n');
        }
        hist.push_str(&format!(
            "  {:<6}{:<15}{:<15}{:<15}{:<10}{:<10}{:<10}{:<10}\n",
            "iter", "value", "gnorm", "snorm", "#fval", "#grad", "iterCG", "flagCG"
        ));
        hist
    }

    fn print_name(&self) -> String {
        let mut name = format!("\nNewton-Krylov using {}", self.krylov_kind);
        if self.use_secant_precond {
            name.push_str(&format!(" with {} preconditioning", self.secant_kind));
        }
        name.push('\n');
        name
    }

    fn print(&self, state: &AlgorithmState<F, V>, print_header: bool) -> String {
        let mut hist = String::new();
        if state.iter == 0 {
            hist.push_str(&self.print_name());
        }
        if print_header {
            hist.push_str(&self.print_header());
        }
        if state.iter == 0 {
            hist.push_str(&format!(
                "  {:<6}{:<15}{:<15}\n",
                state.iter,
                scientific(state.value),
                scientific(state.gnorm)
            ));
        } else {
            hist.push_str(&format!(
                "  {:<6}{:<15}{:<15}{:<15}{:<10}{:<10}{:<10}{:<10}\n",
                state.iter,
                scientific(state.value),
                scientific(state.gnorm),
                scientific(state.snorm),
                state.nfval,
                state.ngrad,
                self.iter_krylov,
                self.flag_krylov.code()
            ));
        }
        hist
    }
}
