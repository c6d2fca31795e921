use riesz::{Float, Vector};

use crate::bounds::BoundConstraint;
use crate::error::{ConfigError, StepError};
use crate::objective::Objective;
use crate::result::AlgorithmOutput;
use crate::state::AlgorithmState;
use crate::status::StatusTest;
use crate::step::Step;

/// Outer loop driving a [`Step`] until a [`StatusTest`] stops it.
#[derive(Debug, Clone)]
pub struct Algorithm<F> {
    status: StatusTest<F>,
    print_header: bool,
}

impl<F: Float> Algorithm<F> {
    pub fn new(status: StatusTest<F>) -> Result<Self, ConfigError> {
        status.validate()?;
        Ok(Algorithm {
            status,
            print_header: false,
        })
    }

    /// Repeat the column header on every status line, not only the first.
    pub fn with_header(mut self, print_header: bool) -> Self {
        self.print_header = print_header;
        self
    }

    pub fn status(&self) -> &StatusTest<F> {
        &self.status
    }

    /// Minimize `obj` from `x0`.
    ///
    /// Evaluates the value and gradient at `x0` (one of each), initializes
    /// `step`, then alternates `compute` and `update` until the status test
    /// stops. Every status line is returned in `history` and logged at `info`.
    pub fn run<V, S, O, B>(
        &self,
        step: &mut S,
        x0: &V,
        obj: &mut O,
        bnd: &B,
    ) -> Result<AlgorithmOutput<F, V>, StepError>
    where
        V: Vector<F>,
        S: Step<F, V>,
        O: Objective<F, V> + ?Sized,
        B: BoundConstraint<F, V> + ?Sized,
    {
        if bnd.is_activated() {
            log::warn!("bound constraints are active but the step does not project onto them");
        }

        let mut x = x0.clone();
        let mut state = AlgorithmState::new(&x);
        obj.update(&x, true, 0);
        let mut tol = F::sqrt_epsilon();
        state.value = obj.value(&x, &mut tol);
        state.nfval += 1;
        let mut g = x.dual();
        tol = F::sqrt_epsilon();
        obj.gradient(&mut g, &x, &mut tol);
        state.ngrad += 1;
        state.gnorm = g.norm();

        let mut s = x.clone();
        s.zero();
        step.initialize(&x, &s, &g, obj, bnd, &mut state);

        let mut history = Vec::new();
        record(&mut history, step.print(&state, true));

        let termination = loop {
            if let Some(reason) = self.status.check(&state) {
                break reason;
            }
            step.compute(&mut s, &x, obj, bnd, &state)?;
            step.update(&mut x, &s, obj, bnd, &mut state)?;
            record(&mut history, step.print(&state, self.print_header));
        };
        log::debug!("stopped after {} iterations: {}", state.iter, termination);

        Ok(AlgorithmOutput {
            x,
            value: state.value,
            gradient_norm: state.gnorm,
            step_norm: state.snorm,
            iterations: state.iter,
            func_evals: state.nfval,
            grad_evals: state.ngrad,
            termination,
            history,
        })
    }
}

fn record(history: &mut Vec<String>, entry: String) {
    for line in entry.lines().filter(|l| !l.trim().is_empty()) {
        log::info!("{line}");
    }
    history.push(entry);
}

impl Default for Algorithm<f64> {
    fn default() -> Self {
        Algorithm {
            status: StatusTest::default(),
            print_header: false,
        }
    }
}

impl Default for Algorithm<f32> {
    fn default() -> Self {
        Algorithm {
            status: StatusTest::default(),
            print_header: false,
        }
    }
}
