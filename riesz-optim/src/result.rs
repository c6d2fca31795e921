use std::fmt;

/// Result of an optimization run.
#[derive(Debug, Clone)]
pub struct AlgorithmOutput<F, V> {
    /// Final iterate.
    pub x: V,
    /// Objective value at the final iterate.
    pub value: F,
    /// Norm of the gradient at the final iterate.
    pub gradient_norm: F,
    /// Norm of the last step (infinite if no step was taken).
    pub step_norm: F,
    /// Number of outer iterations performed.
    pub iterations: usize,
    /// Total number of objective function evaluations.
    pub func_evals: usize,
    /// Total number of gradient evaluations.
    pub grad_evals: usize,
    /// Reason for termination.
    pub termination: TerminationReason,
    /// Status lines produced by the step, one entry per iteration.
    pub history: Vec<String>,
}

/// Why the optimizer stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// Gradient norm fell below tolerance.
    GradientNorm,
    /// Step size fell below tolerance.
    StepSize,
    /// Reached the maximum number of iterations.
    IterationLimit,
    /// Objective value or gradient norm became NaN or infinite.
    NumericalError,
}

impl TerminationReason {
    /// Whether the run stopped because it reached a stationary point.
    pub fn is_converged(self) -> bool {
        matches!(self, TerminationReason::GradientNorm | TerminationReason::StepSize)
    }
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminationReason::GradientNorm => write!(f, "gradient norm below tolerance"),
            TerminationReason::StepSize => write!(f, "step size below tolerance"),
            TerminationReason::IterationLimit => write!(f, "iteration limit reached"),
            TerminationReason::NumericalError => write!(f, "numerical error"),
        }
    }
}
