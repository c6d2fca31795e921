use riesz::{Float, Vector};

/// Algorithm state shared by the driver and the step over a whole run.
///
/// Only a step's `update` mutates it. After `update` returns, `iterate_vec`,
/// `value` and the step's gradient all refer to the same point.
#[derive(Debug, Clone)]
pub struct AlgorithmState<F, V> {
    /// Number of steps taken.
    pub iter: usize,
    /// Objective value at `iterate_vec`.
    pub value: F,
    /// Norm of the gradient at `iterate_vec`.
    pub gnorm: F,
    /// Norm of the last step (infinite before the first one).
    pub snorm: F,
    /// Cumulative objective evaluations.
    pub nfval: usize,
    /// Cumulative gradient evaluations.
    pub ngrad: usize,
    /// Current iterate.
    pub iterate_vec: V,
}

impl<F: Float, V: Vector<F>> AlgorithmState<F, V> {
    /// Fresh state at `x` with all counters at zero.
    pub fn new(x: &V) -> Self {
        AlgorithmState {
            iter: 0,
            value: F::zero(),
            gnorm: F::zero(),
            snorm: F::infinity(),
            nfval: 0,
            ngrad: 0,
            iterate_vec: x.clone(),
        }
    }
}

/// Per-step scratch owned by a step instance.
#[derive(Debug, Clone)]
pub struct StepState<V> {
    /// Gradient at the current iterate.
    pub gradient_vec: V,
    /// Most recent step.
    pub descent_vec: V,
}
