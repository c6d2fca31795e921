#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use riesz::{Float, Vector};

use crate::config::check_tolerance;
use crate::error::ConfigError;
use crate::result::TerminationReason;
use crate::state::AlgorithmState;

/// Outer-loop stopping rule.
///
/// The driver keeps iterating while `gnorm > gradient_tolerance`,
/// `snorm > step_tolerance` and `iter < iteration_limit`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        default,
        bound(
            serialize = "F: Serialize",
            deserialize = "F: Deserialize<'de>, StatusTest<F>: Default"
        )
    )
)]
pub struct StatusTest<F> {
    /// Stop when the gradient norm is at most this (default: 1e-6).
    #[cfg_attr(feature = "serde", serde(rename = "Gradient Tolerance"))]
    pub gradient_tolerance: F,
    /// Stop when the step norm is at most this (default: 1e-12).
    #[cfg_attr(feature = "serde", serde(rename = "Step Tolerance"))]
    pub step_tolerance: F,
    /// Maximum number of outer iterations (default: 100).
    #[cfg_attr(feature = "serde", serde(rename = "Iteration Limit"))]
    pub iteration_limit: usize,
}

impl Default for StatusTest<f64> {
    fn default() -> Self {
        StatusTest {
            gradient_tolerance: 1e-6,
            step_tolerance: 1e-12,
            iteration_limit: 100,
        }
    }
}

impl Default for StatusTest<f32> {
    fn default() -> Self {
        StatusTest {
            gradient_tolerance: 1e-4,
            step_tolerance: 1e-6,
            iteration_limit: 100,
        }
    }
}

impl<F: Float> StatusTest<F> {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_tolerance("gradient tolerance", self.gradient_tolerance)?;
        check_tolerance("step tolerance", self.step_tolerance)
    }

    /// Why the run should stop at `state`, or `None` to continue.
    ///
    /// A non-finite value or gradient norm stops the run immediately.
    pub fn check<V: Vector<F>>(&self, state: &AlgorithmState<F, V>) -> Option<TerminationReason> {
        if !(state.value.is_finite() && state.gnorm.is_finite()) {
            return Some(TerminationReason::NumericalError);
        }
        if state.gnorm <= self.gradient_tolerance {
            return Some(TerminationReason::GradientNorm);
        }
        if state.snorm <= self.step_tolerance {
            return Some(TerminationReason::StepSize);
        }
        if state.iter >= self.iteration_limit {
            return Some(TerminationReason::IterationLimit);
        }
        None
    }
}
