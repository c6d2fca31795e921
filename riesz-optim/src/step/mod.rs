//! Optimization steps.
//!
//! A [`Step`] turns the current iterate into a trial step (`compute`) and then
//! commits it (`update`), refreshing the [`AlgorithmState`]. The driver in
//! [`crate::algorithm`] calls `initialize` once, then alternates `compute`
//! and `update` and collects the `print` output.

pub mod newton_krylov;

use riesz::{Float, Vector};

use crate::bounds::BoundConstraint;
use crate::error::StepError;
use crate::objective::Objective;
use crate::state::AlgorithmState;

pub use newton_krylov::{HessianOperator, NewtonKrylovStep, RieszPreconditioner};

pub trait Step<F: Float, V: Vector<F>> {
    /// Prepare per-step state at `x`.
    ///
    /// `g` must be the gradient at `x`, already evaluated (and counted) by the
    /// caller; `s` is a template for the step vector.
    fn initialize<O, B>(
        &mut self,
        x: &V,
        s: &V,
        g: &V,
        obj: &mut O,
        bnd: &B,
        state: &mut AlgorithmState<F, V>,
    ) where
        O: Objective<F, V> + ?Sized,
        B: BoundConstraint<F, V> + ?Sized;

    /// Write a trial step into `s`.
    fn compute<O, B>(
        &mut self,
        s: &mut V,
        x: &V,
        obj: &O,
        bnd: &B,
        state: &AlgorithmState<F, V>,
    ) -> Result<(), StepError>
    where
        O: Objective<F, V> + ?Sized,
        B: BoundConstraint<F, V> + ?Sized;

    /// Apply `s` to `x` and refresh `state`.
    fn update<O, B>(
        &mut self,
        x: &mut V,
        s: &V,
        obj: &mut O,
        bnd: &B,
        state: &mut AlgorithmState<F, V>,
    ) -> Result<(), StepError>
    where
        O: Objective<F, V> + ?Sized,
        B: BoundConstraint<F, V> + ?Sized;

    /// Column headings, preceded by a legend when verbosity is positive.
    fn print_header(&self) -> String;

    /// One-line description of the configured method.
    fn print_name(&self) -> String;

    /// Status line for `state`.
    fn print(&self, state: &AlgorithmState<F, V>, print_header: bool) -> String;
}

/// Format `v` as `d.dddddde±XX`.
pub(crate) fn scientific<F: Float>(v: F) -> String {
    let x = v.to_f64().unwrap_or(f64::NAN);
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let s = format!("{x:.6e}");
    match s.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => s,
    }
}
