//! Limited-memory secant approximations of the Hessian.
//!
//! A [`Secant`] keeps the last few curvature pairs `(sᵢ, yᵢ)`, where `sᵢ` is a
//! step (primal) and `yᵢ` the matching change in gradient (dual). From them it
//! applies an approximate Hessian `B` (primal → dual) and its inverse `H`
//! (dual → primal) without forming either. Through [`LinearOperator`], `apply`
//! is `B` and `apply_inverse` is `H`, so a secant can stand in for the Hessian
//! or act as a preconditioner.

pub mod barzilai_borwein;
pub mod lbfgs;
pub mod ldfp;
pub mod lsr1;

use std::collections::VecDeque;

use riesz::{Float, LinearOperator, Vector};

use crate::config::{SecantConfig, SecantKind};
use crate::error::ConfigError;

pub use barzilai_borwein::BarzilaiBorwein;
pub use lbfgs::LimitedMemoryBfgs;
pub use ldfp::LimitedMemoryDfp;
pub use lsr1::LimitedMemorySr1;

/// Curvature pairs held by a secant approximation, oldest first.
#[derive(Debug, Clone)]
pub struct SecantState<F, V> {
    storage: usize,
    iter: usize,
    iterate: Option<V>,
    iter_diff: VecDeque<V>,
    grad_diff: VecDeque<V>,
    products: VecDeque<F>,
}

impl<F: Float, V: Vector<F>> SecantState<F, V> {
    /// Empty state keeping at most `storage` pairs.
    pub fn new(storage: usize) -> Self {
        SecantState {
            storage,
            iter: 0,
            iterate: None,
            iter_diff: VecDeque::with_capacity(storage),
            grad_diff: VecDeque::with_capacity(storage),
            products: VecDeque::with_capacity(storage),
        }
    }

    pub fn storage(&self) -> usize {
        self.storage
    }

    /// Number of stored pairs.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Iteration of the most recent [`Secant::update_storage`] call.
    pub fn iter(&self) -> usize {
        self.iter
    }

    /// Iterate passed to the most recent [`Secant::update_storage`] call.
    pub fn iterate(&self) -> Option<&V> {
        self.iterate.as_ref()
    }

    /// Steps `sᵢ`.
    pub fn iter_diff(&self) -> &VecDeque<V> {
        &self.iter_diff
    }

    /// Gradient differences `yᵢ`.
    pub fn grad_diff(&self) -> &VecDeque<V> {
        &self.grad_diff
    }

    /// Pairings `⟨sᵢ, yᵢ⟩`.
    pub fn products(&self) -> &VecDeque<F> {
        &self.products
    }

    /// Record the iterate and iteration of an update attempt.
    fn record(&mut self, x: &V, iter: usize) {
        match self.iterate.as_mut() {
            Some(it) => it.set(x),
            None => self.iterate = Some(x.clone()),
        }
        self.iter = iter;
    }

    /// Append a pair, evicting the oldest once storage is full.
    fn push(&mut self, s: V, y: V, sy: F) {
        if self.storage == 0 {
            return;
        }
        if self.products.len() == self.storage {
            self.iter_diff.pop_front();
            self.grad_diff.pop_front();
            self.products.pop_front();
        }
        self.iter_diff.push_back(s);
        self.grad_diff.push_back(y);
        self.products.push_back(sy);
    }

    /// Drop every stored pair.
    pub fn clear(&mut self) {
        self.iter_diff.clear();
        self.grad_diff.clear();
        self.products.clear();
    }
}

/// Secant approximation of the Hessian.
pub trait Secant<F: Float, V: Vector<F>>: LinearOperator<F, V> {
    /// Offer the pair `(s, grad − gp)` produced by a step to `x`.
    ///
    /// `grad` is the gradient at `x`, `gp` the gradient before the step and
    /// `snorm = ‖s‖`. Pairs failing the variant's acceptance test are dropped
    /// and leave the stored pairs untouched.
    fn update_storage(&mut self, x: &V, grad: &V, gp: &V, s: &V, snorm: F, iter: usize);

    /// `hv ← H·v` for a dual `v`.
    fn apply_h(&self, hv: &mut V, v: &V);

    /// `bv ← B·v` for a primal `v`.
    fn apply_b(&self, bv: &mut V, v: &V);

    fn state(&self) -> &SecantState<F, V>;
}

/// Build the secant approximation named by `config.kind`.
pub fn secant_factory<F: Float, V: Vector<F> + 'static>(
    config: &SecantConfig,
) -> Result<Box<dyn Secant<F, V>>, ConfigError> {
    config.validate()?;
    match config.kind {
        SecantKind::LimitedMemoryBfgs => Ok(Box::new(LimitedMemoryBfgs::new(config.max_storage))),
        SecantKind::LimitedMemoryDfp => Ok(Box::new(LimitedMemoryDfp::new(config.max_storage))),
        SecantKind::LimitedMemorySr1 => Ok(Box::new(LimitedMemorySr1::new(config.max_storage))),
        SecantKind::BarzilaiBorwein => Ok(Box::new(BarzilaiBorwein::new(
            config.barzilai_borwein_type,
        )?)),
        SecantKind::UserDefined => Err(ConfigError::UserDefinedSecant),
    }
}

/// Duality pairing `⟨a, b⟩` between a vector and one of the opposite space.
pub(crate) fn pairing<F: Float, V: Vector<F>>(a: &V, b: &V) -> F {
    a.dot(&b.dual())
}

/// `y = grad − gp`.
fn gradient_difference<F: Float, V: Vector<F>>(grad: &V, gp: &V) -> V {
    let mut y = grad.clone();
    y.axpy(-F::one(), gp);
    y
}

/// Store `(s, y)` when `⟨s, y⟩ > ε‖s‖²`.
///
/// Shared by every variant whose approximation must stay positive definite.
/// Returns whether the pair was accepted.
fn update_positive_curvature<F: Float, V: Vector<F>>(
    state: &mut SecantState<F, V>,
    x: &V,
    grad: &V,
    gp: &V,
    s: &V,
    snorm: F,
    iter: usize,
) -> bool {
    state.record(x, iter);
    let y = gradient_difference(grad, gp);
    let sy = pairing(s, &y);
    if sy > F::epsilon() * snorm * snorm {
        state.push(s.clone(), y, sy);
        true
    } else {
        log::trace!("secant pair rejected at iteration {iter}: <s, y> = {sy}");
        false
    }
}

/// Riesz map scaled by `gamma`.
fn scaled_riesz<F: Float, V: Vector<F>>(out: &mut V, v: &V, gamma: F) {
    out.set(&v.dual());
    out.scale(gamma);
}

/// Scaling `⟨s, y⟩ / ⟨y, y⟩` of the initial inverse Hessian, from the newest pair.
fn inverse_scaling<F: Float, V: Vector<F>>(state: &SecantState<F, V>) -> F {
    match (state.grad_diff.back(), state.products.back()) {
        (Some(y), Some(&sy)) => {
            let yy = y.dot(y);
            if yy > F::zero() {
                sy / yy
            } else {
                F::one()
            }
        }
        _ => F::one(),
    }
}

/// Two-loop recursion for a product-form inverse update.
///
/// With `first = s`, `second = y` and an `H₀` initial operator this applies
/// the BFGS inverse Hessian; swapping the pair lists and passing `B₀` applies
/// the DFP Hessian.
fn two_loop<F: Float, V: Vector<F>>(
    out: &mut V,
    v: &V,
    first: &VecDeque<V>,
    second: &VecDeque<V>,
    products: &VecDeque<F>,
    initial: impl Fn(&mut V, &V),
) {
    let n = products.len();
    let mut q = v.clone();
    let mut alpha = vec![F::zero(); n];
    for i in (0..n).rev() {
        alpha[i] = pairing(&first[i], &q) / products[i];
        q.axpy(-alpha[i], &second[i]);
    }
    initial(out, &q);
    for i in 0..n {
        let beta = pairing(&second[i], out) / products[i];
        out.axpy(alpha[i] - beta, &first[i]);
    }
}

/// Apply `M₀` followed by the accumulated rank-two corrections.
fn apply_terms<F: Float, V: Vector<F>>(
    out: &mut V,
    v: &V,
    terms: &[(V, V)],
    initial: &impl Fn(&mut V, &V),
) {
    initial(out, v);
    for (a, b) in terms {
        let cb = pairing(b, v);
        let ca = pairing(a, v);
        out.axpy(cb, b);
        out.axpy(-ca, a);
    }
}

/// Direct form of the same update the two-loop recursion inverts.
///
/// `Mᵢ₊₁ = Mᵢ − (Mᵢuᵢ)(Mᵢuᵢ)ᵀ/⟨uᵢ, Mᵢuᵢ⟩ + wᵢwᵢᵀ/⟨uᵢ, wᵢ⟩`. With `u = s`,
/// `w = y` and `B₀` this is the BFGS Hessian; with `u = y`, `w = s` and `H₀`
/// the DFP inverse Hessian. Quadratic in the number of stored pairs.
fn compact_recursion<F: Float, V: Vector<F>>(
    out: &mut V,
    v: &V,
    u: &VecDeque<V>,
    w: &VecDeque<V>,
    products: &VecDeque<F>,
    initial: impl Fn(&mut V, &V),
) {
    let mut terms: Vec<(V, V)> = Vec::with_capacity(products.len());
    for i in 0..products.len() {
        let mut mu = u[i].dual();
        apply_terms(&mut mu, &u[i], &terms, &initial);
        let umu = pairing(&u[i], &mu);
        if !(umu.is_finite() && umu > F::zero()) {
            continue;
        }
        mu.scale(F::one() / umu.sqrt());
        let mut b = w[i].clone();
        b.scale(F::one() / products[i].sqrt());
        terms.push((mu, b));
    }
    apply_terms(out, v, &terms, &initial);
}

/// Symmetric rank-one recursion `Mᵢ₊₁ = Mᵢ + rᵢrᵢᵀ/⟨rᵢ, uᵢ⟩`, `rᵢ = wᵢ − Mᵢuᵢ`.
///
/// Updates whose denominator vanishes are skipped.
fn rank_one_recursion<F: Float, V: Vector<F>>(
    out: &mut V,
    v: &V,
    u: &VecDeque<V>,
    w: &VecDeque<V>,
    initial: impl Fn(&mut V, &V),
) {
    let apply = |out: &mut V, v: &V, terms: &[(V, F)]| {
        initial(out, v);
        for (r, denom) in terms {
            out.axpy(pairing(r, v) / *denom, r);
        }
    };

    let mut terms: Vec<(V, F)> = Vec::with_capacity(u.len());
    for i in 0..u.len() {
        let mut r = u[i].dual();
        apply(&mut r, &u[i], &terms);
        r.scale(-F::one());
        r.plus(&w[i]);
        let denom = pairing(&r, &u[i]);
        if denom == F::zero() || !denom.is_finite() {
            continue;
        }
        terms.push((r, denom));
    }
    apply(out, v, &terms);
}
