//! Vector spaces with Riesz maps and linear operators.
//!
//! The building blocks for matrix-free optimization: a [`Vector`] trait that
//! knows its dual representation, a [`LinearOperator`] trait for Hessians and
//! preconditioners, and concrete vectors (`Vec<F>`, [`ScaledVector`], and
//! feature-gated adapters for nalgebra, ndarray, faer and rayon).

pub mod float;
pub mod operator;
pub mod scaled;
pub mod vector;

#[cfg(feature = "faer")]
pub mod faer_support;
#[cfg(feature = "nalgebra")]
pub mod nalgebra_support;
#[cfg(feature = "ndarray")]
pub mod ndarray_support;
#[cfg(feature = "parallel")]
pub mod parallel;

pub use float::Float;
pub use operator::LinearOperator;
pub use scaled::{ScaledVector, Space};
pub use vector::{dot, norm, Vector};

#[cfg(feature = "parallel")]
pub use parallel::ParVector;
