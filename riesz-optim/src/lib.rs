//! Inexact Newton-Krylov optimization over abstract vector spaces.
//!
//! [`NewtonKrylovStep`] computes steps by solving the Newton system with a
//! [`Krylov`] method, optionally preconditioned by a limited-memory
//! [`Secant`]. [`Algorithm`] drives a step until a [`StatusTest`] is met.
//! Vectors are anything implementing [`riesz::Vector`].

pub mod algorithm;
pub mod bounds;
pub mod config;
pub mod error;
pub mod krylov;
pub mod objective;
pub mod result;
pub mod secant;
pub mod state;
pub mod status;
pub mod step;

pub use algorithm::Algorithm;
pub use bounds::{BoundConstraint, Unconstrained};
pub use config::{KrylovConfig, KrylovKind, NewtonKrylovConfig, SecantConfig, SecantKind};
pub use error::{ConfigError, StepError};
pub use krylov::{
    krylov_factory, ConjugateGradients, ConjugateResiduals, Krylov, KrylovFlag, KrylovOutcome,
};
pub use objective::Objective;
pub use result::{AlgorithmOutput, TerminationReason};
pub use secant::{
    secant_factory, BarzilaiBorwein, LimitedMemoryBfgs, LimitedMemoryDfp, LimitedMemorySr1,
    Secant, SecantState,
};
pub use state::{AlgorithmState, StepState};
pub use status::StatusTest;
pub use step::{HessianOperator, NewtonKrylovStep, RieszPreconditioner, Step};
