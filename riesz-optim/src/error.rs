use thiserror::Error;

/// Invalid configuration, detected once at construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("unknown Krylov type {0:?}")]
    UnknownKrylov(String),
    #[error("unknown secant type {0:?}")]
    UnknownSecant(String),
    #[error("Krylov type is \"User Defined\" but no Krylov solver was supplied")]
    UserDefinedKrylov,
    #[error("secant type is \"User Defined\" but no secant was supplied")]
    UserDefinedSecant,
    #[error("{name} must be non-negative and finite, got {value}")]
    InvalidTolerance { name: &'static str, value: f64 },
    #[error("{name} must be at least 1")]
    InvalidIterationLimit { name: &'static str },
    #[error("secant storage must be at least 1")]
    InvalidStorage,
    #[error("Barzilai-Borwein type must be 1 or 2, got {0}")]
    InvalidBarzilaiBorweinType(u8),
}

/// Misuse of a step's life cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StepError {
    #[error("step used before initialize")]
    NotInitialized,
}
