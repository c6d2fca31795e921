//! Typed configuration for the Newton-Krylov step.
//!
//! Option names follow the canonical parameter names (`"Krylov"` / `"Type"`,
//! `"Secant"` / `"Use as Preconditioner"`, ...) so that, with the `serde`
//! feature, a configuration file reads the same as the parameter list it
//! replaces. Missing fields take their defaults.

use std::fmt;
use std::str::FromStr;

use riesz::Float;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Lowercase and strip everything but letters and digits.
fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Krylov method used to solve the Newton system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum KrylovKind {
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "Conjugate Gradients"))]
    ConjugateGradients,
    #[cfg_attr(feature = "serde", serde(rename = "Conjugate Residuals"))]
    ConjugateResiduals,
    /// Supplied by the caller; never built by the factory.
    #[cfg_attr(feature = "serde", serde(rename = "User Defined"))]
    UserDefined,
}

impl KrylovKind {
    /// Canonical name.
    pub fn name(self) -> &'static str {
        match self {
            KrylovKind::ConjugateGradients => "Conjugate Gradients",
            KrylovKind::ConjugateResiduals => "Conjugate Residuals",
            KrylovKind::UserDefined => "User Defined",
        }
    }
}

impl fmt::Display for KrylovKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KrylovKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "conjugategradients" => Ok(KrylovKind::ConjugateGradients),
            "conjugateresiduals" => Ok(KrylovKind::ConjugateResiduals),
            "userdefined" => Ok(KrylovKind::UserDefined),
            _ => Err(ConfigError::UnknownKrylov(s.to_string())),
        }
    }
}

/// Secant (quasi-Newton) approximation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SecantKind {
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "Limited-Memory BFGS"))]
    LimitedMemoryBfgs,
    #[cfg_attr(feature = "serde", serde(rename = "Limited-Memory DFP"))]
    LimitedMemoryDfp,
    #[cfg_attr(feature = "serde", serde(rename = "Limited-Memory SR1"))]
    LimitedMemorySr1,
    #[cfg_attr(feature = "serde", serde(rename = "Barzilai-Borwein"))]
    BarzilaiBorwein,
    /// Supplied by the caller; never built by the factory.
    #[cfg_attr(feature = "serde", serde(rename = "User Defined"))]
    UserDefined,
}

impl SecantKind {
    /// Canonical name.
    pub fn name(self) -> &'static str {
        match self {
            SecantKind::LimitedMemoryBfgs => "Limited-Memory BFGS",
            SecantKind::LimitedMemoryDfp => "Limited-Memory DFP",
            SecantKind::LimitedMemorySr1 => "Limited-Memory SR1",
            SecantKind::BarzilaiBorwein => "Barzilai-Borwein",
            SecantKind::UserDefined => "User Defined",
        }
    }
}

impl fmt::Display for SecantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SecantKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "limitedmemorybfgs" => Ok(SecantKind::LimitedMemoryBfgs),
            "limitedmemorydfp" => Ok(SecantKind::LimitedMemoryDfp),
            "limitedmemorysr1" => Ok(SecantKind::LimitedMemorySr1),
            "barzilaiborwein" => Ok(SecantKind::BarzilaiBorwein),
            "userdefined" => Ok(SecantKind::UserDefined),
            _ => Err(ConfigError::UnknownSecant(s.to_string())),
        }
    }
}

/// Krylov solver options.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        default,
        bound(
            serialize = "F: Serialize",
            deserialize = "F: Deserialize<'de>, KrylovConfig<F>: Default"
        )
    )
)]
pub struct KrylovConfig<F> {
    /// Krylov method (default: Conjugate Gradients).
    #[cfg_attr(feature = "serde", serde(rename = "Type"))]
    pub kind: KrylovKind,
    /// Absolute residual tolerance (default: 1e-4).
    #[cfg_attr(feature = "serde", serde(rename = "Absolute Tolerance"))]
    pub absolute_tolerance: F,
    /// Residual tolerance relative to the right-hand side (default: 1e-2).
    #[cfg_attr(feature = "serde", serde(rename = "Relative Tolerance"))]
    pub relative_tolerance: F,
    /// Maximum number of inner iterations (default: 20).
    #[cfg_attr(feature = "serde", serde(rename = "Iteration Limit"))]
    pub iteration_limit: usize,
}

impl Default for KrylovConfig<f64> {
    fn default() -> Self {
        KrylovConfig {
            kind: KrylovKind::ConjugateGradients,
            absolute_tolerance: 1e-4,
            relative_tolerance: 1e-2,
            iteration_limit: 20,
        }
    }
}

impl Default for KrylovConfig<f32> {
    fn default() -> Self {
        KrylovConfig {
            kind: KrylovKind::ConjugateGradients,
            absolute_tolerance: 1e-4,
            relative_tolerance: 1e-2,
            iteration_limit: 20,
        }
    }
}

impl<F: Float> KrylovConfig<F> {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_tolerance("Krylov absolute tolerance", self.absolute_tolerance)?;
        check_tolerance("Krylov relative tolerance", self.relative_tolerance)?;
        if self.iteration_limit == 0 {
            return Err(ConfigError::InvalidIterationLimit {
                name: "Krylov iteration limit",
            });
        }
        Ok(())
    }
}

/// Secant options.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SecantConfig {
    /// Secant variant (default: Limited-Memory BFGS).
    #[cfg_attr(feature = "serde", serde(rename = "Type"))]
    pub kind: SecantKind,
    /// Precondition the Krylov solve with the secant approximation (default: false).
    #[cfg_attr(feature = "serde", serde(rename = "Use as Preconditioner"))]
    pub use_as_preconditioner: bool,
    /// Number of curvature pairs kept (default: 10).
    #[cfg_attr(feature = "serde", serde(rename = "Maximum Storage"))]
    pub max_storage: usize,
    /// Barzilai-Borwein step-length formula, 1 or 2 (default: 1).
    #[cfg_attr(feature = "serde", serde(rename = "Barzilai-Borwein Type"))]
    pub barzilai_borwein_type: u8,
}

impl Default for SecantConfig {
    fn default() -> Self {
        SecantConfig {
            kind: SecantKind::LimitedMemoryBfgs,
            use_as_preconditioner: false,
            max_storage: 10,
            barzilai_borwein_type: 1,
        }
    }
}

impl SecantConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_storage == 0 {
            return Err(ConfigError::InvalidStorage);
        }
        if !matches!(self.barzilai_borwein_type, 1 | 2) {
            return Err(ConfigError::InvalidBarzilaiBorweinType(
                self.barzilai_borwein_type,
            ));
        }
        Ok(())
    }
}

/// Configuration for [`NewtonKrylovStep`](crate::NewtonKrylovStep).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        default,
        bound(
            serialize = "F: Serialize",
            deserialize = "F: Deserialize<'de>, NewtonKrylovConfig<F>: Default, \
                           KrylovConfig<F>: Default"
        )
    )
)]
pub struct NewtonKrylovConfig<F> {
    /// 0 prints the compact status line only; above 0 adds a column legend (default: 0).
    #[cfg_attr(feature = "serde", serde(rename = "Print Verbosity"))]
    pub print_verbosity: u32,
    /// Krylov solver options.
    #[cfg_attr(feature = "serde", serde(rename = "Krylov"))]
    pub krylov: KrylovConfig<F>,
    /// Secant options.
    #[cfg_attr(feature = "serde", serde(rename = "Secant"))]
    pub secant: SecantConfig,
}

impl Default for NewtonKrylovConfig<f64> {
    fn default() -> Self {
        NewtonKrylovConfig {
            print_verbosity: 0,
            krylov: KrylovConfig::default(),
            secant: SecantConfig::default(),
        }
    }
}

impl Default for NewtonKrylovConfig<f32> {
    fn default() -> Self {
        NewtonKrylovConfig {
            print_verbosity: 0,
            krylov: KrylovConfig::default(),
            secant: SecantConfig::default(),
        }
    }
}

impl<F: Float> NewtonKrylovConfig<F> {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.krylov.validate()?;
        self.secant.validate()
    }
}

pub(crate) fn check_tolerance<F: Float>(name: &'static str, value: F) -> Result<(), ConfigError> {
    if value.is_finite() && value >= F::zero() {
        Ok(())
    } else {
        Err(ConfigError::InvalidTolerance {
            name,
            value: value.to_f64().unwrap_or(f64::NAN),
        })
    }
}
