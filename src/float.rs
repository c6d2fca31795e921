use std::fmt::{Debug, Display};

use num_traits::{Float as NumFloat, FloatConst, FromPrimitive};

/// Marker trait for the scalar field of a vector space (`f32`, `f64`).
///
/// Bundles the numeric and utility traits needed by vectors, operators and
/// the solvers built on top of them.
pub trait Float:
    NumFloat + FloatConst + FromPrimitive + Copy + Send + Sync + Default + Debug + Display + 'static
{
    /// Square root of machine epsilon.
    ///
    /// Default accuracy requested from derivative oracles and operator
    /// applications when nothing better is known.
    fn sqrt_epsilon() -> Self {
        Self::epsilon().sqrt()
    }

    /// Convert an `f64` constant into this type.
    fn lit(v: f64) -> Self {
        Self::from_f64(v).unwrap_or_else(Self::nan)
    }
}

impl Float for f32 {}
impl Float for f64 {}
