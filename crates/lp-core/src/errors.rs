//! Error types for lattice-pricer.
//!
//! A single `thiserror`-derived enum covers every failure the library can
//! report. Parameter checks go through the [`ensure!`](crate::ensure) macro,
//! which returns [`Error::InvalidParameter`]; the root finders in `lp-math`
//! report [`Error::Solver`], which the calibrator turns into
//! [`Error::CalibrationFailure`].

use thiserror::Error;

/// The top-level error type used throughout lattice-pricer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// A contract, lattice or configuration parameter is out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The calibrator could not recover a step size for the target price.
    #[error("calibration failed: {0}")]
    CalibrationFailure(String),

    /// A 1-D root finder did not converge or was given a bad bracket.
    #[error("solver error: {0}")]
    Solver(String),
}

impl Error {
    /// `true` for [`Error::InvalidParameter`].
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, Error::InvalidParameter(_))
    }

    /// `true` for [`Error::CalibrationFailure`].
    pub fn is_calibration_failure(&self) -> bool {
        matches!(self, Error::CalibrationFailure(_))
    }
}

/// Shorthand `Result` type used throughout lattice-pricer.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Returns `Err(Error::InvalidParameter(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use lp_core::{ensure, errors::Error};
/// fn positive(x: f64) -> lp_core::errors::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert_eq!(
///     positive(-1.0),
///     Err(Error::InvalidParameter("x must be positive, got -1".into()))
/// );
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::InvalidParameter(
                format!($($msg)*)
            ));
        }
    };
}
