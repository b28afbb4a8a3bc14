//! Calibration of the lattice step size to an observed price.
//!
//! Given a strike `K`, a period count `N` and a target price `V`, the
//! calibrator solves `Price(European(K, N, v)) − V = 0` for `v`. The pricing
//! pipeline is a black box to the solver: every evaluation builds a new
//! contract and prices it from scratch, since `v` reshapes the whole
//! lattice.
//!
//! Targets outside the attainable price range are not rejected up front;
//! the solver's own failure is reported as
//! [`CalibrationFailure`](lp_core::Error::CalibrationFailure).

use lp_core::{
    ensure,
    errors::{Error, Result},
    Price, Real, Size,
};
use lp_instruments::{OptionContract, Payoff, DEFAULT_SPOT, UP_PROBABILITY};
use lp_math::solvers1d::{bisection, brent, fd_newton_safe, secant_within, SolverLimits};
use tracing::{debug, info, trace, warn};

use crate::binomial_engine::BinomialLatticeEngine;

/// Largest pricing error accepted from a converged solve.
const RESIDUAL_TOLERANCE: Real = 1e-8;

/// Root finder driving the calibration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolverMethod {
    /// Secant iteration from the initial guess, kept inside
    /// `[lower_bound, upper_bound]`. Falls back to Brent on that bracket
    /// when the iteration fails.
    #[default]
    Secant,
    /// Brent's method on `[lower_bound, upper_bound]`.
    Brent,
    /// Finite-difference Newton with bisection safeguard on the bracket.
    FdNewtonSafe,
    /// Plain bisection on the bracket.
    Bisection,
}

/// Settings for [`Calibrator`].
///
/// # Examples
///
/// ```
/// use lp_pricingengines::{CalibrationConfig, SolverMethod};
///
/// let config = CalibrationConfig::default();
/// assert_eq!(config.initial_guess, 0.1);
///
/// let config = CalibrationConfig::builder()
///     .initial_guess(0.3)
///     .method(SolverMethod::Brent)
///     .build();
/// assert_eq!(config.method, SolverMethod::Brent);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalibrationConfig {
    /// Starting step size for the secant iteration.
    ///
    /// Default: 0.1
    pub initial_guess: Real,

    /// Offset of the secant's second starting point from the initial guess.
    ///
    /// Default: 1e-4
    pub secant_offset: Real,

    /// Solver tolerance.
    ///
    /// Default: 1e-12
    pub accuracy: Real,

    /// Maximum solver iterations.
    ///
    /// Default: 100
    pub max_iterations: u32,

    /// Lower end of the bracket used by the bracketing solvers.
    ///
    /// Default: 1e-8
    pub lower_bound: Real,

    /// Upper end of the bracket used by the bracketing solvers.
    ///
    /// Default: 1 − 1e-8
    pub upper_bound: Real,

    /// Initial underlying price of the calibrated contract.
    ///
    /// Default: 1.0
    pub spot: Price,

    /// Root finder.
    ///
    /// Default: [`SolverMethod::Secant`]
    pub method: SolverMethod,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            initial_guess: 0.1,
            secant_offset: 1e-4,
            accuracy: 1e-12,
            max_iterations: 100,
            lower_bound: 1e-8,
            upper_bound: 1.0 - 1e-8,
            spot: DEFAULT_SPOT,
            method: SolverMethod::Secant,
        }
    }
}

impl CalibrationConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration builder for fluent construction.
    pub fn builder() -> CalibrationConfigBuilder {
        CalibrationConfigBuilder::new()
    }

    /// Check that the configuration describes a usable search.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.initial_guess > 0.0 && self.initial_guess < 1.0,
            "initial guess must lie in (0, 1), got {}",
            self.initial_guess
        );
        ensure!(
            self.secant_offset.is_finite() && self.secant_offset != 0.0,
            "secant offset must be finite and non-zero, got {}",
            self.secant_offset
        );
        ensure!(
            self.accuracy.is_finite() && self.accuracy > 0.0,
            "accuracy must be positive, got {}",
            self.accuracy
        );
        ensure!(self.max_iterations > 0, "max_iterations must be positive");
        ensure!(
            self.lower_bound > 0.0 && self.lower_bound < self.upper_bound && self.upper_bound < 1.0,
            "bracket must satisfy 0 < lower < upper < 1, got [{}, {}]",
            self.lower_bound,
            self.upper_bound
        );
        ensure!(
            self.spot.is_finite() && self.spot > 0.0,
            "initial price must be positive, got {}",
            self.spot
        );
        Ok(())
    }

    fn limits(&self) -> SolverLimits {
        SolverLimits::new(self.accuracy, self.max_iterations)
    }
}

/// Builder for [`CalibrationConfig`].
#[derive(Debug, Clone, Default)]
pub struct CalibrationConfigBuilder {
    config: CalibrationConfig,
}

impl CalibrationConfigBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial guess.
    pub fn initial_guess(mut self, guess: Real) -> Self {
        self.config.initial_guess = guess;
        self
    }

    /// Set the secant's second-point offset.
    pub fn secant_offset(mut self, offset: Real) -> Self {
        self.config.secant_offset = offset;
        self
    }

    /// Set the solver tolerance.
    pub fn accuracy(mut self, accuracy: Real) -> Self {
        self.config.accuracy = accuracy;
        self
    }

    /// Set the iteration cap.
    pub fn max_iterations(mut self, max_iterations: u32) -> Self {
        self.config.max_iterations = max_iterations;
        self
    }

    /// Set the bracket used by the bracketing solvers.
    pub fn bracket(mut self, lower: Real, upper: Real) -> Self {
        self.config.lower_bound = lower;
        self.config.upper_bound = upper;
        self
    }

    /// Set the initial underlying price.
    pub fn spot(mut self, spot: Price) -> Self {
        self.config.spot = spot;
        self
    }

    /// Set the root finder.
    pub fn method(mut self, method: SolverMethod) -> Self {
        self.config.method = method;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> CalibrationConfig {
        self.config
    }
}

/// Recovers the step size that reproduces a target European price.
#[derive(Debug, Clone, Copy, Default)]
pub struct Calibrator {
    config: CalibrationConfig,
    engine: BinomialLatticeEngine,
}

impl Calibrator {
    /// Calibrator with the given settings.
    pub fn new(config: CalibrationConfig) -> Self {
        Self {
            config,
            engine: BinomialLatticeEngine::new(),
        }
    }

    /// The settings in use.
    pub fn config(&self) -> &CalibrationConfig {
        &self.config
    }

    /// Find `v` such that the European call `(strike, periods, v)` is worth
    /// `target`.
    ///
    /// # Errors
    /// * [`InvalidParameter`](Error::InvalidParameter) for a non-positive
    ///   strike, a non-finite target or an unusable configuration.
    /// * [`CalibrationFailure`](Error::CalibrationFailure) when the solver
    ///   does not converge, including when `target` is not attainable.
    pub fn calibrate(&self, strike: Price, periods: Size, target: Price) -> Result<Real> {
        self.config.validate()?;
        ensure!(target.is_finite(), "target price must be finite, got {target}");
        let template = OptionContract::builder(strike, periods, self.config.initial_guess)
            .spot(self.config.spot)
            .build()?;

        let objective = |v: Real| -> Real {
            match template.with_step(v).and_then(|c| self.engine.npv(&c)) {
                Ok(model) => {
                    trace!(step = v, model, target, "calibration objective");
                    model - target
                }
                // Outside the model's domain; the solver stops on non-finite values.
                Err(_) => f64::NAN,
            }
        };

        let limits = self.config.limits();
        let (lo, hi) = (self.config.lower_bound, self.config.upper_bound);
        let solved = match self.config.method {
            SolverMethod::Secant => {
                let x0 = self.config.initial_guess;
                let x1 = x0 + self.config.secant_offset;
                match secant_within(&objective, x0, x1, lo, hi, limits) {
                    Ok(v) if objective(v).abs() <= RESIDUAL_TOLERANCE => Ok(v),
                    first => {
                        debug!(?first, "secant did not converge, retrying with Brent on the bracket");
                        brent(&objective, lo, hi, limits)
                    }
                }
            }
            SolverMethod::Brent => brent(&objective, lo, hi, limits),
            SolverMethod::FdNewtonSafe => fd_newton_safe(&objective, lo, hi, limits),
            SolverMethod::Bisection => bisection(&objective, lo, hi, limits),
        };

        match solved {
            // A step-size stall can end the iteration away from a root.
            Ok(v) if v > 0.0 && v < 1.0 && objective(v).abs() > RESIDUAL_TOLERANCE => {
                warn!(strike, periods, target, step = v, "calibration stalled");
                Err(Error::CalibrationFailure(format!(
                    "solver stalled at step size {v} without reproducing price {target}"
                )))
            }
            Ok(v) if v > 0.0 && v < 1.0 => {
                info!(strike, periods, target, step = v, method = ?self.config.method, "calibrated step size");
                Ok(v)
            }
            Ok(v) => {
                warn!(strike, periods, target, step = v, "calibrated step size out of range");
                Err(Error::CalibrationFailure(format!(
                    "solver returned step size {v} outside (0, 1)"
                )))
            }
            Err(e) => {
                warn!(strike, periods, target, error = %e, "calibration failed");
                Err(Error::CalibrationFailure(format!(
                    "no step size reproduces price {target} for strike {strike} over {periods} periods: {e}"
                )))
            }
        }
    }

    /// Open interval of European prices reachable as `v` ranges over `(0, 1)`.
    ///
    /// As `v → 0` the lattice collapses onto `S0` and the price tends to the
    /// intrinsic value; as `v → 1` only the all-up path keeps a positive
    /// price, `S0 · 2^N`, reached with probability `p^N`. Reported for
    /// diagnostics only; [`calibrate`](Self::calibrate) does not use it.
    pub fn attainable_range(&self, strike: Price, periods: Size) -> Result<(Price, Price)> {
        self.config.validate()?;
        let contract = OptionContract::builder(strike, periods, self.config.initial_guess)
            .spot(self.config.spot)
            .build()?;
        let spot = contract.spot();
        let intrinsic = contract.payoff().value(spot);
        if periods == 0 {
            return Ok((intrinsic, intrinsic));
        }
        // p · u_max = 1, so p^N · (S0 · 2^N − K) = S0 − K · p^N.
        let upper = (spot - strike * UP_PROBABILITY.powf(periods as Real)).max(0.0);
        Ok((intrinsic, upper))
    }
}

/// Calibrate with the default configuration (secant from `v = 0.1`, `S0 = 1`).
pub fn calibrate(strike: Price, periods: Size, target: Price) -> Result<Real> {
    Calibrator::default().calibrate(strike, periods, target)
}
