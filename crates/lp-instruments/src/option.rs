//! The option contract priced on the lattice.
//!
//! A contract fixes everything a pricing call needs: strike, number of
//! periods, step size `v` (so `u = 1 + v`, `d = 1 − v`), initial price,
//! exercise style and option type. The model itself has two structural
//! constants, the per-period up-probability [`UP_PROBABILITY`] and the
//! per-period riskless rate [`RISKLESS_RATE`]; they are not contract fields.

use crate::exercise::ExerciseStyle;
use crate::payoff::{OptionType, PlainVanillaPayoff};
use lp_core::{ensure, errors::Result, DiscountFactor, Price, Probability, Rate, Real, Size};

/// Risk-neutral probability of an up-move in every period.
///
/// With `u = 1 + v`, `d = 1 − v` and a zero rate, `p = 0.5` is exactly the
/// probability that makes the underlying driftless.
pub const UP_PROBABILITY: Probability = 0.5;

/// Per-period riskless rate.
pub const RISKLESS_RATE: Rate = 0.0;

/// Initial underlying price used when none is given.
pub const DEFAULT_SPOT: Price = 1.0;

/// An immutable option contract on a constant-step binomial lattice.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptionContract {
    strike: Price,
    periods: Size,
    step: Real,
    spot: Price,
    style: ExerciseStyle,
    option_type: OptionType,
}

impl OptionContract {
    /// A European call with `S0 = 1`.
    pub fn european(strike: Price, periods: Size, step: Real) -> Result<Self> {
        OptionContractBuilder::new(strike, periods, step).build()
    }

    /// An American call with `S0 = 1`.
    pub fn american(strike: Price, periods: Size, step: Real) -> Result<Self> {
        OptionContractBuilder::new(strike, periods, step)
            .style(ExerciseStyle::American)
            .build()
    }

    /// Start a builder for a call with `S0 = 1` and European exercise.
    pub fn builder(strike: Price, periods: Size, step: Real) -> OptionContractBuilder {
        OptionContractBuilder::new(strike, periods, step)
    }

    /// The same contract with a different step size, re-validated.
    pub fn with_step(&self, step: Real) -> Result<Self> {
        OptionContractBuilder::from(*self).step(step).build()
    }

    /// The same contract with a different exercise style.
    pub fn with_style(&self, style: ExerciseStyle) -> Self {
        Self { style, ..*self }
    }

    // ── Accessors ────────────────────────────────────────────────────────

    /// Strike price `K`.
    pub fn strike(&self) -> Price {
        self.strike
    }

    /// Number of periods `N`.
    pub fn periods(&self) -> Size {
        self.periods
    }

    /// Step size `v`.
    pub fn step(&self) -> Real {
        self.step
    }

    /// Initial underlying price `S0`.
    pub fn spot(&self) -> Price {
        self.spot
    }

    /// Exercise style.
    pub fn style(&self) -> ExerciseStyle {
        self.style
    }

    /// Call or put.
    pub fn option_type(&self) -> OptionType {
        self.option_type
    }

    /// Up factor `u = 1 + v`.
    pub fn up(&self) -> Real {
        1.0 + self.step
    }

    /// Down factor `d = 1 − v`.
    pub fn down(&self) -> Real {
        1.0 - self.step
    }

    /// Per-period discount factor, `1 / (1 + rf)`.
    pub fn discount(&self) -> DiscountFactor {
        1.0 / (1.0 + RISKLESS_RATE)
    }

    /// The contract's payoff.
    pub fn payoff(&self) -> PlainVanillaPayoff {
        PlainVanillaPayoff::new(self.option_type, self.strike)
    }
}

/// Fluent constructor for [`OptionContract`].
///
/// Validation happens in [`build`](Self::build), never silently coercing a
/// bad value.
#[derive(Debug, Clone, Copy)]
pub struct OptionContractBuilder {
    strike: Price,
    periods: Size,
    step: Real,
    spot: Price,
    style: ExerciseStyle,
    option_type: OptionType,
}

impl OptionContractBuilder {
    /// A European call with `S0 = 1`.
    pub fn new(strike: Price, periods: Size, step: Real) -> Self {
        Self {
            strike,
            periods,
            step,
            spot: DEFAULT_SPOT,
            style: ExerciseStyle::European,
            option_type: OptionType::Call,
        }
    }

    /// Set the step size `v`.
    pub fn step(mut self, step: Real) -> Self {
        self.step = step;
        self
    }

    /// Set the initial underlying price.
    pub fn spot(mut self, spot: Price) -> Self {
        self.spot = spot;
        self
    }

    /// Set the exercise style.
    pub fn style(mut self, style: ExerciseStyle) -> Self {
        self.style = style;
        self
    }

    /// Set call or put.
    pub fn option_type(mut self, option_type: OptionType) -> Self {
        self.option_type = option_type;
        self
    }

    /// Validate and build the contract.
    ///
    /// # Errors
    /// [`InvalidParameter`](lp_core::Error::InvalidParameter) unless
    /// `K > 0`, `S0 > 0` and `0 < v < 1`.
    pub fn build(self) -> Result<OptionContract> {
        ensure!(
            self.strike.is_finite() && self.strike > 0.0,
            "strike must be positive, got {}",
            self.strike
        );
        ensure!(
            self.spot.is_finite() && self.spot > 0.0,
            "initial price must be positive, got {}",
            self.spot
        );
        ensure!(
            self.step > 0.0 && self.step < 1.0,
            "step size must lie in (0, 1), got {}",
            self.step
        );
        Ok(OptionContract {
            strike: self.strike,
            periods: self.periods,
            step: self.step,
            spot: self.spot,
            style: self.style,
            option_type: self.option_type,
        })
    }
}

impl From<OptionContract> for OptionContractBuilder {
    fn from(c: OptionContract) -> Self {
        Self {
            strike: c.strike,
            periods: c.periods,
            step: c.step,
            spot: c.spot,
            style: c.style,
            option_type: c.option_type,
        }
    }
}
