//! 1D root-finding solvers.
//!
//! Every solver takes the objective as a plain `Fn(Real) -> Real` and treats
//! it as a black box. An objective that cannot be evaluated at a point
//! (for instance because the point lies outside the model's domain) should
//! return `NaN`; the solvers stop with [`Error::Solver`] as soon as they see a
//! non-finite value instead of iterating on garbage.

use lp_core::{
    errors::{Error, Result},
    Real,
};

const DEFAULT_MAX_ITERATIONS: u32 = 100;
const DEFAULT_ACCURACY: Real = 1.0e-11;

/// Iteration and tolerance budget shared by all solvers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverLimits {
    /// Absolute tolerance on `x` (and on `f(x)` for the open methods).
    pub accuracy: Real,
    /// Maximum number of iterations before giving up.
    pub max_iterations: u32,
}

impl Default for SolverLimits {
    fn default() -> Self {
        Self {
            accuracy: DEFAULT_ACCURACY,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolverLimits {
    /// Limits with the given accuracy and iteration cap.
    ///
    /// A non-positive accuracy falls back to the default.
    pub fn new(accuracy: Real, max_iterations: u32) -> Self {
        Self {
            accuracy: if accuracy > 0.0 {
                accuracy
            } else {
                DEFAULT_ACCURACY
            },
            max_iterations,
        }
    }
}

fn evaluate<F>(f: &F, x: Real, solver: &str) -> Result<Real>
where
    F: Fn(Real) -> Real,
{
    let fx = f(x);
    if fx.is_finite() {
        Ok(fx)
    } else {
        Err(Error::Solver(format!(
            "{solver}: objective is not finite at x = {x}"
        )))
    }
}

// ── Secant ────────────────────────────────────────────────────────────────────

/// Secant method whose iterates never leave `[x_min, x_max]`.
///
/// Starts from the two points `x0` and `x1` and needs no bracket, which makes
/// it the natural choice when only an initial guess is known. A step that
/// would land outside the interval is replaced by the midpoint between the
/// last iterate and the violated end, so the objective is only ever
/// evaluated where it is defined. Infinite ends give the plain secant.
pub fn secant_within<F>(
    f: F,
    x0: Real,
    x1: Real,
    x_min: Real,
    x_max: Real,
    limits: SolverLimits,
) -> Result<Real>
where
    F: Fn(Real) -> Real,
{
    if !(x_min <= x0 && x0 <= x_max && x_min <= x1 && x1 <= x_max) {
        return Err(Error::Solver(format!(
            "Secant: starting points {x0}, {x1} outside [{x_min}, {x_max}]"
        )));
    }
    let acc = limits.accuracy;
    let mut x0 = x0;
    let mut x1 = x1;
    let mut f0 = evaluate(&f, x0, "Secant")?;
    let mut f1 = evaluate(&f, x1, "Secant")?;

    if f0.abs() < acc {
        return Ok(x0);
    }
    if f1.abs() < acc {
        return Ok(x1);
    }

    for _ in 0..limits.max_iterations {
        let denom = f1 - f0;
        if denom.abs() < f64::EPSILON {
            return Err(Error::Solver(format!(
                "Secant: flat objective between x = {x0} and x = {x1}"
            )));
        }
        let mut x2 = x1 - f1 * (x1 - x0) / denom;
        if x2 < x_min {
            x2 = 0.5 * (x1 + x_min);
        } else if x2 > x_max {
            x2 = 0.5 * (x1 + x_max);
        }
        let f2 = evaluate(&f, x2, "Secant")?;

        if f2.abs() < acc || (x2 - x1).abs() < acc {
            return Ok(x2);
        }

        x0 = x1;
        f0 = f1;
        x1 = x2;
        f1 = f2;
    }

    Err(Error::Solver(format!(
        "Secant: maximum iterations ({}) reached",
        limits.max_iterations
    )))
}

// ── Brent ─────────────────────────────────────────────────────────────────────

/// Brent's method for finding a root of `f(x)` in `[x_min, x_max]`.
///
/// Combines bisection, secant, and inverse quadratic interpolation.
pub fn brent<F>(f: F, x_min: Real, x_max: Real, limits: SolverLimits) -> Result<Real>
where
    F: Fn(Real) -> Real,
{
    let acc = limits.accuracy;
    let mut a = x_min;
    let mut b = x_max;
    let mut fa = evaluate(&f, a, "Brent")?;
    let mut fb = evaluate(&f, b, "Brent")?;

    if fa * fb > 0.0 {
        return Err(Error::Solver(format!(
            "Brent: f({a}) = {fa} and f({b}) = {fb} must have opposite signs"
        )));
    }
    if fa == 0.0 {
        return Ok(a);
    }
    if fb == 0.0 {
        return Ok(b);
    }

    let mut c = b;
    let mut fc = fb;
    let mut d = b - a;
    let mut e = d;

    for _ in 0..limits.max_iterations {
        if fb * fc > 0.0 {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }
        let tol = 2.0 * f64::EPSILON * b.abs() + 0.5 * acc;
        let xm = 0.5 * (c - b);
        if xm.abs() <= tol || fb == 0.0 {
            return Ok(b);
        }
        if e.abs() >= tol && fa.abs() > fb.abs() {
            let s = fb / fa;
            let (p, q) = if a == c {
                (2.0 * xm * s, 1.0 - s)
            } else {
                let q = fa / fc;
                let r = fb / fc;
                let p = s * (2.0 * xm * q * (q - r) - (b - a) * (r - 1.0));
                let q = (q - 1.0) * (r - 1.0) * (s - 1.0);
                (p, q)
            };
            let (p, q) = if p > 0.0 { (p, -q) } else { (-p, q) };
            if 2.0 * p < (3.0 * xm * q - (tol * q).abs()) && 2.0 * p < (e * q).abs() {
                e = d;
                d = p / q;
            } else {
                d = xm;
                e = d;
            }
        } else {
            d = xm;
            e = d;
        }
        a = b;
        fa = fb;
        b += if d.abs() > tol {
            d
        } else if xm > 0.0 {
            tol
        } else {
            -tol
        };
        fb = evaluate(&f, b, "Brent")?;
    }
    Err(Error::Solver(format!(
        "Brent: maximum iterations ({}) reached",
        limits.max_iterations
    )))
}

// ── Bisection ────────────────────────────────────────────────────────────────

/// Simple bisection method.
pub fn bisection<F>(f: F, x_min: Real, x_max: Real, limits: SolverLimits) -> Result<Real>
where
    F: Fn(Real) -> Real,
{
    let acc = limits.accuracy;
    let mut a = x_min;
    let mut b = x_max;
    let fa = evaluate(&f, a, "Bisection")?;
    let fb = evaluate(&f, b, "Bisection")?;

    if fa * fb > 0.0 {
        return Err(Error::Solver(
            "Bisection: f(x_min) and f(x_max) must have opposite signs".into(),
        ));
    }
    if fa == 0.0 {
        return Ok(a);
    }
    if fb == 0.0 {
        return Ok(b);
    }

    let mut fa = fa;
    for _ in 0..limits.max_iterations {
        let mid = 0.5 * (a + b);
        let fm = evaluate(&f, mid, "Bisection")?;
        if fm == 0.0 || (b - a) * 0.5 < acc {
            return Ok(mid);
        }
        if fm * fa > 0.0 {
            a = mid;
            fa = fm;
        } else {
            b = mid;
        }
    }
    Err(Error::Solver(format!(
        "Bisection: maximum iterations ({}) reached",
        limits.max_iterations
    )))
}

// ── Finite-Difference Newton-Safe ─────────────────────────────────────────────

/// A safe Newton-Raphson method that estimates the derivative via finite
/// differences from the farthest bracket point, falling back to bisection when
/// the Newton step would leave the bracket.
pub fn fd_newton_safe<F>(f: F, x_min: Real, x_max: Real, limits: SolverLimits) -> Result<Real>
where
    F: Fn(Real) -> Real,
{
    let acc = limits.accuracy;
    let flo = evaluate(&f, x_min, "FDNewtonSafe")?;
    let fhi = evaluate(&f, x_max, "FDNewtonSafe")?;

    if flo * fhi > 0.0 {
        return Err(Error::Solver(
            "FDNewtonSafe: f(x_min) and f(x_max) must have opposite signs".into(),
        ));
    }
    if flo == 0.0 {
        return Ok(x_min);
    }
    if fhi == 0.0 {
        return Ok(x_max);
    }

    // Orient so that f(xl) < 0
    let (mut xl, mut xh, mut fl, mut fh) = if flo < 0.0 {
        (x_min, x_max, flo, fhi)
    } else {
        (x_max, x_min, fhi, flo)
    };

    let mut x = 0.5 * (xl + xh);
    let mut dx_old = (xh - xl).abs();
    let mut dx = dx_old;
    let mut fx = evaluate(&f, x, "FDNewtonSafe")?;

    for _ in 0..limits.max_iterations {
        // Slope against the farthest bracket end.
        let (x_far, f_far) = if (x - xl).abs() >= (x - xh).abs() {
            (xl, fl)
        } else {
            (xh, fh)
        };
        let dfx = if (x - x_far).abs() > f64::EPSILON {
            (fx - f_far) / (x - x_far)
        } else {
            0.0
        };

        let (lo, hi) = if xl < xh { (xl, xh) } else { (xh, xl) };
        let newton_x = if dfx.abs() > f64::EPSILON {
            x - fx / dfx
        } else {
            f64::NAN
        };
        let use_newton =
            newton_x > lo && newton_x < hi && (2.0 * fx.abs()) <= (dx_old * dfx).abs();

        dx_old = dx;
        if use_newton {
            dx = fx / dfx;
            x -= dx;
        } else {
            dx = 0.5 * (xh - xl);
            x = xl + dx;
        }

        if dx.abs() < acc {
            return Ok(x);
        }

        fx = evaluate(&f, x, "FDNewtonSafe")?;
        if fx.abs() < acc {
            return Ok(x);
        }

        if fx < 0.0 {
            xl = x;
            fl = fx;
        } else {
            xh = x;
            fh = fx;
        }
    }

    Err(Error::Solver(format!(
        "FDNewtonSafe: maximum iterations ({}) reached",
        limits.max_iterations
    )))
}
