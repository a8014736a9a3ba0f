//! Safeguarded Newton-Raphson root search on a bracketing interval.

use tracing::trace;

use crate::error::{Result, VtcError};

use super::residual::Residual;
use super::{DEFAULT_ABS_TOL, DEFAULT_MAX_ITERATIONS, DEFAULT_REL_TOL};

/// Relative finite-difference step for the slope estimate.
const FD_STEP: f64 = 1e-7;

/// Configuration for the root solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Maximum iterations after the seed and bracket evaluations.
    pub max_iterations: usize,
    /// Absolute residual tolerance.
    pub abs_tol: f64,
    /// Residual tolerance relative to [`Residual::scale`].
    pub rel_tol: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            abs_tol: DEFAULT_ABS_TOL,
            rel_tol: DEFAULT_REL_TOL,
        }
    }
}

impl SolverConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum iteration count.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the absolute residual tolerance.
    pub fn with_abs_tol(mut self, abs_tol: f64) -> Self {
        self.abs_tol = abs_tol;
        self
    }

    /// Set the relative residual tolerance.
    pub fn with_rel_tol(mut self, rel_tol: f64) -> Self {
        self.rel_tol = rel_tol;
        self
    }

    /// Whether residual `r` at a point of magnitude `scale` counts as zero.
    pub fn accepts(&self, r: f64, scale: f64) -> bool {
        r.abs() <= self.abs_tol + self.rel_tol * scale
    }
}

/// A converged root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootSolution {
    /// Location of the root
    pub x: f64,
    /// Residual at `x`
    pub residual: f64,
    /// Iterations used (0 when the seed or a bracket end already satisfied the tolerance)
    pub iterations: usize,
}

/// Newton-Raphson solver with bisection fallback.
///
/// Keeps a sign-change bracket around the root at every step. A Newton step
/// is taken when it lands strictly inside the bracket and shrinks the step
/// fast enough; otherwise the bracket is bisected. Convergence is declared
/// only when the residual satisfies the tolerance. A bracket that collapses
/// to floating-point resolution first is reported as
/// [`VtcError::BracketCollapsed`].
#[derive(Debug, Clone, Default)]
pub struct NewtonRaphson {
    pub config: SolverConfig,
}

impl NewtonRaphson {
    /// Create a new solver with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a solver with the given configuration.
    pub fn with_config(config: SolverConfig) -> Self {
        Self { config }
    }

    fn eval<R: Residual + ?Sized>(&self, f: &R, x: f64) -> Result<f64> {
        let r = f.residual(x);
        if r.is_finite() {
            Ok(r)
        } else {
            Err(VtcError::NonFiniteResidual { x })
        }
    }

    fn accepts<R: Residual + ?Sized>(&self, f: &R, x: f64, r: f64) -> bool {
        self.config.accepts(r, f.scale(x))
    }

    /// One-sided difference quotient, stepping towards the bracket interior.
    fn slope<R: Residual + ?Sized>(&self, f: &R, x: f64, r: f64, high: f64) -> f64 {
        let mut h = FD_STEP * (1.0 + x.abs());
        if x + h > high {
            h = -h;
        }
        (f.residual(x + h) - r) / h
    }

    /// Find a root of `f` inside `bracket`, starting from `guess`.
    pub fn solve<R: Residual + ?Sized>(
        &self,
        f: &R,
        guess: f64,
        bracket: (f64, f64),
    ) -> Result<RootSolution> {
        let (lo, hi) = if bracket.0 <= bracket.1 {
            bracket
        } else {
            (bracket.1, bracket.0)
        };
        if !lo.is_finite() || !hi.is_finite() {
            return Err(VtcError::NonFiniteResidual { x: lo });
        }

        let mut x = if guess.is_finite() {
            guess.clamp(lo, hi)
        } else {
            0.5 * (lo + hi)
        };
        let mut fx = self.eval(f, x)?;
        if self.accepts(f, x, fx) {
            return Ok(RootSolution {
                x,
                residual: fx,
                iterations: 0,
            });
        }

        let f_lo = self.eval(f, lo)?;
        if self.accepts(f, lo, f_lo) {
            return Ok(RootSolution {
                x: lo,
                residual: f_lo,
                iterations: 0,
            });
        }
        let f_hi = self.eval(f, hi)?;
        if self.accepts(f, hi, f_hi) {
            return Ok(RootSolution {
                x: hi,
                residual: f_hi,
                iterations: 0,
            });
        }
        if (f_lo < 0.0) == (f_hi < 0.0) {
            return Err(VtcError::NoSignChange {
                lo,
                hi,
                r_lo: f_lo,
                r_hi: f_hi,
            });
        }

        // Orient the bracket so that f(neg) < 0 < f(pos)
        let (mut neg, mut f_neg, mut pos, mut f_pos) = if f_lo < 0.0 {
            (lo, f_lo, hi, f_hi)
        } else {
            (hi, f_hi, lo, f_lo)
        };
        if fx < 0.0 {
            neg = x;
            f_neg = fx;
        } else {
            pos = x;
            f_pos = fx;
        }

        let mut dx_old = hi - lo;
        let mut dx = dx_old;

        for iter in 1..=self.config.max_iterations {
            let (low, high) = (neg.min(pos), neg.max(pos));
            let slope = self.slope(f, x, fx, high);
            let newton = x - fx / slope;

            let bisect = !slope.is_finite()
                || slope == 0.0
                || newton <= low
                || newton >= high
                || (2.0 * fx).abs() > (dx_old * slope).abs();

            dx_old = dx;
            if bisect {
                dx = 0.5 * (pos - neg);
                x = neg + dx;
            } else {
                dx = fx / slope;
                x = newton;
            }

            fx = self.eval(f, x)?;
            trace!(iter, x, residual = fx, bisect, "root search step");

            if self.accepts(f, x, fx) {
                return Ok(RootSolution {
                    x,
                    residual: fx,
                    iterations: iter,
                });
            }

            if fx < 0.0 {
                neg = x;
                f_neg = fx;
            } else {
                pos = x;
                f_pos = fx;
            }

            let resolution = 4.0 * f64::EPSILON * neg.abs().max(pos.abs()).max(1.0);
            if (pos - neg).abs() <= resolution {
                let (x, residual) = if f_neg.abs() <= f_pos.abs() {
                    (neg, f_neg)
                } else {
                    (pos, f_pos)
                };
                return Err(VtcError::BracketCollapsed {
                    x,
                    residual,
                    iterations: iter,
                });
            }
        }

        Err(VtcError::convergence_failure(
            self.config.max_iterations,
            fx.abs(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_smooth_root() {
        let solver = NewtonRaphson::new();
        let sol = solver.solve(&|x: f64| x * x - 2.0, 1.0, (0.0, 2.0)).unwrap();
        assert_abs_diff_eq!(sol.x, 2.0_f64.sqrt(), epsilon = 1e-9);
        assert!(sol.residual.abs() <= 1e-9);
        assert!(sol.iterations <= 10);
    }

    #[test]
    fn test_decreasing_function() {
        let solver = NewtonRaphson::new();
        let sol = solver.solve(&|x: f64| 1.0 - x.powi(3), 0.2, (0.0, 3.0)).unwrap();
        assert_abs_diff_eq!(sol.x, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_flat_region_falls_back_to_bisection() {
        // Zero slope at the seed; Newton alone would stall
        let f = |x: f64| if x < 1.3 { -1.0 } else { x - 1.3 };
        let sol = NewtonRaphson::new().solve(&f, 0.5, (0.0, 2.0)).unwrap();
        assert_abs_diff_eq!(sol.x, 1.3, epsilon = 1e-9);
    }

    #[test]
    fn test_root_at_bracket_end() {
        let sol = NewtonRaphson::new()
            .solve(&|x: f64| x - 1.8, 0.9, (0.0, 1.8))
            .unwrap();
        assert_eq!(sol.x, 1.8);
        assert_eq!(sol.iterations, 0);
    }

    #[test]
    fn test_step_function_collapses_bracket() {
        // No x satisfies the tolerance; the sign change is located to machine
        // precision but reported as a failure
        let f = |x: f64| if x < 0.7 { -1.0 } else { 1.0 };
        let err = NewtonRaphson::new().solve(&f, 0.5, (0.0, 2.0)).unwrap_err();
        assert!(err.is_convergence_failure());
        match err {
            VtcError::BracketCollapsed { x, residual, .. } => {
                assert_abs_diff_eq!(x, 0.7, epsilon = 1e-12);
                assert_eq!(residual.abs(), 1.0);
            }
            other => panic!("expected a collapsed bracket, got {other:?}"),
        }
    }

    #[test]
    fn test_iteration_cap_reports_failure() {
        let solver = NewtonRaphson::with_config(SolverConfig::new().with_max_iterations(2));
        let f = |x: f64| if x < 0.7 { -1.0 } else { 1.0 };
        let err = solver.solve(&f, 0.5, (0.0, 2.0)).unwrap_err();
        assert!(matches!(
            err,
            VtcError::ConvergenceFailure { iterations: 2, .. }
        ));
    }

    #[test]
    fn test_no_sign_change() {
        let err = NewtonRaphson::new()
            .solve(&|x: f64| x * x + 1.0, 0.0, (-1.0, 1.0))
            .unwrap_err();
        assert!(matches!(err, VtcError::NoSignChange { .. }));
        assert!(err.is_convergence_failure());
    }

    #[test]
    fn test_non_finite_residual() {
        let err = NewtonRaphson::new()
            .solve(&|x: f64| (x - 0.5).ln(), 0.25, (0.0, 1.0))
            .unwrap_err();
        assert!(matches!(err, VtcError::NonFiniteResidual { .. }));
    }

    #[test]
    fn test_relative_tolerance() {
        struct Scaled;
        impl Residual for Scaled {
            fn residual(&self, x: f64) -> f64 {
                1e9 * (x - 0.4)
            }
            fn scale(&self, _x: f64) -> f64 {
                1e9
            }
        }
        let config = SolverConfig::new().with_abs_tol(0.0).with_rel_tol(1e-6);
        let sol = NewtonRaphson::with_config(config)
            .solve(&Scaled, 0.9, (0.0, 1.8))
            .unwrap();
        assert!(sol.residual.abs() <= 1e3);
        assert_abs_diff_eq!(sol.x, 0.4, epsilon = 1e-6);
    }
}
