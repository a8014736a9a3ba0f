//! Operating-point solver.
//!
//! For each input voltage the inverter output settles where the NMOS
//! pull-down current equals the PMOS pull-up current:
//!
//! ```text
//! r(Vout) = Id_n(Vgs = Vin, Vds = Vout) − Id_p(Vsg = Vdd − Vin, Vsd = Vdd − Vout)
//! ```
//!
//! `r` is non-decreasing in Vout, negative (or zero) at Vout = 0 and positive
//! (or zero) at Vout = Vdd, so [0, Vdd] always brackets the operating point.
//! [`NewtonRaphson`] searches that bracket starting from Vdd/2, taking Newton
//! steps where they stay inside the bracket and bisecting otherwise.
//! [`SweepDriver`] repeats the search for every point of a [`SweepRange`].

mod newton;
mod residual;
mod sweep;

pub use newton::{NewtonRaphson, RootSolution, SolverConfig};
pub use residual::{CurrentBalance, Residual};
pub use sweep::{ConvergencePolicy, SweepDriver, SweepRange, MAX_SWEEP_POINTS};

/// Absolute residual tolerance (A).
pub const DEFAULT_ABS_TOL: f64 = 1e-9;

/// Residual tolerance relative to the balanced branch current.
pub const DEFAULT_REL_TOL: f64 = 1e-9;

/// Maximum root-search iterations per sweep point.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Input-voltage step of a sweep (V).
pub const DEFAULT_STEP: f64 = 0.01;
