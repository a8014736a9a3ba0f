//! Input-voltage sweep.

use tracing::{debug, info, warn};

use crate::curve::{OperatingPoint, TransferCurve};
use crate::device::{DeviceConstants, Mosfet};
use crate::error::{Result, VtcError};
use crate::technology::{InverterConfig, MosKind};

use super::newton::{NewtonRaphson, RootSolution, SolverConfig};
use super::residual::CurrentBalance;
use super::DEFAULT_STEP;

/// Slack, in steps, for deciding whether `end` lies on the grid.
const GRID_SNAP: f64 = 1e-6;

/// Upper bound on the number of points in one sweep.
pub const MAX_SWEEP_POINTS: usize = 10_000_000;

/// What to do with a sweep point whose root search fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConvergencePolicy {
    /// Stop the sweep and report the offending input voltage.
    #[default]
    Abort,
    /// Record the point with NaN output and current, then continue.
    MarkUnresolved,
}

/// Evenly spaced input voltages `start, start + step, ...` up to `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepRange {
    pub start: f64,
    pub end: f64,
    pub step: f64,
}

impl SweepRange {
    /// Range with the default 10 mV step.
    pub fn new(start: f64, end: f64) -> Self {
        Self {
            start,
            end,
            step: DEFAULT_STEP,
        }
    }

    /// Range from 0 V to `end`.
    pub fn up_to(end: f64) -> Self {
        Self::new(0.0, end)
    }

    /// Set the step size.
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    /// Check that the range is finite, ordered and has a positive step.
    pub fn validate(&self) -> Result<()> {
        if !self.start.is_finite() || !self.end.is_finite() {
            return Err(VtcError::invalid_parameter(
                "sweep",
                "range",
                format!("bounds must be finite (got {} to {})", self.start, self.end),
            ));
        }
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(VtcError::invalid_parameter(
                "sweep",
                "step",
                format!("must be > 0 (got {})", self.step),
            ));
        }
        if self.end < self.start {
            return Err(VtcError::invalid_parameter(
                "sweep",
                "end",
                format!("must be >= start {} (got {})", self.start, self.end),
            ));
        }
        if self.intervals().is_none() {
            return Err(VtcError::invalid_parameter(
                "sweep",
                "step",
                format!(
                    "{} over [{}, {}] exceeds {} points",
                    self.step, self.start, self.end, MAX_SWEEP_POINTS
                ),
            ));
        }
        Ok(())
    }

    /// Number of whole steps between `start` and the last point, if the
    /// range is valid and within [`MAX_SWEEP_POINTS`].
    fn intervals(&self) -> Option<usize> {
        let n = ((self.end - self.start) / self.step + GRID_SNAP).floor();
        (n >= 0.0 && n < MAX_SWEEP_POINTS as f64).then_some(n as usize)
    }

    /// Number of sweep points, or 0 for a range that fails validation.
    pub fn len(&self) -> usize {
        self.intervals().map_or(0, |n| n + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Input voltage of point `index`, computed from the index rather than
    /// by accumulation and clamped to `end`.
    pub fn value(&self, index: usize) -> f64 {
        (self.start + index as f64 * self.step).min(self.end)
    }

    /// All input voltages in ascending order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.len()).map(move |i| self.value(i))
    }
}

/// Solves the inverter operating point across a range of input voltages.
///
/// Device constants and both threshold voltages are derived once, at
/// construction; every point reuses them read-only and seeds its own root
/// search at Vdd/2, so points can be solved in any order.
#[derive(Debug, Clone)]
pub struct SweepDriver {
    config: InverterConfig,
    nmos: Mosfet,
    pmos: Mosfet,
    solver: NewtonRaphson,
    policy: ConvergencePolicy,
}

impl SweepDriver {
    /// Validate the configuration and precompute both transistors.
    pub fn new(config: InverterConfig, solver: SolverConfig) -> Result<Self> {
        config.validate()?;

        let build = |kind: MosKind| {
            Mosfet::new(
                kind,
                &config.constants,
                *config.technology.params(kind),
                config.geometry(kind),
                config.vsb(kind),
            )
        };
        let nmos = build(MosKind::Nmos)?;
        let pmos = build(MosKind::Pmos)?;

        for m in [&nmos, &pmos] {
            info!(
                device = %m.kind,
                k = m.constants.k,
                cox = m.constants.cox,
                nb = m.constants.nb,
                phi_f = m.constants.phi_f,
                vth = m.vth,
                lambda = m.params.lambda,
                "device constants"
            );
        }

        Ok(Self {
            config,
            nmos,
            pmos,
            solver: NewtonRaphson::with_config(solver),
            policy: ConvergencePolicy::default(),
        })
    }

    /// Set the policy for points that fail to converge.
    pub fn with_policy(mut self, policy: ConvergencePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn config(&self) -> &InverterConfig {
        &self.config
    }

    pub fn policy(&self) -> ConvergencePolicy {
        self.policy
    }

    pub fn solver_config(&self) -> &SolverConfig {
        &self.solver.config
    }

    /// The transistor of the given polarity.
    pub fn device(&self, kind: MosKind) -> &Mosfet {
        match kind {
            MosKind::Nmos => &self.nmos,
            MosKind::Pmos => &self.pmos,
        }
    }

    /// Precomputed constants of the given transistor.
    pub fn device_constants(&self, kind: MosKind) -> &DeviceConstants {
        &self.device(kind).constants
    }

    /// Current-balance residual at input voltage `vin`.
    pub fn residual(&self, vin: f64) -> CurrentBalance<'_> {
        CurrentBalance::new(&self.nmos, &self.pmos, self.config.vdd, vin)
    }

    /// Solve the root search for one input voltage.
    pub fn solve_root(&self, vin: f64) -> Result<RootSolution> {
        let balance = self.residual(vin);
        self.solver
            .solve(&balance, balance.initial_guess(), balance.bracket())
            .map_err(|e| e.at_vin(vin))
    }

    /// Solve one point, failing on non-convergence regardless of policy.
    pub fn solve_point(&self, vin: f64) -> Result<OperatingPoint> {
        let root = self.solve_root(vin)?;
        let balance = self.residual(vin);
        let id = balance.nmos_current(root.x);

        debug!(
            vin,
            vout = root.x,
            id,
            residual = root.residual,
            iterations = root.iterations,
            regions = ?balance.regions(root.x),
            "operating point"
        );

        Ok(OperatingPoint::new(vin, root.x, id))
    }

    /// Solve one point, applying the convergence policy.
    fn resolve(&self, vin: f64) -> Result<OperatingPoint> {
        match self.solve_point(vin) {
            Ok(point) => Ok(point),
            Err(e) if e.is_convergence_failure() && self.policy == ConvergencePolicy::MarkUnresolved => {
                warn!(vin, error = %e, "leaving sweep point unresolved");
                Ok(OperatingPoint::unresolved(vin))
            }
            Err(e) => Err(e),
        }
    }

    /// Solve an arbitrary list of input voltages, in the given order.
    pub fn solve_points(&self, vins: &[f64]) -> Result<Vec<OperatingPoint>> {
        vins.iter().map(|&vin| self.resolve(vin)).collect()
    }

    /// Sweep the range sequentially.
    pub fn run(&self, range: &SweepRange) -> Result<TransferCurve> {
        range.validate()?;
        info!(
            start = range.start,
            end = range.end,
            step = range.step,
            points = range.len(),
            "starting sweep"
        );

        let points = range
            .values()
            .map(|vin| self.resolve(vin))
            .collect::<Result<Vec<_>>>()?;

        Ok(self.finish(points))
    }

    /// Sweep the range on the rayon thread pool.
    ///
    /// Produces the same points as [`SweepDriver::run`], in ascending Vin order.
    #[cfg(feature = "parallel")]
    pub fn run_parallel(&self, range: &SweepRange) -> Result<TransferCurve> {
        use rayon::prelude::*;

        range.validate()?;
        info!(points = range.len(), "starting parallel sweep");

        let points = (0..range.len())
            .into_par_iter()
            .map(|i| self.resolve(range.value(i)))
            .collect::<Result<Vec<_>>>()?;

        Ok(self.finish(points))
    }

    fn finish(&self, points: Vec<OperatingPoint>) -> TransferCurve {
        let curve = TransferCurve::from_points(points);
        let unresolved = curve.unresolved_count();
        if unresolved > 0 {
            warn!(unresolved, "sweep finished with unresolved points");
        } else {
            info!(points = curve.len(), "sweep finished");
        }
        curve
    }
}
