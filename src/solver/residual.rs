//! Current-balance residual.

use crate::device::{Mosfet, MosRegion};

/// A scalar function whose zero the root solver looks for.
pub trait Residual {
    /// Residual value at `x`.
    fn residual(&self, x: f64) -> f64;

    /// Magnitude of the quantities whose difference forms the residual.
    ///
    /// Used for the relative part of the convergence tolerance; 0 makes the
    /// tolerance purely absolute.
    fn scale(&self, _x: f64) -> f64 {
        0.0
    }
}

impl<F> Residual for F
where
    F: Fn(f64) -> f64,
{
    fn residual(&self, x: f64) -> f64 {
        self(x)
    }
}

/// NMOS current minus PMOS current at a fixed input voltage.
///
/// Holds every value the residual depends on explicitly; both transistors
/// carry their precomputed constants and hoisted thresholds.
#[derive(Debug, Clone, Copy)]
pub struct CurrentBalance<'a> {
    nmos: &'a Mosfet,
    pmos: &'a Mosfet,
    vdd: f64,
    vin: f64,
}

impl<'a> CurrentBalance<'a> {
    pub fn new(nmos: &'a Mosfet, pmos: &'a Mosfet, vdd: f64, vin: f64) -> Self {
        Self {
            nmos,
            pmos,
            vdd,
            vin,
        }
    }

    /// Interval guaranteed to contain the operating point.
    pub fn bracket(&self) -> (f64, f64) {
        (0.0, self.vdd)
    }

    /// Seed for the root search.
    pub fn initial_guess(&self) -> f64 {
        0.5 * self.vdd
    }

    /// Pull-down current at candidate output `vout`.
    pub fn nmos_current(&self, vout: f64) -> f64 {
        self.nmos.current(self.vin, vout)
    }

    /// Pull-up current at candidate output `vout`.
    pub fn pmos_current(&self, vout: f64) -> f64 {
        self.pmos.current(self.vdd - self.vin, self.vdd - vout)
    }

    /// Operating regions of (NMOS, PMOS) at candidate output `vout`.
    pub fn regions(&self, vout: f64) -> (MosRegion, MosRegion) {
        (
            self.nmos.region(self.vin, vout),
            self.pmos.region(self.vdd - self.vin, self.vdd - vout),
        )
    }
}

impl Residual for CurrentBalance<'_> {
    fn residual(&self, vout: f64) -> f64 {
        self.nmos_current(vout) - self.pmos_current(vout)
    }

    fn scale(&self, vout: f64) -> f64 {
        self.nmos_current(vout).abs().max(self.pmos_current(vout).abs())
    }
}
