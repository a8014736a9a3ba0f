//! A biased transistor with its sweep-invariant constants precomputed.

use crate::error::{Result, VtcError};
use crate::technology::{Geometry, MosKind, PhysicalConstants, TechnologyParams};

use super::model::{self, MosRegion};

/// Geometry-dependent constants of one transistor.
///
/// Independent of Vin and Vout; derived once before a sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceConstants {
    /// Oxide capacitance per unit area
    pub cox: f64,
    /// Transconductance factor
    pub k: f64,
    /// Substrate-doping proxy
    pub nb: f64,
    /// Surface potential (V)
    pub phi_f: f64,
}

impl DeviceConstants {
    /// Derive Cox, K, NB and φf for one transistor.
    pub fn derive(
        kind: MosKind,
        consts: &PhysicalConstants,
        params: &TechnologyParams,
        geometry: &Geometry,
    ) -> Result<Self> {
        let wrap = |e| VtcError::numeric_domain(kind, e);

        let cox = model::oxide_capacitance(consts, params.tox).map_err(wrap)?;
        let k = model::transconductance_factor(params.u0, cox, geometry.w, geometry.l)
            .map_err(wrap)?;
        let nb = model::substrate_doping(consts, k, cox);
        let phi_f = model::surface_potential(consts, nb).map_err(wrap)?;

        Ok(Self { cox, k, nb, phi_f })
    }
}

/// A transistor at a fixed source-to-body bias.
#[derive(Debug, Clone)]
pub struct Mosfet {
    pub kind: MosKind,
    pub params: TechnologyParams,
    pub constants: DeviceConstants,
    /// Signed threshold voltage at the configured VSB
    pub vth: f64,
}

impl Mosfet {
    /// Derive constants and the threshold voltage at `vsb`.
    pub fn new(
        kind: MosKind,
        consts: &PhysicalConstants,
        params: TechnologyParams,
        geometry: &Geometry,
        vsb: f64,
    ) -> Result<Self> {
        let constants = DeviceConstants::derive(kind, consts, &params, geometry)?;
        let vth = model::threshold_voltage(params.vth0, params.k1, constants.phi_f, vsb)
            .map_err(|e| VtcError::numeric_domain(kind, e))?;

        Ok(Self {
            kind,
            params,
            constants,
            vth,
        })
    }

    /// Threshold voltage at an arbitrary source-to-body bias.
    pub fn threshold_at(&self, vsb: f64) -> Result<f64> {
        model::threshold_voltage(self.params.vth0, self.params.k1, self.constants.phi_f, vsb)
            .map_err(|e| VtcError::numeric_domain(self.kind, e))
    }

    /// Threshold as consumed by the current equation.
    ///
    /// PMOS voltages are passed source-referenced (Vsg, Vsd), so the
    /// magnitude of its negative threshold is used.
    pub fn effective_threshold(&self) -> f64 {
        match self.kind {
            MosKind::Nmos => self.vth,
            MosKind::Pmos => self.vth.abs(),
        }
    }

    /// Drain current magnitude for the given terminal voltages.
    ///
    /// For PMOS `vgs` and `vds` are source-to-gate and source-to-drain.
    pub fn current(&self, vgs: f64, vds: f64) -> f64 {
        model::drain_current(
            self.constants.k,
            vgs,
            vds,
            self.effective_threshold(),
            self.params.lambda,
        )
    }

    /// Operating region for the given terminal voltages.
    pub fn region(&self, vgs: f64, vds: f64) -> MosRegion {
        model::operating_region(vgs, vds, self.effective_threshold())
    }
}
