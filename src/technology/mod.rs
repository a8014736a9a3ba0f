//! Technology description and inverter configuration.
//!
//! Holds the fixed per-polarity process parameters, the physical constants
//! used by the device model, channel geometry, and the validated
//! [`InverterConfig`] that the sweep consumes.

mod types;
mod validate;

pub use types::{Geometry, MosKind, PhysicalConstants, Technology, TechnologyParams};
pub use validate::{validate_bias, validate_geometry, validate_technology};

use crate::error::Result;

/// Everything needed to evaluate one inverter, excluding the sweep range.
#[derive(Debug, Clone, PartialEq)]
pub struct InverterConfig {
    /// Supply voltage (V)
    pub vdd: f64,
    /// Body/substrate bias (V)
    pub vbulk: f64,
    /// Pull-down geometry
    pub nmos: Geometry,
    /// Pull-up geometry
    pub pmos: Geometry,
    /// Process parameters for both polarities
    pub technology: Technology,
    /// Physical constants
    pub constants: PhysicalConstants,
}

impl InverterConfig {
    /// Create a configuration using the base technology and default constants.
    pub fn new(vdd: f64, nmos: Geometry, pmos: Geometry) -> Self {
        Self {
            vdd,
            vbulk: 0.0,
            nmos,
            pmos,
            technology: Technology::base(),
            constants: PhysicalConstants::default(),
        }
    }

    /// Set the body bias.
    pub fn with_vbulk(mut self, vbulk: f64) -> Self {
        self.vbulk = vbulk;
        self
    }

    /// Replace the technology parameter pair.
    pub fn with_technology(mut self, technology: Technology) -> Self {
        self.technology = technology;
        self
    }

    /// Replace the physical constants.
    pub fn with_constants(mut self, constants: PhysicalConstants) -> Self {
        self.constants = constants;
        self
    }

    /// Geometry of one transistor.
    pub fn geometry(&self, kind: MosKind) -> &Geometry {
        match kind {
            MosKind::Nmos => &self.nmos,
            MosKind::Pmos => &self.pmos,
        }
    }

    /// Source-to-body voltage seen by a transistor.
    ///
    /// The NMOS source sits at ground and the PMOS source at Vdd.
    pub fn vsb(&self, kind: MosKind) -> f64 {
        match kind {
            MosKind::Nmos => self.vbulk,
            MosKind::Pmos => self.vdd - self.vbulk,
        }
    }

    /// Check every setup-time parameter.
    pub fn validate(&self) -> Result<()> {
        validate_bias(self.vdd, self.vbulk)?;
        for kind in [MosKind::Nmos, MosKind::Pmos] {
            validate_technology(kind, self.technology.params(kind))?;
            validate_geometry(kind, self.geometry(kind))?;
        }
        Ok(())
    }
}
