//! Technology, geometry and physical-constant records.

use std::fmt;

/// Transistor polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MosKind {
    /// Pull-down device
    Nmos,
    /// Pull-up device
    Pmos,
}

impl fmt::Display for MosKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MosKind::Nmos => write!(f, "NMOS"),
            MosKind::Pmos => write!(f, "PMOS"),
        }
    }
}

/// Physical constants consumed by the device model.
///
/// Passed explicitly into every derivation so that alternate constant sets
/// can be substituted in tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalConstants {
    /// Silicon permittivity (F/m)
    pub eps_si: f64,
    /// Oxide permittivity approximation, already multiplied by its unit scale
    pub eps_ox: f64,
    /// Intrinsic carrier concentration (cm^-3)
    pub n_i: f64,
    /// Thermal voltage (V)
    pub thermal_voltage: f64,
    /// Multiplier in the substrate-doping back-solve
    pub doping_scale: f64,
    /// Divisor applied to `eps_si` in the substrate-doping back-solve
    pub doping_divisor: f64,
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self {
            eps_si: 11.7 * 8.854e-12,
            eps_ox: 0.34 * 0.1,
            n_i: 1.45e10,
            thermal_voltage: 0.025875,
            doping_scale: 1e4,
            doping_divisor: 29.0,
        }
    }
}

/// Fixed process parameters for one transistor type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TechnologyParams {
    /// Body-effect coefficient K1 (V^1/2)
    pub k1: f64,
    /// Oxide thickness (m)
    pub tox: f64,
    /// Zero-bias threshold voltage (V), negative for PMOS
    pub vth0: f64,
    /// Low-field mobility
    pub u0: f64,
    /// Channel-length modulation (1/V), 0 disables it
    pub lambda: f64,
}

impl TechnologyParams {
    /// Base NMOS parameter set.
    pub fn nmos() -> Self {
        Self {
            k1: 0.5802748,
            tox: 4e-9,
            vth0: 0.3662648,
            u0: 265.1889031,
            lambda: 0.0,
        }
    }

    /// Base PMOS parameter set.
    pub fn pmos() -> Self {
        Self {
            k1: 0.5895473,
            tox: 4e-9,
            vth0: -0.3780033,
            u0: 103.0478426,
            lambda: 0.0,
        }
    }

    /// NMOS parameter set with channel-length modulation.
    pub fn nmos_clm() -> Self {
        Self::nmos().with_lambda(0.05)
    }

    /// PMOS parameter set with channel-length modulation.
    pub fn pmos_clm() -> Self {
        Self::pmos().with_lambda(0.04)
    }

    /// Set the channel-length modulation coefficient.
    pub fn with_lambda(mut self, lambda: f64) -> Self {
        self.lambda = lambda;
        self
    }
}

/// Paired NMOS/PMOS technology description.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Technology {
    pub nmos: TechnologyParams,
    pub pmos: TechnologyParams,
}

impl Default for Technology {
    fn default() -> Self {
        Self::base()
    }
}

impl Technology {
    /// Square-law model without channel-length modulation.
    pub fn base() -> Self {
        Self {
            nmos: TechnologyParams::nmos(),
            pmos: TechnologyParams::pmos(),
        }
    }

    /// Square-law model with the (1 + λ·Vds) correction enabled.
    pub fn with_channel_length_modulation() -> Self {
        Self {
            nmos: TechnologyParams::nmos_clm(),
            pmos: TechnologyParams::pmos_clm(),
        }
    }

    /// Parameters for one polarity.
    pub fn params(&self, kind: MosKind) -> &TechnologyParams {
        match kind {
            MosKind::Nmos => &self.nmos,
            MosKind::Pmos => &self.pmos,
        }
    }
}

/// Drawn channel dimensions of one transistor.
///
/// Only the W/L ratio enters the model, so any consistent unit works.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    /// Channel width
    pub w: f64,
    /// Channel length
    pub l: f64,
}

impl Geometry {
    pub fn new(w: f64, l: f64) -> Self {
        Self { w, l }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clm_presets_only_change_lambda() {
        let base = TechnologyParams::nmos();
        let clm = TechnologyParams::nmos_clm();
        assert_eq!(base.lambda, 0.0);
        assert_eq!(clm.lambda, 0.05);
        assert_eq!(clm.with_lambda(0.0), base);

        assert_eq!(TechnologyParams::pmos_clm().lambda, 0.04);
    }

    #[test]
    fn test_pmos_threshold_is_negative() {
        let tech = Technology::default();
        assert!(tech.params(MosKind::Pmos).vth0 < 0.0);
        assert!(tech.params(MosKind::Nmos).vth0 > 0.0);
    }

    #[test]
    fn test_oxide_permittivity_scale() {
        let consts = PhysicalConstants::default();
        assert!((consts.eps_ox - 0.034).abs() < 1e-15);
    }
}
