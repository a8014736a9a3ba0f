//! Square-law MOSFET model.
//!
//! Derived constants:
//!   Cox = εox / TOX
//!   K   = U0 · Cox · (W / L)
//!   NB  = (K · Cox)² · scale / (divisor · εsi)
//!   φf  = VT · ln(NB / ni)
//!   Vth = VTH0 + K1 · (√(2φf + VSB) − √(2φf))
//!
//! Drain current (λ = 0 gives the plain square law):
//!   Cutoff:     Vgs ≤ Vth          → Id = 0
//!   Triode:     Vds < Vgs − Vth    → Id = K · ((Vgs − Vth)·Vds − Vds²/2) · (1 + λ·Vds)
//!   Saturation: Vds ≥ Vgs − Vth    → Id = K/2 · (Vgs − Vth)² · (1 + λ·Vds)

use crate::error::DomainError;
use crate::technology::PhysicalConstants;

type DomainResult<T> = std::result::Result<T, DomainError>;

/// Operating region of a MOSFET.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MosRegion {
    Cutoff,
    Triode,
    Saturation,
}

/// Oxide capacitance per unit area.
pub fn oxide_capacitance(consts: &PhysicalConstants, tox: f64) -> DomainResult<f64> {
    if tox.is_nan() || tox <= 0.0 {
        return Err(DomainError::new("oxide capacitance", tox, "TOX must be > 0"));
    }
    Ok(consts.eps_ox / tox)
}

/// Transconductance factor K.
pub fn transconductance_factor(u0: f64, cox: f64, w: f64, l: f64) -> DomainResult<f64> {
    if l == 0.0 {
        return Err(DomainError::new(
            "transconductance factor",
            l,
            "channel length must be non-zero",
        ));
    }
    Ok(u0 * cox * (w / l))
}

/// Substrate-doping proxy back-solved from K and Cox.
///
/// Recompute whenever K changes.
pub fn substrate_doping(consts: &PhysicalConstants, k: f64, cox: f64) -> f64 {
    (k * cox).powi(2) * consts.doping_scale / (consts.doping_divisor * consts.eps_si)
}

/// Surface (Fermi) potential.
pub fn surface_potential(consts: &PhysicalConstants, nb: f64) -> DomainResult<f64> {
    if nb.is_nan() || nb <= 0.0 {
        return Err(DomainError::new("surface potential", nb, "NB must be > 0"));
    }
    Ok(consts.thermal_voltage * (nb / consts.n_i).ln())
}

/// Body-effect corrected threshold voltage.
pub fn threshold_voltage(vth0: f64, k1: f64, phi_f: f64, vsb: f64) -> DomainResult<f64> {
    let two_phi = 2.0 * phi_f;
    if two_phi < 0.0 {
        return Err(DomainError::new("threshold voltage", two_phi, "2·φf must be >= 0"));
    }
    let biased = two_phi + vsb;
    if biased < 0.0 {
        return Err(DomainError::new(
            "threshold voltage",
            biased,
            "2·φf + VSB must be >= 0",
        ));
    }
    Ok(vth0 + k1 * (biased.sqrt() - two_phi.sqrt()))
}

/// Classify the operating region with the same tie-breaks as [`drain_current`].
pub fn operating_region(vgs: f64, vds: f64, vth: f64) -> MosRegion {
    if vgs <= vth {
        MosRegion::Cutoff
    } else if vds < vgs - vth {
        MosRegion::Triode
    } else {
        MosRegion::Saturation
    }
}

/// Drain current of the square-law model with optional channel-length modulation.
pub fn drain_current(k: f64, vgs: f64, vds: f64, vth: f64, lambda: f64) -> f64 {
    let vov = vgs - vth;
    match operating_region(vgs, vds, vth) {
        MosRegion::Cutoff => 0.0,
        MosRegion::Triode => k * (vov * vds - 0.5 * vds * vds) * (1.0 + lambda * vds),
        MosRegion::Saturation => 0.5 * k * vov * vov * (1.0 + lambda * vds),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cutoff_is_exactly_zero() {
        for i in 0..=36 {
            let vgs = i as f64 * 0.01;
            assert_eq!(drain_current(1e-3, vgs, 1.0, 0.3662648, 0.05), 0.0);
        }
        // Vgs == Vth is cutoff
        assert_eq!(drain_current(1e-3, 0.5, 1.0, 0.5, 0.0), 0.0);
    }

    #[test]
    fn test_lambda_zero_matches_plain_square_law() {
        let k = 2.5e-4;
        let vth = 0.4;
        for &vgs in &[0.2, 0.5, 0.9, 1.8] {
            for &vds in &[0.0, 0.05, 0.3, 0.5, 1.2, 1.8] {
                let expected = if vgs <= vth {
                    0.0
                } else if vds < vgs - vth {
                    k * ((vgs - vth) * vds - 0.5 * vds * vds)
                } else {
                    0.5 * k * (vgs - vth) * (vgs - vth)
                };
                assert_eq!(drain_current(k, vgs, vds, vth, 0.0), expected);
            }
        }
    }

    #[test]
    fn test_boundary_belongs_to_saturation() {
        let (k, vgs, vth) = (1e-3, 1.2, 0.4);
        let vds = vgs - vth;
        assert_eq!(operating_region(vgs, vds, vth), MosRegion::Saturation);
        assert_eq!(operating_region(vgs, vds - 1e-9, vth), MosRegion::Triode);

        // Value is continuous across the boundary
        let below = drain_current(k, vgs, vds - 1e-9, vth, 0.04);
        let at = drain_current(k, vgs, vds, vth, 0.04);
        assert_relative_eq!(below, at, max_relative = 1e-8);
    }

    #[test]
    fn test_channel_length_modulation_scales_current() {
        let base = drain_current(1e-3, 1.0, 1.5, 0.4, 0.0);
        let clm = drain_current(1e-3, 1.0, 1.5, 0.4, 0.05);
        assert_relative_eq!(clm, base * (1.0 + 0.05 * 1.5), max_relative = 1e-12);
    }

    #[test]
    fn test_derived_constants() {
        let consts = PhysicalConstants::default();
        let cox = oxide_capacitance(&consts, 4e-9).unwrap();
        assert_relative_eq!(cox, 8.5e6, max_relative = 1e-12);

        let k = transconductance_factor(265.1889031, cox, 1.0, 0.18).unwrap();
        assert_relative_eq!(k, 265.1889031 * 8.5e6 / 0.18, max_relative = 1e-12);

        let nb = substrate_doping(&consts, k, cox);
        let expected_nb = (k * cox).powi(2) * 1e4 / (29.0 * 11.7 * 8.854e-12);
        assert_relative_eq!(nb, expected_nb, max_relative = 1e-12);

        let phi_f = surface_potential(&consts, nb).unwrap();
        assert_relative_eq!(phi_f, 0.025875 * (nb / 1.45e10).ln(), max_relative = 1e-12);
    }

    #[test]
    fn test_zero_body_bias_gives_vth0() {
        assert_eq!(threshold_voltage(0.3662648, 0.58, 0.9, 0.0).unwrap(), 0.3662648);
        assert!(threshold_voltage(0.3662648, 0.58, 0.9, 0.5).unwrap() > 0.3662648);
    }

    #[test]
    fn test_domain_errors() {
        let consts = PhysicalConstants::default();
        assert!(oxide_capacitance(&consts, 0.0).is_err());
        assert!(oxide_capacitance(&consts, -1e-9).is_err());
        assert!(transconductance_factor(1.0, 1.0, 1.0, 0.0).is_err());
        assert!(surface_potential(&consts, 0.0).is_err());

        let err = threshold_voltage(0.4, 0.5, 0.3, -1.0).unwrap_err();
        assert_eq!(err.quantity, "threshold voltage");
        assert_relative_eq!(err.argument, -0.4, max_relative = 1e-12);
    }
}
