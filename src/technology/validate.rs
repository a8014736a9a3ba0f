//! Setup-time parameter validation.

use crate::error::{Result, VtcError};

use super::{Geometry, MosKind, TechnologyParams};

fn positive_finite(device: &str, param: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(VtcError::invalid_parameter(
            device,
            param,
            format!("must be finite (got {value})"),
        ));
    }
    if value <= 0.0 {
        return Err(VtcError::invalid_parameter(
            device,
            param,
            format!("must be > 0 (got {value})"),
        ));
    }
    Ok(())
}

/// Validate a transistor's channel dimensions.
pub fn validate_geometry(kind: MosKind, geometry: &Geometry) -> Result<()> {
    let device = kind.to_string();
    positive_finite(&device, "W", geometry.w)?;
    positive_finite(&device, "L", geometry.l)?;
    Ok(())
}

/// Validate a technology parameter record.
///
/// Checks:
/// - TOX and U0 are strictly positive
/// - K1, VTH0 and λ are finite
/// - λ is non-negative
pub fn validate_technology(kind: MosKind, params: &TechnologyParams) -> Result<()> {
    let device = kind.to_string();
    positive_finite(&device, "TOX", params.tox)?;
    positive_finite(&device, "U0", params.u0)?;

    for (name, value) in [("K1", params.k1), ("VTH0", params.vth0), ("LAMBDA", params.lambda)] {
        if !value.is_finite() {
            return Err(VtcError::invalid_parameter(
                &device,
                name,
                format!("must be finite (got {value})"),
            ));
        }
    }

    if params.lambda < 0.0 {
        return Err(VtcError::invalid_parameter(
            &device,
            "LAMBDA",
            format!("must be >= 0 (got {})", params.lambda),
        ));
    }

    Ok(())
}

/// Validate the supply and body-bias voltages.
pub fn validate_bias(vdd: f64, vbulk: f64) -> Result<()> {
    positive_finite("inverter", "Vdd", vdd)?;
    if !vbulk.is_finite() {
        return Err(VtcError::invalid_parameter(
            "inverter",
            "Vbulk",
            format!("must be finite (got {vbulk})"),
        ));
    }
    Ok(())
}
