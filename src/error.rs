//! Error types for the inverter transfer-characteristic solver.
//!
//! This module provides a unified error type [`VtcError`] covering parameter
//! validation, out-of-domain device computations, root-search failures and
//! result output. The pure device-model functions report a narrower
//! [`DomainError`], which the device layer wraps with the transistor it
//! belongs to.

use thiserror::Error;

use crate::technology::MosKind;

/// Result type alias using [`VtcError`].
pub type Result<T> = std::result::Result<T, VtcError>;

/// An intermediate device computation received an argument outside its domain.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{quantity}: argument {argument:.6e} is outside the valid domain ({requirement})")]
pub struct DomainError {
    /// Derived quantity being computed (e.g. "surface potential")
    pub quantity: &'static str,
    /// Offending argument value
    pub argument: f64,
    /// Human-readable domain requirement (e.g. "must be > 0")
    pub requirement: &'static str,
}

impl DomainError {
    pub(crate) fn new(quantity: &'static str, argument: f64, requirement: &'static str) -> Self {
        Self {
            quantity,
            argument,
            requirement,
        }
    }
}

/// Unified error type for all solver operations.
#[derive(Error, Debug)]
pub enum VtcError {
    // ============ Setup Errors ============
    /// Invalid configuration value, detected before any sweep point is solved
    #[error("Invalid parameter '{param}' for {device}: {message}")]
    InvalidParameter {
        device: String,
        param: String,
        message: String,
    },

    /// A device computation left its mathematical domain
    #[error("Numeric domain error in {device}: {source}")]
    NumericDomain {
        device: MosKind,
        #[source]
        source: DomainError,
    },

    // ============ Solver Errors ============
    /// Root search exhausted its iteration budget
    #[error("Root search did not converge after {iterations} iterations (residual: {residual:.2e})")]
    ConvergenceFailure { iterations: usize, residual: f64 },

    /// The residual has the same sign at both ends of the search bracket
    #[error("Residual does not change sign over [{lo}, {hi}] (r(lo) = {r_lo:.2e}, r(hi) = {r_hi:.2e})")]
    NoSignChange {
        lo: f64,
        hi: f64,
        r_lo: f64,
        r_hi: f64,
    },

    /// The bracket shrank to floating-point resolution around a sign change
    /// without the residual meeting the tolerance (a discontinuity)
    #[error("Bracket collapsed at x = {x} after {iterations} iterations (residual: {residual:.2e})")]
    BracketCollapsed {
        x: f64,
        residual: f64,
        iterations: usize,
    },

    /// Residual evaluated to NaN or infinity
    #[error("Residual is not finite at x = {x}")]
    NonFiniteResidual { x: f64 },

    /// A single sweep point failed; carries the input voltage it was solved for
    #[error("Sweep point Vin = {vin:.4} V failed: {source}")]
    SweepPoint {
        vin: f64,
        #[source]
        source: Box<VtcError>,
    },

    // ============ I/O Errors ============
    /// Error writing results
    #[error("Failed to write results: {0}")]
    Output(#[from] std::io::Error),
}

impl VtcError {
    /// Create an invalid parameter error
    pub fn invalid_parameter(
        device: impl Into<String>,
        param: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            device: device.into(),
            param: param.into(),
            message: message.into(),
        }
    }

    /// Create a numeric domain error for a transistor
    pub fn numeric_domain(device: MosKind, source: DomainError) -> Self {
        Self::NumericDomain { device, source }
    }

    /// Create a convergence failure error
    pub fn convergence_failure(iterations: usize, residual: f64) -> Self {
        Self::ConvergenceFailure {
            iterations,
            residual,
        }
    }

    /// Attach the input voltage of the sweep point this error occurred at.
    pub fn at_vin(self, vin: f64) -> Self {
        Self::SweepPoint {
            vin,
            source: Box::new(self),
        }
    }

    /// Input voltage of the failing sweep point, if known.
    pub fn vin(&self) -> Option<f64> {
        match self {
            Self::SweepPoint { vin, .. } => Some(*vin),
            _ => None,
        }
    }

    /// Whether this error is (or wraps) a root-search failure.
    pub fn is_convergence_failure(&self) -> bool {
        match self {
            Self::ConvergenceFailure { .. }
            | Self::NoSignChange { .. }
            | Self::BracketCollapsed { .. }
            | Self::NonFiniteResidual { .. } => true,
            Self::SweepPoint { source, .. } => source.is_convergence_failure(),
            _ => false,
        }
    }
}
