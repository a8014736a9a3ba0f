//! # cmos_vtc
//!
//! DC transfer characteristic of a CMOS inverter.
//!
//! This library provides:
//! - A square-law MOSFET model with body effect and optional channel-length modulation
//! - A current-balance residual for the NMOS/PMOS voltage divider
//! - A bracketed Newton-Raphson root search for the output voltage
//! - An input-voltage sweep producing the Vin–Vout and Vin–Id curves
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`technology`] - Process parameters, physical constants, geometry and validation
//! - [`device`] - Derived device constants and the piecewise drain-current model
//! - [`solver`] - Residual, root solver and sweep driver
//! - [`curve`] - Swept operating points and measurements on them
//! - [`output`] - CSV output for external plotting
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! cmos-vtc --vdd 1.8 --wn 1 --ln 0.18 --wp 2 --lp 0.18 > vtc.csv
//! ```
//!
//! ### Library
//!
//! ```no_run
//! use cmos_vtc::{Geometry, InverterConfig, SolverConfig, SweepDriver, SweepRange};
//!
//! let config = InverterConfig::new(1.8, Geometry::new(1.0, 0.18), Geometry::new(2.0, 0.18));
//! let driver = SweepDriver::new(config, SolverConfig::default())?;
//! let curve = driver.run(&SweepRange::up_to(1.8))?;
//! println!("switching threshold: {:?}", curve.switching_threshold());
//! # Ok::<(), cmos_vtc::VtcError>(())
//! ```
//!
//! ## Operating-Point Method
//!
//! For every input voltage:
//!
//! 1. Build the residual r(Vout) = Id_n − Id_p from the precomputed devices
//! 2. Seed the root search at Vdd/2 inside the bracket [0, Vdd]
//! 3. Iterate until |r| is within tolerance of zero
//! 4. Record (Vin, Vout, Id_n)

pub mod curve;
pub mod device;
pub mod error;
pub mod output;
pub mod solver;
pub mod technology;

// Re-export main types for convenience
pub use curve::{OperatingPoint, TransferCurve};
pub use error::{Result, VtcError};
pub use solver::{ConvergencePolicy, SolverConfig, SweepDriver, SweepRange};
pub use technology::{Geometry, InverterConfig, MosKind, Technology};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmInverter;
