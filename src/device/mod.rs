//! Device physics for the inverter's two transistors.
//!
//! - [`model`] holds the pure, stateless square-law equations
//! - [`Mosfet`] binds them to one transistor's precomputed constants and
//!   threshold voltage

pub mod model;
mod mosfet;

pub use model::{drain_current, operating_region, MosRegion};
pub use mosfet::{DeviceConstants, Mosfet};
