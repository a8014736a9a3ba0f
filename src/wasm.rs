//! WASM bindings for cmos_vtc.
//!
//! This module provides JavaScript-friendly bindings so a browser page can
//! compute a transfer curve and hand the columns to a charting library.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmInverter } from 'cmos_vtc';
//!
//! await init();
//!
//! const inv = new WasmInverter(1.8, 0.0, 1.0, 0.18, 2.0, 0.18);
//! inv.sweep(1.8, 0.01);
//!
//! plot(inv.vin(), inv.vout());
//! plot(inv.vin(), inv.id());
//! ```

use wasm_bindgen::prelude::*;

use crate::curve::TransferCurve;
use crate::solver::{SolverConfig, SweepDriver, SweepRange, DEFAULT_MAX_ITERATIONS};
use crate::technology::{Geometry, InverterConfig, Technology};

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn js_err(e: crate::VtcError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// WASM-compatible inverter sweep.
///
/// Wraps a [`SweepDriver`] and keeps the most recent transfer curve.
#[wasm_bindgen]
pub struct WasmInverter {
    driver: SweepDriver,
    curve: TransferCurve,
}

#[wasm_bindgen]
impl WasmInverter {
    /// Create an inverter using the base technology (no channel-length modulation).
    ///
    /// # Arguments
    /// * `vdd` - Supply voltage (V)
    /// * `vbulk` - Body bias (V)
    /// * `wn`, `ln` - NMOS width and length
    /// * `wp`, `lp` - PMOS width and length
    #[wasm_bindgen(constructor)]
    pub fn new(vdd: f64, vbulk: f64, wn: f64, ln: f64, wp: f64, lp: f64) -> Result<WasmInverter, JsValue> {
        Self::with_options(vdd, vbulk, wn, ln, wp, lp, false, DEFAULT_MAX_ITERATIONS)
    }

    /// Create an inverter with explicit model and solver options.
    ///
    /// # Arguments
    /// * `clm` - Enable channel-length modulation
    /// * `max_iterations` - Root-search iteration cap per point (default: 100)
    #[wasm_bindgen]
    #[allow(clippy::too_many_arguments)]
    pub fn with_options(
        vdd: f64,
        vbulk: f64,
        wn: f64,
        ln: f64,
        wp: f64,
        lp: f64,
        clm: bool,
        max_iterations: usize,
    ) -> Result<WasmInverter, JsValue> {
        let technology = if clm {
            Technology::with_channel_length_modulation()
        } else {
            Technology::base()
        };
        let config = InverterConfig::new(vdd, Geometry::new(wn, ln), Geometry::new(wp, lp))
            .with_vbulk(vbulk)
            .with_technology(technology);
        let solver = SolverConfig::new().with_max_iterations(max_iterations);
        let driver = SweepDriver::new(config, solver).map_err(js_err)?;

        Ok(WasmInverter {
            driver,
            curve: TransferCurve::default(),
        })
    }

    /// Sweep Vin from 0 to `end` in steps of `step`.
    ///
    /// Returns the number of points computed.
    #[wasm_bindgen]
    pub fn sweep(&mut self, end: f64, step: f64) -> Result<usize, JsValue> {
        let range = SweepRange::up_to(end).with_step(step);
        self.curve = self.driver.run(&range).map_err(js_err)?;
        Ok(self.curve.len())
    }

    /// Input voltages of the last sweep.
    #[wasm_bindgen]
    pub fn vin(&self) -> Vec<f64> {
        self.curve.vin()
    }

    /// Output voltages of the last sweep.
    #[wasm_bindgen]
    pub fn vout(&self) -> Vec<f64> {
        self.curve.vout()
    }

    /// NMOS drain currents of the last sweep.
    #[wasm_bindgen]
    pub fn id(&self) -> Vec<f64> {
        self.curve.id()
    }

    /// Switching threshold of the last sweep, or `undefined`.
    #[wasm_bindgen]
    pub fn switching_threshold(&self) -> Option<f64> {
        self.curve.switching_threshold()
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
