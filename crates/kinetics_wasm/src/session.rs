//! Interactive Brusselator session: buffers live on the Rust side and are
//! re-integrated in place whenever the UI changes a parameter.

use crate::to_js_error;
use js_sys::Float64Array;
use kinetics_core::kernel::BrusselatorConfig;
use kinetics_core::session::BrusselatorSession;
use kinetics_core::stability::analyze;
use serde_wasm_bindgen::to_value;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct WasmBrusselator {
    session: BrusselatorSession,
}

#[wasm_bindgen]
impl WasmBrusselator {
    #[wasm_bindgen(constructor)]
    pub fn new(
        a: f64,
        b: f64,
        dt: f64,
        iterations: u32,
        x0: f64,
        y0: f64,
    ) -> Result<WasmBrusselator, JsValue> {
        console_error_panic_hook::set_once();

        let config = BrusselatorConfig {
            a,
            b,
            dt,
            iterations: iterations as usize,
        };
        log::debug!("creating brusselator session with {:?}", config);
        let session = BrusselatorSession::new(config, x0, y0)
            .map_err(|err| to_js_error("Failed to create session", err))?;
        Ok(WasmBrusselator { session })
    }

    pub fn set_parameters(&mut self, a: f64, b: f64) -> Result<(), JsValue> {
        self.session
            .set_parameters(a, b)
            .map_err(|err| to_js_error("Integration failed", err))
    }

    pub fn set_initial_condition(&mut self, x0: f64, y0: f64) -> Result<(), JsValue> {
        self.session
            .set_initial_condition(x0, y0)
            .map_err(|err| to_js_error("Integration failed", err))
    }

    pub fn set_step(&mut self, dt: f64) -> Result<(), JsValue> {
        self.session
            .set_step(dt)
            .map_err(|err| to_js_error("Integration failed", err))
    }

    pub fn x(&self) -> Float64Array {
        Float64Array::from(self.session.x())
    }

    pub fn y(&self) -> Float64Array {
        Float64Array::from(self.session.y())
    }

    pub fn final_state(&self) -> Vec<f64> {
        let (x, y) = self.session.final_state();
        vec![x, y]
    }

    pub fn iterations(&self) -> u32 {
        self.session.config().iterations as u32
    }

    pub fn config(&self) -> Result<JsValue, JsValue> {
        to_value(&self.session.config()).map_err(|err| to_js_error("Serialization error", err))
    }

    /// Linear stability of the steady state for the current A and B.
    pub fn stability(&self) -> Result<JsValue, JsValue> {
        let config = self.session.config();
        let report =
            analyze(config.a, config.b).map_err(|err| to_js_error("Stability analysis failed", err))?;
        to_value(&report).map_err(|err| to_js_error("Serialization error", err))
    }
}
