//! Generic stepper for the other kinetics models, chaotic flows and maps.

use crate::to_js_error;
use kinetics_core::models::Model;
use kinetics_core::traits::DynamicalSystem;
use kinetics_core::trajectory::{simulate_model, Stepper, StepperKind};
use serde_wasm_bindgen::to_value;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct WasmSystem {
    pub(crate) model: Model,
    state: Vec<f64>,
    t: f64,
    pub(crate) kind: StepperKind,
    solver: Stepper,
}

#[wasm_bindgen]
impl WasmSystem {
    #[wasm_bindgen(constructor)]
    pub fn new(model_name: &str, params: Vec<f64>, solver_name: &str) -> Result<WasmSystem, JsValue> {
        console_error_panic_hook::set_once();

        let model = Model::from_name(model_name, &params)
            .map_err(|err| to_js_error("Failed to build model", err))?;
        let kind =
            StepperKind::from_name(solver_name).map_err(|err| to_js_error("Invalid solver", err))?;
        let dim = DynamicalSystem::<f64>::dimension(&model);
        kind.check_compatible(model.kind(), dim)
            .map_err(|err| to_js_error("Incompatible solver", err))?;
        log::debug!("created {model_name} system ({dim} variables) with {solver_name}");

        Ok(WasmSystem {
            model,
            state: vec![0.0; dim],
            t: 0.0,
            kind,
            solver: kind.build(dim),
        })
    }

    pub fn dimension(&self) -> usize {
        self.state.len()
    }

    pub fn set_state(&mut self, state: &[f64]) -> Result<(), JsValue> {
        if state.len() != self.state.len() {
            return Err(JsValue::from_str("State dimension mismatch."));
        }
        self.state.copy_from_slice(state);
        Ok(())
    }

    pub fn get_state(&self) -> Vec<f64> {
        self.state.clone()
    }

    pub fn set_t(&mut self, t: f64) {
        self.t = t;
    }

    pub fn get_t(&self) -> f64 {
        self.t
    }

    pub fn step(&mut self, dt: f64) {
        self.solver
            .step(&self.model, &mut self.t, &mut self.state, dt);
    }

    /// Integrates `steps` steps from the current state without mutating it and
    /// returns the sampled trajectory.
    pub fn run(&self, dt: f64, steps: u32) -> Result<JsValue, JsValue> {
        let trajectory = simulate_model(
            &self.model,
            self.kind,
            &self.state,
            self.t,
            dt,
            steps as usize,
        )
        .map_err(|err| to_js_error("Simulation failed", err))?;
        to_value(&trajectory).map_err(|err| to_js_error("Serialization error", err))
    }
}
