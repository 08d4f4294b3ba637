//! WASM bindings for the kinetics kernels.
//!
//! `integrate` is the hot path called on every slider change: JS typed arrays
//! are borrowed as `&mut [f64]` and written back in place by wasm-bindgen.

use kinetics_core::kernel;
use std::fmt::Display;
use wasm_bindgen::prelude::*;

mod session;
mod system;

pub use session::WasmBrusselator;
pub use system::WasmSystem;

pub(crate) fn to_js_error(context: &str, err: impl Display) -> JsValue {
    JsValue::from_str(&format!("{context}: {err}"))
}

/// Advances `iterations` RK4 steps of the Brusselator from `x[0]`, `y[0]`,
/// writing slots `1..=iterations` of both arrays.
#[wasm_bindgen]
pub fn integrate(
    x: &mut [f64],
    y: &mut [f64],
    a: f64,
    b: f64,
    dt: f64,
    iterations: u32,
) -> Result<(), JsValue> {
    kernel::integrate(x, y, a, b, dt, iterations as usize)
        .map_err(|err| to_js_error("Integration failed", err))
}
