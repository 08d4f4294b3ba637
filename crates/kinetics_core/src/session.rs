//! Caller side of the kernel's buffer contract.
//!
//! A session owns the configuration record and both trajectory buffers. The
//! buffers are allocated once, sized for the configured iteration count, and
//! every parameter change re-integrates into the same allocation.

use crate::kernel::{integrate_with, BrusselatorConfig, KernelError};

#[derive(Debug, Clone)]
pub struct BrusselatorSession {
    config: BrusselatorConfig,
    x: Vec<f64>,
    y: Vec<f64>,
}

impl BrusselatorSession {
    /// Allocates the buffers, seeds the initial condition and runs the first
    /// integration.
    pub fn new(config: BrusselatorConfig, x0: f64, y0: f64) -> Result<Self, KernelError> {
        let len = config.buffer_len()?;
        let mut x = vec![0.0; len];
        let mut y = vec![0.0; len];
        x[0] = x0;
        y[0] = y0;

        let mut session = Self { config, x, y };
        session.reintegrate()?;
        Ok(session)
    }

    /// Re-runs the kernel over the existing buffers with the current config.
    pub fn reintegrate(&mut self) -> Result<(), KernelError> {
        log::trace!(
            "re-integrating brusselator: A = {}, B = {}, dt = {}, iterations = {}",
            self.config.a,
            self.config.b,
            self.config.dt,
            self.config.iterations
        );
        integrate_with(&mut self.x, &mut self.y, self.config)
    }

    /// Updates the reservoir concentrations and re-integrates.
    pub fn set_parameters(&mut self, a: f64, b: f64) -> Result<(), KernelError> {
        self.config.a = a;
        self.config.b = b;
        self.reintegrate()
    }

    pub fn set_initial_condition(&mut self, x0: f64, y0: f64) -> Result<(), KernelError> {
        self.x[0] = x0;
        self.y[0] = y0;
        self.reintegrate()
    }

    /// Changes the step size. On error the previous step size is kept and the
    /// buffers are not modified.
    pub fn set_step(&mut self, dt: f64) -> Result<(), KernelError> {
        let previous = self.config.dt;
        self.config.dt = dt;
        if let Err(err) = self.reintegrate() {
            log::debug!("rejected step size {dt}: {err}");
            self.config.dt = previous;
            return Err(err);
        }
        Ok(())
    }

    pub fn config(&self) -> BrusselatorConfig {
        self.config
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// State after the last step.
    pub fn final_state(&self) -> (f64, f64) {
        let last = self.config.iterations;
        (self.x[last], self.y[last])
    }

    /// Time of slot `index`, i.e. `index * dt`.
    pub fn time_at(&self, index: usize) -> f64 {
        index as f64 * self.config.dt
    }
}
