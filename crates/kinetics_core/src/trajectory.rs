use crate::{
    models::{Model, SystemKind},
    solvers::{DiscreteMap, Euler, SymplecticEuler, RK4},
    traits::{DynamicalSystem, Steppable},
};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepperKind {
    Euler,
    Rk4,
    Symplectic,
    Discrete,
}

impl StepperKind {
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "euler" => Ok(StepperKind::Euler),
            "rk4" => Ok(StepperKind::Rk4),
            "symplectic" => Ok(StepperKind::Symplectic),
            "discrete" => Ok(StepperKind::Discrete),
            other => bail!("Unknown solver \"{}\".", other),
        }
    }

    pub fn build(self, dim: usize) -> Stepper {
        match self {
            StepperKind::Euler => Stepper::Euler(Euler::new(dim)),
            StepperKind::Rk4 => Stepper::Rk4(RK4::new(dim)),
            StepperKind::Symplectic => Stepper::Symplectic(SymplecticEuler::new(dim)),
            StepperKind::Discrete => Stepper::Discrete(DiscreteMap::new(dim)),
        }
    }

    /// Maps only make sense with the discrete iterator, flows only with the
    /// ODE schemes.
    pub fn check_compatible(self, kind: SystemKind, dim: usize) -> Result<()> {
        match (kind, self) {
            (SystemKind::Map, StepperKind::Discrete) => Ok(()),
            (SystemKind::Map, other) => {
                bail!("Map systems must use the discrete solver, got {:?}.", other)
            }
            (SystemKind::Flow, StepperKind::Discrete) => {
                bail!("The discrete solver cannot integrate a flow.")
            }
            (SystemKind::Flow, StepperKind::Symplectic) if dim % 2 != 0 => {
                bail!("Symplectic stepping needs an even dimension, got {}.", dim)
            }
            (SystemKind::Flow, _) => Ok(()),
        }
    }
}

/// A concrete f64 stepper chosen at runtime.
pub enum Stepper {
    Euler(Euler<f64>),
    Rk4(RK4<f64>),
    Symplectic(SymplecticEuler<f64>),
    Discrete(DiscreteMap<f64>),
}

impl Stepper {
    pub fn step(
        &mut self,
        system: &impl DynamicalSystem<f64>,
        t: &mut f64,
        state: &mut [f64],
        dt: f64,
    ) {
        match self {
            Stepper::Euler(s) => s.step(system, t, state, dt),
            Stepper::Rk4(s) => s.step(system, t, state, dt),
            Stepper::Symplectic(s) => s.step(system, t, state, dt),
            Stepper::Discrete(s) => s.step(system, t, state, dt),
        }
    }
}

/// Sampled solution: `steps + 1` rows including the initial state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trajectory {
    pub dimension: usize,
    pub times: Vec<f64>,
    /// Row-major, `times.len()` rows of `dimension` values.
    pub states: Vec<f64>,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Row `index`, or `None` when it lies outside the stored states.
    pub fn state(&self, index: usize) -> Option<&[f64]> {
        let start = index.checked_mul(self.dimension)?;
        let end = start.checked_add(self.dimension)?;
        self.states.get(start..end)
    }

    pub fn last_state(&self) -> Option<&[f64]> {
        let last = self.len().checked_sub(1)?;
        self.state(last)
    }

    /// One state variable across all rows.
    pub fn component(&self, index: usize) -> Vec<f64> {
        if index >= self.dimension {
            return Vec::new();
        }
        self.states
            .iter()
            .skip(index)
            .step_by(self.dimension)
            .copied()
            .collect()
    }
}

pub fn simulate<S>(
    system: &S,
    stepper: StepperKind,
    initial_state: &[f64],
    initial_time: f64,
    dt: f64,
    steps: usize,
) -> Result<Trajectory>
where
    S: DynamicalSystem<f64>,
{
    let dim = system.dimension();
    if initial_state.is_empty() {
        bail!("Initial state must have positive dimension.");
    }
    if initial_state.len() != dim {
        bail!(
            "Initial state dimension mismatch. Expected {}, got {}.",
            dim,
            initial_state.len()
        );
    }
    if !(dt > 0.0) {
        bail!("Step size dt must be positive.");
    }
    if stepper == StepperKind::Symplectic && dim % 2 != 0 {
        bail!("Symplectic stepping needs an even dimension, got {}.", dim);
    }

    log::debug!(
        "simulating {} steps of a {}-dimensional system with {:?}",
        steps,
        dim,
        stepper
    );

    let rows = match steps.checked_add(1) {
        Some(rows) => rows,
        None => bail!("Step count {} is too large to store.", steps),
    };
    let values = match rows.checked_mul(dim) {
        Some(values) => values,
        None => bail!("Trajectory of {} rows x {} values is too large to store.", rows, dim),
    };
    let mut times = Vec::new();
    times
        .try_reserve_exact(rows)
        .with_context(|| format!("Failed to allocate {} trajectory times.", rows))?;
    let mut states = Vec::new();
    states
        .try_reserve_exact(values)
        .with_context(|| format!("Failed to allocate {} trajectory values.", values))?;
    let mut solver = stepper.build(dim);
    let mut state = initial_state.to_vec();
    let mut t = initial_time;

    times.push(t);
    states.extend_from_slice(&state);
    for _ in 0..steps {
        solver.step(system, &mut t, &mut state, dt);
        times.push(t);
        states.extend_from_slice(&state);
    }

    Ok(Trajectory {
        dimension: dim,
        times,
        states,
    })
}

/// [`simulate`] for a runtime-selected model, rejecting solvers that do not
/// match the model kind.
pub fn simulate_model(
    model: &Model,
    stepper: StepperKind,
    initial_state: &[f64],
    initial_time: f64,
    dt: f64,
    steps: usize,
) -> Result<Trajectory> {
    stepper.check_compatible(model.kind(), DynamicalSystem::<f64>::dimension(model))?;
    simulate(model, stepper, initial_state, initial_time, dt, steps)
}

#[cfg(test)]
mod tests {
    use super::{simulate, simulate_model, StepperKind, Trajectory};
    use crate::kernel::integrate;
    use crate::models::{
        Brusselator, HarmonicOscillator, Lorenz, MichaelisMenten, Model, ToggleSwitch,
    };

    fn assert_err_contains<T: std::fmt::Debug>(result: anyhow::Result<T>, needle: &str) {
        let err = result.expect_err("expected error");
        let message = format!("{err}");
        assert!(
            message.contains(needle),
            "expected error to contain \"{needle}\", got \"{message}\""
        );
    }

    #[test]
    fn simulate_rejects_invalid_inputs() {
        let system = Brusselator { a: 0.5, b: 2.0 };
        assert_err_contains(
            simulate(&system, StepperKind::Rk4, &[], 0.0, 0.1, 10),
            "positive dimension",
        );
        assert_err_contains(
            simulate(&system, StepperKind::Rk4, &[1.0], 0.0, 0.1, 10),
            "dimension mismatch",
        );
        assert_err_contains(
            simulate(&system, StepperKind::Rk4, &[1.0, 1.0], 0.0, 0.0, 10),
            "dt must be positive",
        );
        let system = Lorenz {
            sigma: 16.0,
            rho: 45.92,
            beta: 4.0,
        };
        assert_err_contains(
            simulate(&system, StepperKind::Symplectic, &[10.0, 1.0, 1.0], 0.0, 0.01, 10),
            "even dimension",
        );
    }

    #[test]
    fn unknown_solver_name_is_rejected() {
        assert_eq!(StepperKind::from_name("rk4").expect("rk4"), StepperKind::Rk4);
        assert_eq!(
            StepperKind::from_name("discrete").expect("discrete"),
            StepperKind::Discrete
        );
        assert_err_contains(StepperKind::from_name("tsit5"), "Unknown solver");
    }

    #[test]
    fn simulate_rejects_unrepresentable_step_counts() {
        let system = Brusselator { a: 0.5, b: 2.0 };
        assert_err_contains(
            simulate(&system, StepperKind::Rk4, &[1.0, 1.0], 0.0, 0.1, usize::MAX),
            "too large",
        );
        assert_err_contains(
            simulate(&system, StepperKind::Rk4, &[1.0, 1.0], 0.0, 0.1, usize::MAX / 2),
            "too large",
        );
    }

    #[test]
    fn empty_trajectory_has_no_rows() {
        let trajectory = Trajectory {
            dimension: 0,
            times: Vec::new(),
            states: Vec::new(),
        };
        assert!(trajectory.is_empty());
        assert!(trajectory.last_state().is_none());
        assert!(trajectory.state(0).is_none());
        assert!(trajectory.component(0).is_empty());

        let ragged = Trajectory {
            dimension: 2,
            times: vec![0.0, 1.0],
            states: vec![1.0, 2.0, 3.0],
        };
        assert_eq!(ragged.state(0), Some(&[1.0, 2.0][..]));
        assert!(ragged.last_state().is_none());
    }

    #[test]
    fn simulate_model_pairs_maps_with_discrete_solver() {
        let logistic = Model::from_name("logistic_map", &[3.9]).expect("logistic");
        let trajectory = simulate_model(&logistic, StepperKind::Discrete, &[0.2], 0.0, 1.0, 500)
            .expect("simulate");
        assert_eq!(trajectory.len(), 501);
        assert!(trajectory.states.iter().all(|x| (0.0..=1.0).contains(x)));
        assert!((trajectory.times[500] - 500.0).abs() < 1e-9);

        assert_err_contains(
            simulate_model(&logistic, StepperKind::Rk4, &[0.2], 0.0, 1.0, 10),
            "discrete solver",
        );
        let brusselator = Model::from_name("brusselator", &[0.5, 2.0]).expect("brusselator");
        assert_err_contains(
            simulate_model(&brusselator, StepperKind::Discrete, &[1.0, 1.0], 0.0, 0.1, 10),
            "cannot integrate a flow",
        );
    }

    #[test]
    fn rk4_simulation_matches_brusselator_kernel() {
        let system = Brusselator { a: 0.5, b: 2.0 };
        let trajectory =
            simulate(&system, StepperKind::Rk4, &[1.6, 2.8], 0.0, 1e-2, 1000).expect("simulate");

        let mut x = vec![0.0; 1001];
        let mut y = vec![0.0; 1001];
        x[0] = 1.6;
        y[0] = 2.8;
        integrate(&mut x, &mut y, 0.5, 2.0, 1e-2, 1000).expect("kernel");

        assert_eq!(trajectory.len(), 1001);
        assert_eq!(trajectory.component(0), x);
        assert_eq!(trajectory.component(1), y);
        assert!((trajectory.times[1000] - 10.0).abs() < 1e-9);
    }

    #[test]
    fn michaelis_menten_converts_substrate_to_product() {
        let system = MichaelisMenten {
            kf: 1.0,
            kb: 1e-2,
            kcat: 1.0,
        };
        let trajectory = simulate(
            &system,
            StepperKind::Rk4,
            &[10.0, 1.0, 0.0, 0.0],
            0.0,
            1e-3,
            20_000,
        )
        .expect("simulate");

        for row in 0..trajectory.len() {
            let s = trajectory.state(row).expect("row");
            assert!((s[1] + s[2] - 1.0).abs() < 1e-9);
            assert!((s[0] + s[2] + s[3] - 10.0).abs() < 1e-9);
        }
        let last = trajectory.last_state().expect("last row");
        assert!(last[3] > 9.0, "product only reached {}", last[3]);
    }

    #[test]
    fn symmetric_toggle_switch_settles_on_diagonal() {
        let system = ToggleSwitch {
            alpha_x: 2.0,
            alpha_y: 2.0,
            beta_x: 1.1,
            beta_y: 1.1,
        };
        let trajectory =
            simulate(&system, StepperKind::Rk4, &[0.5, 0.5], 0.0, 1e-2, 2000).expect("simulate");
        let last = trajectory.last_state().expect("last row");
        assert!((last[0] - last[1]).abs() < 1e-9);
        let residual = 2.0 / (1.0 + last[0].powf(1.1)) - last[0];
        assert!(residual.abs() < 1e-6);
    }

    #[test]
    fn symplectic_run_returns_to_start_after_period() {
        let system = HarmonicOscillator { k: 1.0 };
        let dt = 1e-3;
        let steps = (2.0 * std::f64::consts::PI / dt).round() as usize;
        let trajectory = simulate(&system, StepperKind::Symplectic, &[0.5, 0.0], 0.0, dt, steps)
            .expect("simulate");
        let last = trajectory.last_state().expect("last row");
        assert!((last[0] - 0.5).abs() < 1e-2);
        assert!(last[1].abs() < 1e-2);
    }
}
