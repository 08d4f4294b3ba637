//! Kinetics and nonlinear-dynamics models expressed as vector fields or maps.
//!
//! Every model is generic over [`Scalar`] so the same definition serves the
//! f64 steppers and any other float-like type.

use crate::traits::{lit, DynamicalSystem, Scalar};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Brusselator: A -> X, B + X -> Y + C, 2X + Y -> 3X, X -> D.
///
/// dX/dt = A - B·X + X²·Y - X
/// dY/dt = B·X - X²·Y
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Brusselator {
    pub a: f64,
    pub b: f64,
}

impl<T: Scalar> DynamicalSystem<T> for Brusselator {
    fn dimension(&self) -> usize {
        2
    }

    fn apply(&self, _t: T, x: &[T], out: &mut [T]) {
        let a: T = lit(self.a);
        let b: T = lit(self.b);
        let (u, v) = (x[0], x[1]);
        out[0] = a + u * u * v - b * u - u;
        out[1] = b * u - u * u * v;
    }
}

/// First order conversion R -> P with rate constant `rate`.
/// State layout: [product, reagent].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FirstOrderKinetics {
    pub rate: f64,
}

impl<T: Scalar> DynamicalSystem<T> for FirstOrderKinetics {
    fn dimension(&self) -> usize {
        2
    }

    fn apply(&self, _t: T, x: &[T], out: &mut [T]) {
        let flux = lit::<T>(self.rate) * x[1];
        out[0] = flux;
        out[1] = -flux;
    }
}

/// Enzyme kinetics S + E <-> ES -> E + P.
/// State layout: [S, E, ES, P].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MichaelisMenten {
    pub kf: f64,
    pub kb: f64,
    pub kcat: f64,
}

impl<T: Scalar> DynamicalSystem<T> for MichaelisMenten {
    fn dimension(&self) -> usize {
        4
    }

    fn apply(&self, _t: T, x: &[T], out: &mut [T]) {
        let (s, e, es) = (x[0], x[1], x[2]);
        let binding = lit::<T>(self.kf) * s * e;
        let unbinding = lit::<T>(self.kb) * es;
        let catalysis = lit::<T>(self.kcat) * es;
        out[0] = unbinding - binding;
        out[1] = unbinding - binding + catalysis;
        out[2] = binding - unbinding - catalysis;
        out[3] = catalysis;
    }
}

/// Mutually repressing gene pair.
///
/// dx/dt = αx / (1 + y^βx) - x
/// dy/dt = αy / (1 + x^βy) - y
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ToggleSwitch {
    pub alpha_x: f64,
    pub alpha_y: f64,
    pub beta_x: f64,
    pub beta_y: f64,
}

impl<T: Scalar> DynamicalSystem<T> for ToggleSwitch {
    fn dimension(&self) -> usize {
        2
    }

    fn apply(&self, _t: T, x: &[T], out: &mut [T]) {
        let one = T::one();
        let (u, v) = (x[0], x[1]);
        out[0] = lit::<T>(self.alpha_x) / (one + v.powf(lit(self.beta_x))) - u;
        out[1] = lit::<T>(self.alpha_y) / (one + u.powf(lit(self.beta_y))) - v;
    }
}

/// Predator-prey model: dx/dt = (a - b·y)·x, dy/dt = (c·x - d)·y.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LotkaVolterra {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl LotkaVolterra {
    /// Coexistence equilibrium (d/c, a/b).
    pub fn coexistence_point(&self) -> (f64, f64) {
        (self.d / self.c, self.a / self.b)
    }
}

impl<T: Scalar> DynamicalSystem<T> for LotkaVolterra {
    fn dimension(&self) -> usize {
        2
    }

    fn apply(&self, _t: T, x: &[T], out: &mut [T]) {
        let (u, v) = (x[0], x[1]);
        out[0] = (lit::<T>(self.a) - lit::<T>(self.b) * v) * u;
        out[1] = (lit::<T>(self.c) * u - lit::<T>(self.d)) * v;
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Lorenz {
    pub sigma: f64,
    pub rho: f64,
    pub beta: f64,
}

impl<T: Scalar> DynamicalSystem<T> for Lorenz {
    fn dimension(&self) -> usize {
        3
    }

    fn apply(&self, _t: T, x: &[T], out: &mut [T]) {
        let (u, v, w) = (x[0], x[1], x[2]);
        out[0] = lit::<T>(self.sigma) * (v - u);
        out[1] = lit::<T>(self.rho) * u - u * w - v;
        out[2] = u * v - lit::<T>(self.beta) * w;
    }
}

/// Unit-mass oscillator with spring constant `k`. State layout: [q, p].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HarmonicOscillator {
    pub k: f64,
}

impl<T: Scalar> DynamicalSystem<T> for HarmonicOscillator {
    fn dimension(&self) -> usize {
        2
    }

    fn apply(&self, _t: T, x: &[T], out: &mut [T]) {
        out[0] = x[1];
        out[1] = -lit::<T>(self.k) * x[0];
    }
}

/// Forced Duffing-Van der Pol oscillator with the forcing phase as a state.
///
/// dx/dt = y
/// dy/dt = μ(1 - x²)·y - x³ + f·cos(z)
/// dz/dt = ω
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DuffingVanDerPol {
    pub mu: f64,
    pub f: f64,
    pub omega: f64,
}

impl<T: Scalar> DynamicalSystem<T> for DuffingVanDerPol {
    fn dimension(&self) -> usize {
        3
    }

    fn apply(&self, _t: T, x: &[T], out: &mut [T]) {
        let (u, v, phase) = (x[0], x[1], x[2]);
        out[0] = v;
        out[1] = lit::<T>(self.mu) * (T::one() - u * u) * v - u * u * u
            + lit::<T>(self.f) * phase.cos();
        out[2] = lit(self.omega);
    }
}

/// x_{n+1} = μ·x_n·(1 - x_n). A map, not a flow.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LogisticMap {
    pub mu: f64,
}

impl<T: Scalar> DynamicalSystem<T> for LogisticMap {
    fn dimension(&self) -> usize {
        1
    }

    fn apply(&self, _t: T, x: &[T], out: &mut [T]) {
        out[0] = lit::<T>(self.mu) * x[0] * (T::one() - x[0]);
    }
}

/// Chirikov standard map on the torus [0, 2π)². State layout: [q, p].
///
/// p_{n+1} = p_n + k·sin(q_n)
/// q_{n+1} = q_n + p_{n+1}
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StandardMap {
    pub k: f64,
}

fn wrap_angle<T: Scalar>(value: T) -> T {
    let tau: T = lit(std::f64::consts::TAU);
    let wrapped = value % tau;
    if wrapped < T::zero() {
        wrapped + tau
    } else {
        wrapped
    }
}

impl<T: Scalar> DynamicalSystem<T> for StandardMap {
    fn dimension(&self) -> usize {
        2
    }

    fn apply(&self, _t: T, x: &[T], out: &mut [T]) {
        let p_next = wrap_angle(x[1] + lit::<T>(self.k) * x[0].sin());
        out[0] = wrap_angle(x[0] + p_next);
        out[1] = p_next;
    }
}

/// Whether `apply` returns a derivative or the next iterate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SystemKind {
    Flow,
    Map,
}

/// Name-selected model, used where the model is chosen at runtime.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum Model {
    Brusselator(Brusselator),
    FirstOrder(FirstOrderKinetics),
    MichaelisMenten(MichaelisMenten),
    ToggleSwitch(ToggleSwitch),
    LotkaVolterra(LotkaVolterra),
    Lorenz(Lorenz),
    Harmonic(HarmonicOscillator),
    DuffingVanDerPol(DuffingVanDerPol),
    LogisticMap(LogisticMap),
    StandardMap(StandardMap),
}

impl Model {
    /// Builds a model from its name and a flat parameter list, in the order the
    /// fields are declared on the model struct.
    pub fn from_name(name: &str, params: &[f64]) -> Result<Self> {
        let expected = match name {
            "brusselator" => 2,
            "first_order" => 1,
            "michaelis_menten" => 3,
            "toggle_switch" => 4,
            "lotka_volterra" => 4,
            "lorenz" => 3,
            "harmonic" => 1,
            "duffing_van_der_pol" => 3,
            "logistic_map" => 1,
            "standard_map" => 1,
            other => bail!("Unknown model \"{}\".", other),
        };
        if params.len() != expected {
            bail!(
                "Model \"{}\" expects {} parameters, got {}.",
                name,
                expected,
                params.len()
            );
        }

        let p = params;
        Ok(match name {
            "brusselator" => Model::Brusselator(Brusselator { a: p[0], b: p[1] }),
            "first_order" => Model::FirstOrder(FirstOrderKinetics { rate: p[0] }),
            "michaelis_menten" => Model::MichaelisMenten(MichaelisMenten {
                kf: p[0],
                kb: p[1],
                kcat: p[2],
            }),
            "toggle_switch" => Model::ToggleSwitch(ToggleSwitch {
                alpha_x: p[0],
                alpha_y: p[1],
                beta_x: p[2],
                beta_y: p[3],
            }),
            "lotka_volterra" => Model::LotkaVolterra(LotkaVolterra {
                a: p[0],
                b: p[1],
                c: p[2],
                d: p[3],
            }),
            "lorenz" => Model::Lorenz(Lorenz {
                sigma: p[0],
                rho: p[1],
                beta: p[2],
            }),
            "harmonic" => Model::Harmonic(HarmonicOscillator { k: p[0] }),
            "duffing_van_der_pol" => Model::DuffingVanDerPol(DuffingVanDerPol {
                mu: p[0],
                f: p[1],
                omega: p[2],
            }),
            "logistic_map" => Model::LogisticMap(LogisticMap { mu: p[0] }),
            _ => Model::StandardMap(StandardMap { k: p[0] }),
        })
    }

    pub fn kind(&self) -> SystemKind {
        match self {
            Model::LogisticMap(_) | Model::StandardMap(_) => SystemKind::Map,
            _ => SystemKind::Flow,
        }
    }
}

impl<T: Scalar> DynamicalSystem<T> for Model {
    fn dimension(&self) -> usize {
        match self {
            Model::Brusselator(m) => DynamicalSystem::<T>::dimension(m),
            Model::FirstOrder(m) => DynamicalSystem::<T>::dimension(m),
            Model::MichaelisMenten(m) => DynamicalSystem::<T>::dimension(m),
            Model::ToggleSwitch(m) => DynamicalSystem::<T>::dimension(m),
            Model::LotkaVolterra(m) => DynamicalSystem::<T>::dimension(m),
            Model::Lorenz(m) => DynamicalSystem::<T>::dimension(m),
            Model::Harmonic(m) => DynamicalSystem::<T>::dimension(m),
            Model::DuffingVanDerPol(m) => DynamicalSystem::<T>::dimension(m),
            Model::LogisticMap(m) => DynamicalSystem::<T>::dimension(m),
            Model::StandardMap(m) => DynamicalSystem::<T>::dimension(m),
        }
    }

    fn apply(&self, t: T, x: &[T], out: &mut [T]) {
        match self {
            Model::Brusselator(m) => m.apply(t, x, out),
            Model::FirstOrder(m) => m.apply(t, x, out),
            Model::MichaelisMenten(m) => m.apply(t, x, out),
            Model::ToggleSwitch(m) => m.apply(t, x, out),
            Model::LotkaVolterra(m) => m.apply(t, x, out),
            Model::Lorenz(m) => m.apply(t, x, out),
            Model::Harmonic(m) => m.apply(t, x, out),
            Model::DuffingVanDerPol(m) => m.apply(t, x, out),
            Model::LogisticMap(m) => m.apply(t, x, out),
            Model::StandardMap(m) => m.apply(t, x, out),
        }
    }
}
