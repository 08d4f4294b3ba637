/// The `kinetics_core` crate provides fixed-step integration kernels for
/// chemical-kinetics and nonlinear-dynamics models.
///
/// Key components:
/// - **Kernel**: the allocation-free Brusselator RK4 routine writing into caller-owned buffers.
/// - **Session**: the driver side of that contract, re-integrating in place on parameter changes.
/// - **Traits**: `Scalar`, `DynamicalSystem` (vector fields), `Steppable` (solvers).
/// - **Solvers**: explicit Euler, RK4 and symplectic Euler.
/// - **Models**: Brusselator, first order kinetics, Michaelis-Menten, toggle switch,
///   Lotka-Volterra, Lorenz and the harmonic oscillator.
/// - **Stability**: critical point, eigenvalues and Hopf threshold of the Brusselator.
pub mod kernel;
pub mod models;
pub mod session;
pub mod solvers;
pub mod stability;
pub mod traits;
pub mod trajectory;
