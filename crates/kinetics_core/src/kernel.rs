//! Fixed-step RK4 kernel for the Brusselator.
//!
//! The kernel advances the two-species system
//!
//! ```text
//! dX/dt = A - B·X + X²·Y - X
//! dY/dt = B·X - X²·Y
//! ```
//!
//! writing every intermediate state into caller-owned trajectory buffers. Slot 0
//! of each buffer holds the initial condition; slot `i` receives the state after
//! `i` steps. Buffers are only borrowed for the duration of the call and are never
//! resized, so an interactive driver can re-integrate into the same allocation on
//! every parameter change.
//!
//! Callers must not share one buffer pair between concurrent calls; the `&mut`
//! borrows enforce this for safe code.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which trajectory buffer failed a length check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Buffer {
    X,
    Y,
}

impl std::fmt::Display for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Buffer::X => f.write_str("x"),
            Buffer::Y => f.write_str("y"),
        }
    }
}

/// Precondition violations reported before any slot is written.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KernelError {
    #[error("step size dt must be positive, got {0}")]
    NonPositiveStep(f64),
    #[error("{buffer} buffer holds {len} slots but {required} are required for the requested iterations")]
    BufferTooShort {
        buffer: Buffer,
        len: usize,
        required: usize,
    },
    #[error("iteration count {0} cannot be addressed by a trajectory buffer")]
    IterationOverflow(usize),
}

/// Parameters of one integration call, passed by value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrusselatorConfig {
    pub a: f64,
    pub b: f64,
    pub dt: f64,
    pub iterations: usize,
}

impl Default for BrusselatorConfig {
    fn default() -> Self {
        Self {
            a: 0.5,
            b: 2.0,
            dt: 1e-2,
            iterations: 10_000,
        }
    }
}

impl BrusselatorConfig {
    /// Number of slots each trajectory buffer must hold.
    pub fn buffer_len(&self) -> Result<usize, KernelError> {
        self.iterations
            .checked_add(1)
            .ok_or(KernelError::IterationOverflow(self.iterations))
    }
}

/// The Brusselator vector field at `(x, y)`.
#[inline(always)]
pub fn brusselator_field(x: f64, y: f64, a: f64, b: f64) -> (f64, f64) {
    let x2y = x * x * y;
    (a + x2y - b * x - x, b * x - x2y)
}

/// One classical RK4 step from `(x, y)`.
///
/// Every stage evaluates the field at the state perturbed by the previous
/// stage, for both species at once.
#[inline(always)]
pub fn rk4_step(x: f64, y: f64, a: f64, b: f64, dt: f64) -> (f64, f64) {
    const HALF: f64 = 0.5;
    const SIXTH: f64 = 1.0 / 6.0;

    let (k1x, k1y) = brusselator_field(x, y, a, b);
    let (k2x, k2y) = brusselator_field(x + dt * k1x * HALF, y + dt * k1y * HALF, a, b);
    let (k3x, k3y) = brusselator_field(x + dt * k2x * HALF, y + dt * k2y * HALF, a, b);
    let (k4x, k4y) = brusselator_field(x + dt * k3x, y + dt * k3y, a, b);

    (
        x + dt * SIXTH * (k1x + 2.0 * k2x + 2.0 * k3x + k4x),
        y + dt * SIXTH * (k1y + 2.0 * k2y + 2.0 * k3y + k4y),
    )
}

/// Integrates `iterations` RK4 steps in place.
///
/// `x[0]` and `y[0]` must hold the initial condition. On success slots
/// `1..=iterations` of both buffers are overwritten; slots past that are left
/// untouched. `a` and `b` are not validated. NaN and infinities produced by the
/// dynamics propagate into the buffers unchanged.
///
/// Returns an error, without writing anything, when `dt` is not strictly
/// positive or when either buffer is shorter than `iterations + 1`.
pub fn integrate(
    x: &mut [f64],
    y: &mut [f64],
    a: f64,
    b: f64,
    dt: f64,
    iterations: usize,
) -> Result<(), KernelError> {
    // NaN fails this comparison too.
    if !(dt > 0.0) {
        return Err(KernelError::NonPositiveStep(dt));
    }
    let required = iterations
        .checked_add(1)
        .ok_or(KernelError::IterationOverflow(iterations))?;
    if x.len() < required {
        return Err(KernelError::BufferTooShort {
            buffer: Buffer::X,
            len: x.len(),
            required,
        });
    }
    if y.len() < required {
        return Err(KernelError::BufferTooShort {
            buffer: Buffer::Y,
            len: y.len(),
            required,
        });
    }

    let x = &mut x[..required];
    let y = &mut y[..required];

    let (mut xi, mut yi) = (x[0], y[0]);
    for (x_next, y_next) in x[1..].iter_mut().zip(y[1..].iter_mut()) {
        (xi, yi) = rk4_step(xi, yi, a, b, dt);
        *x_next = xi;
        *y_next = yi;
    }

    Ok(())
}

/// [`integrate`] with the parameters taken from a config record.
pub fn integrate_with(
    x: &mut [f64],
    y: &mut [f64],
    config: BrusselatorConfig,
) -> Result<(), KernelError> {
    integrate(x, y, config.a, config.b, config.dt, config.iterations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Brusselator;
    use crate::solvers::RK4;
    use crate::traits::Steppable;

    fn buffers(len: usize, x0: f64, y0: f64) -> (Vec<f64>, Vec<f64>) {
        let mut x = vec![0.0; len];
        let mut y = vec![0.0; len];
        x[0] = x0;
        y[0] = y0;
        (x, y)
    }

    fn close(actual: f64, expected: f64, rel: f64) -> bool {
        (actual - expected).abs() <= rel * expected.abs().max(1.0)
    }

    #[test]
    fn critical_point_is_preserved() {
        for &(a, b) in &[(1.0, 1.5), (2.0, 3.0), (0.5, 1.0)] {
            for &dt in &[1e-3, 1e-2, 0.1] {
                let (mut x, mut y) = buffers(501, a, b / a);
                integrate(&mut x, &mut y, a, b, dt, 500).expect("integration should succeed");
                for i in 0..x.len() {
                    assert!((x[i] - a).abs() < 1e-12, "x[{i}] = {} for a = {a}", x[i]);
                    assert!((y[i] - b / a).abs() < 1e-12, "y[{i}] = {} for b = {b}", y[i]);
                }
            }
        }
    }

    #[test]
    fn split_calls_compose_into_one() {
        let (n, m) = (300, 700);
        let (mut x, mut y) = buffers(n + m + 1, 1.6, 2.8);
        integrate(&mut x, &mut y, 0.5, 2.0, 1e-2, n).expect("first leg");
        integrate(&mut x[n..], &mut y[n..], 0.5, 2.0, 1e-2, m).expect("second leg");

        let (mut x_full, mut y_full) = buffers(n + m + 1, 1.6, 2.8);
        integrate(&mut x_full, &mut y_full, 0.5, 2.0, 1e-2, n + m).expect("single call");

        assert_eq!(x[n + m].to_bits(), x_full[n + m].to_bits());
        assert_eq!(y[n + m].to_bits(), y_full[n + m].to_bits());
        assert_eq!(x, x_full);
        assert_eq!(y, y_full);
    }

    #[test]
    fn zero_iterations_leave_buffers_untouched() {
        let mut x = vec![1.6, -7.0, -7.0];
        let mut y = vec![2.8, -7.0, -7.0];
        integrate(&mut x, &mut y, 0.5, 2.0, 1e-2, 0).expect("zero steps is valid");
        assert_eq!(x, vec![1.6, -7.0, -7.0]);
        assert_eq!(y, vec![2.8, -7.0, -7.0]);

        let mut x = vec![1.6];
        let mut y = vec![2.8];
        integrate(&mut x, &mut y, 0.5, 2.0, 1e-2, 0).expect("single slot suffices");
        assert_eq!((x[0], y[0]), (1.6, 2.8));
    }

    #[test]
    fn canonical_scenario_matches_generic_rk4() {
        let config = BrusselatorConfig::default();
        let len = config.buffer_len().expect("length");
        let (mut x, mut y) = buffers(len, 1.6, 2.8);
        integrate_with(&mut x, &mut y, config).expect("integration should succeed");

        let system = Brusselator {
            a: config.a,
            b: config.b,
        };
        let mut solver = RK4::new(2);
        let mut t = 0.0;
        let mut state = [1.6, 2.8];
        for i in 1..len {
            solver.step(&system, &mut t, &mut state, config.dt);
            assert!(close(x[i], state[0], 1e-6), "x diverged at step {i}");
            assert!(close(y[i], state[1], 1e-6), "y diverged at step {i}");
        }
        assert!(x.iter().chain(y.iter()).all(|v| v.is_finite()));
    }

    #[test]
    fn rk4_step_uses_perturbed_stages() {
        // A frozen-stage scheme would collapse to one explicit Euler step.
        let (x, y) = (1.6, 2.8);
        let dt = 0.1;
        let (xe, ye) = brusselator_field(x, y, 0.5, 2.0);
        let (x1, y1) = rk4_step(x, y, 0.5, 2.0, dt);
        assert!((x1 - (x + dt * xe)).abs() > 1e-6);
        assert!((y1 - (y + dt * ye)).abs() > 1e-6);
    }

    #[test]
    fn short_buffers_are_rejected_without_writes() {
        let mut x = vec![1.6, 9.0, 9.0];
        let mut y = vec![2.8, 9.0, 9.0, 9.0];
        let err = integrate(&mut x, &mut y, 0.5, 2.0, 1e-2, 3).expect_err("x is too short");
        assert_eq!(
            err,
            KernelError::BufferTooShort {
                buffer: Buffer::X,
                len: 3,
                required: 4
            }
        );
        assert_eq!(x, vec![1.6, 9.0, 9.0]);
        assert_eq!(y, vec![2.8, 9.0, 9.0, 9.0]);

        let mut x = vec![1.6, 9.0, 9.0, 9.0];
        let mut y = vec![2.8];
        let err = integrate(&mut x, &mut y, 0.5, 2.0, 1e-2, 3).expect_err("y is too short");
        assert!(matches!(
            err,
            KernelError::BufferTooShort {
                buffer: Buffer::Y,
                ..
            }
        ));
        assert_eq!(x, vec![1.6, 9.0, 9.0, 9.0]);

        let mut empty_x: Vec<f64> = Vec::new();
        let mut empty_y: Vec<f64> = Vec::new();
        assert!(integrate(&mut empty_x, &mut empty_y, 0.5, 2.0, 1e-2, 0).is_err());
    }

    #[test]
    fn invalid_step_and_overflow_are_rejected() {
        let (mut x, mut y) = buffers(4, 1.6, 2.8);
        for dt in [0.0, -1e-2, f64::NAN] {
            let err = integrate(&mut x, &mut y, 0.5, 2.0, dt, 3).expect_err("bad dt");
            assert!(matches!(err, KernelError::NonPositiveStep(_)));
            assert!(err.to_string().contains("must be positive"));
        }
        assert_eq!(&x[1..], &[0.0, 0.0, 0.0]);

        let err = integrate(&mut x, &mut y, 0.5, 2.0, 1e-2, usize::MAX).expect_err("overflow");
        assert_eq!(err, KernelError::IterationOverflow(usize::MAX));
    }

    #[test]
    fn identical_inputs_give_bit_identical_output() {
        let (mut x1, mut y1) = buffers(2001, 1.6, 2.8);
        let (mut x2, mut y2) = buffers(2001, 1.6, 2.8);
        integrate(&mut x1, &mut y1, 0.5, 2.0, 1e-2, 2000).expect("first run");
        integrate(&mut x2, &mut y2, 0.5, 2.0, 1e-2, 2000).expect("second run");
        let bits = |v: &[f64]| v.iter().map(|f| f.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&x1), bits(&x2));
        assert_eq!(bits(&y1), bits(&y2));
    }

    #[test]
    fn slots_past_requested_iterations_are_untouched() {
        let (mut x, mut y) = buffers(10, 1.6, 2.8);
        x[6..].fill(-1.0);
        y[6..].fill(-1.0);
        integrate(&mut x, &mut y, 0.5, 2.0, 1e-2, 5).expect("integration should succeed");
        assert!(x[..6].iter().all(|v| *v > 0.0));
        assert_eq!(&x[6..], &[-1.0; 4]);
        assert_eq!(&y[6..], &[-1.0; 4]);
    }

    #[test]
    fn negative_parameters_are_accepted() {
        let (mut x, mut y) = buffers(11, 1.0, 1.0);
        integrate(&mut x, &mut y, -0.5, -2.0, 1e-2, 10).expect("signs are not validated");
    }

    #[test]
    fn config_defaults_to_canonical_scenario() {
        let config = BrusselatorConfig::default();
        assert_eq!(config.a, 0.5);
        assert_eq!(config.b, 2.0);
        assert_eq!(config.dt, 1e-2);
        assert_eq!(config.iterations, 10_000);
        assert_eq!(config.buffer_len(), Ok(10_001));

        let huge = BrusselatorConfig {
            iterations: usize::MAX,
            ..config
        };
        assert_eq!(
            huge.buffer_len(),
            Err(KernelError::IterationOverflow(usize::MAX))
        );
    }
}
