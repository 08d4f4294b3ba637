//! Linear stability of the Brusselator steady state.
//!
//! The only critical point is (A, B/A). Its Jacobian is
//!
//! ```text
//!     [ B - 1    A² ]
//! J = [             ]
//!     [  -B     -A² ]
//! ```
//!
//! with characteristic equation λ² + (1 - B + A²)λ + A² = 0, so the steady
//! state loses stability through a Hopf bifurcation at B = 1 + A².

use anyhow::{bail, Result};
use nalgebra::Matrix2;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

const CENTER_TOLERANCE: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComplexNumber {
    pub re: f64,
    pub im: f64,
}

impl From<Complex64> for ComplexNumber {
    fn from(value: Complex64) -> Self {
        Self {
            re: value.re,
            im: value.im,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    StableNode,
    StableFocus,
    /// Purely imaginary eigenvalues: the Hopf point itself.
    Center,
    UnstableFocus,
    UnstableNode,
}

impl Classification {
    /// Past the Hopf threshold trajectories settle onto a limit cycle.
    pub fn has_limit_cycle(self) -> bool {
        matches!(
            self,
            Classification::UnstableFocus | Classification::UnstableNode
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StabilityReport {
    pub critical_point: (f64, f64),
    /// Row-major 2x2 Jacobian at the critical point.
    pub jacobian: [f64; 4],
    pub trace: f64,
    pub determinant: f64,
    pub discriminant: f64,
    pub eigenvalues: [ComplexNumber; 2],
    pub classification: Classification,
}

pub fn critical_point(a: f64, b: f64) -> Result<(f64, f64)> {
    if a == 0.0 {
        bail!("Critical point is undefined for A = 0.");
    }
    Ok((a, b / a))
}

pub fn jacobian_at_critical_point(a: f64, b: f64) -> [f64; 4] {
    let a2 = a * a;
    [b - 1.0, a2, -b, -a2]
}

/// Coefficients `[c0, c1, c2]` of c2·λ² + c1·λ + c0.
pub fn characteristic_polynomial(a: f64, b: f64) -> [f64; 3] {
    [a * a, 1.0 - b + a * a, 1.0]
}

/// Value of B at which the steady state changes stability.
pub fn hopf_threshold(a: f64) -> f64 {
    1.0 + a * a
}

pub fn analyze(a: f64, b: f64) -> Result<StabilityReport> {
    if !a.is_finite() || !b.is_finite() {
        bail!("Parameters must be finite (A = {}, B = {}).", a, b);
    }
    let critical_point = critical_point(a, b)?;

    let jacobian = jacobian_at_critical_point(a, b);
    let matrix = Matrix2::from_row_slice(&jacobian);
    let trace = matrix.trace();
    let determinant = matrix.determinant();
    let discriminant = trace * trace - 4.0 * determinant;

    let mut eigenvalues: Vec<ComplexNumber> = matrix
        .complex_eigenvalues()
        .iter()
        .map(|&lambda| ComplexNumber::from(lambda))
        .collect();
    eigenvalues.sort_by(|l, r| r.re.total_cmp(&l.re).then(r.im.total_cmp(&l.im)));

    let classification = classify(trace, discriminant);

    Ok(StabilityReport {
        critical_point,
        jacobian,
        trace,
        determinant,
        discriminant,
        eigenvalues: [eigenvalues[0], eigenvalues[1]],
        classification,
    })
}

fn classify(trace: f64, discriminant: f64) -> Classification {
    if trace.abs() <= CENTER_TOLERANCE {
        Classification::Center
    } else if trace < 0.0 {
        if discriminant >= 0.0 {
            Classification::StableNode
        } else {
            Classification::StableFocus
        }
    } else if discriminant >= 0.0 {
        Classification::UnstableNode
    } else {
        Classification::UnstableFocus
    }
}
