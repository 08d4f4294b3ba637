use num_traits::{Float, FromPrimitive};
use std::fmt::Debug;

/// A trait for types that can be used as scalars in the kinetics models.
/// Must support basic arithmetic, debug printing, and conversion from f64.
pub trait Scalar: Float + FromPrimitive + Debug + 'static {}

impl<T: Float + FromPrimitive + Debug + 'static> Scalar for T {}

/// Represents a dynamical system: a vector field dx/dt = f(t, x) or a map
/// x_{n+1} = f(x_n).
pub trait DynamicalSystem<T: Scalar> {
    /// Returns the dimension of the state space.
    fn dimension(&self) -> usize;

    /// Evaluates the vector field (flow) or map function.
    /// t: current time
    /// x: current state
    /// out: buffer to write dx/dt or x_{n+1} into, same length as x
    fn apply(&self, t: T, x: &[T], out: &mut [T]);
}

/// A fixed-step scheme that advances a system by one step in place.
pub trait Steppable<T: Scalar> {
    /// Performs one step of size dt.
    /// t: current time (updated after step)
    /// state: current state (updated after step)
    fn step(&mut self, system: &impl DynamicalSystem<T>, t: &mut T, state: &mut [T], dt: T);
}

/// Converts an f64 literal into the scalar type.
///
/// Every `Scalar` is a `Float`, so the conversion from a finite literal cannot fail.
#[inline]
pub(crate) fn lit<T: Scalar>(value: f64) -> T {
    T::from_f64(value).unwrap_or_else(T::nan)
}
