//! Algorithms built on the state cache.

pub mod jacobian;
pub mod kinetic_energy;
pub mod mass_matrix;

pub use jacobian::{GeometricJacobian, geometric_jacobian};
pub use kinetic_energy::kinetic_energy;
pub use mass_matrix::mass_matrix;
