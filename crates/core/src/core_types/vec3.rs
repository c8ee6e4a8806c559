//! Vector type alias for 3D positions and velocities.

use nalgebra::Vector3;

/// 3D vector type for positions, velocities, and directions.
///
/// This is a simple alias for `nalgebra::Vector3<f32>`, used throughout
/// the crate for parcel positions, parcel velocities, gas velocities and
/// injector axes.
pub type Vec3 = Vector3<f32>;
