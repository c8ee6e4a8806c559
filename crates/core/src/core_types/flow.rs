//! Continuous-phase state seen by a parcel
//!
//! The carrier gas field lives in the surrounding CFD solver. This crate only
//! asks for the local state at a parcel position through [`FlowSampler`].

use crate::core_types::vec3::Vec3;
use serde::{Deserialize, Serialize};

/// Local gas-phase state at a point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowState {
    /// Gas density (kg/m³)
    pub density: f32,
    /// Gas velocity (m/s)
    pub velocity: Vec3,
    /// Gas temperature (K)
    pub temperature: f32,
    /// Static pressure (Pa)
    pub pressure: f32,
    /// Dynamic viscosity (Pa·s)
    pub viscosity: f32,
}

impl FlowState {
    /// Quiescent air at 300 K and 1 atm
    pub fn quiescent_air() -> Self {
        FlowState {
            density: 1.177,
            velocity: Vec3::zeros(),
            temperature: 300.0,
            pressure: 101_325.0,
            viscosity: 1.846e-5,
        }
    }

    /// Same state moving with velocity `velocity`
    pub fn with_velocity(self, velocity: Vec3) -> Self {
        FlowState { velocity, ..self }
    }

    /// Same state with gas density `density`
    pub fn with_density(self, density: f32) -> Self {
        FlowState { density, ..self }
    }
}

impl Default for FlowState {
    fn default() -> Self {
        Self::quiescent_air()
    }
}

/// Source of local continuous-phase state, supplied by the host solver
///
/// Implementations must be callable from several threads at once because the
/// cloud samples parcels in parallel.
pub trait FlowSampler: Send + Sync {
    /// Return the gas state at `position`
    fn sample(&self, position: &Vec3) -> FlowState;
}

/// Spatially uniform gas field
///
/// Useful for driving a cloud outside a CFD solver: constant-volume bomb
/// experiments, unit tests and the headless demo.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UniformFlow {
    pub state: FlowState,
}

impl UniformFlow {
    pub fn new(state: FlowState) -> Self {
        UniformFlow { state }
    }
}

impl FlowSampler for UniformFlow {
    fn sample(&self, _position: &Vec3) -> FlowState {
        self.state
    }
}

impl<F> FlowSampler for F
where
    F: Fn(&Vec3) -> FlowState + Send + Sync,
{
    fn sample(&self, position: &Vec3) -> FlowState {
        self(position)
    }
}
