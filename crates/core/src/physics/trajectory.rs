//! Parcel motion through the carrier gas
//!
//! Parcels feel aerodynamic drag from the surrounding gas and gravity. The
//! drag response time of a sphere is
//! ```text
//! 1/τ_p = 18 μ_g f(Re) / (ρ_l d²),   f(Re) = C_d Re / 24
//! ```
//! The velocity update treats drag implicitly so that very small droplets
//! (τ_p much shorter than the step) relax onto the gas velocity instead of
//! overshooting it. Position follows with the updated velocity.

use crate::core_types::{FlowState, LiquidProperties, Parcel, Vec3};
use crate::physics::dimensionless::{reynolds, sphere_drag_coefficient};
use serde::{Deserialize, Serialize};

/// Standard gravitational acceleration (m/s²), acting along -z
pub const STANDARD_GRAVITY: f32 = 9.81;

/// Moves a parcel over one timestep
pub trait TrajectoryIntegrator: Send + Sync {
    /// Advance position, velocity and age of `parcel` by `dt`
    fn advance(&self, parcel: &mut Parcel, flow: &FlowState, liquid: &LiquidProperties, dt: f32);
}

/// Sphere drag plus a constant body force
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragIntegrator {
    /// Body-force acceleration (m/s²)
    pub gravity: Vec3,
}

impl DragIntegrator {
    pub fn new(gravity: Vec3) -> Self {
        Self { gravity }
    }

    /// Drag-only integrator, for sprays where the injection momentum dominates
    pub fn without_gravity() -> Self {
        Self::new(Vec3::zeros())
    }

    /// Inverse momentum response time 1/τ_p (1/s)
    pub fn inverse_response_time(
        parcel: &Parcel,
        flow: &FlowState,
        liquid: &LiquidProperties,
    ) -> f32 {
        let d = parcel.diameter;
        if d <= 0.0 {
            return 0.0;
        }
        let u = parcel.relative_velocity(&flow.velocity).norm();
        let re = reynolds(flow.density, u, d, flow.viscosity);
        // Stokes limit as Re -> 0
        let correction = if re > 0.0 {
            sphere_drag_coefficient(re) * re / 24.0
        } else {
            1.0
        };
        18.0 * flow.viscosity * correction / (liquid.density * d * d)
    }
}

impl Default for DragIntegrator {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, -STANDARD_GRAVITY))
    }
}

impl TrajectoryIntegrator for DragIntegrator {
    fn advance(&self, parcel: &mut Parcel, flow: &FlowState, liquid: &LiquidProperties, dt: f32) {
        if dt <= 0.0 {
            return;
        }

        let relax = Self::inverse_response_time(parcel, flow, liquid) * dt;
        parcel.velocity =
            (parcel.velocity + flow.velocity * relax + self.gravity * dt) / (1.0 + relax);
        parcel.position += parcel.velocity * dt;
        parcel.age += dt;
    }
}
