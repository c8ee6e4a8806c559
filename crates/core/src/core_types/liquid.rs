//! Liquid-phase properties of the injected fuel
//!
//! Values are taken at injection temperature and treated as constant over the
//! lifetime of a cloud. Temperature-dependent thermophysics belongs to the
//! surrounding solver.
//!
//! # References
//!
//! - Poling, Prausnitz, O'Connell (2001). "The Properties of Gases and Liquids", 5th ed.
//! - Lefebvre, A.H. (1989). "Atomization and Sprays"

use crate::error::{require_positive, SprayError};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Physical properties of the spray liquid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquidProperties {
    /// Liquid density (kg/m³)
    pub density: f32,
    /// Surface tension against the carrier gas (N/m)
    pub surface_tension: f32,
    /// Dynamic viscosity (Pa·s)
    pub viscosity: f32,
}

impl LiquidProperties {
    /// Water at 20°C
    pub const WATER: Self = Self {
        density: 998.0,
        surface_tension: 0.0728,
        viscosity: 1.0e-3,
    };

    /// Diesel fuel (n-dodecane surrogate) at 300 K
    pub const DIESEL: Self = Self {
        density: 830.0,
        surface_tension: 0.026,
        viscosity: 2.4e-3,
    };

    /// n-heptane at 300 K
    pub const N_HEPTANE: Self = Self {
        density: 680.0,
        surface_tension: 0.0198,
        viscosity: 3.9e-4,
    };

    /// Check that every property is finite and positive
    ///
    /// # Errors
    /// Returns [`SprayError::InvalidConfiguration`] for the first offending property.
    pub fn validate(&self) -> Result<(), SprayError> {
        require_positive("liquid", "density", self.density)?;
        require_positive("liquid", "surfaceTension", self.surface_tension)?;
        require_positive("liquid", "viscosity", self.viscosity)?;
        Ok(())
    }

    /// Mass of a single spherical droplet of diameter `diameter` (kg)
    #[inline]
    pub fn droplet_mass(&self, diameter: f32) -> f32 {
        self.density * PI / 6.0 * diameter.powi(3)
    }

    /// Number of physical droplets of diameter `diameter` carried by `mass` kilograms
    ///
    /// Returns 0 for a vanishing diameter rather than dividing by zero.
    #[inline]
    pub fn droplet_count(&self, mass: f32, diameter: f32) -> f32 {
        let single = self.droplet_mass(diameter);
        if single > 0.0 {
            mass / single
        } else {
            0.0
        }
    }
}

impl Default for LiquidProperties {
    fn default() -> Self {
        Self::DIESEL
    }
}
