//! Lagrangian spray parcels
//!
//! A parcel is a computational super-particle: it stands for many physically
//! identical droplets that share one position, velocity and diameter. The
//! parcel carries the total liquid mass of those droplets; the droplet count
//! is derived from mass, diameter and liquid density.
//!
//! Breakup models keep a little per-parcel state:
//! - `shed_mass`: liquid stripped off by Kelvin-Helmholtz waves that has not yet
//!   been emitted as a child parcel (still counted in `mass`)
//! - `deformation` / `deformation_rate`: Taylor-analogy oscillator state
//! - `time_since_rt_breakup`: Rayleigh-Taylor wave growth timer

use crate::core_types::liquid::LiquidProperties;
use crate::core_types::vec3::Vec3;
use crate::error::SprayError;
use serde::{Deserialize, Serialize};

/// Initial state for a parcel that is not yet part of a population
///
/// Produced by atomization models (new injections) and breakup models
/// (child parcels). The owning cloud assigns an id when it inserts the seed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParcelSeed {
    pub position: Vec3,
    pub velocity: Vec3,
    pub diameter: f32, // m
    pub mass: f32,     // kg
}

impl ParcelSeed {
    /// Create a new parcel seed
    pub fn new(position: Vec3, velocity: Vec3, diameter: f32, mass: f32) -> Self {
        ParcelSeed {
            position,
            velocity,
            diameter,
            mass,
        }
    }
}

/// A spray parcel tracked through the gas phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parcel {
    pub(crate) id: u64,
    pub position: Vec3,
    pub velocity: Vec3,
    /// Droplet diameter (m)
    pub diameter: f32,
    /// Total parcel mass (kg), including `shed_mass`
    pub mass: f32,
    /// Stripped mass awaiting emission as a child parcel (kg)
    pub shed_mass: f32,
    /// Normalised droplet distortion (TAB), breakup at 1.0
    pub deformation: f32,
    /// Rate of change of `deformation` (1/s)
    pub deformation_rate: f32,
    /// Time since the last Rayleigh-Taylor breakup (s)
    pub time_since_rt_breakup: f32,
    /// Time since injection (s)
    pub age: f32,
}

impl Parcel {
    /// Create a parcel from a seed with a fresh breakup state
    pub fn from_seed(id: u64, seed: ParcelSeed) -> Self {
        Parcel {
            id,
            position: seed.position,
            velocity: seed.velocity,
            diameter: seed.diameter,
            mass: seed.mass,
            shed_mass: 0.0,
            deformation: 0.0,
            deformation_rate: 0.0,
            time_since_rt_breakup: 0.0,
            age: 0.0,
        }
    }

    /// Unique identifier within the owning cloud
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Velocity of the gas relative to the parcel
    #[inline]
    pub fn relative_velocity(&self, gas_velocity: &Vec3) -> Vec3 {
        gas_velocity - self.velocity
    }

    /// Number of physical droplets represented by this parcel
    ///
    /// Stripped mass that has not yet been emitted is excluded, since it no
    /// longer belongs to droplets of `diameter`.
    pub fn droplet_count(&self, liquid: &LiquidProperties) -> f32 {
        liquid.droplet_count(self.mass - self.shed_mass, self.diameter)
    }

    /// Check the parcel for values no physical process can produce
    ///
    /// # Errors
    /// Returns [`SprayError::InvalidParcelState`] naming the parcel and the
    /// offending property.
    pub fn validate(&self) -> Result<(), SprayError> {
        if !self.diameter.is_finite() || self.diameter < 0.0 {
            return Err(SprayError::invalid_parcel_state(
                self.id,
                format!("diameter must be finite and non-negative, got {}", self.diameter),
            ));
        }
        if !self.mass.is_finite() || self.mass < 0.0 {
            return Err(SprayError::invalid_parcel_state(
                self.id,
                format!("mass must be finite and non-negative, got {}", self.mass),
            ));
        }
        if !self.shed_mass.is_finite() || self.shed_mass < 0.0 || self.shed_mass > self.mass {
            return Err(SprayError::invalid_parcel_state(
                self.id,
                format!(
                    "shed mass must lie in [0, {}], got {}",
                    self.mass, self.shed_mass
                ),
            ));
        }
        if !self.velocity.iter().all(|v| v.is_finite()) {
            return Err(SprayError::invalid_parcel_state(
                self.id,
                format!("velocity must be finite, got {:?}", self.velocity),
            ));
        }
        if !self.position.iter().all(|v| v.is_finite()) {
            return Err(SprayError::invalid_parcel_state(
                self.id,
                format!("position must be finite, got {:?}", self.position),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parcel() -> Parcel {
        Parcel::from_seed(
            3,
            ParcelSeed::new(Vec3::zeros(), Vec3::new(10.0, 0.0, 0.0), 50.0e-6, 1.0e-6),
        )
    }

    #[test]
    fn test_from_seed_resets_breakup_state() {
        let p = parcel();
        assert_eq!(p.id(), 3);
        assert_eq!(p.shed_mass, 0.0);
        assert_eq!(p.deformation, 0.0);
        assert_eq!(p.age, 0.0);
    }

    #[test]
    fn test_relative_velocity() {
        let p = parcel();
        let rel = p.relative_velocity(&Vec3::new(4.0, 1.0, 0.0));
        assert_eq!(rel, Vec3::new(-6.0, 1.0, 0.0));
    }

    #[test]
    fn test_validate_flags_corrupt_parcels() {
        assert!(parcel().validate().is_ok());

        let mut p = parcel();
        p.diameter = -1.0e-6;
        let err = p.validate().unwrap_err();
        assert!(matches!(err, SprayError::InvalidParcelState { parcel_id: 3, .. }));

        let mut p = parcel();
        p.velocity.x = f32::NAN;
        assert!(p.validate().is_err());

        let mut p = parcel();
        p.shed_mass = 2.0 * p.mass;
        assert!(p.validate().is_err());
    }
}
