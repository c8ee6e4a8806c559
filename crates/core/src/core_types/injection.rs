//! Injection events
//!
//! One injection event describes the liquid leaving a nozzle during one
//! injection interval. Atomization models turn it into parcel seeds.

use crate::core_types::vec3::Vec3;
use crate::error::SprayError;
use serde::{Deserialize, Serialize};

/// Liquid injected through one nozzle over one interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InjectionEvent {
    /// Identifier reported in error messages
    pub id: u64,
    /// Nozzle exit position (m)
    pub position: Vec3,
    /// Injector axis, need not be normalised
    pub direction: Vec3,
    /// Liquid mass flow rate (kg/s)
    pub mass_flow_rate: f32,
    /// Injection interval (s)
    pub duration: f32,
    /// Liquid exit speed (m/s)
    pub injection_speed: f32,
    /// Nozzle hole diameter (m)
    pub nozzle_diameter: f32,
    /// Number of parcels to create for this event
    pub parcels: usize,
}

impl InjectionEvent {
    /// Liquid mass delivered by this event (kg)
    #[inline]
    pub fn total_mass(&self) -> f32 {
        self.mass_flow_rate * self.duration
    }

    /// Unit vector along the injector axis
    pub fn axis(&self) -> Vec3 {
        self.direction.normalize()
    }

    /// Context string used in error messages
    pub(crate) fn context(&self) -> String {
        format!("injection event {}", self.id)
    }

    /// Reject physically impossible injection parameters
    ///
    /// Values are never clamped: a negative mass flow rate is a case setup
    /// error and is reported as such.
    ///
    /// # Errors
    /// Returns [`SprayError::InvalidConfiguration`] naming the event.
    pub fn validate(&self) -> Result<(), SprayError> {
        let invalid = |reason: String| Err(SprayError::invalid_configuration(self.context(), reason));

        if !self.mass_flow_rate.is_finite() || self.mass_flow_rate < 0.0 {
            return invalid(format!(
                "mass flow rate must be finite and non-negative, got {}",
                self.mass_flow_rate
            ));
        }
        if !self.duration.is_finite() || self.duration < 0.0 {
            return invalid(format!(
                "duration must be finite and non-negative, got {}",
                self.duration
            ));
        }
        if !self.injection_speed.is_finite() || self.injection_speed < 0.0 {
            return invalid(format!(
                "injection speed must be finite and non-negative, got {}",
                self.injection_speed
            ));
        }
        if !self.nozzle_diameter.is_finite() || self.nozzle_diameter <= 0.0 {
            return invalid(format!(
                "nozzle diameter must be finite and positive, got {}",
                self.nozzle_diameter
            ));
        }
        if !self.position.iter().all(|v| v.is_finite()) {
            return invalid(format!("position must be finite, got {:?}", self.position));
        }
        let axis_length = self.direction.norm();
        if !axis_length.is_finite() || axis_length == 0.0 {
            return invalid(format!(
                "direction must be a finite non-zero vector, got {:?}",
                self.direction
            ));
        }
        if self.total_mass() > 0.0 && self.parcels == 0 {
            return invalid("parcel count must be positive when mass is injected".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn event() -> InjectionEvent {
        InjectionEvent {
            id: 7,
            position: Vec3::zeros(),
            direction: Vec3::new(0.0, 0.0, -2.0),
            mass_flow_rate: 0.01,
            duration: 1.0e-3,
            injection_speed: 300.0,
            nozzle_diameter: 180.0e-6,
            parcels: 50,
        }
    }

    #[test]
    fn test_total_mass_and_axis() {
        let e = event();
        assert_relative_eq!(e.total_mass(), 1.0e-5, max_relative = 1e-6);
        assert_eq!(e.axis(), Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_negative_mass_flow_is_rejected() {
        let e = InjectionEvent {
            mass_flow_rate: -1.0,
            ..event()
        };
        let err = e.validate().unwrap_err();
        assert!(err.to_string().contains("injection event 7"));
    }

    #[test]
    fn test_zero_parcels_only_allowed_without_mass() {
        let e = InjectionEvent {
            parcels: 0,
            ..event()
        };
        assert!(e.validate().is_err());

        let e = InjectionEvent {
            parcels: 0,
            mass_flow_rate: 0.0,
            ..event()
        };
        assert!(e.validate().is_ok());
    }

    #[test]
    fn test_zero_direction_is_rejected() {
        let e = InjectionEvent {
            direction: Vec3::zeros(),
            ..event()
        };
        assert!(e.validate().is_err());
    }
}
