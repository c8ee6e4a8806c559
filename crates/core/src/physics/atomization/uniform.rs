//! Monodisperse injection without a primary breakup model

use super::{parcel_mass, AtomizationModel};
use crate::core_types::{FlowState, InjectionEvent, LiquidProperties, ParcelSeed};
use crate::error::{require_positive, SprayError};
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Coefficients of [`UniformAtomization`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniformCoeffs {
    /// Droplet diameter (m); the nozzle diameter when absent
    #[serde(default)]
    pub diameter: Option<f32>,
}

/// Every parcel leaves the nozzle along the injector axis with the same
/// diameter and the same share of the injected mass
#[derive(Debug, Clone)]
pub struct UniformAtomization {
    coeffs: UniformCoeffs,
}

impl UniformAtomization {
    const NAME: &'static str = "uniform";

    /// # Errors
    /// Returns [`SprayError::InvalidConfiguration`] for a non-positive diameter.
    pub fn new(coeffs: UniformCoeffs) -> Result<Self, SprayError> {
        if let Some(d) = coeffs.diameter {
            require_positive(Self::NAME, "diameter", d)?;
        }
        Ok(Self { coeffs })
    }

    pub fn coeffs(&self) -> &UniformCoeffs {
        &self.coeffs
    }
}

impl AtomizationModel for UniformAtomization {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn seed_parcels(
        &self,
        event: &InjectionEvent,
        _flow: &FlowState,
        _liquid: &LiquidProperties,
        _rng: &mut dyn RngCore,
    ) -> Vec<ParcelSeed> {
        let diameter = self.coeffs.diameter.unwrap_or(event.nozzle_diameter);
        let velocity = event.axis() * event.injection_speed;
        let mass = parcel_mass(event);

        (0..event.parcels)
            .map(|_| ParcelSeed::new(event.position, velocity, diameter, mass))
            .collect()
    }

    fn coefficient(&self, name: &str) -> Option<f32> {
        match name {
            "diameter" => self.coeffs.diameter,
            _ => None,
        }
    }

    fn set_coefficient(&mut self, name: &str, value: f32) -> Result<(), SprayError> {
        match name {
            "diameter" => {
                self.coeffs.diameter = Some(require_positive(Self::NAME, name, value)?);
                Ok(())
            }
            _ => Err(SprayError::invalid_configuration(
                Self::NAME,
                format!("unknown coefficient '{name}'"),
            )),
        }
    }
}
