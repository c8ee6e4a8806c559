//! Blob injection (Reitz 1987)
//!
//! The liquid leaves the nozzle as blobs of the order of the nozzle diameter.
//! Atomization proper is left to the secondary breakup model, which strips the
//! blobs down (typically `reitzKHRT`). Blob directions are spread uniformly over
//! the solid spray cone.

use super::{parcel_mass, sample_solid_cone, AtomizationModel};
use crate::core_types::{FlowState, InjectionEvent, LiquidProperties, ParcelSeed};
use crate::error::{require_positive, SprayError};
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Coefficients of [`BlobsSheetAtomization`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlobsSheetCoeffs {
    /// Blob diameter as a multiple of the nozzle diameter
    pub b0: f32,
    /// Spray cone half-angle (degrees)
    pub cone_half_angle: f32,
}

impl Default for BlobsSheetCoeffs {
    fn default() -> Self {
        Self {
            b0: 1.0,
            cone_half_angle: 10.0,
        }
    }
}

impl BlobsSheetCoeffs {
    fn validate(&self) -> Result<(), SprayError> {
        require_positive(BlobsSheetAtomization::NAME, "b0", self.b0)?;
        require_positive(
            BlobsSheetAtomization::NAME,
            "coneHalfAngle",
            self.cone_half_angle,
        )?;
        if self.cone_half_angle >= 90.0 {
            return Err(SprayError::invalid_configuration(
                BlobsSheetAtomization::NAME,
                format!(
                    "coefficient 'coneHalfAngle' must be below 90 degrees, got {}",
                    self.cone_half_angle
                ),
            ));
        }
        Ok(())
    }
}

/// Nozzle-sized blobs in a solid cone
#[derive(Debug, Clone)]
pub struct BlobsSheetAtomization {
    coeffs: BlobsSheetCoeffs,
}

impl BlobsSheetAtomization {
    const NAME: &'static str = "blobsSheet";

    /// # Errors
    /// Returns [`SprayError::InvalidConfiguration`] for non-positive coefficients
    /// or a cone half-angle of 90° or more.
    pub fn new(coeffs: BlobsSheetCoeffs) -> Result<Self, SprayError> {
        coeffs.validate()?;
        Ok(Self { coeffs })
    }

    pub fn coeffs(&self) -> &BlobsSheetCoeffs {
        &self.coeffs
    }
}

impl AtomizationModel for BlobsSheetAtomization {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn seed_parcels(
        &self,
        event: &InjectionEvent,
        _flow: &FlowState,
        _liquid: &LiquidProperties,
        rng: &mut dyn RngCore,
    ) -> Vec<ParcelSeed> {
        let axis = event.axis();
        let half_angle = self.coeffs.cone_half_angle.to_radians();
        let diameter = self.coeffs.b0 * event.nozzle_diameter;
        let mass = parcel_mass(event);

        (0..event.parcels)
            .map(|_| {
                let direction = sample_solid_cone(&axis, half_angle, rng);
                ParcelSeed::new(
                    event.position,
                    direction * event.injection_speed,
                    diameter,
                    mass,
                )
            })
            .collect()
    }

    fn coefficient(&self, name: &str) -> Option<f32> {
        match name {
            "b0" => Some(self.coeffs.b0),
            "coneHalfAngle" => Some(self.coeffs.cone_half_angle),
            _ => None,
        }
    }

    fn set_coefficient(&mut self, name: &str, value: f32) -> Result<(), SprayError> {
        let mut updated = self.coeffs;
        match name {
            "b0" => updated.b0 = value,
            "coneHalfAngle" => updated.cone_half_angle = value,
            _ => {
                return Err(SprayError::invalid_configuration(
                    Self::NAME,
                    format!("unknown coefficient '{name}'"),
                ))
            }
        }
        updated.validate()?;
        self.coeffs = updated;
        Ok(())
    }
}
