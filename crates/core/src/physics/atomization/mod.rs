//! Primary atomization models
//!
//! An atomization model turns one injection event into the seeds of the
//! parcels that leave the nozzle. Models are pure: they read the event, the
//! local gas state, the liquid properties and a random stream, and return new
//! seeds without touching any existing parcel.
//!
//! # Variants
//!
//! - [`UniformAtomization`] - monodisperse parcels along the injector axis
//! - [`BlobsSheetAtomization`] - blob method: nozzle-sized blobs in a solid cone
//! - [`LisaAtomization`] - linearized instability sheet atomization for
//!   pressure-swirl injectors
//!
//! # References
//!
//! - Reitz, R.D. (1987). "Modeling atomization processes in high-pressure vaporizing
//!   sprays." Atomisation and Spray Technology, 3, 309-337.
//! - Senecal, P.K., et al. (1999). "Modeling high-speed viscous liquid sheet atomization."
//!   International Journal of Multiphase Flow, 25, 1073-1097.

mod blobs_sheet;
mod lisa;
mod uniform;

pub use blobs_sheet::{BlobsSheetAtomization, BlobsSheetCoeffs};
pub use lisa::{LisaAtomization, LisaCoeffs};
pub use uniform::{UniformAtomization, UniformCoeffs};

use crate::config::AtomizationConfig;
use crate::core_types::{FlowState, InjectionEvent, LiquidProperties, ParcelSeed, Vec3};
use crate::error::SprayError;
use rand::{Rng, RngCore};
use std::f32::consts::PI;
use std::fmt;
use tracing::debug;

/// Pluggable primary atomization policy
///
/// Implementors provide [`AtomizationModel::seed_parcels`]; callers use
/// [`AtomizationModel::atomize`], which validates the event first and checks
/// the produced seeds.
pub trait AtomizationModel: Send + Sync + fmt::Debug {
    /// Model name as used in case configuration
    fn name(&self) -> &'static str;

    /// Produce parcel seeds for a validated event that injects mass
    ///
    /// Called with `event.parcels > 0` and `event.total_mass() > 0`.
    fn seed_parcels(
        &self,
        event: &InjectionEvent,
        flow: &FlowState,
        liquid: &LiquidProperties,
        rng: &mut dyn RngCore,
    ) -> Vec<ParcelSeed>;

    /// Current value of a named coefficient
    fn coefficient(&self, name: &str) -> Option<f32>;

    /// Change a named coefficient
    ///
    /// # Errors
    /// Returns [`SprayError::InvalidConfiguration`] for unknown names and
    /// out-of-range values. The model is unchanged on error.
    fn set_coefficient(&mut self, name: &str, value: f32) -> Result<(), SprayError>;

    /// Atomize one injection event
    ///
    /// Deterministic for a given random stream state. An event that injects no
    /// mass yields no seeds.
    ///
    /// # Errors
    /// Returns [`SprayError::InvalidConfiguration`] when the event or liquid is
    /// physically invalid, or when the model would produce non-finite seeds.
    fn atomize(
        &self,
        event: &InjectionEvent,
        flow: &FlowState,
        liquid: &LiquidProperties,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<ParcelSeed>, SprayError> {
        event.validate()?;
        liquid.validate()?;

        if event.parcels == 0 || event.total_mass() <= 0.0 {
            return Ok(Vec::new());
        }

        let seeds = self.seed_parcels(event, flow, liquid, rng);
        if let Some(bad) = seeds.iter().find(|s| !seed_is_finite(s)) {
            return Err(SprayError::invalid_configuration(
                event.context(),
                format!("{} produced a non-physical parcel: {:?}", self.name(), bad),
            ));
        }

        debug!(
            "{}: {} parcels, {:.3e} kg from {}",
            self.name(),
            seeds.len(),
            event.total_mass(),
            event.context()
        );
        Ok(seeds)
    }
}

/// Build the atomization model selected by `config`
///
/// # Errors
/// Returns [`SprayError::InvalidConfiguration`] if the coefficients are invalid.
pub fn create_atomization_model(
    config: &AtomizationConfig,
) -> Result<Box<dyn AtomizationModel>, SprayError> {
    Ok(match config {
        AtomizationConfig::Uniform(coeffs) => Box::new(UniformAtomization::new(*coeffs)?),
        AtomizationConfig::BlobsSheet(coeffs) => Box::new(BlobsSheetAtomization::new(*coeffs)?),
        AtomizationConfig::Lisa(coeffs) => Box::new(LisaAtomization::new(*coeffs)?),
    })
}

fn seed_is_finite(seed: &ParcelSeed) -> bool {
    seed.diameter.is_finite()
        && seed.diameter > 0.0
        && seed.mass.is_finite()
        && seed.mass >= 0.0
        && seed.position.iter().all(|v| v.is_finite())
        && seed.velocity.iter().all(|v| v.is_finite())
}

/// Mass carried by each parcel when the event mass is split evenly
pub(crate) fn parcel_mass(event: &InjectionEvent) -> f32 {
    event.total_mass() / event.parcels as f32
}

/// Two unit vectors spanning the plane normal to `axis`
fn orthonormal_basis(axis: &Vec3) -> (Vec3, Vec3) {
    let helper = if axis.x.abs() < 0.9 { Vec3::x() } else { Vec3::y() };
    let e1 = axis.cross(&helper).normalize();
    let e2 = axis.cross(&e1);
    (e1, e2)
}

/// Direction at polar angle `theta` from `axis` and azimuth `phi`
fn direction_from_angles(axis: &Vec3, theta: f32, phi: f32) -> Vec3 {
    let (e1, e2) = orthonormal_basis(axis);
    let radial = e1 * phi.cos() + e2 * phi.sin();
    (*axis * theta.cos() + radial * theta.sin()).normalize()
}

/// Direction uniformly distributed over the solid cone of half-angle `half_angle` (rad)
pub(crate) fn sample_solid_cone(axis: &Vec3, half_angle: f32, rng: &mut dyn RngCore) -> Vec3 {
    let u: f32 = rng.random();
    let v: f32 = rng.random();
    let cos_theta = 1.0 - u * (1.0 - half_angle.cos());
    direction_from_angles(axis, cos_theta.clamp(-1.0, 1.0).acos(), 2.0 * PI * v)
}

/// Direction on the surface of the hollow cone of half-angle `half_angle` (rad)
pub(crate) fn sample_hollow_cone(axis: &Vec3, half_angle: f32, rng: &mut dyn RngCore) -> Vec3 {
    let v: f32 = rng.random();
    direction_from_angles(axis, half_angle, 2.0 * PI * v)
}
