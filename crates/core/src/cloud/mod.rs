//! Spray cloud: parcel population plus its atomization and breakup models
//!
//! A [`SprayCloud`] owns exactly one atomization model and one breakup model,
//! both chosen once from the [`SprayCloudConfig`] and kept for the life of the
//! cloud. Their coefficients can be changed through the mutable accessors; the
//! models themselves cannot be swapped out.
//!
//! # Timestep
//!
//! ```text
//! inject (atomization) → evolve (trajectories) → apply_breakup → insert_children → take_snapshot
//! ```
//! Every step that changes the population recomputes the average parcel mass
//! before returning, so [`SprayCloud::average_parcel_mass`] is never stale.
//!
//! # Cloud copy
//!
//! [`SprayCloud::take_snapshot`] stores a deep copy of the parcels together with
//! their statistics. The copy stays until the next snapshot replaces it.

mod copy;
mod population;
pub mod statistics;

pub use copy::CloudCopy;
pub use population::ParcelPopulation;
pub use statistics::CloudStatistics;

use crate::config::SprayCloudConfig;
use crate::core_types::{FlowSampler, InjectionEvent, LiquidProperties, Parcel, ParcelSeed, Vec3};
use crate::error::SprayError;
use crate::physics::{
    create_atomization_model, create_breakup_model, AtomizationModel, BreakupContext,
    BreakupModel, BreakupOutcome, TrajectoryIntegrator,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use tracing::{debug, error, info, warn};

/// Result of one breakup pass over the population
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BreakupReport {
    /// Parcels evaluated
    pub evaluated: usize,
    /// Parcels whose droplets changed size or shed mass
    pub broken: usize,
    /// Child parcels waiting for [`SprayCloud::insert_children`]
    pub children: Vec<ParcelSeed>,
}

impl BreakupReport {
    /// Total mass carried by the children (kg)
    pub fn child_mass(&self) -> f32 {
        self.children.iter().map(|c| c.mass).sum()
    }
}

/// A cloud of Lagrangian spray parcels
#[derive(Debug)]
pub struct SprayCloud {
    name: String,
    liquid: LiquidProperties,
    atomization: Box<dyn AtomizationModel>,
    breakup: Box<dyn BreakupModel>,
    population: ParcelPopulation,
    average_parcel_mass: f32,
    cloud_copy: Option<CloudCopy>,
    rng: StdRng,
    time: f32,
    step: u64,
}

impl SprayCloud {
    /// Create an empty cloud with the models selected by `config`
    ///
    /// # Errors
    /// Returns [`SprayError::InvalidConfiguration`] if the configuration or any
    /// model coefficient is invalid. No partially built cloud is returned.
    pub fn new(config: &SprayCloudConfig) -> Result<Self, SprayError> {
        config.validate()?;
        let atomization = create_atomization_model(&config.atomization)?;
        let breakup = create_breakup_model(&config.breakup)?;

        info!(
            "Creating spray cloud '{}': atomization={}, breakup={}, seed={}",
            config.name,
            atomization.name(),
            breakup.name(),
            config.seed
        );

        Ok(Self {
            name: config.name.clone(),
            liquid: config.liquid,
            atomization,
            breakup,
            population: ParcelPopulation::new(),
            average_parcel_mass: 0.0,
            cloud_copy: None,
            rng: StdRng::seed_from_u64(config.seed),
            time: 0.0,
            step: 0,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn liquid(&self) -> &LiquidProperties {
        &self.liquid
    }

    // ------------------------------------------------------------------
    // Model accessors
    // ------------------------------------------------------------------

    /// The atomization model
    pub fn atomization(&self) -> &dyn AtomizationModel {
        self.atomization.as_ref()
    }

    /// The atomization model, for coefficient changes
    pub fn atomization_mut(&mut self) -> &mut dyn AtomizationModel {
        self.atomization.as_mut()
    }

    /// The breakup model
    pub fn breakup(&self) -> &dyn BreakupModel {
        self.breakup.as_ref()
    }

    /// The breakup model, for coefficient changes
    pub fn breakup_mut(&mut self) -> &mut dyn BreakupModel {
        self.breakup.as_mut()
    }

    /// Mean mass of the parcels currently in the cloud (kg), 0 when empty
    pub fn average_parcel_mass(&self) -> f32 {
        self.average_parcel_mass
    }

    // ------------------------------------------------------------------
    // Cloud copy
    // ------------------------------------------------------------------

    /// The most recent snapshot
    ///
    /// # Errors
    /// Returns [`SprayError::NoSnapshot`] if no snapshot was ever taken.
    pub fn cloud_copy(&self) -> Result<&CloudCopy, SprayError> {
        self.cloud_copy.as_ref().ok_or(SprayError::NoSnapshot)
    }

    pub fn has_cloud_copy(&self) -> bool {
        self.cloud_copy.is_some()
    }

    /// Store a deep copy of the current state, replacing any previous copy
    pub fn take_snapshot(&mut self) -> &CloudCopy {
        // The old copy goes first so two are never alive at once
        self.cloud_copy = None;
        let copy = CloudCopy::capture(
            self.population.as_slice(),
            self.time,
            self.step,
            self.atomization.name(),
            self.breakup.name(),
        );
        info!(
            "Cloud '{}': snapshot at t={:.3e}s (step {}), {} parcels, {:.4e} kg",
            self.name,
            self.time,
            self.step,
            copy.len(),
            copy.total_mass()
        );
        self.cloud_copy.insert(copy)
    }

    /// Reset the parcels, time and step counter to the snapshot
    ///
    /// The snapshot itself stays in place. Parcels added after the snapshot
    /// disappear; their ids are not reused.
    ///
    /// # Errors
    /// Returns [`SprayError::NoSnapshot`] if no snapshot was ever taken.
    pub fn restore_state(&mut self) -> Result<(), SprayError> {
        let copy = self.cloud_copy.as_ref().ok_or(SprayError::NoSnapshot)?;
        self.population.replace(copy.parcels().to_vec());
        self.time = copy.time();
        self.step = copy.step();
        self.refresh_statistics();
        info!(
            "Cloud '{}': restored {} parcels from snapshot at step {}",
            self.name,
            self.population.len(),
            self.step
        );
        Ok(())
    }

    /// Live total mass minus snapshot total mass (kg)
    ///
    /// # Errors
    /// Returns [`SprayError::NoSnapshot`] if no snapshot was ever taken.
    pub fn mass_change_since_snapshot(&self) -> Result<f32, SprayError> {
        let copy = self.cloud_copy()?;
        Ok(self.total_mass() - copy.total_mass())
    }

    // ------------------------------------------------------------------
    // Population updates
    // ------------------------------------------------------------------

    /// Atomize one injection event into new parcels
    ///
    /// Returns the number of parcels added.
    ///
    /// # Errors
    /// Returns [`SprayError::InvalidConfiguration`] for an invalid event. The
    /// population is unchanged on error.
    pub fn inject(
        &mut self,
        event: &InjectionEvent,
        sampler: &dyn FlowSampler,
    ) -> Result<usize, SprayError> {
        let flow = sampler.sample(&event.position);
        let seeds = self
            .atomization
            .atomize(event, &flow, &self.liquid, &mut self.rng)?;
        Ok(self.add_parcels(seeds))
    }

    /// Insert parcels built from `seeds` and return how many were added
    pub fn add_parcels<I>(&mut self, seeds: I) -> usize
    where
        I: IntoIterator<Item = ParcelSeed>,
    {
        let before = self.population.len();
        for seed in seeds {
            self.population.insert(seed);
        }
        let added = self.population.len() - before;
        if added > 0 {
            self.refresh_statistics();
        }
        added
    }

    /// Move every parcel through the gas over `dt`
    ///
    /// Parcels are independent, so they are integrated in parallel.
    ///
    /// # Errors
    /// Returns [`SprayError::InvalidConfiguration`] for a negative or
    /// non-finite `dt`.
    pub fn evolve(
        &mut self,
        integrator: &dyn TrajectoryIntegrator,
        sampler: &dyn FlowSampler,
        dt: f32,
    ) -> Result<(), SprayError> {
        check_timestep(&self.name, dt)?;

        let liquid = self.liquid;
        self.population.as_mut_slice().par_iter_mut().for_each(|parcel| {
            let flow = sampler.sample(&parcel.position);
            integrator.advance(parcel, &flow, &liquid, dt);
        });

        self.time += dt;
        self.step += 1;
        self.refresh_statistics();

        debug!(
            "Cloud '{}': evolved to t={:.3e}s (step {}), {} parcels",
            self.name,
            self.time,
            self.step,
            self.population.len()
        );
        Ok(())
    }

    /// Run the breakup model over every parcel for a sub-step of length `dt`
    ///
    /// All parcels are evaluated first; the updated parents are committed only
    /// if every evaluation succeeded. Children are returned, not inserted.
    ///
    /// # Errors
    /// - [`SprayError::InvalidParcelState`] if a parcel is corrupt or the model
    ///   violated mass balance
    /// - [`SprayError::InvalidConfiguration`] for a negative `dt`
    ///
    /// The cloud is unchanged on error.
    pub fn apply_breakup(
        &mut self,
        sampler: &dyn FlowSampler,
        dt: f32,
    ) -> Result<BreakupReport, SprayError> {
        check_timestep(&self.name, dt)?;

        let ctx = BreakupContext {
            liquid: self.liquid,
            average_parcel_mass: self.average_parcel_mass,
        };
        let model = self.breakup.as_ref();

        let outcomes: Result<Vec<BreakupOutcome>, SprayError> = self
            .population
            .as_slice()
            .par_iter()
            .map(|parcel| {
                let flow = sampler.sample(&parcel.position);
                model.evaluate(parcel, &flow, &ctx, dt)
            })
            .collect();

        let outcomes = match outcomes {
            Ok(outcomes) => outcomes,
            Err(e) => {
                error!("Cloud '{}': breakup pass rejected: {}", self.name, e);
                return Err(e);
            }
        };

        let mut report = BreakupReport {
            evaluated: outcomes.len(),
            ..BreakupReport::default()
        };
        for (slot, outcome) in self.population.as_mut_slice().iter_mut().zip(outcomes) {
            if outcome.broke_up {
                report.broken += 1;
            }
            *slot = outcome.parent;
            report.children.extend(outcome.children);
        }
        self.refresh_statistics();

        debug!(
            "Cloud '{}': {} model, {}/{} parcels broke up, {} children ({:.3e} kg)",
            self.name,
            self.breakup.name(),
            report.broken,
            report.evaluated,
            report.children.len(),
            report.child_mass()
        );
        Ok(report)
    }

    /// Insert the children produced by a breakup pass
    pub fn insert_children(&mut self, report: BreakupReport) -> usize {
        self.add_parcels(report.children)
    }

    /// Remove one parcel by id
    pub fn remove_parcel(&mut self, id: u64) -> Option<Parcel> {
        let removed = self.population.remove(id);
        if removed.is_some() {
            self.refresh_statistics();
        } else {
            warn!("Cloud '{}': no parcel with id {} to remove", self.name, id);
        }
        removed
    }

    /// Keep only the parcels for which `keep` returns true
    ///
    /// Returns the number of parcels removed.
    pub fn retain_parcels<F>(&mut self, keep: F) -> usize
    where
        F: FnMut(&Parcel) -> bool,
    {
        let removed = self.population.retain(keep);
        if removed > 0 {
            self.refresh_statistics();
        }
        removed
    }

    // ------------------------------------------------------------------
    // Statistics
    // ------------------------------------------------------------------

    pub fn parcels(&self) -> &[Parcel] {
        self.population.as_slice()
    }

    pub fn parcel(&self, id: u64) -> Option<&Parcel> {
        self.population.get(id)
    }

    pub fn population(&self) -> &ParcelPopulation {
        &self.population
    }

    pub fn len(&self) -> usize {
        self.population.len()
    }

    pub fn is_empty(&self) -> bool {
        self.population.is_empty()
    }

    /// Total liquid mass in the cloud (kg)
    pub fn total_mass(&self) -> f32 {
        self.population.total_mass()
    }

    /// Cloud time (s)
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Completed timesteps
    pub fn step(&self) -> u64 {
        self.step
    }

    /// Droplet-count weighted mean diameter `D_ij` (m)
    ///
    /// # Errors
    /// Returns [`SprayError::InvalidConfiguration`] when `i == j`.
    pub fn mean_diameter(&self, i: u8, j: u8) -> Result<f32, SprayError> {
        statistics::mean_diameter(self.parcels(), &self.liquid, i, j)
    }

    /// Largest droplet diameter in the cloud (m)
    pub fn max_diameter(&self) -> f32 {
        statistics::max_diameter(self.parcels())
    }

    /// Distance from `origin` containing `fraction` of the liquid mass (m)
    ///
    /// # Errors
    /// Returns [`SprayError::InvalidConfiguration`] unless `0 < fraction <= 1`.
    pub fn penetration(&self, fraction: f32, origin: &Vec3) -> Result<f32, SprayError> {
        statistics::penetration(self.parcels(), fraction, origin)
    }

    pub fn statistics(&self) -> CloudStatistics {
        statistics::summarize(self.parcels(), &self.liquid)
    }

    /// Log the cloud statistics and return them
    pub fn info(&self) -> CloudStatistics {
        let stats = self.statistics();
        info!(
            "Cloud '{}': t={:.3e}s, {} parcels, mass={:.4e} kg, avg parcel mass={:.4e} kg, \
             D10={:.2}um, D32={:.2}um, Dmax={:.2}um",
            self.name,
            self.time,
            stats.parcels,
            stats.total_mass,
            stats.average_parcel_mass,
            stats.d10 * 1.0e6,
            stats.d32 * 1.0e6,
            stats.max_diameter * 1.0e6
        );
        stats
    }

    fn refresh_statistics(&mut self) {
        self.average_parcel_mass = statistics::average_parcel_mass(self.population.as_slice());
    }
}

pub(crate) fn check_timestep(context: &str, dt: f32) -> Result<(), SprayError> {
    if dt.is_finite() && dt >= 0.0 {
        Ok(())
    } else {
        Err(SprayError::invalid_configuration(
            context,
            format!("timestep must be finite and non-negative, got {dt}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AtomizationConfig, BreakupConfig};
    use crate::core_types::{FlowState, UniformFlow};
    use crate::physics::atomization::UniformCoeffs;
    use crate::physics::breakup::ReitzDiwakarCoeffs;
    use crate::physics::DragIntegrator;
    use approx::assert_relative_eq;

    fn config() -> SprayCloudConfig {
        SprayCloudConfig {
            atomization: AtomizationConfig::Uniform(UniformCoeffs {
                diameter: Some(50.0e-6),
            }),
            breakup: BreakupConfig::ReitzDiwakar(ReitzDiwakarCoeffs::default()),
            ..SprayCloudConfig::default()
        }
    }

    fn event(parcels: usize) -> InjectionEvent {
        InjectionEvent {
            id: 1,
            position: Vec3::zeros(),
            direction: Vec3::x(),
            mass_flow_rate: 1.0e-3,
            duration: 1.0e-3,
            injection_speed: 100.0,
            nozzle_diameter: 200.0e-6,
            parcels,
        }
    }

    fn still_air() -> UniformFlow {
        UniformFlow::new(FlowState::quiescent_air())
    }

    #[test]
    fn test_cloud_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SprayCloud>();
    }

    #[test]
    fn test_new_cloud_is_empty() {
        let cloud = SprayCloud::new(&config()).unwrap();
        assert!(cloud.is_empty());
        assert_eq!(cloud.average_parcel_mass(), 0.0);
        assert_eq!(cloud.atomization().name(), "uniform");
        assert_eq!(cloud.breakup().name(), "reitzDiwakar");
        assert_eq!(cloud.cloud_copy().unwrap_err(), SprayError::NoSnapshot);
    }

    #[test]
    fn test_invalid_coefficients_fail_construction() {
        let bad = SprayCloudConfig {
            breakup: BreakupConfig::ReitzDiwakar(ReitzDiwakarCoeffs {
                c_bag: -1.0,
                ..ReitzDiwakarCoeffs::default()
            }),
            ..config()
        };
        assert!(matches!(
            SprayCloud::new(&bad),
            Err(SprayError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_injection_updates_average_mass() {
        let mut cloud = SprayCloud::new(&config()).unwrap();
        let added = cloud.inject(&event(20), &still_air()).unwrap();
        assert_eq!(added, 20);
        assert_relative_eq!(cloud.total_mass(), 1.0e-6, max_relative = 1e-5);
        assert_relative_eq!(cloud.average_parcel_mass(), 5.0e-8, max_relative = 1e-5);
    }

    #[test]
    fn test_invalid_injection_leaves_cloud_untouched() {
        let mut cloud = SprayCloud::new(&config()).unwrap();
        cloud.inject(&event(5), &still_air()).unwrap();

        let mut bad = event(5);
        bad.mass_flow_rate = -1.0;
        assert!(cloud.inject(&bad, &still_air()).is_err());
        assert_eq!(cloud.len(), 5);
    }

    #[test]
    fn test_coefficients_change_through_mutable_view() {
        let mut cloud = SprayCloud::new(&config()).unwrap();
        cloud.breakup_mut().set_coefficient("cBag", 8.0).unwrap();
        assert_eq!(cloud.breakup().coefficient("cBag"), Some(8.0));
        assert_eq!(cloud.breakup().name(), "reitzDiwakar");
    }

    #[test]
    fn test_failed_breakup_pass_commits_nothing() {
        let mut cloud = SprayCloud::new(&config()).unwrap();
        cloud.inject(&event(10), &still_air()).unwrap();
        let before = cloud.parcels().to_vec();

        assert!(cloud.apply_breakup(&still_air(), -1.0).is_err());
        assert_eq!(cloud.parcels(), before.as_slice());
    }

    #[test]
    fn test_negative_breakup_timestep_rejected_on_empty_cloud() {
        let mut cloud = SprayCloud::new(&config()).unwrap();
        let result = cloud.apply_breakup(&still_air(), -1.0);
        assert!(matches!(result, Err(SprayError::InvalidConfiguration { .. })));
        assert!(cloud.apply_breakup(&still_air(), f32::INFINITY).is_err());
        assert_eq!(cloud.apply_breakup(&still_air(), 0.0).unwrap().evaluated, 0);
    }

    #[test]
    fn test_evolve_moves_parcels_and_counts_steps() {
        let mut cloud = SprayCloud::new(&config()).unwrap();
        cloud.inject(&event(10), &still_air()).unwrap();
        cloud
            .evolve(&DragIntegrator::without_gravity(), &still_air(), 1.0e-5)
            .unwrap();

        assert_eq!(cloud.step(), 1);
        assert_relative_eq!(cloud.time(), 1.0e-5);
        assert!(cloud.parcels().iter().all(|p| p.position.x > 0.0));
        assert!(cloud.evolve(&DragIntegrator::default(), &still_air(), f32::NAN).is_err());
    }

    #[test]
    fn test_remove_unknown_parcel() {
        let mut cloud = SprayCloud::new(&config()).unwrap();
        cloud.inject(&event(3), &still_air()).unwrap();
        assert!(cloud.remove_parcel(99).is_none());
        assert_eq!(cloud.len(), 3);
    }

    #[test]
    fn test_restore_state_brings_back_snapshot() {
        let mut cloud = SprayCloud::new(&config()).unwrap();
        cloud.inject(&event(10), &still_air()).unwrap();
        cloud.take_snapshot();

        cloud.retain_parcels(|p| p.id() % 2 == 0);
        cloud.inject(&event(4), &still_air()).unwrap();
        assert_eq!(cloud.len(), 9);

        cloud.restore_state().unwrap();
        assert_eq!(cloud.len(), 10);
        assert_eq!(cloud.parcels(), cloud.cloud_copy().unwrap().parcels());
        assert_relative_eq!(cloud.mass_change_since_snapshot().unwrap(), 0.0);
        assert!(cloud.has_cloud_copy());
    }
}
