//! Timestep driver for a set of spray clouds
//!
//! `SpraySimulation` owns one [`SprayCloud`] per injector (or per mesh
//! partition) and runs the per-timestep sequence on each of them:
//!
//! 1. atomize the injection events addressed to the cloud
//! 2. integrate parcel trajectories
//! 3. apply breakup in `breakup_substeps` sub-steps, inserting the children
//!    after each sub-step
//! 4. optionally take a cloud copy
//!
//! Clouds share nothing, so they are updated in parallel.

use crate::cloud::{check_timestep, SprayCloud};
use crate::config::SprayCloudConfig;
use crate::core_types::{FlowSampler, InjectionEvent};
use crate::error::SprayError;
use crate::physics::TrajectoryIntegrator;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// An injection event addressed to one cloud
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudInjection {
    /// Index of the target cloud
    pub cloud: usize,
    pub event: InjectionEvent,
}

/// Per-cloud outcome of one timestep
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CloudStepSummary {
    /// Parcels created by atomization
    pub injected: usize,
    /// Child parcels created by breakup
    pub children: usize,
    /// Parcels in the cloud after the step
    pub parcels: usize,
    /// Liquid mass in the cloud after the step (kg)
    pub total_mass: f32,
}

/// Outcome of one timestep over all clouds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepSummary {
    /// Simulation time after the step (s)
    pub time: f32,
    pub clouds: Vec<CloudStepSummary>,
}

impl StepSummary {
    pub fn injected(&self) -> usize {
        self.clouds.iter().map(|c| c.injected).sum()
    }

    pub fn children(&self) -> usize {
        self.clouds.iter().map(|c| c.children).sum()
    }

    pub fn parcels(&self) -> usize {
        self.clouds.iter().map(|c| c.parcels).sum()
    }

    pub fn total_mass(&self) -> f32 {
        self.clouds.iter().map(|c| c.total_mass).sum()
    }
}

/// Multi-cloud spray simulation driven by an external flow field
pub struct SpraySimulation {
    clouds: Vec<SprayCloud>,
    sampler: Box<dyn FlowSampler>,
    integrator: Box<dyn TrajectoryIntegrator>,
    breakup_substeps: u32,
    snapshot_each_step: bool,
    time: f32,
}

impl SpraySimulation {
    /// Create a simulation without clouds
    ///
    /// # Arguments
    ///
    /// * `sampler` - Source of the local gas state
    /// * `integrator` - Parcel trajectory integrator
    pub fn new(sampler: Box<dyn FlowSampler>, integrator: Box<dyn TrajectoryIntegrator>) -> Self {
        info!("Creating spray simulation");
        Self {
            clouds: Vec::new(),
            sampler,
            integrator,
            breakup_substeps: 1,
            snapshot_each_step: false,
            time: 0.0,
        }
    }

    /// Build a cloud from `config` and add it; returns its index
    ///
    /// # Errors
    /// Returns [`SprayError::InvalidConfiguration`] if the cloud cannot be built.
    pub fn add_cloud(&mut self, config: &SprayCloudConfig) -> Result<usize, SprayError> {
        let cloud = SprayCloud::new(config)?;
        self.clouds.push(cloud);
        Ok(self.clouds.len() - 1)
    }

    /// Split each breakup pass into `substeps` equal sub-steps
    ///
    /// # Errors
    /// Returns [`SprayError::InvalidConfiguration`] for zero sub-steps.
    pub fn set_breakup_substeps(&mut self, substeps: u32) -> Result<(), SprayError> {
        if substeps == 0 {
            return Err(SprayError::invalid_configuration(
                "spray simulation",
                "breakup sub-steps must be at least 1",
            ));
        }
        self.breakup_substeps = substeps;
        Ok(())
    }

    /// Take a cloud copy of every cloud at the end of each step
    pub fn set_snapshot_each_step(&mut self, enabled: bool) {
        self.snapshot_each_step = enabled;
    }

    pub fn clouds(&self) -> &[SprayCloud] {
        &self.clouds
    }

    pub fn cloud(&self, index: usize) -> Option<&SprayCloud> {
        self.clouds.get(index)
    }

    pub fn cloud_mut(&mut self, index: usize) -> Option<&mut SprayCloud> {
        self.clouds.get_mut(index)
    }

    /// Simulation time (s)
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Advance every cloud by `dt`
    ///
    /// # Errors
    /// - [`SprayError::InvalidConfiguration`] for an invalid `dt`, an invalid
    ///   injection event or an injection addressed to a missing cloud. These
    ///   are all checked before any cloud is touched.
    /// - [`SprayError::InvalidParcelState`] from a failed breakup pass
    ///
    /// Each cloud update is all-or-nothing per operation, but clouds are
    /// independent: when one cloud fails a breakup pass, others may already
    /// have advanced.
    pub fn update(
        &mut self,
        dt: f32,
        injections: &[CloudInjection],
    ) -> Result<StepSummary, SprayError> {
        check_timestep("spray simulation", dt)?;
        for injection in injections {
            injection.event.validate()?;
        }
        if let Some(stray) = injections.iter().find(|i| i.cloud >= self.clouds.len()) {
            return Err(SprayError::invalid_configuration(
                "spray simulation",
                format!(
                    "injection event {} targets cloud {} but only {} clouds exist",
                    stray.event.id,
                    stray.cloud,
                    self.clouds.len()
                ),
            ));
        }

        let sampler = self.sampler.as_ref();
        let integrator = self.integrator.as_ref();
        let plan = StepPlan {
            dt,
            breakup_substeps: self.breakup_substeps,
            snapshot: self.snapshot_each_step,
        };

        let clouds = self
            .clouds
            .par_iter_mut()
            .enumerate()
            .map(|(index, cloud)| {
                let events: Vec<&InjectionEvent> = injections
                    .iter()
                    .filter(|i| i.cloud == index)
                    .map(|i| &i.event)
                    .collect();
                step_cloud(cloud, &events, sampler, integrator, &plan)
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.time += dt;
        let summary = StepSummary {
            time: self.time,
            clouds,
        };
        debug!(
            "Spray step: t={:.3e}s, injected={}, children={}, parcels={}",
            summary.time,
            summary.injected(),
            summary.children(),
            summary.parcels()
        );
        Ok(summary)
    }
}

/// Settings shared by every cloud in one step
#[derive(Debug, Clone, Copy)]
pub(crate) struct StepPlan {
    pub dt: f32,
    pub breakup_substeps: u32,
    pub snapshot: bool,
}

/// Run one timestep on a single cloud
pub(crate) fn step_cloud(
    cloud: &mut SprayCloud,
    events: &[&InjectionEvent],
    sampler: &dyn FlowSampler,
    integrator: &dyn TrajectoryIntegrator,
    plan: &StepPlan,
) -> Result<CloudStepSummary, SprayError> {
    let mut injected = 0;
    for event in events {
        injected += cloud.inject(event, sampler)?;
    }

    cloud.evolve(integrator, sampler, plan.dt)?;

    let sub_dt = plan.dt / plan.breakup_substeps as f32;
    let mut children = 0;
    for _ in 0..plan.breakup_substeps {
        let report = cloud.apply_breakup(sampler, sub_dt)?;
        children += cloud.insert_children(report);
    }

    if plan.snapshot {
        cloud.take_snapshot();
    }

    Ok(CloudStepSummary {
        injected,
        children,
        parcels: cloud.len(),
        total_mass: cloud.total_mass(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::{FlowState, UniformFlow, Vec3};
    use crate::physics::DragIntegrator;

    fn simulation() -> SpraySimulation {
        SpraySimulation::new(
            Box::new(UniformFlow::new(FlowState::quiescent_air())),
            Box::new(DragIntegrator::default()),
        )
    }

    fn event() -> InjectionEvent {
        InjectionEvent {
            id: 7,
            position: Vec3::zeros(),
            direction: Vec3::new(0.0, 0.0, -1.0),
            mass_flow_rate: 1.0e-3,
            duration: 1.0e-4,
            injection_speed: 50.0,
            nozzle_diameter: 150.0e-6,
            parcels: 10,
        }
    }

    #[test]
    fn test_injection_to_missing_cloud_is_rejected() {
        let mut sim = simulation();
        sim.add_cloud(&SprayCloudConfig::default()).unwrap();
        let result = sim.update(1.0e-5, &[CloudInjection { cloud: 3, event: event() }]);
        assert!(matches!(result, Err(SprayError::InvalidConfiguration { .. })));
        assert_eq!(sim.time(), 0.0);
        assert!(sim.cloud(0).unwrap().is_empty());
    }

    #[test]
    fn test_bad_timestep_rejected_before_injecting() {
        let mut sim = simulation();
        sim.add_cloud(&SprayCloudConfig::default()).unwrap();
        let result = sim.update(-1.0, &[CloudInjection { cloud: 0, event: event() }]);
        assert!(matches!(result, Err(SprayError::InvalidConfiguration { .. })));

        let cloud = sim.cloud(0).unwrap();
        assert!(cloud.is_empty());
        assert_eq!(cloud.step(), 0);
        assert_eq!(sim.time(), 0.0);
    }

    #[test]
    fn test_later_bad_event_rejects_whole_step() {
        let mut sim = simulation();
        sim.add_cloud(&SprayCloudConfig::default()).unwrap();
        let mut bad = event();
        bad.id = 2;
        bad.mass_flow_rate = -1.0;
        let result = sim.update(
            1.0e-6,
            &[
                CloudInjection { cloud: 0, event: event() },
                CloudInjection { cloud: 0, event: bad },
            ],
        );

        match result {
            Err(SprayError::InvalidConfiguration { context, .. }) => {
                assert_eq!(context, "injection event 2");
            }
            other => panic!("expected an invalid injection, got {other:?}"),
        }
        assert!(sim.cloud(0).unwrap().is_empty());
        assert_eq!(sim.time(), 0.0);
    }

    #[test]
    fn test_zero_substeps_rejected() {
        let mut sim = simulation();
        assert!(sim.set_breakup_substeps(0).is_err());
        assert!(sim.set_breakup_substeps(4).is_ok());
    }

    #[test]
    fn test_step_injects_and_snapshots() {
        let mut sim = simulation();
        sim.add_cloud(&SprayCloudConfig::default()).unwrap();
        sim.set_snapshot_each_step(true);

        let summary = sim
            .update(1.0e-6, &[CloudInjection { cloud: 0, event: event() }])
            .unwrap();

        assert_eq!(summary.injected(), 10);
        assert!(summary.parcels() >= 10);
        let cloud = sim.cloud(0).unwrap();
        assert_eq!(cloud.cloud_copy().unwrap().len(), cloud.len());
        assert_eq!(cloud.cloud_copy().unwrap().step(), 1);
    }
}
