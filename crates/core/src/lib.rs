//! Spray Cloud Core Library
//!
//! Lagrangian spray modelling for liquid fuel injection: a cloud of parcels,
//! each standing for many identical droplets, tracked through a gas field
//! supplied by a host CFD solver.
//!
//! ## Structure
//!
//! - [`SprayCloud`] owns the parcel population, one atomization model, one
//!   breakup model, the average parcel mass and an optional [`CloudCopy`]
//!   snapshot
//! - [`physics::atomization`] turns injection events into new parcels
//!   (uniform, blob, LISA sheet atomization)
//! - [`physics::breakup`] splits existing droplets (Reitz-Diwakar, KH-RT, TAB)
//! - [`SpraySimulation`] runs the per-timestep sequence over several clouds in
//!   parallel
//!
//! ## Example
//!
//! ```
//! use spray_core::{
//!     DragIntegrator, FlowState, InjectionEvent, SprayCloud, SprayCloudConfig, UniformFlow,
//!     Vec3,
//! };
//!
//! let mut cloud = SprayCloud::new(&SprayCloudConfig::default())?;
//! let gas = UniformFlow::new(FlowState::quiescent_air().with_density(20.0));
//!
//! let event = InjectionEvent {
//!     id: 0,
//!     position: Vec3::zeros(),
//!     direction: Vec3::new(0.0, 0.0, -1.0),
//!     mass_flow_rate: 5.0e-3,
//!     duration: 1.0e-5,
//!     injection_speed: 300.0,
//!     nozzle_diameter: 180.0e-6,
//!     parcels: 50,
//! };
//! cloud.inject(&event, &gas)?;
//! cloud.evolve(&DragIntegrator::default(), &gas, 1.0e-6)?;
//!
//! let report = cloud.apply_breakup(&gas, 1.0e-6)?;
//! cloud.insert_children(report);
//! cloud.take_snapshot();
//!
//! assert_eq!(cloud.cloud_copy()?.len(), cloud.len());
//! # Ok::<(), spray_core::SprayError>(())
//! ```

pub mod cloud;
pub mod config;
pub mod core_types;
pub mod error;
pub mod physics;
pub mod simulation;

pub use cloud::{BreakupReport, CloudCopy, CloudStatistics, ParcelPopulation, SprayCloud};
pub use config::{AtomizationConfig, BreakupConfig, SprayCloudConfig};
pub use core_types::{
    FlowSampler, FlowState, InjectionEvent, LiquidProperties, Parcel, ParcelSeed, UniformFlow,
    Vec3,
};
pub use error::SprayError;
pub use physics::{
    AtomizationModel, BreakupContext, BreakupModel, BreakupOutcome, DragIntegrator,
    TrajectoryIntegrator,
};
pub use simulation::{CloudInjection, CloudStepSummary, SpraySimulation, StepSummary};
