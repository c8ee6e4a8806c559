//! Spray physics: droplet formation, breakup and motion
//!
//! Each sub-model is a trait with a small set of interchangeable variants,
//! selected at run time from the cloud configuration.

pub mod atomization;
pub mod breakup;
pub mod dimensionless;
pub mod size_distribution;
pub mod trajectory;

pub use atomization::{create_atomization_model, AtomizationModel};
pub use breakup::{create_breakup_model, BreakupContext, BreakupModel, BreakupOutcome};
pub use size_distribution::RosinRammler;
pub use trajectory::{DragIntegrator, TrajectoryIntegrator};
