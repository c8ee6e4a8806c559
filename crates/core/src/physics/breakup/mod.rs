//! Secondary breakup models
//!
//! A breakup model looks at one parcel, the gas around it and a sub-step
//! length, and returns the updated parcel together with any child parcels it
//! sheds. Evaluation is pure; the cloud decides when to commit the result and
//! when to insert the children.
//!
//! # Invariants
//!
//! - Mass conservation: parent mass after plus children mass equals parent
//!   mass before
//! - No change for a zero-length sub-step
//! - Degenerate input (zero relative velocity, zero diameter, zero mass)
//!   returns the parcel unchanged with no children
//! - Corrupt input (negative or non-finite diameter/mass) is an error, never
//!   silently repaired
//!
//! # Variants
//!
//! - [`NoBreakup`] - parcels never break up
//! - [`ReitzDiwakar`] - bag and stripping regimes
//! - [`ReitzKhrt`] - Kelvin-Helmholtz stripping with Rayleigh-Taylor catastrophic breakup
//! - [`Tab`] - Taylor analogy breakup oscillator
//!
//! # References
//!
//! - Reitz, R.D., Diwakar, R. (1987). "Structure of high-pressure fuel sprays."
//!   SAE Technical Paper 870598.
//! - Beale, J.C., Reitz, R.D. (1999). "Modeling spray atomization with the
//!   Kelvin-Helmholtz/Rayleigh-Taylor hybrid model." Atomization and Sprays, 9, 623-650.
//! - O'Rourke, P.J., Amsden, A.A. (1987). "The TAB method for numerical calculation of
//!   spray droplet breakup." SAE Technical Paper 872089.

mod none;
mod reitz_diwakar;
mod reitz_khrt;
mod tab;

pub use none::NoBreakup;
pub use reitz_diwakar::{ReitzDiwakar, ReitzDiwakarCoeffs};
pub use reitz_khrt::{ReitzKhrt, ReitzKhrtCoeffs};
pub use tab::{Tab, TabCoeffs};

use crate::config::BreakupConfig;
use crate::core_types::{FlowState, LiquidProperties, Parcel, ParcelSeed};
use crate::error::SprayError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Relative tolerance of the mass balance check on breakup results
pub const MASS_BALANCE_TOLERANCE: f32 = 1.0e-4;

/// Per-call context passed by the owning cloud
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreakupContext {
    pub liquid: LiquidProperties,
    /// Average parcel mass of the cloud at the start of the breakup pass (kg)
    pub average_parcel_mass: f32,
}

/// Result of one breakup evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct BreakupOutcome {
    /// Updated parent parcel
    pub parent: Parcel,
    /// Child parcels shed by the parent, not yet part of any population
    pub children: Vec<ParcelSeed>,
    /// Whether the droplet diameter changed or children were produced
    pub broke_up: bool,
}

impl BreakupOutcome {
    /// The parcel exactly as it was, no children
    pub fn unchanged(parcel: &Parcel) -> Self {
        Self {
            parent: parcel.clone(),
            children: Vec::new(),
            broke_up: false,
        }
    }

    /// Parent mass plus children mass (kg)
    pub fn total_mass(&self) -> f32 {
        self.parent.mass + self.children.iter().map(|c| c.mass).sum::<f32>()
    }
}

/// Pluggable secondary breakup policy
///
/// Implementors provide [`BreakupModel::update`] for a valid, non-degenerate
/// parcel; callers use [`BreakupModel::evaluate`], which enforces the
/// invariants listed in the module documentation.
pub trait BreakupModel: Send + Sync + fmt::Debug {
    /// Model name as used in case configuration
    fn name(&self) -> &'static str;

    /// Whether the model solves the droplet oscillation equation
    fn solves_oscillation(&self) -> bool {
        false
    }

    /// Variant-specific physics for a validated parcel
    ///
    /// Called with `dt > 0`, positive diameter and mass, and a non-zero
    /// relative velocity.
    fn update(
        &self,
        parcel: &Parcel,
        flow: &FlowState,
        ctx: &BreakupContext,
        dt: f32,
    ) -> BreakupOutcome;

    /// Current value of a named coefficient
    fn coefficient(&self, name: &str) -> Option<f32>;

    /// Change a named coefficient
    ///
    /// # Errors
    /// Returns [`SprayError::InvalidConfiguration`] for unknown names and
    /// out-of-range values. The model is unchanged on error.
    fn set_coefficient(&mut self, name: &str, value: f32) -> Result<(), SprayError>;

    /// Evaluate breakup of one parcel over a sub-step of length `dt`
    ///
    /// # Errors
    /// - [`SprayError::InvalidParcelState`] if the parcel is corrupt or the
    ///   model produced a non-physical or mass-violating result
    /// - [`SprayError::InvalidConfiguration`] for a negative or non-finite `dt`
    fn evaluate(
        &self,
        parcel: &Parcel,
        flow: &FlowState,
        ctx: &BreakupContext,
        dt: f32,
    ) -> Result<BreakupOutcome, SprayError> {
        parcel.validate()?;
        if !dt.is_finite() || dt < 0.0 {
            return Err(SprayError::invalid_configuration(
                self.name(),
                format!("breakup timestep must be finite and non-negative, got {dt}"),
            ));
        }

        let relative_speed = parcel.relative_velocity(&flow.velocity).norm();
        if dt == 0.0 || parcel.diameter == 0.0 || parcel.mass == 0.0 || relative_speed == 0.0 {
            return Ok(BreakupOutcome::unchanged(parcel));
        }

        let outcome = self.update(parcel, flow, ctx, dt);
        check_outcome(self.name(), parcel, &outcome)?;
        Ok(outcome)
    }
}

fn check_outcome(model: &str, before: &Parcel, outcome: &BreakupOutcome) -> Result<(), SprayError> {
    outcome.parent.validate()?;

    if let Some(child) = outcome.children.iter().find(|c| {
        !(c.diameter.is_finite() && c.diameter > 0.0 && c.mass.is_finite() && c.mass > 0.0)
    }) {
        return Err(SprayError::invalid_parcel_state(
            before.id(),
            format!("{model} produced a non-physical child parcel: {child:?}"),
        ));
    }

    let after = outcome.total_mass();
    if (after - before.mass).abs() > MASS_BALANCE_TOLERANCE * before.mass {
        return Err(SprayError::invalid_parcel_state(
            before.id(),
            format!(
                "{model} violated mass balance: {} kg before, {} kg after",
                before.mass, after
            ),
        ));
    }
    Ok(())
}

/// Build the breakup model selected by `config`
///
/// # Errors
/// Returns [`SprayError::InvalidConfiguration`] if the coefficients are invalid.
pub fn create_breakup_model(config: &BreakupConfig) -> Result<Box<dyn BreakupModel>, SprayError> {
    Ok(match config {
        BreakupConfig::None => Box::new(NoBreakup),
        BreakupConfig::ReitzDiwakar(coeffs) => Box::new(ReitzDiwakar::new(*coeffs)?),
        BreakupConfig::ReitzKhrt(coeffs) => Box::new(ReitzKhrt::new(*coeffs)?),
        BreakupConfig::Tab(coeffs) => Box::new(Tab::new(*coeffs)?),
    })
}

/// Reject an unknown coefficient name
pub(crate) fn unknown_coefficient(model: &str, name: &str) -> SprayError {
    SprayError::invalid_configuration(model, format!("unknown coefficient '{name}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::Vec3;

    #[derive(Debug)]
    struct LeakyModel;

    impl BreakupModel for LeakyModel {
        fn name(&self) -> &'static str {
            "leaky"
        }

        fn update(
            &self,
            parcel: &Parcel,
            _flow: &FlowState,
            _ctx: &BreakupContext,
            _dt: f32,
        ) -> BreakupOutcome {
            let mut parent = parcel.clone();
            parent.mass *= 0.5;
            BreakupOutcome {
                parent,
                children: Vec::new(),
                broke_up: true,
            }
        }

        fn coefficient(&self, _name: &str) -> Option<f32> {
            None
        }

        fn set_coefficient(&mut self, name: &str, _value: f32) -> Result<(), SprayError> {
            Err(unknown_coefficient(self.name(), name))
        }
    }

    fn parcel() -> Parcel {
        Parcel::from_seed(
            5,
            ParcelSeed::new(Vec3::zeros(), Vec3::new(100.0, 0.0, 0.0), 50.0e-6, 1.0e-6),
        )
    }

    fn ctx() -> BreakupContext {
        BreakupContext {
            liquid: LiquidProperties::DIESEL,
            average_parcel_mass: 1.0e-6,
        }
    }

    #[test]
    fn test_mass_violation_is_reported() {
        let result = LeakyModel.evaluate(&parcel(), &FlowState::quiescent_air(), &ctx(), 1.0e-6);
        assert!(matches!(
            result,
            Err(SprayError::InvalidParcelState { parcel_id: 5, .. })
        ));
    }

    #[test]
    fn test_degenerate_inputs_skip_the_model() {
        // LeakyModel would break mass balance if it ran
        let flow = FlowState::quiescent_air();

        let mut still = parcel();
        still.velocity = Vec3::zeros();
        let outcome = LeakyModel.evaluate(&still, &flow, &ctx(), 1.0e-6).unwrap();
        assert_eq!(outcome, BreakupOutcome::unchanged(&still));

        let mut point = parcel();
        point.diameter = 0.0;
        let outcome = LeakyModel.evaluate(&point, &flow, &ctx(), 1.0e-6).unwrap();
        assert!(outcome.children.is_empty());
        assert_eq!(outcome.parent, point);

        let outcome = LeakyModel.evaluate(&parcel(), &flow, &ctx(), 0.0).unwrap();
        assert!(!outcome.broke_up);
    }

    #[test]
    fn test_negative_timestep_is_configuration_error() {
        let result = NoBreakup.evaluate(&parcel(), &FlowState::quiescent_air(), &ctx(), -1.0);
        assert!(matches!(result, Err(SprayError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_corrupt_parcel_is_data_integrity_error() {
        let mut bad = parcel();
        bad.diameter = -10.0e-6;
        let err = NoBreakup
            .evaluate(&bad, &FlowState::quiescent_air(), &ctx(), 1.0e-6)
            .unwrap_err();
        assert!(err.is_data_integrity());
    }

    #[test]
    fn test_factory_selects_configured_variant() {
        let model = create_breakup_model(&BreakupConfig::Tab(TabCoeffs::default())).unwrap();
        assert_eq!(model.name(), "tab");
        assert!(model.solves_oscillation());

        let bad = BreakupConfig::ReitzKhrt(ReitzKhrtCoeffs {
            b1: 0.0,
            ..ReitzKhrtCoeffs::default()
        });
        assert!(create_breakup_model(&bad).is_err());
    }
}
