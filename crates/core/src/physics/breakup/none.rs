use super::{unknown_coefficient, BreakupContext, BreakupModel, BreakupOutcome};
use crate::core_types::{FlowState, Parcel};
use crate::error::SprayError;

/// Breakup disabled: parcels keep their diameter for their whole life
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBreakup;

impl BreakupModel for NoBreakup {
    fn name(&self) -> &'static str {
        "none"
    }

    fn update(
        &self,
        parcel: &Parcel,
        _flow: &FlowState,
        _ctx: &BreakupContext,
        _dt: f32,
    ) -> BreakupOutcome {
        BreakupOutcome::unchanged(parcel)
    }

    fn coefficient(&self, _name: &str) -> Option<f32> {
        None
    }

    fn set_coefficient(&mut self, name: &str, _value: f32) -> Result<(), SprayError> {
        Err(unknown_coefficient(self.name(), name))
    }
}
