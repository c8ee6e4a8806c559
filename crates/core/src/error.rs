//! Error types for the spray cloud
//!
//! Three failure classes exist at this layer:
//! - configuration problems (bad coefficients, bad injection events, negative timesteps),
//!   surfaced at construction or at the start of an injection
//! - data-integrity problems (a parcel with a negative or non-finite diameter reaching a
//!   breakup evaluation), which point at an upstream integration bug
//! - asking for a cloud copy before one was taken
//!
//! Degenerate physics (zero relative velocity, vanishing diameter) is not an error; the
//! breakup models return the parcel unchanged instead.

use thiserror::Error;

/// Errors raised by the spray cloud and its sub-models
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SprayError {
    /// Invalid case configuration or injection parameters
    #[error("Invalid configuration for {context}: {reason}")]
    InvalidConfiguration {
        /// What was being configured (model name, injection event, ...)
        context: String,
        /// Human-readable description of the violated constraint
        reason: String,
    },

    /// A parcel reached a model evaluation in a physically impossible state
    #[error("Invalid state for parcel {parcel_id}: {reason}")]
    InvalidParcelState {
        /// Identifier of the offending parcel
        parcel_id: u64,
        /// Which property was invalid and its value
        reason: String,
    },

    /// `cloud_copy()` was requested before any snapshot was taken
    #[error("No cloud copy available: take a snapshot before requesting it")]
    NoSnapshot,
}

impl SprayError {
    /// Create an invalid-configuration error
    ///
    /// # Arguments
    /// * `context` - What was being configured (e.g., `"reitzKHRT"`, `"injection event 4"`)
    /// * `reason` - Description of the violated constraint
    pub fn invalid_configuration(context: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            context: context.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid-parcel-state error
    pub fn invalid_parcel_state(parcel_id: u64, reason: impl Into<String>) -> Self {
        Self::InvalidParcelState {
            parcel_id,
            reason: reason.into(),
        }
    }

    /// Whether the error indicates corrupted parcel data rather than bad input
    pub fn is_data_integrity(&self) -> bool {
        matches!(self, Self::InvalidParcelState { .. })
    }
}

/// Validate that a coefficient is finite and strictly positive
///
/// # Errors
/// Returns [`SprayError::InvalidConfiguration`] naming `model` and `name` otherwise.
pub(crate) fn require_positive(model: &str, name: &str, value: f32) -> Result<f32, SprayError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SprayError::invalid_configuration(
            model,
            format!("coefficient '{name}' must be finite and positive, got {value}"),
        ))
    }
}
