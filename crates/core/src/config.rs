//! Spray cloud configuration
//!
//! A [`SprayCloudConfig`] selects the atomization and breakup variants of a
//! cloud together with their coefficients. It is a plain serde value: the host
//! parses its case files and hands the result over already deserialized.
//!
//! ```json
//! {
//!   "name": "sprayCloud",
//!   "liquid": { "density": 830.0, "surfaceTension": 0.026, "viscosity": 0.0024 },
//!   "atomization": { "model": "blobsSheet", "b0": 1.0, "coneHalfAngle": 10.0 },
//!   "breakup": { "model": "reitzKHRT", "b0": 0.61, "b1": 40.0 },
//!   "seed": 42
//! }
//! ```
//! Coefficients that are left out take their default values.

use crate::core_types::LiquidProperties;
use crate::error::SprayError;
use crate::physics::atomization::{BlobsSheetCoeffs, LisaCoeffs, UniformCoeffs};
use crate::physics::breakup::{ReitzDiwakarCoeffs, ReitzKhrtCoeffs, TabCoeffs};
use serde::{Deserialize, Serialize};

/// Primary atomization variant and its coefficients
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "camelCase")]
pub enum AtomizationConfig {
    Uniform(UniformCoeffs),
    BlobsSheet(BlobsSheetCoeffs),
    Lisa(LisaCoeffs),
}

impl Default for AtomizationConfig {
    fn default() -> Self {
        AtomizationConfig::BlobsSheet(BlobsSheetCoeffs::default())
    }
}

/// Secondary breakup variant and its coefficients
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "camelCase")]
pub enum BreakupConfig {
    None,
    ReitzDiwakar(ReitzDiwakarCoeffs),
    #[serde(rename = "reitzKHRT")]
    ReitzKhrt(ReitzKhrtCoeffs),
    Tab(TabCoeffs),
}

impl Default for BreakupConfig {
    fn default() -> Self {
        BreakupConfig::ReitzKhrt(ReitzKhrtCoeffs::default())
    }
}

/// Configuration of one spray cloud
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SprayCloudConfig {
    /// Cloud name, used in log output
    pub name: String,

    /// Properties of the injected liquid
    pub liquid: LiquidProperties,

    /// Primary atomization model
    pub atomization: AtomizationConfig,

    /// Secondary breakup model
    pub breakup: BreakupConfig,

    /// Seed of the cloud's random stream
    pub seed: u64,
}

impl Default for SprayCloudConfig {
    fn default() -> Self {
        Self {
            name: "sprayCloud".to_string(),
            liquid: LiquidProperties::default(),
            atomization: AtomizationConfig::default(),
            breakup: BreakupConfig::default(),
            seed: 0,
        }
    }
}

impl SprayCloudConfig {
    /// Check the parts of the configuration not owned by a sub-model
    ///
    /// Model coefficients are validated when the models are built.
    ///
    /// # Errors
    /// Returns [`SprayError::InvalidConfiguration`] for an empty name or
    /// invalid liquid properties.
    pub fn validate(&self) -> Result<(), SprayError> {
        if self.name.trim().is_empty() {
            return Err(SprayError::invalid_configuration(
                "spray cloud",
                "cloud name must not be empty",
            ));
        }
        self.liquid.validate()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}
