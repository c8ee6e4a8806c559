//! Reitz-Diwakar breakup (1987)
//!
//! Two regimes, selected by the Weber number `We = ρ_g U² d / (2σ)` and the
//! gas Reynolds number `Re = U d / ν_g`:
//!
//! - **Bag breakup** for `We > C_bag`:
//!   ```text
//!   d_stable = 2 C_bag σ / (ρ_g U²)
//!   τ_bag    = C_b d √(ρ_l d / σ)
//!   ```
//! - **Stripping breakup** for `We > C_strip √Re`:
//!   ```text
//!   d_stable = (2 C_strip σ)² / (ρ_g U³ μ_g)
//!   τ_strip  = C_s d √(ρ_l / ρ_g) / U
//!   ```
//!
//! In either regime the droplet diameter relaxes toward the stable diameter
//! with the implicit update `d' = (d + f d_stable) / (1 + f)`, `f = dt / τ`,
//! which is bounded for any `dt`. The parcel keeps its mass; it simply
//! represents more, smaller droplets.

use super::{unknown_coefficient, BreakupContext, BreakupModel, BreakupOutcome};
use crate::core_types::{FlowState, Parcel};
use crate::error::{require_positive, SprayError};
use crate::physics::dimensionless::{reynolds, weber};
use serde::{Deserialize, Serialize};

/// Coefficients of [`ReitzDiwakar`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReitzDiwakarCoeffs {
    /// Critical Weber number for bag breakup
    pub c_bag: f32,
    /// Bag breakup time constant
    pub c_b: f32,
    /// Critical Weber/√Re ratio for stripping breakup
    pub c_strip: f32,
    /// Stripping breakup time constant
    pub c_s: f32,
}

impl Default for ReitzDiwakarCoeffs {
    fn default() -> Self {
        Self {
            c_bag: 6.0,
            c_b: 0.785,
            c_strip: 0.5,
            c_s: 10.0,
        }
    }
}

impl ReitzDiwakarCoeffs {
    fn validate(&self) -> Result<(), SprayError> {
        const NAME: &str = ReitzDiwakar::NAME;
        require_positive(NAME, "cBag", self.c_bag)?;
        require_positive(NAME, "cB", self.c_b)?;
        require_positive(NAME, "cStrip", self.c_strip)?;
        require_positive(NAME, "cS", self.c_s)?;
        Ok(())
    }
}

/// Bag and stripping breakup
#[derive(Debug, Clone)]
pub struct ReitzDiwakar {
    coeffs: ReitzDiwakarCoeffs,
}

impl ReitzDiwakar {
    const NAME: &'static str = "reitzDiwakar";

    /// # Errors
    /// Returns [`SprayError::InvalidConfiguration`] for non-positive coefficients.
    pub fn new(coeffs: ReitzDiwakarCoeffs) -> Result<Self, SprayError> {
        coeffs.validate()?;
        Ok(Self { coeffs })
    }

    pub fn coeffs(&self) -> &ReitzDiwakarCoeffs {
        &self.coeffs
    }
}

impl BreakupModel for ReitzDiwakar {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn update(
        &self,
        parcel: &Parcel,
        flow: &FlowState,
        ctx: &BreakupContext,
        dt: f32,
    ) -> BreakupOutcome {
        let c = &self.coeffs;
        let d = parcel.diameter;
        let u = parcel.relative_velocity(&flow.velocity).norm();
        let sigma = ctx.liquid.surface_tension;
        let rho_l = ctx.liquid.density;
        let rho_g = flow.density;

        let we = weber(rho_g, u, 0.5 * d, sigma);
        let re = reynolds(rho_g, u, d, flow.viscosity);

        if we <= c.c_bag {
            return BreakupOutcome::unchanged(parcel);
        }

        let (d_stable, tau) = if we > c.c_strip * re.sqrt() {
            let d_strip = (2.0 * c.c_strip * sigma).powi(2) / (rho_g * u.powi(3) * flow.viscosity);
            let tau_strip = c.c_s * d * (rho_l / rho_g).sqrt() / u;
            (d_strip, tau_strip)
        } else {
            let d_bag = 2.0 * c.c_bag * sigma / (rho_g * u * u);
            let tau_bag = c.c_b * d * (rho_l * d / sigma).sqrt();
            (d_bag, tau_bag)
        };

        let fraction = dt / tau;
        let d_new = ((d + fraction * d_stable) / (1.0 + fraction)).min(d);
        if d_new >= d {
            return BreakupOutcome::unchanged(parcel);
        }

        let mut parent = parcel.clone();
        parent.diameter = d_new;
        BreakupOutcome {
            parent,
            children: Vec::new(),
            broke_up: true,
        }
    }

    fn coefficient(&self, name: &str) -> Option<f32> {
        match name {
            "cBag" => Some(self.coeffs.c_bag),
            "cB" => Some(self.coeffs.c_b),
            "cStrip" => Some(self.coeffs.c_strip),
            "cS" => Some(self.coeffs.c_s),
            _ => None,
        }
    }

    fn set_coefficient(&mut self, name: &str, value: f32) -> Result<(), SprayError> {
        let mut updated = self.coeffs;
        match name {
            "cBag" => updated.c_bag = value,
            "cB" => updated.c_b = value,
            "cStrip" => updated.c_strip = value,
            "cS" => updated.c_s = value,
            _ => return Err(unknown_coefficient(Self::NAME, name)),
        }
        updated.validate()?;
        self.coeffs = updated;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::{LiquidProperties, ParcelSeed, Vec3};
    use approx::assert_relative_eq;

    fn ctx() -> BreakupContext {
        BreakupContext {
            liquid: LiquidProperties::DIESEL,
            average_parcel_mass: 1.0e-6,
        }
    }

    fn parcel(speed: f32, diameter: f32) -> Parcel {
        Parcel::from_seed(
            1,
            ParcelSeed::new(Vec3::zeros(), Vec3::new(speed, 0.0, 0.0), diameter, 1.0e-6),
        )
    }

    fn dense_gas() -> FlowState {
        FlowState::quiescent_air().with_density(20.0)
    }

    #[test]
    fn test_low_weber_droplet_is_stable() {
        let model = ReitzDiwakar::new(ReitzDiwakarCoeffs::default()).unwrap();
        // We = 0.5 * 20 * 1 * 10e-6 / 0.026 ≈ 0.004
        let outcome = model
            .evaluate(&parcel(1.0, 10.0e-6), &dense_gas(), &ctx(), 1.0e-4)
            .unwrap();
        assert!(!outcome.broke_up);
    }

    #[test]
    fn test_fast_droplet_shrinks_and_keeps_mass() {
        let model = ReitzDiwakar::new(ReitzDiwakarCoeffs::default()).unwrap();
        let p = parcel(150.0, 100.0e-6);
        let outcome = model.evaluate(&p, &dense_gas(), &ctx(), 1.0e-5).unwrap();

        assert!(outcome.broke_up);
        assert!(outcome.parent.diameter < p.diameter);
        assert!(outcome.children.is_empty());
        assert_relative_eq!(outcome.parent.mass, p.mass);

        let before = p.droplet_count(&ctx().liquid);
        let after = outcome.parent.droplet_count(&ctx().liquid);
        assert!(after > before);
    }

    #[test]
    fn test_smaller_steps_change_less() {
        let model = ReitzDiwakar::new(ReitzDiwakarCoeffs::default()).unwrap();
        let p = parcel(150.0, 100.0e-6);
        let coarse = model.evaluate(&p, &dense_gas(), &ctx(), 1.0e-5).unwrap();
        let fine = model.evaluate(&p, &dense_gas(), &ctx(), 1.0e-9).unwrap();
        assert!(fine.parent.diameter > coarse.parent.diameter);
        assert_relative_eq!(fine.parent.diameter, p.diameter, max_relative = 1e-3);

        // Huge steps approach, but never overshoot, the stable diameter
        let huge = model.evaluate(&p, &dense_gas(), &ctx(), 1.0e3).unwrap();
        assert!(huge.parent.diameter > 0.0);
    }
}
