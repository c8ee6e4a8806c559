//! Taylor Analogy Breakup (O'Rourke & Amsden 1987)
//!
//! The droplet surface is treated as a forced, damped spring-mass system.
//! The dimensionless deformation `y` obeys
//! ```text
//! ÿ = C_F/C_b · ρ_g U² / (ρ_l r²) - C_k σ / (ρ_l r³) · y - C_d μ_l / (ρ_l r²) · ẏ
//! ```
//! which has the closed-form solution
//! ```text
//! y(t) = We_c + e^(-t/t_d) [ a cos ωt + b sin ωt ]
//! We_c = C_F / (C_k C_b) · ρ_g U² r / σ
//! t_d  = 2 ρ_l r² / (C_d μ_l),   ω² = C_k σ / (ρ_l r³) - 1 / t_d²
//! ```
//! with `a = y₀ - We_c` and `b = (ẏ₀ + a / t_d) / ω`. The droplet breaks up
//! when `y` reaches 1; the product Sauter radius follows from energy
//! conservation:
//! ```text
//! r₃₂ = r / (7/3 + ρ_l r³ ẏ² / (8σ))
//! ```

use super::{unknown_coefficient, BreakupContext, BreakupModel, BreakupOutcome};
use crate::core_types::{FlowState, Parcel};
use crate::error::{require_positive, SprayError};
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Coefficients of [`Tab`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TabCoeffs {
    /// Aerodynamic forcing constant
    pub c_f: f32,
    /// Surface tension restoring constant
    pub c_k: f32,
    /// Viscous damping constant
    pub c_d: f32,
    /// Critical deformation constant
    pub c_b: f32,
}

impl Default for TabCoeffs {
    fn default() -> Self {
        Self {
            c_f: 1.0 / 3.0,
            c_k: 8.0,
            c_d: 5.0,
            c_b: 0.5,
        }
    }
}

impl TabCoeffs {
    fn validate(&self) -> Result<(), SprayError> {
        const NAME: &str = Tab::NAME;
        require_positive(NAME, "cF", self.c_f)?;
        require_positive(NAME, "cK", self.c_k)?;
        require_positive(NAME, "cD", self.c_d)?;
        require_positive(NAME, "cB", self.c_b)?;
        Ok(())
    }
}

/// Oscillating-droplet breakup
#[derive(Debug, Clone)]
pub struct Tab {
    coeffs: TabCoeffs,
}

impl Tab {
    const NAME: &'static str = "tab";

    /// # Errors
    /// Returns [`SprayError::InvalidConfiguration`] for non-positive coefficients.
    pub fn new(coeffs: TabCoeffs) -> Result<Self, SprayError> {
        coeffs.validate()?;
        Ok(Self { coeffs })
    }

    pub fn coeffs(&self) -> &TabCoeffs {
        &self.coeffs
    }
}

impl BreakupModel for Tab {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn solves_oscillation(&self) -> bool {
        true
    }

    fn update(
        &self,
        parcel: &Parcel,
        flow: &FlowState,
        ctx: &BreakupContext,
        dt: f32,
    ) -> BreakupOutcome {
        let c = &self.coeffs;
        let rho_l = ctx.liquid.density;
        let sigma = ctx.liquid.surface_tension;
        let r = 0.5 * parcel.diameter;
        let u = parcel.relative_velocity(&flow.velocity).norm();

        let t_d = 2.0 * rho_l * r * r / (c.c_d * ctx.liquid.viscosity);
        let omega2 = c.c_k * sigma / (rho_l * r.powi(3)) - 1.0 / (t_d * t_d);
        if omega2 <= 0.0 || !t_d.is_finite() {
            // Overdamped: the droplet relaxes without oscillating
            return BreakupOutcome::unchanged(parcel);
        }
        let omega = omega2.sqrt();

        let we_c = c.c_f / (c.c_k * c.c_b) * flow.density * u * u * r / sigma;
        let a = parcel.deformation - we_c;
        let b = (parcel.deformation_rate + a / t_d) / omega;
        let amplitude = a.hypot(b);

        let mut parent = parcel.clone();

        if we_c + amplitude > 1.0 && amplitude > 0.0 {
            let cos_b = ((1.0 - we_c) / amplitude).clamp(-1.0, 1.0);
            let phase = b.atan2(a);
            let t_breakup = (phase - cos_b.acos()).rem_euclid(TAU) / omega;

            if t_breakup <= dt {
                let rate = amplitude * omega * (1.0 - cos_b * cos_b).sqrt();
                let r32 = r / (7.0 / 3.0 + rho_l * r.powi(3) * rate * rate / (8.0 * sigma));
                parent.diameter = (2.0 * r32).min(parcel.diameter);
                parent.deformation = 0.0;
                parent.deformation_rate = 0.0;
                return BreakupOutcome {
                    parent,
                    children: Vec::new(),
                    broke_up: true,
                };
            }
        }

        let decay = (-dt / t_d).exp();
        let (sin_w, cos_w) = (omega * dt).sin_cos();
        let y = we_c + decay * (a * cos_w + b * sin_w);
        parent.deformation = y;
        parent.deformation_rate = (we_c - y) / t_d + decay * omega * (b * cos_w - a * sin_w);

        BreakupOutcome {
            parent,
            children: Vec::new(),
            broke_up: false,
        }
    }

    fn coefficient(&self, name: &str) -> Option<f32> {
        match name {
            "cF" => Some(self.coeffs.c_f),
            "cK" => Some(self.coeffs.c_k),
            "cD" => Some(self.coeffs.c_d),
            "cB" => Some(self.coeffs.c_b),
            _ => None,
        }
    }

    fn set_coefficient(&mut self, name: &str, value: f32) -> Result<(), SprayError> {
        let mut updated = self.coeffs;
        match name {
            "cF" => updated.c_f = value,
            "cK" => updated.c_k = value,
            "cD" => updated.c_d = value,
            "cB" => updated.c_b = value,
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

    fn droplet(speed: f32) -> Parcel {
        Parcel::from_seed(
            3,
            ParcelSeed::new(Vec3::zeros(), Vec3::new(speed, 0.0, 0.0), 100.0e-6, 1.0e-6),
        )
    }

    #[test]
    fn test_gentle_flow_deforms_without_breakup() {
        let model = Tab::new(TabCoeffs::default()).unwrap();
        let p = droplet(10.0);
        let outcome = model
            .evaluate(&p, &FlowState::quiescent_air(), &ctx(), 1.0e-5)
            .unwrap();

        assert!(!outcome.broke_up);
        assert!(outcome.parent.deformation > 0.0);
        assert!(outcome.parent.deformation < 1.0);
        assert!(outcome.parent.deformation_rate > 0.0);
        assert_eq!(outcome.parent.diameter, p.diameter);
    }

    #[test]
    fn test_violent_flow_breaks_droplet() {
        let model = Tab::new(TabCoeffs::default()).unwrap();
        let p = droplet(200.0);
        let gas = FlowState::quiescent_air().with_density(20.0);
        let outcome = model.evaluate(&p, &gas, &ctx(), 1.0e-5).unwrap();

        assert!(outcome.broke_up);
        assert!(outcome.parent.diameter < p.diameter);
        assert_eq!(outcome.parent.deformation, 0.0);
        assert_eq!(outcome.parent.deformation_rate, 0.0);
        assert!(outcome.children.is_empty());
        assert_relative_eq!(outcome.parent.mass, p.mass);
    }

    #[test]
    fn test_deformation_state_carries_between_steps() {
        let model = Tab::new(TabCoeffs::default()).unwrap();
        let gas = FlowState::quiescent_air();
        let first = model.evaluate(&droplet(10.0), &gas, &ctx(), 5.0e-6).unwrap();
        let second = model.evaluate(&first.parent, &gas, &ctx(), 5.0e-6).unwrap();
        let single = model.evaluate(&droplet(10.0), &gas, &ctx(), 1.0e-5).unwrap();

        assert_relative_eq!(
            second.parent.deformation,
            single.parent.deformation,
            max_relative = 1e-3
        );
    }

    #[test]
    fn test_coefficient_updates_are_validated() {
        let mut model = Tab::new(TabCoeffs::default()).unwrap();
        model.set_coefficient("cK", 10.0).unwrap();
        assert_eq!(model.coefficient("cK"), Some(10.0));
        assert!(model.set_coefficient("cD", -1.0).is_err());
        assert_eq!(model.coefficient("cD"), Some(5.0));
        assert!(model.set_coefficient("Cbag", 1.0).is_err());
    }
}
