//! Kelvin-Helmholtz / Rayleigh-Taylor hybrid breakup (Beale & Reitz 1999)
//!
//! # Kelvin-Helmholtz stripping
//!
//! Surface waves with the fastest-growing wavelength Λ_KH and growth rate
//! Ω_KH strip small droplets of diameter `d_c = B0 Λ_KH` off the parent:
//! ```text
//! Λ_KH / r = 9.02 (1 + 0.45 √Oh)(1 + 0.4 Ta^0.7) / (1 + 0.865 We_g^1.67)^0.6
//! Ω_KH √(ρ_l r³ / σ) = (0.34 + 0.38 We_g^1.5) / ((1 + Oh)(1 + 1.4 Ta^0.6))
//! τ_KH = 3.726 B1 r / (Λ_KH Ω_KH)
//! ```
//! The parent diameter relaxes toward `d_c`. The stripped liquid accumulates
//! in the parcel's `shed_mass`; once it exceeds `msLimit` times the cloud's
//! average parcel mass it is emitted as a child parcel of diameter `d_c`.
//!
//! # Rayleigh-Taylor catastrophic breakup
//!
//! The drag deceleration `a = 3/8 C_d ρ_g U² / (ρ_l r)` drives RT waves:
//! ```text
//! K_RT = √(a (ρ_l - ρ_g) / (3σ))
//! Ω_RT = √(2 / (3√(3σ)) · (a (ρ_l - ρ_g))^1.5 / (ρ_l + ρ_g))
//! Λ_RT = 2π C_RT / K_RT,   τ_RT = C_τ / Ω_RT
//! ```
//! When Λ_RT is smaller than the droplet and the waves have grown for longer
//! than τ_RT, the droplet shatters to diameter Λ_RT.

use super::{unknown_coefficient, BreakupContext, BreakupModel, BreakupOutcome};
use crate::core_types::{FlowState, Parcel, ParcelSeed};
use crate::error::{require_positive, SprayError};
use crate::physics::dimensionless::{reynolds, sphere_drag_coefficient, weber};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Coefficients of [`ReitzKhrt`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReitzKhrtCoeffs {
    /// Stripped droplet size constant
    pub b0: f32,
    /// KH breakup time constant
    pub b1: f32,
    /// RT breakup time constant
    pub c_tau: f32,
    /// RT wavelength constant
    #[serde(rename = "cRT")]
    pub c_rt: f32,
    /// Shed mass, relative to the average parcel mass, that triggers a child parcel
    pub ms_limit: f32,
    /// Gas Weber number below which KH stripping is inactive
    pub weber_limit: f32,
}

impl Default for ReitzKhrtCoeffs {
    fn default() -> Self {
        Self {
            b0: 0.61,
            b1: 40.0,
            c_tau: 1.0,
            c_rt: 0.1,
            ms_limit: 0.2,
            weber_limit: 6.0,
        }
    }
}

impl ReitzKhrtCoeffs {
    fn validate(&self) -> Result<(), SprayError> {
        const NAME: &str = ReitzKhrt::NAME;
        require_positive(NAME, "b0", self.b0)?;
        require_positive(NAME, "b1", self.b1)?;
        require_positive(NAME, "cTau", self.c_tau)?;
        require_positive(NAME, "cRT", self.c_rt)?;
        require_positive(NAME, "msLimit", self.ms_limit)?;
        require_positive(NAME, "weberLimit", self.weber_limit)?;
        Ok(())
    }
}

/// Hybrid KH-RT breakup with child parcel emission
#[derive(Debug, Clone)]
pub struct ReitzKhrt {
    coeffs: ReitzKhrtCoeffs,
}

/// Rayleigh-Taylor wave properties for one droplet
struct RtWaves {
    wavelength: f32,
    breakup_time: f32,
}

impl ReitzKhrt {
    const NAME: &'static str = "reitzKHRT";

    /// # Errors
    /// Returns [`SprayError::InvalidConfiguration`] for non-positive coefficients.
    pub fn new(coeffs: ReitzKhrtCoeffs) -> Result<Self, SprayError> {
        coeffs.validate()?;
        Ok(Self { coeffs })
    }

    pub fn coeffs(&self) -> &ReitzKhrtCoeffs {
        &self.coeffs
    }

    fn rt_waves(&self, u: f32, r: f32, flow: &FlowState, ctx: &BreakupContext) -> Option<RtWaves> {
        let rho_l = ctx.liquid.density;
        let rho_g = flow.density;
        let sigma = ctx.liquid.surface_tension;

        let re = reynolds(rho_g, u, 2.0 * r, flow.viscosity);
        let accel = 0.375 * sphere_drag_coefficient(re) * rho_g * u * u / (rho_l * r);
        let drive = accel * (rho_l - rho_g);
        if drive <= 0.0 {
            return None;
        }

        let k_rt = (drive / (3.0 * sigma)).sqrt();
        let omega_rt =
            (2.0 / (3.0 * (3.0 * sigma).sqrt()) * drive.powf(1.5) / (rho_l + rho_g)).sqrt();
        if k_rt <= 0.0 || omega_rt <= 0.0 {
            return None;
        }

        Some(RtWaves {
            wavelength: 2.0 * PI * self.coeffs.c_rt / k_rt,
            breakup_time: self.coeffs.c_tau / omega_rt,
        })
    }
}

impl BreakupModel for ReitzKhrt {
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
        let liquid = &ctx.liquid;
        let d = parcel.diameter;
        let r = 0.5 * d;
        let u = parcel.relative_velocity(&flow.velocity).norm();
        let sigma = liquid.surface_tension;

        let mut parent = parcel.clone();
        let mut children = Vec::new();
        let mut broke_up = false;

        // Rayleigh-Taylor
        parent.time_since_rt_breakup += dt;
        match self.rt_waves(u, r, flow, ctx) {
            Some(rt) if rt.wavelength < d => {
                if parent.time_since_rt_breakup > rt.breakup_time {
                    parent.diameter = rt.wavelength;
                    parent.time_since_rt_breakup = 0.0;
                    return BreakupOutcome {
                        parent,
                        children,
                        broke_up: true,
                    };
                }
            }
            _ => parent.time_since_rt_breakup = 0.0,
        }

        // Kelvin-Helmholtz
        let we_g = weber(flow.density, u, r, sigma);
        if we_g <= c.weber_limit {
            return BreakupOutcome {
                parent,
                children,
                broke_up,
            };
        }

        let we_l = weber(liquid.density, u, r, sigma);
        let re_l = reynolds(liquid.density, u, r, liquid.viscosity);
        let oh = we_l.sqrt() / re_l;
        let ta = oh * we_g.sqrt();

        let lambda_kh = 9.02 * r * (1.0 + 0.45 * oh.sqrt()) * (1.0 + 0.4 * ta.powf(0.7))
            / (1.0 + 0.865 * we_g.powf(1.67)).powf(0.6);
        let omega_kh = (0.34 + 0.38 * we_g.powf(1.5)) / ((1.0 + oh) * (1.0 + 1.4 * ta.powf(0.6)))
            * (sigma / (liquid.density * r.powi(3))).sqrt();

        let d_child = c.b0 * lambda_kh;
        if d_child < d && lambda_kh > 0.0 && omega_kh > 0.0 {
            let tau_kh = 3.726 * c.b1 * r / (lambda_kh * omega_kh);
            let fraction = dt / tau_kh;
            let d_new = ((d + fraction * d_child) / (1.0 + fraction)).min(d);

            let droplets = parcel.droplet_count(liquid);
            let stripped = droplets * (liquid.droplet_mass(d) - liquid.droplet_mass(d_new));
            let available = parent.mass - parent.shed_mass;
            parent.shed_mass += stripped.clamp(0.0, available);
            parent.diameter = d_new;
            broke_up = d_new < d;

            let reference = if ctx.average_parcel_mass > 0.0 {
                ctx.average_parcel_mass
            } else {
                parcel.mass
            };
            if parent.shed_mass > c.ms_limit * reference {
                children.push(ParcelSeed::new(
                    parent.position,
                    parent.velocity,
                    d_child,
                    parent.shed_mass,
                ));
                parent.mass -= parent.shed_mass;
                parent.shed_mass = 0.0;
            }
        }

        BreakupOutcome {
            parent,
            children,
            broke_up,
        }
    }

    fn coefficient(&self, name: &str) -> Option<f32> {
        match name {
            "b0" => Some(self.coeffs.b0),
            "b1" => Some(self.coeffs.b1),
            "cTau" => Some(self.coeffs.c_tau),
            "cRT" => Some(self.coeffs.c_rt),
            "msLimit" => Some(self.coeffs.ms_limit),
            "weberLimit" => Some(self.coeffs.weber_limit),
            _ => None,
        }
    }

    fn set_coefficient(&mut self, name: &str, value: f32) -> Result<(), SprayError> {
        let mut updated = self.coeffs;
        match name {
            "b0" => updated.b0 = value,
            "b1" => updated.b1 = value,
            "cTau" => updated.c_tau = value,
            "cRT" => updated.c_rt = value,
            "msLimit" => updated.ms_limit = value,
            "weberLimit" => updated.weber_limit = value,
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
    use crate::core_types::{LiquidProperties, Vec3};
    use approx::assert_relative_eq;

    fn ctx(average_parcel_mass: f32) -> BreakupContext {
        BreakupContext {
            liquid: LiquidProperties::DIESEL,
            average_parcel_mass,
        }
    }

    fn blob(speed: f32) -> Parcel {
        Parcel::from_seed(
            9,
            ParcelSeed::new(Vec3::zeros(), Vec3::new(0.0, 0.0, speed), 150.0e-6, 1.0e-6),
        )
    }

    fn chamber_gas() -> FlowState {
        FlowState::quiescent_air().with_density(30.0)
    }

    #[test]
    fn test_stripping_conserves_mass() {
        let model = ReitzKhrt::new(ReitzKhrtCoeffs::default()).unwrap();
        let p = blob(300.0);
        let mut current = p.clone();
        let mut emitted = 0.0;
        for _ in 0..50 {
            let outcome = model
                .evaluate(&current, &chamber_gas(), &ctx(1.0e-6), 2.0e-7)
                .unwrap();
            emitted += outcome.children.iter().map(|c| c.mass).sum::<f32>();
            current = outcome.parent;
        }
        assert!(current.diameter < p.diameter);
        assert_relative_eq!(current.mass + emitted, p.mass, max_relative = 1e-4);
    }

    #[test]
    fn test_child_emitted_above_shed_limit() {
        let model = ReitzKhrt::new(ReitzKhrtCoeffs::default()).unwrap();
        // A tiny average parcel mass makes any stripped mass exceed the limit.
        // The step is shorter than the RT breakup time, so only KH acts.
        let outcome = model
            .evaluate(&blob(300.0), &chamber_gas(), &ctx(1.0e-12), 5.0e-7)
            .unwrap();
        assert!(outcome.parent.time_since_rt_breakup > 0.0);
        assert_eq!(outcome.children.len(), 1);
        assert_eq!(outcome.parent.shed_mass, 0.0);
        assert!(outcome.children[0].diameter < outcome.parent.diameter);
        assert_relative_eq!(outcome.total_mass(), 1.0e-6, max_relative = 1e-5);
    }

    #[test]
    fn test_slow_droplet_does_not_break_up() {
        let model = ReitzKhrt::new(ReitzKhrtCoeffs::default()).unwrap();
        let outcome = model
            .evaluate(&blob(0.5), &chamber_gas(), &ctx(1.0e-6), 1.0e-3)
            .unwrap();
        assert!(!outcome.broke_up);
        assert!(outcome.children.is_empty());
        assert_eq!(outcome.parent.diameter, 150.0e-6);
    }

    #[test]
    fn test_rejects_bad_coefficient_update() {
        let mut model = ReitzKhrt::new(ReitzKhrtCoeffs::default()).unwrap();
        assert!(model.set_coefficient("msLimit", 0.0).is_err());
        assert_eq!(model.coefficient("msLimit"), Some(0.2));
        model.set_coefficient("b1", 10.0).unwrap();
        assert_eq!(model.coefficient("b1"), Some(10.0));
        assert!(model.set_coefficient("Cbag", 6.0).is_err());
    }
}
