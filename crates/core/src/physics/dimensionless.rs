//! Dimensionless groups used by the atomization and breakup correlations
//!
//! All groups use the droplet diameter as length scale unless stated
//! otherwise. Correlations written in terms of the radius (Reitz wave models)
//! convert explicitly at the call site.

/// Weber number: ρ U² L / σ
///
/// Pass the gas density for the gas-phase number and the liquid density for
/// the liquid-phase one.
#[inline]
pub fn weber(density: f32, relative_speed: f32, length: f32, surface_tension: f32) -> f32 {
    density * relative_speed * relative_speed * length / surface_tension
}

/// Reynolds number: ρ U d / μ
#[inline]
pub fn reynolds(density: f32, speed: f32, length: f32, viscosity: f32) -> f32 {
    density * speed * length / viscosity
}

/// Ohnesorge number: μ_l / √(ρ_l σ d)
#[inline]
pub fn ohnesorge(
    liquid_viscosity: f32,
    liquid_density: f32,
    surface_tension: f32,
    length: f32,
) -> f32 {
    liquid_viscosity / (liquid_density * surface_tension * length).sqrt()
}

/// Drag coefficient of a sphere (Putnam 1961 correlation)
///
/// ```text
/// Cd = 24/Re (1 + Re^(2/3) / 6)   for Re < 1000
/// Cd = 0.424                       otherwise
/// ```
pub fn sphere_drag_coefficient(reynolds: f32) -> f32 {
    if reynolds <= 0.0 {
        return 0.0;
    }
    if reynolds < 1000.0 {
        24.0 / reynolds * (1.0 + reynolds.powf(2.0 / 3.0) / 6.0)
    } else {
        0.424
    }
}
