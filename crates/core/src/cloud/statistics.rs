//! Integral spray statistics
//!
//! Mean diameters are weighted by the number of physical droplets each parcel
//! represents:
//! ```text
//! D_ij = ( Σ n d^i / Σ n d^j )^(1 / (i - j))
//! ```
//! so `D10` is the arithmetic mean and `D32` the Sauter mean diameter.
//! Liquid penetration is the distance from the nozzle that contains a given
//! fraction of the liquid mass.

use crate::core_types::{LiquidProperties, Parcel, Vec3};
use crate::error::SprayError;
use serde::{Deserialize, Serialize};

/// Summary of a parcel population at one instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CloudStatistics {
    pub parcels: usize,
    /// Total liquid mass (kg)
    pub total_mass: f32,
    /// Average parcel mass (kg)
    pub average_parcel_mass: f32,
    /// Arithmetic mean droplet diameter (m)
    pub d10: f32,
    /// Sauter mean diameter (m)
    pub d32: f32,
    /// Largest droplet diameter (m)
    pub max_diameter: f32,
}

/// Sum of parcel masses (kg)
pub fn total_mass(parcels: &[Parcel]) -> f32 {
    parcels.iter().map(|p| p.mass).sum()
}

/// Mean parcel mass, 0 for an empty population
pub fn average_parcel_mass(parcels: &[Parcel]) -> f32 {
    if parcels.is_empty() {
        0.0
    } else {
        total_mass(parcels) / parcels.len() as f32
    }
}

/// Droplet-count weighted mean diameter `D_ij` (m)
///
/// Returns 0 when the population holds no droplets.
///
/// # Errors
/// Returns [`SprayError::InvalidConfiguration`] when `i == j`.
pub fn mean_diameter(
    parcels: &[Parcel],
    liquid: &LiquidProperties,
    i: u8,
    j: u8,
) -> Result<f32, SprayError> {
    if i == j {
        return Err(SprayError::invalid_configuration(
            "mean diameter",
            format!("moment orders must differ, got D{i}{j}"),
        ));
    }

    let (mut sum_i, mut sum_j) = (0.0_f64, 0.0_f64);
    for p in parcels.iter().filter(|p| p.diameter > 0.0) {
        let n = f64::from(p.droplet_count(liquid));
        let d = f64::from(p.diameter);
        sum_i += n * d.powi(i32::from(i));
        sum_j += n * d.powi(i32::from(j));
    }
    if sum_i <= 0.0 || sum_j <= 0.0 {
        return Ok(0.0);
    }

    let exponent = 1.0 / (f64::from(i) - f64::from(j));
    Ok((sum_i / sum_j).powf(exponent) as f32)
}

/// Largest droplet diameter, 0 for an empty population
pub fn max_diameter(parcels: &[Parcel]) -> f32 {
    parcels.iter().map(|p| p.diameter).fold(0.0, f32::max)
}

/// Distance from `origin` within which `fraction` of the liquid mass lies (m)
///
/// Returns 0 for a population without mass.
///
/// # Errors
/// Returns [`SprayError::InvalidConfiguration`] unless `0 < fraction <= 1`.
pub fn penetration(parcels: &[Parcel], fraction: f32, origin: &Vec3) -> Result<f32, SprayError> {
    if fraction.is_nan() || fraction <= 0.0 || fraction > 1.0 {
        return Err(SprayError::invalid_configuration(
            "penetration",
            format!("mass fraction must lie in (0, 1], got {fraction}"),
        ));
    }

    let total = total_mass(parcels);
    if total <= 0.0 {
        return Ok(0.0);
    }

    let mut by_distance: Vec<(f32, f32)> = parcels
        .iter()
        .map(|p| ((p.position - origin).norm(), p.mass))
        .collect();
    by_distance.sort_by(|a, b| a.0.total_cmp(&b.0));

    let target = fraction * total;
    let mut accumulated = 0.0;
    for (distance, mass) in &by_distance {
        accumulated += mass;
        if accumulated >= target {
            return Ok(*distance);
        }
    }
    // Rounding can leave the running sum a hair short of the total
    Ok(by_distance.last().map_or(0.0, |(distance, _)| *distance))
}

/// Compute all statistics of `parcels`
pub fn summarize(parcels: &[Parcel], liquid: &LiquidProperties) -> CloudStatistics {
    CloudStatistics {
        parcels: parcels.len(),
        total_mass: total_mass(parcels),
        average_parcel_mass: average_parcel_mass(parcels),
        d10: mean_diameter(parcels, liquid, 1, 0).unwrap_or(0.0),
        d32: mean_diameter(parcels, liquid, 3, 2).unwrap_or(0.0),
        max_diameter: max_diameter(parcels),
    }
}
