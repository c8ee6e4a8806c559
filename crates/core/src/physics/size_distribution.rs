//! Droplet size distribution for atomization
//!
//! Truncated Rosin-Rammler distribution, the classic spray size law
//! `1 - Q(d) = exp(-(d/d̄)^n)` restricted to [min, max].
//!
//! # References
//!
//! - Rosin, P., Rammler, E. (1933). "The laws governing the fineness of powdered coal."
//!   Journal of the Institute of Fuel, 7, 29-36.
//! - Lefebvre, A.H. (1989). "Atomization and Sprays", ch. 3

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// Truncated Rosin-Rammler distribution of droplet diameters (m)
///
/// Callers validate the parameters: `0 < min < max`, `d > 0`, `n > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RosinRammler {
    pub min: f32,
    pub max: f32,
    /// Characteristic diameter
    pub d: f32,
    /// Spread parameter
    pub n: f32,
}

impl RosinRammler {
    /// Draw one diameter (m)
    pub fn sample(&self, rng: &mut dyn RngCore) -> f32 {
        let Self { min, max, d, n } = *self;
        // Inverse transform of the distribution truncated to [min, max]
        let k = 1.0 - (-((max - min) / d).powf(n)).exp();
        let y: f32 = rng.random();
        let x = min + d * (-(1.0 - y * k).ln()).powf(1.0 / n);
        x.clamp(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_rosin_rammler_samples_stay_in_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        let dist = RosinRammler {
            min: 1.0e-6,
            max: 200.0e-6,
            d: 40.0e-6,
            n: 3.0,
        };
        let samples: Vec<f32> = (0..2000).map(|_| dist.sample(&mut rng)).collect();
        assert!(samples.iter().all(|&d| (1.0e-6..=200.0e-6).contains(&d)));

        // The bulk of the distribution sits around the characteristic size
        let mean = samples.iter().sum::<f32>() / samples.len() as f32;
        assert!(mean > 20.0e-6 && mean < 60.0e-6, "mean = {mean}");
    }

    #[test]
    fn test_narrow_spread_clusters_near_min_plus_d() {
        let mut rng = StdRng::seed_from_u64(7);
        let dist = RosinRammler {
            min: 1.0e-6,
            max: 500.0e-6,
            d: 20.0e-6,
            n: 20.0,
        };
        for _ in 0..500 {
            let x = dist.sample(&mut rng);
            assert!(x > 5.0e-6 && x < 30.0e-6, "x = {x}");
        }
    }
}
