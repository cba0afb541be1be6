use rand::Rng;
use rand_distr::{Distribution, Uniform};

use super::ParamGen;
use crate::{MlErr, Result};

/// A parameter generator that follows a certain probabilistic distribution.
///
/// The random number generator is borrowed, never owned, so that the caller decides how it's
/// seeded and can keep drawing from it once this generator is exhausted.
pub struct RandParamGen<'r, R: Rng + ?Sized, D: Distribution<f32>> {
    rng: &'r mut R,
    distribution: D,
    remaining: usize,
}

impl<'r, R: Rng + ?Sized, D: Distribution<f32>> RandParamGen<'r, R, D> {
    /// Creates a new `RandParamGen` parameter generator.
    ///
    /// # Arguments
    /// * `rng` - A random number generator.
    /// * `distribution` - The distribution to sample the random numbers from.
    /// * `limit` - The maximum amount of numbers to generate.
    pub fn new(rng: &'r mut R, distribution: D, limit: usize) -> Self {
        Self {
            rng,
            distribution,
            remaining: limit,
        }
    }
}

impl<'r, R: Rng + ?Sized> RandParamGen<'r, R, Uniform<f32>> {
    /// Creates a new `RandParamGen` parameter generator with an inclusive uniform distribution.
    ///
    /// # Arguments
    /// * `rng` - A random number generator.
    /// * `limit` - The maximum amount of numbers to generate.
    /// * `low` - The inclusive lower limit.
    /// * `high` - The inclusive upper limit.
    ///
    /// # Returns
    /// An error if the range is invalid (low > high or not finite).
    pub fn uniform_inclusive(rng: &'r mut R, limit: usize, low: f32, high: f32) -> Result<Self> {
        Ok(Self::new(rng, Uniform::new_inclusive(low, high)?, limit))
    }

    /// Creates a new `RandParamGen` parameter generator using He scaling for ReLU layers.
    ///
    /// Samples are uniform in `[-sqrt(2 / fan_in), sqrt(2 / fan_in)]`.
    ///
    /// # Arguments
    /// * `rng` - A random number generator.
    /// * `limit` - The maximum amount of numbers to generate.
    /// * `fan_in` - The number of input units of the layer.
    ///
    /// # Returns
    /// An error if `fan_in` is zero.
    pub fn he_uniform(rng: &'r mut R, limit: usize, fan_in: usize) -> Result<Self> {
        if fan_in == 0 {
            return Err(MlErr::InvalidInput("he initialization needs a positive fan in"));
        }

        let std = (2. / fan_in as f32).sqrt();
        Self::uniform_inclusive(rng, limit, -std, std)
    }
}

impl<R: Rng + ?Sized, D: Distribution<f32>> ParamGen for RandParamGen<'_, R, D> {
    fn sample(&mut self, mut n: usize) -> Option<Vec<f32>> {
        if self.remaining == 0 {
            return None;
        }

        n = n.min(self.remaining);
        self.remaining -= n;

        let rng = &mut *self.rng;
        let distribution = &self.distribution;
        let sample = (0..n).map(|_| distribution.sample(&mut *rng)).collect();
        Some(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn seeded_rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn empty() {
        let mut rng = seeded_rng();

        let mut param_gen = RandParamGen::he_uniform(&mut rng, 0, 2).unwrap();
        assert!(param_gen.sample(1).is_none());
    }

    #[test]
    fn partial() {
        let mut rng = seeded_rng();

        let mut param_gen = RandParamGen::he_uniform(&mut rng, 10, 2).unwrap();
        assert_eq!(param_gen.sample(7).unwrap().len(), 7);
        assert_eq!(param_gen.sample(7).unwrap().len(), 3);
        assert!(param_gen.sample(1).is_none());
    }

    #[test]
    fn he_uniform_samples_stay_within_the_he_bound() {
        const FAN_IN: usize = 8;
        let mut rng = seeded_rng();
        let bound = (2. / FAN_IN as f32).sqrt();

        let mut param_gen = RandParamGen::he_uniform(&mut rng, 1000, FAN_IN).unwrap();
        let sample = param_gen.sample(1000).unwrap();

        assert!(sample.iter().all(|w| (-bound..=bound).contains(w)));
        assert!(sample.iter().any(|&w| w < 0.));
        assert!(sample.iter().any(|&w| w > 0.));
    }

    #[test]
    fn he_uniform_rejects_a_zero_fan_in() {
        let mut rng = seeded_rng();
        assert!(RandParamGen::he_uniform(&mut rng, 1, 0).is_err());
    }

    #[test]
    fn an_inverted_range_fails() {
        let mut rng = seeded_rng();
        let result = RandParamGen::uniform_inclusive(&mut rng, 1, 1., -1.);

        assert!(matches!(result, Err(MlErr::Initialization(_))));
    }

    #[test]
    fn same_seed_same_sample() {
        let mut rng_a = seeded_rng();
        let mut rng_b = seeded_rng();

        let a = RandParamGen::he_uniform(&mut rng_a, 5, 3).unwrap().sample(5);
        let b = RandParamGen::he_uniform(&mut rng_b, 5, 3).unwrap().sample(5);

        assert_eq!(a, b);
    }
}
