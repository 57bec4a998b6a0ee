//! Genetic operators on weight vectors.
//!
//! Heuristic weights are signed: a feature the player should avoid (holes,
//! height) gets a negative weight, a feature it should seek (completed rows)
//! a positive one. Every operator keeps each weight inside
//! `[-max_weight, max_weight]`.
//!
//! - [`random`] draws an initial vector
//! - [`blx_alpha`] blends two parents
//! - [`mutate`] adds Gaussian noise to some of the weights

use dropwise_evaluator::weights::WeightVector;
use rand::Rng;
use rand_distr::Normal;

/// Draws every weight uniformly from `[-max_weight, max_weight]`.
pub fn random<R>(rng: &mut R, max_weight: f64) -> WeightVector
where
    R: Rng + ?Sized,
{
    WeightVector::new(std::array::from_fn(|_| {
        rng.random_range(-max_weight..=max_weight)
    }))
}

/// BLX-α crossover.
///
/// For each weight, with parents `x1` and `x2` and `d = |x1 - x2|`, the child
/// value is drawn uniformly from `[min - α·d, max + α·d]` and clamped to
/// `[-max_weight, max_weight]`.
///
/// # Examples
///
/// ```
/// use dropwise_evaluator::weights::WeightVector;
/// use dropwise_training::weights;
///
/// let mut rng = rand::rng();
/// let parent = WeightVector::new([-1.0, 2.0, -3.0, 4.0, -5.0]);
/// // identical parents and no expansion leave nothing to blend
/// let child = weights::blx_alpha(&parent, &parent, 0.0, 10.0, &mut rng);
/// assert_eq!(child, parent);
/// ```
pub fn blx_alpha<R>(
    p1: &WeightVector,
    p2: &WeightVector,
    alpha: f64,
    max_weight: f64,
    rng: &mut R,
) -> WeightVector
where
    R: Rng + ?Sized,
{
    let p1 = p1.to_array();
    let p2 = p2.to_array();
    WeightVector::new(std::array::from_fn(|i| {
        let min = f64::min(p1[i], p2[i]);
        let max = f64::max(p1[i], p2[i]);
        let d = max - min;
        let lower = min - alpha * d;
        let upper = max + alpha * d;
        rng.random_range(lower..=upper)
            .clamp(-max_weight, max_weight)
    }))
}

/// Gaussian mutation.
///
/// Each weight is, with probability `rate`, shifted by a sample of
/// `N(0, sigma)` and clamped to `[-max_weight, max_weight]`. An invalid
/// `sigma` (negative or not finite) leaves the vector unchanged.
pub fn mutate<R>(weights: &mut WeightVector, sigma: f64, max_weight: f64, rate: f64, rng: &mut R)
where
    R: Rng + ?Sized,
{
    let Ok(normal) = Normal::new(0.0, sigma) else {
        log::warn!("invalid mutation sigma {sigma}; skipping mutation");
        return;
    };
    let mut values = weights.to_array();
    for w in &mut values {
        if rng.random_bool(rate.clamp(0.0, 1.0)) {
            *w = (*w + rng.sample(normal)).clamp(-max_weight, max_weight);
        }
    }
    *weights = WeightVector::new(values);
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn in_range(weights: &WeightVector, max_weight: f64) -> bool {
        weights
            .to_array()
            .iter()
            .all(|w| (-max_weight..=max_weight).contains(w))
    }

    #[test]
    fn test_random_stays_in_range() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut saw_negative = false;
        for _ in 0..50 {
            let w = random(&mut rng, 3.0);
            assert!(in_range(&w, 3.0));
            saw_negative |= w.to_array().iter().any(|w| *w < 0.0);
        }
        assert!(saw_negative);
    }

    #[test]
    fn test_blx_alpha_without_expansion_stays_between_parents() {
        let mut rng = Pcg32::seed_from_u64(2);
        let p1 = WeightVector::new([-10.0, 0.0, 5.0, 1.0, -1.0]);
        let p2 = WeightVector::new([10.0, 4.0, 5.0, 2.0, -3.0]);
        for _ in 0..50 {
            let child = blx_alpha(&p1, &p2, 0.0, 100.0, &mut rng).to_array();
            for (i, c) in child.iter().enumerate() {
                let lo = f64::min(p1.to_array()[i], p2.to_array()[i]);
                let hi = f64::max(p1.to_array()[i], p2.to_array()[i]);
                assert!((lo..=hi).contains(c), "weight {i}: {c}");
            }
        }
    }

    #[test]
    fn test_blx_alpha_is_clamped() {
        let mut rng = Pcg32::seed_from_u64(3);
        let p1 = WeightVector::new([-9.0; 5]);
        let p2 = WeightVector::new([9.0; 5]);
        for _ in 0..50 {
            assert!(in_range(&blx_alpha(&p1, &p2, 2.0, 10.0, &mut rng), 10.0));
        }
    }

    #[test]
    fn test_mutate_rate_bounds() {
        let mut rng = Pcg32::seed_from_u64(4);
        let base = WeightVector::HAND_TUNED;

        let mut unchanged = base;
        mutate(&mut unchanged, 5.0, 100.0, 0.0, &mut rng);
        assert_eq!(unchanged, base);

        let mut changed = base;
        mutate(&mut changed, 5.0, 100.0, 1.0, &mut rng);
        assert!(in_range(&changed, 100.0));
        assert_ne!(changed, base);

        let mut invalid = base;
        mutate(&mut invalid, -1.0, 100.0, 1.0, &mut rng);
        assert_eq!(invalid, base);
    }
}
