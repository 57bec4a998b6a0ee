//! Weight vector of the heuristic and the scoring function.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    board_feature::{BoardFeatures, FeatureKind},
    board_snapshot::BoardSnapshot,
};

/// A weight list did not hold exactly one weight per feature.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("expected {expected} weights, got {actual}")]
pub struct WeightArityError {
    pub expected: usize,
    pub actual: usize,
}

/// One weight per heuristic feature.
///
/// Weights are unconstrained: negative weights penalize a feature, positive
/// weights reward it. Serialized as a JSON array in feature order
/// (height, lines, holes, bumpiness, blockades).
///
/// # Example
///
/// ```
/// use dropwise_evaluator::weights::WeightVector;
///
/// let weights: WeightVector = serde_json::from_str("[-1.0, 0.0, -5.0, 0.0, 0.0]").unwrap();
/// assert_eq!(weights.holes, -5.0);
///
/// assert!(serde_json::from_str::<WeightVector>("[1.0, 2.0]").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "[f64; 5]")]
pub struct WeightVector {
    pub height: f64,
    pub lines: f64,
    pub holes: f64,
    pub bumpiness: f64,
    pub blockades: f64,
}

impl Default for WeightVector {
    fn default() -> Self {
        Self::HAND_TUNED
    }
}

impl WeightVector {
    /// Weights found by an earlier tuning run; a solid default player.
    pub const HAND_TUNED: Self = Self::new([
        -2.841_884_818_353_364,
        90.333_988_580_139_96,
        -86.298_845_239_762_46,
        -17.975_834_223_460_18,
        -3.496_915_438_232_847,
    ]);

    pub const ZERO: Self = Self::new([0.0; FeatureKind::LEN]);

    #[must_use]
    pub const fn new(weights: [f64; FeatureKind::LEN]) -> Self {
        let [height, lines, holes, bumpiness, blockades] = weights;
        Self {
            height,
            lines,
            holes,
            bumpiness,
            blockades,
        }
    }

    #[must_use]
    pub const fn to_array(&self) -> [f64; FeatureKind::LEN] {
        [
            self.height,
            self.lines,
            self.holes,
            self.bumpiness,
            self.blockades,
        ]
    }

    #[must_use]
    pub fn get(&self, kind: FeatureKind) -> f64 {
        match kind {
            FeatureKind::AggregateHeight => self.height,
            FeatureKind::CompletedRows => self.lines,
            FeatureKind::Holes => self.holes,
            FeatureKind::Bumpiness => self.bumpiness,
            FeatureKind::Blockades => self.blockades,
        }
    }

    /// Weighted sum of `features`.
    #[must_use]
    pub fn evaluate(&self, features: &BoardFeatures) -> f64 {
        FeatureKind::ALL
            .iter()
            .map(|kind| self.get(*kind) * f64::from(features.get(*kind)))
            .sum()
    }
}

impl TryFrom<&[f64]> for WeightVector {
    type Error = WeightArityError;

    fn try_from(weights: &[f64]) -> Result<Self, Self::Error> {
        let weights: [f64; FeatureKind::LEN] =
            weights.try_into().map_err(|_| WeightArityError {
                expected: FeatureKind::LEN,
                actual: weights.len(),
            })?;
        Ok(Self::new(weights))
    }
}

impl TryFrom<Vec<f64>> for WeightVector {
    type Error = WeightArityError;

    fn try_from(weights: Vec<f64>) -> Result<Self, Self::Error> {
        Self::try_from(weights.as_slice())
    }
}

impl From<WeightVector> for [f64; FeatureKind::LEN] {
    fn from(weights: WeightVector) -> Self {
        weights.to_array()
    }
}

impl fmt::Display for WeightVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, kind) in FeatureKind::ALL.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={:.4}", kind.id(), self.get(*kind))?;
        }
        Ok(())
    }
}

/// Scores a snapshot: the weighted sum of its features.
///
/// Pure and deterministic; the same snapshot and weights always give the
/// same bits.
#[must_use]
pub fn score(snapshot: &BoardSnapshot, weights: &WeightVector) -> f64 {
    weights.evaluate(&BoardFeatures::from_snapshot(snapshot))
}

#[cfg(test)]
mod tests {
    use dropwise_engine::{Board, BoardDimensions};

    use super::*;

    #[test]
    fn test_arity_is_checked() {
        assert_eq!(
            WeightVector::try_from(vec![1.0; 4]),
            Err(WeightArityError {
                expected: 5,
                actual: 4
            })
        );
        let weights = WeightVector::try_from([1.0, 2.0, 3.0, 4.0, 5.0].as_slice()).unwrap();
        assert_eq!(weights.to_array(), [1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_serializes_as_array() {
        let json = serde_json::to_string(&WeightVector::new([1.0, -2.0, 0.5, 0.0, 3.0])).unwrap();
        assert_eq!(json, "[1.0,-2.0,0.5,0.0,3.0]");
        let err = serde_json::from_str::<WeightVector>("[1,2,3,4,5,6]").unwrap_err();
        assert!(err.to_string().contains("expected 5 weights, got 6"), "{err}");
    }

    #[test]
    fn test_score_is_weighted_sum() {
        let dims = BoardDimensions::new(4, 4, 1).unwrap();
        let board = Board::from_ascii(dims, "....\n#...\n.#..\n##.#\n");
        let snapshot = BoardSnapshot::for_board(&board);
        let features = BoardFeatures::from_snapshot(&snapshot);
        // heights 3, 2, 0, 1; one hole under column 0; one blockade above it
        assert_eq!(features.to_array(), [6, 0, 1, 4, 1]);

        let weights = WeightVector::new([-1.0, 10.0, -100.0, -0.5, -3.0]);
        assert_eq!(score(&snapshot, &weights), -6.0 - 100.0 - 2.0 - 3.0);
        assert_eq!(score(&snapshot, &weights).to_bits(), score(&snapshot, &weights).to_bits());
        assert_eq!(score(&snapshot, &WeightVector::ZERO), 0.0);
    }
}
