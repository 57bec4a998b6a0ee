//! The contract between self-play and a weight-tuning loop.
//!
//! A tuning loop hands out the weight vector to play with, receives the score
//! of every finished game and decides when to move on to another candidate.
//! The self-play driver only sees this trait; how candidates are bred and
//! selected is up to the implementation (see `dropwise-training`).

use crate::weights::WeightVector;

/// What happened when the tuning loop was asked to advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum TuningStep {
    /// The current candidate still has games to play.
    SameChromosome,
    /// The current candidate is finished; the next one in the population is up.
    NextChromosome,
    /// The whole population was evaluated and a new generation was bred.
    NewGeneration,
}

/// Weights to use for the next game and how they were chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TuningAdvance {
    pub weights: WeightVector,
    pub step: TuningStep,
}

impl TuningAdvance {
    #[must_use]
    pub fn is_new_generation(&self) -> bool {
        self.step.is_new_generation()
    }
}

pub trait TuningLoop {
    /// Weights the next game should be played with.
    fn current_weights(&self) -> WeightVector;

    /// Adds a finished game's score to the current candidate's fitness.
    fn report_game_fitness(&mut self, score: u64);

    /// Moves to the next candidate (or generation) once the current one has
    /// played all its games.
    fn advance_if_exhausted(&mut self) -> TuningAdvance;

    /// Games each candidate plays before its fitness is final.
    fn games_per_chromosome(&self) -> usize;

    fn population_size(&self) -> usize;
}

/// A tuning loop that never changes its weights.
///
/// Used to play with a fixed weight vector; it keeps a running total of the
/// reported scores.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedWeights {
    weights: WeightVector,
    games: usize,
    total_score: u64,
}

impl FixedWeights {
    #[must_use]
    pub fn new(weights: WeightVector) -> Self {
        Self {
            weights,
            games: 0,
            total_score: 0,
        }
    }

    #[must_use]
    pub fn games(&self) -> usize {
        self.games
    }

    /// Mean score of the reported games, or `None` before the first one.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn mean_score(&self) -> Option<f64> {
        (self.games > 0).then(|| self.total_score as f64 / self.games as f64)
    }
}

impl TuningLoop for FixedWeights {
    fn current_weights(&self) -> WeightVector {
        self.weights
    }

    fn report_game_fitness(&mut self, score: u64) {
        self.games += 1;
        self.total_score += score;
    }

    fn advance_if_exhausted(&mut self) -> TuningAdvance {
        TuningAdvance {
            weights: self.weights,
            step: TuningStep::SameChromosome,
        }
    }

    fn games_per_chromosome(&self) -> usize {
        1
    }

    fn population_size(&self) -> usize {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_weights_never_advance() {
        let mut tuner = FixedWeights::new(WeightVector::HAND_TUNED);
        assert_eq!(tuner.mean_score(), None);
        for score in [100, 300] {
            tuner.report_game_fitness(score);
            let advance = tuner.advance_if_exhausted();
            assert!(advance.step.is_same_chromosome());
            assert!(!advance.is_new_generation());
            assert_eq!(advance.weights, WeightVector::HAND_TUNED);
        }
        assert_eq!(tuner.games(), 2);
        assert_eq!(tuner.mean_score(), Some(200.0));
    }
}
