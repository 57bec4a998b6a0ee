//! Generational evolutionary tuning of the heuristic weights.
//!
//! [`GenerationalTuner`] implements the self-play
//! [`TuningLoop`](dropwise_evaluator::tuning::TuningLoop): it hands out one
//! chromosome's weights at a time, collects the raw score of every game played
//! with them and, once the chromosome has played exactly
//! [`EvolutionParams::games_per_chromosome`] games, divides the accumulated
//! score by that count to get its fitness.
//!
//! When the last chromosome of the population is finished the tuner breeds the
//! next generation:
//!
//! 1. **Elite Selection** - the `elite_count` fittest chromosomes are copied
//! 2. **Tournament Selection** - two parents, each the fittest of a random draw
//!    of `tournament_size` chromosomes
//! 3. **Crossover (BLX-α)** - see [`weights::blx_alpha`]
//! 4. **Mutation** - see [`weights::mutate`]
//!
//! Every chromosome of the new generation, elites included, starts again from
//! zero fitness and is re-evaluated.
//!
//! # Example
//!
//! ```
//! use dropwise_evaluator::tuning::{TuningLoop, TuningStep};
//! use dropwise_training::genetic::{EvolutionParams, GenerationalTuner};
//!
//! let params = EvolutionParams {
//!     population_size: 2,
//!     games_per_chromosome: 1,
//!     elite_count: 1,
//!     ..EvolutionParams::default()
//! };
//! let mut tuner = GenerationalTuner::seeded(params, 42).unwrap();
//!
//! tuner.report_game_fitness(400);
//! assert_eq!(tuner.advance_if_exhausted().step, TuningStep::NextChromosome);
//! tuner.report_game_fitness(100);
//! assert!(tuner.advance_if_exhausted().is_new_generation());
//! assert_eq!(tuner.generation(), 1);
//! assert_eq!(tuner.best().unwrap().fitness(), 400.0);
//! ```

use std::fmt;

use dropwise_evaluator::{
    board_feature::FeatureKind,
    tuning::{TuningAdvance, TuningLoop, TuningStep},
    weights::WeightVector,
};
use dropwise_stats::descriptive::DescriptiveStats;
use rand::{Rng, SeedableRng as _, seq::IndexedRandom as _};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::weights;

/// Evolution parameters were out of range.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum EvolutionParamsError {
    #[display("population size must be at least 1")]
    EmptyPopulation,
    #[display("games per chromosome must be at least 1")]
    NoGames,
    #[display("elite count {elite_count} must be less than population size {population_size}")]
    TooManyElites {
        elite_count: usize,
        population_size: usize,
    },
    #[display("tournament size must be at least 1")]
    EmptyTournament,
    #[display("max weight must be positive and finite, got {_0}")]
    InvalidMaxWeight(#[error(not(source))] f64),
    #[display("BLX alpha must be non-negative and finite, got {_0}")]
    InvalidBlxAlpha(#[error(not(source))] f64),
    #[display("mutation rate must be within [0, 1], got {_0}")]
    InvalidMutationRate(#[error(not(source))] f64),
    #[display("mutation sigma must be non-negative and finite, got {_0}")]
    InvalidMutationSigma(#[error(not(source))] f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvolutionParams {
    pub population_size: usize,
    /// Games each chromosome plays before its fitness is final.
    pub games_per_chromosome: usize,
    /// Fittest chromosomes copied unchanged into the next generation.
    pub elite_count: usize,
    pub tournament_size: usize,
    /// Weights are kept within `[-max_weight, max_weight]`.
    pub max_weight: f64,
    pub blx_alpha: f64,
    /// Probability of mutating each weight of a child.
    pub mutation_rate: f64,
    pub mutation_sigma: f64,
}

impl Default for EvolutionParams {
    fn default() -> Self {
        Self {
            population_size: 20,
            games_per_chromosome: 3,
            elite_count: 2,
            tournament_size: 3,
            max_weight: 100.0,
            blx_alpha: 0.3,
            mutation_rate: 0.2,
            mutation_sigma: 5.0,
        }
    }
}

impl EvolutionParams {
    pub fn validate(&self) -> Result<(), EvolutionParamsError> {
        use EvolutionParamsError as E;
        if self.population_size == 0 {
            return Err(E::EmptyPopulation);
        }
        if self.games_per_chromosome == 0 {
            return Err(E::NoGames);
        }
        if self.elite_count >= self.population_size {
            return Err(E::TooManyElites {
                elite_count: self.elite_count,
                population_size: self.population_size,
            });
        }
        if self.tournament_size == 0 {
            return Err(E::EmptyTournament);
        }
        if !(self.max_weight.is_finite() && self.max_weight > 0.0) {
            return Err(E::InvalidMaxWeight(self.max_weight));
        }
        if !(self.blx_alpha.is_finite() && self.blx_alpha >= 0.0) {
            return Err(E::InvalidBlxAlpha(self.blx_alpha));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(E::InvalidMutationRate(self.mutation_rate));
        }
        if !(self.mutation_sigma.is_finite() && self.mutation_sigma >= 0.0) {
            return Err(E::InvalidMutationSigma(self.mutation_sigma));
        }
        Ok(())
    }
}

/// One candidate weight vector and its fitness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chromosome {
    weights: WeightVector,
    fitness: f64,
}

impl Chromosome {
    #[must_use]
    pub fn new(weights: WeightVector) -> Self {
        Self {
            weights,
            fitness: 0.0,
        }
    }

    #[must_use]
    pub fn weights(&self) -> &WeightVector {
        &self.weights
    }

    /// Accumulated score while the chromosome is being played; its mean
    /// score per game once it is finished.
    #[must_use]
    pub fn fitness(&self) -> f64 {
        self.fitness
    }
}

/// Statistics of a fully evaluated generation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSummary {
    pub generation: usize,
    pub fitness: DescriptiveStats,
    /// Per-feature weight statistics, in [`FeatureKind::ALL`] order.
    pub weights: Vec<DescriptiveStats>,
    pub best: Chromosome,
}

impl fmt::Display for GenerationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "generation {}: fitness {}; best {:.1} [{}]",
            self.generation, self.fitness, self.best.fitness, self.best.weights
        )
    }
}

/// Generational evolutionary tuner.
#[derive(Debug, Clone)]
pub struct GenerationalTuner<R = Pcg32> {
    params: EvolutionParams,
    rng: R,
    population: Vec<Chromosome>,
    current: usize,
    games_played: usize,
    generation: usize,
    best: Option<Chromosome>,
    last_summary: Option<GenerationSummary>,
}

impl GenerationalTuner<Pcg32> {
    /// Creates a tuner whose whole run is reproducible from `seed`.
    pub fn seeded(params: EvolutionParams, seed: u64) -> Result<Self, EvolutionParamsError> {
        Self::new(params, Pcg32::seed_from_u64(seed))
    }
}

impl<R> GenerationalTuner<R>
where
    R: Rng,
{
    /// Creates a tuner with a random initial population.
    pub fn new(params: EvolutionParams, mut rng: R) -> Result<Self, EvolutionParamsError> {
        params.validate()?;
        let population = (0..params.population_size)
            .map(|_| Chromosome::new(weights::random(&mut rng, params.max_weight)))
            .collect();
        Ok(Self {
            params,
            rng,
            population,
            current: 0,
            games_played: 0,
            generation: 0,
            best: None,
            last_summary: None,
        })
    }

    #[must_use]
    pub fn params(&self) -> &EvolutionParams {
        &self.params
    }

    /// Number of generations bred so far.
    #[must_use]
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Index of the chromosome currently being played.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Games the current chromosome has played so far.
    #[must_use]
    pub fn games_played(&self) -> usize {
        self.games_played
    }

    #[must_use]
    pub fn population(&self) -> &[Chromosome] {
        &self.population
    }

    /// Fittest chromosome of all finished generations.
    #[must_use]
    pub fn best(&self) -> Option<&Chromosome> {
        self.best.as_ref()
    }

    #[must_use]
    pub fn last_summary(&self) -> Option<&GenerationSummary> {
        self.last_summary.as_ref()
    }

    #[expect(clippy::cast_precision_loss)]
    fn finish_chromosome(&mut self) {
        let fitness = &mut self.population[self.current].fitness;
        *fitness /= self.params.games_per_chromosome as f64;
        let fitness = *fitness;
        log::info!(
            "generation {} chromosome {}/{}: fitness {fitness:.1}",
            self.generation,
            self.current + 1,
            self.population.len(),
        );
        self.games_played = 0;
        self.current += 1;
    }

    fn finish_generation(&mut self) {
        self.population
            .sort_by(|a, b| b.fitness.total_cmp(&a.fitness));
        let summary = self.summarize();
        log::info!("{summary}");
        if self
            .best
            .is_none_or(|best| summary.best.fitness > best.fitness)
        {
            self.best = Some(summary.best);
        }
        self.last_summary = Some(summary);

        self.population = self.breed();
        self.current = 0;
        self.generation += 1;
    }

    fn summarize(&self) -> GenerationSummary {
        let fitness = DescriptiveStats::new(self.population.iter().map(|c| c.fitness))
            .expect("population is never empty");
        let weights = FeatureKind::ALL
            .iter()
            .map(|kind| {
                DescriptiveStats::new(self.population.iter().map(|c| c.weights.get(*kind)))
                    .expect("population is never empty")
            })
            .collect();
        GenerationSummary {
            generation: self.generation,
            fitness,
            weights,
            best: self.population[0],
        }
    }

    /// Breeds the next generation from a population sorted by fitness.
    fn breed(&mut self) -> Vec<Chromosome> {
        let params = &self.params;
        let mut next = self.population[..params.elite_count]
            .iter()
            .map(|elite| Chromosome::new(elite.weights))
            .collect::<Vec<_>>();

        while next.len() < self.population.len() {
            let p1 = tournament_select(&self.population, params.tournament_size, &mut self.rng);
            let p2 = tournament_select(&self.population, params.tournament_size, &mut self.rng);
            let mut child = weights::blx_alpha(
                &p1.weights,
                &p2.weights,
                params.blx_alpha,
                params.max_weight,
                &mut self.rng,
            );
            weights::mutate(
                &mut child,
                params.mutation_sigma,
                params.max_weight,
                params.mutation_rate,
                &mut self.rng,
            );
            next.push(Chromosome::new(child));
        }
        next
    }
}

impl<R> TuningLoop for GenerationalTuner<R>
where
    R: Rng,
{
    fn current_weights(&self) -> WeightVector {
        self.population[self.current].weights
    }

    #[expect(clippy::cast_precision_loss)]
    fn report_game_fitness(&mut self, score: u64) {
        if self.games_played >= self.params.games_per_chromosome {
            log::warn!(
                "chromosome {} already played {} games; ignoring score {score}",
                self.current,
                self.games_played
            );
            return;
        }
        self.population[self.current].fitness += score as f64;
        self.games_played += 1;
    }

    fn advance_if_exhausted(&mut self) -> TuningAdvance {
        let step = if self.games_played < self.params.games_per_chromosome {
            TuningStep::SameChromosome
        } else {
            self.finish_chromosome();
            if self.current < self.population.len() {
                TuningStep::NextChromosome
            } else {
                self.finish_generation();
                TuningStep::NewGeneration
            }
        };
        TuningAdvance {
            weights: self.current_weights(),
            step,
        }
    }

    fn games_per_chromosome(&self) -> usize {
        self.params.games_per_chromosome
    }

    fn population_size(&self) -> usize {
        self.params.population_size
    }
}

/// Returns the fittest of `tournament_size` distinct random chromosomes.
fn tournament_select<'a, R>(
    population: &'a [Chromosome],
    tournament_size: usize,
    rng: &mut R,
) -> &'a Chromosome
where
    R: Rng + ?Sized,
{
    population
        .choose_multiple(rng, tournament_size)
        .max_by(|a, b| a.fitness.total_cmp(&b.fitness))
        .unwrap_or(&population[0])
}

#[cfg(test)]
mod tests {
    use dropwise_engine::{BoardDimensions, GameSession, PieceQueue, PieceSeed, Randomizer};
    use dropwise_evaluator::auto_player::AutoPlayer;

    use super::*;

    fn params(population_size: usize, games_per_chromosome: usize) -> EvolutionParams {
        EvolutionParams {
            population_size,
            games_per_chromosome,
            elite_count: 1,
            ..EvolutionParams::default()
        }
    }

    #[test]
    fn test_default_params_are_valid() {
        assert_eq!(EvolutionParams::default().validate(), Ok(()));
    }

    #[test]
    fn test_invalid_params_are_rejected() {
        use EvolutionParamsError as E;
        let cases = [
            (params(0, 3), E::EmptyPopulation),
            (params(4, 0), E::NoGames),
            (
                params(1, 3),
                E::TooManyElites {
                    elite_count: 1,
                    population_size: 1,
                },
            ),
            (
                EvolutionParams {
                    tournament_size: 0,
                    ..EvolutionParams::default()
                },
                E::EmptyTournament,
            ),
            (
                EvolutionParams {
                    mutation_rate: 1.5,
                    ..EvolutionParams::default()
                },
                E::InvalidMutationRate(1.5),
            ),
            (
                EvolutionParams {
                    max_weight: 0.0,
                    ..EvolutionParams::default()
                },
                E::InvalidMaxWeight(0.0),
            ),
        ];
        for (params, expected) in cases {
            assert_eq!(params.validate(), Err(expected.clone()), "{expected}");
            assert!(GenerationalTuner::seeded(params, 0).is_err());
        }
    }

    #[test]
    fn test_params_fill_missing_fields() {
        let params: EvolutionParams =
            serde_json::from_str(r#"{ "population_size": 4, "mutation_sigma": 1.5 }"#).unwrap();
        assert_eq!(params.population_size, 4);
        assert_eq!(params.mutation_sigma, 1.5);
        assert_eq!(params.games_per_chromosome, 3);
        assert!(serde_json::from_str::<EvolutionParams>(r#"{ "populaton": 4 }"#).is_err());
    }

    #[test]
    fn test_fitness_is_averaged_over_games() {
        let mut tuner = GenerationalTuner::seeded(params(2, 3), 1).unwrap();
        let first = tuner.current_weights();

        for score in [100, 200] {
            tuner.report_game_fitness(score);
            let advance = tuner.advance_if_exhausted();
            assert_eq!(advance.step, TuningStep::SameChromosome);
            assert_eq!(advance.weights, first);
        }
        tuner.report_game_fitness(300);
        let advance = tuner.advance_if_exhausted();
        assert_eq!(advance.step, TuningStep::NextChromosome);
        assert_eq!(tuner.population()[0].fitness(), 200.0);
        assert_eq!(tuner.current_index(), 1);
        assert_eq!(advance.weights, tuner.population()[1].weights);
    }

    #[test]
    fn test_advance_without_games_keeps_chromosome() {
        let mut tuner = GenerationalTuner::seeded(params(2, 1), 2).unwrap();
        assert!(tuner.advance_if_exhausted().step.is_same_chromosome());
        assert_eq!(tuner.current_index(), 0);
    }

    #[test]
    fn test_extra_scores_are_not_counted() {
        let mut tuner = GenerationalTuner::seeded(params(2, 2), 3).unwrap();
        for score in [100, 300, 10_000] {
            tuner.report_game_fitness(score);
        }
        assert_eq!(tuner.games_played(), 2);
        tuner.advance_if_exhausted();
        assert_eq!(tuner.population()[0].fitness(), 200.0);
    }

    #[test]
    fn test_new_generation_keeps_elite() {
        let mut tuner = GenerationalTuner::seeded(params(3, 2), 4).unwrap();
        let mut steps = vec![];
        let scores = [[0, 200], [900, 300], [100, 100]];
        let winner = tuner.population()[1].weights;
        for games in scores {
            for score in games {
                tuner.report_game_fitness(score);
                steps.push(tuner.advance_if_exhausted().step);
            }
        }
        assert_eq!(
            steps,
            [
                TuningStep::SameChromosome,
                TuningStep::NextChromosome,
                TuningStep::SameChromosome,
                TuningStep::NextChromosome,
                TuningStep::SameChromosome,
                TuningStep::NewGeneration,
            ]
        );

        assert_eq!(tuner.generation(), 1);
        assert_eq!(tuner.current_index(), 0);
        assert_eq!(tuner.population().len(), 3);
        assert!(tuner.population().iter().all(|c| c.fitness() == 0.0));
        assert_eq!(tuner.population()[0].weights, winner);
        assert_eq!(tuner.current_weights(), winner);

        let best = tuner.best().unwrap();
        assert_eq!(best.fitness(), 600.0);
        assert_eq!(best.weights, winner);

        let summary = tuner.last_summary().unwrap();
        assert_eq!(summary.generation, 0);
        assert_eq!(summary.fitness.max, 600.0);
        assert_eq!(summary.fitness.min, 100.0);
        assert_eq!(summary.weights.len(), FeatureKind::LEN);
    }

    #[test]
    fn test_same_seed_same_population() {
        let a = GenerationalTuner::seeded(EvolutionParams::default(), 9).unwrap();
        let b = GenerationalTuner::seeded(EvolutionParams::default(), 9).unwrap();
        assert_eq!(a.population(), b.population());
        let max = a.params().max_weight;
        assert!(a.population().iter().all(|c| {
            c.weights
                .to_array()
                .iter()
                .all(|w| (-max..=max).contains(w))
        }));
    }

    #[test]
    fn test_self_play_drives_generations() {
        let queue = PieceQueue::with_seed(PieceSeed::from(11), Randomizer::Uniform);
        let session = GameSession::new(BoardDimensions::STANDARD, queue);
        let mut player =
            AutoPlayer::new(session, WeightVector::HAND_TUNED).with_piece_limit(Some(15));
        let mut tuner = GenerationalTuner::seeded(params(2, 2), 5).unwrap();

        let mut new_generations = 0;
        for _ in 0..8 {
            let report = player.play_tuning_game(&mut tuner).unwrap();
            assert!(report.stats.completed_pieces() <= 15);
            assert_eq!(player.weights(), &tuner.current_weights());
            if report.advance.is_new_generation() {
                new_generations += 1;
            }
        }
        assert_eq!(new_generations, 2);
        assert_eq!(tuner.generation(), 2);
    }
}
