//! Evolutionary tuning of the heuristic weight vector through self-play.
//!
//! - [`genetic`] - [`GenerationalTuner`](genetic::GenerationalTuner), the
//!   [`TuningLoop`](dropwise_evaluator::tuning::TuningLoop) that evaluates and
//!   breeds a population of weight vectors
//! - [`weights`] - Genetic operators (random initialization, BLX-α crossover,
//!   Gaussian mutation)
//!
//! # Training Flow
//!
//! ```text
//! AutoPlayer plays a game with current_weights()
//!     -> report_game_fitness(score)
//!     -> advance_if_exhausted()
//!          SameChromosome   the chromosome still has games left
//!          NextChromosome   fitness = total score / games, next chromosome
//!          NewGeneration    population bred: elites + tournament/BLX/mutation
//! ```
//!
//! # Limitations
//!
//! - **Noisy fitness**: a chromosome's fitness is the mean of a few games on
//!   random piece streams, so ranking between close chromosomes is unreliable.
//! - **Sequential evaluation**: games are played one after another, in the
//!   order the tuning loop hands out chromosomes.

pub mod genetic;
pub mod weights;
