//! Run configuration: an optional JSON file overridden by command-line flags.

use std::path::PathBuf;

use dropwise_engine::{BoardDimensions, PieceSeed, Randomizer};
use dropwise_evaluator::weights::WeightVector;
use dropwise_training::genetic::EvolutionParams;
use serde::{Deserialize, Serialize};

use crate::util;

/// Pieces per game when neither the file nor the flags set a limit.
pub const DEFAULT_PIECE_LIMIT: usize = 10_000;

/// Contents of a `--config` file. Every field is optional.
///
/// ```json
/// {
///   "board": { "columns": 10, "visible_rows": 20, "hidden_rows": 4 },
///   "weights": [-2.84, 90.33, -86.30, -17.98, -3.50],
///   "evolution": { "population_size": 20, "games_per_chromosome": 3 },
///   "seed": "0123456789abcdef0123456789abcdef",
///   "randomizer": "seven_bag",
///   "piece_limit": 5000
/// }
/// ```
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub board: BoardDimensions,
    pub weights: WeightVector,
    pub evolution: EvolutionParams,
    pub seed: Option<PieceSeed>,
    pub randomizer: Randomizer,
    /// `0` disables the limit.
    pub piece_limit: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RandomizerArg {
    Uniform,
    SevenBag,
}

impl From<RandomizerArg> for Randomizer {
    fn from(arg: RandomizerArg) -> Self {
        match arg {
            RandomizerArg::Uniform => Randomizer::Uniform,
            RandomizerArg::SevenBag => Randomizer::SevenBag,
        }
    }
}

/// Flags shared by every game-playing command.
#[derive(Default, Debug, Clone, clap::Args)]
pub struct GameArgs {
    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Piece stream seed (32 hex characters); random if omitted
    #[arg(long)]
    seed: Option<PieceSeed>,
    /// How upcoming pieces are drawn
    #[arg(long, value_enum)]
    randomizer: Option<RandomizerArg>,
    /// End each game after this many pieces (0 for no limit)
    #[arg(long)]
    piece_limit: Option<usize>,
}

impl GameArgs {
    /// Loads the configuration file, if any, and applies the flags on top.
    pub fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => util::read_json_file::<Config, _>("config", path)?,
            None => Config::default(),
        };
        self.apply_to(&mut config);
        log::debug!(
            "configuration: {}",
            serde_json::to_string(&config).unwrap_or_default()
        );
        Ok(config)
    }

    fn apply_to(&self, config: &mut Config) {
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(randomizer) = self.randomizer {
            config.randomizer = randomizer.into();
        }
        if let Some(limit) = self.piece_limit {
            config.piece_limit = Some(limit);
        }
    }
}

impl Config {
    /// The configured seed, or a fresh random one.
    pub fn seed_or_random(&self) -> PieceSeed {
        self.seed.unwrap_or_else(rand::random)
    }

    /// Piece limit for self-played games; `None` means unlimited.
    pub fn effective_piece_limit(&self) -> Option<usize> {
        match self.piece_limit {
            Some(0) => None,
            Some(limit) => Some(limit),
            None => Some(DEFAULT_PIECE_LIMIT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.board, BoardDimensions::STANDARD);
        assert_eq!(config.weights, WeightVector::HAND_TUNED);
        assert_eq!(config.effective_piece_limit(), Some(DEFAULT_PIECE_LIMIT));
    }

    #[test]
    fn test_full_file() {
        let json = r#"{
            "board": { "columns": 8, "visible_rows": 16, "hidden_rows": 2 },
            "weights": [-1.0, 2.0, -3.0, -4.0, -5.0],
            "evolution": { "population_size": 6 },
            "seed": "000000000000000000000000000000ff",
            "randomizer": "seven_bag",
            "piece_limit": 0
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.board.columns(), 8);
        assert_eq!(config.weights.holes, -3.0);
        assert_eq!(config.evolution.population_size, 6);
        assert_eq!(config.evolution.elite_count, 2);
        assert_eq!(config.seed, Some(PieceSeed::from(0xff)));
        assert_eq!(config.randomizer, Randomizer::SevenBag);
        assert_eq!(config.effective_piece_limit(), None);
    }

    #[test]
    fn test_wrong_weight_count_is_rejected() {
        let err = serde_json::from_str::<Config>(r#"{ "weights": [1.0, 2.0, 3.0] }"#).unwrap_err();
        assert!(err.to_string().contains("expected 5 weights, got 3"), "{err}");
    }

    #[test]
    fn test_flags_override_file() {
        let mut config = Config {
            seed: Some(PieceSeed::from(1)),
            piece_limit: Some(50),
            ..Config::default()
        };
        let args = GameArgs {
            seed: Some(PieceSeed::from(2)),
            randomizer: Some(RandomizerArg::SevenBag),
            ..GameArgs::default()
        };
        args.apply_to(&mut config);
        assert_eq!(config.seed, Some(PieceSeed::from(2)));
        assert_eq!(config.randomizer, Randomizer::SevenBag);
        assert_eq!(config.effective_piece_limit(), Some(50));
    }
}
