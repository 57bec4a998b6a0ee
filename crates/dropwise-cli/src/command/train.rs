use std::path::PathBuf;

use anyhow::Context as _;
use dropwise_engine::{GameSession, PieceQueue};
use dropwise_evaluator::{
    auto_player::AutoPlayer,
    board_feature::FeatureKind,
    tuning::TuningLoop as _,
};
use dropwise_training::genetic::GenerationalTuner;

use crate::{config::GameArgs, schema::TrainedWeights, util::Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    #[clap(flatten)]
    game: GameArgs,
    /// Number of generations to evaluate
    #[arg(long, default_value_t = 10)]
    generations: usize,
    /// Output file path for the best weights (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let TrainArg {
        game,
        generations,
        output,
    } = arg;
    anyhow::ensure!(*generations > 0, "--generations must be at least 1");

    let config = game.load_config()?;
    let seed = config.seed_or_random();
    #[expect(clippy::cast_possible_truncation)]
    let tuner_seed = u128::from(seed) as u64;
    let mut tuner = GenerationalTuner::seeded(config.evolution.clone(), tuner_seed)
        .context("Invalid evolution parameters")?;
    log::info!(
        "training {generations} generations: population {}, {} games per chromosome, seed {seed}",
        tuner.population_size(),
        tuner.games_per_chromosome(),
    );

    let queue = PieceQueue::with_seed(seed, config.randomizer);
    let session = GameSession::new(config.board, queue);
    let mut player = AutoPlayer::new(session, tuner.current_weights())
        .with_piece_limit(config.effective_piece_limit());

    while tuner.generation() < *generations {
        let report = player.play_tuning_game(&mut tuner)?;
        if !report.advance.is_new_generation() {
            continue;
        }
        let Some(summary) = tuner.last_summary() else {
            continue;
        };
        eprintln!("Generation #{}:", summary.generation);
        eprintln!("  Fitness: {}", summary.fitness);
        eprintln!("  Weights:");
        for (kind, stats) in FeatureKind::ALL.iter().zip(&summary.weights) {
            eprintln!(
                "    {:<10} mean {:>9.3}  sd {:>8.3}",
                kind.id(),
                stats.mean,
                stats.std_dev
            );
        }
        eprintln!("  Best: {:.1} [{}]", summary.best.fitness(), summary.best.weights());
    }

    let best = tuner
        .best()
        .context("Training finished without a completed generation")?;
    let trained = TrainedWeights {
        fitness: best.fitness(),
        generations: tuner.generation(),
        seed,
        evolution: config.evolution,
        weights: *best.weights(),
    };
    eprintln!("Training completed: best fitness {:.1}", trained.fitness);
    Output::save_json(&trained, output.as_deref())?;
    if let Some(path) = output {
        eprintln!("Weights saved to {}", path.display());
    }
    Ok(())
}
