use std::{path::PathBuf, thread, time::Duration};

use dropwise_engine::{DEFAULT_FPS, GameSession, GameStats, PieceQueue};
use dropwise_evaluator::{
    auto_player::AutoPlayer,
    placement_search::SearchError,
    tuning::FixedWeights,
};
use dropwise_stats::descriptive::DescriptiveStats;

use crate::{config::GameArgs, schema::TrainedWeights, util};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct AutoPlayArg {
    #[clap(flatten)]
    game: GameArgs,
    /// Number of games to play
    #[arg(long, default_value_t = 1)]
    games: usize,
    /// Weights saved by `train`; overrides the configured weights
    #[arg(long)]
    weights: Option<PathBuf>,
    /// Drive the game from the frame clock and draw the board after every piece
    #[arg(long, default_value_t = false)]
    paced: bool,
}

pub(crate) fn run(arg: &AutoPlayArg) -> anyhow::Result<()> {
    let AutoPlayArg {
        game,
        games,
        weights,
        paced,
    } = arg;

    let mut config = game.load_config()?;
    if let Some(path) = weights {
        let trained: TrainedWeights = util::read_json_file("weights", path)?;
        config.weights = trained.weights;
    }
    let seed = config.seed_or_random();
    log::info!("piece seed {seed}, weights [{}]", config.weights);

    let queue = PieceQueue::with_seed(seed, config.randomizer);
    let session = GameSession::new(config.board, queue);
    let mut player = AutoPlayer::new(session, config.weights)
        .with_piece_limit(config.effective_piece_limit());
    let mut tuner = FixedWeights::new(config.weights);

    let mut scores = vec![];
    for game_index in 0..*games {
        let report = if *paced {
            player.play_tuning_game_with(&mut tuner, play_paced)?
        } else {
            player.play_tuning_game(&mut tuner)?
        };
        let score = report.stats.score();
        let stats = player.session().stats();
        log::info!(
            "game {}/{games}: score {score}, {} pieces, clears {:?}",
            game_index + 1,
            stats.completed_pieces(),
            stats.line_cleared_counter(),
        );
        #[expect(clippy::cast_precision_loss)]
        let score = score as f64;
        scores.push(score);
    }

    if let Some(stats) = DescriptiveStats::new(scores) {
        eprintln!("Scores: {stats}");
    }
    if let Some(mean) = tuner.mean_score() {
        log::debug!("mean reported score {mean:.1}");
    }
    Ok(())
}

fn play_paced(player: &mut AutoPlayer) -> Result<GameStats, SearchError> {
    let frame = Duration::from_secs(1) / DEFAULT_FPS;
    let mut drawn_pieces = usize::MAX;
    player.play_paced_game(|session| {
        let pieces = session.stats().completed_pieces();
        if pieces != drawn_pieces {
            drawn_pieces = pieces;
            eprintln!(
                "score {} pieces {pieces} next {}",
                session.score(),
                session.next_piece()
            );
            eprintln!("{}", session.board().to_ascii());
        }
        thread::sleep(frame);
    })
}
