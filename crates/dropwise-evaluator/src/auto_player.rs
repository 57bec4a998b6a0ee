//! Self-play: the game session driver.
//!
//! [`AutoPlayer`] wraps a [`GameSession`] and plays it without input. Every
//! time a piece spawns it runs the [`PlacementSearch`], turns and shifts the
//! live piece to the chosen placement and hard drops it, so the next logic
//! tick locks it in. When a game ends, the score is reported to a
//! [`TuningLoop`], which supplies the weights for the next game.
//!
//! # Game Lifecycle
//!
//! ```text
//! NewGame -> start_game -> Playing -> (spawn, search, drop, lock)* -> GameOver
//!                            ^                                          |
//!                            +-------------- start_game ----------------+
//! ```
//!
//! A game also ends when the optional piece limit is reached; the score so far
//! counts exactly like that of a topped-out game.

use dropwise_engine::{GameSession, GameStats, SpawnOutcome, TickOutcome};

use crate::{
    placement_search::{PlacementSearch, SearchError},
    tuning::{TuningAdvance, TuningLoop},
    weights::WeightVector,
};

/// A finished game and the tuning loop's reaction to it.
#[derive(Debug, Clone)]
pub struct GameReport {
    pub stats: GameStats,
    pub advance: TuningAdvance,
}

#[derive(Debug, Clone)]
pub struct AutoPlayer {
    session: GameSession,
    search: PlacementSearch,
    weights: WeightVector,
    piece_limit: Option<usize>,
}

impl AutoPlayer {
    #[must_use]
    pub fn new(session: GameSession, weights: WeightVector) -> Self {
        let search = PlacementSearch::new(session.board());
        Self {
            session,
            search,
            weights,
            piece_limit: None,
        }
    }

    /// Ends every game after `limit` committed pieces (`None` for no limit).
    #[must_use]
    pub fn with_piece_limit(mut self, limit: Option<usize>) -> Self {
        self.piece_limit = limit;
        self
    }

    #[must_use]
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    #[must_use]
    pub fn weights(&self) -> &WeightVector {
        &self.weights
    }

    pub fn set_weights(&mut self, weights: WeightVector) {
        self.weights = weights;
    }

    #[must_use]
    pub fn piece_limit(&self) -> Option<usize> {
        self.piece_limit
    }

    /// Starts a new game and places its first piece.
    pub fn start_game(&mut self) -> Result<(), SearchError> {
        let spawn = self.session.start_new_game();
        self.handle_spawn(spawn)
    }

    /// Runs one logic tick, placing the next piece if one spawned.
    pub fn step(&mut self) -> Result<TickOutcome, SearchError> {
        let outcome = self.session.tick();
        if let TickOutcome::Locked { spawn, .. } = outcome {
            self.handle_spawn(spawn)?;
        }
        Ok(outcome)
    }

    /// Advances one frame of the session clock, running a [`Self::step`] for
    /// every elapsed logic cycle.
    pub fn increment_frame(&mut self) -> Result<(), SearchError> {
        let cycles = self.session.advance_clock();
        for _ in 0..cycles {
            if !self.session.session_state().is_playing() {
                break;
            }
            self.step()?;
        }
        Ok(())
    }

    /// Plays a whole game with the current weights and returns its statistics.
    ///
    /// Logic ticks run back to back without consulting the clock.
    pub fn play_game(&mut self) -> Result<GameStats, SearchError> {
        self.start_game()?;
        while self.session.session_state().is_playing() {
            self.step()?;
        }
        Ok(self.finish_game())
    }

    /// Plays a whole game one clock frame at a time.
    ///
    /// `on_frame` sees the session after every frame, e.g. to draw it or to
    /// wait for the next frame.
    pub fn play_paced_game<F>(&mut self, mut on_frame: F) -> Result<GameStats, SearchError>
    where
        F: FnMut(&GameSession),
    {
        self.start_game()?;
        while self.session.session_state().is_playing() {
            self.increment_frame()?;
            on_frame(&self.session);
        }
        Ok(self.finish_game())
    }

    /// Plays one game with the tuning loop's weights, reports its score and
    /// adopts the weights the loop hands out next.
    pub fn play_tuning_game<T>(&mut self, tuner: &mut T) -> Result<GameReport, SearchError>
    where
        T: TuningLoop + ?Sized,
    {
        self.play_tuning_game_with(tuner, Self::play_game)
    }

    /// Like [`Self::play_tuning_game`], with `play` running the game itself
    /// (for example [`Self::play_paced_game`]).
    pub fn play_tuning_game_with<T, F>(
        &mut self,
        tuner: &mut T,
        play: F,
    ) -> Result<GameReport, SearchError>
    where
        T: TuningLoop + ?Sized,
        F: FnOnce(&mut Self) -> Result<GameStats, SearchError>,
    {
        self.weights = tuner.current_weights();
        let stats = play(self)?;
        tuner.report_game_fitness(stats.score());
        let advance = tuner.advance_if_exhausted();
        self.weights = advance.weights;
        Ok(GameReport { stats, advance })
    }

    fn finish_game(&self) -> GameStats {
        let stats = self.session.stats().clone();
        log::info!(
            "game finished: score {}, {} pieces, {} rows",
            stats.score(),
            stats.completed_pieces(),
            stats.total_cleared_lines()
        );
        stats
    }

    fn handle_spawn(&mut self, spawn: SpawnOutcome) -> Result<(), SearchError> {
        let SpawnOutcome::Spawned(piece) = spawn else {
            return Ok(());
        };
        if self
            .piece_limit
            .is_some_and(|limit| self.session.stats().completed_pieces() >= limit)
        {
            log::debug!("piece limit reached");
            self.session.top_out();
            return Ok(());
        }

        let Some(best) = self
            .search
            .search(piece, self.session.board(), &self.weights)?
        else {
            self.session.top_out();
            return Ok(());
        };
        if self
            .session
            .place_live_piece(best.rotation(), best.column())
            .is_err()
        {
            log::warn!("chosen placement for {piece} collides; ending game");
            self.session.top_out();
            return Ok(());
        }
        self.session.hard_drop();
        Ok(())
    }
}
