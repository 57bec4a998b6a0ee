use crate::{
    PieceCollisionError,
    core::{
        board::Board,
        dimensions::BoardDimensions,
        piece::{Piece, PieceKind, PieceRotation},
    },
};

use super::{GameStats, LogicClock, PieceQueue};

/// Frame rate assumed by [`GameSession::new`].
pub const DEFAULT_FPS: u32 = 60;

/// Logic cycles per second assumed by [`GameSession::new`].
pub const DEFAULT_GAME_SPEED: f64 = 999.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    NewGame,
    Playing,
    Paused,
    GameOver,
}

/// Result of bringing a new piece into play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SpawnOutcome {
    Spawned(Piece),
    /// The spawn-buffer row was occupied: the board has been cleared and the
    /// game is over.
    ToppedOut,
}

/// Result of one logic tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum TickOutcome {
    /// Nothing to do: the game is not running.
    Idle,
    /// The live piece moved down one row.
    Fell,
    /// The live piece could not fall and was written into the board.
    Locked {
        cleared_rows: usize,
        spawn: SpawnOutcome,
    },
}

/// One game at a time on a single board.
///
/// Owns the settled board, the live (falling) piece, the piece stream, the
/// logic clock and the statistics of the current game.
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    queue: PieceQueue,
    falling_piece: Option<Piece>,
    stats: GameStats,
    session_state: SessionState,
    clock: LogicClock,
    game_speed: f64,
}

impl GameSession {
    #[must_use]
    pub fn new(dims: BoardDimensions, queue: PieceQueue) -> Self {
        Self::with_speed(dims, queue, DEFAULT_FPS, DEFAULT_GAME_SPEED)
    }

    /// Creates a session whose clock runs at `fps` frames and `game_speed`
    /// logic cycles per second.
    #[must_use]
    pub fn with_speed(dims: BoardDimensions, queue: PieceQueue, fps: u32, game_speed: f64) -> Self {
        let mut clock = LogicClock::new(fps, game_speed);
        clock.set_paused(true);
        Self {
            board: Board::new(dims),
            queue,
            falling_piece: None,
            stats: GameStats::new(),
            session_state: SessionState::NewGame,
            clock,
            game_speed,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Replaces the settled board, e.g. to set up a position.
    ///
    /// The session adopts the dimensions of `board`. A live piece that no
    /// longer fits is dropped.
    pub fn set_board(&mut self, board: Board) {
        self.board = board;
        if self
            .falling_piece
            .is_some_and(|piece| self.board.is_colliding(piece))
        {
            self.falling_piece = None;
        }
    }

    #[must_use]
    pub fn dimensions(&self) -> &BoardDimensions {
        self.board.dimensions()
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn score(&self) -> u64 {
        self.stats.score()
    }

    #[must_use]
    pub fn session_state(&self) -> SessionState {
        self.session_state
    }

    #[must_use]
    pub fn falling_piece(&self) -> Option<Piece> {
        self.falling_piece
    }

    #[must_use]
    pub fn next_piece(&self) -> PieceKind {
        self.queue.peek_next()
    }

    /// Where the live piece would land if hard dropped now.
    #[must_use]
    pub fn landing_piece(&self) -> Option<Piece> {
        self.falling_piece
            .map(|piece| self.board.drop_position(piece))
    }

    #[must_use]
    pub fn clock(&self) -> &LogicClock {
        &self.clock
    }

    #[must_use]
    pub fn game_speed(&self) -> f64 {
        self.game_speed
    }

    /// Clears the board and statistics and spawns the first piece.
    pub fn start_new_game(&mut self) -> SpawnOutcome {
        self.board.clear();
        self.stats.reset();
        self.falling_piece = None;
        self.session_state = SessionState::Playing;
        self.clock.reset();
        self.clock.set_paused(false);
        log::debug!("new game started");
        self.spawn_piece()
    }

    /// Takes the next piece from the queue and places it at its spawn position.
    ///
    /// The game ends instead when the spawn-buffer row is occupied or the
    /// spawned piece would overlap settled cells.
    pub fn spawn_piece(&mut self) -> SpawnOutcome {
        if self.board.is_spawn_buffer_occupied() {
            return self.top_out();
        }
        let piece = Piece::spawn(self.queue.pop_next(), self.board.dimensions());
        if self.board.is_colliding(piece) {
            return self.top_out();
        }
        self.falling_piece = Some(piece);
        SpawnOutcome::Spawned(piece)
    }

    /// Ends the game: clears the board and stops the clock.
    ///
    /// Statistics are kept until the next [`Self::start_new_game`].
    pub fn top_out(&mut self) -> SpawnOutcome {
        log::debug!(
            "game over after {} pieces, score {}",
            self.stats.completed_pieces(),
            self.stats.score()
        );
        self.board.clear();
        self.falling_piece = None;
        self.session_state = SessionState::GameOver;
        self.clock.set_paused(true);
        SpawnOutcome::ToppedOut
    }

    pub fn toggle_pause(&mut self) {
        self.session_state = match self.session_state {
            SessionState::Playing => SessionState::Paused,
            SessionState::Paused => SessionState::Playing,
            state @ (SessionState::NewGame | SessionState::GameOver) => state,
        };
        self.clock.set_paused(!self.session_state.is_playing());
    }

    /// Advances the clock by one frame.
    ///
    /// Returns the logic cycles that elapsed; the caller runs one
    /// [`Self::tick`] per cycle.
    pub fn advance_clock(&mut self) -> u32 {
        self.clock.update()
    }

    /// Advances one frame and runs the logic ticks that elapsed. Returns the
    /// number of ticks run.
    pub fn increment_frame(&mut self) -> u32 {
        let cycles = self.advance_clock();
        let mut ticks = 0;
        for _ in 0..cycles {
            ticks += 1;
            if let TickOutcome::Locked {
                spawn: SpawnOutcome::ToppedOut,
                ..
            } = self.tick()
            {
                break;
            }
        }
        ticks
    }

    /// Runs one logic tick.
    ///
    /// The live piece falls one row if it can. Otherwise it is committed,
    /// completed rows are cleared and scored, and the next piece spawns.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.session_state.is_playing() {
            return TickOutcome::Idle;
        }
        let Some(piece) = self.falling_piece else {
            return TickOutcome::Idle;
        };
        let fallen = piece.down();
        if self.board.is_legal_placement(fallen) {
            self.falling_piece = Some(fallen);
            return TickOutcome::Fell;
        }

        self.board.commit_piece(piece);
        let cleared_rows = self.board.clear_completed_rows();
        self.stats.complete_piece_drop(cleared_rows);
        log::debug!(
            "locked {piece}, cleared {cleared_rows} rows, score {}",
            self.stats.score()
        );
        self.clock.reset();
        self.falling_piece = None;
        let spawn = self.spawn_piece();
        TickOutcome::Locked {
            cleared_rows,
            spawn,
        }
    }

    /// Replaces the live piece if the new placement is legal.
    pub fn set_falling_piece(&mut self, piece: Piece) -> Result<(), PieceCollisionError> {
        if !self.session_state.is_playing() || self.board.is_colliding(piece) {
            return Err(PieceCollisionError);
        }
        self.falling_piece = Some(piece);
        Ok(())
    }

    fn try_update_falling_piece(
        &mut self,
        f: impl FnOnce(Piece) -> Piece,
    ) -> Result<(), PieceCollisionError> {
        let piece = self.falling_piece.ok_or(PieceCollisionError)?;
        self.set_falling_piece(f(piece))
    }

    /// Turns the live piece to `rotation` (repositioned like [`Self::try_rotate`])
    /// and moves it to `column` on the resulting row.
    pub fn place_live_piece(
        &mut self,
        rotation: PieceRotation,
        column: i32,
    ) -> Result<(), PieceCollisionError> {
        let dims = *self.board.dimensions();
        self.try_update_falling_piece(|piece| {
            let rotated = piece.rotated_within_bounds(rotation, &dims);
            rotated.at(column, rotated.row())
        })
    }

    pub fn try_soft_drop(&mut self) -> Result<(), PieceCollisionError> {
        self.try_update_falling_piece(|piece| piece.down())
    }

    /// Rotates the live piece, pushing it back inside the walls, floor and
    /// ceiling when the new orientation would stick out.
    pub fn try_rotate(&mut self, rotation: PieceRotation) -> Result<(), PieceCollisionError> {
        let dims = *self.board.dimensions();
        self.try_update_falling_piece(|piece| piece.rotated_within_bounds(rotation, &dims))
    }

    /// Moves the live piece down to the lowest legal row. Returns the rows
    /// fallen.
    pub fn hard_drop(&mut self) -> usize {
        let mut rows = 0;
        while self.try_soft_drop().is_ok() {
            rows += 1;
        }
        rows
    }
}
