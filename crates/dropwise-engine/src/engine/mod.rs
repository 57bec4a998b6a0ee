//! Game engine logic and state management.
//!
//! This module drives the core data structures through a game:
//!
//! - [`GameSession`] - Board, live piece, piece stream, clock and statistics
//! - [`GameStats`] - Score, committed pieces and cleared-row histogram
//! - [`PieceQueue`] - Seeded next-piece stream
//! - [`PieceSeed`] - Seed for deterministic piece generation
//! - [`LogicClock`] - Fixed-rate logic tick source
//!
//! # Game Flow
//!
//! 1. [`GameSession::start_new_game`] clears the board and spawns the first piece
//! 2. The live piece is positioned (manually or by an automated player)
//! 3. [`GameSession::tick`] lets it fall one row, or locks it when it cannot fall
//! 4. Locking clears completed rows, scores them and spawns the next piece
//! 5. Spawning onto an occupied spawn-buffer row ends the game
//!
//! # Example
//!
//! ```
//! use dropwise_engine::{BoardDimensions, GameSession, PieceQueue, Randomizer};
//!
//! let queue = PieceQueue::new(Randomizer::Uniform);
//! let mut session = GameSession::new(BoardDimensions::STANDARD, queue);
//! session.start_new_game();
//!
//! session.hard_drop();
//! session.tick();
//! assert_eq!(session.stats().completed_pieces(), 1);
//! ```

pub use self::{clock::*, game_session::*, game_stats::*, piece_queue::*};

mod clock;
mod game_session;
mod game_stats;
mod piece_queue;
