//! Placement search, heuristic evaluation and self-play for the puzzle AI.
//!
//! The crate is layered bottom-up:
//!
//! ```text
//! Self-play (auto_player)         plays games, reports scores to a tuning loop
//!     ↓ uses
//! Placement search                enumerates rotations × columns, keeps the best
//!     ↓ uses
//! Heuristic (weights)             weighted sum of five board features
//!     ↓ uses
//! Board snapshot / features       search-local grid and its measurements
//! ```
//!
//! - [`board_snapshot`] - Reusable grid of empty / settled / provisional cells
//! - [`board_feature`] - Aggregate height, completed rows, holes, bumpiness, blockades
//! - [`weights`] - [`WeightVector`](weights::WeightVector) and [`score`](weights::score)
//! - [`placement_search`] - Exhaustive one-piece search with first-found tie-break
//! - [`tuning`] - [`TuningLoop`](tuning::TuningLoop) contract consumed by self-play
//! - [`auto_player`] - Game session driver
//!
//! # Example: One Self-Played Game
//!
//! ```
//! use dropwise_engine::{BoardDimensions, GameSession, PieceQueue, PieceSeed, Randomizer};
//! use dropwise_evaluator::{auto_player::AutoPlayer, weights::WeightVector};
//!
//! let queue = PieceQueue::with_seed(PieceSeed::from(1), Randomizer::Uniform);
//! let session = GameSession::new(BoardDimensions::STANDARD, queue);
//! let mut player = AutoPlayer::new(session, WeightVector::HAND_TUNED).with_piece_limit(Some(20));
//!
//! let stats = player.play_game().unwrap();
//! assert_eq!(stats.completed_pieces(), 20);
//! ```
//!
//! # Limitations
//!
//! - **One piece ahead**: the preview piece is not taken into account.
//! - **Straight drops only**: placements that need a slide or a turn under an
//!   overhang are never found.

pub mod auto_player;
pub mod board_feature;
pub mod board_snapshot;
pub mod placement_search;
pub mod tuning;
pub mod weights;
