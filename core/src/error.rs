//! Error types for game logic.
//!
//! Illegal move attempts are not errors: `can_move` simply answers `false`.
//! These variants cover operations that must abort and leave the state
//! unchanged.

use crate::types::{GamePhase, GhostId, Position};

/// Errors raised by state transitions and the search entry points.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// Placement outside the player's home area (rows 4-5, cols 1-4)
    #[error("invalid placement position {position}")]
    InvalidPlacement { position: Position },

    /// Placement onto a cell that already holds a ghost
    #[error("position {position} is already occupied")]
    PositionOccupied { position: Position },

    /// Ghost not present in the relevant roster
    #[error("unknown ghost {id}")]
    UnknownGhost { id: GhostId },

    /// Operation not allowed in the current phase
    #[error("expected {expected} phase, game is in {actual} phase")]
    WrongPhase {
        expected: GamePhase,
        actual: GamePhase,
    },

    /// Tried to leave setup with ghosts still off the board
    #[error("cannot start game: {remaining} player ghosts are not placed")]
    GhostsNotPlaced { remaining: usize },

    /// Search requested on a position without legal moves
    #[error("no valid moves available")]
    NoMovesAvailable,

    /// A move rejected by the rules engine
    #[error("illegal move from {from} to {to}")]
    IllegalMove { from: Position, to: Position },
}

/// Result type alias for game operations
pub type GameResult<T> = Result<T, GameError>;
