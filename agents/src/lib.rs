pub mod difficulty;
pub mod evaluation;
pub mod minimax;
pub mod search;

use geister_core::{GameResult, GameState, Move};

/// Core trait for Geister agents
pub trait Agent {
    /// Get the best move for the side to move
    fn best_move(&mut self, state: &GameState) -> GameResult<Move>;

    /// Get the agent's name
    fn name(&self) -> &str;
}

pub use difficulty::Difficulty;
pub use evaluation::*;
pub use minimax::MinimaxAgent;
pub use search::*;
