use crate::{
    difficulty::Difficulty,
    search::{calculate_best_move, think_and_calculate},
    Agent,
};
use geister_core::{GameResult, GameState, Move};

pub struct MinimaxAgent {
    name: String,
    difficulty: Difficulty,
    /// Pause for the difficulty's thinking time before answering
    thinking_delay: bool,
}

impl MinimaxAgent {
    pub fn new(difficulty: Difficulty) -> Self {
        MinimaxAgent {
            name: format!("Minimax({difficulty}, depth={})", difficulty.depth()),
            difficulty,
            thinking_delay: false,
        }
    }

    /// Answers only after the difficulty's thinking time, as in live play.
    pub fn with_thinking_delay(mut self, thinking_delay: bool) -> Self {
        self.thinking_delay = thinking_delay;
        self
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }
}

impl Default for MinimaxAgent {
    fn default() -> Self {
        Self::new(Difficulty::default())
    }
}

impl Agent for MinimaxAgent {
    fn best_move(&mut self, state: &GameState) -> GameResult<Move> {
        if self.thinking_delay {
            think_and_calculate(state, self.difficulty)
        } else {
            calculate_best_move(state, self.difficulty)
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
