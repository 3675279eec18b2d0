//! Background AI computation.
//!
//! The search runs on its own thread against an owned snapshot, so nothing
//! is shared with the caller except the channel carrying the answer back.

use geister_agents::{Agent, Difficulty, MinimaxAgent};
use geister_core::{GameResult, GameState, Move};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use tracing::debug;

/// Whether the cosmetic thinking delay is applied before searching.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Pacing {
    /// Pause for the difficulty's thinking time.
    #[default]
    Interactive,
    /// Answer as soon as the search finishes.
    Immediate,
}

/// Runs one search with the configured pacing.
pub fn compute_move(state: &GameState, difficulty: Difficulty, pacing: Pacing) -> GameResult<Move> {
    let mut agent =
        MinimaxAgent::new(difficulty).with_thinking_delay(pacing == Pacing::Interactive);
    debug!(agent = agent.name(), "computing move");
    agent.best_move(state)
}

/// State of an in-flight job when polled.
#[derive(Debug)]
pub enum JobStatus {
    Running,
    Finished(GameResult<Move>),
    /// The worker thread died without answering.
    Lost,
}

/// A search running on a worker thread.
///
/// Dropping the job abandons the search: the worker's answer then has
/// nowhere to go and is thrown away.
#[derive(Debug)]
pub struct AiJob {
    receiver: Receiver<GameResult<Move>>,
}

impl AiJob {
    /// Starts searching `state` on a new thread.
    pub fn spawn(state: GameState, difficulty: Difficulty, pacing: Pacing) -> Self {
        let (sender, receiver) = mpsc::channel();

        thread::spawn(move || {
            let result = compute_move(&state, difficulty, pacing);
            if sender.send(result).is_err() {
                debug!("discarding result of abandoned search");
            }
        });

        Self { receiver }
    }

    /// Checks for the answer without blocking.
    pub fn poll(&self) -> JobStatus {
        match self.receiver.try_recv() {
            Ok(result) => JobStatus::Finished(result),
            Err(TryRecvError::Empty) => JobStatus::Running,
            Err(TryRecvError::Disconnected) => JobStatus::Lost,
        }
    }

    /// Blocks until the worker answers.
    pub fn wait(self) -> JobStatus {
        match self.receiver.recv() {
            Ok(result) => JobStatus::Finished(result),
            Err(_) => JobStatus::Lost,
        }
    }
}
