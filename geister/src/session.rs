//! The game session: one player against the engine.
//!
//! A `GameSession` owns the current [`GameState`] and mediates every change
//! to it. Player input is accepted only on the player's turn during play,
//! while no search is running and nobody has won. After the player moves,
//! the session arms a single AI trigger; the driver either runs the move
//! inline ([`GameSession::execute_ai_move`]) or on a worker thread
//! ([`GameSession::spawn_ai_move`] then [`GameSession::poll_ai`]).

use crate::worker::{compute_move, AiJob, JobStatus, Pacing};
use geister_agents::Difficulty;
use geister_core::{
    GameError, GameOutcome, GamePhase, GameResult, GameState, Ghost, Move, Player, Position,
    WinCondition,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, error, info, warn};

/// Session settings chosen at startup.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SessionConfig {
    pub difficulty: Difficulty,
    pub pacing: Pacing,
}

pub struct GameSession {
    state: GameState,
    config: SessionConfig,
    rng: StdRng,
    is_ai_thinking: bool,
    ai_trigger: bool,
    /// Search in flight on a worker thread
    job: Option<AiJob>,
}

impl GameSession {
    pub fn new(config: SessionConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Session whose deployments are reproducible.
    pub fn with_seed(config: SessionConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: SessionConfig, mut rng: StdRng) -> Self {
        let state = GameState::new_with_rng(&mut rng);
        info!(difficulty = %config.difficulty, "new session");
        Self {
            state,
            config,
            rng,
            is_ai_thinking: false,
            ai_trigger: false,
            job: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }

    pub fn difficulty(&self) -> Difficulty {
        self.config.difficulty
    }

    /// Takes effect from the next AI move.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        info!(%difficulty, "difficulty changed");
        self.config.difficulty = difficulty;
    }

    pub fn is_ai_thinking(&self) -> bool {
        self.is_ai_thinking
    }

    pub fn outcome(&self) -> GameOutcome {
        self.state.check_win_condition()
    }

    pub fn winner(&self) -> Option<Player> {
        self.outcome().winner
    }

    pub fn win_condition(&self) -> Option<WinCondition> {
        self.outcome().condition
    }

    /// True when a player click or drag would be considered at all.
    pub fn accepts_player_input(&self) -> bool {
        self.state.game_phase == GamePhase::Playing
            && self.state.current_player == Player::Player
            && !self.is_ai_thinking
            && self.winner().is_none()
    }

    /// True when the AI trigger is armed and the computer may move.
    pub fn ai_pending(&self) -> bool {
        self.ai_trigger && self.ai_may_move()
    }

    fn ai_may_move(&self) -> bool {
        self.state.game_phase == GamePhase::Playing
            && self.state.current_player == Player::Computer
            && !self.is_ai_thinking
            && self.winner().is_none()
    }

    // ----- setup -----

    /// Places or re-places one of the player's ghosts.
    ///
    /// Errors leave the state unchanged.
    pub fn place_ghost(&mut self, ghost: &Ghost, position: Position) -> GameResult<()> {
        self.require_setup()?;
        match self.state.place_player_ghost(ghost, position) {
            Ok(state) => {
                debug!(ghost = %ghost.id, %position, "placed ghost");
                self.state = state;
                Ok(())
            }
            Err(err) => {
                warn!(%err, "placement rejected");
                Err(err)
            }
        }
    }

    /// Fills the remaining home cells at random.
    pub fn auto_place_ghosts(&mut self) -> GameResult<()> {
        self.require_setup()?;
        self.state = self.state.place_player_ghosts_randomly(&mut self.rng)?;
        Ok(())
    }

    pub fn start_game_phase(&mut self) -> GameResult<()> {
        self.require_setup()?;
        match self.state.start_game_phase() {
            Ok(state) => {
                self.state = state;
                Ok(())
            }
            Err(err) => {
                warn!(%err, "cannot start game");
                Err(err)
            }
        }
    }

    fn require_setup(&self) -> GameResult<()> {
        if self.state.game_phase == GamePhase::Setup {
            Ok(())
        } else {
            let err = GameError::WrongPhase {
                expected: GamePhase::Setup,
                actual: self.state.game_phase,
            };
            warn!(%err, "setup operation rejected");
            Err(err)
        }
    }

    /// Starts over with a fresh deployment.
    ///
    /// Any running search is abandoned; dropping the job disconnects its
    /// channel, so the late answer can never be committed.
    pub fn reset(&mut self) {
        if self.job.take().is_some() {
            debug!("abandoning running search");
        }
        self.is_ai_thinking = false;
        self.ai_trigger = false;
        self.state = GameState::new_with_rng(&mut self.rng);
        info!("game reset");
    }

    // ----- player input -----

    /// Toggles selection of one of the player's ghosts.
    pub fn click_ghost(&mut self, ghost: &Ghost) {
        if !self.accepts_player_input() || ghost.owner != Player::Player {
            return;
        }
        let already_selected = self
            .state
            .selected_piece
            .is_some_and(|selected| selected.id == ghost.id);

        let selection = if already_selected { None } else { Some(*ghost) };
        self.state = self.state.with_selected(selection);
    }

    /// Moves the selected ghost to `position` if legal, otherwise clears
    /// the selection. Does nothing without a selection.
    pub fn click_cell(&mut self, position: Position) {
        if !self.accepts_player_input() {
            return;
        }
        let Some(selected) = self.state.selected_piece else {
            return;
        };

        if self.state.can_move(selected.position, position) {
            self.commit_player_move(selected.position, position);
        } else {
            self.state = self.state.with_selected(None);
        }
    }

    /// Drag-and-drop: moves `ghost` to `position` if legal, ignores it
    /// otherwise.
    pub fn drag_ghost(&mut self, ghost: &Ghost, position: Position) {
        if !self.accepts_player_input() || ghost.owner != Player::Player {
            return;
        }
        if self.state.can_move(ghost.position, position) {
            self.commit_player_move(ghost.position, position);
        }
    }

    fn commit_player_move(&mut self, from: Position, to: Position) {
        let Some(&ghost) = self.state.ghost_at(from) else {
            return;
        };
        let mv = match self.state.ghost_at(to) {
            Some(&victim) => Move::capture(ghost, victim),
            None => Move::new(ghost, to),
        };

        self.apply_move(mv);
        if self.ai_may_move() {
            self.ai_trigger = true;
        }
    }

    /// Applies a validated move with capture reveals and stamps the
    /// finished phase once someone has won.
    fn apply_move(&mut self, mv: Move) {
        let mv = mv.with_capture_reveal();
        info!(side = %mv.ghost.owner, mv = %mv, "move");
        let next = self.state.execute_move(&mv);

        let outcome = next.check_win_condition();
        self.state = match (outcome.winner, outcome.condition) {
            (Some(winner), Some(condition)) => {
                info!(%winner, %condition, "game over");
                GameState {
                    game_phase: GamePhase::Finished,
                    ..next
                }
            }
            _ => next,
        };
    }

    // ----- computer turn -----

    /// Consumes the armed AI trigger. Returns true at most once per player
    /// move, and only while the computer may actually move.
    pub fn take_ai_trigger(&mut self) -> bool {
        if self.ai_pending() {
            self.ai_trigger = false;
            true
        } else {
            false
        }
    }

    /// Computes and applies the computer's move on the calling thread.
    ///
    /// A no-op unless it is the computer's turn in a live game with no
    /// search already running. Search failures are logged and leave the
    /// state unchanged.
    pub fn execute_ai_move(&mut self) -> Option<Move> {
        if !self.ai_may_move() {
            return None;
        }
        self.ai_trigger = false;
        self.is_ai_thinking = true;

        let result = compute_move(&self.state, self.config.difficulty, self.config.pacing);
        self.is_ai_thinking = false;
        self.commit_ai_result(result)
    }

    /// Starts the computer's search on a worker thread. Returns false if
    /// the computer may not move right now.
    pub fn spawn_ai_move(&mut self) -> bool {
        if !self.ai_may_move() {
            return false;
        }
        self.ai_trigger = false;
        self.is_ai_thinking = true;
        self.job = Some(AiJob::spawn(
            self.state.clone(),
            self.config.difficulty,
            self.config.pacing,
        ));
        debug!("search started");
        true
    }

    /// Collects the worker's answer if it is ready and applies it.
    pub fn poll_ai(&mut self) -> Option<Move> {
        let status = self.job.as_ref()?.poll();
        if let JobStatus::Running = status {
            return None;
        }
        self.job = None;
        self.finish_job(status)
    }

    /// Blocks until the worker answers, then applies it.
    pub fn wait_ai(&mut self) -> Option<Move> {
        let status = self.job.take()?.wait();
        self.finish_job(status)
    }

    fn finish_job(&mut self, status: JobStatus) -> Option<Move> {
        self.is_ai_thinking = false;
        match status {
            JobStatus::Running => None,
            JobStatus::Finished(result) => self.commit_ai_result(result),
            JobStatus::Lost => {
                error!("search worker stopped without an answer");
                None
            }
        }
    }

    fn commit_ai_result(&mut self, result: GameResult<Move>) -> Option<Move> {
        let mv = match result {
            Ok(mv) => mv,
            Err(err) => {
                error!(%err, "AI move failed");
                return None;
            }
        };

        if mv.ghost.owner != Player::Computer || !self.state.can_move(mv.from, mv.to) {
            let err = GameError::IllegalMove {
                from: mv.from,
                to: mv.to,
            };
            error!(%err, "AI produced an unusable move");
            return None;
        }

        self.apply_move(mv);
        Some(mv)
    }
}
