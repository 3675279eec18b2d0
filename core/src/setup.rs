//! Game creation and the setup phase.
//!
//! A game starts in [`GamePhase::Setup`] with the computer already deployed
//! and the player's eight ghosts off the board. The player places each ghost
//! on rows 4-5, columns 1-4, then [`GameState::start_game_phase`] moves the
//! game to [`GamePhase::Playing`].

use crate::board::Board;
use crate::error::{GameError, GameResult};
use crate::game_state::GameState;
use crate::types::*;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

/// Number of ghosts each side starts with.
pub const GHOSTS_PER_SIDE: usize = 8;

/// Blue and red ghosts per side.
pub const GHOSTS_PER_COLOR: usize = 4;

/// Roster colors by 1-based index: 1,2 blue; 3,4 red; 5,6 blue; 7,8 red.
const ROSTER_COLORS: [GhostColor; GHOSTS_PER_SIDE] = [
    GhostColor::Blue,
    GhostColor::Blue,
    GhostColor::Red,
    GhostColor::Red,
    GhostColor::Blue,
    GhostColor::Blue,
    GhostColor::Red,
    GhostColor::Red,
];

/// Returns the cells a side deploys onto: two home rows × columns 1-4.
pub fn home_cells(side: Player) -> Vec<Position> {
    let rows = match side {
        Player::Player => [4, 5],
        Player::Computer => [0, 1],
    };
    rows.iter()
        .flat_map(|&row| (1..=4).map(move |col| Position::new(row, col)))
        .collect()
}

/// Returns true if the player may deploy a ghost on `pos`.
pub fn is_valid_player_placement(pos: Position) -> bool {
    (4..=5).contains(&pos.row) && (1..=4).contains(&pos.col)
}

/// Returns true if every ghost has a board position.
pub fn are_all_player_ghosts_placed(ghosts: &[Ghost]) -> bool {
    ghosts.iter().all(|g| g.position.is_placed())
}

/// Creates the fixed roster of a side, every ghost at `position`.
fn roster(side: Player, position: Position) -> Vec<Ghost> {
    ROSTER_COLORS
        .iter()
        .zip(1u8..)
        .map(|(&color, index)| Ghost::new(GhostId::new(side, index), color, position))
        .collect()
}

impl GameState {
    /// Creates a new game in the setup phase using the thread-local RNG.
    pub fn new() -> Self {
        Self::new_with_rng(&mut rand::thread_rng())
    }

    /// Creates a new game in the setup phase.
    ///
    /// The computer's ghosts are dealt onto a uniform random permutation of
    /// its home cells and stay unrevealed. The player's ghosts start unplaced
    /// and revealed, since during setup only their owner looks at them.
    pub fn new_with_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let player_ghosts: Vec<Ghost> = roster(Player::Player, Position::UNPLACED)
            .into_iter()
            .map(|g| g.with_revealed(true))
            .collect();

        let mut cells = home_cells(Player::Computer);
        cells.shuffle(rng);
        let computer_ghosts: Vec<Ghost> = roster(Player::Computer, Position::UNPLACED)
            .into_iter()
            .zip(cells)
            .map(|(g, pos)| g.moved_to(pos))
            .collect();

        debug!(
            layout = %computer_ghosts
                .iter()
                .map(|g| format!("{}@{}", g.id, g.position))
                .collect::<Vec<_>>()
                .join(" "),
            "computer ghosts deployed"
        );

        GameState::from_ghosts(
            player_ghosts,
            computer_ghosts,
            Vec::new(),
            Player::Player,
            GamePhase::Setup,
        )
    }

    /// Places (or re-places) a player ghost during setup.
    ///
    /// Fails with [`GameError::InvalidPlacement`] outside the player's home
    /// area and [`GameError::PositionOccupied`] on a taken cell. A ghost that
    /// was already placed is lifted from its previous cell.
    pub fn place_player_ghost(&self, ghost: &Ghost, position: Position) -> GameResult<Self> {
        if !is_valid_player_placement(position) {
            return Err(GameError::InvalidPlacement { position });
        }
        if self.board.get(position).is_some() {
            return Err(GameError::PositionOccupied { position });
        }

        let mut new_state = self.clone();
        let entry = new_state
            .player_ghosts
            .iter_mut()
            .find(|g| g.id == ghost.id)
            .ok_or(GameError::UnknownGhost { id: ghost.id })?;

        let previous = entry.position;
        let placed = entry.moved_to(position);
        *entry = placed;

        if previous.is_placed() {
            new_state.board.clear(previous);
        }
        new_state.board.set(position, Some(placed));

        Ok(new_state)
    }

    /// Places every unplaced player ghost on a random free home cell.
    pub fn place_player_ghosts_randomly<R: Rng + ?Sized>(&self, rng: &mut R) -> GameResult<Self> {
        let mut free: Vec<Position> = home_cells(Player::Player)
            .into_iter()
            .filter(|&pos| self.board.is_empty(pos))
            .collect();
        free.shuffle(rng);

        let unplaced: Vec<Ghost> = self
            .player_ghosts
            .iter()
            .filter(|g| !g.position.is_placed())
            .copied()
            .collect();

        let mut state = self.clone();
        for (ghost, pos) in unplaced.iter().zip(free) {
            state = state.place_player_ghost(ghost, pos)?;
        }
        Ok(state)
    }

    /// Leaves the setup phase.
    ///
    /// Fails with [`GameError::GhostsNotPlaced`] while any player ghost is off
    /// the board. On success every player ghost becomes unrevealed and the
    /// phase becomes [`GamePhase::Playing`].
    pub fn start_game_phase(&self) -> GameResult<Self> {
        if !are_all_player_ghosts_placed(&self.player_ghosts) {
            let remaining = self
                .player_ghosts
                .iter()
                .filter(|g| !g.position.is_placed())
                .count();
            return Err(GameError::GhostsNotPlaced { remaining });
        }

        let mut new_state = self.clone();
        for ghost in new_state.player_ghosts.iter_mut() {
            ghost.is_revealed = false;
        }

        let mut board: Board = new_state.board.clone();
        for ghost in &new_state.player_ghosts {
            if new_state.is_active(ghost) {
                board.set(ghost.position, Some(*ghost));
            }
        }
        new_state.board = board;
        new_state.game_phase = GamePhase::Playing;

        info!("setup complete, game phase is now playing");
        Ok(new_state)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
