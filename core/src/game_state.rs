//! Complete game state and the rules engine operating on it.
//! Every transition returns a new `GameState`; the receiver is never mutated.
use crate::board::{is_escape_square, is_valid_position, Board};
use crate::types::*;

/// Complete state of a Geister game.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GameState {
    /// Spatial index of every active, placed ghost
    pub board: Board,
    /// Side to move
    pub current_player: Player,
    pub game_phase: GamePhase,
    /// Ghost selected in the click-to-move flow
    pub selected_piece: Option<Ghost>,
    /// Executed moves, oldest first
    pub move_history: Vec<Move>,
    /// Player roster. Captured entries stay in place.
    pub player_ghosts: Vec<Ghost>,
    /// Computer roster. Captured entries stay in place.
    pub computer_ghosts: Vec<Ghost>,
    /// Ghosts removed from play, in capture order
    pub captured_ghosts: Vec<Ghost>,
}

impl GameState {
    /// Builds a state from rosters, writing every active placed ghost onto the
    /// board. Used for tooling and tests; games start from [`GameState::new`].
    pub fn from_ghosts(
        player_ghosts: Vec<Ghost>,
        computer_ghosts: Vec<Ghost>,
        captured_ghosts: Vec<Ghost>,
        current_player: Player,
        game_phase: GamePhase,
    ) -> Self {
        let mut state = Self {
            board: Board::empty(),
            current_player,
            game_phase,
            selected_piece: None,
            move_history: Vec::new(),
            player_ghosts,
            computer_ghosts,
            captured_ghosts,
        };
        state.board = state.rebuild_board();
        state
    }

    /// Recomputes the board from the rosters.
    pub(crate) fn rebuild_board(&self) -> Board {
        let mut board = Board::empty();
        for ghost in self.player_ghosts.iter().chain(&self.computer_ghosts) {
            if ghost.position.is_placed() && self.is_active(ghost) {
                board.set(ghost.position, Some(*ghost));
            }
        }
        board
    }

    /// Returns the roster of `owner`.
    pub fn ghosts(&self, owner: Player) -> &[Ghost] {
        match owner {
            Player::Player => &self.player_ghosts,
            Player::Computer => &self.computer_ghosts,
        }
    }

    pub(crate) fn ghosts_mut(&mut self, owner: Player) -> &mut Vec<Ghost> {
        match owner {
            Player::Player => &mut self.player_ghosts,
            Player::Computer => &mut self.computer_ghosts,
        }
    }

    /// Looks up the roster entry with the given id.
    pub fn ghost(&self, id: GhostId) -> Option<&Ghost> {
        self.ghosts(id.owner()).iter().find(|g| g.id == id)
    }

    /// Returns the ghost on the board at `pos`.
    pub fn ghost_at(&self, pos: Position) -> Option<&Ghost> {
        self.board.get(pos)
    }

    /// Returns true if the ghost has not been captured.
    pub fn is_active(&self, ghost: &Ghost) -> bool {
        !self.captured_ghosts.iter().any(|c| c.id == ghost.id)
    }

    /// Iterates over the uncaptured ghosts of `owner`.
    pub fn active_ghosts(&self, owner: Player) -> impl Iterator<Item = &Ghost> {
        self.ghosts(owner).iter().filter(|g| self.is_active(g))
    }

    /// Counts `owner`'s uncaptured ghosts of `color`.
    pub fn active_count(&self, owner: Player, color: GhostColor) -> usize {
        self.active_ghosts(owner)
            .filter(|g| g.color == color)
            .count()
    }

    /// Returns a copy with the given selection.
    pub fn with_selected(&self, selected: Option<Ghost>) -> Self {
        Self {
            selected_piece: selected,
            ..self.clone()
        }
    }

    /// Returns true if the side to move may step from `from` to `to`.
    ///
    /// Never fails: off-board coordinates, empty or foreign sources,
    /// non-adjacent targets and own-occupied targets all answer `false`.
    /// Capturing is allowed regardless of the victim's color.
    pub fn can_move(&self, from: Position, to: Position) -> bool {
        if !is_valid_position(from) || !is_valid_position(to) {
            return false;
        }

        let Some(ghost) = self.board.get(from) else {
            return false;
        };
        if ghost.owner != self.current_player {
            return false;
        }

        if !from.is_adjacent(to) {
            return false;
        }

        match self.board.get(to) {
            Some(target) => target.owner != self.current_player,
            None => true,
        }
    }

    /// Applies a move, returning the new state.
    /// This does NOT check legality; callers validate with [`GameState::can_move`].
    ///
    /// Reveal flags are taken from `mv.ghost` as given, so callers that want
    /// a capture to reveal both participants pass
    /// [`Move::with_capture_reveal`].
    pub fn execute_move(&self, mv: &Move) -> Self {
        let mut new_state = self.clone();
        let moved = mv.ghost.moved_to(mv.to);

        new_state.board.clear(mv.from);
        new_state.board.set(mv.to, Some(moved));

        if let Some(entry) = new_state
            .ghosts_mut(moved.owner)
            .iter_mut()
            .find(|g| g.id == moved.id)
        {
            *entry = moved;
        }

        if let Some(captured) = mv.captured_ghost {
            if new_state.is_active(&captured) {
                new_state.captured_ghosts.push(captured);
            }
        }

        new_state.move_history.push(*mv);
        new_state.current_player = self.current_player.opponent();
        new_state.selected_piece = None;

        new_state
    }

    /// Evaluates the win conditions from scratch.
    ///
    /// Priority: escape, then capture-all-blue, then lose-all-red. Within
    /// each rule the player side is checked first.
    pub fn check_win_condition(&self) -> GameOutcome {
        for side in [Player::Player, Player::Computer] {
            if self.has_escaped(side) {
                return GameOutcome::won(side, WinCondition::Escape);
            }
        }

        for side in [Player::Player, Player::Computer] {
            if self.active_count(side, GhostColor::Blue) == 0 {
                return GameOutcome::won(side.opponent(), WinCondition::CaptureAllBlue);
            }
        }

        for side in [Player::Player, Player::Computer] {
            if self.active_count(side, GhostColor::Red) == 0 {
                return GameOutcome::won(side, WinCondition::LoseAllRed);
            }
        }

        GameOutcome::NONE
    }

    /// Returns true if `side` has an active blue ghost on its escape square.
    fn has_escaped(&self, side: Player) -> bool {
        self.active_ghosts(side)
            .any(|g| g.is_blue() && is_escape_square(g.position, side))
    }

    /// Returns the winner, if any.
    pub fn winner(&self) -> Option<Player> {
        self.check_win_condition().winner
    }
}
