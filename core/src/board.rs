use crate::types::{Ghost, Player, Position};

/// Width and height of the Geister board.
pub const BOARD_SIZE: i8 = 6;

/// Orthogonal step directions in generation order: up, down, left, right.
pub const DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Returns true if both coordinates lie in `[0, 5]`.
pub const fn is_valid_position(pos: Position) -> bool {
    pos.row >= 0 && pos.row < BOARD_SIZE && pos.col >= 0 && pos.col < BOARD_SIZE
}

/// Returns true if `pos` is one of `player`'s two escape corners.
pub const fn is_escape_square(pos: Position, player: Player) -> bool {
    pos.row == player.escape_row() && (pos.col == 0 || pos.col == BOARD_SIZE - 1)
}

/// Returns the in-bounds orthogonal neighbours of `pos`.
pub fn neighbors(pos: Position) -> impl Iterator<Item = Position> {
    DIRECTIONS
        .into_iter()
        .map(move |(d_row, d_col)| pos.offset(d_row, d_col))
        .filter(|&p| is_valid_position(p))
}

/// The 6×6 grid, indexed `[row][col]`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Board {
    cells: [[Option<Ghost>; BOARD_SIZE as usize]; BOARD_SIZE as usize],
}

impl Board {
    /// Creates an empty board.
    pub const fn empty() -> Self {
        Self {
            cells: [[None; BOARD_SIZE as usize]; BOARD_SIZE as usize],
        }
    }

    /// Returns the ghost at `pos`, or `None` for empty or off-board positions.
    pub fn get(&self, pos: Position) -> Option<&Ghost> {
        if !is_valid_position(pos) {
            return None;
        }
        self.cells[pos.row as usize][pos.col as usize].as_ref()
    }

    /// Returns true if `pos` is on the board and unoccupied.
    pub fn is_empty(&self, pos: Position) -> bool {
        is_valid_position(pos) && self.get(pos).is_none()
    }

    /// Writes `ghost` into the cell at `pos`. Off-board writes are ignored.
    pub fn set(&mut self, pos: Position, ghost: Option<Ghost>) {
        if is_valid_position(pos) {
            self.cells[pos.row as usize][pos.col as usize] = ghost;
        }
    }

    /// Empties the cell at `pos`, returning its previous occupant.
    pub fn clear(&mut self, pos: Position) -> Option<Ghost> {
        if !is_valid_position(pos) {
            return None;
        }
        self.cells[pos.row as usize][pos.col as usize].take()
    }

    /// Iterates over every occupied cell in row-major order.
    pub fn iter_ghosts(&self) -> impl Iterator<Item = &Ghost> {
        self.cells.iter().flatten().flatten()
    }

    /// Number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.iter_ghosts().count()
    }
}
