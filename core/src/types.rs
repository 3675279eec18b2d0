use std::fmt;

/// One of the two sides of a Geister game.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Player {
    /// The human side, deployed on rows 4-5.
    Player,
    /// The engine side, deployed on rows 0-1.
    Computer,
}

impl Player {
    /// Returns the other side.
    pub const fn opponent(self) -> Self {
        match self {
            Player::Player => Player::Computer,
            Player::Computer => Player::Player,
        }
    }

    /// Returns the row holding this side's escape squares.
    /// Each side escapes over the edge opposite its home rows.
    pub const fn escape_row(self) -> i8 {
        match self {
            Player::Player => 0,
            Player::Computer => 5,
        }
    }

    /// Returns the prefix used in ghost identifiers.
    pub const fn id_prefix(self) -> char {
        match self {
            Player::Player => 'p',
            Player::Computer => 'c',
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Player => write!(f, "player"),
            Player::Computer => write!(f, "computer"),
        }
    }
}

/// The hidden color of a ghost.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum GhostColor {
    /// Good ghost: lose all of these and you lose, escape with one and you win.
    Blue,
    /// Bad ghost: get all of these captured and you win.
    Red,
}

impl fmt::Display for GhostColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GhostColor::Blue => write!(f, "blue"),
            GhostColor::Red => write!(f, "red"),
        }
    }
}

/// Coarse phase of a game.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum GamePhase {
    Setup,
    Playing,
    Finished,
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GamePhase::Setup => write!(f, "setup"),
            GamePhase::Playing => write!(f, "playing"),
            GamePhase::Finished => write!(f, "finished"),
        }
    }
}

/// The way a game was won.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum WinCondition {
    /// A blue ghost reached one of its side's escape squares.
    Escape,
    /// Every blue ghost of the loser was captured.
    CaptureAllBlue,
    /// Every red ghost of the winner was captured.
    LoseAllRed,
}

impl fmt::Display for WinCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WinCondition::Escape => write!(f, "escape"),
            WinCondition::CaptureAllBlue => write!(f, "capture_all_blue"),
            WinCondition::LoseAllRed => write!(f, "lose_all_red"),
        }
    }
}

/// Result of a win-condition check. Both fields are `None` while the game is
/// undecided.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct GameOutcome {
    pub winner: Option<Player>,
    pub condition: Option<WinCondition>,
}

impl GameOutcome {
    /// An undecided outcome.
    pub const NONE: Self = Self {
        winner: None,
        condition: None,
    };

    /// A decided outcome.
    pub const fn won(winner: Player, condition: WinCondition) -> Self {
        Self {
            winner: Some(winner),
            condition: Some(condition),
        }
    }

    /// Returns true if a winner exists.
    pub const fn is_decided(&self) -> bool {
        self.winner.is_some()
    }
}

/// A board coordinate. Row 0 is the computer's back edge, row 5 the player's.
///
/// Coordinates are signed so that unplaced ghosts can carry
/// [`Position::UNPLACED`] during setup.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Position {
    pub row: i8,
    pub col: i8,
}

impl Position {
    /// Sentinel carried by player ghosts that are not yet on the board.
    pub const UNPLACED: Self = Self { row: -1, col: -1 };

    /// Creates a position. No bounds checking is done here.
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    /// Returns true if this position has been placed (non-negative row/col).
    pub const fn is_placed(self) -> bool {
        self.row >= 0 && self.col >= 0
    }

    /// Returns the position shifted by the given delta.
    pub const fn offset(self, d_row: i8, d_col: i8) -> Self {
        Self {
            row: self.row + d_row,
            col: self.col + d_col,
        }
    }

    /// Manhattan distance between two positions.
    pub const fn manhattan(self, other: Self) -> u8 {
        ((self.row - other.row).unsigned_abs()) + ((self.col - other.col).unsigned_abs())
    }

    /// Returns true if `other` is exactly one orthogonal step away.
    pub const fn is_adjacent(self, other: Self) -> bool {
        self.manhattan(other) == 1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// Stable identity of a ghost for the lifetime of a game.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct GhostId {
    owner: Player,
    index: u8,
}

impl GhostId {
    /// Creates an id. `index` is the 1-based roster number.
    pub const fn new(owner: Player, index: u8) -> Self {
        Self { owner, index }
    }

    pub const fn owner(self) -> Player {
        self.owner
    }

    pub const fn index(self) -> u8 {
        self.index
    }
}

impl fmt::Display for GhostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.owner.id_prefix(), self.index)
    }
}

/// A single piece. `color` and `owner` never change; `position` and
/// `is_revealed` only change through new state snapshots.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Ghost {
    pub id: GhostId,
    pub color: GhostColor,
    pub owner: Player,
    pub position: Position,
    /// Whether the owner's opponent knows this ghost's color.
    pub is_revealed: bool,
}

impl Ghost {
    /// Creates an unrevealed ghost. The id's owner is used as the ghost's owner.
    pub const fn new(id: GhostId, color: GhostColor, position: Position) -> Self {
        Self {
            id,
            color,
            owner: id.owner(),
            position,
            is_revealed: false,
        }
    }

    /// Returns a copy at a new position.
    pub const fn moved_to(self, position: Position) -> Self {
        Self { position, ..self }
    }

    /// Returns a copy with the given reveal flag.
    pub const fn with_revealed(self, is_revealed: bool) -> Self {
        Self {
            is_revealed,
            ..self
        }
    }

    pub const fn is_blue(&self) -> bool {
        matches!(self.color, GhostColor::Blue)
    }

    pub const fn is_red(&self) -> bool {
        matches!(self.color, GhostColor::Red)
    }
}

/// A single-step move. `ghost` is the mover as it was before the move and
/// `captured_ghost` the occupant of `to`, if any.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Move {
    pub from: Position,
    pub to: Position,
    pub ghost: Ghost,
    pub captured_ghost: Option<Ghost>,
}

impl Move {
    /// Creates a quiet move.
    pub const fn new(ghost: Ghost, to: Position) -> Self {
        Self {
            from: ghost.position,
            to,
            ghost,
            captured_ghost: None,
        }
    }

    /// Creates a capturing move.
    pub const fn capture(ghost: Ghost, captured: Ghost) -> Self {
        Self {
            from: ghost.position,
            to: captured.position,
            ghost,
            captured_ghost: Some(captured),
        }
    }

    pub const fn is_capture(&self) -> bool {
        self.captured_ghost.is_some()
    }

    /// Returns this move with both participants of a capture marked revealed.
    /// Quiet moves are returned unchanged.
    pub fn with_capture_reveal(self) -> Self {
        match self.captured_ghost {
            Some(captured) => Self {
                ghost: self.ghost.with_revealed(true),
                captured_ghost: Some(captured.with_revealed(true)),
                ..self
            },
            None => self,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}->{}", self.ghost.id, self.from, self.to)?;
        if let Some(captured) = self.captured_ghost {
            write!(f, " x {}", captured.id)?;
        }
        Ok(())
    }
}
