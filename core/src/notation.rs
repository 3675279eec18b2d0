use crate::board::BOARD_SIZE;
use crate::game_state::GameState;
use crate::setup::GHOSTS_PER_SIDE;
use crate::types::*;
use std::fmt;

/// Compact text layout for positions, in the spirit of FEN.
///
/// Six `/`-separated rows, row 0 first. `B`/`R` are player blue/red ghosts,
/// `b`/`r` computer blue/red ghosts and a digit is a run of empty cells. The
/// side to move follows after a space: `p` or `c`.
///
/// Starting-like example: `1rbbr1/1brrb1/6/6/1BRRB1/1RBBR1 p`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    InvalidFormat(String),
    InvalidRow(String),
    InvalidGhost(char),
    InvalidSide(String),
    TooManyGhosts(Player),
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::InvalidFormat(s) => write!(f, "Invalid layout format: {s}"),
            LayoutError::InvalidRow(s) => write!(f, "Invalid layout row: {s}"),
            LayoutError::InvalidGhost(c) => write!(f, "Invalid ghost character: '{c}'"),
            LayoutError::InvalidSide(s) => write!(f, "Invalid side to move: {s}"),
            LayoutError::TooManyGhosts(side) => {
                write!(f, "More than {GHOSTS_PER_SIDE} ghosts for {side}")
            }
        }
    }
}

impl std::error::Error for LayoutError {}

impl GameState {
    /// Parses a layout into a playing-phase state.
    ///
    /// Ghost ids are assigned per side in reading order. Every ghost starts
    /// unrevealed and nothing is captured.
    pub fn from_layout(layout: &str) -> Result<Self, LayoutError> {
        let parts: Vec<&str> = layout.split_whitespace().collect();
        if parts.len() != 2 {
            return Err(LayoutError::InvalidFormat(format!(
                "Expected 2 fields, got {}",
                parts.len()
            )));
        }

        let rows: Vec<&str> = parts[0].split('/').collect();
        if rows.len() != BOARD_SIZE as usize {
            return Err(LayoutError::InvalidFormat(format!(
                "Expected {BOARD_SIZE} rows, got {}",
                rows.len()
            )));
        }

        let mut player_ghosts = Vec::new();
        let mut computer_ghosts = Vec::new();

        for (row, text) in (0i8..).zip(&rows) {
            let mut col: i8 = 0;
            for c in text.chars() {
                if let Some(run) = c.to_digit(10) {
                    if run == 0 || col + run as i8 > BOARD_SIZE {
                        return Err(LayoutError::InvalidRow(text.to_string()));
                    }
                    col += run as i8;
                    continue;
                }

                let (owner, color) = match c {
                    'B' => (Player::Player, GhostColor::Blue),
                    'R' => (Player::Player, GhostColor::Red),
                    'b' => (Player::Computer, GhostColor::Blue),
                    'r' => (Player::Computer, GhostColor::Red),
                    _ => return Err(LayoutError::InvalidGhost(c)),
                };
                if col >= BOARD_SIZE {
                    return Err(LayoutError::InvalidRow(text.to_string()));
                }

                let roster = match owner {
                    Player::Player => &mut player_ghosts,
                    Player::Computer => &mut computer_ghosts,
                };
                if roster.len() == GHOSTS_PER_SIDE {
                    return Err(LayoutError::TooManyGhosts(owner));
                }
                let id = GhostId::new(owner, roster.len() as u8 + 1);
                roster.push(Ghost::new(id, color, Position::new(row, col)));
                col += 1;
            }

            if col != BOARD_SIZE {
                return Err(LayoutError::InvalidRow(text.to_string()));
            }
        }

        let current_player = match parts[1] {
            "p" => Player::Player,
            "c" => Player::Computer,
            other => return Err(LayoutError::InvalidSide(other.to_string())),
        };

        Ok(GameState::from_ghosts(
            player_ghosts,
            computer_ghosts,
            Vec::new(),
            current_player,
            GamePhase::Playing,
        ))
    }

    /// Writes the board and side to move as a layout string.
    pub fn to_layout(&self) -> String {
        let mut rows = Vec::with_capacity(BOARD_SIZE as usize);

        for row in 0..BOARD_SIZE {
            let mut text = String::new();
            let mut empty = 0;
            for col in 0..BOARD_SIZE {
                match self.ghost_at(Position::new(row, col)) {
                    Some(ghost) => {
                        if empty > 0 {
                            text.push_str(&empty.to_string());
                            empty = 0;
                        }
                        text.push(ghost_char(ghost));
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                text.push_str(&empty.to_string());
            }
            rows.push(text);
        }

        let side = match self.current_player {
            Player::Player => 'p',
            Player::Computer => 'c',
        };
        format!("{} {side}", rows.join("/"))
    }
}

/// Layout character of a ghost.
pub fn ghost_char(ghost: &Ghost) -> char {
    match (ghost.owner, ghost.color) {
        (Player::Player, GhostColor::Blue) => 'B',
        (Player::Player, GhostColor::Red) => 'R',
        (Player::Computer, GhostColor::Blue) => 'b',
        (Player::Computer, GhostColor::Red) => 'r',
    }
}

/// Well-known layouts.
pub mod layouts {
    /// A symmetric opening deployment.
    pub const OPENING: &str = "1rbbr1/1brrb1/6/6/1BRRB1/1RBBR1 p";

    /// Player blue one step from the (0,0) escape corner.
    pub const ESCAPE_THREAT: &str = "4r1/B1b3/2r3/6/2Rb2/6 p";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_opening() {
        let state = GameState::from_layout(layouts::OPENING).unwrap();

        assert_eq!(state.game_phase, GamePhase::Playing);
        assert_eq!(state.current_player, Player::Player);
        assert_eq!(state.player_ghosts.len(), 8);
        assert_eq!(state.computer_ghosts.len(), 8);

        let first = state.ghost_at(Position::new(0, 1)).unwrap();
        assert_eq!(first.owner, Player::Computer);
        assert_eq!(first.color, GhostColor::Red);
        assert_eq!(first.id.to_string(), "c1");

        let last = state.ghost_at(Position::new(5, 4)).unwrap();
        assert_eq!(last.owner, Player::Player);
        assert_eq!(last.id.to_string(), "p8");
    }

    #[test]
    fn test_layout_text_is_stable() {
        for layout in [layouts::OPENING, layouts::ESCAPE_THREAT] {
            let state = GameState::from_layout(layout).unwrap();
            assert_eq!(state.to_layout(), layout);
        }
    }

    #[test]
    fn test_invalid_layouts() {
        assert!(matches!(
            GameState::from_layout("6/6/6/6/6 p"),
            Err(LayoutError::InvalidFormat(_))
        ));
        assert!(matches!(
            GameState::from_layout("7/6/6/6/6/6 p"),
            Err(LayoutError::InvalidRow(_))
        ));
        assert!(matches!(
            GameState::from_layout("5/6/6/6/6/6 p"),
            Err(LayoutError::InvalidRow(_))
        ));
        assert_eq!(
            GameState::from_layout("x5/6/6/6/6/6 p"),
            Err(LayoutError::InvalidGhost('x'))
        );
        assert_eq!(
            GameState::from_layout("6/6/6/6/6/6 w"),
            Err(LayoutError::InvalidSide("w".to_string()))
        );
        assert_eq!(
            GameState::from_layout("bbbbbb/bbb3/6/6/6/6 p"),
            Err(LayoutError::TooManyGhosts(Player::Computer))
        );
    }
}
