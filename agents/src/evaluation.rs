use geister_core::{GameState, Ghost, GhostColor, Player, Position, BOARD_SIZE};

/// Score of a decided position.
pub const WIN_SCORE: i32 = 1000;

const BLUE_VALUE: i32 = 50;
const RED_LOSS_BONUS: i32 = 20;
const MAX_RED_GHOSTS: i32 = 4;
const ESCAPE_WEIGHT: i32 = 5;
const MAX_ESCAPE_DISTANCE: i32 = 6;
const CENTER_WEIGHT: i32 = 2;
const IMMEDIATE_ESCAPE_BONUS: i32 = 100;

/// Evaluates a position from `for_player`'s perspective.
/// Positive scores favor `for_player`.
///
/// Decided positions score `±WIN_SCORE`. Otherwise the score is the sum of
/// material, positional and escape-threat terms.
pub fn evaluate_position(state: &GameState, for_player: Player) -> i32 {
    if let Some(winner) = state.check_win_condition().winner {
        return if winner == for_player {
            WIN_SCORE
        } else {
            -WIN_SCORE
        };
    }

    evaluate_material(state, for_player)
        + evaluate_positional(state, for_player)
        + evaluate_escape_threats(state, for_player)
}

/// Blue ghosts are worth keeping; red ghosts are worth losing.
fn evaluate_material(state: &GameState, for_player: Player) -> i32 {
    let opponent = for_player.opponent();
    let count = |side, color| state.active_count(side, color) as i32;

    let my_blue = count(for_player, GhostColor::Blue);
    let my_red = count(for_player, GhostColor::Red);
    let their_blue = count(opponent, GhostColor::Blue);
    let their_red = count(opponent, GhostColor::Red);

    let blue = (my_blue - their_blue) * BLUE_VALUE;
    let red = ((MAX_RED_GHOSTS - my_red) - (MAX_RED_GHOSTS - their_red)) * RED_LOSS_BONUS;
    blue + red
}

/// Escape proximity for own blue ghosts plus centralisation for all of them.
fn evaluate_positional(state: &GameState, for_player: Player) -> i32 {
    state
        .active_ghosts(for_player)
        .map(|ghost| {
            let escape = if ghost.is_blue() {
                escape_score(ghost.position, for_player)
            } else {
                0
            };
            escape + center_score(ghost.position)
        })
        .sum()
}

fn escape_score(pos: Position, for_player: Player) -> i32 {
    let row = for_player.escape_row();
    let distance = pos
        .manhattan(Position::new(row, 0))
        .min(pos.manhattan(Position::new(row, BOARD_SIZE - 1)));

    (MAX_ESCAPE_DISTANCE - i32::from(distance)) * ESCAPE_WEIGHT
}

/// `(5 - |row - 2.5| - |col - 2.5|) * 2`, kept in integers by doubling.
fn center_score(pos: Position) -> i32 {
    let doubled_distance = (2 * i32::from(pos.row) - 5).abs() + (2 * i32::from(pos.col) - 5).abs();
    (10 - doubled_distance) * CENTER_WEIGHT / 2
}

/// Bonus for each own blue ghost one step from an escape corner.
fn evaluate_escape_threats(state: &GameState, for_player: Player) -> i32 {
    let threats = state
        .active_ghosts(for_player)
        .filter(|ghost| ghost.is_blue() && is_escape_threat(ghost, for_player))
        .count() as i32;

    threats * IMMEDIATE_ESCAPE_BONUS
}

fn is_escape_threat(ghost: &Ghost, for_player: Player) -> bool {
    let adjacent_row = match for_player {
        Player::Player => for_player.escape_row() + 1,
        Player::Computer => for_player.escape_row() - 1,
    };
    ghost.position.row == adjacent_row
        && (ghost.position.col == 0 || ghost.position.col == BOARD_SIZE - 1)
}

/// Trait for game states that can be scored.
pub trait Evaluatable {
    fn evaluate_for(&self, player: Player) -> i32;
}

impl Evaluatable for GameState {
    fn evaluate_for(&self, player: Player) -> i32 {
        evaluate_position(self, player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geister_core::{layouts, GamePhase, GhostId};

    fn ghost(owner: Player, index: u8, color: GhostColor, row: i8, col: i8) -> Ghost {
        Ghost::new(GhostId::new(owner, index), color, Position::new(row, col))
    }

    fn state_with(player: Vec<Ghost>, computer: Vec<Ghost>) -> GameState {
        GameState::from_ghosts(player, computer, vec![], Player::Computer, GamePhase::Playing)
    }

    #[test]
    fn test_center_score() {
        // corners are 5 half-steps + 5 half-steps from the centre
        assert_eq!(center_score(Position::new(0, 0)), 0);
        assert_eq!(center_score(Position::new(2, 2)), 8);
        assert_eq!(center_score(Position::new(3, 2)), 8);
        assert_eq!(center_score(Position::new(4, 1)), 4);
    }

    #[test]
    fn test_escape_score() {
        assert_eq!(escape_score(Position::new(1, 0), Player::Player), 25);
        assert_eq!(escape_score(Position::new(5, 2), Player::Player), -5);
        assert_eq!(escape_score(Position::new(4, 5), Player::Computer), 25);
    }

    #[test]
    fn test_winning_and_losing_scores() {
        // computer escapes
        let state = state_with(
            vec![
                ghost(Player::Player, 1, GhostColor::Blue, 4, 2),
                ghost(Player::Player, 2, GhostColor::Red, 4, 3),
            ],
            vec![
                ghost(Player::Computer, 1, GhostColor::Blue, 5, 0),
                ghost(Player::Computer, 2, GhostColor::Red, 1, 1),
            ],
        );
        assert_eq!(evaluate_position(&state, Player::Computer), WIN_SCORE);
        assert_eq!(evaluate_position(&state, Player::Player), -WIN_SCORE);
    }

    #[test]
    fn test_more_blue_is_better() {
        let player = vec![
            ghost(Player::Player, 1, GhostColor::Blue, 4, 2),
            ghost(Player::Player, 2, GhostColor::Red, 4, 3),
        ];
        let even = state_with(
            player.clone(),
            vec![
                ghost(Player::Computer, 1, GhostColor::Blue, 1, 2),
                ghost(Player::Computer, 2, GhostColor::Red, 1, 3),
            ],
        );
        let ahead = state_with(
            player,
            vec![
                ghost(Player::Computer, 1, GhostColor::Blue, 1, 2),
                ghost(Player::Computer, 2, GhostColor::Red, 1, 3),
                ghost(Player::Computer, 3, GhostColor::Blue, 1, 1),
            ],
        );

        assert!(
            evaluate_position(&ahead, Player::Computer) > evaluate_position(&even, Player::Computer)
        );
    }

    #[test]
    fn test_blue_near_escape_is_better() {
        let player = vec![
            ghost(Player::Player, 1, GhostColor::Blue, 0, 2),
            ghost(Player::Player, 2, GhostColor::Red, 4, 3),
        ];
        let red = ghost(Player::Computer, 1, GhostColor::Red, 1, 1);

        let far = state_with(
            player.clone(),
            vec![red, ghost(Player::Computer, 2, GhostColor::Blue, 2, 2)],
        );
        let near = state_with(
            player,
            vec![red, ghost(Player::Computer, 2, GhostColor::Blue, 4, 1)],
        );

        assert!(
            evaluate_position(&near, Player::Computer) > evaluate_position(&far, Player::Computer)
        );
    }

    #[test]
    fn test_escape_threat_bonus() {
        let state = state_with(
            vec![
                ghost(Player::Player, 1, GhostColor::Blue, 0, 2),
                ghost(Player::Player, 2, GhostColor::Red, 4, 2),
            ],
            vec![
                ghost(Player::Computer, 1, GhostColor::Red, 1, 2),
                ghost(Player::Computer, 2, GhostColor::Blue, 4, 0),
            ],
        );

        assert_eq!(evaluate_escape_threats(&state, Player::Computer), 100);
        assert_eq!(evaluate_escape_threats(&state, Player::Player), 0);
        assert!(evaluate_position(&state, Player::Computer) > 120);
    }

    #[test]
    fn test_material_terms() {
        let state = GameState::from_layout(layouts::OPENING).unwrap();
        assert_eq!(evaluate_material(&state, Player::Computer), 0);

        // computer lost one red: +20 for the computer, -20 for the player
        let captured = *state
            .computer_ghosts
            .iter()
            .find(|g| g.is_red())
            .unwrap();
        let state = GameState::from_ghosts(
            state.player_ghosts.clone(),
            state.computer_ghosts.clone(),
            vec![captured],
            Player::Player,
            GamePhase::Playing,
        );
        assert_eq!(evaluate_material(&state, Player::Computer), 20);
        assert_eq!(evaluate_material(&state, Player::Player), -20);
    }

    #[test]
    fn test_mirrored_opening_scores_equal() {
        let state = GameState::from_layout(layouts::OPENING).unwrap();

        // material cancels; only the (mirrored) positional terms remain
        assert_eq!(evaluate_position(&state, Player::Player), 32);
        assert_eq!(evaluate_position(&state, Player::Computer), 32);
    }

    #[test]
    fn test_decided_scores_are_opposite() {
        // no red ghosts anywhere: the player wins by losing all red
        let state = state_with(
            vec![ghost(Player::Player, 1, GhostColor::Blue, 4, 2)],
            vec![ghost(Player::Computer, 1, GhostColor::Blue, 1, 2)],
        );
        let player = evaluate_position(&state, Player::Player);
        let computer = evaluate_position(&state, Player::Computer);

        assert_eq!(player, WIN_SCORE);
        assert_eq!(player + computer, 0);
    }
}
