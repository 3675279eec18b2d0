use crate::difficulty::Difficulty;
use crate::evaluation::Evaluatable;
use geister_core::{generate_possible_moves, GameError, GameResult, GameState, Move, Player};
use std::time::Instant;
use tracing::debug;

const INFINITY: i32 = 1_000_000;

/// The side the search optimises for. Leaves are always scored from this
/// perspective; the opponent's plies minimise the same score.
const SEARCH_PERSPECTIVE: Player = Player::Computer;

#[derive(Debug, Clone)]
pub struct SearchResult {
    pub best_move: Move,
    pub score: i32,
    pub depth: u8,
    pub nodes: u64,
}

struct SearchInfo {
    nodes: u64,
}

/// Chooses the best move for the side to move at `difficulty`'s depth.
///
/// Pure and deterministic: equal states give equal moves. The cosmetic
/// thinking delay is not applied here, see [`think_and_calculate`].
pub fn calculate_best_move(state: &GameState, difficulty: Difficulty) -> GameResult<Move> {
    search(state, difficulty.depth()).map(|result| result.best_move)
}

/// Sleeps for the difficulty's thinking time, then searches.
pub fn think_and_calculate(state: &GameState, difficulty: Difficulty) -> GameResult<Move> {
    std::thread::sleep(difficulty.thinking_time());
    calculate_best_move(state, difficulty)
}

/// Fixed-depth minimax search with alpha-beta pruning.
///
/// Every root move is scored by a full-window minimax of the resulting
/// position with the opponent to reply. The strictly greatest score wins, so
/// ties keep the first move in generation order. Fails with
/// [`GameError::NoMovesAvailable`] if the side to move cannot move.
pub fn search(state: &GameState, depth: u8) -> GameResult<SearchResult> {
    let moves = generate_possible_moves(state);
    let Some(&first) = moves.first() else {
        return Err(GameError::NoMovesAvailable);
    };

    let start = Instant::now();
    let mut info = SearchInfo { nodes: 0 };
    let mut best_move = first;
    let mut best_score = -INFINITY;

    for mv in &moves {
        let new_state = state.execute_move(mv);
        let score = minimax(
            &new_state,
            depth.saturating_sub(1),
            false,
            -INFINITY,
            INFINITY,
            &mut info,
        );

        if score > best_score {
            best_score = score;
            best_move = *mv;
        }
    }

    debug!(
        depth,
        nodes = info.nodes,
        score = best_score,
        elapsed_ms = start.elapsed().as_millis() as u64,
        best = %best_move,
        "search finished"
    );

    Ok(SearchResult {
        best_move,
        score: best_score,
        depth,
        nodes: info.nodes,
    })
}

/// Minimax with alpha-beta pruning. Scores are always from
/// [`SEARCH_PERSPECTIVE`]; the cutoff is tested after each child.
///
/// Only the depth limit and a side without moves end a line. A won position
/// is searched further like any other.
fn minimax(
    state: &GameState,
    depth: u8,
    is_maximizing: bool,
    mut alpha: i32,
    mut beta: i32,
    info: &mut SearchInfo,
) -> i32 {
    info.nodes += 1;

    if depth == 0 {
        return state.evaluate_for(SEARCH_PERSPECTIVE);
    }

    let moves = generate_possible_moves(state);
    if moves.is_empty() {
        return state.evaluate_for(SEARCH_PERSPECTIVE);
    }

    if is_maximizing {
        let mut max_eval = -INFINITY;
        for mv in &moves {
            let new_state = state.execute_move(mv);
            let eval = minimax(&new_state, depth - 1, false, alpha, beta, info);
            max_eval = max_eval.max(eval);
            alpha = alpha.max(eval);
            if beta <= alpha {
                break;
            }
        }
        max_eval
    } else {
        let mut min_eval = INFINITY;
        for mv in &moves {
            let new_state = state.execute_move(mv);
            let eval = minimax(&new_state, depth - 1, true, alpha, beta, info);
            min_eval = min_eval.min(eval);
            beta = beta.min(eval);
            if beta <= alpha {
                break;
            }
        }
        min_eval
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::{evaluate_position, WIN_SCORE};
    use geister_core::{layouts, GamePhase, Ghost, GhostColor, GhostId, Position};

    fn ghost(owner: Player, index: u8, color: GhostColor, row: i8, col: i8) -> Ghost {
        Ghost::new(GhostId::new(owner, index), color, Position::new(row, col))
    }

    fn computer_to_move(player: Vec<Ghost>, computer: Vec<Ghost>) -> GameState {
        GameState::from_ghosts(player, computer, vec![], Player::Computer, GamePhase::Playing)
    }

    #[test]
    fn test_no_moves_is_an_error() {
        let c1 = ghost(Player::Computer, 1, GhostColor::Blue, 1, 2);
        let state = GameState::from_ghosts(
            vec![],
            vec![c1],
            vec![c1],
            Player::Computer,
            GamePhase::Playing,
        );

        assert_eq!(
            calculate_best_move(&state, Difficulty::Easy),
            Err(GameError::NoMovesAvailable)
        );
    }

    #[test]
    fn test_returns_adjacent_move_for_side_to_move() {
        let state = computer_to_move(
            vec![ghost(Player::Player, 1, GhostColor::Blue, 4, 2)],
            vec![ghost(Player::Computer, 1, GhostColor::Blue, 1, 2)],
        );

        for difficulty in Difficulty::ALL {
            let mv = calculate_best_move(&state, difficulty).unwrap();
            assert_eq!(mv.ghost.owner, Player::Computer);
            assert_eq!(mv.from, Position::new(1, 2));
            assert!(mv.from.is_adjacent(mv.to));
        }
    }

    #[test]
    fn test_prefers_capture() {
        let state = computer_to_move(
            vec![ghost(Player::Player, 1, GhostColor::Blue, 1, 2)],
            vec![ghost(Player::Computer, 1, GhostColor::Blue, 2, 2)],
        );

        let mv = calculate_best_move(&state, Difficulty::Easy).unwrap();
        assert_eq!(mv.to, Position::new(1, 2));
        assert_eq!(
            mv.captured_ghost.map(|g| g.id),
            Some(GhostId::new(Player::Player, 1))
        );
    }

    #[test]
    fn test_corner_ghost_moves_to_neighbor() {
        let state = computer_to_move(
            vec![ghost(Player::Player, 1, GhostColor::Blue, 4, 4)],
            vec![ghost(Player::Computer, 1, GhostColor::Blue, 0, 0)],
        );

        let mv = calculate_best_move(&state, Difficulty::Medium).unwrap();
        assert!([Position::new(0, 1), Position::new(1, 0)].contains(&mv.to));
    }

    #[test]
    fn test_deterministic_on_equal_states() {
        let build = || {
            computer_to_move(
                vec![ghost(Player::Player, 1, GhostColor::Red, 4, 2)],
                vec![ghost(Player::Computer, 1, GhostColor::Blue, 2, 2)],
            )
        };
        let first = calculate_best_move(&build(), Difficulty::Easy).unwrap();
        let second = calculate_best_move(&build(), Difficulty::Easy).unwrap();

        assert_eq!((first.from, first.to), (second.from, second.to));
    }

    #[test]
    fn test_takes_escape_when_available() {
        // The red at (3,0) blocks the blue's upward step, so stepping onto
        // the escape square is the first move generated.
        let state = computer_to_move(
            vec![
                ghost(Player::Player, 1, GhostColor::Blue, 2, 2),
                ghost(Player::Player, 2, GhostColor::Red, 2, 3),
            ],
            vec![
                ghost(Player::Computer, 1, GhostColor::Blue, 4, 0),
                ghost(Player::Computer, 2, GhostColor::Red, 3, 0),
            ],
        );

        for difficulty in Difficulty::ALL {
            let result = search(&state, difficulty.depth()).unwrap();
            assert_eq!(result.best_move.to, Position::new(5, 0), "{difficulty}");
        }
        assert_eq!(search(&state, 1).unwrap().score, WIN_SCORE);
    }

    #[test]
    fn test_search_continues_past_a_win() {
        // Stepping onto (5,0) wins at once, but the player's red at (5,1)
        // then captures the computer's only blue.
        let state = computer_to_move(
            vec![
                ghost(Player::Player, 1, GhostColor::Red, 5, 1),
                ghost(Player::Player, 2, GhostColor::Blue, 2, 3),
            ],
            vec![
                ghost(Player::Computer, 1, GhostColor::Blue, 4, 0),
                ghost(Player::Computer, 2, GhostColor::Red, 0, 3),
            ],
        );

        let mv = calculate_best_move(&state, Difficulty::Medium).unwrap();
        assert_eq!((mv.from, mv.to), (Position::new(0, 3), Position::new(1, 3)));
    }

    #[test]
    fn test_stops_opponent_escape() {
        // The player's blue at (1,5) threatens to step onto (0,5).
        // Only capturing it prevents the loss.
        let state = computer_to_move(
            vec![
                ghost(Player::Player, 1, GhostColor::Blue, 1, 5),
                ghost(Player::Player, 2, GhostColor::Blue, 4, 2),
                ghost(Player::Player, 3, GhostColor::Red, 4, 3),
            ],
            vec![
                ghost(Player::Computer, 1, GhostColor::Blue, 1, 4),
                ghost(Player::Computer, 2, GhostColor::Red, 0, 1),
            ],
        );

        let mv = calculate_best_move(&state, Difficulty::Medium).unwrap();
        assert_eq!(mv.to, Position::new(1, 5));
        assert!(mv.is_capture());
    }

    #[test]
    fn test_counts_nodes() {
        let state = computer_to_move(
            vec![
                ghost(Player::Player, 1, GhostColor::Blue, 4, 1),
                ghost(Player::Player, 2, GhostColor::Red, 4, 2),
            ],
            vec![
                ghost(Player::Computer, 1, GhostColor::Blue, 1, 1),
                ghost(Player::Computer, 2, GhostColor::Red, 1, 2),
            ],
        );

        let shallow = search(&state, 1).unwrap();
        let deep = search(&state, 3).unwrap();
        assert_eq!(shallow.nodes, generate_possible_moves(&state).len() as u64);
        assert!(deep.nodes > shallow.nodes);
    }

    /// Full-width minimax without pruning, counting nodes the same way.
    fn plain_minimax(state: &GameState, depth: u8, is_maximizing: bool, nodes: &mut u64) -> i32 {
        *nodes += 1;
        let moves = generate_possible_moves(state);
        if depth == 0 || moves.is_empty() {
            return evaluate_position(state, SEARCH_PERSPECTIVE);
        }

        let scores = moves
            .iter()
            .map(|mv| plain_minimax(&state.execute_move(mv), depth - 1, !is_maximizing, nodes));
        if is_maximizing {
            scores.max().unwrap()
        } else {
            scores.min().unwrap()
        }
    }

    fn plain_search(state: &GameState, depth: u8) -> (Move, i32, u64) {
        let mut nodes = 0;
        let mut best = None;
        for mv in generate_possible_moves(state) {
            let score = plain_minimax(&state.execute_move(&mv), depth - 1, false, &mut nodes);
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((mv, score));
            }
        }
        let (mv, score) = best.unwrap();
        (mv, score, nodes)
    }

    #[test]
    fn test_pruning_matches_full_width_search() {
        let positions = [
            GameState::from_layout(layouts::OPENING).unwrap(),
            GameState::from_layout(layouts::ESCAPE_THREAT).unwrap(),
            GameState::from_layout("1r2b1/1b2r1/6/2B3/2R3/1R2B1 c").unwrap(),
            computer_to_move(
                vec![
                    ghost(Player::Player, 1, GhostColor::Blue, 4, 1),
                    ghost(Player::Player, 2, GhostColor::Red, 4, 2),
                    ghost(Player::Player, 3, GhostColor::Blue, 3, 4),
                ],
                vec![
                    ghost(Player::Computer, 1, GhostColor::Blue, 1, 1),
                    ghost(Player::Computer, 2, GhostColor::Red, 1, 2),
                    ghost(Player::Computer, 3, GhostColor::Red, 2, 4),
                ],
            ),
        ];

        for state in &positions {
            for depth in [3, 5] {
                let pruned = search(state, depth).unwrap();
                let (best_move, score, nodes) = plain_search(state, depth);

                assert_eq!(pruned.score, score, "{} depth {depth}", state.to_layout());
                assert_eq!(
                    (pruned.best_move.from, pruned.best_move.to),
                    (best_move.from, best_move.to),
                    "{} depth {depth}",
                    state.to_layout()
                );
                assert!(pruned.nodes < nodes, "{} depth {depth}", state.to_layout());
            }
        }
    }
}
