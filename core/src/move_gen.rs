use crate::board::neighbors;
use crate::game_state::GameState;
use crate::types::Move;
use tracing::trace;

/// Generates every legal move for the side to move.
///
/// Moves come out in roster order, and for each ghost in neighbour order
/// (up, down, left, right). Captured ghosts and ghosts without a board
/// position never move.
pub fn generate_possible_moves(state: &GameState) -> Vec<Move> {
    let mut moves = Vec::new();

    for ghost in state.active_ghosts(state.current_player) {
        if !ghost.position.is_placed() {
            continue;
        }
        for to in neighbors(ghost.position) {
            if state.can_move(ghost.position, to) {
                moves.push(Move {
                    from: ghost.position,
                    to,
                    ghost: *ghost,
                    captured_ghost: state.ghost_at(to).copied(),
                });
            }
        }
    }

    trace!(
        side = %state.current_player,
        count = moves.len(),
        "generated moves"
    );
    moves
}
