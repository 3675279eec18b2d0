use crate::game_state::GameState;
use crate::move_gen::generate_possible_moves;
use crate::types::Move;

/// Perft (performance test) results at each depth.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PerftResults {
    pub nodes: u64,
    pub captures: u64,
    /// Leaf positions where a side has already won
    pub decided: u64,
}

impl PerftResults {
    /// Combines results from child nodes.
    pub fn add(&mut self, other: &Self) {
        self.nodes += other.nodes;
        self.captures += other.captures;
        self.decided += other.decided;
    }
}

/// Counts the leaf nodes of the move tree to `depth`.
/// Positions with a winner are leaves and are not expanded.
pub fn perft(state: &GameState, depth: u8) -> u64 {
    if depth == 0 || state.check_win_condition().is_decided() {
        return 1;
    }

    let moves = generate_possible_moves(state);

    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .iter()
        .map(|mv| perft(&state.execute_move(mv), depth - 1))
        .sum()
}

/// Per-root-move breakdown of [`perft`].
pub fn perft_divide(state: &GameState, depth: u8) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }

    generate_possible_moves(state)
        .into_iter()
        .map(|mv| {
            let nodes = perft(&state.execute_move(&mv), depth - 1);
            (mv, nodes)
        })
        .collect()
}

/// Perft with capture and decided-position counts at the leaves.
pub fn perft_detailed(state: &GameState, depth: u8) -> PerftResults {
    let mut results = PerftResults::default();

    if depth == 0 || state.check_win_condition().is_decided() {
        results.nodes = 1;
        return results;
    }

    for mv in generate_possible_moves(state) {
        let new_state = state.execute_move(&mv);

        if depth == 1 {
            results.nodes += 1;
            if mv.is_capture() {
                results.captures += 1;
            }
            if new_state.check_win_condition().is_decided() {
                results.decided += 1;
            }
        } else {
            results.add(&perft_detailed(&new_state, depth - 1));
        }
    }

    results
}
