//! Rules engine for Geister, a two-player hidden-information game on a 6×6
//! board.

pub mod board;
pub mod error;
pub mod game_state;
pub mod move_gen;
pub mod notation;
pub mod perft;
pub mod setup;
pub mod types;

pub use board::*;
pub use error::{GameError, GameResult};
pub use game_state::*;
pub use move_gen::*;
pub use notation::{ghost_char, layouts, LayoutError};
pub use perft::{perft, perft_detailed, perft_divide, PerftResults};
pub use setup::*;
pub use types::*;
