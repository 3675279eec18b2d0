//! Game orchestration and the terminal front-end.

pub mod interactive;
pub mod session;
pub mod worker;

pub use session::{GameSession, SessionConfig};
pub use worker::Pacing;
