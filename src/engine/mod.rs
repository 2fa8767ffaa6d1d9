pub mod board;
pub mod game;
pub mod moves;
pub mod pgn;
pub mod piece;
pub mod rules;
pub mod types;

pub use board::{Board, Square};
pub use game::{Game, SessionInfo};
pub use moves::Move;
pub use piece::Piece;
pub use rules::RuleEngine;
pub use types::*;
