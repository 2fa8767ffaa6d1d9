pub mod evaluation;
pub mod hint;
pub mod player;
pub mod strategy;

pub use hint::hints;
pub use player::{AiPlayer, HumanPlayer, Player};
pub use strategy::Strategy;
