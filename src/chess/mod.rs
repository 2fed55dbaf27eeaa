pub mod board;
pub mod chessmove;
pub mod fen;
pub mod piece;
pub mod types;
