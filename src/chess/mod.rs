//! Implementation of chess rules: board representation, piece movement,
//! legal move generation and the game state machine.

pub mod attacks;
pub mod bitboard;
pub mod board;
pub mod core;
pub mod game;
pub mod geometry;
pub mod position;
pub mod zobrist;
mod zobrist_keys;
