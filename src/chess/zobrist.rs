//! Zobrist hashing-related utilities.

use crate::chess::core::{CastleRights, Player};
use crate::chess::position::Position;
use crate::chess::zobrist_keys::{BLACK_TO_MOVE, CASTLING, EN_PASSANT_FILES, PIECES};

/// Zobrist keys are 64-bit unsigned integers that identify the position for
/// repetition purposes: two positions with the same placement, side to move,
/// castling rights and en passant file share the key.
pub type Key = u64;

const CASTLE_RIGHTS: [CastleRights; 4] = [
    CastleRights::WHITE_SHORT,
    CastleRights::WHITE_LONG,
    CastleRights::BLACK_SHORT,
    CastleRights::BLACK_LONG,
];

/// Computes the key of the position from scratch.
pub(super) fn signature(position: &Position) -> Key {
    let mut key = 0;
    for (square, piece) in position.board().iter() {
        key ^= PIECES[piece.index()][square as usize];
    }
    if position.side_to_move() == Player::Black {
        key ^= BLACK_TO_MOVE;
    }
    for (right, right_key) in CASTLE_RIGHTS.iter().zip(CASTLING) {
        if position.castling().contains(*right) {
            key ^= right_key;
        }
    }
    if let Some(square) = position.en_passant_square() {
        key ^= EN_PASSANT_FILES[square.file() as usize];
    }
    key
}
