//! Pre-generated pseudo-random keys for [`crate::chess::zobrist`]: one per
//! (piece, square) pair, side to move, castling right and en passant file.
//! Produced by `build.rs` from a fixed seed.

use crate::chess::zobrist::Key;

include!(concat!(env!("OUT_DIR"), "/zobrist_keys.rs"));
