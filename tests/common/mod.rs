//! Helpers shared by the integration tests.

#![allow(dead_code)]

use anyhow::bail;
use itertools::Itertools;
use tabia::chess::board::Board;
use tabia::chess::core::{CastleRights, File, Move, Piece, Player, Rank, Square};
use tabia::chess::position::Position;

/// The crate does not read FEN: test positions are assembled from the
/// placement, side to move, castling rights, en passant target and clocks.
pub(crate) fn parse_fen(input: &str) -> anyhow::Result<Position> {
    let parts = input.split_ascii_whitespace().collect_vec();
    let [placement, side, castling, en_passant, halfmove, fullmove] = parts[..] else {
        bail!("FEN should have 6 parts, got {input}");
    };
    let rows = placement.split('/').collect_vec();
    if rows.len() != 8 {
        bail!("placement should have 8 ranks, got {placement}");
    }
    let mut board = Board::empty();
    for (rank, row) in (0..8u8).rev().zip(rows) {
        let rank = Rank::try_from(rank)?;
        let mut file = 0u8;
        for symbol in row.chars() {
            if let Some(skip) = symbol.to_digit(10) {
                file += u8::try_from(skip)?;
                continue;
            }
            board.place(
                Square::new(File::try_from(file)?, rank),
                Piece::try_from(symbol)?,
            );
            file += 1;
        }
    }
    let en_passant = match en_passant {
        "-" => None,
        square => Some(Square::try_from(square)?),
    };
    Position::from_parts(
        board,
        Player::try_from(side)?,
        CastleRights::try_from(castling)?,
        en_passant,
        halfmove.parse()?,
        fullmove.parse()?,
    )
}

pub(crate) fn setup(input: &str) -> Position {
    parse_fen(input).unwrap_or_else(|e| panic!("parsing legal position {input}: {e:#}"))
}

pub(crate) fn get_moves(position: &Position) -> Vec<String> {
    position
        .generate_moves()
        .iter()
        .map(Move::to_string)
        .sorted()
        .collect::<Vec<_>>()
}

pub(crate) fn sorted_moves(moves: &[&str]) -> Vec<String> {
    moves
        .iter()
        .map(|m| (*m).to_string())
        .sorted()
        .collect::<Vec<_>>()
}
