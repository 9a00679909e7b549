//! Square arithmetic and ray tracing. Everything that needs to know whether a
//! path between two squares is clear (sliding pieces, castling, pins) goes
//! through [`ray`] and [`between`] instead of walking the board by hand.

use strum::IntoEnumIterator;

use crate::chess::bitboard::Bitboard;
use crate::chess::core::{Direction, Square};

/// Moves the square by given number of files and ranks. Returns [`None`] if
/// the target is outside of the board.
#[must_use]
pub fn offset(square: Square, file_delta: i8, rank_delta: i8) -> Option<Square> {
    square.offset(file_delta, rank_delta)
}

/// Lazily produces squares in a [`Direction`], starting next to the origin and
/// stopping at the edge of the board.
///
/// ```
/// use tabia::chess::core::{Direction, Square};
/// use tabia::chess::geometry::ray;
///
/// assert_eq!(
///     ray(Square::F6, Direction::UpRight).collect::<Vec<_>>(),
///     vec![Square::G7, Square::H8]
/// );
/// assert_eq!(ray(Square::H8, Direction::Up).next(), None);
/// ```
#[derive(Clone, Debug)]
pub struct Ray {
    next: Option<Square>,
    direction: Direction,
}

impl Iterator for Ray {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.shift(self.direction);
        Some(current)
    }
}

/// Creates a [`Ray`] from `square` towards `direction`. The origin itself is
/// not included.
#[must_use]
pub fn ray(square: Square, direction: Direction) -> Ray {
    Ray {
        next: square.shift(direction),
        direction,
    }
}

/// The way two squares line up on the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Alignment {
    /// The squares do not share a rank, file or diagonal (or are the same
    /// square).
    None,
    /// Same rank.
    Horizontal,
    /// Same file.
    Vertical,
    /// Same diagonal or anti-diagonal.
    Diagonal,
}

/// Classifies the line connecting two squares.
///
/// ```
/// use tabia::chess::core::Square;
/// use tabia::chess::geometry::{alignment, Alignment};
///
/// assert_eq!(alignment(Square::A1, Square::H8), Alignment::Diagonal);
/// assert_eq!(alignment(Square::E1, Square::E8), Alignment::Vertical);
/// assert_eq!(alignment(Square::B1, Square::C3), Alignment::None);
/// assert_eq!(alignment(Square::D4, Square::D4), Alignment::None);
/// ```
#[must_use]
pub fn alignment(from: Square, to: Square) -> Alignment {
    let file_distance = to.file() as i8 - from.file() as i8;
    let rank_distance = to.rank() as i8 - from.rank() as i8;
    match (file_distance, rank_distance) {
        (0, 0) => Alignment::None,
        (_, 0) => Alignment::Horizontal,
        (0, _) => Alignment::Vertical,
        (file, rank) if file.abs() == rank.abs() => Alignment::Diagonal,
        _ => Alignment::None,
    }
}

/// Returns the direction of the ray that starts at `from` and passes through
/// `to`, if the squares are aligned.
#[must_use]
pub fn direction(from: Square, to: Square) -> Option<Direction> {
    if alignment(from, to) == Alignment::None {
        return None;
    }
    let file_step = (to.file() as i8 - from.file() as i8).signum();
    let rank_step = (to.rank() as i8 - from.rank() as i8).signum();
    Direction::iter().find(|direction| direction.delta() == (file_step, rank_step))
}

/// Squares strictly between two aligned squares. Empty for unaligned pairs,
/// adjacent squares and `from == to`.
///
/// ```
/// use tabia::chess::core::Square;
/// use tabia::chess::geometry::between;
///
/// assert_eq!(
///     between(Square::E1, Square::H1).iter().collect::<Vec<_>>(),
///     vec![Square::F1, Square::G1]
/// );
/// assert!(between(Square::E1, Square::F3).is_empty());
/// ```
#[must_use]
pub fn between(from: Square, to: Square) -> Bitboard {
    direction(from, to).map_or_else(Bitboard::empty, |direction| {
        ray(from, direction)
            .take_while(|square| *square != to)
            .collect()
    })
}
