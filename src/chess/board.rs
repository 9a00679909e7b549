//! Square-centric board: each of the 64 squares holds an optional [`Piece`].
//! The board knows nothing about the rules, it never rejects a placement.

use std::fmt::{self, Write};

use strum::IntoEnumIterator;

use crate::chess::bitboard::Bitboard;
use crate::chess::core::{File, Piece, PieceKind, Player, Rank, Square, BOARD_SIZE};

/// Piece placement on the 8x8 grid.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [Option<Piece>; BOARD_SIZE as usize],
}

impl Board {
    /// Board without any pieces. Positions assembled by hand start here.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            squares: [None; BOARD_SIZE as usize],
        }
    }

    /// The standard initial piece placement.
    ///
    /// ```
    /// use tabia::chess::board::Board;
    ///
    /// assert_eq!(
    ///     Board::starting().to_string(),
    ///     "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"
    /// );
    /// ```
    #[must_use]
    pub fn starting() -> Self {
        const BACKRANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        let mut board = Self::empty();
        for player in Player::iter() {
            for (file, kind) in File::iter().zip(BACKRANK) {
                board.place(
                    Square::new(file, Rank::backrank(player)),
                    Piece::new(player, kind),
                );
                board.place(
                    Square::new(file, Rank::pawns_starting(player)),
                    Piece::new(player, PieceKind::Pawn),
                );
            }
        }
        board
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square as usize]
    }

    /// Puts the piece on given square, replacing the previous occupant.
    pub fn place(&mut self, square: Square, piece: Piece) {
        self.squares[square as usize] = Some(piece);
    }

    /// Clears the square and returns its former occupant.
    pub fn remove(&mut self, square: Square) -> Option<Piece> {
        self.squares[square as usize].take()
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_empty(&self, square: Square) -> bool {
        self.squares[square as usize].is_none()
    }

    /// Returns true if the square holds a piece of given player.
    #[must_use]
    pub fn is_occupied_by(&self, square: Square, player: Player) -> bool {
        self.piece_at(square)
            .is_some_and(|piece| piece.owner == player)
    }

    /// Squares occupied by the player's pieces.
    #[must_use]
    pub fn occupancy(&self, player: Player) -> Bitboard {
        self.iter()
            .filter(|(_, piece)| piece.owner == player)
            .map(|(square, _)| square)
            .collect()
    }

    /// Squares occupied by any piece.
    #[must_use]
    pub fn occupied(&self) -> Bitboard {
        self.iter().map(|(square, _)| square).collect()
    }

    /// Squares occupied by the given piece.
    #[must_use]
    pub fn pieces(&self, piece: Piece) -> Bitboard {
        self.iter()
            .filter(|(_, occupant)| *occupant == piece)
            .map(|(square, _)| square)
            .collect()
    }

    /// Location of the player's king. [`None`] only for boards that are still
    /// being set up.
    #[must_use]
    pub fn king_square(&self, player: Player) -> Option<Square> {
        let king = Piece::new(player, PieceKind::King);
        self.iter()
            .find(|(_, piece)| *piece == king)
            .map(|(square, _)| square)
    }

    /// Occupied squares with their pieces, from A1 to H8.
    pub fn iter(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::iter().filter_map(|square| self.piece_at(square).map(|piece| (square, piece)))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for Board {
    /// Prints board representation in FEN format.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter().rev() {
            let mut empty_squares = 0i32;
            for file in File::iter() {
                let square = Square::new(file, rank);
                if let Some(piece) = self.piece_at(square) {
                    if empty_squares != 0 {
                        write!(f, "{empty_squares}")?;
                        empty_squares = 0;
                    }
                    write!(f, "{piece}")?;
                } else {
                    empty_squares += 1;
                }
            }
            if empty_squares != 0 {
                write!(f, "{empty_squares}")?;
            }
            if rank != Rank::One {
                const RANK_SEPARATOR: char = '/';
                write!(f, "{RANK_SEPARATOR}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    /// Dumps the board in a simple format ('.' for empty square, FEN algebraic
    /// symbol for piece) a-la Stockfish "debug" command in UCI mode.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter().rev() {
            for file in File::iter() {
                match self.piece_at(Square::new(file, rank)) {
                    Some(piece) => write!(f, "{piece}"),
                    None => f.write_char('.'),
                }?;
                if file != File::H {
                    f.write_char(' ')?;
                }
            }
            if rank != Rank::One {
                f.write_char('\n')?;
            }
        }
        Ok(())
    }
}
