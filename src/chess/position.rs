//! Provides fully-specified [Chess Position] implementation: stores information
//! about the board and tracks the state of castling, 50-move rule draw, etc.
//!
//! The core of Move Generator and move making is also implemented here as a way
//! to produce ways of mutating [`Position`].
//!
//! [Chess Position]: https://www.chessprogramming.org/Chess_Position

use std::fmt;
use std::num::NonZeroU16;

use anyhow::{bail, Context};
use strum::IntoEnumIterator;

use crate::chess::attacks::{self, is_attacked};
use crate::chess::bitboard::Bitboard;
use crate::chess::board::Board;
use crate::chess::core::{
    CastleRights,
    File,
    Move,
    MoveKind,
    MoveList,
    Piece,
    PieceKind,
    Player,
    Rank,
    Square,
};
use crate::chess::geometry::between;
use crate::chess::zobrist::{self, Key};

/// State of the chess game: board, half-move counters and castling rights,
/// etc. It has 1:1 relationship with [Forsyth-Edwards Notation] (FEN), which
/// is what [`Position::fen`] produces.
///
/// Positions are either [`Position::starting`] or assembled from parts with
/// [`Position::from_parts`], which rejects placements that can not occur in a
/// game (missing kings, pawns on the backranks, the side that is not to move
/// being in check, etc.).
///
/// [Forsyth-Edwards Notation]: https://www.chessprogramming.org/Forsyth-Edwards_Notation
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Position {
    board: Board,
    castling: CastleRights,
    side_to_move: Player,
    /// [Halfmove Clock][^ply] keeps track of the number of (half-)moves
    /// since the last capture or pawn move and is used to enforce
    /// fifty[^fifty]-move draw rule.
    ///
    ///
    /// [Halfmove Clock]: https://www.chessprogramming.org/Halfmove_Clock
    /// [^ply]: "Half-move" or ["ply"](https://www.chessprogramming.org/Ply) means a move of only
    ///     one side.
    /// [^fifty]: 50 __full__ moves
    halfmove_clock: u8,
    fullmove_counter: NonZeroU16,
    en_passant_square: Option<Square>,
}

impl Position {
    /// Creates the starting position of the standard chess variant.
    ///
    /// ```
    /// use tabia::chess::position::Position;
    ///
    /// let starting_position = Position::starting();
    /// assert_eq!(
    ///     &starting_position.to_string(),
    ///     "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
    /// );
    /// ```
    #[must_use]
    pub fn starting() -> Self {
        Self {
            board: Board::starting(),
            castling: CastleRights::ALL,
            side_to_move: Player::White,
            halfmove_clock: 0,
            fullmove_counter: NonZeroU16::MIN,
            en_passant_square: None,
        }
    }

    /// Assembles a position and checks that it could occur in a game.
    ///
    /// # Errors
    ///
    /// Returns [`anyhow::Error`] if
    ///
    /// - either player does not have exactly one king or has more than 8
    ///   pawns,
    /// - there are pawns on the first or the last rank,
    /// - castling rights are held without the king and the rook on their
    ///   original squares,
    /// - the en passant square is not right behind the opponent's pawn that
    ///   has just been pushed by two squares,
    /// - the player who is not to move is in check,
    /// - the fullmove counter is 0.
    pub fn from_parts(
        board: Board,
        side_to_move: Player,
        castling: CastleRights,
        en_passant_square: Option<Square>,
        halfmove_clock: u8,
        fullmove_counter: u16,
    ) -> anyhow::Result<Self> {
        let Some(fullmove_counter) = NonZeroU16::new(fullmove_counter) else {
            bail!("fullmove counter starts at 1, got 0");
        };
        let position = Self {
            board,
            castling,
            side_to_move,
            halfmove_clock,
            fullmove_counter,
            en_passant_square,
        };
        position.validate()?;
        Ok(position)
    }

    fn validate(&self) -> anyhow::Result<()> {
        for player in Player::iter() {
            let kings = self.board.pieces(Piece::new(player, PieceKind::King)).count();
            if kings != 1 {
                bail!("{player:?} should have exactly one king, got {kings}");
            }
            let pawns = self.board.pieces(Piece::new(player, PieceKind::Pawn)).count();
            if pawns > 8 {
                bail!("{player:?} can not have more than 8 pawns, got {pawns}");
            }
        }
        let pawns = self.board.pieces(Piece::new(Player::White, PieceKind::Pawn))
            | self.board.pieces(Piece::new(Player::Black, PieceKind::Pawn));
        if !(pawns & (Bitboard::rank_mask(Rank::One) | Bitboard::rank_mask(Rank::Eight))).is_empty()
        {
            bail!("pawns can not be placed on backranks");
        }
        for player in Player::iter() {
            let backrank = Rank::backrank(player);
            let king_in_place = self.board.piece_at(Square::new(File::E, backrank))
                == Some(Piece::new(player, PieceKind::King));
            for (right, rook_file) in [
                (CastleRights::short(player), File::H),
                (CastleRights::long(player), File::A),
            ] {
                let rook_in_place = self.board.piece_at(Square::new(rook_file, backrank))
                    == Some(Piece::new(player, PieceKind::Rook));
                if self.castling.contains(right) && !(king_in_place && rook_in_place) {
                    bail!("castle rights {right} require the king and the rook on their original squares");
                }
            }
        }
        if let Some(square) = self.en_passant_square {
            let pusher = self.they();
            let expected_rank = match pusher {
                Player::White => Rank::Three,
                Player::Black => Rank::Six,
            };
            if square.rank() != expected_rank {
                bail!("en passant square should be on rank {expected_rank}, got {square}");
            }
            let pushed_pawn = square
                .offset(0, pusher.pawn_step())
                .context("en passant square is on the edge of the board")?;
            let origin = square
                .offset(0, -pusher.pawn_step())
                .context("en passant square is on the edge of the board")?;
            if self.board.piece_at(pushed_pawn) != Some(Piece::new(pusher, PieceKind::Pawn)) {
                bail!("en passant square {square} is not behind a pushed pawn");
            }
            if !self.board.is_empty(square) || !self.board.is_empty(origin) {
                bail!("the pawn could not have been pushed through {square}");
            }
        }
        if self.is_king_attacked(self.they()) {
            bail!("{:?} is not to move and can not be in check", self.they());
        }
        Ok(())
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn side_to_move(&self) -> Player {
        self.side_to_move
    }

    pub(super) const fn us(&self) -> Player {
        self.side_to_move
    }

    pub(super) const fn they(&self) -> Player {
        self.us().opponent()
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn castling(&self) -> CastleRights {
        self.castling
    }

    /// The square a pawn has just passed over with a double push, if any. It is
    /// set even if no enemy pawn can capture en passant.
    #[must_use]
    pub const fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_square
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn halfmove_clock(&self) -> u8 {
        self.halfmove_clock
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn fullmove_counter(&self) -> u16 {
        self.fullmove_counter.get()
    }

    /// Returns true if the player to move is in check.
    #[must_use]
    pub fn in_check(&self) -> bool {
        self.is_king_attacked(self.us())
    }

    fn is_king_attacked(&self, player: Player) -> bool {
        self.board
            .king_square(player)
            .is_some_and(|king| is_attacked(&self.board, king, player.opponent()))
    }

    /// Zobrist key of the position, see [`crate::chess::zobrist`].
    #[must_use]
    pub fn signature(&self) -> Key {
        zobrist::signature(self)
    }

    /// Tags a request to move the piece from `from` to `to` with the kind it
    /// would have in this position. Nothing is validated here: the result is
    /// only meaningful for moves that are (or claim to be) legal.
    pub(super) fn move_kind(&self, from: Square, to: Square) -> MoveKind {
        let basic = if self.board.is_empty(to) {
            MoveKind::Quiet
        } else {
            MoveKind::Capture
        };
        let Some(piece) = self.board.piece_at(from) else {
            return basic;
        };
        match piece.kind {
            PieceKind::King
                if from == Square::new(File::E, Rank::backrank(piece.owner))
                    && to.rank() == from.rank() =>
            {
                match to.file() {
                    File::G => MoveKind::KingsideCastle,
                    File::C => MoveKind::QueensideCastle,
                    _ => basic,
                }
            },
            PieceKind::Pawn
                if from.file() == to.file()
                    && (to.rank() as i8 - from.rank() as i8).abs() == 2 =>
            {
                MoveKind::DoublePawnPush
            },
            PieceKind::Pawn
                if from.file() != to.file()
                    && basic == MoveKind::Quiet
                    && self.en_passant_square == Some(to) =>
            {
                MoveKind::EnPassant
            },
            _ => basic,
        }
    }

    /// Calculates a list of legal moves (i.e. the moves that do not leave our
    /// king in check).
    ///
    /// Every pseudo-legal candidate is played on a copy of the position and
    /// kept only if the king is safe afterwards. Castling is also dropped when
    /// the king is in check or passes over an attacked square. Pawn moves to
    /// the last rank expand into all four promotions.
    ///
    /// ```
    /// use tabia::chess::position::Position;
    ///
    /// assert_eq!(Position::starting().generate_moves().len(), 20);
    /// ```
    #[must_use]
    pub fn generate_moves(&self) -> MoveList {
        let mut moves = MoveList::new();
        let us = self.us();
        let in_check = self.in_check();
        for (from, piece) in self.board.iter().filter(|(_, piece)| piece.owner == us) {
            for to in attacks::pseudo_legal_targets(self, from, piece) {
                let candidate = Move::new(from, to, None, self.move_kind(from, to));
                if candidate.is_castle() && (in_check || self.is_castle_path_attacked(from, to))
                {
                    continue;
                }
                if !self.is_safe_after(&candidate) {
                    continue;
                }
                if piece.kind == PieceKind::Pawn && to.rank() == Rank::promotion(us) {
                    for promotion in PieceKind::PROMOTIONS {
                        moves.push(Move::new(from, to, Some(promotion), candidate.kind));
                    }
                } else {
                    moves.push(candidate);
                }
            }
        }
        moves
    }

    fn is_castle_path_attacked(&self, from: Square, to: Square) -> bool {
        between(from, to)
            .iter()
            .any(|square| is_attacked(&self.board, square, self.they()))
    }

    fn is_safe_after(&self, candidate: &Move) -> bool {
        let mut next = self.clone();
        next.make_move(candidate);
        !next.is_king_attacked(self.us())
    }

    /// Applies the move in a position. The move is expected to be one of
    /// [`Position::generate_moves`]: there are no legality checks, use
    /// [`crate::chess::game::Game::apply_move`] for untrusted input.
    pub fn make_move(&mut self, next_move: &Move) {
        let us = self.us();
        let Some(piece) = self.board.remove(next_move.from) else {
            return;
        };
        let mut captured = self.board.remove(next_move.to).is_some();
        match next_move.kind {
            MoveKind::EnPassant => {
                captured |= self
                    .board
                    .remove(Square::new(next_move.to.file(), next_move.from.rank()))
                    .is_some();
            },
            MoveKind::KingsideCastle | MoveKind::QueensideCastle => {
                let (rook_from, rook_to) = castling_rook(us, next_move.kind);
                if let Some(rook) = self.board.remove(rook_from) {
                    self.board.place(rook_to, rook);
                }
            },
            MoveKind::Quiet | MoveKind::Capture | MoveKind::DoublePawnPush => (),
        }
        let landed = next_move
            .promotion
            .map_or(piece, |promotion| Piece::new(us, promotion));
        self.board.place(next_move.to, landed);

        if piece.kind == PieceKind::King {
            self.castling.remove(CastleRights::both(us));
        }
        self.castling
            .remove(CastleRights::tied_to(next_move.from) | CastleRights::tied_to(next_move.to));

        self.en_passant_square = match next_move.kind {
            MoveKind::DoublePawnPush => next_move.from.offset(0, us.pawn_step()),
            _ => None,
        };
        self.halfmove_clock = if captured || piece.kind == PieceKind::Pawn {
            0
        } else {
            self.halfmove_clock.saturating_add(1)
        };
        if us == Player::Black {
            self.fullmove_counter = self.fullmove_counter.saturating_add(1);
        }
        self.side_to_move = self.they();
    }

    /// Returns true if neither player has enough material to checkmate: only
    /// the kings, a single minor piece besides them or only bishops standing on
    /// squares of the same color.
    #[must_use]
    pub fn has_insufficient_material(&self) -> bool {
        let mut knights = 0u32;
        let mut light_bishops = 0u32;
        let mut dark_bishops = 0u32;
        for (square, piece) in self.board.iter() {
            match piece.kind {
                PieceKind::King => (),
                PieceKind::Queen | PieceKind::Rook | PieceKind::Pawn => return false,
                PieceKind::Knight => knights += 1,
                PieceKind::Bishop if square.is_light() => light_bishops += 1,
                PieceKind::Bishop => dark_bishops += 1,
            }
        }
        matches!(
            (knights, light_bishops, dark_bishops),
            (0, _, 0) | (0, 0, _) | (1, 0, 0)
        )
    }

    /// Serializes the position in Forsyth-Edwards Notation.
    #[must_use]
    pub fn fen(&self) -> String {
        self.to_string()
    }
}

/// Where the rook jumps from and to when the player castles.
const fn castling_rook(player: Player, kind: MoveKind) -> (Square, Square) {
    let backrank = Rank::backrank(player);
    match kind {
        MoveKind::QueensideCastle => (
            Square::new(File::A, backrank),
            Square::new(File::D, backrank),
        ),
        _ => (
            Square::new(File::H, backrank),
            Square::new(File::F, backrank),
        ),
    }
}

/// [Perft] (*per*formance *t*esting) counts the leaf nodes of the legal move
/// tree of given depth. The numbers for well-known positions are published,
/// which makes it the standard way of checking correctness of move generation
/// and move making.
///
/// ```
/// use tabia::chess::position::{perft, Position};
///
/// assert_eq!(perft(&Position::starting(), 2), 400);
/// ```
///
/// [Perft]: https://www.chessprogramming.org/Perft
#[must_use]
pub fn perft(position: &Position, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = position.generate_moves();
    if depth == 1 {
        return moves.len() as u64;
    }
    moves
        .iter()
        .map(|next_move| {
            let mut next = position.clone();
            next.make_move(next_move);
            perft(&next, depth - 1)
        })
        .sum()
}

impl fmt::Display for Position {
    /// Prints board in Forsyth-Edwards Notation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", &self.board)?;
        write!(f, "{} ", &self.side_to_move)?;
        write!(f, "{} ", &self.castling)?;
        match self.en_passant_square {
            Some(square) => write!(f, "{square} "),
            None => write!(f, "- "),
        }?;
        write!(f, "{} ", &self.halfmove_clock)?;
        write!(f, "{}", &self.fullmove_counter)?;
        Ok(())
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:?}", &self.board)?;
        writeln!(f, "Player to move: {:?}", &self.side_to_move)?;
        writeln!(f, "Fullmove counter: {:?}", &self.fullmove_counter)?;
        writeln!(f, "En Passant: {:?}", &self.en_passant_square)?;
        // bitflags' default fmt::Debug implementation is not very convenient:
        // dump FEN instead.
        writeln!(f, "Castling rights: {}", &self.castling)?;
        writeln!(f, "FEN: {self}")?;
        Ok(())
    }
}

#[cfg(test)]
impl Position {
    /// Positions in unit tests are written in FEN. Reading them goes through
    /// [`Position::from_parts`], so the validation is exercised too.
    pub(crate) fn from_fen(input: &str) -> anyhow::Result<Self> {
        let parts: Vec<&str> = input.split(' ').collect();
        let [placement, side, castling, en_passant, halfmove, fullmove] = parts[..] else {
            bail!("FEN should have 6 parts, got {input}");
        };
        let mut board = Board::empty();
        for (rank, row) in Rank::iter().rev().zip(placement.split('/')) {
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
        Self::from_parts(
            board,
            Player::try_from(side)?,
            CastleRights::try_from(castling)?,
            en_passant,
            halfmove.parse()?,
            fullmove.parse()?,
        )
    }
}
