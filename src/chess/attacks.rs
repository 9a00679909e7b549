//! Piece movement rules: pseudo-legal target squares of each piece kind and
//! attack detection. Nothing here checks whether the mover's own king ends up
//! in check, that is the job of [`crate::chess::position::Position`].

use strum::IntoEnumIterator;

use crate::chess::bitboard::Bitboard;
use crate::chess::board::Board;
use crate::chess::core::{
    CastleRights,
    Direction,
    File,
    Piece,
    PieceKind,
    Player,
    Rank,
    Square,
};
use crate::chess::geometry::{between, ray};
use crate::chess::position::Position;

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// Squares the piece standing on `from` can move to, ignoring whether the move
/// leaves its own king in check. Castling targets are included when the right
/// is held, the rook is in its corner and the squares between are empty.
///
/// ```
/// use tabia::chess::attacks::pseudo_legal_targets;
/// use tabia::chess::core::{Piece, Square};
/// use tabia::chess::position::Position;
///
/// let position = Position::starting();
/// let knight = Piece::try_from('N').unwrap();
/// assert_eq!(
///     pseudo_legal_targets(&position, Square::G1, knight)
///         .iter()
///         .collect::<Vec<_>>(),
///     vec![Square::F3, Square::H3]
/// );
/// ```
#[must_use]
pub fn pseudo_legal_targets(position: &Position, from: Square, piece: Piece) -> Bitboard {
    let board = position.board();
    match piece.kind {
        PieceKind::Pawn => pawn_targets(position, from, piece.owner),
        PieceKind::Knight => knight_targets(board, from, piece.owner),
        PieceKind::Bishop => bishop_targets(board, from, piece.owner),
        PieceKind::Rook => rook_targets(board, from, piece.owner),
        PieceKind::Queen => queen_targets(board, from, piece.owner),
        PieceKind::King => king_targets(position, from, piece.owner),
    }
}

fn pawn_targets(position: &Position, from: Square, owner: Player) -> Bitboard {
    let board = position.board();
    let step = owner.pawn_step();
    let mut targets = Bitboard::empty();
    if let Some(single) = from.offset(0, step).filter(|square| board.is_empty(*square)) {
        targets.insert(single);
        if from.rank() == Rank::pawns_starting(owner) {
            if let Some(double) = single.offset(0, step).filter(|square| board.is_empty(*square)) {
                targets.insert(double);
            }
        }
    }
    for target in pawn_attacks(from, owner) {
        if board.is_occupied_by(target, owner.opponent())
            || position.en_passant_square() == Some(target)
        {
            targets.insert(target);
        }
    }
    targets
}

fn knight_targets(board: &Board, from: Square, owner: Player) -> Bitboard {
    knight_attacks(from) - board.occupancy(owner)
}

fn bishop_targets(board: &Board, from: Square, owner: Player) -> Bitboard {
    sliding_attacks(board, from, &Direction::DIAGONAL) - board.occupancy(owner)
}

fn rook_targets(board: &Board, from: Square, owner: Player) -> Bitboard {
    sliding_attacks(board, from, &Direction::ORTHOGONAL) - board.occupancy(owner)
}

fn queen_targets(board: &Board, from: Square, owner: Player) -> Bitboard {
    bishop_targets(board, from, owner) | rook_targets(board, from, owner)
}

fn king_targets(position: &Position, from: Square, owner: Player) -> Bitboard {
    let board = position.board();
    let mut targets = king_attacks(from) - board.occupancy(owner);
    let backrank = Rank::backrank(owner);
    if from != Square::new(File::E, backrank) {
        return targets;
    }
    let rook = Piece::new(owner, PieceKind::Rook);
    for (right, rook_file, king_file) in [
        (CastleRights::short(owner), File::H, File::G),
        (CastleRights::long(owner), File::A, File::C),
    ] {
        let rook_square = Square::new(rook_file, backrank);
        if position.castling().contains(right)
            && board.piece_at(rook_square) == Some(rook)
            && (between(from, rook_square) & board.occupied()).is_empty()
        {
            targets.insert(Square::new(king_file, backrank));
        }
    }
    targets
}

/// Squares attacked by a pawn of given player standing on `from`. The
/// squares do not have to be occupied.
#[must_use]
pub fn pawn_attacks(from: Square, owner: Player) -> Bitboard {
    [-1, 1]
        .into_iter()
        .filter_map(|file_delta| from.offset(file_delta, owner.pawn_step()))
        .collect()
}

#[allow(missing_docs)]
#[must_use]
pub fn knight_attacks(from: Square) -> Bitboard {
    KNIGHT_OFFSETS
        .into_iter()
        .filter_map(|(file_delta, rank_delta)| from.offset(file_delta, rank_delta))
        .collect()
}

/// Adjacent squares only: castling never attacks anything.
#[must_use]
pub fn king_attacks(from: Square) -> Bitboard {
    Direction::iter()
        .filter_map(|direction| from.shift(direction))
        .collect()
}

/// Walks each ray until the first occupied square, which is included
/// regardless of its owner.
fn sliding_attacks(board: &Board, from: Square, directions: &[Direction]) -> Bitboard {
    let mut attacks = Bitboard::empty();
    for &direction in directions {
        for square in ray(from, direction) {
            attacks.insert(square);
            if !board.is_empty(square) {
                break;
            }
        }
    }
    attacks
}

/// Squares attacked by the piece standing on `from`, including the ones
/// occupied by its own pieces (i.e. the squares it defends).
#[must_use]
pub fn attacks(board: &Board, from: Square, piece: Piece) -> Bitboard {
    match piece.kind {
        PieceKind::Pawn => pawn_attacks(from, piece.owner),
        PieceKind::Knight => knight_attacks(from),
        PieceKind::Bishop => sliding_attacks(board, from, &Direction::DIAGONAL),
        PieceKind::Rook => sliding_attacks(board, from, &Direction::ORTHOGONAL),
        PieceKind::Queen => {
            sliding_attacks(board, from, &Direction::DIAGONAL)
                | sliding_attacks(board, from, &Direction::ORTHOGONAL)
        },
        PieceKind::King => king_attacks(from),
    }
}

/// Returns true if any piece of `attacker` attacks the square. Looks outwards
/// from the target square instead of enumerating the attacker's pieces.
///
/// ```
/// use tabia::chess::attacks::is_attacked;
/// use tabia::chess::board::Board;
/// use tabia::chess::core::{Player, Square};
///
/// let board = Board::starting();
/// assert!(is_attacked(&board, Square::F3, Player::White));
/// assert!(!is_attacked(&board, Square::E4, Player::White));
/// assert!(is_attacked(&board, Square::F6, Player::Black));
/// ```
#[must_use]
pub fn is_attacked(board: &Board, square: Square, attacker: Player) -> bool {
    let is = |candidate: Square, kind: PieceKind| {
        board.piece_at(candidate) == Some(Piece::new(attacker, kind))
    };
    // A pawn attacks the square if the defender's pawn on it would attack the
    // pawn back.
    if pawn_attacks(square, attacker.opponent())
        .iter()
        .any(|candidate| is(candidate, PieceKind::Pawn))
    {
        return true;
    }
    if knight_attacks(square)
        .iter()
        .any(|candidate| is(candidate, PieceKind::Knight))
    {
        return true;
    }
    if king_attacks(square)
        .iter()
        .any(|candidate| is(candidate, PieceKind::King))
    {
        return true;
    }
    Direction::iter().any(|direction| {
        let slider = if direction.is_diagonal() {
            PieceKind::Bishop
        } else {
            PieceKind::Rook
        };
        ray(square, direction)
            .find(|candidate| !board.is_empty(*candidate))
            .is_some_and(|blocker| is(blocker, slider) || is(blocker, PieceKind::Queen))
    })
}
