//! The public state machine of a chess game: a [`Position`] together with the
//! history that led to it and the derived [`Status`]. Every accepted move
//! produces a new [`Game`], the old one stays valid.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, instrument, trace};

use crate::chess::core::{Move, MoveList, Player};
use crate::chess::position::Position;
use crate::chess::zobrist::Key;

/// Halfmoves without a capture or a pawn move after which the game is drawn.
const FIFTY_MOVE_RULE_HALFMOVES: u8 = 100;
/// Occurrences of the same position after which the game is drawn.
const REPETITION_DRAW_OCCURRENCES: u8 = 3;

/// Why the game ended in a draw (apart from stalemate).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, derive_more::Display)]
pub enum DrawReason {
    /// 50 moves by each player without a capture or a pawn move.
    #[display("fifty-move rule")]
    FiftyMove,
    /// The same position occurred three times.
    #[display("threefold repetition")]
    Repetition,
    /// Neither player can possibly checkmate.
    #[display("insufficient material")]
    InsufficientMaterial,
}

/// State of the game as seen by the player to move. [`Status::Checkmate`],
/// [`Status::Stalemate`] and [`Status::Draw`] are terminal: no moves are
/// accepted afterwards.
///
/// The player carried by [`Status::Check`] and [`Status::Checkmate`] is the
/// one whose king is attacked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Status {
    #[allow(missing_docs)]
    Ongoing,
    #[allow(missing_docs)]
    Check(Player),
    #[allow(missing_docs)]
    Checkmate(Player),
    #[allow(missing_docs)]
    Stalemate,
    #[allow(missing_docs)]
    Draw(DrawReason),
}

impl Status {
    /// Returns true if the game is over.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Checkmate(_) | Self::Stalemate | Self::Draw(_))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ongoing => f.write_str("ongoing"),
            Self::Check(player) => write!(f, "{player:?} is in check"),
            Self::Checkmate(player) => write!(f, "checkmate, {player:?} is mated"),
            Self::Stalemate => f.write_str("stalemate"),
            Self::Draw(reason) => write!(f, "draw by {reason}"),
        }
    }
}

/// Error that can occur when applying a move.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The move is not one of the legal moves: wrong side's piece, empty
    /// origin, blocked path, leaves own king in check or castling conditions
    /// are not met.
    #[display("illegal move {_0}")]
    IllegalMove(Move),
    /// A pawn reaching the last rank needs a queen, rook, bishop or knight
    /// promotion; other moves can not have any.
    #[display("invalid promotion {_0}")]
    InvalidPromotion(Move),
    /// The game has already ended.
    #[display("game is over ({_0})")]
    GameOver(Status),
}

impl std::error::Error for MoveError {}

/// A game of chess from some initial position. The history of played moves is
/// kept to detect repetitions and to take moves back.
///
/// Every game links to the one it was derived from and the link is shared:
/// applying a move copies neither the history nor the earlier positions.
///
/// ```
/// use tabia::chess::core::Move;
/// use tabia::chess::game::{Game, Status};
///
/// let game = Game::new();
/// let next_move = Move::from_uci("e2e4", game.position()).unwrap();
/// let game = game.apply_move(&next_move).unwrap();
/// assert_eq!(game.status(), Status::Ongoing);
/// assert_eq!(game.legal_moves().len(), 20);
/// ```
#[derive(Clone)]
pub struct Game {
    position: Position,
    signature: Key,
    previous: Option<Arc<Ply>>,
    plies: usize,
    moves: MoveList,
    status: Status,
}

/// The game before a move was played, paired with that move.
struct Ply {
    game: Game,
    played: Move,
}

impl Game {
    /// Starts a new game from the standard initial position.
    #[must_use]
    pub fn new() -> Self {
        Self::from_position(Position::starting())
    }

    /// Starts a game from an arbitrary (validated) position. The status is
    /// derived immediately: the position might already be terminal.
    #[must_use]
    pub fn from_position(position: Position) -> Self {
        let signature = position.signature();
        let moves = position.generate_moves();
        let status = derive_status(&position, &moves, 1);
        Self {
            position,
            signature,
            previous: None,
            plies: 0,
            moves,
            status,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn position(&self) -> &Position {
        &self.position
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn status(&self) -> Status {
        self.status
    }

    /// Legal moves of the player to move. Empty once the game is over, even
    /// if the position itself has moves (e.g. a draw by repetition).
    #[must_use]
    pub fn legal_moves(&self) -> MoveList {
        if self.status.is_terminal() {
            return MoveList::new();
        }
        self.moves.clone()
    }

    /// Returns true if the player to move is in check.
    #[must_use]
    pub fn in_check(&self) -> bool {
        self.position.in_check()
    }

    /// Moves played since the initial position, in order.
    pub fn history(&self) -> impl ExactSizeIterator<Item = Move> {
        let mut moves = Vec::with_capacity(self.plies);
        let mut ancestor = self.previous.as_deref();
        while let Some(ply) = ancestor {
            moves.push(ply.played);
            ancestor = ply.game.previous.as_deref();
        }
        moves.into_iter().rev()
    }

    /// Validates the move against the legal ones and commits it, producing
    /// the next state of the game. `self` is never modified.
    ///
    /// # Errors
    ///
    /// - [`MoveError::GameOver`] if the game has already ended.
    /// - [`MoveError::InvalidPromotion`] if a pawn reaches the last rank
    ///   without a valid promotion or a promotion is requested for any other
    ///   move.
    /// - [`MoveError::IllegalMove`] if the move is not legal otherwise.
    #[instrument(skip(self), fields(position = %self.position))]
    pub fn apply_move(&self, requested: &Move) -> Result<Self, MoveError> {
        if self.status.is_terminal() {
            trace!(status = %self.status, "rejected: game is over");
            return Err(MoveError::GameOver(self.status));
        }
        let played = self.resolve(requested).inspect_err(|error| {
            trace!(%error, "rejected");
        })?;

        let mut position = self.position.clone();
        position.make_move(&played);
        let moves = position.generate_moves();
        let mut next = Self {
            signature: position.signature(),
            position,
            previous: Some(Arc::new(Ply {
                game: self.clone(),
                played,
            })),
            plies: self.plies + 1,
            moves,
            status: Status::Ongoing,
        };
        next.status = derive_status(&next.position, &next.moves, next.occurrences());

        debug!(%played, status = %next.status, "move committed");
        if next.status.is_terminal() {
            info!(status = %next.status, moves = next.plies, "game over");
        }
        Ok(next)
    }

    /// Number of times the current position occurred in the game, this one
    /// included. Captures and pawn moves are irreversible, so only the plies
    /// counted by the halfmove clock are searched.
    fn occurrences(&self) -> u8 {
        let mut occurrences = 1_u8;
        let mut ancestor = self.previous.as_deref();
        for _ in 0..self.position.halfmove_clock() {
            let Some(ply) = ancestor else {
                break;
            };
            if ply.game.signature == self.signature {
                occurrences = occurrences.saturating_add(1);
            }
            ancestor = ply.game.previous.as_deref();
        }
        occurrences
    }

    /// Finds the legal move matching the request. Only the squares and the
    /// promotion are compared: the returned move carries the [`MoveKind`]
    /// of the generated one.
    ///
    /// [`MoveKind`]: crate::chess::core::MoveKind
    fn resolve(&self, requested: &Move) -> Result<Move, MoveError> {
        let mut candidates = self
            .moves
            .iter()
            .filter(|candidate| candidate.from == requested.from && candidate.to == requested.to)
            .peekable();
        let Some(first) = candidates.peek() else {
            return Err(MoveError::IllegalMove(*requested));
        };
        let promotes = first.promotion.is_some();
        match requested.promotion {
            None if promotes => Err(MoveError::InvalidPromotion(*requested)),
            Some(kind) if !promotes || !kind.is_valid_promotion() => {
                Err(MoveError::InvalidPromotion(*requested))
            },
            _ => candidates
                .find(|candidate| candidate.promotion == requested.promotion)
                .copied()
                .ok_or(MoveError::IllegalMove(*requested)),
        }
    }

    /// Takes the last move back. Returns [`None`] at the initial position.
    #[must_use]
    pub fn undo(&self) -> Option<Self> {
        let ply = self.previous.as_deref()?;
        debug!(taken_back = %ply.played, "move taken back");
        Some(ply.game.clone())
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("position", &self.position)
            .field("plies", &self.plies)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

// Long games would otherwise be dropped recursively, one stack frame per ply.
impl Drop for Game {
    fn drop(&mut self) {
        let mut previous = self.previous.take();
        while let Some(ply) = previous {
            previous = Arc::into_inner(ply).and_then(|mut ply| ply.game.previous.take());
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

/// Checkmate and stalemate take precedence over the draw rules, which are
/// checked in a fixed order.
fn derive_status(position: &Position, moves: &MoveList, occurrences: u8) -> Status {
    let in_check = position.in_check();
    if moves.is_empty() {
        return if in_check {
            Status::Checkmate(position.side_to_move())
        } else {
            Status::Stalemate
        };
    }
    if position.halfmove_clock() >= FIFTY_MOVE_RULE_HALFMOVES {
        return Status::Draw(DrawReason::FiftyMove);
    }
    if occurrences >= REPETITION_DRAW_OCCURRENCES {
        return Status::Draw(DrawReason::Repetition);
    }
    if position.has_insufficient_material() {
        return Status::Draw(DrawReason::InsufficientMaterial);
    }
    if in_check {
        Status::Check(position.side_to_move())
    } else {
        Status::Ongoing
    }
}
