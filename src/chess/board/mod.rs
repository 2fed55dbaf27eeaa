pub mod check;
pub mod extra;
pub mod grid;
pub mod movegen;
pub mod positions;
pub mod validation;

use std::fmt::{self, Debug, Display, Formatter};

use crate::{
    chess::{
        board::{
            extra::ExtraState,
            grid::Grid,
            movegen::{MoveList, all_possible_moves, trim_moves_into_check},
            positions::PositionIndex,
        },
        chessmove::{ExecutedMove, Move},
        fen::Fen,
        piece::{Colour, Piece, PieceType},
        types::{CastlingRights, CheckState, File, Rank, Square},
    },
    errors::{FenParseError, MoveParseError},
};

/// A chess position, held in two representations at once.
///
/// The grid answers "what is on this square", the position index answers
/// "where are this side's pieces of this type". Every mutation goes through
/// `move_piece` / `undo_move`, which keep the two in agreement.
///
/// A board is a fixed-size value with no heap allocation, so callers can
/// either clone it for each branch of a search, or apply and undo moves on
/// one board in strict last-in first-out order.
#[derive(PartialEq, Eq, Clone)]
pub struct Board {
    grid: Grid,
    positions: PositionIndex,
    extra: ExtraState,
    /// The side to move.
    side: Colour,
    /// The number of half moves made since the start of the game.
    ply: usize,
}

impl Debug for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Board")
            .field("grid", &self.grid)
            .field("positions", &self.positions)
            .field("side", &self.side)
            .field("castling", &self.extra.castling())
            .field("ep_shadow", &self.extra.ep_shadow())
            .field("halfmove_clock", &self.extra.halfmove_clock())
            .field("ply", &self.ply)
            .finish()
    }
}

impl Board {
    pub const STARTING_FEN: &'static str =
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    pub fn empty() -> Self {
        Self {
            grid: Grid::default(),
            positions: PositionIndex::default(),
            extra: ExtraState::default(),
            side: Colour::White,
            ply: 0,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::empty();
    }

    pub fn set_from_fen(&mut self, fen: &Fen) {
        self.reset();

        self.grid = Grid::from_squares(fen.board);
        self.positions = PositionIndex::from_grid(&self.grid);
        self.extra = ExtraState::new(fen.castling, fen.ep, fen.halfmove);
        self.side = fen.turn;
        self.ply = (fen.fullmove.get() - 1).saturating_mul(2);
        if self.side == Colour::Black {
            self.ply = self.ply.saturating_add(1);
        }
    }

    pub fn set_startpos(&mut self) {
        let fen = Fen::parse(Self::STARTING_FEN).expect("STARTING_FEN is broken");
        self.set_from_fen(&fen);
    }

    /// Builds a board from a FEN string, parsed in relaxed mode.
    ///
    /// Rejects positions where the side that just moved is still in check.
    pub fn from_fen(fen: &str) -> Result<Self, FenParseError> {
        let parsed = Fen::parse_relaxed(fen)?;
        let mut out = Self::empty();
        out.set_from_fen(&parsed);
        if out.in_check(!out.side) {
            return Err(FenParseError::WaitingInCheck);
        }
        Ok(out)
    }

    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    pub const fn positions(&self) -> &PositionIndex {
        &self.positions
    }

    pub const fn extra(&self) -> &ExtraState {
        &self.extra
    }

    pub const fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.grid.read(sq)
    }

    pub fn king_sq(&self, side: Colour) -> Option<Square> {
        self.positions.king_square(side)
    }

    pub const fn turn(&self) -> Colour {
        self.side
    }

    pub const fn ply(&self) -> usize {
        self.ply
    }

    pub const fn fullmove_number(&self) -> usize {
        self.ply / 2 + 1
    }

    pub const fn castling_rights(&self) -> CastlingRights {
        self.extra.castling()
    }

    /// The en passant shadow square, if a pawn just made a double step.
    pub const fn ep_sq(&self) -> Option<Square> {
        self.extra.ep_shadow()
    }

    pub const fn halfmove_clock(&self) -> u8 {
        self.extra.halfmove_clock()
    }

    /// Applies `m`, which must be pseudo-legal for this position, and returns
    /// the record needed to take it back.
    pub fn move_piece(&mut self, m: Move) -> ExecutedMove {
        let snapshot = self.extra;
        let ep_victim = if m.is_ep() {
            snapshot.passantable_piece_square()
        } else {
            None
        };

        let captured = self.grid.move_piece(m, ep_victim);
        self.positions.move_piece(m, captured, ep_victim);
        self.extra.move_piece(m, captured);

        self.side = !self.side;
        self.ply += 1;

        ExecutedMove {
            mv: m,
            extra: snapshot,
            captured,
        }
    }

    /// Takes back the most recent move. `executed` must be the record that
    /// the matching `move_piece` call returned.
    pub fn undo_move(&mut self, executed: ExecutedMove) {
        self.grid.undo_move(&executed);
        self.positions.undo_move(&executed);
        self.extra = executed.extra;

        self.side = !self.side;
        self.ply -= 1;
    }

    /// Whether `side`'s king is attacked. A side with no king is never in
    /// check.
    pub fn in_check(&self, side: Colour) -> bool {
        self.king_sq(side)
            .is_some_and(|king| check::is_checked(self, side, king))
    }

    /// Every pseudo-legal move for `side`.
    pub fn pseudo_legal_moves(&self, side: Colour) -> MoveList {
        let mut moves = MoveList::new();
        all_possible_moves(self, &mut moves, side);
        moves
    }

    /// Every legal move for the side to move.
    pub fn legal_moves(&self) -> MoveList {
        let mut moves = self.pseudo_legal_moves(self.side);
        trim_moves_into_check(self, &mut moves, self.side);
        moves
    }

    pub fn check_state(&self, side: Colour) -> CheckState {
        let mut moves = self.pseudo_legal_moves(side);
        trim_moves_into_check(self, &mut moves, side);
        match (self.in_check(side), moves.is_empty()) {
            (true, true) => CheckState::Checkmate,
            (true, false) => CheckState::Check,
            (false, true) => CheckState::Stalemate,
            (false, false) => CheckState::None,
        }
    }

    pub fn is_checkmated(&self, side: Colour) -> bool {
        self.check_state(side) == CheckState::Checkmate
    }

    pub fn is_stalemated(&self, side: Colour) -> bool {
        self.check_state(side) == CheckState::Stalemate
    }

    /// Resolves a move in coordinate notation (`e2e4`, `a7a8q`) against the
    /// legal moves of the side to move.
    pub fn parse_uci(&self, uci: &str) -> Result<Move, MoveParseError> {
        use MoveParseError::{
            IllegalMove, InvalidFromSquareFile, InvalidFromSquareRank, InvalidLength,
            InvalidPromotionPiece, InvalidToSquareFile, InvalidToSquareRank,
        };
        let bytes = uci.as_bytes();
        if !(4..=5).contains(&bytes.len()) {
            return Err(InvalidLength(bytes.len()));
        }
        let [from_file, from_rank, to_file, to_rank] = [0, 1, 2, 3].map(|i| char::from(bytes[i]));
        let from_file = File::from_char(from_file).ok_or(InvalidFromSquareFile(from_file))?;
        let from_rank = Rank::from_char(from_rank).ok_or(InvalidFromSquareRank(from_rank))?;
        let to_file = File::from_char(to_file).ok_or(InvalidToSquareFile(to_file))?;
        let to_rank = Rank::from_char(to_rank).ok_or(InvalidToSquareRank(to_rank))?;
        let promotion = match bytes.get(4).copied().map(char::from) {
            Some(c) => Some(PieceType::from_promo_char(c).ok_or(InvalidPromotionPiece(c))?),
            None => None,
        };

        let from = Square::from_rank_file(from_rank, from_file);
        let to = Square::from_rank_file(to_rank, to_file);

        self.legal_moves()
            .into_iter()
            .find(|m| m.from == from && m.to == to && m.promotion == promotion)
            .ok_or_else(|| IllegalMove(uci.to_string()))
    }
}

impl Default for Board {
    fn default() -> Self {
        let mut out = Self::empty();
        out.set_startpos();
        out
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        let mut counter = 0;
        for rank in Rank::all().rev() {
            for file in File::all() {
                let sq = Square::from_rank_file(rank, file);
                if let Some(piece) = self.piece_at(sq) {
                    if counter != 0 {
                        write!(f, "{counter}")?;
                    }
                    counter = 0;
                    write!(f, "{piece}")?;
                } else {
                    counter += 1;
                }
            }
            if counter != 0 {
                write!(f, "{counter}")?;
            }
            counter = 0;
            if rank != Rank::One {
                write!(f, "/")?;
            }
        }

        match self.side {
            Colour::White => write!(f, " w")?,
            Colour::Black => write!(f, " b")?,
        }
        write!(f, " {}", self.castling_rights())?;
        if let Some(ep_sq) = self.ep_sq() {
            write!(f, " {ep_sq}")?;
        } else {
            write!(f, " -")?;
        }
        write!(f, " {}", self.halfmove_clock())?;
        write!(f, " {}", self.fullmove_number())?;

        Ok(())
    }
}

impl fmt::UpperHex for Board {
    fn fmt(&self, f: &mut Formatter) -> Result<(), std::fmt::Error> {
        for rank in Rank::all().rev() {
            write!(f, "{} ", rank.char())?;
            for file in File::all() {
                let sq = Square::from_rank_file(rank, file);
                if let Some(piece) = self.piece_at(sq) {
                    write!(f, "{piece} ")?;
                } else {
                    write!(f, ". ")?;
                }
            }
            writeln!(f)?;
        }

        writeln!(f, "  a b c d e f g h")?;
        write!(f, "FEN: {self}")?;

        Ok(())
    }
}
