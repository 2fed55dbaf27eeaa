use crate::chess::{
    chessmove::{ExecutedMove, Move},
    piece::Piece,
    types::Square,
};

/// An 8x8 mailbox.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Grid {
    squares: [Option<Piece>; 64],
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            squares: [None; 64],
        }
    }
}

impl Grid {
    pub const fn from_squares(squares: [Option<Piece>; 64]) -> Self {
        Self { squares }
    }

    pub const fn read(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.index()]
    }

    pub fn set(&mut self, sq: Square, piece: Option<Piece>) {
        self.squares[sq] = piece;
    }

    /// Applies the mechanical part of `m` and returns what was captured.
    ///
    /// `ep_victim` is the square of the pawn taken by an en passant capture,
    /// and is only read when `m` is tagged as en passant.
    pub fn move_piece(&mut self, m: Move, ep_victim: Option<Square>) -> Option<Piece> {
        debug_assert_eq!(
            self.squares[m.from],
            Some(m.piece),
            "moving a piece that isn't there: {m:?}"
        );

        let captured = match ep_victim {
            Some(victim) if m.is_ep() => self.squares[victim].take(),
            _ => self.squares[m.to],
        };

        self.squares[m.from] = None;
        self.squares[m.to] = Some(m.landing_piece());

        if let Some((rook_from, rook_to)) = m.castling_rook_squares() {
            self.squares[rook_to] = self.squares[rook_from].take();
        }

        captured
    }

    /// Exact inverse of `move_piece`.
    pub fn undo_move(&mut self, executed: &ExecutedMove) {
        let m = executed.mv;

        // restoring the moving piece from the record also undoes any promotion.
        self.squares[m.to] = None;
        self.squares[m.from] = Some(m.piece);

        if m.is_ep() {
            if let Some(victim) = executed.extra.passantable_piece_square() {
                self.squares[victim] = executed.captured;
            }
        } else {
            self.squares[m.to] = executed.captured;
        }

        if let Some((rook_from, rook_to)) = m.castling_rook_squares() {
            self.squares[rook_from] = self.squares[rook_to].take();
        }
    }
}
