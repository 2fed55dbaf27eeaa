use crate::chess::{
    chessmove::{Move, SpecialMove},
    piece::{Piece, PieceType},
    types::{CastlingRights, Square},
};

/// The parts of a position that the piece placement doesn't capture.
///
/// This is small and `Copy` so that a whole snapshot can be stored in each
/// `ExecutedMove`; undoing a move simply restores the snapshot.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct ExtraState {
    castling: CastlingRights,
    /// The square a pawn would land on when capturing en passant.
    ep_shadow: Option<Square>,
    /// Half moves since the last capture or pawn move.
    halfmove_clock: u8,
}

impl ExtraState {
    pub const fn new(
        castling: CastlingRights,
        ep_shadow: Option<Square>,
        halfmove_clock: u8,
    ) -> Self {
        Self {
            castling,
            ep_shadow,
            halfmove_clock,
        }
    }

    pub const fn castling(&self) -> CastlingRights {
        self.castling
    }

    pub const fn ep_shadow(&self) -> Option<Square> {
        self.ep_shadow
    }

    pub const fn halfmove_clock(&self) -> u8 {
        self.halfmove_clock
    }

    /// The square of the pawn that can be taken en passant.
    ///
    /// A shadow on the sixth rank was left by a black pawn, which now stands
    /// one row further down the grid; a shadow on the third rank was left by
    /// a white pawn, one row further up.
    pub fn passantable_piece_square(&self) -> Option<Square> {
        let shadow = self.ep_shadow?;
        match shadow.row() {
            2 => Some(shadow.shifted(8)),
            5 => Some(shadow.shifted(-8)),
            _ => None,
        }
    }

    pub fn move_piece(&mut self, m: Move, captured: Option<Piece>) {
        let us = m.piece.colour();

        self.ep_shadow = None;

        if m.piece.piece_type() == PieceType::Pawn || captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }

        match m.special {
            Some(SpecialMove::LoseCastleKingSide) => self.castling.clear_kingside(us),
            Some(SpecialMove::LoseCastleQueenSide) => self.castling.clear_queenside(us),
            Some(
                SpecialMove::LoseCastleBoth
                | SpecialMove::CastleKingSide
                | SpecialMove::CastleQueenSide,
            ) => {
                self.castling.clear(us);
            }
            Some(SpecialMove::PawnDoubleStep) => {
                self.ep_shadow = Square::new(u8::midpoint(m.from.inner(), m.to.inner()));
            }
            Some(SpecialMove::EnPassant) | None => (),
        }

        // a rook taken on its home square takes its side's right with it.
        if captured.is_some_and(|p| p.piece_type() == PieceType::Rook) {
            self.castling.remove(CastlingRights::touching(m.to));
        }
    }
}
