use std::fmt::{Debug, Display, Formatter};

use crate::chess::{
    board::extra::ExtraState,
    piece::{Piece, PieceType},
    types::Square,
};

/// Extra information attached to a move that the board needs in order to
/// apply it without re-deriving context.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum SpecialMove {
    /// A rook leaves its king-side home square.
    LoseCastleKingSide,
    /// A rook leaves its queen-side home square.
    LoseCastleQueenSide,
    /// The king moves without castling.
    LoseCastleBoth,
    EnPassant,
    PawnDoubleStep,
    CastleKingSide,
    CastleQueenSide,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    pub piece: Piece,
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceType>,
    pub special: Option<SpecialMove>,
}

impl Move {
    pub const fn new(piece: Piece, from: Square, to: Square) -> Self {
        Self {
            piece,
            from,
            to,
            promotion: None,
            special: None,
        }
    }

    pub const fn new_with_special(
        piece: Piece,
        from: Square,
        to: Square,
        special: SpecialMove,
    ) -> Self {
        Self {
            piece,
            from,
            to,
            promotion: None,
            special: Some(special),
        }
    }

    pub const fn new_with_promo(
        piece: Piece,
        from: Square,
        to: Square,
        promotion: PieceType,
    ) -> Self {
        debug_assert!(promotion.legal_promo());
        Self {
            piece,
            from,
            to,
            promotion: Some(promotion),
            special: None,
        }
    }

    pub const fn is_promo(self) -> bool {
        self.promotion.is_some()
    }

    pub const fn is_ep(self) -> bool {
        matches!(self.special, Some(SpecialMove::EnPassant))
    }

    pub const fn is_castle(self) -> bool {
        matches!(
            self.special,
            Some(SpecialMove::CastleKingSide | SpecialMove::CastleQueenSide)
        )
    }

    pub const fn is_kingside_castling(self) -> bool {
        matches!(self.special, Some(SpecialMove::CastleKingSide))
    }

    pub const fn is_queenside_castling(self) -> bool {
        matches!(self.special, Some(SpecialMove::CastleQueenSide))
    }

    /// The piece standing on `to` once the move is made.
    pub const fn landing_piece(self) -> Piece {
        match self.promotion {
            Some(pt) => self.piece.with_type(pt),
            None => self.piece,
        }
    }

    /// For a castling move, the rook's origin and destination squares.
    pub const fn castling_rook_squares(self) -> Option<(Square, Square)> {
        match self.special {
            Some(SpecialMove::CastleKingSide) => {
                Some((self.from.shifted(3), self.from.shifted(1)))
            }
            Some(SpecialMove::CastleQueenSide) => {
                Some((self.from.shifted(-4), self.from.shifted(-1)))
            }
            _ => None,
        }
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        if let Some(pchar) = self.promotion.and_then(PieceType::promo_char) {
            write!(f, "{}{}{pchar}", self.from, self.to)
        } else {
            write!(f, "{}{}", self.from, self.to)
        }
    }
}

impl Debug for Move {
    fn fmt(&self, f: &mut Formatter) -> Result<(), std::fmt::Error> {
        write!(f, "{} {}{}", self.piece, self.from, self.to)?;
        if let Some(promo) = self.promotion {
            write!(f, "={promo}")?;
        }
        if let Some(special) = self.special {
            write!(f, " ({special:?})")?;
        }
        Ok(())
    }
}

/// The record of a move that has been applied to a board.
///
/// It holds everything needed to reverse the move: the move itself, the
/// extra state as it was *before* the move, and whatever was captured.
/// Records must be handed back to `Board::undo_move` exactly once, in the
/// reverse order of their creation.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ExecutedMove {
    pub mv: Move,
    pub extra: ExtraState,
    pub captured: Option<Piece>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_move() {
        let m = Move::new(Piece::WP, Square::E2, Square::E3);
        assert_eq!(m.from, Square::E2);
        assert_eq!(m.to, Square::E3);
        assert!(!m.is_ep());
        assert!(!m.is_castle());
        assert!(!m.is_promo());
        assert_eq!(m.landing_piece(), Piece::WP);
        assert_eq!(m.to_string(), "e2e3");
    }

    #[test]
    fn promotion() {
        let m = Move::new_with_promo(Piece::BP, Square::B2, Square::A1, PieceType::Knight);
        assert!(m.is_promo());
        assert_eq!(m.landing_piece(), Piece::BN);
        assert_eq!(m.to_string(), "b2a1n");
    }

    #[test]
    fn castling_rook_relocation() {
        let ks = Move::new_with_special(
            Piece::WK,
            Square::E1,
            Square::G1,
            SpecialMove::CastleKingSide,
        );
        assert!(ks.is_kingside_castling());
        assert_eq!(ks.castling_rook_squares(), Some((Square::H1, Square::F1)));

        let qs = Move::new_with_special(
            Piece::BK,
            Square::E8,
            Square::C8,
            SpecialMove::CastleQueenSide,
        );
        assert!(qs.is_queenside_castling());
        assert_eq!(qs.castling_rook_squares(), Some((Square::A8, Square::D8)));

        let plain = Move::new(Piece::WK, Square::E1, Square::F1);
        assert_eq!(plain.castling_rook_squares(), None);
    }
}
