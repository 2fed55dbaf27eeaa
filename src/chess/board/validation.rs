use crate::{
    chess::{
        board::Board,
        piece::{Colour, Piece, PieceType},
        types::{CastlingRights, Square},
    },
    errors::PositionValidityError,
};

impl Board {
    /// Checks that the grid and the position index describe the same set of
    /// pieces, in both directions.
    pub fn positions_equals_grid(&self) -> bool {
        self.grid_in_positions().is_ok() && self.positions_in_grid().is_ok()
    }

    fn grid_in_positions(&self) -> Result<(), PositionValidityError> {
        for sq in Square::all() {
            let Some(piece) = self.piece_at(sq) else {
                continue;
            };
            let found = self
                .positions()
                .slice(piece.colour(), piece.piece_type())
                .iter()
                .filter(|&&s| s == sq)
                .count();
            if found != 1 {
                return Err(format!(
                    "grid / index coherency corrupt: {piece} on {sq} is indexed {found} times"
                ));
            }
        }
        Ok(())
    }

    fn positions_in_grid(&self) -> Result<(), PositionValidityError> {
        for colour in Colour::all() {
            for (piece, sq) in self.positions().pieces(colour) {
                if self.piece_at(sq) != Some(piece) {
                    let on_grid = self.piece_at(sq);
                    return Err(format!(
                        "grid / index coherency corrupt: {piece} on {sq}, grid has {on_grid:?}"
                    ));
                }
            }
        }
        Ok(())
    }

    pub fn check_validity(&self) -> Result<(), PositionValidityError> {
        // check index boundaries
        for colour in Colour::all() {
            let team = self.positions().team(colour);
            let mut prev = 0;
            for (pt, &end) in PieceType::all().zip(team.ends()) {
                if end < prev {
                    return Err(format!(
                        "{colour} boundary for {pt} is corrupt: {end} comes after {prev}"
                    ));
                }
                prev = end;
            }
            if usize::from(prev) != team.len() {
                return Err(format!(
                    "{colour} boundaries are corrupt: last is {prev} but {} squares are stored",
                    team.len()
                ));
            }
        }

        self.grid_in_positions()?;
        self.positions_in_grid()?;

        // check there are the correct number of kings for each side
        for colour in Colour::all() {
            let kings = self.positions().amount(colour, PieceType::King);
            if kings > 1 {
                return Err(format!(
                    "{colour} king count is corrupt: expected at most 1, got {kings}"
                ));
            }
        }

        if let Some(shadow) = self.ep_sq() {
            let expected_row = match self.turn() {
                Colour::White => 2,
                Colour::Black => 5,
            };
            if shadow.row() != expected_row {
                return Err(format!(
                    "en passant square is corrupt: {shadow} can't be the shadow with {} to move",
                    self.turn()
                ));
            }
        }

        // castling rights must match the pieces on their home squares
        let rights = self.castling_rights();
        for colour in Colour::all() {
            let king = Some(Piece::new(colour, PieceType::King));
            let rook = Some(Piece::new(colour, PieceType::Rook));
            let home = CastlingRights::king_home(colour);
            for (has_right, rook_home) in [
                (
                    rights.kingside(colour),
                    CastlingRights::kingside_rook_home(colour),
                ),
                (
                    rights.queenside(colour),
                    CastlingRights::queenside_rook_home(colour),
                ),
            ] {
                let moved = self.piece_at(home) != king || self.piece_at(rook_home) != rook;
                if has_right && moved {
                    return Err(format!(
                        "castling rights are corrupt: {colour} may castle with {rook_home}"
                    ));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chess::fen::Fen;

    #[test]
    fn startpos_is_valid() {
        let board = Board::default();
        assert_eq!(board.check_validity(), Ok(()));
        assert!(board.positions_equals_grid());
    }

    #[test]
    fn inconsistent_castling_is_caught() {
        let mut fen = Fen::parse("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        fen.castling = CastlingRights::ALL;
        let mut board = Board::empty();
        board.set_from_fen(&fen);
        assert!(board.positions_equals_grid());
        assert!(board.check_validity().is_err());
    }

    #[test]
    fn misplaced_shadow_is_caught() {
        let mut fen = Fen::parse("4k3/8/8/8/4P3/8/8/4K3 b - e3 0 1").unwrap();
        fen.turn = Colour::White;
        let mut board = Board::empty();
        board.set_from_fen(&fen);
        assert!(board.check_validity().is_err());
    }
}
