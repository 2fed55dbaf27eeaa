//! The piece index: for each side, the squares of its pieces, grouped by
//! piece type.
//!
//! All of a side's squares live in one contiguous array, partitioned into
//! runs by a set of boundaries:
//!
//! ```text
//! [ K | Q Q | N N | B B | R R | P P P P P P P P ]
//!     ^     ^     ^     ^     ^                 ^
//!  ends[K] ends[Q] ...                       ends[P]
//! ```
//!
//! Squares of type `t` occupy `start(t)..ends[t]`, where `start(t)` is the end
//! of the previous type (or zero for the king). Adding or removing a square
//! shifts the array tail by one and moves every later boundary with it.

use arrayvec::ArrayVec;

use crate::chess::{
    board::grid::Grid,
    chessmove::{ExecutedMove, Move},
    piece::{Colour, Piece, PieceType},
    types::Square,
};

/// The largest number of pieces a side can have on the board.
pub const MAX_TEAM_PIECES: usize = 16;

#[derive(Clone, Debug, Default)]
pub struct TeamPositions {
    squares: ArrayVec<Square, MAX_TEAM_PIECES>,
    /// One past the last slot of each piece type.
    ends: [u8; PieceType::COUNT],
}

impl TeamPositions {
    const fn start(&self, pt: PieceType) -> usize {
        match pt {
            PieceType::King => 0,
            _ => self.ends[pt.index() - 1] as usize,
        }
    }

    pub fn slice(&self, pt: PieceType) -> &[Square] {
        &self.squares[self.start(pt)..self.ends[pt] as usize]
    }

    pub fn squares(&self) -> &[Square] {
        &self.squares
    }

    pub const fn ends(&self) -> &[u8; PieceType::COUNT] {
        &self.ends
    }

    pub fn len(&self) -> usize {
        self.squares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.squares.is_empty()
    }

    fn find(&self, pt: PieceType, sq: Square) -> Option<usize> {
        self.slice(pt).iter().position(|&s| s == sq).map(|i| i + self.start(pt))
    }

    /// Updates the stored square of one piece, leaving its slot in place.
    pub fn relocate(&mut self, pt: PieceType, from: Square, to: Square) {
        let Some(idx) = self.find(pt, from) else {
            debug_assert!(false, "no {pt} on {from} to move to {to}: {self:?}");
            return;
        };
        self.squares[idx] = to;
    }

    /// Removes a square from the run of `pt`.
    pub fn capture(&mut self, pt: PieceType, sq: Square) {
        let Some(idx) = self.find(pt, sq) else {
            debug_assert!(false, "no {pt} on {sq} to capture: {self:?}");
            return;
        };
        self.squares.remove(idx);
        for end in &mut self.ends[pt.index()..] {
            *end -= 1;
        }
    }

    /// Inserts a square at the end of the run of `pt`. This is the inverse of
    /// `capture`, and also how the index is populated.
    pub fn reanimate(&mut self, pt: PieceType, sq: Square) {
        debug_assert!(
            !self.squares.is_full(),
            "no room to place a {pt} on {sq}: {self:?}"
        );
        let at = self.ends[pt] as usize;
        self.squares.insert(at, sq);
        for end in &mut self.ends[pt.index()..] {
            *end += 1;
        }
    }

    /// Moves the pawn on `sq` into the run of `to`.
    pub fn promote(&mut self, sq: Square, to: PieceType) {
        let Some(idx) = self.find(PieceType::Pawn, sq) else {
            debug_assert!(false, "no pawn on {sq} to promote: {self:?}");
            return;
        };
        let target = self.ends[to] as usize;
        // everything between the end of the promoted-to run and the pawn
        // shifts up one slot, which lands the pawn's square at `target`.
        self.squares[target..=idx].rotate_right(1);
        for end in &mut self.ends[to.index()..PieceType::Pawn.index()] {
            *end += 1;
        }
    }

    /// Moves the `from` piece on `sq` back into the pawn run.
    pub fn demote(&mut self, sq: Square, from: PieceType) {
        let Some(idx) = self.find(from, sq) else {
            debug_assert!(false, "no {from} on {sq} to demote: {self:?}");
            return;
        };
        let target = self.ends[PieceType::Rook] as usize - 1;
        self.squares[idx..=target].rotate_left(1);
        for end in &mut self.ends[from.index()..PieceType::Pawn.index()] {
            *end -= 1;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (PieceType, Square)> + '_ {
        PieceType::all().flat_map(move |pt| self.slice(pt).iter().map(move |&sq| (pt, sq)))
    }
}

/// Two indices are equal when every run holds the same squares. The order of
/// squares within a run is not significant: capturing and reanimating a
/// piece may leave it in a different slot of its run.
impl PartialEq for TeamPositions {
    fn eq(&self, other: &Self) -> bool {
        self.ends == other.ends
            && PieceType::all().all(|pt| {
                let theirs = other.slice(pt);
                self.slice(pt).iter().all(|sq| theirs.contains(sq))
            })
    }
}

impl Eq for TeamPositions {}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PositionIndex {
    teams: [TeamPositions; 2],
}

impl PositionIndex {
    pub fn from_grid(grid: &Grid) -> Self {
        let mut out = Self::default();
        for sq in Square::all() {
            if let Some(piece) = grid.read(sq) {
                out.teams[piece.colour()].reanimate(piece.piece_type(), sq);
            }
        }
        out
    }

    pub const fn team(&self, colour: Colour) -> &TeamPositions {
        &self.teams[colour.index()]
    }

    pub fn slice(&self, colour: Colour, pt: PieceType) -> &[Square] {
        self.teams[colour].slice(pt)
    }

    pub fn amount(&self, colour: Colour, pt: PieceType) -> usize {
        self.slice(colour, pt).len()
    }

    pub fn has(&self, colour: Colour, pt: PieceType) -> bool {
        !self.slice(colour, pt).is_empty()
    }

    pub fn king_square(&self, colour: Colour) -> Option<Square> {
        self.slice(colour, PieceType::King).first().copied()
    }

    /// Iterates over every piece of `colour` and its square.
    pub fn pieces(&self, colour: Colour) -> impl Iterator<Item = (Piece, Square)> + '_ {
        self.teams[colour].iter().map(move |(pt, sq)| (Piece::new(colour, pt), sq))
    }

    pub fn move_piece(&mut self, m: Move, captured: Option<Piece>, ep_victim: Option<Square>) {
        let us = m.piece.colour();
        let team = &mut self.teams[us];
        team.relocate(m.piece.piece_type(), m.from, m.to);
        if let Some((rook_from, rook_to)) = m.castling_rook_squares() {
            team.relocate(PieceType::Rook, rook_from, rook_to);
        }

        if let Some(victim) = captured {
            let sq = match ep_victim {
                Some(sq) if m.is_ep() => sq,
                _ => m.to,
            };
            self.teams[!us].capture(victim.piece_type(), sq);
        }

        if let Some(promo) = m.promotion {
            self.teams[us].promote(m.to, promo);
        }
    }

    pub fn undo_move(&mut self, executed: &ExecutedMove) {
        let m = executed.mv;
        let us = m.piece.colour();
        let team = &mut self.teams[us];

        if let Some(promo) = m.promotion {
            team.demote(m.to, promo);
        }
        team.relocate(m.piece.piece_type(), m.to, m.from);
        if let Some((rook_from, rook_to)) = m.castling_rook_squares() {
            team.relocate(PieceType::Rook, rook_to, rook_from);
        }

        if let Some(victim) = executed.captured {
            let sq = if m.is_ep() {
                executed.extra.passantable_piece_square().unwrap_or(m.to)
            } else {
                m.to
            };
            self.teams[!us].reanimate(victim.piece_type(), sq);
        }
    }
}
