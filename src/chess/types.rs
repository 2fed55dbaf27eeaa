use std::{
    fmt::{self, Display},
    mem::size_of,
    ops::{Index, IndexMut},
    str::FromStr,
};

use crate::chess::piece::Colour;

#[derive(PartialEq, Eq, Clone, Copy, PartialOrd, Ord, Hash, Debug)]
#[repr(u8)]
pub enum File {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}

const _FILE_ASSERT: () = assert!(size_of::<File>() == size_of::<Option<File>>());

impl File {
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 8 {
            // SAFETY: inner is less than 8, so it corresponds to a valid enum variant.
            Some(unsafe { std::mem::transmute::<u8, Self>(index) })
        } else {
            None
        }
    }

    pub const fn from_char(c: char) -> Option<Self> {
        if c.is_ascii_lowercase() {
            Self::from_index(c as u8 - b'a')
        } else {
            None
        }
    }

    pub const fn char(self) -> char {
        (b'a' + self as u8) as char
    }

    pub fn all() -> impl DoubleEndedIterator<Item = Self> {
        // SAFETY: all values are within `0..8`.
        (0..8u8).map(|i| unsafe { std::mem::transmute(i) })
    }

    pub const fn with(self, rank: Rank) -> Square {
        Square::from_rank_file(rank, self)
    }
}

#[derive(PartialEq, Eq, Clone, Copy, PartialOrd, Ord, Hash, Debug)]
#[repr(u8)]
pub enum Rank {
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
}

const _RANK_ASSERT: () = assert!(size_of::<Rank>() == size_of::<Option<Rank>>());

impl Rank {
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 8 {
            // SAFETY: inner is less than 8, so it corresponds to a valid enum variant.
            Some(unsafe { std::mem::transmute::<u8, Self>(index) })
        } else {
            None
        }
    }

    pub const fn from_char(c: char) -> Option<Self> {
        if c.is_ascii_digit() && c != '0' {
            Self::from_index(c as u8 - b'1')
        } else {
            None
        }
    }

    pub const fn char(self) -> char {
        (b'1' + self as u8) as char
    }

    /// The grid row holding this rank. Row 0 is the eighth rank.
    pub const fn row(self) -> u8 {
        7 - self as u8
    }

    pub fn all() -> impl DoubleEndedIterator<Item = Self> {
        // SAFETY: all values are within `0..8`.
        (0..8u8).map(|i| unsafe { std::mem::transmute(i) })
    }

    pub const fn with(self, file: File) -> Square {
        Square::from_rank_file(self, file)
    }
}

/// A square of the board.
///
/// Squares are numbered row-major from the top-left corner as the board is
/// printed from white's point of view: `A8` is 0, `H8` is 7, `A1` is 56 and
/// `H1` is 63.
#[rustfmt::skip]
#[derive(PartialEq, Eq, Clone, Copy, PartialOrd, Ord, Hash, Debug, Default)]
#[repr(u8)]
pub enum Square {
    #[default]
    A8, B8, C8, D8, E8, F8, G8, H8,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A1, B1, C1, D1, E1, F1, G1, H1,
}

const _SQUARE_ASSERT: () = assert!(size_of::<Square>() == size_of::<Option<Square>>());

impl<T> Index<Square> for [T; 64] {
    type Output = T;

    fn index(&self, index: Square) -> &Self::Output {
        // SAFETY: the legal values for this type are all in bounds.
        unsafe { self.get_unchecked(index as usize) }
    }
}

impl<T> IndexMut<Square> for [T; 64] {
    fn index_mut(&mut self, index: Square) -> &mut Self::Output {
        // SAFETY: the legal values for this type are all in bounds.
        unsafe { self.get_unchecked_mut(index as usize) }
    }
}

static SQUARE_NAMES: [&str; 64] = [
    "a8", "b8", "c8", "d8", "e8", "f8", "g8", "h8", "a7", "b7", "c7", "d7", "e7", "f7", "g7", "h7",
    "a6", "b6", "c6", "d6", "e6", "f6", "g6", "h6", "a5", "b5", "c5", "d5", "e5", "f5", "g5", "h5",
    "a4", "b4", "c4", "d4", "e4", "f4", "g4", "h4", "a3", "b3", "c3", "d3", "e3", "f3", "g3", "h3",
    "a2", "b2", "c2", "d2", "e2", "f2", "g2", "h2", "a1", "b1", "c1", "d1", "e1", "f1", "g1", "h1",
];

impl Square {
    pub const fn from_rank_file(rank: Rank, file: File) -> Self {
        Self::from_row_file(rank.row(), file as u8)
    }

    /// Builds a square from a grid row and file index, both of which must be
    /// less than 8.
    pub const fn from_row_file(row: u8, file: u8) -> Self {
        match Self::new(row * 8 + file) {
            Some(sq) => sq,
            None => panic!("row or file out of range"),
        }
    }

    pub const fn new(inner: u8) -> Option<Self> {
        if inner < 64 {
            // SAFETY: inner is less than 64, so it corresponds to a valid enum variant.
            Some(unsafe { std::mem::transmute::<u8, Self>(inner) })
        } else {
            None
        }
    }

    pub const fn file(self) -> File {
        // SAFETY: `self as u8` is less than 64, and this operation can only
        // decrease the value, so cannot construct a value >= 8.
        unsafe { std::mem::transmute(self as u8 % 8) }
    }

    /// The grid row of this square. Row 0 is the eighth rank.
    pub const fn row(self) -> u8 {
        self as u8 / 8
    }

    pub const fn rank(self) -> Rank {
        // SAFETY: the row is within `0..8`, so `7 - row` is too.
        unsafe { std::mem::transmute(7 - self.row()) }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn inner(self) -> u8 {
        self as u8
    }

    /// The square `dx` files and `dy` rows away, if it is on the board.
    pub const fn offset(self, dx: i8, dy: i8) -> Option<Self> {
        #![allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
        let x = self.file() as i8 + dx;
        let y = self.row() as i8 + dy;
        if (x | y) & !7 != 0 {
            return None;
        }
        Self::new((y * 8 + x) as u8)
    }

    /// Adds a signed index delta without any wrap-around checks.
    /// The caller guarantees the result is on the board.
    pub const fn shifted(self, delta: i8) -> Self {
        #![allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
        match Self::new((self as i8 + delta) as u8) {
            Some(sq) => sq,
            None => panic!("shifted off the board"),
        }
    }

    pub fn all() -> impl DoubleEndedIterator<Item = Self> {
        // SAFETY: all values are within `0..64`.
        (0..64u8).map(|i| unsafe { std::mem::transmute(i) })
    }
}

impl Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", SQUARE_NAMES[*self])
    }
}

impl FromStr for Square {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SQUARE_NAMES
            .iter()
            .position(|&name| name == s)
            .and_then(|index| -> Option<u8> { index.try_into().ok() })
            .and_then(Self::new)
            .ok_or("Invalid square name")
    }
}

/// The check status of one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    None,
    Check,
    Checkmate,
    Stalemate,
}

/// Four independent castling flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights {
    // [ bq | bk | wq | wk ]
    data: u8,
}

impl CastlingRights {
    pub const WKCA: u8 = 0b0001;
    pub const WQCA: u8 = 0b0010;
    pub const BKCA: u8 = 0b0100;
    pub const BQCA: u8 = 0b1000;

    pub const NONE: Self = Self { data: 0 };
    pub const ALL: Self = Self { data: 0b1111 };

    pub const fn new(wk: bool, wq: bool, bk: bool, bq: bool) -> Self {
        let mut data = 0;
        if wk {
            data |= Self::WKCA;
        }
        if wq {
            data |= Self::WQCA;
        }
        if bk {
            data |= Self::BKCA;
        }
        if bq {
            data |= Self::BQCA;
        }
        Self { data }
    }

    const fn kingside_flag(side: Colour) -> u8 {
        match side {
            Colour::White => Self::WKCA,
            Colour::Black => Self::BKCA,
        }
    }

    const fn queenside_flag(side: Colour) -> u8 {
        match side {
            Colour::White => Self::WQCA,
            Colour::Black => Self::BQCA,
        }
    }

    pub const fn inner(self) -> u8 {
        self.data
    }

    pub const fn is_empty(self) -> bool {
        self.data == 0
    }

    pub const fn kingside(self, side: Colour) -> bool {
        self.data & Self::kingside_flag(side) != 0
    }

    pub const fn queenside(self, side: Colour) -> bool {
        self.data & Self::queenside_flag(side) != 0
    }

    pub fn set_kingside(&mut self, side: Colour) {
        self.data |= Self::kingside_flag(side);
    }

    pub fn set_queenside(&mut self, side: Colour) {
        self.data |= Self::queenside_flag(side);
    }

    pub fn clear_kingside(&mut self, side: Colour) {
        self.data &= !Self::kingside_flag(side);
    }

    pub fn clear_queenside(&mut self, side: Colour) {
        self.data &= !Self::queenside_flag(side);
    }

    pub fn clear(&mut self, side: Colour) {
        self.data &= !(Self::kingside_flag(side) | Self::queenside_flag(side));
    }

    /// Removes every right in `other` from `self`.
    pub fn remove(&mut self, other: Self) {
        self.data &= !other.data;
    }

    /// The rights that depend on a piece standing on `sq`: the home squares
    /// of the four rooks and the two kings.
    pub const fn touching(sq: Square) -> Self {
        let data = match sq {
            Square::H1 => Self::WKCA,
            Square::A1 => Self::WQCA,
            Square::E1 => Self::WKCA | Self::WQCA,
            Square::H8 => Self::BKCA,
            Square::A8 => Self::BQCA,
            Square::E8 => Self::BKCA | Self::BQCA,
            _ => 0,
        };
        Self { data }
    }

    pub const fn king_home(side: Colour) -> Square {
        match side {
            Colour::White => Square::E1,
            Colour::Black => Square::E8,
        }
    }

    pub const fn kingside_rook_home(side: Colour) -> Square {
        match side {
            Colour::White => Square::H1,
            Colour::Black => Square::H8,
        }
    }

    pub const fn queenside_rook_home(side: Colour) -> Square {
        match side {
            Colour::White => Square::A1,
            Colour::Black => Square::A8,
        }
    }
}

impl Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "-");
        }
        for (flag, ch) in [Self::WKCA, Self::WQCA, Self::BKCA, Self::BQCA]
            .into_iter()
            .zip("KQkq".chars())
        {
            if self.data & flag != 0 {
                write!(f, "{ch}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_layout_is_top_left_first() {
        assert_eq!(Square::A8.inner(), 0);
        assert_eq!(Square::H8.inner(), 7);
        assert_eq!(Square::E1.inner(), 60);
        assert_eq!(Square::H1.inner(), 63);
        assert_eq!(Square::E2.row(), 6);
        assert_eq!(Square::E2.rank(), Rank::Two);
        assert_eq!(Square::C7.file(), File::C);
        assert_eq!(Square::from_rank_file(Rank::Four, File::D), Square::D4);
    }

    #[test]
    fn square_names_round_trip() {
        for sq in Square::all() {
            let name = sq.to_string();
            assert_eq!(name.parse::<Square>(), Ok(sq));
            assert_eq!(
                name,
                format!("{}{}", sq.file().char(), sq.rank().char()),
                "name mismatch for {sq:?}"
            );
        }
        assert!("i9".parse::<Square>().is_err());
    }

    #[test]
    fn offsets_stay_on_the_board() {
        assert_eq!(Square::E4.offset(1, -1), Some(Square::F5));
        assert_eq!(Square::A4.offset(-1, 0), None);
        assert_eq!(Square::H4.offset(1, 0), None);
        assert_eq!(Square::E8.offset(0, -1), None);
        assert_eq!(Square::E1.offset(0, 1), None);
        assert_eq!(Square::G1.offset(-2, -1), Some(Square::E2));
    }

    #[test]
    fn castling_flags() {
        let mut rights = CastlingRights::ALL;
        assert!(rights.kingside(Colour::White));
        assert!(rights.queenside(Colour::Black));

        rights.clear_kingside(Colour::White);
        assert!(!rights.kingside(Colour::White));
        assert!(rights.queenside(Colour::White));

        rights.clear(Colour::Black);
        assert!(!rights.kingside(Colour::Black));
        assert!(!rights.queenside(Colour::Black));
        assert_eq!(rights.to_string(), "Q");

        rights.set_kingside(Colour::Black);
        assert_eq!(rights.to_string(), "Qk");
    }

    #[test]
    fn rights_touching_home_squares() {
        let mut rights = CastlingRights::ALL;
        rights.remove(CastlingRights::touching(Square::A8));
        assert_eq!(rights, CastlingRights::new(true, true, true, false));
        rights.remove(CastlingRights::touching(Square::E1));
        assert_eq!(rights, CastlingRights::new(false, false, true, false));
        rights.remove(CastlingRights::touching(Square::D4));
        assert_eq!(rights, CastlingRights::new(false, false, true, false));
        assert_eq!(CastlingRights::NONE.to_string(), "-");
    }
}
