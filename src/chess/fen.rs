use std::{num::NonZeroUsize, str::SplitWhitespace};

use arrayvec::ArrayVec;

use crate::{
    chess::{
        board::positions::MAX_TEAM_PIECES,
        piece::{Colour, Piece, PieceType},
        types::{CastlingRights, File, Rank, Square},
    },
    errors::FenParseError,
};

/// A parsed FEN representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fen {
    pub board: [Option<Piece>; 64],
    pub turn: Colour,
    pub castling: CastlingRights,
    pub ep: Option<Square>,
    pub halfmove: u8,
    pub fullmove: NonZeroUsize,
}

impl Fen {
    const DEFAULT_FULL_MOVE: NonZeroUsize = NonZeroUsize::new(1).unwrap();
    /// The largest full-move number accepted from a FEN string.
    pub const MAX_FULL_MOVE: usize = 65_535;

    /// Parse a FEN string in strict mode.
    /// All 6 fields must be present, and no extra tokens are allowed.
    pub fn parse(fen: &str) -> Result<Self, FenParseError> {
        let mut tokens = fen.split_whitespace();
        let result = Self::parse_inner(&mut tokens, true)?;
        if tokens.next().is_some() {
            return Err(FenParseError::ExtraTokens);
        }
        Ok(result)
    }

    /// Parse a FEN string in relaxed mode.
    /// Missing or malformed fields after the board are defaulted to: w, -, -, 0, 1
    /// Extra tokens after the fullmove counter are permitted but ignored.
    pub fn parse_relaxed(fen: &str) -> Result<Self, FenParseError> {
        let mut tokens = fen.split_whitespace();
        Self::parse_inner(&mut tokens, false)
    }

    fn parse_inner(
        tokens: &mut SplitWhitespace<'_>,
        strict: bool,
    ) -> Result<Self, FenParseError> {
        // Field #1: Piece placement
        let board_str = tokens.next().ok_or(FenParseError::MissingBoard)?;
        let board = Self::parse_board(board_str)?;

        // Field #2: Active colour
        let turn = match tokens.next() {
            Some(s) if strict => Self::parse_turn(s)?,
            Some(s) => Self::parse_turn(s).unwrap_or(Colour::White),
            None if strict => return Err(FenParseError::MissingSide),
            None => Colour::White,
        };

        // Field #3: Castling availability
        let castling = match tokens.next() {
            Some(s) if strict => Self::parse_castling(s, &board)?,
            Some(s) => Self::parse_castling(s, &board).unwrap_or_default(),
            None if strict => return Err(FenParseError::MissingCastling),
            None => CastlingRights::default(),
        };

        // Field #4: En passant target square
        let ep = match tokens.next() {
            Some(s) if strict => Self::parse_ep(s, turn, &board)?,
            Some(s) => Self::parse_ep(s, turn, &board).unwrap_or(None),
            None if strict => return Err(FenParseError::MissingEnPassant),
            None => None,
        };

        // Field #5: Halfmove clock
        let halfmove = match tokens.next() {
            Some(s) if strict => Self::parse_halfmove(s)?,
            Some(s) => Self::parse_halfmove(s).unwrap_or(0),
            None if strict => return Err(FenParseError::MissingHalfmoveClock),
            None => 0,
        };

        // Field #6: Fullmove number
        let fullmove = match tokens.next() {
            Some(s) if strict => Self::parse_fullmove(s)?,
            Some(s) => Self::parse_fullmove(s).unwrap_or(Self::DEFAULT_FULL_MOVE),
            None if strict => return Err(FenParseError::MissingFullmoveNumber),
            None => Self::DEFAULT_FULL_MOVE,
        };

        Ok(Self {
            board,
            turn,
            castling,
            ep,
            halfmove,
            fullmove,
        })
    }

    fn parse_board(board_str: &str) -> Result<[Option<Piece>; 64], FenParseError> {
        let mut board = [None; 64];

        let mut rows = ArrayVec::<&str, 8>::new();
        let mut board_parts = board_str.split('/');
        while let Some(segment) = board_parts.next() {
            if rows.try_push(segment).is_err() {
                // 8 successfully parse, plus one now, plus the rest.
                return Err(FenParseError::BoardSegments(8 + 1 + board_parts.count()));
            }
        }
        if rows.len() != 8 {
            return Err(FenParseError::BoardSegments(rows.len()));
        }

        // segments run from the eighth rank down, which is grid row order.
        for (row, segment) in (0u8..).zip(&rows) {
            let mut file = 0u8;
            let mut prev_was_digit = false;

            for c in segment.chars() {
                if let Some(count) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                    if prev_was_digit {
                        return Err(FenParseError::AdjacentDigits);
                    }
                    prev_was_digit = true;
                    #[allow(clippy::cast_possible_truncation)]
                    let count = count as u8;
                    file += count;
                    if file > 8 {
                        return Err(FenParseError::BadSquaresInSegment);
                    }
                } else {
                    let piece =
                        Piece::from_char(c).ok_or(FenParseError::UnexpectedCharacter(c))?;
                    prev_was_digit = false;
                    if file >= 8 {
                        return Err(FenParseError::BadSquaresInSegment);
                    }
                    board[Square::from_row_file(row, file)] = Some(piece);
                    file += 1;
                }
            }

            if file != 8 {
                return Err(FenParseError::BadSquaresInSegment);
            }
        }

        // general correctness validation - misses a lot, but does some nice things.

        // pawns are on sensible squares
        let back_ranks = Rank::Eight.with(File::A).index()..=Rank::Eight.with(File::H).index();
        let front_ranks = Rank::One.with(File::A).index()..=Rank::One.with(File::H).index();
        if back_ranks.chain(front_ranks).any(|i| {
            board[i].is_some_and(|p| p.piece_type() == PieceType::Pawn)
        }) {
            return Err(FenParseError::PawnsOnBackranks);
        }

        for colour in Colour::all() {
            let king = Piece::new(colour, PieceType::King);
            match board.iter().filter(|&&p| p == Some(king)).count() {
                0 => return Err(FenParseError::MissingKing { colour }),
                2.. => return Err(FenParseError::DuplicateKings { colour }),
                1 => (),
            }
            let pieces = board.iter().flatten().filter(|p| p.colour() == colour).count();
            if pieces > MAX_TEAM_PIECES {
                return Err(FenParseError::TooManyPieces { colour });
            }
        }

        Ok(board)
    }

    fn parse_turn(s: &str) -> Result<Colour, FenParseError> {
        match s {
            "w" => Ok(Colour::White),
            "b" => Ok(Colour::Black),
            _ => Err(FenParseError::InvalidSide(s.to_string())),
        }
    }

    fn parse_castling(
        s: &str,
        board: &[Option<Piece>; 64],
    ) -> Result<CastlingRights, FenParseError> {
        let mut rights = CastlingRights::default();
        if s == "-" {
            return Ok(rights);
        }

        for c in s.chars() {
            let (colour, kingside) = match c {
                'K' => (Colour::White, true),
                'Q' => (Colour::White, false),
                'k' => (Colour::Black, true),
                'q' => (Colour::Black, false),
                _ => return Err(FenParseError::InvalidCastling(s.to_string())),
            };

            let rook_home = if kingside {
                CastlingRights::kingside_rook_home(colour)
            } else {
                CastlingRights::queenside_rook_home(colour)
            };
            if board[CastlingRights::king_home(colour)] != Some(Piece::new(colour, PieceType::King))
                || board[rook_home] != Some(Piece::new(colour, PieceType::Rook))
            {
                return Err(FenParseError::CastlingWithoutPieces {
                    colour,
                    castling: s.to_string(),
                });
            }

            if kingside {
                rights.set_kingside(colour);
            } else {
                rights.set_queenside(colour);
            }
        }

        Ok(rights)
    }

    fn parse_ep(
        s: &str,
        turn: Colour,
        board: &[Option<Piece>; 64],
    ) -> Result<Option<Square>, FenParseError> {
        if s == "-" {
            return Ok(None);
        }

        let mut chars = s.chars();
        let (Some(file_char), Some(rank_char), None) = (chars.next(), chars.next(), chars.next())
        else {
            return Err(FenParseError::InvalidEnPassant(s.to_string()));
        };

        let invalid = || FenParseError::InvalidEnPassant(s.to_string());
        let file = File::from_char(file_char).ok_or_else(invalid)?;
        let rank = Rank::from_char(rank_char).ok_or_else(invalid)?;

        // If white to move, ep square must be on rank 6 (black pawn just moved)
        // If black to move, ep square must be on rank 3 (white pawn just moved)
        let expected_rank = match turn {
            Colour::White => Rank::Six,
            Colour::Black => Rank::Three,
        };

        if rank != expected_rank {
            return Err(FenParseError::InvalidEnPassantRank {
                square: s.to_string(),
                expected: expected_rank,
                got: rank,
            });
        }

        let shadow = Square::from_rank_file(rank, file);
        let mover = !turn;
        // the pawn that just double-stepped sits one row past the shadow.
        let pawn_sq = shadow.offset(0, mover.pawn_direction());
        if pawn_sq.is_none_or(|sq| board[sq] != Some(Piece::new(mover, PieceType::Pawn))) {
            return Err(FenParseError::EnPassantWithoutPawn(s.to_string()));
        }

        Ok(Some(shadow))
    }

    fn parse_halfmove(s: &str) -> Result<u8, FenParseError> {
        let value: u8 = s
            .parse()
            .map_err(|_| FenParseError::InvalidHalfmoveClock(s.to_string()))?;

        if value > 100 {
            return Err(FenParseError::HalfmoveClockTooLarge(value));
        }

        Ok(value)
    }

    fn parse_fullmove(s: &str) -> Result<NonZeroUsize, FenParseError> {
        let value: usize =
            s.parse().map_err(|_| FenParseError::InvalidFullmoveNumber(s.to_string()))?;

        if value > Self::MAX_FULL_MOVE {
            return Err(FenParseError::FullmoveNumberTooLarge(value));
        }

        NonZeroUsize::new(value).ok_or(FenParseError::FullmoveNumberZero)
    }
}
