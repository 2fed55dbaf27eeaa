use thiserror::Error;

use crate::chess::{piece::Colour, types::Rank};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveParseError {
    #[error("Invalid move length {0}")]
    InvalidLength(usize),
    #[error("Invalid from-square file {0}")]
    InvalidFromSquareFile(char),
    #[error("Invalid from-square rank {0}")]
    InvalidFromSquareRank(char),
    #[error("Invalid to-square file {0}")]
    InvalidToSquareFile(char),
    #[error("Invalid to-square rank {0}")]
    InvalidToSquareRank(char),
    #[error("Invalid promotion piece {0}")]
    InvalidPromotionPiece(char),
    #[error("Illegal move {0}")]
    IllegalMove(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FenParseError {
    #[error("FEN string is missing the board field")]
    MissingBoard,
    #[error("FEN string is missing the side to move")]
    MissingSide,
    #[error("FEN string is missing the castling field")]
    MissingCastling,
    #[error("FEN string is missing the en passant field")]
    MissingEnPassant,
    #[error("FEN string is missing the halfmove clock")]
    MissingHalfmoveClock,
    #[error("FEN string is missing the fullmove number")]
    MissingFullmoveNumber,
    #[error("expected 8 board segments, got {0}")]
    BoardSegments(usize),
    #[error("two adjacent digits in a board segment")]
    AdjacentDigits,
    #[error("a board segment doesn't describe exactly 8 squares")]
    BadSquaresInSegment,
    #[error("unexpected character '{0}' in board")]
    UnexpectedCharacter(char),
    #[error("pawns on the first or eighth rank")]
    PawnsOnBackranks,
    #[error("{colour} has no king")]
    MissingKing { colour: Colour },
    #[error("{colour} has more than one king")]
    DuplicateKings { colour: Colour },
    #[error("{colour} has more than 16 pieces")]
    TooManyPieces { colour: Colour },
    #[error("invalid side to move \"{0}\"")]
    InvalidSide(String),
    #[error("invalid castling field \"{0}\"")]
    InvalidCastling(String),
    #[error("castling field \"{castling}\" needs the {colour} king and rook at home")]
    CastlingWithoutPieces { colour: Colour, castling: String },
    #[error("invalid en passant square \"{0}\"")]
    InvalidEnPassant(String),
    #[error("en passant square {square} should be on rank {expected:?}, not {got:?}")]
    InvalidEnPassantRank {
        square: String,
        expected: Rank,
        got: Rank,
    },
    #[error("en passant square {0} has no pawn in front of it")]
    EnPassantWithoutPawn(String),
    #[error("invalid halfmove clock \"{0}\"")]
    InvalidHalfmoveClock(String),
    #[error("halfmove clock {0} is larger than 100")]
    HalfmoveClockTooLarge(u8),
    #[error("invalid fullmove number \"{0}\"")]
    InvalidFullmoveNumber(String),
    #[error("fullmove number is zero")]
    FullmoveNumberZero,
    #[error("fullmove number {0} is too large")]
    FullmoveNumberTooLarge(usize),
    #[error("unexpected tokens after the fullmove number")]
    ExtraTokens,
    #[error("the side that just moved is in check")]
    WaitingInCheck,
}

pub type PositionValidityError = String;
