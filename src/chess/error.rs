//! Defines the error types needed by the chess module
//
//  Copyright 2019 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fmt;
use super::{Square, Piece};

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Failed to convert an integer to an enumerated type such as `Square`
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TryFromIntError;

impl fmt::Display for TryFromIntError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        "integer out of range".fmt(f)
    }
}

impl std::error::Error for TryFromIntError { }

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Cannot parse a color; expected `w` or `b`
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ParseColorError;

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        "cannot parse color".fmt(f)
    }
}

impl std::error::Error for ParseColorError { }

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Cannot parse a piece type
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ParsePieceError;

impl fmt::Display for ParsePieceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        "cannot parse piece".fmt(f)
    }
}

impl std::error::Error for ParsePieceError { }

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Cannot parse a file; expected `a` through `h`
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ParseFileError;

impl fmt::Display for ParseFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        "cannot parse file".fmt(f)
    }
}

impl std::error::Error for ParseFileError { }

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Cannot parse a rank; expected `1` through `8`
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ParseRankError;

impl fmt::Display for ParseRankError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        "cannot parse rank".fmt(f)
    }
}

impl std::error::Error for ParseRankError { }

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Cannot parse a square; expected `a1` through `h8`
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ParseSquareError;

impl fmt::Display for ParseSquareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        "cannot parse square".fmt(f)
    }
}

impl std::error::Error for ParseSquareError { }

impl From<ParseFileError> for ParseSquareError {
    fn from(_: ParseFileError) -> Self {
        ParseSquareError
    }
}

impl From<ParseRankError> for ParseSquareError {
    fn from(_: ParseRankError) -> Self {
        ParseSquareError
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Cannot parse a move token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMoveError(pub(crate) String);

impl fmt::Display for ParseMoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: invalid move token", self.0)
    }
}

impl std::error::Error for ParseMoveError { }

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Error placing a piece on the board
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SetupError {
    /// The square already holds a piece
    OccupiedSquare(Square),
    /// The piece code is not one of `PNBRQKpnbrqk`
    UnknownPiece(char),
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupError::OccupiedSquare(sq) => write!(f, "{} is already occupied", sq),
            SetupError::UnknownPiece(c) => write!(f, "{}: unknown piece", c),
        }
    }
}

impl std::error::Error for SetupError { }

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Error applying a move to a position
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MakeMoveError {
    /// The move token could not be parsed
    Parse(ParseMoveError),
    /// There is no piece on the origin square
    EmptyOrigin(Square),
    /// The destination holds a piece which cannot be captured by this move
    DestinationOccupied(Square),
    /// Moves for this piece type cannot be applied
    UnsupportedPiece(Piece),
    /// A pawn reached the last rank without a promotion piece
    MissingPromotion,
    /// A promotion piece was given for a move which is not a promotion
    UnexpectedPromotion,
}

impl fmt::Display for MakeMoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use MakeMoveError::*;

        match self {
            Parse(err) => err.fmt(f),
            EmptyOrigin(sq) => write!(f, "no piece on {}", sq),
            DestinationOccupied(sq) => write!(f, "{} is occupied", sq),
            UnsupportedPiece(p) => write!(f, "cannot apply moves for piece {}", p),
            MissingPromotion => "missing promotion piece".fmt(f),
            UnexpectedPromotion => "promotion piece given for a non-promoting move".fmt(f),
        }
    }
}

impl std::error::Error for MakeMoveError { }

impl From<ParseMoveError> for MakeMoveError {
    fn from(err: ParseMoveError) -> Self {
        MakeMoveError::Parse(err)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Error parsing a position from FEN-style text
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum ParseFenError {
    Empty,
    ParseBoard,
    ParseTurn,
    ParseCastling,
    ParseEnPassant,
    ParseHalfMoveClock,
    ParseMoveNumber,
    TooManyFields,
}

impl fmt::Display for ParseFenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ParseFenError::*;

        match self {
            Empty => "empty position string",
            ParseBoard => "cannot parse board",
            ParseTurn => "cannot parse turn",
            ParseCastling => "cannot parse castling flags",
            ParseEnPassant => "cannot parse en passant square",
            ParseHalfMoveClock => "cannot parse half-move clock",
            ParseMoveNumber => "cannot parse move number",
            TooManyFields => "too many fields",
        }.fmt(f)
    }
}

impl std::error::Error for ParseFenError { }

impl From<ParseColorError> for ParseFenError {
    fn from(_: ParseColorError) -> Self {
        ParseFenError::ParseTurn
    }
}

impl From<ParseSquareError> for ParseFenError {
    fn from(_: ParseSquareError) -> Self {
        ParseFenError::ParseEnPassant
    }
}

impl From<SetupError> for ParseFenError {
    fn from(_: SetupError) -> Self {
        ParseFenError::ParseBoard
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Error building magic lookup tables
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MagicError {
    /// No collision-free magic number was found within the attempt limit
    Exhausted {
        /// The square being searched
        square: Square,
        /// The number of relevant occupancy bits for the square
        bits: u32,
        /// The number of candidates tried
        attempts: usize,
    },
}

impl fmt::Display for MagicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MagicError::Exhausted { square, bits, attempts } => write!(f,
                "no magic number found for {} ({} bits) after {} attempts",
                square, bits, attempts),
        }
    }
}

impl std::error::Error for MagicError { }
