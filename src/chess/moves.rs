//! Contains structures to represent moves and their coordinate notation
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fmt;
use std::str::FromStr;
use lazy_static::lazy_static;
use regex::Regex;
use super::*;

lazy_static! {
    static ref MOVE_TOKEN: Regex =
        Regex::new(r"^([a-h][1-8])([a-h][1-8])([qrbn])?$").expect("INFALLIBLE");
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Which piece to promote to for a promotion move
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Promotion {
    ToKnight,
    ToBishop,
    ToRook,
    ToQueen,
}

use Promotion::*;

impl Promotion {
    /// All promotions, in the order the move generators emit them
    pub const ALL: [Promotion; 4] = [ToQueen, ToRook, ToBishop, ToKnight];

    /// Returns the lowercase letter used in move tokens
    pub fn to_char(self) -> char {
        match self {
            ToKnight => 'n',
            ToBishop => 'b',
            ToRook => 'r',
            ToQueen => 'q',
        }
    }

    /// Decodes a lowercase promotion letter
    pub fn from_char(c: char) -> Option<Promotion> {
        match c {
            'n' => Some(ToKnight),
            'b' => Some(ToBishop),
            'r' => Some(ToRook),
            'q' => Some(ToQueen),
            _ => None,
        }
    }
}

impl Default for Promotion {
    fn default() -> Self {
        ToQueen
    }
}

impl From<Promotion> for Piece {
    fn from(prom: Promotion) -> Self {
        match prom {
            ToKnight => Piece::Knight,
            ToBishop => Piece::Bishop,
            ToRook => Piece::Rook,
            ToQueen => Piece::Queen,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A move from one square to another, with an optional promotion piece.
///
/// A `Move` is plain data. It is not tied to a position and says nothing about whether it is legal
/// anywhere. Its text form is coordinate notation, as used by UCI: `e2e4`, or `b7c8q` for a
/// promotion.
///
/// ```
/// use magpie::chess::{Move, Promotion, Square};
///
/// let mv: Move = "b7c8q".parse().expect("valid token");
/// assert_eq!(mv.origin(), Square::B7);
/// assert_eq!(mv.destination(), Square::C8);
/// assert_eq!(mv.promotion(), Some(Promotion::ToQueen));
/// assert_eq!(mv.to_string(), "b7c8q");
///
/// assert!("b7c8k".parse::<Move>().is_err());
/// assert!("e2-e4".parse::<Move>().is_err());
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    orig: Square,
    dest: Square,
    promotion: Option<Promotion>,
}

impl Move {
    /// Creates a move without promotion
    pub fn new(orig: Square, dest: Square) -> Move {
        Move { orig, dest, promotion: None }
    }

    /// Creates a promotion move
    pub fn with_promotion(orig: Square, dest: Square, promotion: Promotion) -> Move {
        Move { orig, dest, promotion: Some(promotion) }
    }

    /// Returns the origin of the moved piece.
    pub fn origin(&self) -> Square {
        self.orig
    }

    /// Returns the destination of the moved piece.
    pub fn destination(&self) -> Square {
        self.dest
    }

    /// Returns the type of promotion, if any
    pub fn promotion(&self) -> Option<Promotion> {
        self.promotion
    }

    /// Returns `true` if the move is a promotion.
    pub fn is_promotion(&self) -> bool {
        self.promotion.is_some()
    }

    /// Returns the distance between origin and destination in square indices
    pub(crate) fn distance(&self) -> u8 {
        (self.dest as i8 - self.orig as i8).abs() as u8
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.promotion {
            Some(prom) => write!(f, "{}{}{}", self.orig, self.dest, prom.to_char()),
            None => write!(f, "{}{}", self.orig, self.dest),
        }
    }
}

impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseMoveError(s.to_owned());
        let caps = MOVE_TOKEN.captures(s).ok_or_else(err)?;

        let orig = caps[1].parse().map_err(|_| err())?;
        let dest = caps[2].parse().map_err(|_| err())?;
        let promotion = match caps.get(3) {
            Some(m) => {
                let c = m.as_str().chars().next().ok_or_else(err)?;
                Some(Promotion::from_char(c).ok_or_else(err)?)
            },
            None => None,
        };

        Ok(Move { orig, dest, promotion })
    }
}
