//! Provides a representation of sets of squares and the magic tables used for sliding attacks
//
//  Copyright 2019 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
//! # Pawn Advancements and Attacks
//! The advancements and attacks of multiple pawns can be computed simultaneously using the
//! [`Bitboard::shift_y`](struct.Bitboard.html#method.shift_y) and
//! [`Bitboard::shift_xy`](struct.Bitboard.html#method.shift_xy) methods. These methods shift all
//! squares in a `Bitboard` by a specified amount. Squares shifted past rank 1 or rank 8 fall off
//! the board, and `shift_xy` never wraps from one edge file to the other.
//!
//! ```rust
//! use magpie::chess::Square;
//! use magpie::chess::bitboard::Bitboard;
//!
//! let forward = -1; // black's turn, for white this would be 1
//! let pawns = Bitboard::from(Square::A7) | Square::B2.into();
//! let mut destinations = pawns.shift_y(forward);
//! assert_eq!(destinations.pop(), Some(Square::B1));
//! assert_eq!(destinations.pop(), Some(Square::A6));
//! assert_eq!(destinations.pop(), None);
//!
//! // attacks toward queen side
//! // The pawn on a7 is on the far queen-side edge of the board, so it has no attacks on that side.
//! let mut qs_attacks = pawns.shift_xy(-1, forward);
//! assert_eq!(qs_attacks.pop(), Some(Square::A1));
//! assert_eq!(qs_attacks.pop(), None);
//! ```
//!
//! # Sliding Attacks
//! Rook attacks are looked up in precomputed tables hashed by a magic multiplier. See the
//! [`magic`](magic/index.html) module.
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::convert::TryFrom;
use std::iter::FusedIterator;
use std::iter::{FromIterator, Extend};
use std::ops;
use std::fmt;
use super::*;

pub mod magic;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A set of squares with each bit representing one square
///
/// A `Bitboard` is, essentially, a set of [`Square`](../enum.Square.html)s stored in a 64-bit
/// integer. Each bit corresponds to one `Square`. If the bit is set, that `Square` is present. If
/// it is clear, the `Square` is not present. The diagram below shows the layout of the bits.
///
/// ```text
///      a    b    c    d    e    f    g    h
///    ---------------------------------------
/// 8 | 56 | 57 | 58 | 59 | 60 | 61 | 62 | 63 | 8
///    ---------------------------------------
/// 7 | 48 | 49 | 50 | 51 | 52 | 53 | 54 | 55 | 7
///    ---------------------------------------
/// 6 | 40 | 41 | 42 | 43 | 44 | 45 | 46 | 47 | 6
///    ---------------------------------------
/// 5 | 32 | 33 | 34 | 35 | 36 | 37 | 38 | 39 | 5
///    ---------------------------------------
/// 4 | 24 | 25 | 26 | 27 | 28 | 29 | 30 | 31 | 4
///    ---------------------------------------
/// 3 | 16 | 17 | 18 | 19 | 20 | 21 | 22 | 23 | 3
///    ---------------------------------------
/// 2 | 08 | 09 | 10 | 11 | 12 | 13 | 14 | 15 | 2
///    ---------------------------------------
/// 1 | 00 | 01 | 02 | 03 | 04 | 05 | 06 | 07 | 1
///    ---------------------------------------
///      a    b    c    d    e    f    g    h
/// ```
///
/// `Bitboard` implements all the bit-wise logic operators: `|`, `&`, `^`, `!`, `|=`, `&=`, and
/// `^=`. It also has methods that are typical for sets and collections, such as `insert`, `remove`,
/// `len`, and `contains`. It implements IntoIterator, yielding squares from the least significant
/// bit upward.
///
/// The bit-shift operators are not implemented as they wouldn't be well-defined for a
/// 2-dimensional `Bitboard`. Instead, the methods `shift_y` and `shift_xy` are provided.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Hash)]
pub struct Bitboard(u64);

impl Bitboard {
    /// Creates a new, empty bitboard
    pub fn new() -> Bitboard {
        Default::default()
    }

    /// Returns the number of squares in the bitboard
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Returns `true` if the bitboard is empty
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the bitboard contains `sq`
    pub fn contains(self, sq: Square) -> bool {
        !(self & sq.into()).is_empty()
    }

    /// Returns `true` if `self` intersects `other`
    pub fn intersects(self, other: Bitboard) -> bool {
        !(self & other).is_empty()
    }

    /// Returns `true` if `self` does not intersect `other`
    pub fn is_disjoint(self, other: Bitboard) -> bool {
        (self & other).is_empty()
    }

    /// Adds a square to the bitboard if it is not already present
    pub fn insert(&mut self, sq: Square) {
        *self |= sq.into();
    }

    /// Removes a square from the bitboard if it is present
    pub fn remove(&mut self, sq: Square) {
        *self &= !Bitboard::from(sq);
    }

    /// Returns a bitboard containing only the least significant square of `self`
    pub fn lsb(self) -> Bitboard {
        Bitboard(self.0 & self.0.wrapping_neg())
    }

    /// Removes the least significant square from the bitboard and returns it
    pub fn pop(&mut self) -> Option<Square> {
        let sq = self.peek()?;
        // clear the least significant bit
        self.0 &= self.0 - 1;

        Some(sq)
    }

    /// Returns the square that would be removed by a pop command
    pub fn peek(self) -> Option<Square> {
        if self.0 > 0 {
            // get the least significant bit
            Some(Square::try_from(self.0.trailing_zeros() as usize).expect("INFALLIBLE"))
        } else {
            None
        }
    }

    /// Toggles a square in the bitboard
    pub fn toggle(&mut self, sq: Square) {
        *self ^= sq.into();
    }

    /// Returns a bitboard with all squares shifted by `y` ranks
    ///
    /// Squares shifted past the first or last rank are dropped.
    ///
    /// ```rust
    /// # use magpie::chess::Square;
    /// # use magpie::chess::bitboard::Bitboard;
    /// #
    /// assert_eq!(Bitboard::from(Square::E2).shift_y(2), Bitboard::from(Square::E4));
    /// assert!(Bitboard::from(Square::A8).shift_y(1).is_empty());
    /// ```
    pub fn shift_y(self, y: i8) -> Bitboard {
        self.shift(y.saturating_mul(8))
    }

    /// Returns a bitboard with all squares shifted by `x` files and `y` ranks.
    ///
    /// Squares which would cross the a-file/h-file edge are dropped before shifting, so nothing
    /// wraps onto the opposite side of the board.
    ///
    /// ```rust
    /// # use magpie::chess::Square;
    /// # use magpie::chess::bitboard::Bitboard;
    /// #
    /// assert_eq!(Bitboard::from(Square::B2).shift_xy(-1, 1), Bitboard::from(Square::A3));
    /// assert!(Bitboard::from(Square::H2).shift_xy(1, 1).is_empty());
    /// ```
    pub fn shift_xy(self, x: i8, y: i8) -> Bitboard {
        let keep: Bitboard = (0..File::COUNT as i8)
            .filter(|f| (0..File::COUNT as i8).contains(&(f + x)))
            .map(|f| File::try_from(f as usize).expect("INFALLIBLE"))
            .fold(Bitboard::new(), |bb, f| bb | f.into());

        (self & keep).shift(y.saturating_mul(8).saturating_add(x))
    }

    fn shift(self, bits: i8) -> Bitboard {
        if bits >= 0 {
            Bitboard(self.0.checked_shl(bits as u32).unwrap_or(0))
        } else {
            Bitboard(self.0.checked_shr(-(bits as i16) as u32).unwrap_or(0))
        }
    }

    /// Renders the bitboard as an 8x8 grid with rank 8 at the top. Occupied squares are shown as
    /// `1` and empty squares as `.`.
    pub fn diagram(self) -> String {
        let mut s = String::with_capacity(Square::COUNT * 2);

        for r in (0..Rank::COUNT).rev() {
            for f in 0..File::COUNT {
                let sq = Square::try_from(r * File::COUNT + f).expect("INFALLIBLE");
                s.push(if self.contains(sq) { '1' } else { '.' });
                s.push(if f + 1 < File::COUNT { ' ' } else { '\n' });
            }
        }

        s
    }
}

impl ops::Not for Bitboard {
    type Output = Self;

    fn not(self) -> Self::Output {
        Bitboard(!self.0)
    }
}

impl ops::BitAnd for Bitboard {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 & rhs.0)
    }
}

impl ops::BitAndAssign for Bitboard {
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0
    }
}

impl ops::BitOr for Bitboard {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 | rhs.0)
    }
}

impl ops::BitOrAssign for Bitboard {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0
    }
}

impl ops::BitXor for Bitboard {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 ^ rhs.0)
    }
}

impl ops::BitXorAssign for Bitboard {
    fn bitxor_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0
    }
}

impl fmt::Display for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl fmt::UpperHex for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.0, f)
    }
}

impl fmt::LowerHex for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl fmt::Binary for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Binary::fmt(&self.0, f)
    }
}

impl From<u64> for Bitboard {
    fn from(val: u64) -> Bitboard {
        Bitboard(val)
    }
}

impl From<Bitboard> for u64 {
    fn from(bb: Bitboard) -> u64 {
        bb.0
    }
}

impl From<Square> for Bitboard {
    fn from(sq: Square) -> Bitboard {
        Bitboard(1 << sq as u64)
    }
}

impl From<File> for Bitboard {
    fn from(f: File) -> Bitboard {
        Bitboard(0x0101_0101_0101_0101 << f as u64)
    }
}

impl From<Rank> for Bitboard {
    fn from(r: Rank) -> Bitboard {
        Bitboard(0x0000_0000_0000_00ff << (8 * r as u64))
    }
}

impl From<IntoIter> for Bitboard {
    fn from(iter: IntoIter) -> Bitboard {
        iter.0
    }
}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter(self)
    }
}

impl FromIterator<Square> for Bitboard {
    /// If converting from `bitboard::IntoIter`, use `Bitboard::from()` instead as that is faster
    fn from_iter<I: IntoIterator<Item=Square>>(iter: I) -> Self {
        let mut bd = Bitboard::new();

        for sq in iter {
            bd.insert(sq);
        }

        bd
    }
}

impl Extend<Square> for Bitboard {
    fn extend<I: IntoIterator<Item=Square>>(&mut self, iter: I) {
        for sq in iter {
            self.insert(sq);
        }
    }
}

/// Iterator over the squares of a `Bitboard`
#[derive(Debug, Copy, Clone)]
pub struct IntoIter(Bitboard);

impl Iterator for IntoIter {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.pop()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.0.len(), Some(self.0.len()))
    }
}

impl ExactSizeIterator for IntoIter {
    fn len(&self) -> usize {
        self.0.len()
    }
}

impl FusedIterator for IntoIter { }
