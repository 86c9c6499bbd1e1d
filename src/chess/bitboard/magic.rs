//! Builds and queries the magic lookup tables used for rook attacks
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
//! A rook's attacks from a square depend only on the pieces standing on its rays, and not even on
//! the last square of each ray, since the rook attacks that square whether it is occupied or not.
//! Those squares form the square's *relevant mask*. Multiplying the masked occupancy by a
//! suitable *magic* number and keeping the top `bits` bits gives a small index into a table
//! holding the precomputed attacks for that occupancy.
//!
//! ```rust
//! use magpie::chess::Square;
//! use magpie::chess::bitboard::Bitboard;
//! use magpie::chess::bitboard::magic::{RookMagics, rook_attacks};
//!
//! let magics = RookMagics::build_seeded(7, 10_000_000).expect("magics");
//! let occ = Bitboard::from(Square::A2) | Square::C1.into();
//! assert_eq!(magics.attacks(Square::A1, occ), rook_attacks(Square::A1, occ));
//!
//! let mut attacks = magics.attacks(Square::A1, occ);
//! assert_eq!(attacks.pop(), Some(Square::B1));
//! assert_eq!(attacks.pop(), Some(Square::C1));
//! assert_eq!(attacks.pop(), Some(Square::A2));
//! assert_eq!(attacks.pop(), None);
//! ```
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::convert::TryFrom;
use log::{error, info, trace};
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use crate::chess::{File, Rank, Square};
use crate::chess::error::MagicError;
use super::Bitboard;

/// The default number of candidates tried per square before giving up
pub const DEFAULT_MAX_ATTEMPTS: usize = 10_000_000;

const DIRECTIONS: [(i8, i8); 4] = [(0, 1), (0, -1), (-1, 0), (1, 0)];

/// Walks from `sq` in direction `(dx, dy)`, yielding each square until the edge of the board
fn ray(sq: Square, (dx, dy): (i8, i8)) -> impl Iterator<Item = Square> {
    let (mut f, mut r) = (sq.file() as i8, sq.rank() as i8);

    std::iter::from_fn(move || {
        f += dx;
        r += dy;
        match (File::try_from(f as usize), Rank::try_from(r as usize)) {
            (Ok(file), Ok(rank)) if f >= 0 && r >= 0 => Some(Square::from_coord(file, rank)),
            _ => None,
        }
    })
}

/// Returns the squares whose occupancy can change a rook's attacks from `sq`.
///
/// The last square of each ray is excluded, as is `sq` itself.
pub fn relevant_mask(sq: Square) -> Bitboard {
    let mut mask = Bitboard::new();

    for &dir in DIRECTIONS.iter() {
        let squares: Vec<_> = ray(sq, dir).collect();
        if let Some((_edge, inner)) = squares.split_last() {
            mask.extend(inner.iter().copied());
        }
    }

    mask
}

/// Returns the number of squares in the relevant mask for `sq`
pub fn relevant_bits(sq: Square) -> u32 {
    relevant_mask(sq).len() as u32
}

/// Enumerates every subset of `mask`.
///
/// Entry `i` of the result holds the squares of `mask` selected by the set bits of `i`, with bit
/// 0 of `i` selecting the lowest square of `mask`.
pub fn occupancy_variations(mask: Bitboard) -> Vec<Bitboard> {
    let squares: Vec<Square> = mask.into_iter().collect();

    (0..1usize << squares.len())
        .map(|i| {
            squares.iter()
                .enumerate()
                .filter(|(j, _)| (i >> j) & 1 == 1)
                .map(|(_, &sq)| sq)
                .collect()
        })
        .collect()
}

/// Computes rook attacks from `sq` by ray casting through `occ`.
///
/// Each ray includes the first occupied square it meets and stops there. This is slow and is
/// meant for filling and checking the magic tables, not for move generation.
pub fn rook_attacks(sq: Square, occ: Bitboard) -> Bitboard {
    let mut attacks = Bitboard::new();

    for &dir in DIRECTIONS.iter() {
        for target in ray(sq, dir) {
            attacks.insert(target);
            if occ.contains(target) {
                break;
            }
        }
    }

    attacks
}

/// Hashes an occupancy into a table index
#[inline]
pub fn magic_index(occ: Bitboard, magic: u64, bits: u32) -> usize {
    u64::from(occ).wrapping_mul(magic).checked_shr(64 - bits).unwrap_or(0) as usize
}

/// Searches for a magic number for `sq` with a table of `2^bits` entries.
///
/// Candidates are the bitwise and of three random numbers, which keeps them sparse. A candidate
/// is accepted when any two occupancies sharing an index also share the same attacks.
pub fn find_magic<R: Rng>(
    sq: Square,
    bits: u32,
    rng: &mut R,
    max_attempts: usize,
) -> Result<u64, MagicError> {
    let variations = occupancy_variations(relevant_mask(sq));
    let attacks: Vec<_> = variations.iter().map(|&occ| rook_attacks(sq, occ)).collect();

    // each slot remembers the attempt that last wrote it, so the table is never cleared
    let mut used = vec![(0usize, Bitboard::new()); 1 << bits];

    for attempt in 1..=max_attempts {
        let candidate = rng.gen::<u64>() & rng.gen::<u64>() & rng.gen::<u64>();

        let ok = variations.iter().zip(attacks.iter()).all(|(&occ, &att)| {
            let slot = &mut used[magic_index(occ, candidate, bits)];
            if slot.0 != attempt {
                *slot = (attempt, att);
                true
            } else {
                slot.1 == att
            }
        });

        if ok {
            trace!("magic for {}: {:#018x} after {} attempts", sq, candidate, attempt);
            return Ok(candidate);
        }
    }

    error!("no magic number found for {} ({} bits) after {} attempts", sq, bits, max_attempts);
    Err(MagicError::Exhausted { square: sq, bits, attempts: max_attempts })
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// The magic lookup data for one square
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MagicEntry {
    mask: Bitboard,
    magic: u64,
    bits: u32,
    attacks: Box<[Bitboard]>,
}

impl MagicEntry {
    /// Finds a magic number for `sq` and fills its attack table
    fn build<R: Rng>(sq: Square, rng: &mut R, max_attempts: usize) -> Result<Self, MagicError> {
        let mask = relevant_mask(sq);
        let bits = mask.len() as u32;
        let magic = find_magic(sq, bits, rng, max_attempts)?;

        let mut attacks = vec![Bitboard::new(); 1 << bits].into_boxed_slice();
        for occ in occupancy_variations(mask) {
            attacks[magic_index(occ, magic, bits)] = rook_attacks(sq, occ);
        }

        Ok(MagicEntry { mask, magic, bits, attacks })
    }

    /// Returns the relevant occupancy mask
    pub fn mask(&self) -> Bitboard {
        self.mask
    }

    /// Returns the magic multiplier
    pub fn magic(&self) -> u64 {
        self.magic
    }

    /// Returns the number of relevant bits, so the table has `2^bits` entries
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Returns the attack table
    pub fn table(&self) -> &[Bitboard] {
        &self.attacks
    }

    /// Looks up the attacks for the given board occupancy
    #[inline]
    pub fn attacks(&self, occ: Bitboard) -> Bitboard {
        self.attacks[magic_index(occ & self.mask, self.magic, self.bits)]
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Magic lookup tables for rook attacks on all 64 squares.
///
/// The tables never change once built, so a single instance can be shared by reference between
/// any number of readers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RookMagics {
    entries: Vec<MagicEntry>,
}

impl RookMagics {
    /// Builds the tables using the thread-local random number generator
    pub fn build() -> Result<RookMagics, MagicError> {
        Self::build_with(&mut rand::thread_rng(), DEFAULT_MAX_ATTEMPTS, |_, _| {})
    }

    /// Builds the tables from a seeded generator, so the same seed gives the same magics
    pub fn build_seeded(seed: u64, max_attempts: usize) -> Result<RookMagics, MagicError> {
        Self::build_with(&mut StdRng::seed_from_u64(seed), max_attempts, |_, _| {})
    }

    /// Builds the tables, calling `progress` as each square is finished
    pub fn build_with<R, F>(rng: &mut R, max_attempts: usize, mut progress: F)
        -> Result<RookMagics, MagicError>
    where
        R: Rng,
        F: FnMut(Square, &MagicEntry),
    {
        let mut entries = Vec::with_capacity(Square::COUNT);

        for sq in Square::all() {
            let entry = MagicEntry::build(sq, rng, max_attempts)?;
            progress(sq, &entry);
            entries.push(entry);
        }

        info!("rook magic tables built: {} entries",
            entries.iter().map(|e| e.attacks.len()).sum::<usize>());

        Ok(RookMagics { entries })
    }

    /// Returns the lookup data for `sq`
    pub fn entry(&self, sq: Square) -> &MagicEntry {
        &self.entries[sq as usize]
    }

    /// Looks up rook attacks from `sq` given the board occupancy `occ`
    #[inline]
    pub fn attacks(&self, sq: Square, occ: Bitboard) -> Bitboard {
        self.entry(sq).attacks(occ)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazy_static::lazy_static;

    lazy_static! {
        static ref MAGICS: RookMagics = RookMagics::build_seeded(0x5eed, DEFAULT_MAX_ATTEMPTS)
            .expect("magic search failed");
    }

    #[test]
    fn relevant_mask_excludes_edges() {
        let a1 = relevant_mask(Square::A1);
        assert_eq!(a1.len(), 12);
        assert!(a1.contains(Square::A2));
        assert!(a1.contains(Square::A7));
        assert!(!a1.contains(Square::A8));
        assert!(a1.contains(Square::G1));
        assert!(!a1.contains(Square::H1));
        assert!(!a1.contains(Square::A1));

        let d4 = relevant_mask(Square::D4);
        assert_eq!(d4.len(), 10);
        assert!(!d4.contains(Square::D1));
        assert!(!d4.contains(Square::D8));
        assert!(!d4.contains(Square::A4));
        assert!(!d4.contains(Square::H4));
    }

    #[test]
    fn relevant_bits_per_square() {
        let corners = [Square::A1, Square::H1, Square::A8, Square::H8];
        for sq in Square::all() {
            let edge_file = sq.file() == File::A || sq.file() == File::H;
            let edge_rank = sq.rank() == Rank::R1 || sq.rank() == Rank::R8;
            let expected = if corners.contains(&sq) {
                12
            } else if edge_file || edge_rank {
                11
            } else {
                10
            };
            assert_eq!(relevant_bits(sq), expected, "{}", sq);
        }
    }

    #[test]
    fn variations_cover_all_subsets() {
        let mask = Bitboard::from(Square::B2) | Square::C5.into() | Square::G7.into();
        let variations = occupancy_variations(mask);
        assert_eq!(variations.len(), 8);
        assert_eq!(variations[0], Bitboard::new());
        assert_eq!(variations[1], Bitboard::from(Square::B2));
        assert_eq!(variations[7], mask);
        for v in variations.iter() {
            assert!((*v & !mask).is_empty());
        }
        let mut sorted = variations.clone();
        sorted.sort_by_key(|bb| u64::from(*bb));
        sorted.dedup();
        assert_eq!(sorted.len(), 8);

        assert_eq!(occupancy_variations(Bitboard::new()), vec![Bitboard::new()]);
    }

    #[test]
    fn ray_cast_stops_at_first_blocker() {
        let occ = Bitboard::from(Square::D6) | Square::F4.into() | Square::D7.into();
        let attacks = rook_attacks(Square::D4, occ);
        assert!(attacks.contains(Square::D5));
        assert!(attacks.contains(Square::D6));
        assert!(!attacks.contains(Square::D7));
        assert!(attacks.contains(Square::F4));
        assert!(!attacks.contains(Square::G4));
        assert!(attacks.contains(Square::A4));
        assert!(attacks.contains(Square::D1));
        assert!(!attacks.contains(Square::D4));
        assert_eq!(attacks.len(), 3 + 2 + 2 + 3);
    }

    #[test]
    fn empty_board_attacks_whole_file_and_rank() {
        for sq in Square::all() {
            let expected = (Bitboard::from(sq.file()) | sq.rank().into()) & !Bitboard::from(sq);
            assert_eq!(rook_attacks(sq, Bitboard::new()), expected);
            assert_eq!(MAGICS.attacks(sq, Bitboard::new()), expected);
        }
    }

    #[test]
    fn tables_are_sized_by_relevant_bits() {
        for sq in Square::all() {
            let entry = MAGICS.entry(sq);
            assert_eq!(entry.mask(), relevant_mask(sq));
            assert_eq!(entry.bits(), relevant_bits(sq));
            assert_eq!(entry.table().len(), 1 << entry.bits());
        }
    }

    #[test]
    fn found_magic_has_no_harmful_collisions() {
        let sq = Square::E4;
        let bits = relevant_bits(sq);
        let magic = find_magic(sq, bits, &mut StdRng::seed_from_u64(3), DEFAULT_MAX_ATTEMPTS)
            .expect("magic search failed");

        let mut seen = std::collections::HashMap::new();
        for occ in occupancy_variations(relevant_mask(sq)) {
            let attacks = rook_attacks(sq, occ);
            let prev = *seen.entry(magic_index(occ, magic, bits)).or_insert(attacks);
            assert_eq!(prev, attacks);
        }
    }

    #[test]
    fn exhausted_search_is_an_error() {
        // a single-slot table cannot separate the different attack sets of a corner rook
        let result = find_magic(Square::A1, 1, &mut StdRng::seed_from_u64(1), 100);
        assert_eq!(result, Err(MagicError::Exhausted { square: Square::A1, bits: 1, attempts: 100 }));
    }

    #[test]
    fn same_seed_same_magics() {
        let again = RookMagics::build_seeded(0x5eed, DEFAULT_MAX_ATTEMPTS)
            .expect("magic search failed");
        assert_eq!(*MAGICS, again);
    }

    #[test]
    fn progress_is_reported_for_every_square() {
        let mut reported = Vec::new();
        RookMagics::build_with(&mut StdRng::seed_from_u64(11), DEFAULT_MAX_ATTEMPTS, |sq, entry| {
            assert_eq!(entry.bits(), relevant_bits(sq));
            reported.push(sq);
        }).expect("magic search failed");
        assert_eq!(reported, Square::all().collect::<Vec<_>>());
    }
}
