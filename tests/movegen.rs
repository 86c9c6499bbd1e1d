//! Magic table lookups and move generation against a plain ray cast
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
use lazy_static::lazy_static;
use magpie::chess::{Bitboard, Move, Position, RookMagics, Square};
use magpie::chess::bitboard::magic::{self, DEFAULT_MAX_ATTEMPTS};

lazy_static! {
    static ref MAGICS: RookMagics =
        RookMagics::build_seeded(20_200_522, DEFAULT_MAX_ATTEMPTS).expect("magics should be found");
}

fn tokens(moves: &[Move]) -> Vec<String> {
    let mut tokens: Vec<String> = moves.iter().map(|m| m.to_string()).collect();
    tokens.sort();
    tokens
}

#[test]
fn every_variation_of_every_square_matches_the_ray_cast() {
    for sq in Square::all() {
        let entry = MAGICS.entry(sq);
        assert_eq!(entry.mask(), magic::relevant_mask(sq));
        for occ in magic::occupancy_variations(entry.mask()) {
            assert_eq!(MAGICS.attacks(sq, occ), magic::rook_attacks(sq, occ), "{} {}", sq, occ);
        }
    }
}

#[test]
fn pieces_outside_the_mask_do_not_matter() {
    let edges = Bitboard::from(0xff81_8181_8181_81ffu64);
    for sq in Square::all() {
        let inner = Bitboard::from(0x0000_2400_0042_0000u64);
        let occ = inner | (edges & !Bitboard::from(sq));
        assert_eq!(MAGICS.attacks(sq, occ), magic::rook_attacks(sq, occ), "{}", sq);
        assert_eq!(MAGICS.attacks(sq, occ & MAGICS.entry(sq).mask()), MAGICS.attacks(sq, occ));
    }
}

#[test]
fn rook_in_the_corner_of_an_empty_board() {
    let pos: Position = "8/8/8/8/8/8/8/R7 w - -".parse().unwrap();
    let moves = pos.rook_moves(&MAGICS);
    assert_eq!(moves.len(), 14);
    assert!(moves.iter().all(|m| m.origin() == Square::A1));
    assert!(moves.contains(&Move::new(Square::A1, Square::A8)));
    assert!(moves.contains(&Move::new(Square::A1, Square::H1)));
}

#[test]
fn enemy_blockers_are_captured_and_friendly_blockers_are_not() {
    let pos: Position = "8/8/8/8/8/8/8/R2n1K2 w - -".parse().unwrap();
    assert_eq!(tokens(&pos.rook_moves(&MAGICS)),
        ["a1a2", "a1a3", "a1a4", "a1a5", "a1a6", "a1a7", "a1a8", "a1b1", "a1c1", "a1d1"]);

    let pos: Position = "8/8/8/8/8/8/8/R2N1k2 w - -".parse().unwrap();
    assert_eq!(tokens(&pos.rook_moves(&MAGICS)),
        ["a1a2", "a1a3", "a1a4", "a1a5", "a1a6", "a1a7", "a1a8", "a1b1", "a1c1"]);
}

#[test]
fn rook_moves_belong_to_the_side_to_move() {
    let pos: Position = "r3k3/8/8/8/8/8/8/R3K3 b - -".parse().unwrap();
    let moves = pos.rook_moves(&MAGICS);
    assert_eq!(moves.len(), 10);
    assert!(moves.iter().all(|m| m.origin() == Square::A8));
    assert!(moves.contains(&Move::new(Square::A8, Square::A1)));
}

#[test]
fn start_position_moves() {
    let mut pos = Position::new();
    let white = pos.pseudo_legal_moves(&MAGICS);
    assert_eq!(white.len(), 16);
    assert_eq!(white, pos.white_pawn_moves());

    pos.apply_move_str("a2a4").unwrap();
    let black = pos.pseudo_legal_moves(&MAGICS);
    assert_eq!(black.len(), 16);
    assert_eq!(black, pos.black_pawn_moves());
}

#[test]
fn generated_moves_can_be_applied() {
    let mut pos: Position = "r3k2r/1P4P1/8/2pP4/8/8/P6P/R3K2R w KQkq c6".parse().unwrap();
    for _ in 0..6 {
        let moves = pos.pseudo_legal_moves(&MAGICS);
        assert!(!moves.is_empty());
        for &mv in moves.iter() {
            let mut next = pos.clone();
            next.apply_move(mv).unwrap_or_else(|err| panic!("{} in {}: {}", mv, pos, err));
            assert!(next.is_consistent(), "{} in {}", mv, pos);
            assert_ne!(next.turn(), pos.turn());
        }
        pos.apply_move(moves[0]).unwrap();
    }
}
