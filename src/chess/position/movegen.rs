//! Pseudo-legal move generation for pawns and rooks
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use super::*;

/// Returns the direction pawns of `color` move in, in ranks
fn forward(color: Color) -> i8 {
    match color {
        White => 1,
        Black => -1,
    }
}

/// Returns the rank double pushes start from, and the farthest rank, for pawns of `color`
fn pawn_ranks(color: Color) -> (Rank, Rank) {
    match color {
        White => (Rank::R2, Rank::R8),
        Black => (Rank::R7, Rank::R1),
    }
}

/// Adds a move from `orig` to each square in `dests`, expanding moves onto `last_rank` into all
/// four promotions
fn push_pawn_moves(moves: &mut Vec<Move>, orig_delta: i8, dests: Bitboard, last_rank: Rank) {
    for dest in dests {
        let orig = match dest.offset(-orig_delta) {
            Some(sq) => sq,
            None => continue,
        };
        if dest.rank() == last_rank {
            for &prom in Promotion::ALL.iter() {
                moves.push(Move::with_promotion(orig, dest, prom));
            }
        } else {
            moves.push(Move::new(orig, dest));
        }
    }
}

impl Position {
    /// Returns the single and double pawn pushes available to `color`, in ascending order of
    /// destination with single pushes first.
    pub fn pawn_pushes(&self, color: Color) -> Vec<Move> {
        let (home_rank, last_rank) = pawn_ranks(color);
        let dy = forward(color);
        let empty = self.empty_squares();
        let pawns = self.occupied_by_piece(color, Pawn);

        let single = pawns.shift_y(dy) & empty;
        let double = (pawns & home_rank.into()).shift_y(dy) & empty;
        let double = double.shift_y(dy) & empty;

        let mut moves = Vec::new();
        push_pawn_moves(&mut moves, 8 * dy, single, last_rank);
        push_pawn_moves(&mut moves, 16 * dy, double, last_rank);
        moves
    }

    /// Returns the pawn captures available to `color`, including en passant, in ascending order of
    /// destination for each diagonal.
    pub fn pawn_captures(&self, color: Color) -> Vec<Move> {
        let (_, last_rank) = pawn_ranks(color);
        let dy = forward(color);
        let targets = self.occupied_by(!color) | self.ep_target;
        let pawns = self.occupied_by_piece(color, Pawn);

        let mut moves = Vec::new();
        for &dx in [-1i8, 1].iter() {
            let dests = pawns.shift_xy(dx, dy) & targets;
            push_pawn_moves(&mut moves, 8 * dy + dx, dests, last_rank);
        }
        moves
    }

    /// Returns the pawn pushes available to white
    pub fn white_pawn_moves(&self) -> Vec<Move> {
        self.pawn_pushes(White)
    }

    /// Returns the pawn pushes available to black
    pub fn black_pawn_moves(&self) -> Vec<Move> {
        self.pawn_pushes(Black)
    }

    /// Returns the pawn captures available to white
    pub fn white_pawn_captures(&self) -> Vec<Move> {
        self.pawn_captures(White)
    }

    /// Returns the pawn captures available to black
    pub fn black_pawn_captures(&self) -> Vec<Move> {
        self.pawn_captures(Black)
    }

    /// Returns the moves of every rook belonging to the side to move.
    ///
    /// ```
    /// use magpie::chess::{Position, RookMagics};
    ///
    /// let magics = RookMagics::build_seeded(7, 10_000_000).expect("tables");
    /// let pos: Position = "4k3/8/8/8/8/8/8/R3K3 w - -".parse().expect("valid position");
    /// assert_eq!(pos.rook_moves(&magics).len(), 10);
    /// ```
    pub fn rook_moves(&self, magics: &RookMagics) -> Vec<Move> {
        let own = self.occupied_by(self.turn);
        let occ = self.occupied();

        let mut moves = Vec::new();
        for orig in self.occupied_by_piece(self.turn, Rook) {
            for dest in magics.attacks(orig, occ) & !own {
                moves.push(Move::new(orig, dest));
            }
        }
        moves
    }

    /// Returns every pawn and rook move for the side to move, without checking whether the king is
    /// left in check. Each of these moves can be passed to `apply_move`.
    pub fn pseudo_legal_moves(&self, magics: &RookMagics) -> Vec<Move> {
        let mut moves = self.pawn_pushes(self.turn);
        moves.extend(self.pawn_captures(self.turn));
        moves.extend(self.rook_moves(magics));
        moves
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(moves: &[Move]) -> Vec<String> {
        moves.iter().map(|m| m.to_string()).collect()
    }

    #[test]
    fn start_position_pushes() {
        let pos = Position::new();
        let white = pos.white_pawn_moves();
        assert_eq!(white.len(), 16);
        assert_eq!(&tokens(&white)[..2], ["a2a3", "b2b3"]);
        assert_eq!(&tokens(&white)[8..10], ["a2a4", "b2b4"]);

        let black = pos.black_pawn_moves();
        assert_eq!(black.len(), 16);
        assert!(tokens(&black).contains(&"e7e5".to_string()));
        assert!(tokens(&black).contains(&"h7h6".to_string()));
        assert!(pos.white_pawn_captures().is_empty());
        assert!(pos.black_pawn_captures().is_empty());
    }

    #[test]
    fn blocked_pawns_do_not_push() {
        let pos: Position = "4k3/8/8/8/8/p7/P1P5/2n1K3 w - -".parse().unwrap();
        assert_eq!(tokens(&pos.white_pawn_moves()), ["c2c3", "c2c4"]);

        let pos: Position = "4k3/8/8/8/8/2n5/P1P5/4K3 w - -".parse().unwrap();
        assert_eq!(tokens(&pos.white_pawn_moves()), ["a2a3", "a2a4"]);

        let pos: Position = "4k3/8/8/8/2N5/8/2P5/4K3 w - -".parse().unwrap();
        assert_eq!(tokens(&pos.white_pawn_moves()), ["c2c3"]);
        assert!(pos.white_pawn_captures().is_empty());

        let pos: Position = "4k3/2p5/8/2n5/8/8/8/4K3 b - -".parse().unwrap();
        assert_eq!(tokens(&pos.black_pawn_moves()), ["c7c6"]);
        assert!(pos.black_pawn_captures().is_empty());

        let pos: Position = "4k3/2p5/2P5/8/8/8/8/4K3 b - -".parse().unwrap();
        assert!(pos.black_pawn_moves().is_empty());
        assert!(pos.black_pawn_captures().is_empty());
        assert!(pos.white_pawn_moves().is_empty());
        assert!(pos.white_pawn_captures().is_empty());
    }

    #[test]
    fn captures_do_not_wrap_around_the_board() {
        let pos: Position = "4k3/8/8/8/8/1p6/P6p/4K3 w - -".parse().unwrap();
        assert_eq!(tokens(&pos.white_pawn_captures()), ["a2b3"]);

        let pos: Position = "4k3/P6p/6P1/8/8/8/8/4K3 b - -".parse().unwrap();
        assert_eq!(tokens(&pos.black_pawn_captures()), ["h7g6"]);
    }

    #[test]
    fn en_passant_target_is_capturable() {
        let pos: Position = "4k3/8/8/3pP3/8/8/8/4K3 w - d6".parse().unwrap();
        assert_eq!(tokens(&pos.white_pawn_captures()), ["e5d6"]);

        let pos: Position = "4k3/8/8/8/3Pp3/8/8/4K3 b - d3".parse().unwrap();
        assert_eq!(tokens(&pos.black_pawn_captures()), ["e4d3"]);
    }

    #[test]
    fn promotions_expand_to_four_moves() {
        let pos: Position = "r3k3/1P6/8/8/8/8/8/4K3 w - -".parse().unwrap();
        assert_eq!(tokens(&pos.white_pawn_moves()), ["b7b8q", "b7b8r", "b7b8b", "b7b8n"]);
        assert_eq!(tokens(&pos.white_pawn_captures()), ["b7a8q", "b7a8r", "b7a8b", "b7a8n"]);

        let pos: Position = "4k3/8/8/8/8/8/3p4/4K3 b - -".parse().unwrap();
        assert_eq!(tokens(&pos.black_pawn_moves()), ["d2d1q", "d2d1r", "d2d1b", "d2d1n"]);
    }

    #[test]
    fn pawn_moves_follow_color() {
        let pos = Position::new();
        assert_eq!(pos.pawn_pushes(White), pos.white_pawn_moves());
        assert_eq!(pos.pawn_pushes(Black), pos.black_pawn_moves());
        assert_eq!(pos.pawn_captures(White), pos.white_pawn_captures());
        assert_eq!(pos.pawn_captures(Black), pos.black_pawn_captures());
    }
}
