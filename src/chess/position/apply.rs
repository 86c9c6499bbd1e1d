//! Applies moves to a `Position`
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use log::debug;
use super::*;

impl Position {
    /// Applies `mv` to the position.
    ///
    /// The piece to move is looked up on the origin square, and its color decides the direction
    /// of pawn moves; the side to move is not checked, but is toggled afterward. Only pawn and rook
    /// moves can be applied. No legality checks are made beyond what is needed to keep the
    /// position self-consistent, and on error the position is left unchanged.
    ///
    /// ```
    /// use magpie::chess::{Color, Position, Square};
    ///
    /// let mut pos = Position::new();
    /// pos.apply_move("e2e4".parse().expect("valid token")).expect("pawn push");
    /// assert_eq!(pos.piece_code_at(Square::E4), Some('P'));
    /// assert_eq!(pos.en_passant_square(), Some(Square::E3));
    /// assert_eq!(pos.turn(), Color::Black);
    /// ```
    pub fn apply_move(&mut self, mv: Move) -> Result<(), MakeMoveError> {
        let orig = mv.origin();
        let (color, piece) = self.piece_at(orig).ok_or(MakeMoveError::EmptyOrigin(orig))?;

        match piece {
            Pawn => self.apply_pawn_move(color, mv)?,
            Rook => self.apply_rook_move(color, mv)?,
            _ => return Err(MakeMoveError::UnsupportedPiece(piece)),
        }

        self.turn = !self.turn;
        debug!("applied {} {}{}: {}", color, piece, mv, self);
        debug_assert!(self.is_consistent());
        Ok(())
    }

    /// Parses a move token such as `e2e4` or `a7a8q` and applies it
    pub fn apply_move_str(&mut self, token: &str) -> Result<(), MakeMoveError> {
        self.apply_move(token.parse()?)
    }

    fn apply_pawn_move(&mut self, color: Color, mv: Move) -> Result<(), MakeMoveError> {
        let (orig, dest) = (mv.origin(), mv.destination());
        let is_push = match mv.distance() {
            8 | 16 => true,
            _ => false,
        };
        let last_rank = match color {
            White => Rank::R8,
            Black => Rank::R1,
        };

        // validate before anything is changed
        match self.piece_at(dest) {
            Some(_) if is_push => return Err(MakeMoveError::DestinationOccupied(dest)),
            Some((c, _)) if c == color => return Err(MakeMoveError::DestinationOccupied(dest)),
            _ => {},
        }
        match (dest.rank() == last_rank, mv.promotion()) {
            (true, None) => return Err(MakeMoveError::MissingPromotion),
            (false, Some(_)) => return Err(MakeMoveError::UnexpectedPromotion),
            _ => {},
        }

        self.lift(orig);

        if !is_push {
            // only an opposing pawn behind the target can be taken en passant
            let passed = match color {
                White => dest.offset(-8),
                Black => dest.offset(8),
            }.filter(|&sq| self.piece_at(sq) == Some((!color, Pawn)));

            let captured = match passed {
                Some(sq) if Bitboard::from(dest) == self.ep_target => self.lift(sq),
                _ => self.lift(dest),
            };
            if captured.is_some() {
                self.revoke_castling_rights(!color, dest);
            }
        }

        let piece = mv.promotion().map(Piece::from).unwrap_or(Pawn);
        self.place(color, piece, dest);

        self.ep_target = match (mv.distance(), color) {
            (16, White) => orig.offset(8).map(Bitboard::from).unwrap_or_default(),
            (16, Black) => orig.offset(-8).map(Bitboard::from).unwrap_or_default(),
            _ => Bitboard::new(),
        };

        Ok(())
    }

    fn apply_rook_move(&mut self, color: Color, mv: Move) -> Result<(), MakeMoveError> {
        let (orig, dest) = (mv.origin(), mv.destination());

        if mv.is_promotion() {
            return Err(MakeMoveError::UnexpectedPromotion);
        }
        if let Some((c, _)) = self.piece_at(dest) {
            if c == color {
                return Err(MakeMoveError::DestinationOccupied(dest));
            }
        }

        self.lift(orig);
        if self.lift(dest).is_some() {
            self.revoke_castling_rights(!color, dest);
        }
        self.place(color, Rook, dest);
        self.revoke_castling_rights(color, orig);
        self.ep_target = Bitboard::new();

        Ok(())
    }

    /// Removes the castling right of `color` tied to the rook starting on `sq`, if `sq` is one of
    /// its home corners
    fn revoke_castling_rights(&mut self, color: Color, sq: Square) {
        match (color, sq) {
            (White, Square::A1) | (Black, Square::A8) => {
                self.castling_rights[color as usize] &= !CASTLE_QUEEN_SIDE;
            },
            (White, Square::H1) | (Black, Square::H8) => {
                self.castling_rights[color as usize] &= !CASTLE_KING_SIDE;
            },
            _ => {},
        }
    }
}
