//! Contains structures related to the `Position`
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;
use super::*;

use Color::*;
use Piece::*;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A representation of the arrangement of pieces on the board at a given point in the game, as well
/// as castling availability, en passant target and the side to move.
///
/// Occupancy is stored twice: once as twelve bitboards, one per color and piece type, and once as
/// a square-indexed map for constant time lookup of the piece on a square. Every method which
/// changes one also changes the other, so both always describe the same board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    occ_by_piece: [[Bitboard; Piece::COUNT]; Color::COUNT],
    piece_map: [Option<(Color, Piece)>; Square::COUNT],
    ep_target: Bitboard,
    castling_rights: [u8; Color::COUNT],
    turn: Color,
}

const CASTLE_KING_SIDE: u8 = 0x1;
const CASTLE_QUEEN_SIDE: u8 = 0x2;
const CASTLE_BOTH_SIDES: u8 = CASTLE_KING_SIDE | CASTLE_QUEEN_SIDE;

const BACK_RANK: [Piece; File::COUNT] = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];

impl Position {

    /// Returns the standard starting Position
    pub fn new() -> Position {
        let mut pos = Position::empty();

        for f in 0..File::COUNT {
            let file = File::try_from(f).expect("INFALLIBLE");
            pos.place(White, BACK_RANK[f], Square::from_coord(file, Rank::R1));
            pos.place(White, Pawn, Square::from_coord(file, Rank::R2));
            pos.place(Black, Pawn, Square::from_coord(file, Rank::R7));
            pos.place(Black, BACK_RANK[f], Square::from_coord(file, Rank::R8));
        }
        pos.castling_rights = [CASTLE_BOTH_SIDES, CASTLE_BOTH_SIDES];

        pos
    }

    /// Returns a position with an empty board, white to move and no castling rights
    pub fn empty() -> Position {
        Position {
            occ_by_piece: [[Bitboard::new(); Piece::COUNT]; Color::COUNT],
            piece_map: [None; Square::COUNT],
            ep_target: Bitboard::new(),
            castling_rights: [0, 0],
            turn: White,
        }
    }

    /// Places the piece given by its FEN letter (`PNBRQK` for white, `pnbrqk` for black) on an
    /// empty square.
    ///
    /// ```
    /// use magpie::chess::{Position, Square};
    /// use magpie::chess::error::SetupError;
    ///
    /// let mut pos = Position::empty();
    /// pos.set_piece('R', Square::A1).expect("a1 is empty");
    /// assert_eq!(pos.piece_code_at(Square::A1), Some('R'));
    /// assert_eq!(pos.set_piece('r', Square::A1), Err(SetupError::OccupiedSquare(Square::A1)));
    /// assert_eq!(pos.set_piece('x', Square::A2), Err(SetupError::UnknownPiece('x')));
    /// ```
    pub fn set_piece(&mut self, code: char, sq: Square) -> Result<(), SetupError> {
        let (color, piece) = Piece::from_code(code).ok_or(SetupError::UnknownPiece(code))?;
        self.put_piece(color, piece, sq)
    }

    /// Places a piece of the given color and type on an empty square
    pub fn put_piece(&mut self, color: Color, piece: Piece, sq: Square) -> Result<(), SetupError> {
        if self.piece_map[sq as usize].is_some() {
            return Err(SetupError::OccupiedSquare(sq));
        }

        self.place(color, piece, sq);
        Ok(())
    }

    /// Removes and returns the piece on `sq`, if any
    pub fn remove_piece(&mut self, sq: Square) -> Option<(Color, Piece)> {
        self.lift(sq)
    }

    /// Returns the color and type of piece, if any, at the given location
    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        self.piece_map[sq as usize]
    }

    /// Returns the FEN letter of the piece, if any, at the given location
    pub fn piece_code_at(&self, sq: Square) -> Option<char> {
        self.piece_at(sq).map(|(c, p)| p.code(c))
    }

    /// Returns the squares occupied by pieces of the given color and type
    pub fn occupied_by_piece(&self, color: Color, piece: Piece) -> Bitboard {
        self.occ_by_piece[color as usize][piece as usize]
    }

    /// Returns the squares occupied by pieces of the given color
    pub fn occupied_by(&self, color: Color) -> Bitboard {
        self.occ_by_piece[color as usize].iter().fold(Bitboard::new(), |acc, &bb| acc | bb)
    }

    /// Returns the squares occupied by white pieces
    pub fn white_pieces(&self) -> Bitboard {
        self.occupied_by(White)
    }

    /// Returns the squares occupied by black pieces
    pub fn black_pieces(&self) -> Bitboard {
        self.occupied_by(Black)
    }

    /// Returns all occupied squares
    pub fn occupied(&self) -> Bitboard {
        self.white_pieces() | self.black_pieces()
    }

    /// Returns all empty squares
    pub fn empty_squares(&self) -> Bitboard {
        !self.occupied()
    }

    /// Returns the color whose turn it is
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// Sets the color whose turn it is
    pub fn set_turn(&mut self, color: Color) {
        self.turn = color;
    }

    /// Returns the en passant target as a bitboard with at most one square
    pub fn en_passant_target(&self) -> Bitboard {
        self.ep_target
    }

    /// Returns the en passant target square, if any
    pub fn en_passant_square(&self) -> Option<Square> {
        self.ep_target.peek()
    }

    /// Sets or clears the en passant target square
    pub fn set_en_passant_target(&mut self, sq: Option<Square>) {
        self.ep_target = sq.map(Bitboard::from).unwrap_or_default();
    }

    /// Returns `true` if `color` may still castle on the king side
    pub fn has_king_side_castling_rights(&self, color: Color) -> bool {
        self.castling_rights[color as usize] & CASTLE_KING_SIDE != 0
    }

    /// Returns `true` if `color` may still castle on the queen side
    pub fn has_queen_side_castling_rights(&self, color: Color) -> bool {
        self.castling_rights[color as usize] & CASTLE_QUEEN_SIDE != 0
    }

    /// Returns `true` if `color` may still castle on either side
    pub fn has_castling_rights(&self, color: Color) -> bool {
        self.castling_rights[color as usize] != 0
    }

    /// Sets castling rights for `color`
    pub fn set_castling_rights(&mut self, color: Color, king_side: bool, queen_side: bool) {
        let mut rights = 0;
        if king_side {
            rights |= CASTLE_KING_SIDE;
        }
        if queen_side {
            rights |= CASTLE_QUEEN_SIDE;
        }
        self.castling_rights[color as usize] = rights;
    }

    /// Returns `true` if the bitboards and the square map agree: every square is set in at most
    /// one bitboard, and the map names exactly that piece (or nothing if no bitboard has it).
    pub fn is_consistent(&self) -> bool {
        Square::all().all(|sq| {
            let mut found = None;
            for c in 0..Color::COUNT {
                for p in 0..Piece::COUNT {
                    if self.occ_by_piece[c][p].contains(sq) {
                        if found.is_some() {
                            return false;
                        }
                        found = Some((Color::try_from(c).expect("INFALLIBLE"),
                                      Piece::try_from(p).expect("INFALLIBLE")));
                    }
                }
            }
            found == self.piece_map[sq as usize]
        }) && self.ep_target.len() <= 1
    }

    /// Puts a piece on an empty square, updating both representations
    fn place(&mut self, color: Color, piece: Piece, sq: Square) {
        debug_assert!(self.piece_map[sq as usize].is_none(), "{} is occupied", sq);
        self.occ_by_piece[color as usize][piece as usize].insert(sq);
        self.piece_map[sq as usize] = Some((color, piece));
    }

    /// Takes whatever piece is on `sq` off the board, updating both representations
    fn lift(&mut self, sq: Square) -> Option<(Color, Piece)> {
        let (color, piece) = self.piece_map[sq as usize].take()?;
        self.occ_by_piece[color as usize][piece as usize].remove(sq);
        Some((color, piece))
    }

    /// Converts the position to text: the board, turn, castling and en passant fields of FEN
    pub fn to_fen_str(&self) -> String {
        // the board
        let mut board = String::new();

        for r in (0..Rank::COUNT).rev() {
            let mut count = 0;
            for f in 0..File::COUNT {
                let sq = Square::try_from(r * File::COUNT + f).expect("INFALLIBLE");
                if let Some(code) = self.piece_code_at(sq) {
                    if count > 0 {
                        board += &count.to_string();
                        count = 0;
                    }
                    board.push(code);
                } else {
                    count += 1;
                }
            }
            if count > 0 {
                board += &count.to_string();
            }
            if r > 0 {
                board += "/";
            }
        }

        // castling rights
        let mut castling = String::new();
        if self.has_king_side_castling_rights(White) { castling.push('K'); }
        if self.has_queen_side_castling_rights(White) { castling.push('Q'); }
        if self.has_king_side_castling_rights(Black) { castling.push('k'); }
        if self.has_queen_side_castling_rights(Black) { castling.push('q'); }
        if castling.is_empty() {
            castling.push('-');
        }

        // en passant square
        let ep_square = match self.en_passant_square() {
            Some(sq) => sq.to_string(),
            None => "-".to_string(),
        };

        format!("{} {} {} {}", board, self.turn, castling, ep_square)
    }

    /// Parse a position from a FEN string.
    ///
    /// The half-move clock and move number fields are optional. They are checked but not kept.
    /// No legality checks are made beyond the syntax.
    pub fn from_fen_str(s: &str) -> Result<Position, ParseFenError> {
        use ParseFenError::*;

        let mut pos = Position::empty();
        let mut fields = s.split_whitespace();

        // parse the board
        let board = fields.next().ok_or(Empty)?;
        let mut r = Rank::COUNT - 1;
        let mut f = 0;
        for c in board.chars() {
            match c {
                '1' ..= '8' => {
                    f += c.to_digit(10).expect("INFALLIBLE") as usize;
                    if f > File::COUNT {
                        return Err(ParseBoard);
                    }
                }
                '/' => {
                    if f == File::COUNT && r > 0 {
                        r -= 1;
                        f = 0;
                    } else {
                        return Err(ParseBoard);
                    }
                }
                _ => {
                    let sq = match (File::try_from(f), Rank::try_from(r)) {
                        (Ok(f), Ok(r)) => Square::from_coord(f, r),
                        _ => return Err(ParseBoard),
                    };
                    pos.set_piece(c, sq)?;
                    f += 1;
                }
            }
        }
        if r > 0 || f < File::COUNT {
            return Err(ParseBoard);
        }

        // parse the turn
        pos.turn = fields.next().ok_or(ParseTurn)?.parse()?;

        // parse the castling flags
        match fields.next() {
            Some("-") => {},
            Some(castling_flags) => {
                for c in castling_flags.chars() {
                    match c {
                        'K' => pos.castling_rights[White as usize] |= CASTLE_KING_SIDE,
                        'Q' => pos.castling_rights[White as usize] |= CASTLE_QUEEN_SIDE,
                        'k' => pos.castling_rights[Black as usize] |= CASTLE_KING_SIDE,
                        'q' => pos.castling_rights[Black as usize] |= CASTLE_QUEEN_SIDE,
                        _ => return Err(ParseCastling),
                    }
                }
            },
            None => return Err(ParseCastling),
        }

        // parse en passant square
        match fields.next() {
            Some("-") => {},
            Some(ep_square) => {
                let sq: Square = ep_square.parse()?;
                match sq.rank() {
                    Rank::R3 | Rank::R6 => pos.set_en_passant_target(Some(sq)),
                    _ => return Err(ParseEnPassant),
                }
            },
            None => return Err(ParseEnPassant),
        }

        // half move clock and move number, if present
        if let Some(plies) = fields.next() {
            plies.parse::<usize>().map_err(|_| ParseHalfMoveClock)?;
        }
        if let Some(move_num) = fields.next() {
            move_num.parse::<usize>().map_err(|_| ParseMoveNumber)?;
        }
        if fields.next().is_some() {
            return Err(TooManyFields);
        }

        Ok(pos)
    }
}

impl Default for Position {
    /// Returns the standard starting Position
    fn default() -> Self {
        Position::new()
    }
}

impl fmt::Display for Position {
    /// Writes out the position using the first four fields of FEN
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_fen_str().fmt(f)
    }
}

impl FromStr for Position {
    type Err = ParseFenError;

    /// Parse a position from a FEN string
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::from_fen_str(s)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
mod apply;
mod movegen;
