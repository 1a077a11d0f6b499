use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ChessError, ChessResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row direction this color's pawns advance in.
    pub fn pawn_direction(self) -> i32 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    pub fn pawn_start_row(self) -> usize {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }

    /// Row on which this color's pawns promote.
    pub fn promotion_row(self) -> usize {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    pub fn back_rank(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceType {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

impl PieceType {
    /// Kinds a pawn may promote to, in the order a picker should offer them.
    pub const PROMOTION_CHOICES: [PieceType; 4] = [
        PieceType::Queen,
        PieceType::Rook,
        PieceType::Knight,
        PieceType::Bishop,
    ];

    pub fn is_promotion_choice(self) -> bool {
        Self::PROMOTION_CHOICES.contains(&self)
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PieceType::Pawn => "Pawn",
            PieceType::Rook => "Rook",
            PieceType::Knight => "Knight",
            PieceType::Bishop => "Bishop",
            PieceType::Queen => "Queen",
            PieceType::King => "King",
        };
        f.write_str(name)
    }
}

/// A board coordinate. Row 0 is White's back rank, column 0 is the a-file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Square {
    pub row: usize,
    pub col: usize,
}

impl Square {
    pub const fn new(row: usize, col: usize) -> Self {
        Square { row, col }
    }

    /// Build a square from untrusted coordinates, rejecting anything past row or column 7.
    pub fn try_new(row: usize, col: usize) -> ChessResult<Square> {
        if row < 8 && col < 8 {
            Ok(Square::new(row, col))
        } else {
            Err(ChessError::OffBoard { row, col })
        }
    }

    /// The square `(dr, dc)` away, or `None` if that falls off the board.
    pub fn offset(self, dr: i32, dc: i32) -> Option<Square> {
        let r = self.row as i32 + dr;
        let c = self.col as i32 + dc;
        if (0..8).contains(&r) && (0..8).contains(&c) {
            Some(Square::new(r as usize, c as usize))
        } else {
            None
        }
    }

    pub fn all() -> impl Iterator<Item = Square> {
        (0..8).flat_map(|row| (0..8).map(move |col| Square::new(row, col)))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub piece_type: PieceType,
    pub color: Color,
    pub position: Square,
    /// Only meaningful for rooks and kings (castling).
    pub moved: bool,
    /// Only meaningful for pawns: set right after a two-square advance.
    pub en_passant: bool,
}

impl Piece {
    pub fn new(piece_type: PieceType, color: Color, position: Square) -> Self {
        Piece {
            piece_type,
            color,
            position,
            moved: false,
            en_passant: false,
        }
    }

    pub fn is(&self, piece_type: PieceType, color: Color) -> bool {
        self.piece_type == piece_type && self.color == color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_stays_on_board() {
        let corner = Square::new(0, 0);
        assert_eq!(corner.offset(-1, 0), None);
        assert_eq!(corner.offset(0, -1), None);
        assert_eq!(corner.offset(1, 2), Some(Square::new(1, 2)));
        assert_eq!(Square::new(7, 7).offset(1, 1), None);
    }

    #[test]
    fn try_new_rejects_coordinates_past_the_edge() {
        assert_eq!(Square::try_new(7, 7), Ok(Square::new(7, 7)));
        assert_eq!(Square::try_new(8, 0), Err(ChessError::OffBoard { row: 8, col: 0 }));
        assert_eq!(Square::try_new(0, 9), Err(ChessError::OffBoard { row: 0, col: 9 }));
        assert_eq!(
            Square::try_new(usize::MAX, 3),
            Err(ChessError::OffBoard { row: usize::MAX, col: 3 })
        );
    }

    #[test]
    fn all_squares_covers_board_once() {
        let squares: Vec<Square> = Square::all().collect();
        assert_eq!(squares.len(), 64);
        assert_eq!(squares[0], Square::new(0, 0));
        assert_eq!(squares[63], Square::new(7, 7));
    }

    #[test]
    fn only_minor_and_major_pieces_are_promotion_choices() {
        assert!(PieceType::Queen.is_promotion_choice());
        assert!(PieceType::Knight.is_promotion_choice());
        assert!(!PieceType::King.is_promotion_choice());
        assert!(!PieceType::Pawn.is_promotion_choice());
    }
}
