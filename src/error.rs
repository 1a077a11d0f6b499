//! Errors raised when a caller breaks the board's call contract.
//!
//! Queries never fail: asking for moves from an empty square or an enemy
//! piece just yields nothing. Only mutating calls made in the wrong state
//! are rejected, and they are rejected before anything is written.

use thiserror::Error;

use crate::piece::{PieceType, Square};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    /// A promotion choice arrived but no pawn is waiting to promote
    #[error("No promotion is pending")]
    NoPromotionPending,

    /// Pawns may only become a queen, rook, knight or bishop
    #[error("Cannot promote to {0}")]
    InvalidPromotion(PieceType),

    /// The pawn on this square must be promoted before play continues
    #[error("Promotion pending at {0}")]
    PromotionPending(Square),

    #[error("Game is already over")]
    GameOver,

    /// Coordinates from outside the engine that fall off the board
    #[error("Square ({row}, {col}) is off the board")]
    OffBoard { row: usize, col: usize },

    #[error("No piece at {0}")]
    EmptySquare(Square),

    /// No legal candidate matches the requested relocation
    #[error("Illegal move: {from} to {to}")]
    IllegalMove { from: Square, to: Square },
}

pub type ChessResult<T> = Result<T, ChessError>;
