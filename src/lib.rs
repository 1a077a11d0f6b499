pub mod board;
pub mod error;
pub mod legality;
pub mod movegen;
pub mod moves;
pub mod piece;
pub mod view;

#[cfg(target_arch = "wasm32")]
mod wasm_api;

pub use board::{Board, Classification, GameStatus, MoveOutcome, Snapshot};
pub use error::{ChessError, ChessResult};
pub use moves::{MoveCandidate, Relocation};
pub use piece::{Color, Piece, PieceType, Square};
