use serde::{Deserialize, Serialize};

use crate::piece::Square;

/// A second piece relocation applied together with the primary move.
/// Only castling produces one: it carries the rook.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relocation {
    pub from: Square,
    pub to: Square,
}

/// A destination for the piece on the queried square.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveCandidate {
    pub to: Square,
    pub extra: Option<Relocation>,
}

impl MoveCandidate {
    pub fn simple(to: Square) -> Self {
        MoveCandidate { to, extra: None }
    }

    pub fn castling(to: Square, rook_from: Square, rook_to: Square) -> Self {
        MoveCandidate {
            to,
            extra: Some(Relocation {
                from: rook_from,
                to: rook_to,
            }),
        }
    }

    pub fn is_castling(&self) -> bool {
        self.extra.is_some()
    }
}
