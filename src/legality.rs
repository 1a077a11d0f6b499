//! Legality filtering by simulate-and-restore.
//!
//! A [`Probe`] plays one candidate onto a grid and remembers the cells it
//! touched. Dropping it puts those cells back, so the grid is restored on
//! every exit path, unwinding included.

use tracing::trace;

use crate::movegen::{self, Grid};
use crate::moves::MoveCandidate;
use crate::piece::{Color, Piece, PieceType, Square};

/// Up to three cells change: origin, destination, and an en passant victim.
pub struct Probe<'a> {
    grid: &'a mut Grid,
    saved: [Option<(Square, Option<Piece>)>; 3],
}

impl<'a> Probe<'a> {
    pub fn new(grid: &'a mut Grid, from: Square, to: Square) -> Self {
        let mover = grid[from.row][from.col];
        let target = grid[to.row][to.col];
        let mut saved = [Some((from, mover)), Some((to, target)), None];

        let en_passant_victim = mover.is_some_and(|p| {
            p.piece_type == PieceType::Pawn && from.col != to.col && target.is_none()
        });
        if en_passant_victim {
            let victim = Square::new(from.row, to.col);
            saved[2] = Some((victim, grid[victim.row][victim.col]));
            grid[victim.row][victim.col] = None;
        }

        grid[from.row][from.col] = None;
        grid[to.row][to.col] = mover.map(|mut p| {
            p.position = to;
            p
        });

        Probe { grid, saved }
    }

    pub fn grid(&self) -> &Grid {
        &*self.grid
    }
}

impl Drop for Probe<'_> {
    fn drop(&mut self) {
        for (sq, cell) in self.saved.iter().rev().flatten() {
            self.grid[sq.row][sq.col] = *cell;
        }
    }
}

/// Whether `color`'s king is safe after moving the piece on `from` to `to`.
pub fn leaves_king_safe(grid: &mut Grid, from: Square, to: Square, color: Color) -> bool {
    let probe = Probe::new(grid, from, to);
    let attacked = movegen::is_king_attacked(probe.grid(), color);
    trace!(%from, %to, attacked, "probed candidate");
    !attacked
}

/// Drops every candidate for the piece on `from` that would expose its own king.
/// `grid` is used as scratch space and is left as it was found.
pub fn retain_safe(
    grid: &mut Grid,
    from: Square,
    candidates: Vec<MoveCandidate>,
) -> Vec<MoveCandidate> {
    let Some(color) = movegen::piece_at(grid, from).map(|p| p.color) else {
        return Vec::new();
    };
    candidates
        .into_iter()
        .filter(|m| leaves_king_safe(grid, from, m.to, color))
        .collect()
}
