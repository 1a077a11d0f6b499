use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ChessError, ChessResult};
use crate::legality;
use crate::movegen::{self, Castling, Grid};
use crate::moves::{MoveCandidate, Relocation};
use crate::piece::{Color, Piece, PieceType, Square};

/// Where the game stands, as stored on the board after every completed step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Ongoing,
    PromotionPending { square: Square },
    Checkmate { winner: Color },
    Stalemate,
}

impl GameStatus {
    pub fn is_concluded(self) -> bool {
        matches!(self, GameStatus::Checkmate { .. } | GameStatus::Stalemate)
    }
}

/// Result of asking whether one side is out of moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
    Ongoing,
    Checkmate,
    Stalemate,
}

/// What `apply_move` left behind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The move is done; the caller should advance the turn.
    Completed,
    /// A pawn reached the last rank and waits for `resolve_promotion`.
    PromotionPending(Square),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PendingPromotion {
    square: Square,
    color: Color,
}

/// Read-only view of the board for a presentation layer.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub squares: Grid,
    pub turn: Color,
    pub last_move: Option<(Square, Square)>,
    pub status: GameStatus,
    /// Whether the side to move is in check.
    pub in_check: bool,
    pub captured_white: Vec<PieceType>,
    pub captured_black: Vec<PieceType>,
}

#[derive(Clone, Debug)]
pub struct Board {
    squares: Grid,
    current_turn: Color,
    last_move: Option<(Square, Square)>,
    promotion: Option<PendingPromotion>,
    status: GameStatus,
    captured_white: Vec<PieceType>,
    captured_black: Vec<PieceType>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create an empty board with no pieces. Useful for setting up test positions.
    pub fn empty() -> Self {
        Board {
            squares: [[None; 8]; 8],
            current_turn: Color::White,
            last_move: None,
            promotion: None,
            status: GameStatus::Ongoing,
            captured_white: Vec::new(),
            captured_black: Vec::new(),
        }
    }

    pub fn new() -> Self {
        let mut board = Self::empty();
        let back_rank = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];

        for color in [Color::White, Color::Black] {
            for (col, &pt) in back_rank.iter().enumerate() {
                board.place(Piece::new(pt, color, Square::new(color.back_rank(), col)));
            }
            for col in 0..8 {
                let sq = Square::new(color.pawn_start_row(), col);
                board.place(Piece::new(PieceType::Pawn, color, sq));
            }
        }

        board
    }

    /// Reset to the starting position.
    pub fn new_game(&mut self) {
        debug!("new game");
        *self = Self::new();
    }

    /// Put a piece on the square named by its `position`, replacing whatever was there.
    pub fn place(&mut self, piece: Piece) {
        let sq = piece.position;
        self.squares[sq.row][sq.col] = Some(piece);
    }

    pub fn remove(&mut self, sq: Square) -> Option<Piece> {
        self.squares[sq.row][sq.col].take()
    }

    /// Set the side to move and re-evaluate the status. Meant for position setup.
    pub fn set_turn(&mut self, color: Color) -> GameStatus {
        self.current_turn = color;
        self.refresh_status()
    }

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        movegen::piece_at(&self.squares, sq)
    }

    pub fn turn(&self) -> Color {
        self.current_turn
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn last_move(&self) -> Option<(Square, Square)> {
        self.last_move
    }

    pub fn is_king_attacked(&self, color: Color) -> bool {
        movegen::is_king_attacked(&self.squares, color)
    }

    /// Legal destinations for the piece on `sq`.
    ///
    /// Empty while a promotion is pending or the game is over, and for empty
    /// squares or pieces of the side not to move.
    pub fn legal_moves(&self, sq: Square) -> Vec<MoveCandidate> {
        if self.promotion.is_some() || self.status.is_concluded() {
            return Vec::new();
        }
        match self.piece_at(sq) {
            Some(p) if p.color == self.current_turn => self.safe_moves(sq),
            _ => Vec::new(),
        }
    }

    /// Every legal move for the side to move, paired with its origin.
    pub fn legal_moves_for_turn(&self) -> Vec<(Square, MoveCandidate)> {
        Square::all()
            .flat_map(|sq| self.legal_moves(sq).into_iter().map(move |m| (sq, m)))
            .collect()
    }

    fn safe_moves(&self, from: Square) -> Vec<MoveCandidate> {
        let candidates = movegen::pseudo_legal_moves(&self.squares, from, Castling::Include);
        let mut scratch = self.squares;
        legality::retain_safe(&mut scratch, from, candidates)
    }

    pub fn classify(&self, color: Color) -> Classification {
        if self.promotion.is_some() {
            return Classification::Ongoing;
        }
        let can_move = Square::all().any(|sq| {
            self.piece_at(sq).is_some_and(|p| p.color == color) && !self.safe_moves(sq).is_empty()
        });
        if can_move {
            Classification::Ongoing
        } else if self.is_king_attacked(color) {
            Classification::Checkmate
        } else {
            Classification::Stalemate
        }
    }

    /// Recompute and store the status for the side to move.
    pub fn refresh_status(&mut self) -> GameStatus {
        self.status = match self.promotion {
            Some(pending) => GameStatus::PromotionPending { square: pending.square },
            None => match self.classify(self.current_turn) {
                Classification::Ongoing => GameStatus::Ongoing,
                Classification::Checkmate => GameStatus::Checkmate {
                    winner: self.current_turn.opposite(),
                },
                Classification::Stalemate => GameStatus::Stalemate,
            },
        };
        if self.status.is_concluded() {
            info!(status = ?self.status, "game concluded");
        }
        self.status
    }

    fn ensure_playable(&self) -> ChessResult<()> {
        if let Some(pending) = self.promotion {
            return Err(ChessError::PromotionPending(pending.square));
        }
        if self.status.is_concluded() {
            return Err(ChessError::GameOver);
        }
        Ok(())
    }

    /// Move a piece and update its position. Returns whatever stood on `to`.
    fn relocate(&mut self, from: Square, to: Square) -> Option<Piece> {
        let mut piece = self.remove(from)?;
        piece.position = to;
        self.squares[to.row][to.col].replace(piece)
    }

    fn record_capture(&mut self, captured: Piece) {
        match captured.color {
            Color::White => self.captured_white.push(captured.piece_type),
            Color::Black => self.captured_black.push(captured.piece_type),
        }
    }

    fn clear_en_passant(&mut self) {
        for piece in self.squares.iter_mut().flatten().flatten() {
            piece.en_passant = false;
        }
    }

    /// Apply a move previously returned by `legal_moves`.
    ///
    /// `extra` must be the candidate's own `extra`, copied verbatim. The turn
    /// is not advanced here.
    pub fn apply_move(
        &mut self,
        from: Square,
        to: Square,
        extra: Option<Relocation>,
    ) -> ChessResult<MoveOutcome> {
        self.ensure_playable()?;
        let Some(piece) = self.piece_at(from) else {
            return Err(ChessError::EmptySquare(from));
        };
        if let Some(extra) = extra {
            if self.piece_at(extra.from).is_none() {
                return Err(ChessError::EmptySquare(extra.from));
            }
        }

        let target_was_empty = self.piece_at(to).is_none();
        self.clear_en_passant();
        if let Some(captured) = self.relocate(from, to) {
            self.record_capture(captured);
        }
        self.last_move = Some((from, to));
        debug!(piece = %piece.piece_type, color = %piece.color, %from, %to, "applied move");

        let mut outcome = MoveOutcome::Completed;
        match piece.piece_type {
            PieceType::Rook | PieceType::King => {
                if let Some(p) = self.squares[to.row][to.col].as_mut() {
                    p.moved = true;
                }
            }
            PieceType::Pawn => {
                if from.row.abs_diff(to.row) == 2 {
                    if let Some(p) = self.squares[to.row][to.col].as_mut() {
                        p.en_passant = true;
                    }
                } else if from.col != to.col && target_was_empty {
                    let victim = Square::new(from.row, to.col);
                    if let Some(captured) = self.remove(victim) {
                        debug!(%victim, "en passant capture");
                        self.record_capture(captured);
                    }
                }
                if to.row == piece.color.promotion_row() {
                    self.promotion = Some(PendingPromotion {
                        square: to,
                        color: piece.color,
                    });
                    self.status = GameStatus::PromotionPending { square: to };
                    outcome = MoveOutcome::PromotionPending(to);
                    debug!(square = %to, "promotion pending");
                }
            }
            _ => {}
        }

        // The castling rook: a bare relocation with no flags of its own
        if let Some(extra) = extra {
            self.relocate(extra.from, extra.to);
        }

        Ok(outcome)
    }

    /// Replace the pawn waiting on the last rank with a piece of `kind`.
    pub fn resolve_promotion(&mut self, kind: PieceType) -> ChessResult<()> {
        let Some(pending) = self.promotion else {
            return Err(ChessError::NoPromotionPending);
        };
        if !kind.is_promotion_choice() {
            return Err(ChessError::InvalidPromotion(kind));
        }

        self.place(Piece::new(kind, pending.color, pending.square));
        self.promotion = None;
        self.status = GameStatus::Ongoing;
        debug!(%kind, square = %pending.square, "promoted");
        Ok(())
    }

    /// Hand the move to the other side and classify the new position.
    pub fn advance_turn(&mut self) -> ChessResult<GameStatus> {
        self.ensure_playable()?;
        self.current_turn = self.current_turn.opposite();
        debug!(turn = %self.current_turn, "turn advanced");
        Ok(self.refresh_status())
    }

    /// Play `from` to `to` if it is legal, advancing the turn unless a
    /// promotion is now pending.
    pub fn play(&mut self, from: Square, to: Square) -> ChessResult<MoveOutcome> {
        self.ensure_playable()?;
        let candidate = self
            .legal_moves(from)
            .into_iter()
            .find(|m| m.to == to)
            .ok_or(ChessError::IllegalMove { from, to })?;
        let outcome = self.apply_move(from, to, candidate.extra)?;
        if outcome == MoveOutcome::Completed {
            self.advance_turn()?;
        }
        Ok(outcome)
    }

    /// Resolve a pending promotion and advance the turn.
    pub fn promote(&mut self, kind: PieceType) -> ChessResult<GameStatus> {
        self.resolve_promotion(kind)?;
        self.advance_turn()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            squares: self.squares,
            turn: self.current_turn,
            last_move: self.last_move,
            status: self.status,
            in_check: self.is_king_attacked(self.current_turn),
            captured_white: self.captured_white.clone(),
            captured_black: self.captured_black.clone(),
        }
    }
}
