//! JSON-friendly rendering of a [`Snapshot`] for presentation layers.

use serde::Serialize;

use crate::board::{Board, GameStatus, MoveOutcome, Snapshot};
use crate::error::ChessResult;
use crate::moves::MoveCandidate;
use crate::piece::{PieceType, Square};

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SquarePiece {
    pub piece_type: String,
    pub color: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MoveJson {
    pub to: [usize; 2],
    /// Rook relocation for castling, as `[[from_row, from_col], [to_row, to_col]]`.
    pub extra: Option<[[usize; 2]; 2]>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind")]
pub enum StatusJson {
    Ongoing,
    PromotionPending { square: [usize; 2], choices: Vec<String> },
    Checkmate { winner: String },
    Stalemate,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct BoardView {
    pub squares: Vec<Vec<Option<SquarePiece>>>,
    pub current_turn: String,
    pub status: StatusJson,
    pub in_check: bool,
    pub last_move: Option<[[usize; 2]; 2]>,
    pub captured_white: Vec<String>,
    pub captured_black: Vec<String>,
}

fn pair(sq: Square) -> [usize; 2] {
    [sq.row, sq.col]
}

fn status_json(status: GameStatus) -> StatusJson {
    match status {
        GameStatus::Ongoing => StatusJson::Ongoing,
        GameStatus::PromotionPending { square } => StatusJson::PromotionPending {
            square: pair(square),
            choices: PieceType::PROMOTION_CHOICES.iter().map(|pt| pt.to_string()).collect(),
        },
        GameStatus::Checkmate { winner } => StatusJson::Checkmate {
            winner: winner.to_string(),
        },
        GameStatus::Stalemate => StatusJson::Stalemate,
    }
}

pub fn move_json(m: &MoveCandidate) -> MoveJson {
    MoveJson {
        to: pair(m.to),
        extra: m.extra.map(|r| [pair(r.from), pair(r.to)]),
    }
}

pub fn board_view(snapshot: &Snapshot) -> BoardView {
    let squares = snapshot
        .squares
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| {
                    cell.map(|p| SquarePiece {
                        piece_type: p.piece_type.to_string(),
                        color: p.color.to_string(),
                    })
                })
                .collect()
        })
        .collect();

    BoardView {
        squares,
        current_turn: snapshot.turn.to_string(),
        status: status_json(snapshot.status),
        in_check: snapshot.in_check,
        last_move: snapshot.last_move.map(|(from, to)| [pair(from), pair(to)]),
        captured_white: snapshot.captured_white.iter().map(|pt| pt.to_string()).collect(),
        captured_black: snapshot.captured_black.iter().map(|pt| pt.to_string()).collect(),
    }
}

/// Legal moves from raw UI coordinates. Off-board coordinates have no moves.
pub fn legal_moves_at(board: &Board, row: usize, col: usize) -> Vec<MoveJson> {
    match Square::try_new(row, col) {
        Ok(sq) => board.legal_moves(sq).iter().map(move_json).collect(),
        Err(_) => Vec::new(),
    }
}

/// Click-to-move from raw UI coordinates, rejecting off-board input before
/// the board is touched.
pub fn play_at(
    board: &mut Board,
    from: (usize, usize),
    to: (usize, usize),
) -> ChessResult<MoveOutcome> {
    let from = Square::try_new(from.0, from.1)?;
    let to = Square::try_new(to.0, to.1)?;
    board.play(from, to)
}

/// Parse a promotion choice as offered in `StatusJson::PromotionPending`.
pub fn parse_promotion(name: &str) -> Option<PieceType> {
    PieceType::PROMOTION_CHOICES
        .into_iter()
        .find(|pt| pt.to_string() == name)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::ChessError;

    #[test]
    fn starting_position_renders_as_json() {
        let view = board_view(&Board::new().snapshot());
        let value = serde_json::to_value(&view).unwrap();

        assert_eq!(value["current_turn"], "White");
        assert_eq!(value["status"], json!({ "kind": "Ongoing" }));
        assert_eq!(value["in_check"], false);
        assert_eq!(value["last_move"], serde_json::Value::Null);
        assert_eq!(value["squares"][0][4], json!({ "piece_type": "King", "color": "White" }));
        assert_eq!(value["squares"][7][3], json!({ "piece_type": "Queen", "color": "Black" }));
        assert_eq!(value["squares"][4][4], serde_json::Value::Null);
    }

    #[test]
    fn pending_promotion_lists_choices() {
        let status = status_json(GameStatus::PromotionPending { square: Square::new(7, 0) });
        let value = serde_json::to_value(&status).unwrap();
        assert_eq!(
            value,
            json!({
                "kind": "PromotionPending",
                "square": [7, 0],
                "choices": ["Queen", "Rook", "Knight", "Bishop"],
            })
        );
    }

    #[test]
    fn castling_candidate_carries_rook_relocation() {
        let m = MoveCandidate::castling(Square::new(0, 6), Square::new(0, 7), Square::new(0, 5));
        let value = serde_json::to_value(move_json(&m)).unwrap();
        assert_eq!(value, json!({ "to": [0, 6], "extra": [[0, 7], [0, 5]] }));
    }

    #[test]
    fn off_board_coordinates_are_rejected_without_panicking() {
        let mut board = Board::new();
        let before = board.snapshot();

        assert!(legal_moves_at(&board, 8, 0).is_empty());
        assert!(legal_moves_at(&board, 0, usize::MAX).is_empty());
        assert_eq!(legal_moves_at(&board, 0, 6).len(), 2);

        assert_eq!(
            play_at(&mut board, (0, 9), (2, 5)),
            Err(ChessError::OffBoard { row: 0, col: 9 })
        );
        assert_eq!(
            play_at(&mut board, (1, 4), (8, 4)),
            Err(ChessError::OffBoard { row: 8, col: 4 })
        );
        assert_eq!(board.snapshot(), before);

        assert_eq!(play_at(&mut board, (1, 4), (3, 4)), Ok(MoveOutcome::Completed));
        assert_eq!(board.turn(), crate::piece::Color::Black);
    }

    #[test]
    fn promotion_names_round_trip_through_picker() {
        assert_eq!(parse_promotion("Knight"), Some(PieceType::Knight));
        assert_eq!(parse_promotion("King"), None);
        assert_eq!(parse_promotion("queen"), None);
    }
}
