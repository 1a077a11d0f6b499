use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::board::Board;
use crate::view::{board_view, legal_moves_at, parse_promotion, play_at, BoardView};

#[derive(Serialize)]
struct ActionResult {
    #[serde(flatten)]
    board_state: Option<BoardView>,
    error: Option<String>,
}

fn to_js<T: Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}

impl Game {
    fn result(&self, error: Option<String>) -> JsValue {
        let board_state = error.is_none().then(|| board_view(&self.board.snapshot()));
        to_js(&ActionResult { board_state, error })
    }
}

/// Browser-facing handle on one game. Coordinates outside `0..8` are rejected.
#[wasm_bindgen]
pub struct Game {
    board: Board,
}

#[wasm_bindgen]
impl Game {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Game {
        Game { board: Board::new() }
    }

    pub fn get_board_state(&self) -> JsValue {
        to_js(&board_view(&self.board.snapshot()))
    }

    pub fn get_legal_moves_for_square(&self, row: usize, col: usize) -> JsValue {
        to_js(&legal_moves_at(&self.board, row, col))
    }

    /// Click-to-move: plays the legal candidate from one square to another.
    pub fn make_move(
        &mut self,
        from_row: usize,
        from_col: usize,
        to_row: usize,
        to_col: usize,
    ) -> JsValue {
        match play_at(&mut self.board, (from_row, from_col), (to_row, to_col)) {
            Ok(_) => self.result(None),
            Err(err) => self.result(Some(err.to_string())),
        }
    }

    pub fn promote(&mut self, choice: &str) -> JsValue {
        let Some(kind) = parse_promotion(choice) else {
            return self.result(Some(format!("Unknown promotion choice: {choice}")));
        };
        match self.board.promote(kind) {
            Ok(_) => self.result(None),
            Err(err) => self.result(Some(err.to_string())),
        }
    }

    pub fn new_game(&mut self) -> JsValue {
        self.board.new_game();
        self.get_board_state()
    }
}
