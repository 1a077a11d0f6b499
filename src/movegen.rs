//! Pseudo-legal move generation.
//!
//! Everything here is a pure function of the grid: nothing is mutated and the
//! mover's own king safety is not considered, except that castling refuses to
//! start from, pass through, or land on an attacked square.

use crate::moves::MoveCandidate;
use crate::piece::{Color, Piece, PieceType, Square};

pub type Grid = [[Option<Piece>; 8]; 8];

const ROOK_DIRS: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const BISHOP_DIRS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (-2, -1), (-2, 1), (-1, -2), (-1, 2),
    (1, -2), (1, 2), (2, -1), (2, 1),
];
const KING_OFFSETS: [(i32, i32); 8] = [
    (-1, -1), (-1, 0), (-1, 1), (0, -1),
    (0, 1), (1, -1), (1, 0), (1, 1),
];

/// Whether king moves should include castling. Attack detection excludes it,
/// otherwise two unmoved kings would ask each other about castling forever.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Castling {
    Include,
    Exclude,
}

#[inline]
pub fn piece_at(grid: &Grid, sq: Square) -> Option<Piece> {
    grid[sq.row][sq.col]
}

pub fn pseudo_legal_moves(grid: &Grid, from: Square, castling: Castling) -> Vec<MoveCandidate> {
    let mut moves = Vec::new();
    let Some(piece) = piece_at(grid, from) else {
        return moves;
    };
    let color = piece.color;

    match piece.piece_type {
        PieceType::Pawn => generate_pawn_moves(grid, from, color, &mut moves),
        PieceType::Knight => generate_step_moves(grid, from, color, &KNIGHT_OFFSETS, &mut moves),
        PieceType::Bishop => generate_sliding_moves(grid, from, color, &BISHOP_DIRS, &mut moves),
        PieceType::Rook => generate_sliding_moves(grid, from, color, &ROOK_DIRS, &mut moves),
        PieceType::Queen => {
            generate_sliding_moves(grid, from, color, &ROOK_DIRS, &mut moves);
            generate_sliding_moves(grid, from, color, &BISHOP_DIRS, &mut moves);
        }
        PieceType::King => {
            generate_step_moves(grid, from, color, &KING_OFFSETS, &mut moves);
            if castling == Castling::Include && !piece.moved {
                generate_castling_moves(grid, from, color, &mut moves);
            }
        }
    }

    moves
}

fn generate_pawn_moves(grid: &Grid, from: Square, color: Color, moves: &mut Vec<MoveCandidate>) {
    let dir = color.pawn_direction();

    // Single push, then double push from the start row through an empty square
    if let Some(one) = from.offset(dir, 0) {
        if piece_at(grid, one).is_none() {
            moves.push(MoveCandidate::simple(one));
            if from.row == color.pawn_start_row() {
                if let Some(two) = one.offset(dir, 0) {
                    if piece_at(grid, two).is_none() {
                        moves.push(MoveCandidate::simple(two));
                    }
                }
            }
        }
    }

    // Captures, including en passant onto the empty square behind the enemy pawn
    for dc in [-1, 1] {
        let Some(target) = from.offset(dir, dc) else {
            continue;
        };
        match piece_at(grid, target) {
            Some(p) if p.color != color => moves.push(MoveCandidate::simple(target)),
            Some(_) => {}
            None => {
                let beside = from.offset(0, dc).and_then(|sq| piece_at(grid, sq));
                if beside.is_some_and(|p| {
                    p.piece_type == PieceType::Pawn && p.color != color && p.en_passant
                }) {
                    moves.push(MoveCandidate::simple(target));
                }
            }
        }
    }
}

fn generate_step_moves(
    grid: &Grid,
    from: Square,
    color: Color,
    offsets: &[(i32, i32)],
    moves: &mut Vec<MoveCandidate>,
) {
    for &(dr, dc) in offsets {
        let Some(target) = from.offset(dr, dc) else {
            continue;
        };
        if piece_at(grid, target).is_some_and(|p| p.color == color) {
            continue;
        }
        moves.push(MoveCandidate::simple(target));
    }
}

fn generate_sliding_moves(
    grid: &Grid,
    from: Square,
    color: Color,
    directions: &[(i32, i32)],
    moves: &mut Vec<MoveCandidate>,
) {
    for &(dr, dc) in directions {
        let mut cursor = from.offset(dr, dc);
        while let Some(target) = cursor {
            if let Some(p) = piece_at(grid, target) {
                if p.color != color {
                    moves.push(MoveCandidate::simple(target));
                }
                break;
            }
            moves.push(MoveCandidate::simple(target));
            cursor = target.offset(dr, dc);
        }
    }
}

fn generate_castling_moves(
    grid: &Grid,
    king: Square,
    color: Color,
    moves: &mut Vec<MoveCandidate>,
) {
    let row = color.back_rank();
    if king != Square::new(row, 4) {
        return;
    }

    let enemy = color.opposite();
    if is_square_attacked_by(grid, king, enemy) {
        return;
    }

    for rook_col in [0usize, 7] {
        let rook = Square::new(row, rook_col);
        let home_rook =
            piece_at(grid, rook).is_some_and(|p| p.is(PieceType::Rook, color) && !p.moved);
        if !home_rook {
            continue;
        }

        let (lo, hi) = if rook_col < king.col {
            (rook_col, king.col)
        } else {
            (king.col, rook_col)
        };
        if (lo + 1..hi).any(|col| piece_at(grid, Square::new(row, col)).is_some()) {
            continue;
        }

        let step: i32 = if rook_col > king.col { 1 } else { -1 };
        let (Some(crossing), Some(landing)) = (king.offset(0, step), king.offset(0, 2 * step))
        else {
            continue;
        };
        if is_square_attacked_by(grid, crossing, enemy)
            || is_square_attacked_by(grid, landing, enemy)
        {
            continue;
        }

        moves.push(MoveCandidate::castling(landing, rook, crossing));
    }
}

/// Squares the piece on `from` attacks.
///
/// For every kind but the pawn this is its non-castling pseudo-legal target
/// set. A pawn attacks both forward diagonals whether or not anything stands
/// there, and never attacks the squares it pushes to.
pub fn attacked_squares(grid: &Grid, from: Square) -> Vec<Square> {
    let Some(piece) = piece_at(grid, from) else {
        return Vec::new();
    };
    match piece.piece_type {
        PieceType::Pawn => {
            let dir = piece.color.pawn_direction();
            [-1, 1].iter().filter_map(|&dc| from.offset(dir, dc)).collect()
        }
        _ => pseudo_legal_moves(grid, from, Castling::Exclude)
            .into_iter()
            .map(|m| m.to)
            .collect(),
    }
}

pub fn is_square_attacked_by(grid: &Grid, target: Square, attacker: Color) -> bool {
    Square::all().any(|sq| {
        piece_at(grid, sq).is_some_and(|p| p.color == attacker)
            && attacked_squares(grid, sq).contains(&target)
    })
}

pub fn find_king(grid: &Grid, color: Color) -> Option<Square> {
    Square::all().find(|&sq| piece_at(grid, sq).is_some_and(|p| p.is(PieceType::King, color)))
}

/// Whether the king of `color` stands on a square the other side attacks.
pub fn is_king_attacked(grid: &Grid, color: Color) -> bool {
    find_king(grid, color).is_some_and(|king| is_square_attacked_by(grid, king, color.opposite()))
}

/// Build a grid holding exactly the listed pieces, all unmoved.
#[cfg(test)]
pub(crate) fn grid_with(pieces: &[(usize, usize, PieceType, Color)]) -> Grid {
    let mut grid: Grid = [[None; 8]; 8];
    for &(r, c, pt, color) in pieces {
        grid[r][c] = Some(Piece::new(pt, color, Square::new(r, c)));
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets(grid: &Grid, r: usize, c: usize) -> Vec<Square> {
        pseudo_legal_moves(grid, Square::new(r, c), Castling::Include)
            .into_iter()
            .map(|m| m.to)
            .collect()
    }

    #[test]
    fn knight_in_corner_has_two_moves() {
        let grid = grid_with(&[(0, 0, PieceType::Knight, Color::White)]);
        let mut t = targets(&grid, 0, 0);
        t.sort_by_key(|s| (s.row, s.col));
        assert_eq!(t, vec![Square::new(1, 2), Square::new(2, 1)]);
    }

    #[test]
    fn sliders_cover_open_board() {
        let rook = grid_with(&[(3, 3, PieceType::Rook, Color::White)]);
        assert_eq!(targets(&rook, 3, 3).len(), 14);
        let bishop = grid_with(&[(3, 3, PieceType::Bishop, Color::White)]);
        assert_eq!(targets(&bishop, 3, 3).len(), 13);
        let queen = grid_with(&[(3, 3, PieceType::Queen, Color::White)]);
        assert_eq!(targets(&queen, 3, 3).len(), 27);
    }

    #[test]
    fn slider_stops_at_own_piece_and_includes_capture() {
        let grid = grid_with(&[
            (0, 0, PieceType::Rook, Color::White),
            (0, 3, PieceType::Knight, Color::White),
            (4, 0, PieceType::Pawn, Color::Black),
        ]);
        let t = targets(&grid, 0, 0);
        assert!(t.contains(&Square::new(0, 2)));
        assert!(!t.contains(&Square::new(0, 3)));
        assert!(t.contains(&Square::new(4, 0)));
        assert!(!t.contains(&Square::new(5, 0)));
        assert_eq!(t.len(), 6);
    }

    #[test]
    fn pawn_double_push_needs_both_squares_empty() {
        let open = grid_with(&[(1, 4, PieceType::Pawn, Color::White)]);
        assert_eq!(targets(&open, 1, 4), vec![Square::new(2, 4), Square::new(3, 4)]);

        let blocked_far = grid_with(&[
            (1, 4, PieceType::Pawn, Color::White),
            (3, 4, PieceType::Knight, Color::Black),
        ]);
        assert_eq!(targets(&blocked_far, 1, 4), vec![Square::new(2, 4)]);

        let blocked_near = grid_with(&[
            (6, 4, PieceType::Pawn, Color::Black),
            (5, 4, PieceType::Knight, Color::White),
        ]);
        assert!(targets(&blocked_near, 6, 4).is_empty());
    }

    #[test]
    fn pawn_off_start_row_only_single_pushes() {
        let grid = grid_with(&[(2, 4, PieceType::Pawn, Color::White)]);
        assert_eq!(targets(&grid, 2, 4), vec![Square::new(3, 4)]);
    }

    #[test]
    fn pawn_captures_diagonally_only_enemies() {
        let grid = grid_with(&[
            (3, 3, PieceType::Pawn, Color::White),
            (4, 2, PieceType::Knight, Color::Black),
            (4, 4, PieceType::Knight, Color::White),
        ]);
        let t = targets(&grid, 3, 3);
        assert!(t.contains(&Square::new(4, 2)));
        assert!(!t.contains(&Square::new(4, 4)));
    }

    #[test]
    fn en_passant_requires_flagged_enemy_pawn() {
        let mut grid = grid_with(&[
            (3, 3, PieceType::Pawn, Color::Black),
            (3, 4, PieceType::Pawn, Color::White),
        ]);
        assert!(!targets(&grid, 3, 3).contains(&Square::new(2, 4)));

        if let Some(p) = grid[3][4].as_mut() {
            p.en_passant = true;
        }
        assert!(targets(&grid, 3, 3).contains(&Square::new(2, 4)));
    }

    #[test]
    fn pawn_attacks_empty_diagonals_but_not_push_squares() {
        let grid = grid_with(&[(1, 6, PieceType::Pawn, Color::Black)]);
        let mut attacked = attacked_squares(&grid, Square::new(1, 6));
        attacked.sort_by_key(|s| s.col);
        assert_eq!(attacked, vec![Square::new(0, 5), Square::new(0, 7)]);
        assert!(!is_square_attacked_by(&grid, Square::new(0, 6), Color::Black));
    }

    fn castling_grid() -> Grid {
        grid_with(&[
            (0, 4, PieceType::King, Color::White),
            (0, 0, PieceType::Rook, Color::White),
            (0, 7, PieceType::Rook, Color::White),
            (7, 4, PieceType::King, Color::Black),
        ])
    }

    fn castles(grid: &Grid) -> Vec<MoveCandidate> {
        pseudo_legal_moves(grid, Square::new(0, 4), Castling::Include)
            .into_iter()
            .filter(|m| m.is_castling())
            .collect()
    }

    #[test]
    fn castling_offered_on_both_sides() {
        let grid = castling_grid();
        let c = castles(&grid);
        let kingside =
            MoveCandidate::castling(Square::new(0, 6), Square::new(0, 7), Square::new(0, 5));
        let queenside =
            MoveCandidate::castling(Square::new(0, 2), Square::new(0, 0), Square::new(0, 3));
        assert!(c.contains(&kingside));
        assert!(c.contains(&queenside));
        assert!(pseudo_legal_moves(&grid, Square::new(0, 4), Castling::Exclude)
            .iter()
            .all(|m| !m.is_castling()));
    }

    #[test]
    fn castling_blocked_by_piece_between() {
        let mut grid = castling_grid();
        grid[0][1] = Some(Piece::new(PieceType::Knight, Color::White, Square::new(0, 1)));
        let c = castles(&grid);
        assert_eq!(c.len(), 1);
        assert_eq!(c[0].to, Square::new(0, 6));
    }

    #[test]
    fn castling_blocked_by_pawn_covering_transit() {
        let mut grid = castling_grid();
        grid[1][6] = Some(Piece::new(PieceType::Pawn, Color::Black, Square::new(1, 6)));
        let c = castles(&grid);
        assert_eq!(c.len(), 1);
        assert_eq!(c[0].to, Square::new(0, 2));
    }

    #[test]
    fn no_castling_out_of_check_or_with_moved_pieces() {
        let mut checked = castling_grid();
        checked[5][4] = Some(Piece::new(PieceType::Rook, Color::Black, Square::new(5, 4)));
        assert!(castles(&checked).is_empty());

        let mut moved_rook = castling_grid();
        if let Some(p) = moved_rook[0][7].as_mut() {
            p.moved = true;
        }
        let c = castles(&moved_rook);
        assert_eq!(c.len(), 1);
        assert_eq!(c[0].to, Square::new(0, 2));

        let mut moved_king = castling_grid();
        if let Some(p) = moved_king[0][4].as_mut() {
            p.moved = true;
        }
        assert!(castles(&moved_king).is_empty());
    }

    #[test]
    fn queenside_castling_ignores_attack_on_rook_side_square() {
        // The king never crosses b1, so an attack there does not matter.
        let mut grid = castling_grid();
        grid[5][1] = Some(Piece::new(PieceType::Rook, Color::Black, Square::new(5, 1)));
        let c = castles(&grid);
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn king_attack_detection() {
        let grid = grid_with(&[
            (0, 4, PieceType::King, Color::White),
            (7, 4, PieceType::King, Color::Black),
            (3, 7, PieceType::Queen, Color::Black),
        ]);
        assert!(is_king_attacked(&grid, Color::White));
        assert!(!is_king_attacked(&grid, Color::Black));
        assert_eq!(find_king(&grid, Color::Black), Some(Square::new(7, 4)));
    }
}
