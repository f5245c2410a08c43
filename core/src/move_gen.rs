use crate::board::Board;
use crate::check::is_in_check;
use crate::types::{Move, Piece, PieceKind, Position, Side};

const ORTHOGONAL: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const DIAGONAL: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Horse jumps as (dr, dc, leg_dr, leg_dc). The leg is the orthogonal
/// step in the jump's dominant direction.
const HORSE_JUMPS: [(i8, i8, i8, i8); 8] = [
    (-2, -1, -1, 0),
    (-2, 1, -1, 0),
    (2, -1, 1, 0),
    (2, 1, 1, 0),
    (-1, -2, 0, -1),
    (1, -2, 0, -1),
    (-1, 2, 0, 1),
    (1, 2, 0, 1),
];

/// A list of moves for one side.
#[derive(Clone, Debug, Default)]
pub struct MoveList {
    moves: Vec<Move>,
}

impl MoveList {
    /// Creates an empty move list sized for a typical middlegame.
    pub fn new() -> Self {
        Self {
            moves: Vec::with_capacity(64),
        }
    }

    /// Adds a move to the list.
    pub fn push(&mut self, mv: Move) {
        self.moves.push(mv);
    }

    /// Returns the number of moves.
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Returns true if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Returns an iterator over the moves.
    pub fn iter(&self) -> impl Iterator<Item = &Move> {
        self.moves.iter()
    }

}

impl IntoIterator for MoveList {
    type Item = Move;
    type IntoIter = std::vec::IntoIter<Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.into_iter()
    }
}

impl From<MoveList> for Vec<Move> {
    fn from(list: MoveList) -> Self {
        list.moves
    }
}

/// Generates pattern-legal destinations for a piece, ignoring check.
/// Every returned point is on the board by construction.
pub fn raw_moves(board: &Board, piece: &Piece) -> Vec<Position> {
    let mut out = Vec::with_capacity(17);
    match piece.kind {
        PieceKind::General => generate_general_moves(board, piece, &mut out),
        PieceKind::Advisor => generate_advisor_moves(board, piece, &mut out),
        PieceKind::Elephant => generate_elephant_moves(board, piece, &mut out),
        PieceKind::Horse => generate_horse_moves(board, piece, &mut out),
        PieceKind::Chariot => generate_chariot_moves(board, piece, &mut out),
        PieceKind::Cannon => generate_cannon_moves(board, piece, &mut out),
        PieceKind::Soldier => generate_soldier_moves(board, piece, &mut out),
    }
    out
}

/// Raw destinations filtered so that the mover's own General is not left in check.
pub fn legal_moves(board: &Board, piece: &Piece) -> Vec<Position> {
    raw_moves(board, piece)
        .into_iter()
        .filter(|&to| is_safe(board, piece, to))
        .collect()
}

/// Returns true if moving `piece` to `to` keeps its own General out of check.
pub fn is_safe(board: &Board, piece: &Piece, to: Position) -> bool {
    let scratch = board.apply(piece.position, to);
    !is_in_check(&scratch, piece.side)
}

/// Generates every legal move for a side.
pub fn generate_legal_moves(board: &Board, side: Side) -> MoveList {
    let mut moves = MoveList::new();
    for piece in board.pieces(side) {
        for to in legal_moves(board, &piece) {
            moves.push(Move::new(piece, to, board.piece_at(to)));
        }
    }
    moves
}

/// Counts legal moves for a side without building Move records.
pub fn count_legal_moves(board: &Board, side: Side) -> usize {
    board
        .pieces(side)
        .map(|piece| legal_moves(board, &piece).len())
        .sum()
}

/// Returns true as soon as one legal move for the side is found.
pub fn has_legal_moves(board: &Board, side: Side) -> bool {
    board.pieces(side).any(|piece| {
        raw_moves(board, &piece)
            .into_iter()
            .any(|to| is_safe(board, &piece, to))
    })
}

/// Returns true if any piece of `by` has a raw move landing on `square`.
/// This is the single primitive behind both "attacked" and "protected".
pub fn is_attacked_by(board: &Board, square: Position, by: Side) -> bool {
    board
        .pieces(by)
        .any(|piece| raw_moves(board, &piece).contains(&square))
}

/// Returns true if `side` could recapture on `square`, i.e. some other
/// piece of `side` would have a raw move there were it held by an enemy.
pub fn is_protected(board: &Board, square: Position, side: Side) -> bool {
    let mut scratch = board.clone();
    let kind = board
        .piece_at(square)
        .map_or(PieceKind::Soldier, |p| p.kind);
    scratch.place(square, kind, side.opponent());
    is_attacked_by(&scratch, square, side)
}

/// Pushes `to` if it is empty or holds an enemy.
fn push_step(board: &Board, piece: &Piece, to: Position, out: &mut Vec<Position>) {
    if !board.is_side(to, piece.side) {
        out.push(to);
    }
}

/// Generates General moves: one orthogonal step inside the palace.
fn generate_general_moves(board: &Board, piece: &Piece, out: &mut Vec<Position>) {
    for &(dr, dc) in &ORTHOGONAL {
        if let Some(to) = piece.position.offset(dr, dc) {
            if to.in_palace(piece.side) {
                push_step(board, piece, to, out);
            }
        }
    }
}

/// Generates Advisor moves: one diagonal step inside the palace.
fn generate_advisor_moves(board: &Board, piece: &Piece, out: &mut Vec<Position>) {
    for &(dr, dc) in &DIAGONAL {
        if let Some(to) = piece.position.offset(dr, dc) {
            if to.in_palace(piece.side) {
                push_step(board, piece, to, out);
            }
        }
    }
}

/// Generates Elephant moves: two diagonal steps, blocked at the eye,
/// never across the river.
fn generate_elephant_moves(board: &Board, piece: &Piece, out: &mut Vec<Position>) {
    for &(dr, dc) in &DIAGONAL {
        let Some(to) = piece.position.offset(dr * 2, dc * 2) else {
            continue;
        };
        let Some(eye) = piece.position.offset(dr, dc) else {
            continue;
        };
        if to.on_home_side(piece.side) && board.is_empty(eye) {
            push_step(board, piece, to, out);
        }
    }
}

/// Generates Horse moves: the eight L-jumps, each blocked only by its leg.
fn generate_horse_moves(board: &Board, piece: &Piece, out: &mut Vec<Position>) {
    for &(dr, dc, leg_dr, leg_dc) in &HORSE_JUMPS {
        let Some(to) = piece.position.offset(dr, dc) else {
            continue;
        };
        let Some(leg) = piece.position.offset(leg_dr, leg_dc) else {
            continue;
        };
        if board.is_empty(leg) {
            push_step(board, piece, to, out);
        }
    }
}

/// Generates Chariot moves: slide until the first occupied point.
fn generate_chariot_moves(board: &Board, piece: &Piece, out: &mut Vec<Position>) {
    for &(dr, dc) in &ORTHOGONAL {
        let mut current = piece.position;
        while let Some(to) = current.offset(dr, dc) {
            if board.is_empty(to) {
                out.push(to);
            } else {
                if board.is_enemy(to, piece.side) {
                    out.push(to);
                }
                break;
            }
            current = to;
        }
    }
}

/// Generates Cannon moves: slide to empty points, or capture by jumping
/// exactly one screen onto the first piece behind it.
fn generate_cannon_moves(board: &Board, piece: &Piece, out: &mut Vec<Position>) {
    for &(dr, dc) in &ORTHOGONAL {
        let mut current = piece.position;
        let mut screened = false;
        while let Some(to) = current.offset(dr, dc) {
            current = to;
            if !screened {
                if board.is_empty(to) {
                    out.push(to);
                } else {
                    screened = true;
                }
            } else if !board.is_empty(to) {
                if board.is_enemy(to, piece.side) {
                    out.push(to);
                }
                break;
            }
        }
    }
}

/// Generates Soldier moves: straight ahead, plus sideways once across the river.
fn generate_soldier_moves(board: &Board, piece: &Piece, out: &mut Vec<Position>) {
    if let Some(to) = piece.position.offset(piece.side.forward(), 0) {
        push_step(board, piece, to, out);
    }
    if piece.position.across_river(piece.side) {
        for dc in [-1, 1] {
            if let Some(to) = piece.position.offset(0, dc) {
                push_step(board, piece, to, out);
            }
        }
    }
}
