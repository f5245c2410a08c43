use log::trace;
use xiangqi_core::{
    is_attacked_by, is_in_check, is_protected, legal_moves, raw_moves, Board, Piece, PieceKind,
    Position, Side,
};

/// Weight per legal destination.
const MOBILITY_WEIGHT: i32 = 10;
/// Penalty for a side standing in check.
const CHECK_PENALTY: i32 = 200;
/// Reachable enemy material is divided by this before netting.
const THREAT_DIVISOR: i32 = 8;

/// Static evaluation in centi-soldiers. Positive scores favour Red.
pub fn evaluate(board: &Board) -> i32 {
    let pieces: i32 = board
        .all_pieces()
        .map(|piece| piece.side.sign() * piece_score(board, &piece))
        .sum();
    pieces + tactics(board)
}

/// Evaluates a board from the given side's perspective.
pub fn evaluate_for(board: &Board, side: Side) -> i32 {
    side.sign() * evaluate(board)
}

/// Position evaluation trait for boards used by the search.
pub trait Evaluatable {
    fn evaluate(&self) -> i32;
    fn evaluate_for(&self, side: Side) -> i32;
}

impl Evaluatable for Board {
    fn evaluate(&self) -> i32 {
        evaluate(self)
    }

    fn evaluate_for(&self, side: Side) -> i32 {
        evaluate_for(self, side)
    }
}

/// Material, placement, mobility and safety of one piece, from its owner's view.
fn piece_score(board: &Board, piece: &Piece) -> i32 {
    let mobility = legal_moves(board, piece).len() as i32 * MOBILITY_WEIGHT;
    piece.kind.value() + placement(piece.kind, piece.side, piece.position) + mobility
        + safety(board, piece)
}

/// Piece-square bonus. Rows are normalised so both sides share the table.
pub(crate) fn placement(kind: PieceKind, side: Side, pos: Position) -> i32 {
    let centre = 4 - pos.center_distance() as i32;
    match kind {
        PieceKind::Soldier if pos.across_river(side) => 50 + 10 * centre,
        PieceKind::Horse | PieceKind::Cannon => {
            let mut score = 10 * centre;
            if (3..=6).contains(&pos.relative_row(side)) {
                score += 20;
            }
            score
        }
        _ => 0,
    }
}

/// Value at stake when a piece is left hanging. The General is covered by the check term.
pub(crate) fn exposure_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::General => 0,
        _ => kind.value(),
    }
}

fn safety(board: &Board, piece: &Piece) -> i32 {
    let value = exposure_value(piece.kind);
    if value == 0 {
        return 0;
    }

    let mut score = 0;
    if is_attacked_by(board, piece.position, piece.side.opponent()) {
        score -= value;
    }
    if is_protected(board, piece.position, piece.side) {
        score += value / 4;
    }
    score
}

/// Sum of enemy material that `side` could take with a raw move, Generals excluded.
pub(crate) fn threatened_material(board: &Board, side: Side) -> i32 {
    board
        .pieces(side)
        .flat_map(|piece| raw_moves(board, &piece))
        .filter_map(|to| board.piece_at(to))
        .filter(|victim| victim.side != side)
        .map(|victim| exposure_value(victim.kind))
        .sum()
}

/// Board-wide check and threat term, Red minus Black.
fn tactics(board: &Board) -> i32 {
    let mut score = 0;
    if is_in_check(board, Side::Red) {
        score -= CHECK_PENALTY;
    }
    if is_in_check(board, Side::Black) {
        score += CHECK_PENALTY;
    }

    let threats =
        (threatened_material(board, Side::Red) - threatened_material(board, Side::Black))
            / THREAT_DIVISOR;
    trace!("tactics: check {score}, threats {threats}");
    score + threats
}
