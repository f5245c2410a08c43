use crate::board::Board;
use crate::move_gen::{has_legal_moves, raw_moves};
use crate::types::Side;
use std::fmt;

/// How a finished game ended.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    RedWins,
    BlackWins,
    /// The side to move has no legal moves but is not in check.
    Draw,
}

impl Outcome {
    /// The winning side, if any.
    pub const fn winner(self) -> Option<Side> {
        match self {
            Outcome::RedWins => Some(Side::Red),
            Outcome::BlackWins => Some(Side::Black),
            Outcome::Draw => None,
        }
    }

    const fn win_for(side: Side) -> Self {
        match side {
            Side::Red => Outcome::RedWins,
            Side::Black => Outcome::BlackWins,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::RedWins => write!(f, "Red wins by checkmate"),
            Outcome::BlackWins => write!(f, "Black wins by checkmate"),
            Outcome::Draw => write!(f, "draw: side to move has no legal moves"),
        }
    }
}

/// Returns true if the side's General is attacked, if the two Generals
/// face each other on an open file, or if the General is missing.
pub fn is_in_check(board: &Board, side: Side) -> bool {
    let Some(general) = board.general(side) else {
        return true;
    };

    let attacked = board
        .pieces(side.opponent())
        .any(|piece| raw_moves(board, &piece).contains(&general));

    attacked || generals_facing(board)
}

/// Returns true if both Generals stand on the same file with nothing between them.
pub fn generals_facing(board: &Board) -> bool {
    let (Some(red), Some(black)) = (board.general(Side::Red), board.general(Side::Black)) else {
        return false;
    };
    red.col() == black.col() && board.count_between(red, black) == Some(0)
}

/// Checks if the side is in check with no legal reply.
pub fn is_checkmate(board: &Board, side: Side) -> bool {
    is_in_check(board, side) && !has_legal_moves(board, side)
}

/// Checks if the side has no legal moves while not in check.
pub fn is_stalemate(board: &Board, side: Side) -> bool {
    !is_in_check(board, side) && !has_legal_moves(board, side)
}

/// Decides whether the game is over with `side_to_move` on turn.
/// No legal moves without check counts as a draw.
pub fn outcome(board: &Board, side_to_move: Side) -> Option<Outcome> {
    if has_legal_moves(board, side_to_move) {
        return None;
    }
    if is_in_check(board, side_to_move) {
        Some(Outcome::win_for(side_to_move.opponent()))
    } else {
        Some(Outcome::Draw)
    }
}
