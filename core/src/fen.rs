use crate::board::Board;
use crate::types::{PieceKind, Position, Side, COLS, ROWS};
use thiserror::Error;

/// Errors from parsing Xiangqi FEN. The first rank in the string is row 0,
/// Black's back rank. Uppercase is Red.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("invalid FEN format: {0}")]
    InvalidFormat(String),
    #[error("expected 10 ranks, got {0}")]
    RankCount(usize),
    #[error("rank {rank} has {width} points, expected 9")]
    RankWidth { rank: usize, width: usize },
    #[error("invalid piece character: '{0}'")]
    InvalidPiece(char),
    #[error("invalid side to move: {0}")]
    InvalidSide(String),
}

/// Named positions used by tests and the command-line driver.
pub mod positions {
    /// The standard opening placement, Red to move.
    pub const STARTING: &str = "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR w";

    /// Red chariot and horse against a bare general and advisor.
    pub const CHARIOT_HORSE_ENDGAME: &str = "3ak4/9/9/9/9/9/9/3N1R3/4A4/4K4 w";

    /// Red can mate in one: the chariot lands on the black back rank.
    pub const MATE_IN_ONE: &str = "4k4/9/4P4/9/9/9/9/9/9/R3K4 w";

    /// Starting position perft values.
    pub const STARTING_PERFT: &[(u8, u64)] = &[(1, 44), (2, 1_920), (3, 79_666)];
}

impl Board {
    /// Parses only the placement field of a FEN string.
    pub fn from_fen_placement(placement: &str) -> Result<Self, FenError> {
        let mut board = Board::empty();
        let ranks: Vec<&str> = placement.split('/').collect();

        if ranks.len() != ROWS as usize {
            return Err(FenError::RankCount(ranks.len()));
        }

        for (row, rank_str) in ranks.iter().enumerate() {
            let mut col = 0usize;
            for ch in rank_str.chars() {
                if let Some(empty) = ch.to_digit(10) {
                    col += empty as usize;
                    continue;
                }
                let kind = PieceKind::from_fen_char(ch).ok_or(FenError::InvalidPiece(ch))?;
                let side = if ch.is_ascii_uppercase() {
                    Side::Red
                } else {
                    Side::Black
                };
                let pos = Position::new(row as u8, col as u8).ok_or(FenError::RankWidth {
                    rank: row,
                    width: col + 1,
                })?;
                board.place(pos, kind, side);
                col += 1;
            }

            if col != COLS as usize {
                return Err(FenError::RankWidth {
                    rank: row,
                    width: col,
                });
            }
        }

        Ok(board)
    }

    /// Serializes the placement field.
    pub fn to_fen_placement(&self) -> String {
        let mut fen = String::new();

        for row in 0..ROWS {
            let mut empty = 0;
            for col in 0..COLS {
                match Position::new(row, col).and_then(|p| self.piece_at(p)) {
                    Some(piece) => {
                        if empty > 0 {
                            fen.push_str(&empty.to_string());
                            empty = 0;
                        }
                        fen.push(piece.fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push_str(&empty.to_string());
            }
            if row + 1 < ROWS {
                fen.push('/');
            }
        }

        fen
    }
}

/// Parses a FEN string into a board and the side to move.
/// The side field is optional and defaults to Red; trailing fields are ignored.
pub fn parse_fen(fen: &str) -> Result<(Board, Side), FenError> {
    let mut parts = fen.split_whitespace();
    let placement = parts
        .next()
        .ok_or_else(|| FenError::InvalidFormat("empty string".to_string()))?;
    let board = Board::from_fen_placement(placement)?;

    let side = match parts.next() {
        None | Some("w") | Some("r") => Side::Red,
        Some("b") => Side::Black,
        Some(other) => return Err(FenError::InvalidSide(other.to_string())),
    };

    Ok((board, side))
}

/// Converts a board and side to move into a FEN string.
pub fn to_fen(board: &Board, side: Side) -> String {
    let side = match side {
        Side::Red => 'w',
        Side::Black => 'b',
    };
    format!("{} {}", board.to_fen_placement(), side)
}
