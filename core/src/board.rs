use crate::types::*;
use std::fmt;

/// Board representation: a flat value-type array of 90 intersections.
/// Speculative moves always work on a clone, never on the caller's board.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Board {
    /// Indexed by Position::index()
    cells: [Option<Piece>; SQUARES],
}

impl Default for Board {
    fn default() -> Self {
        Self::starting_position()
    }
}

impl Board {
    /// Creates an empty board.
    pub const fn empty() -> Self {
        Self {
            cells: [None; SQUARES],
        }
    }

    /// Creates the standard opening placement. Black occupies rows 0-4.
    pub fn starting_position() -> Self {
        const BACK_RANK: [PieceKind; 9] = [
            PieceKind::Chariot,
            PieceKind::Horse,
            PieceKind::Elephant,
            PieceKind::Advisor,
            PieceKind::General,
            PieceKind::Advisor,
            PieceKind::Elephant,
            PieceKind::Horse,
            PieceKind::Chariot,
        ];

        let mut board = Self::empty();
        for (side, back, cannons, soldiers) in [(Side::Black, 0, 2, 3), (Side::Red, 9, 7, 6)] {
            for (col, kind) in BACK_RANK.iter().enumerate() {
                board.put(back, col as u8, *kind, side);
            }
            board.put(cannons, 1, PieceKind::Cannon, side);
            board.put(cannons, 7, PieceKind::Cannon, side);
            for col in (0..COLS).step_by(2) {
                board.put(soldiers, col, PieceKind::Soldier, side);
            }
        }
        board
    }

    // Coordinates here are compile-time constants inside the board.
    fn put(&mut self, row: u8, col: u8, kind: PieceKind, side: Side) {
        if let Some(pos) = Position::new(row, col) {
            self.place(pos, kind, side);
        }
    }

    /// Gets the piece at the given point.
    pub fn piece_at(&self, pos: Position) -> Option<Piece> {
        self.cells[pos.index()]
    }

    /// Places a piece, replacing whatever stood there.
    pub fn place(&mut self, pos: Position, kind: PieceKind, side: Side) {
        self.cells[pos.index()] = Some(Piece::new(kind, side, pos));
    }

    /// Removes the piece at the given point, returning it.
    pub fn clear(&mut self, pos: Position) -> Option<Piece> {
        self.cells[pos.index()].take()
    }

    /// Returns true if the point is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.cells[pos.index()].is_none()
    }

    /// Returns true if the point holds a piece of the given side.
    pub fn is_side(&self, pos: Position, side: Side) -> bool {
        matches!(self.cells[pos.index()], Some(p) if p.side == side)
    }

    /// Returns true if the point holds a piece of the opposing side.
    pub fn is_enemy(&self, pos: Position, side: Side) -> bool {
        self.is_side(pos, side.opponent())
    }

    /// Iterates over every piece on the board.
    pub fn all_pieces(&self) -> impl Iterator<Item = Piece> + '_ {
        self.cells.iter().filter_map(|cell| *cell)
    }

    /// Iterates over the pieces of one side.
    pub fn pieces(&self, side: Side) -> impl Iterator<Item = Piece> + '_ {
        self.all_pieces().filter(move |p| p.side == side)
    }

    /// Locates the General of the given side, if it is still on the board.
    pub fn general(&self, side: Side) -> Option<Position> {
        self.pieces(side)
            .find(|p| p.kind == PieceKind::General)
            .map(|p| p.position)
    }

    /// Moves a piece in place. The destination is overwritten.
    /// Returns the captured piece, if any.
    pub fn move_piece(&mut self, from: Position, to: Position) -> Option<Piece> {
        let moving = self.cells[from.index()].take();
        let captured = self.cells[to.index()];
        self.cells[to.index()] = moving.map(|p| p.at(to));
        captured
    }

    /// Applies a move to this board in place. Intended for the caller's
    /// authoritative board once a move has been chosen.
    pub fn make_move(&mut self, mv: &Move) -> Option<Piece> {
        self.move_piece(mv.from, mv.to)
    }

    /// Returns a fresh board with the move applied; `self` is untouched.
    pub fn apply_move(&self, mv: &Move) -> Self {
        self.apply(mv.from, mv.to)
    }

    /// Returns a fresh board with the piece on `from` moved to `to`.
    pub fn apply(&self, from: Position, to: Position) -> Self {
        let mut next = self.clone();
        next.move_piece(from, to);
        next
    }

    /// Counts pieces strictly between two points on the same line.
    /// Returns None if the points do not share a row or column.
    pub fn count_between(&self, a: Position, b: Position) -> Option<usize> {
        if a.row() == b.row() {
            let (low, high) = (a.col().min(b.col()), a.col().max(b.col()));
            Some(
                (low + 1..high)
                    .filter_map(|col| Position::new(a.row(), col))
                    .filter(|&p| !self.is_empty(p))
                    .count(),
            )
        } else if a.col() == b.col() {
            let (low, high) = (a.row().min(b.row()), a.row().max(b.row()));
            Some(
                (low + 1..high)
                    .filter_map(|row| Position::new(row, a.col()))
                    .filter(|&p| !self.is_empty(p))
                    .count(),
            )
        } else {
            None
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..ROWS {
            write!(f, "{row} ")?;
            for col in 0..COLS {
                match Position::new(row, col).and_then(|p| self.piece_at(p)) {
                    Some(piece) => write!(f, "{} ", piece.fen_char())?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
            if row == 4 {
                writeln!(f, "  ~~~~~~~~~~~~~~~~~")?;
            }
        }
        write!(f, " ")?;
        for file in 'a'..='i' {
            write!(f, " {file}")?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: u8, col: u8) -> Position {
        Position::new(row, col).unwrap()
    }

    #[test]
    fn test_starting_position_layout() {
        let board = Board::starting_position();
        assert_eq!(board.all_pieces().count(), 32);
        assert_eq!(board.pieces(Side::Red).count(), 16);
        assert_eq!(board.general(Side::Red), Some(pos(9, 4)));
        assert_eq!(board.general(Side::Black), Some(pos(0, 4)));
        assert_eq!(
            board.piece_at(pos(7, 1)).map(|p| (p.kind, p.side)),
            Some((PieceKind::Cannon, Side::Red))
        );
        assert_eq!(
            board.piece_at(pos(3, 8)).map(|p| (p.kind, p.side)),
            Some((PieceKind::Soldier, Side::Black))
        );
    }

    #[test]
    fn test_stored_positions_match_cells() {
        let board = Board::starting_position();
        for index in 0..SQUARES {
            let square = Position::from_index(index).unwrap();
            if let Some(piece) = board.piece_at(square) {
                assert_eq!(piece.position, square);
            }
        }
    }

    #[test]
    fn test_apply_leaves_original_untouched() {
        let board = Board::starting_position();
        let next = board.apply(pos(7, 1), pos(7, 4));
        assert!(board.is_empty(pos(7, 4)));
        assert!(next.is_empty(pos(7, 1)));
        assert_eq!(next.piece_at(pos(7, 4)).map(|p| p.position), Some(pos(7, 4)));
    }

    #[test]
    fn test_move_piece_returns_capture() {
        let mut board = Board::starting_position();
        let captured = board.move_piece(pos(7, 1), pos(0, 1));
        assert_eq!(captured.map(|p| p.kind), Some(PieceKind::Horse));
        assert_eq!(board.piece_at(pos(0, 1)).map(|p| p.kind), Some(PieceKind::Cannon));
    }

    #[test]
    fn test_count_between() {
        let board = Board::starting_position();
        // the e3 and e6 soldiers stand between the generals
        assert_eq!(board.count_between(pos(0, 4), pos(9, 4)), Some(2));
        assert_eq!(board.count_between(pos(0, 0), pos(0, 8)), Some(7));
        assert_eq!(board.count_between(pos(0, 0), pos(1, 1)), None);
    }
}
