use std::fmt;

/// Number of ranks (rows) on the board.
pub const ROWS: u8 = 10;
/// Number of files (columns) on the board.
pub const COLS: u8 = 9;
/// Total number of intersections.
pub const SQUARES: usize = ROWS as usize * COLS as usize;
/// The centre file, home of both Generals.
pub const CENTER_COL: u8 = 4;

/// Represents one of the two players.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Side {
    Red,
    Black,
}

impl Side {
    /// Returns the opposite side.
    pub const fn opponent(self) -> Self {
        match self {
            Side::Red => Side::Black,
            Side::Black => Side::Red,
        }
    }

    /// Returns the row direction soldiers of this side advance in.
    /// Red starts at the bottom (rows 5-9) and moves toward row 0.
    pub const fn forward(self) -> i8 {
        match self {
            Side::Red => -1,
            Side::Black => 1,
        }
    }

    /// Returns the inclusive row range of this side's palace.
    pub const fn palace_rows(self) -> (u8, u8) {
        match self {
            Side::Red => (7, 9),
            Side::Black => (0, 2),
        }
    }

    /// Returns the inclusive row range of this side's half of the board.
    pub const fn home_rows(self) -> (u8, u8) {
        match self {
            Side::Red => (5, 9),
            Side::Black => (0, 4),
        }
    }

    /// +1 for Red, -1 for Black; converts absolute scores to this side's view.
    pub const fn sign(self) -> i32 {
        match self {
            Side::Red => 1,
            Side::Black => -1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Red => write!(f, "Red"),
            Side::Black => write!(f, "Black"),
        }
    }
}

/// The seven kinds of Xiangqi pieces.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum PieceKind {
    General,
    Advisor,
    Elephant,
    Horse,
    Chariot,
    Cannon,
    Soldier,
}

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        PieceKind::General,
        PieceKind::Advisor,
        PieceKind::Elephant,
        PieceKind::Horse,
        PieceKind::Chariot,
        PieceKind::Cannon,
        PieceKind::Soldier,
    ];

    /// Returns the material value of this kind in centi-soldiers.
    /// The General is priced far above everything else and stands in for mate.
    pub const fn value(self) -> i32 {
        match self {
            PieceKind::General => 100_000,
            PieceKind::Advisor => 200,
            PieceKind::Elephant => 200,
            PieceKind::Horse => 400,
            PieceKind::Chariot => 900,
            PieceKind::Cannon => 450,
            PieceKind::Soldier => 100,
        }
    }

    /// Returns the lowercase FEN letter for this kind.
    pub const fn fen_char(self) -> char {
        match self {
            PieceKind::General => 'k',
            PieceKind::Advisor => 'a',
            PieceKind::Elephant => 'b',
            PieceKind::Horse => 'n',
            PieceKind::Chariot => 'r',
            PieceKind::Cannon => 'c',
            PieceKind::Soldier => 'p',
        }
    }

    /// Parses a FEN letter of either case. Accepts the `e`/`h` aliases.
    pub const fn from_fen_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'k' => Some(PieceKind::General),
            'a' => Some(PieceKind::Advisor),
            'b' | 'e' => Some(PieceKind::Elephant),
            'n' | 'h' => Some(PieceKind::Horse),
            'r' => Some(PieceKind::Chariot),
            'c' => Some(PieceKind::Cannon),
            'p' => Some(PieceKind::Soldier),
            _ => None,
        }
    }
}

/// A point on the 10x9 board. Always in bounds.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Position {
    row: u8,
    col: u8,
}

impl Position {
    /// Creates a position, returning None if it falls off the board.
    pub const fn new(row: u8, col: u8) -> Option<Self> {
        if row < ROWS && col < COLS {
            Some(Position { row, col })
        } else {
            None
        }
    }

    /// Creates a position from a flat index (row * 9 + col).
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < SQUARES {
            Some(Position {
                row: (index / COLS as usize) as u8,
                col: (index % COLS as usize) as u8,
            })
        } else {
            None
        }
    }

    pub const fn row(self) -> u8 {
        self.row
    }

    pub const fn col(self) -> u8 {
        self.col
    }

    /// Returns the flat index into the board array.
    pub const fn index(self) -> usize {
        self.row as usize * COLS as usize + self.col as usize
    }

    /// Returns the position shifted by the given deltas, if it stays on the board.
    pub const fn offset(self, dr: i8, dc: i8) -> Option<Self> {
        let row = self.row as i8 + dr;
        let col = self.col as i8 + dc;
        if row >= 0 && row < ROWS as i8 && col >= 0 && col < COLS as i8 {
            Some(Position {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    /// Returns true if this point lies inside the given side's palace.
    pub const fn in_palace(self, side: Side) -> bool {
        let (low, high) = side.palace_rows();
        self.row >= low && self.row <= high && self.col >= 3 && self.col <= 5
    }

    /// Returns true if this point is on the given side's half of the river.
    pub const fn on_home_side(self, side: Side) -> bool {
        let (low, high) = side.home_rows();
        self.row >= low && self.row <= high
    }

    /// Returns true if this point is past the river from the given side's view.
    pub const fn across_river(self, side: Side) -> bool {
        !self.on_home_side(side)
    }

    /// Distance from the centre file.
    pub const fn center_distance(self) -> u8 {
        self.col.abs_diff(CENTER_COL)
    }

    /// Row counted from the given side's back rank (0 = own back rank).
    pub const fn relative_row(self, side: Side) -> u8 {
        match side {
            Side::Red => ROWS - 1 - self.row,
            Side::Black => self.row,
        }
    }

    /// Parses coordinates such as `e9` (file letter, row digit).
    pub fn parse(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        let file = chars.next()?.to_ascii_lowercase();
        let row = chars.next()?.to_digit(10)?;
        if chars.next().is_some() || !('a'..='i').contains(&file) {
            return None;
        }
        Position::new(row as u8, file as u8 - b'a')
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.col) as char, self.row)
    }
}

/// A piece on the board. `position` always matches the square it is stored on.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub side: Side,
    pub position: Position,
}

impl Piece {
    pub const fn new(kind: PieceKind, side: Side, position: Position) -> Self {
        Self {
            kind,
            side,
            position,
        }
    }

    /// Returns a copy of this piece standing on another point.
    pub const fn at(self, position: Position) -> Self {
        Self { position, ..self }
    }

    /// FEN letter, uppercase for Red.
    pub const fn fen_char(self) -> char {
        let c = self.kind.fen_char();
        match self.side {
            Side::Red => c.to_ascii_uppercase(),
            Side::Black => c,
        }
    }

    /// Traditional glyph for board diagrams.
    pub const fn glyph(self) -> char {
        match (self.side, self.kind) {
            (Side::Red, PieceKind::General) => '帥',
            (Side::Red, PieceKind::Advisor) => '仕',
            (Side::Red, PieceKind::Elephant) => '相',
            (Side::Red, PieceKind::Horse) => '傌',
            (Side::Red, PieceKind::Chariot) => '俥',
            (Side::Red, PieceKind::Cannon) => '炮',
            (Side::Red, PieceKind::Soldier) => '兵',
            (Side::Black, PieceKind::General) => '將',
            (Side::Black, PieceKind::Advisor) => '士',
            (Side::Black, PieceKind::Elephant) => '象',
            (Side::Black, PieceKind::Horse) => '馬',
            (Side::Black, PieceKind::Chariot) => '車',
            (Side::Black, PieceKind::Cannon) => '砲',
            (Side::Black, PieceKind::Soldier) => '卒',
        }
    }
}

/// A move with snapshots of the mover and the captured piece.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Move {
    pub from: Position,
    pub to: Position,
    pub piece: Piece,
    pub captured: Option<Piece>,
}

impl Move {
    pub const fn new(piece: Piece, to: Position, captured: Option<Piece>) -> Self {
        Self {
            from: piece.position,
            to,
            piece,
            captured,
        }
    }

    pub const fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    /// Same origin and destination, ignoring snapshots.
    pub fn same_squares(&self, other: &Move) -> bool {
        self.from == other.from && self.to == other.to
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}
