use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::QueueableCommand;
use std::io::{self, Write};
use xiangqi_core::{is_in_check, Board, Position, Side, COLS, ROWS};

const FILES: &str = "  a b c d e f g h i\n";

/// Draws the board with traditional glyphs. Red pieces are coloured red.
pub fn print_board(board: &Board, out: &mut impl Write) -> io::Result<()> {
    out.queue(Print(FILES))?;

    for row in 0..ROWS {
        out.queue(Print(format!("{row} ")))?;
        for col in 0..COLS {
            match Position::new(row, col).and_then(|p| board.piece_at(p)) {
                Some(piece) => {
                    let color = match piece.side {
                        Side::Red => Color::Red,
                        Side::Black => Color::White,
                    };
                    out.queue(SetForegroundColor(color))?
                        .queue(Print(piece.glyph()))?
                        .queue(ResetColor)?;
                }
                None => {
                    out.queue(Print('＋'))?;
                }
            }
        }
        out.queue(Print(format!(" {row}\n")))?;

        if row == 4 {
            out.queue(Print("  ～～ 楚河  漢界 ～～\n"))?;
        }
    }

    out.queue(Print(FILES))?;
    out.flush()
}

/// Prints whose turn it is and whether they stand in check.
pub fn print_status(board: &Board, side: Side, out: &mut impl Write) -> io::Result<()> {
    write!(out, "{side} to move")?;
    if is_in_check(board, side) {
        write!(out, " (check)")?;
    }
    writeln!(out)
}
