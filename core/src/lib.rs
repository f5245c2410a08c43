pub mod board;
pub mod check;
pub mod fen;
pub mod move_gen;
pub mod perft;
pub mod types;

pub use board::*;
pub use check::*;
pub use fen::{parse_fen, positions, to_fen, FenError};
pub use move_gen::*;
pub use perft::{perft, perft_detailed, perft_divide, PerftResults};
pub use types::*;
