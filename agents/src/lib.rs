pub mod engine;
pub mod evaluation;
pub mod heuristic;
pub mod search;

use xiangqi_core::{Board, Move, Side};

/// A move-choosing player.
pub trait Agent {
    /// Gets the move to play for `side`, or None if it has no legal move.
    fn best_move(&mut self, board: &Board, side: Side) -> Option<Move>;

    /// Gets the agent's name.
    fn name(&self) -> &str;
}

pub use engine::{Difficulty, Engine, EngineConfig, Mode, MAX_PLY};
pub use evaluation::{evaluate, evaluate_for, Evaluatable};
pub use search::{iterative_deepening, SearchLimits, SearchResult, DECISIVE_SCORE, MATE_SCORE};
