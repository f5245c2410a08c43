use crate::evaluation::evaluate_for;
use crate::heuristic::pick_move;
use crate::search::{iterative_deepening, SearchLimits, SearchResult};
use crate::Agent;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::{Duration, Instant};
use xiangqi_core::{Board, Move, Side};

/// Deepest ply the search will go.
pub const MAX_PLY: u8 = 4;
/// Search scores below this magnitude count as not confident.
const CONFIDENT_SCORE: i32 = 100;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Default)]
pub enum Difficulty {
    Medium,
    #[default]
    Hard,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Mode {
    /// Single-ply scoring with random choice among the best moves.
    Heuristic,
    /// Iterative-deepening minimax.
    Search,
}

impl Difficulty {
    pub const fn mode(self) -> Mode {
        match self {
            Difficulty::Medium => Mode::Heuristic,
            Difficulty::Hard => Mode::Search,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EngineConfig {
    pub difficulty: Difficulty,
    pub time_budget: Duration,
    pub max_depth: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Hard,
            time_budget: Duration::from_millis(2000),
            max_depth: 3,
        }
    }
}

impl EngineConfig {
    pub fn medium() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            ..Self::default()
        }
    }

    pub fn hard() -> Self {
        Self::default()
    }

    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = budget;
        self
    }

    /// Sets the maximum ply, clamped to 1..=MAX_PLY.
    pub fn with_max_depth(mut self, depth: u8) -> Self {
        self.max_depth = depth.clamp(1, MAX_PLY);
        self
    }
}

/// Move-choosing engine. Holds its configuration and its own random source.
pub struct Engine {
    config: EngineConfig,
    rng: StdRng,
    name: String,
}

impl Engine {
    /// Creates an engine seeded from system entropy.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Creates an engine with a fixed seed, for reproducible play.
    pub fn with_seed(config: EngineConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: EngineConfig, rng: StdRng) -> Self {
        let config = config.with_max_depth(config.max_depth);
        let name = match config.difficulty.mode() {
            Mode::Heuristic => "Heuristic".to_string(),
            Mode::Search => format!(
                "Search(depth={}, budget={}ms)",
                config.max_depth,
                config.time_budget.as_millis()
            ),
        };
        Self { config, rng, name }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Chooses a move for `side`. None means the side has no legal move.
    pub fn choose_move(&mut self, board: &Board, side: Side) -> Option<Move> {
        self.search(board, side).best_move
    }

    /// Runs the configured mode and reports how the move was found.
    pub fn search(&mut self, board: &Board, side: Side) -> SearchResult {
        match self.config.difficulty.mode() {
            Mode::Heuristic => self.heuristic(board, side),
            Mode::Search => {
                let limits = SearchLimits::new(self.config.max_depth, self.config.time_budget);
                let result = iterative_deepening(board, side, limits, &mut self.rng);
                if should_fall_back(&result, self.config.time_budget) {
                    info!(
                        "search not confident (score {}, {}ms), using heuristic",
                        result.score,
                        result.elapsed.as_millis()
                    );
                    let mut fallback = self.heuristic(board, side);
                    fallback.nodes = result.nodes;
                    fallback.elapsed += result.elapsed;
                    fallback.fell_back = true;
                    fallback
                } else {
                    result
                }
            }
        }
    }

    fn heuristic(&mut self, board: &Board, side: Side) -> SearchResult {
        let start = Instant::now();
        let best_move = pick_move(board, side, &mut self.rng);
        let score = best_move.map_or(0, |mv| evaluate_for(&board.apply_move(&mv), side));
        SearchResult {
            best_move,
            score,
            elapsed: start.elapsed(),
            ..SearchResult::default()
        }
    }
}

/// No move at all, or the budget ran out without a confident score.
fn should_fall_back(result: &SearchResult, budget: Duration) -> bool {
    if result.best_move.is_none() {
        return true;
    }
    let budget_spent = result.elapsed >= budget.mul_f64(0.9);
    budget_spent && result.score.abs() < CONFIDENT_SCORE
}

impl Agent for Engine {
    fn best_move(&mut self, board: &Board, side: Side) -> Option<Move> {
        self.choose_move(board, side)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
