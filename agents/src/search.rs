use crate::evaluation::{placement, Evaluatable};
use log::debug;
use rand::Rng;
use std::time::{Duration, Instant};
use xiangqi_core::{
    generate_legal_moves, has_legal_moves, is_in_check, Board, Move, MoveList, PieceKind, Side,
};

/// Score of delivering mate at the root; reduced by one per ply.
pub const MATE_SCORE: i32 = 1_000_000;
/// Scores at or beyond this magnitude end the iterative loop early.
pub const DECISIVE_SCORE: i32 = MATE_SCORE / 2;
const DRAW_SCORE: i32 = 0;
const INFINITY: i32 = 2 * MATE_SCORE;

#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    pub score: i32,
    pub depth: u8,
    pub nodes: u64,
    pub elapsed: Duration,
    /// True if the move came from the heuristic picker instead of the search.
    pub fell_back: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct SearchLimits {
    pub max_depth: u8,
    pub move_time: Duration,
}

impl SearchLimits {
    pub fn depth(depth: u8) -> Self {
        Self {
            max_depth: depth,
            move_time: Duration::MAX,
        }
    }

    pub fn new(depth: u8, move_time: Duration) -> Self {
        Self {
            max_depth: depth,
            move_time,
        }
    }
}

/// Per-search state: the maximizing side, node counter and tie-break source.
pub struct SearchInfo<'a, R: Rng + ?Sized> {
    engine: Side,
    nodes: u64,
    rng: &'a mut R,
}

impl<'a, R: Rng + ?Sized> SearchInfo<'a, R> {
    pub fn new(engine: Side, rng: &'a mut R) -> Self {
        Self {
            engine,
            nodes: 0,
            rng,
        }
    }

    pub fn nodes(&self) -> u64 {
        self.nodes
    }
}

enum Node {
    Terminal(i32),
    Expand(MoveList),
}

/// Mate score from the engine's view for `mated` being mated `ply` plies from the root.
fn mate_score(mated: Side, engine: Side, ply: u8) -> i32 {
    let score = MATE_SCORE - i32::from(ply);
    if mated == engine {
        -score
    } else {
        score
    }
}

/// Generates the mover's replies, or scores the node if either side is stuck.
fn expand(board: &Board, mover: Side, engine: Side, ply: u8) -> Node {
    let moves = generate_legal_moves(board, mover);
    let stuck = if moves.is_empty() {
        Some(mover)
    } else if !has_legal_moves(board, mover.opponent()) {
        Some(mover.opponent())
    } else {
        None
    };

    match stuck {
        Some(side) if is_in_check(board, side) => Node::Terminal(mate_score(side, engine, ply)),
        Some(_) => Node::Terminal(DRAW_SCORE),
        None => Node::Expand(moves),
    }
}

/// Minimax with alpha-beta pruning, scored from the engine's view.
/// The engine maximizes; depth 0 returns the static evaluation without recursing.
pub fn minimax<R: Rng + ?Sized>(
    board: &Board,
    depth: u8,
    ply: u8,
    mut alpha: i32,
    mut beta: i32,
    maximizing: bool,
    info: &mut SearchInfo<'_, R>,
) -> i32 {
    info.nodes += 1;

    if depth == 0 {
        return board.evaluate_for(info.engine);
    }

    let mover = if maximizing {
        info.engine
    } else {
        info.engine.opponent()
    };
    let moves = match expand(board, mover, info.engine, ply) {
        Node::Terminal(score) => return score,
        Node::Expand(moves) => order_moves(board, moves.into(), info.rng),
    };

    if maximizing {
        let mut best = -INFINITY;
        for mv in &moves {
            let score = minimax(&board.apply_move(mv), depth - 1, ply + 1, alpha, beta, false, info);
            best = best.max(score);
            alpha = alpha.max(score);
            if beta <= alpha {
                break;
            }
        }
        best
    } else {
        let mut best = INFINITY;
        for mv in &moves {
            let score = minimax(&board.apply_move(mv), depth - 1, ply + 1, alpha, beta, true, info);
            best = best.min(score);
            beta = beta.min(score);
            if beta <= alpha {
                break;
            }
        }
        best
    }
}

/// One full-width pass at the given depth. Returns the best score and move.
fn search_root<R: Rng + ?Sized>(
    board: &Board,
    depth: u8,
    info: &mut SearchInfo<'_, R>,
) -> (i32, Option<Move>) {
    info.nodes += 1;

    let moves = match expand(board, info.engine, info.engine, 0) {
        Node::Terminal(score) => return (score, None),
        Node::Expand(moves) => order_moves(board, moves.into(), info.rng),
    };

    let mut alpha = -INFINITY;
    let mut best_score = -INFINITY;
    let mut best_move = None;

    for mv in &moves {
        let score = minimax(&board.apply_move(mv), depth - 1, 1, alpha, INFINITY, false, info);
        if score > best_score {
            best_score = score;
            best_move = Some(*mv);
        }
        alpha = alpha.max(score);
    }

    (best_score, best_move)
}

/// Iterative deepening from depth 1. The time budget is only checked between
/// depths, so depth 1 always completes and a running pass is never cut short.
pub fn iterative_deepening<R: Rng + ?Sized>(
    board: &Board,
    side: Side,
    limits: SearchLimits,
    rng: &mut R,
) -> SearchResult {
    let start = Instant::now();
    let mut info = SearchInfo::new(side, rng);
    let mut result = SearchResult::default();

    for depth in 1..=limits.max_depth {
        if depth > 1 && start.elapsed() >= limits.move_time {
            debug!("time budget spent after depth {}", depth - 1);
            break;
        }

        let (score, best_move) = search_root(board, depth, &mut info);
        let Some(mv) = best_move else {
            break;
        };

        result.best_move = Some(mv);
        result.score = score;
        result.depth = depth;
        debug!(
            "depth {depth}: {mv} score {score} nodes {} time {}ms",
            info.nodes,
            start.elapsed().as_millis()
        );

        if score.abs() >= DECISIVE_SCORE {
            break;
        }
    }

    result.nodes = info.nodes();
    result.elapsed = start.elapsed();
    result
}

/// Ordering priority in tenths of a soldier.
fn move_priority<R: Rng + ?Sized>(board: &Board, mv: &Move, rng: &mut R) -> i32 {
    let mut priority = 0;

    if let Some(victim) = mv.captured {
        priority += victim.kind.value();
        priority += match victim.kind {
            PieceKind::General => 10_000,
            PieceKind::Chariot => 500,
            PieceKind::Cannon => 300,
            PieceKind::Horse => 200,
            _ => 0,
        };
        if victim.kind != PieceKind::Soldier {
            priority += victim.kind.value() / 10;
        }
    }

    let opponent = mv.piece.side.opponent();
    if is_in_check(&board.apply_move(mv), opponent) {
        priority += 1_000;
    }

    if matches!(mv.piece.kind, PieceKind::General | PieceKind::Chariot) {
        priority += 5;
    }

    priority *= 10;
    priority += placement(mv.piece.kind, mv.piece.side, mv.to) / 10;
    priority += 3 * (4 - mv.to.center_distance() as i32);
    priority + rng.gen_range(0..20)
}

/// Collapses duplicate from/to pairs, then sorts by descending priority.
pub fn order_moves<R: Rng + ?Sized>(board: &Board, moves: Vec<Move>, rng: &mut R) -> Vec<Move> {
    let mut unique: Vec<Move> = Vec::with_capacity(moves.len());
    for mv in moves {
        if !unique.iter().any(|m| m.same_squares(&mv)) {
            unique.push(mv);
        }
    }

    unique.sort_by_cached_key(|mv| -move_priority(board, mv, rng));
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::evaluate_for;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use xiangqi_core::{parse_fen, positions, Position};

    /// Plain minimax without pruning, for comparison.
    fn full_minimax(board: &Board, depth: u8, ply: u8, maximizing: bool, engine: Side) -> i32 {
        if depth == 0 {
            return evaluate_for(board, engine);
        }
        let mover = if maximizing { engine } else { engine.opponent() };
        let moves = match expand(board, mover, engine, ply) {
            Node::Terminal(score) => return score,
            Node::Expand(moves) => moves,
        };
        let scores = moves
            .iter()
            .map(|mv| full_minimax(&board.apply_move(mv), depth - 1, ply + 1, !maximizing, engine));
        if maximizing {
            scores.max().unwrap()
        } else {
            scores.min().unwrap()
        }
    }

    #[test]
    fn test_depth_zero_is_static_eval() {
        let board = Board::starting_position();
        let mut rng = StdRng::seed_from_u64(0);
        let mut info = SearchInfo::new(Side::Black, &mut rng);
        let score = minimax(&board, 0, 0, -INFINITY, INFINITY, true, &mut info);
        assert_eq!(score, evaluate_for(&board, Side::Black));
        assert_eq!(info.nodes(), 1);
    }

    #[test]
    fn test_alpha_beta_matches_full_minimax() {
        for (fen, depth) in [(positions::CHARIOT_HORSE_ENDGAME, 3), (positions::MATE_IN_ONE, 2)] {
            let (board, side) = parse_fen(fen).unwrap();
            let mut rng = StdRng::seed_from_u64(9);
            let mut info = SearchInfo::new(side, &mut rng);
            let pruned = minimax(&board, depth, 0, -INFINITY, INFINITY, true, &mut info);
            assert_eq!(pruned, full_minimax(&board, depth, 0, true, side), "{fen}");
        }
    }

    #[test]
    fn test_zero_budget_still_returns_move() {
        let board = Board::starting_position();
        let mut rng = StdRng::seed_from_u64(5);
        let limits = SearchLimits::new(3, Duration::ZERO);
        let result = iterative_deepening(&board, Side::Red, limits, &mut rng);
        let mv = result.best_move.unwrap();
        assert_eq!(result.depth, 1);
        assert!(generate_legal_moves(&board, Side::Red)
            .iter()
            .any(|m| m.same_squares(&mv)));
        assert!(result.elapsed < Duration::from_secs(5));
    }

    #[test]
    fn test_finds_mate_and_stops_early() {
        let (board, side) = parse_fen(positions::MATE_IN_ONE).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let result = iterative_deepening(&board, side, SearchLimits::depth(4), &mut rng);
        assert_eq!(result.best_move.map(|m| m.to), Position::new(0, 0));
        assert_eq!(result.score, MATE_SCORE - 1);
        assert_eq!(result.depth, 2);
    }

    #[test]
    fn test_no_moves_returns_none() {
        let (board, side) = parse_fen("3k5/R8/9/9/9/9/9/9/9/4K4 b").unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let result = iterative_deepening(&board, side, SearchLimits::depth(3), &mut rng);
        assert!(result.best_move.is_none());
        assert_eq!(result.depth, 0);
    }

    #[test]
    fn test_order_moves_captures_first_and_dedups() {
        let (board, side) = parse_fen("5k3/9/9/9/4r4/9/9/4R4/9/3K5 w").unwrap();
        let moves: Vec<Move> = generate_legal_moves(&board, side).into();
        let mut doubled = moves.clone();
        doubled.extend(moves.iter().copied());

        let mut rng = StdRng::seed_from_u64(2);
        let ordered = order_moves(&board, doubled, &mut rng);
        assert_eq!(ordered.len(), moves.len());
        assert_eq!(ordered[0].captured.map(|p| p.kind), Some(PieceKind::Chariot));
    }

    #[test]
    fn test_mate_score_orientation() {
        assert_eq!(mate_score(Side::Red, Side::Red, 2), -(MATE_SCORE - 2));
        assert_eq!(mate_score(Side::Black, Side::Red, 1), MATE_SCORE - 1);
    }
}
