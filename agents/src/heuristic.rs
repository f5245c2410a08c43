use crate::evaluation::{exposure_value, placement};
use log::trace;
use rand::seq::SliceRandom;
use rand::Rng;
use xiangqi_core::{
    generate_legal_moves, is_attacked_by, is_checkmate, is_in_check, is_protected, Board, Move,
    PieceKind, Side,
};

const CAPTURE_WEIGHT: i32 = 10;
const CHECKMATE_BONUS: i32 = 2_000_000;
const CHECK_BONUS: i32 = 5_000;
const THREAT_BONUS: i32 = 200;
const PROTECTED_BONUS: i32 = 50;
const CENTRE_WEIGHT: i32 = 50;
const JITTER: i32 = 200;

/// Moves scoring within this distance of the best are candidates.
pub const TOLERANCE: i32 = 50;
/// At most this many candidates are drawn from.
pub const MAX_CANDIDATES: usize = 5;

/// Scores a single move from the mover's perspective.
pub fn score_move<R: Rng + ?Sized>(board: &Board, mv: &Move, rng: &mut R) -> i32 {
    let side = mv.piece.side;
    let opponent = side.opponent();
    let mut score = 0;

    if let Some(victim) = mv.captured {
        score += victim.kind.value() * CAPTURE_WEIGHT;
    }

    let after = board.apply_move(mv);
    if is_checkmate(&after, opponent) {
        score += CHECKMATE_BONUS;
    } else if is_in_check(&after, opponent) {
        score += CHECK_BONUS;
    }

    let exposed = exposure_value(mv.piece.kind);
    if is_attacked_by(board, mv.from, opponent) {
        score += 3 * exposed;
    }
    if is_attacked_by(&after, mv.to, opponent) {
        score -= 2 * exposed;
    }

    score += placement(mv.piece.kind, side, mv.to);

    let threatened = after
        .pieces(opponent)
        .filter(|p| p.kind != PieceKind::General)
        .filter(|p| is_attacked_by(&after, p.position, side))
        .count() as i32;
    score += threatened * THREAT_BONUS;

    let protected = after
        .pieces(side)
        .filter(|p| p.kind != PieceKind::General)
        .filter(|p| is_protected(&after, p.position, side))
        .count() as i32;
    score += protected * PROTECTED_BONUS;

    if matches!(mv.piece.kind, PieceKind::Horse | PieceKind::Cannon) {
        score += (4 - mv.to.center_distance() as i32) * CENTRE_WEIGHT;
    }

    score + rng.gen_range(0..JITTER)
}

/// Scores every legal move of `side`, best first.
pub fn score_moves<R: Rng + ?Sized>(board: &Board, side: Side, rng: &mut R) -> Vec<(Move, i32)> {
    let mut scored: Vec<(Move, i32)> = generate_legal_moves(board, side)
        .into_iter()
        .map(|mv| {
            let score = score_move(board, &mv, rng);
            trace!("heuristic {mv}: {score}");
            (mv, score)
        })
        .collect();
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored
}

/// Single-ply move picker: picks uniformly among the top-scoring moves.
/// None if `side` has no legal move.
pub fn pick_move<R: Rng + ?Sized>(board: &Board, side: Side, rng: &mut R) -> Option<Move> {
    let scored = score_moves(board, side, rng);
    let top = scored.first()?.1;
    let candidates: Vec<Move> = scored
        .iter()
        .take_while(|(_, score)| *score >= top - TOLERANCE)
        .take(MAX_CANDIDATES)
        .map(|(mv, _)| *mv)
        .collect();
    candidates.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use xiangqi_core::{parse_fen, positions, Position};

    #[test]
    fn test_picks_legal_move() {
        let board = Board::starting_position();
        let mut rng = StdRng::seed_from_u64(7);
        let mv = pick_move(&board, Side::Red, &mut rng).unwrap();
        let legal = generate_legal_moves(&board, Side::Red);
        assert!(legal.iter().any(|m| m.same_squares(&mv)));
    }

    #[test]
    fn test_same_seed_same_move() {
        let board = Board::starting_position();
        let first = pick_move(&board, Side::Black, &mut StdRng::seed_from_u64(42));
        let second = pick_move(&board, Side::Black, &mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
    }

    #[test]
    fn test_finds_mate_in_one() {
        let (board, side) = parse_fen(positions::MATE_IN_ONE).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let mv = pick_move(&board, side, &mut rng).unwrap();
        assert_eq!(mv.to, Position::new(0, 0).unwrap());
        assert!(is_checkmate(&board.apply_move(&mv), Side::Black));
    }

    #[test]
    fn test_prefers_free_chariot() {
        // The red chariot on e7 can take an undefended chariot on e4.
        let (board, side) = parse_fen("5k3/9/9/9/4r4/9/9/4R4/9/3K5 w").unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let scored = score_moves(&board, side, &mut rng);
        assert!(scored[0].0.is_capture());
        assert_eq!(
            scored[0].0.captured.map(|p| p.kind),
            Some(PieceKind::Chariot)
        );
    }

    #[test]
    fn test_no_moves_returns_none() {
        let (board, side) = parse_fen("3k5/R8/9/9/9/9/9/9/9/4K4 b").unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(pick_move(&board, side, &mut rng), None);
    }
}
