use crate::board::Board;
use crate::check::{is_checkmate, is_in_check};
use crate::move_gen::generate_legal_moves;
use crate::types::{Move, Side};

/// Perft counters gathered at the leaves.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PerftResults {
    pub nodes: u64,
    pub captures: u64,
    pub checks: u64,
    pub checkmates: u64,
}

impl PerftResults {
    /// Combines results from child nodes.
    pub fn add(&mut self, other: &Self) {
        self.nodes += other.nodes;
        self.captures += other.captures;
        self.checks += other.checks;
        self.checkmates += other.checkmates;
    }
}

/// Counts the leaf nodes of the legal move tree to the given depth.
pub fn perft(board: &Board, side: Side, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = generate_legal_moves(board, side);

    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .iter()
        .map(|mv| perft(&board.apply_move(mv), side.opponent(), depth - 1))
        .sum()
}

/// Per-move breakdown of the perft count at the root. Empty at depth 0.
pub fn perft_divide(board: &Board, side: Side, depth: u8) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }

    generate_legal_moves(board, side)
        .into_iter()
        .map(|mv| {
            let nodes = if depth == 1 {
                1
            } else {
                perft(&board.apply_move(&mv), side.opponent(), depth - 1)
            };
            (mv, nodes)
        })
        .collect()
}

/// Perft with capture, check and checkmate counts at the leaves.
pub fn perft_detailed(board: &Board, side: Side, depth: u8) -> PerftResults {
    let mut results = PerftResults::default();

    if depth == 0 {
        results.nodes = 1;
        return results;
    }

    for mv in generate_legal_moves(board, side).iter() {
        let next = board.apply_move(mv);
        let opponent = side.opponent();

        if depth == 1 {
            results.nodes += 1;
            if mv.is_capture() {
                results.captures += 1;
            }
            if is_in_check(&next, opponent) {
                results.checks += 1;
                if is_checkmate(&next, opponent) {
                    results.checkmates += 1;
                }
            }
        } else {
            results.add(&perft_detailed(&next, opponent, depth - 1));
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::{parse_fen, positions};

    #[test]
    fn test_perft_starting_position() {
        let board = Board::starting_position();
        for &(depth, expected) in positions::STARTING_PERFT.iter().take(2) {
            assert_eq!(perft(&board, Side::Red, depth), expected, "depth {depth}");
        }
    }

    #[test]
    fn test_perft_depth_zero() {
        assert_eq!(perft(&Board::starting_position(), Side::Red, 0), 1);
    }

    #[test]
    fn test_perft_divide_sums_to_total() {
        let board = Board::starting_position();
        let divide = perft_divide(&board, Side::Red, 2);
        assert_eq!(divide.len(), 44);
        assert_eq!(divide.iter().map(|(_, n)| n).sum::<u64>(), 1_920);
    }

    #[test]
    fn test_perft_divide_depth_zero_is_empty() {
        let board = Board::starting_position();
        assert!(perft_divide(&board, Side::Red, 0).is_empty());
        assert_eq!(perft_divide(&board, Side::Red, 1).len(), 44);
    }

    #[test]
    fn test_perft_detailed_counts() {
        let board = Board::starting_position();
        let results = perft_detailed(&board, Side::Red, 1);
        assert_eq!(results.nodes, 44);
        // Both cannons can take the horses behind the screens.
        assert_eq!(results.captures, 2);
        assert_eq!(results.checkmates, 0);
    }

    #[test]
    fn test_perft_detailed_finds_mate() {
        let (board, side) = parse_fen(positions::MATE_IN_ONE).unwrap();
        let results = perft_detailed(&board, side, 1);
        assert!(results.checkmates >= 1);
        assert!(results.checks >= results.checkmates);
    }
}
