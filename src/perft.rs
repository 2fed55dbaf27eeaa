#![allow(clippy::module_name_repetitions)]

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use anyhow::{Context, bail};

use crate::chess::{
    board::{Board, movegen::MoveList},
    chessmove::Move,
    piece::Colour,
};

fn kings_present(pos: &Board) -> bool {
    Colour::all().all(|colour| pos.king_sq(colour).is_some())
}

/// A root can only be searched if both kings stand and the side that just
/// moved isn't left in check.
fn searchable(pos: &Board) -> bool {
    kings_present(pos) && !pos.in_check(!pos.turn())
}

/// Counts leaf nodes by cloning the board for every child.
pub fn perft(pos: &Board, depth: usize) -> u64 {
    if !searchable(pos) {
        return 0;
    }

    #[cfg(debug_assertions)]
    pos.check_validity().unwrap();

    if depth == 0 {
        return 1;
    }

    let mover = pos.turn();
    let ml = pos.pseudo_legal_moves(mover);

    let mut count = 0;
    for &m in &ml {
        let mut child = pos.clone();
        child.move_piece(m);
        if child.in_check(mover) {
            continue;
        }
        count += perft(&child, depth - 1);
    }

    count
}

/// Counts leaf nodes on a single board, applying and undoing each move.
pub fn perft_with_undo(pos: &mut Board, depth: usize) -> u64 {
    if !searchable(pos) {
        return 0;
    }

    #[cfg(debug_assertions)]
    pos.check_validity().unwrap();

    if depth == 0 {
        return 1;
    }

    let mover = pos.turn();
    let ml: MoveList = pos.pseudo_legal_moves(mover);

    let mut count = 0;
    for &m in &ml {
        let executed = pos.move_piece(m);
        if !pos.in_check(mover) {
            count += perft_with_undo(pos, depth - 1);
        }
        pos.undo_move(executed);
    }

    count
}

/// Splits the node count at `depth` by root move.
pub fn divide(pos: &mut Board, depth: usize) -> Vec<(Move, u64)> {
    let Some(child_depth) = depth.checked_sub(1) else {
        return Vec::new();
    };
    pos.legal_moves()
        .into_iter()
        .map(|m| {
            let executed = pos.move_piece(m);
            let nodes = perft_with_undo(pos, child_depth);
            pos.undo_move(executed);
            (m, nodes)
        })
        .collect()
}

/// Runs every entry of a perft suite file, in the format
/// `<fen> ;D1 <nodes> ;D2 <nodes> ...`, stopping at the first wrong count.
/// Entries whose expected count exceeds `nodes_limit` are skipped.
pub fn gamut(path: &Path, nodes_limit: u64) -> anyhow::Result<()> {
    println!("running perft on {}", path.display());
    let f = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut passed = 0;
    for (line_num, line) in BufReader::new(f).lines().enumerate() {
        let line = line.with_context(|| format!("failed to read line {}", line_num + 1))?;
        let mut parts = line.split(';');
        let fen = parts.next().unwrap_or_default().trim();
        if fen.is_empty() {
            continue;
        }
        let pos = Board::from_fen(fen)
            .with_context(|| format!("line {}: bad FEN \"{fen}\"", line_num + 1))?;
        for depth_part in parts {
            let depth_part = depth_part.trim();
            let (d, nodes) = depth_part.split_once(' ').with_context(|| {
                format!("line {}: bad depth entry \"{depth_part}\"", line_num + 1)
            })?;
            let d = d
                .strip_prefix('D')
                .and_then(|d| d.parse::<usize>().ok())
                .with_context(|| format!("line {}: bad depth \"{d}\"", line_num + 1))?;
            let nodes = nodes
                .trim()
                .parse::<u64>()
                .with_context(|| format!("line {}: bad node count \"{nodes}\"", line_num + 1))?;
            if nodes > nodes_limit {
                println!("Skipping...");
                break;
            }
            let perft_nodes = perft(&pos, d);
            if perft_nodes != nodes {
                println!("FAIL: fen {fen}, depth {d}: expected {nodes}, got {perft_nodes}");
                bail!("perft failed on line {}", line_num + 1);
            }
            println!("PASS: fen {fen}, depth {d}");
            passed += 1;
        }
    }
    println!("{passed} counts matched");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chess::fen::Fen;

    fn legal_moves_of(pos: &Board) -> String {
        pos.legal_moves().into_iter().map(|m| m.to_string()).collect::<Vec<_>>().join(", ")
    }

    fn check_counts(fen: &str, counts: &[u64]) {
        let mut pos = Board::from_fen(fen).unwrap();
        for (depth, &expected) in (1..).zip(counts) {
            assert_eq!(perft(&pos, depth), expected, "copy perft, {fen} depth {depth}");
            assert_eq!(
                perft_with_undo(&mut pos, depth),
                expected,
                "undo perft, {fen} depth {depth}"
            );
        }
        assert_eq!(pos, Board::from_fen(fen).unwrap(), "perft left the board changed");
    }

    #[test]
    fn perft_start_position() {
        let pos = Board::default();
        assert_eq!(perft(&pos, 1), 20, "got {}", legal_moves_of(&pos));
        check_counts(Board::STARTING_FEN, &[20, 400, 8_902, 197_281]);
    }

    #[test]
    #[ignore = "slow outside release builds"]
    fn perft_start_position_deep() {
        let mut pos = Board::default();
        assert_eq!(perft(&pos, 5), 4_865_609);
        assert_eq!(perft_with_undo(&mut pos, 5), 4_865_609);
    }

    #[test]
    fn perft_hard_position() {
        const TEST_FEN: &str =
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
        let pos = Board::from_fen(TEST_FEN).unwrap();
        assert_eq!(perft(&pos, 1), 48, "got {}", legal_moves_of(&pos));
        check_counts(TEST_FEN, &[48, 2_039, 97_862]);
    }

    #[test]
    fn perft_single_castles() {
        let mut pos = Board::from_fen("4k3/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        assert_eq!(perft_with_undo(&mut pos, 2), 66);
        let mut pos = Board::from_fen("4k3/8/8/8/8/8/8/R3K3 w Q - 0 1").unwrap();
        assert_eq!(perft_with_undo(&mut pos, 2), 71);
        let mut pos = Board::from_fen("4k2r/8/8/8/8/8/8/4K3 w k - 0 1").unwrap();
        assert_eq!(perft_with_undo(&mut pos, 2), 75);
        let mut pos = Board::from_fen("r3k3/1K6/8/8/8/8/8/8 w q - 0 1").unwrap();
        assert_eq!(perft_with_undo(&mut pos, 2), 49);
    }

    #[test]
    fn perft_promotions() {
        check_counts("8/Pk6/8/8/8/8/6Kp/8 w - - 0 1", &[11, 97]);
        let pos = Board::from_fen("n1n5/1Pk5/8/8/8/8/5Kp1/5N1N w - - 0 1").unwrap();
        assert_eq!(perft(&pos, 1), 24, "got {}", legal_moves_of(&pos));
    }

    #[test]
    fn perft_rook_captures_and_castling() {
        check_counts("r3k1r1/8/8/8/8/8/8/R3K2R b KQq - 0 1", &[25, 547, 13_579, 316_214]);
        let mut pos = Board::from_fen("4k1r1/8/8/8/8/8/r7/R3K2R w KQ - 1 2").unwrap();
        assert_eq!(perft_with_undo(&mut pos, 3), 8_034);
        let mut pos = Board::from_fen("4k1rR/8/8/8/8/8/r7/R3K3 b Q - 2 2").unwrap();
        assert_eq!(perft_with_undo(&mut pos, 2), 355);
    }

    #[test]
    fn perft_small() {
        let pos = Board::from_fen("8/8/8/8/8/8/6k1/4K2R w K - 0 1").unwrap();
        assert_eq!(perft(&pos, 1), 12, "got {}", legal_moves_of(&pos));
        let pos = Board::from_fen("8/8/8/8/8/8/1k6/R2K4 b - - 1 1").unwrap();
        assert_eq!(perft(&pos, 1), 3, "got {}", legal_moves_of(&pos));
    }

    #[test]
    fn perft_en_passant_pins() {
        check_counts("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", &[14, 191, 2_812, 43_238]);
    }

    #[test]
    fn perft_promotion_heavy() {
        check_counts(
            "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1",
            &[6, 264, 9_467, 422_333],
        );
        check_counts(
            "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
            &[44, 1_486, 62_379],
        );
    }

    #[test]
    fn missing_king_counts_nothing() {
        let mut pos = Board::empty();
        assert_eq!(perft(&pos, 3), 0);
        assert_eq!(perft_with_undo(&mut pos, 3), 0);
    }

    #[test]
    fn root_left_in_check_counts_nothing() {
        // the black king on e8 is attacked with white to move.
        let fen = Fen::parse("4k3/8/8/8/8/8/8/4R1K1 w - - 0 1").unwrap();
        let mut pos = Board::empty();
        pos.set_from_fen(&fen);
        for depth in 0..3 {
            assert_eq!(perft(&pos, depth), 0, "copy perft at depth {depth}");
            assert_eq!(perft_with_undo(&mut pos, depth), 0, "undo perft at depth {depth}");
        }
    }

    #[test]
    fn divide_sums_to_perft() {
        let mut pos = Board::default();
        let split = divide(&mut pos, 3);
        assert_eq!(split.len(), 20);
        assert_eq!(split.iter().map(|&(_, n)| n).sum::<u64>(), 8_902);
        let e2e4 = split.iter().find(|(m, _)| m.to_string() == "e2e4").unwrap();
        assert_eq!(e2e4.1, 600);
        assert!(divide(&mut pos, 0).is_empty());
    }

    /// Walks every node of the tree, checking internal consistency and that
    /// both the undo and the copy paths restore / preserve the position.
    fn walk(pos: &mut Board, depth: usize) {
        pos.check_validity().unwrap();
        if depth == 0 {
            return;
        }
        for m in pos.legal_moves() {
            let before = pos.clone();
            let executed = pos.move_piece(m);
            pos.check_validity().unwrap_or_else(|e| panic!("after {m} from {before}: {e}"));
            assert!(pos.positions_equals_grid());
            walk(pos, depth - 1);
            pos.undo_move(executed);
            assert_eq!(*pos, before, "undoing {m} did not restore {before}");
            assert_eq!(pos.to_string(), before.to_string());
        }
    }

    #[test]
    fn move_undo_walks() {
        for fen in [
            Board::STARTING_FEN,
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "n1n5/1Pk5/8/8/8/8/5Kp1/5N1N w - - 0 1",
            "r3k1r1/8/8/8/8/8/8/R3K2R b KQq - 0 1",
        ] {
            let mut pos = Board::from_fen(fen).unwrap();
            walk(&mut pos, 3);
        }
    }

    #[test]
    fn suite_file_passes() {
        gamut(Path::new("epds/perftsuite.epd"), 60_000).unwrap();
    }

    #[test]
    fn suite_reports_missing_file() {
        assert!(gamut(Path::new("epds/no-such-suite.epd"), 1_000).is_err());
    }
}
