//! Pseudo-legal move generation, and the filters that turn pseudo-legal
//! moves into legal ones.

use arrayvec::ArrayVec;

use crate::chess::{
    board::{
        Board,
        check::{DIAGONALS, KING_OFFSETS, KNIGHT_OFFSETS, ORTHOGONALS, is_checked},
    },
    chessmove::{Move, SpecialMove},
    piece::{Colour, Piece, PieceType},
    types::{CastlingRights, Square},
};

/// Upper bound on the number of pseudo-legal moves in a position.
pub const MAX_POSITION_MOVES: usize = 256;

pub type MoveList = ArrayVec<Move, MAX_POSITION_MOVES>;

type Generator = fn(&Board, Square, Piece, &mut MoveList);

/// Move generators, indexed by piece type.
const GENERATORS: [Generator; PieceType::COUNT] = [
    king_moves,
    queen_moves,
    knight_moves,
    bishop_moves,
    rook_moves,
    pawn_moves,
];

/// Appends every pseudo-legal move for `team` to `out`.
///
/// The order of the generated moves is not meaningful.
pub fn all_possible_moves(board: &Board, out: &mut MoveList, team: Colour) {
    for (piece, sq) in board.positions().pieces(team) {
        GENERATORS[piece.piece_type()](board, sq, piece, out);
    }
}

/// Removes every move that leaves `team`'s own king attacked, testing each
/// candidate on a throwaway copy of the board.
pub fn trim_moves_into_check(board: &Board, moves: &mut MoveList, team: Colour) {
    moves.retain(|m| {
        let mut probe = board.clone();
        probe.move_piece(*m);
        !probe.in_check(team)
    });
}

/// Same as `trim_moves_into_check`, but tests each candidate by making and
/// unmaking it on `board` itself.
pub fn trim_moves_into_check_with_undo(board: &mut Board, moves: &mut MoveList, team: Colour) {
    moves.retain(|m| {
        let executed = board.move_piece(*m);
        let legal = !board.in_check(team);
        board.undo_move(executed);
        legal
    });
}

fn push_leaper_moves(
    board: &Board,
    from: Square,
    piece: Piece,
    offsets: &[(i8, i8)],
    special: Option<SpecialMove>,
    out: &mut MoveList,
) {
    for &(dx, dy) in offsets {
        let Some(to) = from.offset(dx, dy) else {
            continue;
        };
        if board.piece_at(to).is_some_and(|p| p.colour() == piece.colour()) {
            continue;
        }
        out.push(Move {
            piece,
            from,
            to,
            promotion: None,
            special,
        });
    }
}

fn push_slider_moves(
    board: &Board,
    from: Square,
    piece: Piece,
    directions: &[(i8, i8)],
    special: Option<SpecialMove>,
    out: &mut MoveList,
) {
    for &(dx, dy) in directions {
        let mut sq = from;
        while let Some(to) = sq.offset(dx, dy) {
            sq = to;
            let occupant = board.piece_at(to);
            if occupant.is_some_and(|p| p.colour() == piece.colour()) {
                break;
            }
            out.push(Move {
                piece,
                from,
                to,
                promotion: None,
                special,
            });
            if occupant.is_some() {
                break;
            }
        }
    }
}

fn king_moves(board: &Board, from: Square, piece: Piece, out: &mut MoveList) {
    let us = piece.colour();
    let rights = board.castling_rights();
    let special =
        (rights.kingside(us) || rights.queenside(us)).then_some(SpecialMove::LoseCastleBoth);
    push_leaper_moves(board, from, piece, &KING_OFFSETS, special, out);
    castling_moves(board, from, piece, out);
}

fn castling_moves(board: &Board, king_sq: Square, king: Piece, out: &mut MoveList) {
    let us = king.colour();
    let rights = board.castling_rights();
    let rook = Some(Piece::new(us, PieceType::Rook));

    if king_sq != CastlingRights::king_home(us) || !(rights.kingside(us) || rights.queenside(us))
    {
        return;
    }
    if is_checked(board, us, king_sq) {
        return;
    }

    if rights.kingside(us)
        && board.piece_at(CastlingRights::kingside_rook_home(us)) == rook
        && [1, 2].iter().all(|&d| board.piece_at(king_sq.shifted(d)).is_none())
        && !king_is_checked_during_castling(board, king_sq, king, 1)
    {
        out.push(Move::new_with_special(
            king,
            king_sq,
            king_sq.shifted(2),
            SpecialMove::CastleKingSide,
        ));
    }

    if rights.queenside(us)
        && board.piece_at(CastlingRights::queenside_rook_home(us)) == rook
        && [-1, -2, -3].iter().all(|&d| board.piece_at(king_sq.shifted(d)).is_none())
        && !king_is_checked_during_castling(board, king_sq, king, -1)
    {
        out.push(Move::new_with_special(
            king,
            king_sq,
            king_sq.shifted(-2),
            SpecialMove::CastleQueenSide,
        ));
    }
}

/// Walks the king two squares towards `step` on a copy of the board, one
/// square at a time, and reports whether it is attacked on either square.
fn king_is_checked_during_castling(
    board: &Board,
    king_sq: Square,
    king: Piece,
    step: i8,
) -> bool {
    let mut probe = board.clone();
    let mut sq = king_sq;
    for _ in 0..2 {
        let next = sq.shifted(step);
        probe.move_piece(Move::new(king, sq, next));
        if is_checked(&probe, king.colour(), next) {
            return true;
        }
        sq = next;
    }
    false
}

fn queen_moves(board: &Board, from: Square, piece: Piece, out: &mut MoveList) {
    push_slider_moves(board, from, piece, &DIAGONALS, None, out);
    push_slider_moves(board, from, piece, &ORTHOGONALS, None, out);
}

fn knight_moves(board: &Board, from: Square, piece: Piece, out: &mut MoveList) {
    push_leaper_moves(board, from, piece, &KNIGHT_OFFSETS, None, out);
}

fn bishop_moves(board: &Board, from: Square, piece: Piece, out: &mut MoveList) {
    push_slider_moves(board, from, piece, &DIAGONALS, None, out);
}

fn rook_moves(board: &Board, from: Square, piece: Piece, out: &mut MoveList) {
    let us = piece.colour();
    let rights = board.castling_rights();
    let special = if from == CastlingRights::kingside_rook_home(us) && rights.kingside(us) {
        Some(SpecialMove::LoseCastleKingSide)
    } else if from == CastlingRights::queenside_rook_home(us) && rights.queenside(us) {
        Some(SpecialMove::LoseCastleQueenSide)
    } else {
        None
    };
    push_slider_moves(board, from, piece, &ORTHOGONALS, special, out);
}

fn pawn_moves(board: &Board, from: Square, piece: Piece, out: &mut MoveList) {
    let us = piece.colour();
    let dy = us.pawn_direction();
    let promotion_row = (!us).back_row();

    let push = |out: &mut MoveList, to: Square| {
        if to.row() == promotion_row {
            for promo in PieceType::PROMOTIONS {
                out.push(Move::new_with_promo(piece, from, to, promo));
            }
        } else {
            out.push(Move::new(piece, from, to));
        }
    };

    if let Some(one) = from.offset(0, dy)
        && board.piece_at(one).is_none()
    {
        push(out, one);
        if from.row() == us.pawn_start_row()
            && let Some(two) = one.offset(0, dy)
            && board.piece_at(two).is_none()
        {
            out.push(Move::new_with_special(piece, from, two, SpecialMove::PawnDoubleStep));
        }
    }

    let enemy_pawn = Some(Piece::new(!us, PieceType::Pawn));
    for dx in [-1, 1] {
        let Some(to) = from.offset(dx, dy) else {
            continue;
        };
        match board.piece_at(to) {
            Some(target) if target.colour() != us => push(out, to),
            None if board.ep_sq() == Some(to)
                && from.offset(dx, 0).and_then(|sq| board.piece_at(sq)) == enemy_pawn =>
            {
                out.push(Move::new_with_special(piece, from, to, SpecialMove::EnPassant));
            }
            _ => (),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pseudo(fen: &str) -> (Board, MoveList) {
        let board = Board::from_fen(fen).unwrap();
        let moves = board.pseudo_legal_moves(board.turn());
        (board, moves)
    }

    fn has_move(moves: &MoveList, uci: &str) -> bool {
        moves.iter().any(|m| m.to_string() == uci)
    }

    #[test]
    fn startpos_has_twenty_moves() {
        let board = Board::default();
        assert_eq!(board.pseudo_legal_moves(Colour::White).len(), 20);
        assert_eq!(board.pseudo_legal_moves(Colour::Black).len(), 20);
        assert_eq!(board.legal_moves().len(), 20);
    }

    #[test]
    fn double_steps_are_tagged() {
        let board = Board::default();
        let moves = board.pseudo_legal_moves(Colour::White);
        let e4 = moves.iter().find(|m| m.to_string() == "e2e4").unwrap();
        assert_eq!(e4.special, Some(SpecialMove::PawnDoubleStep));
        let e3 = moves.iter().find(|m| m.to_string() == "e2e3").unwrap();
        assert_eq!(e3.special, None);
    }

    #[test]
    fn blocked_pawns_cannot_double_step() {
        let (_, moves) = pseudo("4k3/8/8/8/8/4n3/4P3/4K3 w - - 0 1");
        assert!(!has_move(&moves, "e2e3"));
        assert!(!has_move(&moves, "e2e4"));
        let (_, moves) = pseudo("4k3/8/8/8/4n3/8/4P3/4K3 w - - 0 1");
        assert!(has_move(&moves, "e2e3"));
        assert!(!has_move(&moves, "e2e4"));
    }

    #[test]
    fn promotions_expand_to_four_moves() {
        let (_, moves) = pseudo("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        let from_a7_to = |to| {
            moves
                .iter()
                .filter(|m| m.from == Square::A7 && m.to == to)
                .collect::<Vec<_>>()
        };
        let straight = from_a7_to(Square::A8);
        let capture = from_a7_to(Square::B8);
        assert_eq!(straight.len(), 4);
        assert_eq!(capture.len(), 4);
        assert!(straight.iter().chain(&capture).all(|m| m.is_promo()));
        for promo in PieceType::PROMOTIONS {
            assert!(straight.iter().any(|m| m.promotion == Some(promo)));
        }
    }

    #[test]
    fn black_promotions() {
        let (_, moves) = pseudo("4k3/8/8/8/8/8/p7/4K3 b - - 0 1");
        let promos = moves.iter().filter(|m| m.from == Square::A2).count();
        assert_eq!(promos, 4);
    }

    #[test]
    fn en_passant_requires_shadow_and_adjacent_pawn() {
        let (_, moves) = pseudo("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1");
        let ep = moves.iter().find(|m| m.to_string() == "e5d6").unwrap();
        assert_eq!(ep.special, Some(SpecialMove::EnPassant));

        let (_, moves) = pseudo("4k3/8/8/3pP3/8/8/8/4K3 w - - 0 1");
        assert!(!has_move(&moves, "e5d6"));
    }

    #[test]
    fn sliders_stop_at_pieces() {
        let (_, moves) = pseudo("4k3/8/8/8/8/8/1p6/R3K3 w Q - 0 1");
        let rook_moves: Vec<_> = moves.iter().filter(|m| m.piece == Piece::WR).collect();
        // a2..a8 up the file, b1..d1 along the rank.
        assert_eq!(rook_moves.len(), 10);
        assert!(rook_moves.iter().all(|m| m.special == Some(SpecialMove::LoseCastleQueenSide)));
    }

    #[test]
    fn castling_needs_empty_path() {
        let (_, moves) = pseudo("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        assert!(has_move(&moves, "e1g1"));
        assert!(has_move(&moves, "e1c1"));

        let (_, moves) = pseudo("r3k2r/8/8/8/8/8/8/RN2K1NR w KQkq - 0 1");
        assert!(!has_move(&moves, "e1g1"));
        assert!(!has_move(&moves, "e1c1"));

        // the b-file square only needs to be empty, not safe.
        let (_, moves) = pseudo("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1");
        assert!(has_move(&moves, "e1c1"));
    }

    #[test]
    fn castling_through_check_is_excluded() {
        // f1 is attacked by the rook on f8: the king would pass through check.
        let (_, moves) = pseudo("4kr2/8/8/8/8/8/8/4K2R w K - 0 1");
        assert!(!has_move(&moves, "e1g1"));

        // g1 is attacked: the king would land in check.
        let (_, moves) = pseudo("4k1r1/8/8/8/8/8/8/4K2R w K - 0 1");
        assert!(!has_move(&moves, "e1g1"));

        // d1 is attacked on the queen side.
        let (_, moves) = pseudo("3rk3/8/8/8/8/8/8/R3K3 w Q - 0 1");
        assert!(!has_move(&moves, "e1c1"));

        // in check: no castling at all.
        let (_, moves) = pseudo("4k3/8/8/8/8/8/8/R3K2r w Q - 0 1");
        assert!(!has_move(&moves, "e1c1"));
    }

    #[test]
    fn capturing_the_rook_stops_castling() {
        let mut board = Board::from_fen("r3k3/8/8/8/8/8/8/R3K3 w Qq - 0 1").unwrap();
        let m = board.parse_uci("a1a8").unwrap();
        board.move_piece(m);
        assert!(!board.castling_rights().queenside(Colour::Black));
        let moves = board.pseudo_legal_moves(Colour::Black);
        assert!(!has_move(&moves, "e8c8"));
    }

    #[test]
    fn check_symmetry() {
        // a side is in check exactly when the enemy has a pseudo-legal move
        // that lands on its king.
        for fen in [
            "4k3/8/8/8/8/8/8/4R1K1 b - - 0 1",
            "4k3/8/8/8/8/8/8/R5K1 b - - 0 1",
            "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3",
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        ] {
            let board = Board::from_fen(fen).unwrap();
            let us = board.turn();
            let king = board.king_sq(us).unwrap();
            let attacks_king = board.pseudo_legal_moves(!us).iter().any(|m| m.to == king);
            assert_eq!(board.in_check(us), attacks_king, "{fen}");
        }
    }

    #[test]
    fn trimming_strategies_agree() {
        for fen in [
            Board::STARTING_FEN,
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1",
        ] {
            let mut board = Board::from_fen(fen).unwrap();
            let before = board.clone();
            let us = board.turn();

            let mut by_copy = board.pseudo_legal_moves(us);
            trim_moves_into_check(&board, &mut by_copy, us);

            let mut by_undo = board.pseudo_legal_moves(us);
            trim_moves_into_check_with_undo(&mut board, &mut by_undo, us);

            assert_eq!(by_copy, by_undo, "{fen}");
            assert_eq!(board, before, "undo strategy left the board changed: {fen}");
        }
    }

    #[test]
    fn pinned_piece_moves_are_trimmed() {
        let board = Board::from_fen("4k3/4r3/8/8/8/8/4B3/4K3 w - - 0 1").unwrap();
        let legal = board.legal_moves();
        assert!(legal.iter().all(|m| m.piece != Piece::WB), "bishop is pinned");
    }
}
