use crate::chess::{
    board::Board,
    piece::{Colour, Piece, PieceType},
    types::Square,
};

pub const KNIGHT_OFFSETS: [(i8, i8); 8] =
    [(-2, -1), (-2, 1), (2, -1), (2, 1), (-1, -2), (-1, 2), (1, -2), (1, 2)];

pub const KING_OFFSETS: [(i8, i8); 8] =
    [(-1, -1), (0, -1), (1, -1), (-1, 0), (1, 0), (-1, 1), (0, 1), (1, 1)];

pub const DIAGONALS: [(i8, i8); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];

pub const ORTHOGONALS: [(i8, i8); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];

/// Determines whether `team`'s king, standing on `king_sq`, is attacked.
///
/// Rather than generating the enemy's moves, this looks outward from the
/// king using each enemy piece's movement pattern, skipping any pattern the
/// enemy has no pieces for.
pub fn is_checked(board: &Board, team: Colour, king_sq: Square) -> bool {
    let enemy = !team;
    let index = board.positions();

    if index.has(enemy, PieceType::Knight)
        && leaper_hits(board, king_sq, &KNIGHT_OFFSETS, Piece::new(enemy, PieceType::Knight))
    {
        return true;
    }

    if index.has(enemy, PieceType::Pawn) {
        // enemy pawns sit one row towards the enemy's side of the king.
        let dy = team.pawn_direction();
        if leaper_hits(board, king_sq, &[(-1, dy), (1, dy)], Piece::new(enemy, PieceType::Pawn)) {
            return true;
        }
    }

    if leaper_hits(board, king_sq, &KING_OFFSETS, Piece::new(enemy, PieceType::King)) {
        return true;
    }

    let queens = index.has(enemy, PieceType::Queen);

    if (queens || index.has(enemy, PieceType::Bishop))
        && slider_hits(board, king_sq, &DIAGONALS, enemy, PieceType::Bishop)
    {
        return true;
    }

    (queens || index.has(enemy, PieceType::Rook))
        && slider_hits(board, king_sq, &ORTHOGONALS, enemy, PieceType::Rook)
}

fn leaper_hits(board: &Board, origin: Square, offsets: &[(i8, i8)], attacker: Piece) -> bool {
    offsets
        .iter()
        .filter_map(|&(dx, dy)| origin.offset(dx, dy))
        .any(|sq| board.piece_at(sq) == Some(attacker))
}

fn slider_hits(
    board: &Board,
    origin: Square,
    directions: &[(i8, i8)],
    enemy: Colour,
    slider: PieceType,
) -> bool {
    let attackers = [Piece::new(enemy, slider), Piece::new(enemy, PieceType::Queen)];
    directions.iter().any(|&(dx, dy)| {
        let mut sq = origin;
        while let Some(next) = sq.offset(dx, dy) {
            sq = next;
            if let Some(piece) = board.piece_at(sq) {
                // the first piece along the ray decides, whoever owns it.
                return attackers.contains(&piece);
            }
        }
        false
    })
}
