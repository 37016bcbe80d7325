//! Move ordering. Scores only decide the order in which moves are searched.

use chess_core::{legal_moves, Move, PieceKind, Position};

use crate::eval::square_bonus;

fn capture_value(kind: PieceKind) -> f32 {
    match kind {
        PieceKind::Pawn => 1.0,
        PieceKind::Knight | PieceKind::Bishop => 3.0,
        PieceKind::Rook => 5.0,
        PieceKind::Queen => 9.0,
        PieceKind::King => 0.0,
    }
}

/// Heuristic interest of `mv` in `pos`: value of the captured piece, a bonus
/// for promotions, and the mover's piece-square gain in pawns.
pub fn order_score(mv: Move, pos: &Position) -> f32 {
    let Some(mover) = pos.piece_at(mv.from) else {
        return 0.0;
    };

    let mut score = 0.0;
    let captured = if mv.is_en_passant {
        Some(PieceKind::Pawn)
    } else {
        pos.piece_at(mv.to).map(|p| p.kind)
    };
    if let Some(kind) = captured {
        score += capture_value(kind);
    }
    if mv.promo.is_some() {
        score += 9.0;
    }
    score + (square_bonus(mover, mv.to) - square_bonus(mover, mv.from)) as f32 / 100.0
}

/// Sorts `moves` by descending [`order_score`]. Equal scores keep their
/// generation order, so every worker derives the same list.
pub fn order_moves(pos: &Position, moves: &mut Vec<Move>) {
    let mut keyed: Vec<(f32, Move)> = moves.iter().map(|&mv| (order_score(mv, pos), mv)).collect();
    keyed.sort_by(|a, b| b.0.total_cmp(&a.0));
    moves.clear();
    moves.extend(keyed.into_iter().map(|(_, mv)| mv));
}

/// Legal moves of `pos` in search order.
pub fn ordered_moves(pos: &Position) -> Vec<Move> {
    let mut moves = legal_moves(pos);
    order_moves(pos, &mut moves);
    moves
}

#[cfg(test)]
#[path = "ordering_tests.rs"]
mod ordering_tests;
