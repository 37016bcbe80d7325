//! Static evaluation: material, piece-square tables, bishop pair, mobility,
//! pawn structure, king safety and endgame king activity.
//!
//! Scores are in centipawns and always from White's point of view. Every
//! term is an integer, so the result is exact and independent of summation
//! order.

use chess_core::{file_of, legal_moves, rank_of, Color, Move, Piece, PieceKind, Position};

/// Material values in centipawns, indexed by `PieceKind::idx()`.
/// Order: Pawn, Knight, Bishop, Rook, Queen, King
pub const PIECE_VALUES: [i32; 6] = [100, 320, 330, 500, 900, 20000];

/// Non-king material (both sides) at or below which the game is an endgame.
pub const ENDGAME_MATERIAL: i32 = 2400;

const BISHOP_PAIR: i32 = 50;

// Tables are laid out from a8 (index 0) to h1 (index 63), as seen by White.
#[rustfmt::skip]
const PAWN_TABLE: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
    50, 50, 50, 50, 50, 50, 50, 50,
    10, 10, 20, 30, 30, 20, 10, 10,
     5,  5, 10, 25, 25, 10,  5,  5,
     0,  0,  0, 20, 20,  0,  0,  0,
     5, -5,-10,  0,  0,-10, -5,  5,
     5, 10, 10,-20,-20, 10, 10,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const KNIGHT_TABLE: [i32; 64] = [
    -50,-40,-30,-30,-30,-30,-40,-50,
    -40,-20,  0,  0,  0,  0,-20,-40,
    -30,  0, 10, 15, 15, 10,  0,-30,
    -30,  5, 15, 20, 20, 15,  5,-30,
    -30,  0, 15, 20, 20, 15,  0,-30,
    -30,  5, 10, 15, 15, 10,  5,-30,
    -40,-20,  0,  5,  5,  0,-20,-40,
    -50,-40,-30,-30,-30,-30,-40,-50,
];

#[rustfmt::skip]
const BISHOP_TABLE: [i32; 64] = [
    -20,-10,-10,-10,-10,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5, 10, 10,  5,  0,-10,
    -10,  5,  5, 10, 10,  5,  5,-10,
    -10,  0, 10, 10, 10, 10,  0,-10,
    -10, 10, 10, 10, 10, 10, 10,-10,
    -10,  5,  0,  0,  0,  0,  5,-10,
    -20,-10,-10,-10,-10,-10,-10,-20,
];

#[rustfmt::skip]
const ROOK_TABLE: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10, 10, 10, 10, 10, 10,  5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
     0,  0,  0,  5,  5,  0,  0,  0,
];

#[rustfmt::skip]
const QUEEN_TABLE: [i32; 64] = [
    -20,-10,-10, -5, -5,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5,  5,  5,  5,  0,-10,
     -5,  0,  5,  5,  5,  5,  0, -5,
      0,  0,  5,  5,  5,  5,  0, -5,
    -10,  5,  5,  5,  5,  5,  0,-10,
    -10,  0,  5,  0,  0,  0,  0,-10,
    -20,-10,-10, -5, -5,-10,-10,-20,
];

#[rustfmt::skip]
const KING_TABLE: [i32; 64] = [
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -20,-30,-30,-40,-40,-30,-30,-20,
    -10,-20,-20,-20,-20,-20,-20,-10,
     20, 20,  0,  0,  0,  0, 20, 20,
     20, 30, 10,  0,  0, 10, 30, 20,
];

/// Piece-square bonus for `piece` standing on `sq` (a1 = 0).
///
/// Black reads the vertically mirrored square, so a position and its colour
/// flip get exactly opposite bonuses.
pub fn square_bonus(piece: Piece, sq: u8) -> i32 {
    let table = match piece.kind {
        PieceKind::Pawn => &PAWN_TABLE,
        PieceKind::Knight => &KNIGHT_TABLE,
        PieceKind::Bishop => &BISHOP_TABLE,
        PieceKind::Rook => &ROOK_TABLE,
        PieceKind::Queen => &QUEEN_TABLE,
        PieceKind::King => &KING_TABLE,
    };
    let index = match piece.color {
        Color::White => sq ^ 56,
        Color::Black => sq,
    };
    table[index as usize]
}

/// Per-side facts gathered in one pass over the board.
#[derive(Default)]
struct Side {
    bishops: u32,
    pawns_per_file: [i32; 8],
    king: Option<u8>,
}

/// Evaluates the position from White's point of view, in centipawns.
pub fn evaluate(pos: &Position) -> f32 {
    let mut sides = [Side::default(), Side::default()];
    let mut score = 0i32;

    for sq in 0..64u8 {
        let Some(piece) = pos.piece_at(sq) else {
            continue;
        };
        let side = &mut sides[piece.color.idx()];
        match piece.kind {
            PieceKind::King => side.king = Some(sq),
            kind => {
                if kind == PieceKind::Pawn {
                    side.pawns_per_file[file_of(sq) as usize] += 1;
                }
                if kind == PieceKind::Bishop {
                    side.bishops += 1;
                }
            }
        }
        let value = PIECE_VALUES[piece.kind.idx()] + square_bonus(piece, sq);
        score += sign(piece.color) * value;
    }

    let [white, black] = &sides;
    let endgame = is_endgame(pos);
    let (white_moves, black_moves) = moves_by_side(pos);

    for (color, side, moves) in [
        (Color::White, white, &white_moves),
        (Color::Black, black, &black_moves),
    ] {
        let mut term = 0;
        if side.bishops >= 2 {
            term += BISHOP_PAIR;
        }
        term += mobility(pos, moves);
        term += pawn_structure(&side.pawns_per_file);
        if let Some(king) = side.king {
            if !endgame {
                term += king_shield(pos, color, king);
            } else if let Some(enemy) = sides[color.other().idx()].king {
                term += king_activity(color, king, enemy);
            }
        }
        score += sign(color) * term;
    }

    score as f32
}

/// True once both sides together have no more than [`ENDGAME_MATERIAL`] of
/// non-king material.
pub fn is_endgame(pos: &Position) -> bool {
    let material: i32 = (0..64u8)
        .filter_map(|sq| pos.piece_at(sq))
        .filter(|p| p.kind != PieceKind::King)
        .map(|p| PIECE_VALUES[p.kind.idx()])
        .sum();
    material <= ENDGAME_MATERIAL
}

fn sign(color: Color) -> i32 {
    match color {
        Color::White => 1,
        Color::Black => -1,
    }
}

/// Legal moves of both sides. The side not to move is asked on a copy where
/// it is on move.
fn moves_by_side(pos: &Position) -> (Vec<Move>, Vec<Move>) {
    let mut other = pos.clone();
    other.side_to_move = pos.side_to_move.other();
    other.en_passant = None;

    let mover = legal_moves(pos);
    let waiting = legal_moves(&other);
    match pos.side_to_move {
        Color::White => (mover, waiting),
        Color::Black => (waiting, mover),
    }
}

fn mobility(pos: &Position, moves: &[Move]) -> i32 {
    moves
        .iter()
        .filter_map(|mv| pos.piece_at(mv.from))
        .map(|piece| match piece.kind {
            PieceKind::Knight | PieceKind::Bishop => 4,
            PieceKind::Rook => 2,
            PieceKind::Queen => 1,
            PieceKind::Pawn | PieceKind::King => 0,
        })
        .sum()
}

/// Doubled pawns, pawn islands beyond the first, and isolated files.
fn pawn_structure(files: &[i32; 8]) -> i32 {
    let mut score = 0;
    let mut islands = 0i32;
    let mut in_island = false;

    for &count in files {
        if count > 0 {
            if count > 1 {
                score -= 10 * (count - 1);
            }
            if !in_island {
                islands += 1;
                in_island = true;
            }
        } else {
            in_island = false;
        }
    }
    score -= 5 * (islands - 1).max(0);

    for file in 0..8 {
        if files[file] == 0 {
            continue;
        }
        let left = file > 0 && files[file - 1] > 0;
        let right = file < 7 && files[file + 1] > 0;
        if !left && !right {
            score -= 15;
        }
    }
    score
}

/// Own pawns on the three squares in front of the king.
fn king_shield(pos: &Position, color: Color, king: u8) -> i32 {
    let forward = match color {
        Color::White => 1,
        Color::Black => -1,
    };
    let rank = rank_of(king) + forward;
    let shield = (-1..=1)
        .filter_map(|df| chess_core::sq(file_of(king) + df, rank))
        .filter(|&s| {
            pos.piece_at(s) == Some(Piece {
                color,
                kind: PieceKind::Pawn,
            })
        })
        .count() as i32;

    if shield == 0 {
        -20
    } else {
        10 * shield
    }
}

/// Endgame king placement. White is pushed toward the black king, Black is
/// rewarded for keeping away from it.
fn king_activity(color: Color, king: u8, enemy: u8) -> i32 {
    let (rank, file) = (rank_of(king) as i32, file_of(king) as i32);
    // Twice the distance to the centre is a whole number of squares.
    let centre_distance = ((2 * rank - 7).abs() + (2 * file - 7).abs()) / 2;
    let king_distance =
        (rank - rank_of(enemy) as i32).abs() + (file - file_of(enemy) as i32).abs();

    let chase = match color {
        Color::White => -2 * king_distance,
        Color::Black => 2 * king_distance,
    };
    -5 * centre_distance + chase + 20
}

#[cfg(test)]
#[path = "eval_tests.rs"]
mod eval_tests;
