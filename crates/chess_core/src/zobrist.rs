//! Zobrist hashing for chess positions.
//!
//! Positions in the repetition history are identified by XOR-ing together
//! fixed random keys for:
//! - each piece on each square (12 pieces × 64 squares = 768 values)
//! - Black to move (1 value)
//! - castling rights (4 values)
//! - en passant file (8 values)

use crate::board::Position;
use crate::types::{Color, Piece, file_of};

pub struct ZobristKeys {
    /// Indexed by [color][piece_kind][square]
    pub pieces: [[[u64; 64]; 6]; 2],
    pub side_to_move: u64,
    /// [wk, wq, bk, bq]
    pub castling: [u64; 4],
    pub en_passant: [u64; 8],
}

impl ZobristKeys {
    /// Keys from an xorshift64 stream with a fixed seed, so hashes are
    /// identical in every process and every run.
    pub const fn new() -> Self {
        const fn xorshift64(mut state: u64) -> u64 {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state
        }

        let mut state = 0x123456789ABCDEF0u64;

        let mut pieces = [[[0u64; 64]; 6]; 2];
        let mut color = 0;
        while color < 2 {
            let mut piece = 0;
            while piece < 6 {
                let mut sq = 0;
                while sq < 64 {
                    state = xorshift64(state);
                    pieces[color][piece][sq] = state;
                    sq += 1;
                }
                piece += 1;
            }
            color += 1;
        }

        state = xorshift64(state);
        let side_to_move = state;

        let mut castling = [0u64; 4];
        let mut i = 0;
        while i < 4 {
            state = xorshift64(state);
            castling[i] = state;
            i += 1;
        }

        let mut en_passant = [0u64; 8];
        let mut i = 0;
        while i < 8 {
            state = xorshift64(state);
            en_passant[i] = state;
            i += 1;
        }

        ZobristKeys {
            pieces,
            side_to_move,
            castling,
            en_passant,
        }
    }

    #[inline(always)]
    pub fn piece_key(&self, piece: Piece, sq: u8) -> u64 {
        self.pieces[piece.color.idx()][piece.kind.idx()][sq as usize]
    }
}

impl Default for ZobristKeys {
    fn default() -> Self {
        Self::new()
    }
}

/// Global static Zobrist keys, computed at compile time.
pub static ZOBRIST: ZobristKeys = ZobristKeys::new();

/// Full (non-incremental) hash of a position.
pub fn hash(pos: &Position) -> u64 {
    let mut h = 0u64;
    for sq in 0..64u8 {
        if let Some(pc) = pos.piece_at(sq) {
            h ^= ZOBRIST.piece_key(pc, sq);
        }
    }
    if pos.side_to_move == Color::Black {
        h ^= ZOBRIST.side_to_move;
    }
    let rights = [
        pos.castling.wk,
        pos.castling.wq,
        pos.castling.bk,
        pos.castling.bq,
    ];
    for (i, set) in rights.into_iter().enumerate() {
        if set {
            h ^= ZOBRIST.castling[i];
        }
    }
    if let Some(ep) = pos.en_passant {
        h ^= ZOBRIST.en_passant[file_of(ep) as usize];
    }
    h
}

#[cfg(test)]
#[path = "zobrist_tests.rs"]
mod zobrist_tests;
