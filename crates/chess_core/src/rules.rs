//! Game-end classification: checkmate, stalemate and draw rules.

use crate::{board::Position, movegen::legal_moves, types::*};

/// A position in which the side to move has no legal moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Terminal {
    WhiteCheckmated,
    BlackCheckmated,
    WhiteStalemated,
    BlackStalemated,
}

impl Terminal {
    pub fn is_checkmate(self) -> bool {
        matches!(self, Terminal::WhiteCheckmated | Terminal::BlackCheckmated)
    }
}

/// A draw that is decided by rule rather than by the move list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawReason {
    FiftyMove,
    InsufficientMaterial,
    Repetition,
}

impl std::fmt::Display for DrawReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DrawReason::FiftyMove => write!(f, "50-move rule"),
            DrawReason::InsufficientMaterial => write!(f, "insufficient material"),
            DrawReason::Repetition => write!(f, "threefold repetition"),
        }
    }
}

impl Position {
    /// Checkmate or stalemate of the side to move, if any.
    pub fn terminal(&self) -> Option<Terminal> {
        self.terminal_with(&legal_moves(self))
    }

    /// Same as [`Position::terminal`] when `moves` is this position's legal
    /// move list; lets callers that already generated moves skip a second pass.
    pub fn terminal_with(&self, moves: &[Move]) -> Option<Terminal> {
        if !moves.is_empty() {
            return None;
        }
        let checked = self.in_check(self.side_to_move);
        Some(match (self.side_to_move, checked) {
            (Color::White, true) => Terminal::WhiteCheckmated,
            (Color::Black, true) => Terminal::BlackCheckmated,
            (Color::White, false) => Terminal::WhiteStalemated,
            (Color::Black, false) => Terminal::BlackStalemated,
        })
    }

    /// The first draw rule that applies, checked in the order
    /// fifty-move, insufficient material, repetition.
    pub fn draw_reason(&self) -> Option<DrawReason> {
        if self.is_fifty_move_draw() {
            Some(DrawReason::FiftyMove)
        } else if self.is_insufficient_material() {
            Some(DrawReason::InsufficientMaterial)
        } else if self.is_repetition() {
            Some(DrawReason::Repetition)
        } else {
            None
        }
    }

    pub fn is_fifty_move_draw(&self) -> bool {
        self.halfmove_clock >= 100
    }

    /// True when the current position has occurred twice before.
    pub fn is_repetition(&self) -> bool {
        let current = self.position_hash();
        self.history.iter().filter(|&&h| h == current).count() >= 2
    }

    /// Bare kings, a single minor piece, or bishops that all stand on one
    /// square colour. Two knights still count as sufficient.
    pub fn is_insufficient_material(&self) -> bool {
        let mut minors = 0;
        let mut knights = 0;
        let mut bishop_square_colors = [false; 2];
        for s in 0..64u8 {
            let Some(pc) = self.piece_at(s) else {
                continue;
            };
            match pc.kind {
                PieceKind::King => {}
                PieceKind::Knight => {
                    minors += 1;
                    knights += 1;
                }
                PieceKind::Bishop => {
                    minors += 1;
                    let light = (file_of(s) + rank_of(s)) % 2 == 1;
                    bishop_square_colors[light as usize] = true;
                }
                PieceKind::Pawn | PieceKind::Rook | PieceKind::Queen => return false,
            }
        }
        match minors {
            0 | 1 => true,
            _ => knights == 0 && !(bishop_square_colors[0] && bishop_square_colors[1]),
        }
    }
}

#[cfg(test)]
#[path = "rules_tests.rs"]
mod rules_tests;
