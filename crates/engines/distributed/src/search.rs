//! Sequential minimax with alpha-beta pruning.
//!
//! White maximises and Black minimises at every node; scores never change
//! sign between plies.

use chess_core::{legal_moves, Color, Move, Position, Terminal};

use crate::eval::evaluate;
use crate::ordering::order_moves;

/// Magnitude of a forced mate. A mate delivered `d` plies from the root
/// scores `INF_SCORE - d`, so shorter mates are more extreme.
pub const INF_SCORE: f32 = 1_000_000.0;

/// Per-worker counters, summed across the group between depths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Terminal and leaf nodes scored.
    pub nodes: u64,
}

/// What a node turned out to be before any of its moves were tried.
pub(crate) enum Node {
    Scored(f32),
    Expand(Vec<Move>),
}

/// Draw rules, mate, stalemate and the depth limit, in that order. A node
/// that survives comes back with its legal moves in search order.
pub(crate) fn classify(pos: &Position, depth: u8, max_depth: u8, stats: &mut SearchStats) -> Node {
    if pos.draw_reason().is_some() {
        return Node::Scored(0.0);
    }

    let mut moves = legal_moves(pos);
    if let Some(terminal) = pos.terminal_with(&moves) {
        stats.nodes += 1;
        let mate = INF_SCORE - f32::from(depth);
        return Node::Scored(match terminal {
            Terminal::WhiteCheckmated => -mate,
            Terminal::BlackCheckmated => mate,
            Terminal::WhiteStalemated | Terminal::BlackStalemated => 0.0,
        });
    }

    if depth >= max_depth {
        stats.nodes += 1;
        return Node::Scored(evaluate(pos));
    }

    order_moves(pos, &mut moves);
    Node::Expand(moves)
}

/// Searches `pos`, found `depth` plies below the root, down to `max_depth`.
///
/// Returns the score and, for nodes with moves left to search, the move that
/// achieved it.
pub fn search(
    pos: &Position,
    depth: u8,
    max_depth: u8,
    alpha: f32,
    beta: f32,
    stats: &mut SearchStats,
) -> (f32, Option<Move>) {
    match classify(pos, depth, max_depth, stats) {
        Node::Scored(score) => (score, None),
        Node::Expand(moves) => expand(pos, &moves, depth, max_depth, alpha, beta, stats),
    }
}

/// [`search`] with an open window, as used at the root.
pub fn search_root(pos: &Position, max_depth: u8, stats: &mut SearchStats) -> (f32, Option<Move>) {
    search(pos, 0, max_depth, f32::NEG_INFINITY, f32::INFINITY, stats)
}

/// The move loop of [`search`], for a node that has already been classified.
pub(crate) fn expand(
    pos: &Position,
    moves: &[Move],
    depth: u8,
    max_depth: u8,
    mut alpha: f32,
    mut beta: f32,
    stats: &mut SearchStats,
) -> (f32, Option<Move>) {
    if moves.is_empty() {
        // Not reachable after classify; score it as a draw.
        return (0.0, None);
    }

    let maximizing = pos.side_to_move == Color::White;
    let mut best_score = if maximizing {
        f32::NEG_INFINITY
    } else {
        f32::INFINITY
    };
    let mut best_move = None;

    for &mv in moves {
        let child = pos.apply(mv);
        let (score, _) = search(&child, depth + 1, max_depth, alpha, beta, stats);

        if maximizing {
            if score > best_score {
                best_score = score;
                best_move = Some(mv);
            }
            alpha = alpha.max(best_score);
        } else {
            if score < best_score {
                best_score = score;
                best_move = Some(mv);
            }
            beta = beta.min(best_score);
        }

        if beta <= alpha {
            break;
        }
    }

    (best_score, best_move)
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod search_tests;
