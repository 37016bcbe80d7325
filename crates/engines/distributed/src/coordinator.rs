//! Distributed search: the move list of a node is shared out across the
//! workers of a group, each share is searched in its own sub-group, and the
//! group agrees on the best move with one arg-extremum reduction.
//!
//! There is no pruning between workers. A group only prunes once it is down
//! to a single worker and falls back to [`crate::search`].

use chess_core::{Move, Position};
use tracing::trace;

use crate::error::GroupError;
use crate::group::{Candidate, Extremum, WorkerGroup};
use crate::partition::{assign, Assignment};
use crate::search::{classify, expand, Node, SearchStats};

/// Searches `pos` with every member of `group`.
///
/// All members must call this with the same position and depths; they all
/// return the same score and move.
pub fn distributed_search<G: WorkerGroup>(
    pos: &Position,
    depth: u8,
    max_depth: u8,
    group: &G,
    stats: &mut SearchStats,
) -> Result<(f32, Option<Move>), GroupError> {
    let moves = match classify(pos, depth, max_depth, stats) {
        Node::Scored(score) => return Ok((score, None)),
        Node::Expand(moves) => moves,
    };

    if group.size() == 1 {
        return Ok(expand(
            pos,
            &moves,
            depth,
            max_depth,
            f32::NEG_INFINITY,
            f32::INFINITY,
            stats,
        ));
    }

    let extremum = Extremum::for_side(pos.side_to_move);
    let assignment = assign(group.rank(), group.size(), moves.len());
    trace!(
        depth,
        rank = group.rank(),
        size = group.size(),
        moves = moves.len(),
        ?assignment,
        "partitioned node"
    );

    let local = {
        let sub = group.split(assignment.key())?;
        let local = match assignment {
            Assignment::Striped { indices, .. } => {
                search_share(pos, &moves, &indices, depth, max_depth, &sub, extremum, stats)?
            }
            Assignment::Shared { index, .. } => {
                let mv = moves[index];
                let (score, _) = distributed_search(&pos.apply(mv), depth + 1, max_depth, &sub, stats)?;
                Candidate {
                    score,
                    mv: Some(mv),
                    order: index,
                }
            }
        };
        drop(sub);
        local
    };

    let best = group.reduce_arg_extremum(local, extremum)?;
    Ok((best.score, best.mv))
}

/// The best of this worker's striped moves, each searched in `sub`.
#[allow(clippy::too_many_arguments)]
fn search_share<G: WorkerGroup>(
    pos: &Position,
    moves: &[Move],
    indices: &[usize],
    depth: u8,
    max_depth: u8,
    sub: &G,
    extremum: Extremum,
    stats: &mut SearchStats,
) -> Result<Candidate, GroupError> {
    let mut best: Option<Candidate> = None;
    for &order in indices {
        let mv = moves[order];
        let (score, _) = distributed_search(&pos.apply(mv), depth + 1, max_depth, sub, stats)?;
        let candidate = Candidate {
            score,
            mv: Some(mv),
            order,
        };
        if best.map_or(true, |b| candidate.beats(&b, extremum)) {
            best = Some(candidate);
        }
    }
    best.ok_or_else(|| GroupError::Protocol(format!("worker {} was given no moves", sub.rank())))
}
