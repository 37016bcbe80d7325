//! Iterative deepening over the distributed search.
//!
//! The clock is only read between depths, by rank 0, and the verdict is
//! broadcast so every member leaves the loop at the same point. A depth that
//! has started always runs to completion.

use chess_core::{legal_moves, Deadline, Position, SearchLimits, SearchResult};
use tracing::{debug, info};

use crate::coordinator::distributed_search;
use crate::error::GroupError;
use crate::group::WorkerGroup;
use crate::search::SearchStats;

/// Searches depth 1, 2, ... up to `limits.depth`, keeping the deepest result
/// that finished inside the time budget.
pub fn iterative_deepening<G: WorkerGroup>(
    root: &Position,
    limits: &SearchLimits,
    group: &G,
) -> Result<SearchResult, GroupError> {
    let deadline = limits.start();
    let mut result = SearchResult {
        best_move: None,
        score: 0.0,
        depth: 0,
        nodes: 0,
        stopped: false,
    };

    for current_depth in 1..=limits.depth {
        if out_of_time(group, &deadline)? {
            result.stopped = true;
            break;
        }

        let mut stats = SearchStats::default();
        let (score, best_move) = distributed_search(root, 0, current_depth, group, &mut stats)?;
        let depth_nodes = group.sum(stats.nodes)?;
        result.nodes += depth_nodes;

        if out_of_time(group, &deadline)? {
            debug!(depth = current_depth, "time budget ran out, discarding depth");
            result.stopped = true;
            break;
        }

        result.best_move = best_move;
        result.score = score;
        result.depth = current_depth;

        if group.rank() == 0 {
            let elapsed = deadline.elapsed().as_secs_f64();
            let knps = if elapsed > 0.0 {
                depth_nodes as f64 / 1000.0 / elapsed
            } else {
                0.0
            };
            info!(
                depth = current_depth,
                score = score / 100.0,
                elapsed_s = elapsed,
                nodes = depth_nodes,
                knps,
                "depth complete"
            );
        }
    }

    if result.best_move.is_none() {
        result.best_move = legal_moves(root).first().copied();
    }
    Ok(result)
}

/// Rank 0 reads the clock; everyone gets its answer.
fn out_of_time<G: WorkerGroup>(group: &G, deadline: &Deadline) -> Result<bool, GroupError> {
    let verdict = (group.rank() == 0).then(|| deadline.expired());
    group.broadcast(0, verdict)
}

#[cfg(test)]
#[path = "deepening_tests.rs"]
mod deepening_tests;
