//! Distributed Chess Engine
//!
//! Alpha-beta minimax whose move lists are shared out across a group of
//! workers. Each worker group recursively splits into sub-groups until it is
//! down to one worker, which then searches sequentially with pruning.
//!
//! The same code runs on a single worker ([`SoloGroup`]) or on an in-process
//! cluster of threads that only talk through channels ([`Cluster`]).

pub mod cluster;
pub mod config;
pub mod coordinator;
pub mod deepening;
pub mod error;
pub mod eval;
pub mod group;
pub mod ordering;
pub mod partition;
pub mod search;

use chess_core::{legal_moves, Engine, Move, Position, SearchLimits, SearchResult};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub use cluster::{Cluster, LocalGroup};
pub use config::SearchConfig;
pub use coordinator::distributed_search;
pub use deepening::iterative_deepening;
pub use error::{ConfigError, GroupError};
pub use eval::evaluate;
pub use group::{Candidate, Extremum, SoloGroup, WorkerGroup};
pub use ordering::{order_moves, order_score, ordered_moves};
pub use search::{search, search_root, SearchStats, INF_SCORE};

/// What rank 0 sends so every worker searches the same root.
#[derive(Serialize, Deserialize)]
struct RootPosition {
    fen: String,
    history: Vec<u64>,
}

/// Best move for the side to move, searched by this process alone.
pub fn compute_best_move(pos: &Position, limits: &SearchLimits) -> Option<Move> {
    match iterative_deepening(pos, limits, &SoloGroup) {
        Ok(result) => result.best_move,
        Err(err) => {
            warn!(error = %err, "single-worker search failed, playing first legal move");
            legal_moves(pos).first().copied()
        }
    }
}

/// Best move for the side to move, searched by every member of `group`.
///
/// Every member must call this at the same time. The root is taken from
/// rank 0, so other ranks may pass any position.
pub fn compute_best_move_distributed<G: WorkerGroup>(
    pos: &Position,
    limits: &SearchLimits,
    group: &G,
) -> Result<Option<Move>, GroupError> {
    search_distributed(pos, limits, group).map(|result| result.best_move)
}

/// Like [`compute_best_move_distributed`], returning the full search summary.
pub fn search_distributed<G: WorkerGroup>(
    pos: &Position,
    limits: &SearchLimits,
    group: &G,
) -> Result<SearchResult, GroupError> {
    let offered = (group.rank() == 0).then(|| RootPosition {
        fen: pos.to_fen(),
        history: pos.history.clone(),
    });
    let shared: RootPosition = group.broadcast(0, offered)?;
    let mut root = Position::from_fen(&shared.fen)
        .map_err(|err| GroupError::Protocol(format!("bad root position: {err}")))?;
    root.history = shared.history;

    iterative_deepening(&root, limits, group)
}

/// An [`Engine`] that runs each search on a fresh in-process cluster.
#[derive(Debug, Clone)]
pub struct DistributedEngine {
    workers: usize,
}

impl DistributedEngine {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(config.workers)
    }

    pub fn workers(&self) -> usize {
        self.workers
    }
}

impl Default for DistributedEngine {
    fn default() -> Self {
        Self::from_config(&SearchConfig::default())
    }
}

impl Engine for DistributedEngine {
    type Error = GroupError;

    fn search(&mut self, pos: &Position, limits: SearchLimits) -> Result<SearchResult, GroupError> {
        let results = Cluster::run(self.workers, |world| search_distributed(pos, &limits, &world))?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| GroupError::Protocol("cluster returned no results".into()))
    }

    fn name(&self) -> &str {
        "Distributed alpha-beta"
    }
}
