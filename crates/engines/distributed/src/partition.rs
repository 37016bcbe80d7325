//! Which moves of a node a worker is responsible for.
//!
//! A pure function of (rank, group size, move count), so every member of a
//! group reaches the same decision without talking to the others.

/// One worker's share of a node's move list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assignment {
    /// At least as many moves as workers: each worker splits off alone and
    /// takes every `size`-th move starting at its rank.
    Striped { key: usize, indices: Vec<usize> },
    /// More workers than moves: workers sharing `rank % moves` form one
    /// sub-group and search that single move together.
    Shared { key: usize, index: usize },
}

impl Assignment {
    /// Split key for this worker's sub-group.
    pub fn key(&self) -> usize {
        match self {
            Assignment::Striped { key, .. } | Assignment::Shared { key, .. } => *key,
        }
    }

    /// Move indices this worker searches.
    pub fn indices(&self) -> Vec<usize> {
        match self {
            Assignment::Striped { indices, .. } => indices.clone(),
            Assignment::Shared { index, .. } => vec![*index],
        }
    }
}

/// Assignment for worker `rank` of a group of `size` at a node with
/// `branches` legal moves. `branches` must be at least 1.
pub fn assign(rank: usize, size: usize, branches: usize) -> Assignment {
    debug_assert!(rank < size && branches > 0);
    if size <= branches {
        Assignment::Striped {
            key: rank,
            indices: (rank..branches).step_by(size).collect(),
        }
    } else {
        let index = rank % branches;
        Assignment::Shared { key: index, index }
    }
}

#[cfg(test)]
#[path = "partition_tests.rs"]
mod partition_tests;
