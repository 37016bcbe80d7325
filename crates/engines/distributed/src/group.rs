//! The worker-group capability passed down the search recursion.
//!
//! A group is a fixed set of workers numbered `0..size`. Every collective
//! below blocks until all members of the group have called it, so members
//! must issue the same collectives in the same order.

use chess_core::{Color, Move};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::GroupError;

/// Direction of an arg-extremum reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extremum {
    Max,
    Min,
}

impl Extremum {
    /// White maximises, Black minimises.
    pub fn for_side(side: Color) -> Self {
        match side {
            Color::White => Extremum::Max,
            Color::Black => Extremum::Min,
        }
    }

    /// Strict comparison: true when `a` is better than `b` in this direction.
    pub fn prefers(self, a: f32, b: f32) -> bool {
        match self {
            Extremum::Max => a > b,
            Extremum::Min => a < b,
        }
    }
}

/// A scored move offered to an arg-extremum reduction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub score: f32,
    pub mv: Option<Move>,
    /// Position of `mv` in the node's ordered move list.
    pub order: usize,
}

impl Candidate {
    /// True when `self` should replace `other`: a strictly better score, or
    /// an equal score from earlier in the move list.
    pub fn beats(&self, other: &Candidate, extremum: Extremum) -> bool {
        extremum.prefers(self.score, other.score)
            || (self.score == other.score && self.order < other.order)
    }

    pub(crate) fn pick(self, other: Candidate, extremum: Extremum) -> Candidate {
        if other.beats(&self, extremum) {
            other
        } else {
            self
        }
    }
}

/// Collective operations shared by a group of cooperating workers.
pub trait WorkerGroup: Sized {
    /// This worker's index within the group.
    fn rank(&self) -> usize;

    fn size(&self) -> usize;

    fn barrier(&self) -> Result<(), GroupError>;

    /// Every member receives the value supplied by `root`. Values passed by
    /// other members are ignored; `root` must pass `Some`.
    fn broadcast<T>(&self, root: usize, value: Option<T>) -> Result<T, GroupError>
    where
        T: Serialize + DeserializeOwned;

    /// Partitions the group: members passing equal keys end up in the same
    /// sub-group, ranked by their rank in this group. The sub-group is
    /// released when the returned handle is dropped.
    fn split(&self, key: usize) -> Result<Self, GroupError>;

    /// The best candidate across the group, ties going to the lowest order.
    fn reduce_arg_extremum(
        &self,
        local: Candidate,
        extremum: Extremum,
    ) -> Result<Candidate, GroupError>;

    fn sum(&self, local: u64) -> Result<u64, GroupError>;
}

/// The group of one: every collective returns immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoloGroup;

impl WorkerGroup for SoloGroup {
    fn rank(&self) -> usize {
        0
    }

    fn size(&self) -> usize {
        1
    }

    fn barrier(&self) -> Result<(), GroupError> {
        Ok(())
    }

    fn broadcast<T>(&self, root: usize, value: Option<T>) -> Result<T, GroupError>
    where
        T: Serialize + DeserializeOwned,
    {
        if root != 0 {
            return Err(GroupError::Protocol(format!(
                "broadcast root {root} outside a group of 1"
            )));
        }
        value.ok_or_else(|| GroupError::Protocol("broadcast root supplied no value".into()))
    }

    fn split(&self, _key: usize) -> Result<Self, GroupError> {
        Ok(SoloGroup)
    }

    fn reduce_arg_extremum(
        &self,
        local: Candidate,
        _extremum: Extremum,
    ) -> Result<Candidate, GroupError> {
        Ok(local)
    }

    fn sum(&self, local: u64) -> Result<u64, GroupError> {
        Ok(local)
    }
}

#[cfg(test)]
#[path = "group_tests.rs"]
mod group_tests;
