//! An in-process worker cluster: one thread per worker, message channels
//! between every pair, nothing else shared.
//!
//! Collectives are gather-to-leader / release-from-leader exchanges. Group
//! rank 0 collects one payload from every member, combines them and sends
//! the combined payload back. Every message is tagged with the group's
//! context and the collective's sequence number, so a worker that is still
//! finishing a collective in one group can receive (and stash) messages that
//! peers already sent for the next group.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{trace, warn};

use crate::error::GroupError;
use crate::group::{Candidate, Extremum, WorkerGroup};

/// How often a blocked worker wakes up to check whether a peer failed.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

const WORLD_CONTEXT: u64 = 0x5eed_c0de_0000_0001;

struct Envelope {
    from: usize,
    context: u64,
    seq: u64,
    payload: Vec<u8>,
}

/// Channel ends handed to a worker thread before it starts.
struct Wiring {
    world_rank: usize,
    inbox: Receiver<Envelope>,
    peers: Vec<Sender<Envelope>>,
    poisoned: Arc<AtomicBool>,
}

/// Per-thread state shared by every group handle the worker holds.
struct Endpoint {
    world_rank: usize,
    inbox: Receiver<Envelope>,
    peers: Vec<Sender<Envelope>>,
    stash: RefCell<Vec<Envelope>>,
    poisoned: Arc<AtomicBool>,
    opened: Cell<usize>,
    released: Cell<usize>,
}

impl Endpoint {
    fn new(wiring: Wiring) -> Self {
        Self {
            world_rank: wiring.world_rank,
            inbox: wiring.inbox,
            peers: wiring.peers,
            stash: RefCell::new(Vec::new()),
            poisoned: wiring.poisoned,
            opened: Cell::new(0),
            released: Cell::new(0),
        }
    }

    fn send(&self, to: usize, context: u64, seq: u64, payload: Vec<u8>) -> Result<(), GroupError> {
        let envelope = Envelope {
            from: self.world_rank,
            context,
            seq,
            payload,
        };
        self.peers[to].send(envelope).map_err(|_| {
            // A peer that left after a failure elsewhere is not the cause.
            if self.poisoned.load(Ordering::SeqCst) {
                GroupError::Aborted {
                    rank: self.world_rank,
                }
            } else {
                GroupError::Disconnected {
                    rank: self.world_rank,
                    peer: to,
                }
            }
        })
    }

    fn recv(&self, from: usize, context: u64, seq: u64) -> Result<Vec<u8>, GroupError> {
        let wanted = |env: &Envelope| env.from == from && env.context == context && env.seq == seq;

        {
            let mut stash = self.stash.borrow_mut();
            if let Some(at) = stash.iter().position(|env| wanted(env)) {
                return Ok(stash.swap_remove(at).payload);
            }
        }

        loop {
            match self.inbox.recv_timeout(POLL_INTERVAL) {
                Ok(env) if wanted(&env) => return Ok(env.payload),
                Ok(env) if env.from == from && env.context == context => {
                    return Err(GroupError::Protocol(format!(
                        "worker {} expected collective #{seq} from {from}, got #{}",
                        self.world_rank, env.seq
                    )));
                }
                Ok(env) => self.stash.borrow_mut().push(env),
                Err(RecvTimeoutError::Timeout) => {
                    if self.poisoned.load(Ordering::SeqCst) {
                        return Err(GroupError::Aborted {
                            rank: self.world_rank,
                        });
                    }
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(GroupError::Disconnected {
                        rank: self.world_rank,
                        peer: from,
                    });
                }
            }
        }
    }
}

/// Derives a child group's context from its parent, so members agree on it
/// without exchanging anything.
fn child_context(parent: u64, split_index: u64, key: usize) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

    let mut h = FNV_OFFSET;
    for word in [parent, split_index, key as u64] {
        for byte in word.to_le_bytes() {
            h ^= u64::from(byte);
            h = h.wrapping_mul(FNV_PRIME);
        }
    }
    h
}

/// A handle on one group of a [`Cluster`], owned by one worker thread.
///
/// Handles returned by [`WorkerGroup::split`] count as released when dropped.
pub struct LocalGroup {
    endpoint: Rc<Endpoint>,
    /// World ranks of the members, indexed by group rank.
    members: Vec<usize>,
    rank: usize,
    context: u64,
    seq: Cell<u64>,
    splits: Cell<u64>,
    is_subgroup: bool,
}

impl LocalGroup {
    fn world(wiring: Wiring, size: usize) -> Self {
        let rank = wiring.world_rank;
        Self {
            endpoint: Rc::new(Endpoint::new(wiring)),
            members: (0..size).collect(),
            rank,
            context: WORLD_CONTEXT,
            seq: Cell::new(0),
            splits: Cell::new(0),
            is_subgroup: false,
        }
    }

    /// Rank of this worker in the whole cluster.
    pub fn world_rank(&self) -> usize {
        self.endpoint.world_rank
    }

    /// Sub-groups this worker has created so far, across all its handles.
    pub fn split_count(&self) -> usize {
        self.endpoint.opened.get()
    }

    /// Sub-group handles this worker has dropped so far.
    pub fn release_count(&self) -> usize {
        self.endpoint.released.get()
    }

    pub fn open_subgroups(&self) -> usize {
        self.split_count() - self.release_count()
    }

    fn exchange<F>(&self, payload: Vec<u8>, combine: F) -> Result<Vec<u8>, GroupError>
    where
        F: FnOnce(Vec<Vec<u8>>) -> Result<Vec<u8>, GroupError>,
    {
        let seq = self.seq.get();
        self.seq.set(seq + 1);

        let leader = self.members[0];
        let endpoint = &self.endpoint;
        if self.rank != 0 {
            endpoint.send(leader, self.context, seq, payload)?;
            return endpoint.recv(leader, self.context, seq);
        }

        let mut gathered = Vec::with_capacity(self.members.len());
        gathered.push(payload);
        for &peer in &self.members[1..] {
            gathered.push(endpoint.recv(peer, self.context, seq)?);
        }
        let combined = combine(gathered)?;
        for &peer in &self.members[1..] {
            endpoint.send(peer, self.context, seq, combined.clone())?;
        }
        Ok(combined)
    }

    fn gather_fold<T, F>(&self, local: T, fold: F) -> Result<T, GroupError>
    where
        T: Serialize + DeserializeOwned,
        F: Fn(T, T) -> T,
    {
        let combined = self.exchange(serde_json::to_vec(&local)?, |parts| {
            let mut acc: Option<T> = None;
            for part in &parts {
                let value: T = serde_json::from_slice(part)?;
                acc = Some(match acc {
                    None => value,
                    Some(prev) => fold(prev, value),
                });
            }
            let acc = acc.ok_or_else(|| GroupError::Protocol("empty group".into()))?;
            Ok(serde_json::to_vec(&acc)?)
        })?;
        Ok(serde_json::from_slice(&combined)?)
    }
}

impl WorkerGroup for LocalGroup {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.members.len()
    }

    fn barrier(&self) -> Result<(), GroupError> {
        self.exchange(Vec::new(), |_| Ok(Vec::new())).map(|_| ())
    }

    fn broadcast<T>(&self, root: usize, value: Option<T>) -> Result<T, GroupError>
    where
        T: Serialize + DeserializeOwned,
    {
        if root >= self.size() {
            return Err(GroupError::Protocol(format!(
                "broadcast root {root} outside a group of {}",
                self.size()
            )));
        }
        let payload = if self.rank == root {
            let value = value
                .ok_or_else(|| GroupError::Protocol("broadcast root supplied no value".into()))?;
            serde_json::to_vec(&value)?
        } else {
            Vec::new()
        };
        let combined = self.exchange(payload, |mut parts| Ok(parts.swap_remove(root)))?;
        Ok(serde_json::from_slice(&combined)?)
    }

    fn split(&self, key: usize) -> Result<Self, GroupError> {
        let keys: Vec<usize> = {
            let combined = self.exchange(serde_json::to_vec(&key)?, |parts| {
                let keys = parts
                    .iter()
                    .map(|p| serde_json::from_slice::<usize>(p))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(serde_json::to_vec(&keys)?)
            })?;
            serde_json::from_slice(&combined)?
        };

        let members: Vec<usize> = keys
            .iter()
            .zip(&self.members)
            .filter(|(k, _)| **k == key)
            .map(|(_, &world)| world)
            .collect();
        let rank = members
            .iter()
            .position(|&world| world == self.endpoint.world_rank)
            .ok_or_else(|| GroupError::Protocol("split lost the calling worker".into()))?;

        let index = self.splits.get();
        self.splits.set(index + 1);
        let context = child_context(self.context, index, key);
        self.endpoint.opened.set(self.endpoint.opened.get() + 1);
        trace!(
            worker = self.endpoint.world_rank,
            key,
            size = members.len(),
            context,
            "opened sub-group"
        );

        Ok(LocalGroup {
            endpoint: Rc::clone(&self.endpoint),
            members,
            rank,
            context,
            seq: Cell::new(0),
            splits: Cell::new(0),
            is_subgroup: true,
        })
    }

    fn reduce_arg_extremum(
        &self,
        local: Candidate,
        extremum: Extremum,
    ) -> Result<Candidate, GroupError> {
        self.gather_fold(local, |acc, next| acc.pick(next, extremum))
    }

    fn sum(&self, local: u64) -> Result<u64, GroupError> {
        self.gather_fold(local, |a, b| a + b)
    }
}

impl Drop for LocalGroup {
    fn drop(&mut self) {
        if self.is_subgroup {
            self.endpoint.released.set(self.endpoint.released.get() + 1);
            trace!(
                worker = self.endpoint.world_rank,
                context = self.context,
                "released sub-group"
            );
        }
    }
}

/// Marks the cluster as failed if the worker thread unwinds.
struct PoisonOnPanic<'a>(&'a AtomicBool);

impl Drop for PoisonOnPanic<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.store(true, Ordering::SeqCst);
        }
    }
}

/// Runs a fixed pool of workers to completion.
pub struct Cluster;

impl Cluster {
    /// Runs `work` on `size` worker threads, each receiving its handle on the
    /// world group, and returns the results in rank order.
    ///
    /// If any worker fails, the others are woken out of pending collectives
    /// with [`GroupError::Aborted`] and the first real failure is returned.
    pub fn run<R, F>(size: usize, work: F) -> Result<Vec<R>, GroupError>
    where
        R: Send,
        F: Fn(LocalGroup) -> Result<R, GroupError> + Sync,
    {
        if size == 0 {
            return Err(GroupError::Protocol("a cluster needs at least one worker".into()));
        }

        let poisoned = Arc::new(AtomicBool::new(false));
        let (senders, inboxes): (Vec<_>, Vec<_>) = (0..size).map(|_| unbounded()).unzip();
        let wirings: Vec<Wiring> = inboxes
            .into_iter()
            .enumerate()
            .map(|(world_rank, inbox)| Wiring {
                world_rank,
                inbox,
                peers: senders.clone(),
                poisoned: Arc::clone(&poisoned),
            })
            .collect();
        drop(senders);

        let work = &work;
        let outcomes: Vec<Result<R, GroupError>> = thread::scope(|scope| {
            let handles: Vec<_> = wirings
                .into_iter()
                .map(|wiring| {
                    scope.spawn(move || {
                        let rank = wiring.world_rank;
                        let poisoned = Arc::clone(&wiring.poisoned);
                        let _guard = PoisonOnPanic(&poisoned);
                        let result = work(LocalGroup::world(wiring, size));
                        if let Err(err) = &result {
                            if !matches!(err, GroupError::Aborted { .. }) {
                                warn!(worker = rank, error = %err, "worker failed, aborting cluster");
                            }
                            poisoned.store(true, Ordering::SeqCst);
                        }
                        result
                    })
                })
                .collect();

            handles
                .into_iter()
                .enumerate()
                .map(|(rank, handle)| {
                    handle.join().unwrap_or_else(|_| {
                        warn!(worker = rank, "worker panicked");
                        Err(GroupError::WorkerPanicked(rank))
                    })
                })
                .collect()
        });

        let mut results = Vec::with_capacity(size);
        let mut first_abort = None;
        for outcome in outcomes {
            match outcome {
                Ok(value) => results.push(value),
                Err(err @ GroupError::Aborted { .. }) => {
                    if first_abort.is_none() {
                        first_abort = Some(err);
                    }
                }
                Err(err) => return Err(err),
            }
        }
        match first_abort {
            Some(err) => Err(err),
            None => Ok(results),
        }
    }
}

#[cfg(test)]
#[path = "cluster_tests.rs"]
mod cluster_tests;
