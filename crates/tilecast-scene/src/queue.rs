#![forbid(unsafe_code)]

//! FIFO op queue with optional move coalescing.

use std::collections::{HashMap, VecDeque};

use tilecast_proto::{SceneOp, TexPayload};

/// Pending scene ops.
///
/// With coalescing on, a `move` for an id whose previous `move` is still
/// queued, and has not been followed by any other op for that id, replaces
/// the earlier one in place. Positions are tracked as absolute sequence
/// numbers so popping from the front never invalidates them.
#[derive(Debug, Default)]
pub(crate) struct OpQueue {
    ops: VecDeque<SceneOp>,
    popped: u64,
    pending_moves: HashMap<String, u64>,
    coalesce: bool,
}

impl OpQueue {
    pub(crate) fn new(coalesce: bool) -> Self {
        Self {
            coalesce,
            ..Self::default()
        }
    }

    pub(crate) fn push(&mut self, op: SceneOp) {
        if !self.coalesce {
            self.ops.push_back(op);
            return;
        }
        if let SceneOp::Move { id, .. } = &op {
            if let Some(&seq) = self.pending_moves.get(id) {
                if seq >= self.popped {
                    let index = (seq - self.popped) as usize;
                    if let Some(slot) = self.ops.get_mut(index) {
                        tracing::trace!(id = %id, "coalesced move");
                        *slot = op;
                        return;
                    }
                }
            }
            let seq = self.popped + self.ops.len() as u64;
            self.pending_moves.insert(id.clone(), seq);
        } else if !op.targets_group() {
            self.pending_moves.remove(op.id());
        }
        self.ops.push_back(op);
    }

    pub(crate) fn take(&mut self, n: usize) -> Vec<SceneOp> {
        let n = n.min(self.ops.len());
        self.popped += n as u64;
        let taken: Vec<SceneOp> = self.ops.drain(..n).collect();
        if self.coalesce && !self.pending_moves.is_empty() {
            let popped = self.popped;
            self.pending_moves.retain(|_, seq| *seq >= popped);
        }
        taken
    }

    pub(crate) fn len(&self) -> usize {
        self.ops.len()
    }
}

/// Everything pending, taken in one go by [`Scene::drain`](crate::Scene::drain).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BroadcastQueue {
    pub ops: Vec<SceneOp>,
    pub textures: Vec<TexPayload>,
}

impl BroadcastQueue {
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty() && self.textures.is_empty()
    }
}
