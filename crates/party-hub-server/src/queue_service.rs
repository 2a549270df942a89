//! Queue & vote engine.
//!
//! Owns queue mutations for a party and publishes the resulting snapshots.
//! All mutations run under the party lock; events are published before the
//! lock drops so per-party event order matches mutation order.

use crate::error::EngineError;
use crate::hub::{BroadcastHub, PartyServerMessage};
use crate::models::{PartySnapshot, QueueAddResponse, Track, VoteDirection};
use crate::registry::PartyRegistry;

#[derive(Clone)]
pub struct QueueService {
    registry: PartyRegistry,
    hub: BroadcastHub,
}

impl QueueService {
    pub fn new(registry: PartyRegistry, hub: BroadcastHub) -> Self {
        Self { registry, hub }
    }

    /// Append a track to the party queue with score 0. Identical tracks are
    /// not deduplicated; each entry accrues its own votes.
    pub fn add_track(
        &self,
        code: &str,
        track: Track,
        added_by: String,
    ) -> Result<QueueAddResponse, EngineError> {
        let party = self.registry.get(code)?;
        let mut state = party.lock();
        state.touch();
        let index = state.add_entry(track, added_by);
        let entry = state.queue[index].snapshot();
        tracing::debug!(code = %party.code, index, track = %entry.track.id, "track queued");
        self.hub.publish(
            &party.code,
            &PartyServerMessage::Queue { queue: state.queue_snapshot() },
        );
        Ok(QueueAddResponse { index, entry })
    }

    /// Apply a vote to the entry at `index` and return the updated score.
    ///
    /// A stale index (queue mutated since the client's snapshot) is
    /// `EntryNotFound`; the engine never guesses which entry was meant.
    pub fn vote(
        &self,
        code: &str,
        index: usize,
        voter: &str,
        direction: VoteDirection,
    ) -> Result<i32, EngineError> {
        let party = self.registry.get(code)?;
        let mut state = party.lock();
        state.touch();
        let score = state
            .apply_vote(index, voter, direction)
            .ok_or(EngineError::EntryNotFound { index })?;
        self.hub.publish(
            &party.code,
            &PartyServerMessage::Queue { queue: state.queue_snapshot() },
        );
        Ok(score)
    }

    /// Full party snapshot: the initial page load and the resync path after
    /// a missed broadcast.
    pub fn snapshot(&self, code: &str) -> Result<PartySnapshot, EngineError> {
        let party = self.registry.get(code)?;
        let state = party.lock();
        Ok(state.snapshot(&party.code))
    }
}
