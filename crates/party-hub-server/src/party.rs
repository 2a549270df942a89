//! Per-party domain state.
//!
//! Everything here is mutated under the owning party's mutex; no I/O.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use std::time::Instant;

use crate::models::{PartySnapshot, QueueEntrySnapshot, Track, VoteDirection};

/// One track instance in a party's queue with its own vote tally.
#[derive(Clone, Debug)]
pub struct QueueEntry {
    /// The queued track.
    pub track: Track,
    /// Display name that added the entry.
    pub added_by: String,
    /// Net vote score.
    pub score: i32,
    /// Recorded vote per voter; at most one entry per display name.
    pub votes: HashMap<String, VoteDirection>,
    /// Insertion sequence, used to break advancement ties.
    pub seq: u64,
}

impl QueueEntry {
    pub fn snapshot(&self) -> QueueEntrySnapshot {
        QueueEntrySnapshot {
            track: self.track.clone(),
            added_by: self.added_by.clone(),
            score: self.score,
        }
    }
}

/// Mutable state of one party.
#[derive(Debug)]
pub struct PartyState {
    /// Host display name.
    pub host: String,
    /// Roster: display name -> live connection count. A name joined over
    /// REST only sits at zero until a socket attaches.
    pub members: BTreeMap<String, u32>,
    /// Queue in insertion order. Votes never reorder it; advancement picks
    /// by score.
    pub queue: Vec<QueueEntry>,
    /// Currently playing track, if any.
    pub now_playing: Option<Track>,
    /// Next insertion sequence.
    next_seq: u64,
    /// Last mutating activity, used by the idle reaper.
    pub last_activity: Instant,
}

impl PartyState {
    pub fn new(host: String) -> Self {
        Self {
            host,
            members: BTreeMap::new(),
            queue: Vec::new(),
            now_playing: None,
            next_seq: 0,
            last_activity: Instant::now(),
        }
    }

    /// Record mutating activity for idle-expiry purposes.
    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    /// Append a new entry at the tail. Identical tracks may repeat; each
    /// entry accrues its own votes.
    pub fn add_entry(&mut self, track: Track, added_by: String) -> usize {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(QueueEntry {
            track,
            added_by,
            score: 0,
            votes: HashMap::new(),
            seq,
        });
        self.queue.len() - 1
    }

    /// Apply a vote to the entry at `index`.
    ///
    /// First vote adjusts the score by ±1, a same-direction re-vote is a
    /// no-op, and a flip adjusts by ±2 (old vote removed, new one applied).
    /// Returns the updated score, or `None` when the index is stale.
    pub fn apply_vote(
        &mut self,
        index: usize,
        voter: &str,
        direction: VoteDirection,
    ) -> Option<i32> {
        let entry = self.queue.get_mut(index)?;
        match entry.votes.get(voter) {
            Some(prev) if *prev == direction => {}
            Some(_) => {
                entry.score += 2 * direction.delta();
                entry.votes.insert(voter.to_string(), direction);
            }
            None => {
                entry.score += direction.delta();
                entry.votes.insert(voter.to_string(), direction);
            }
        }
        Some(entry.score)
    }

    /// Remove and return the entry chosen by the advancement rule: highest
    /// score, ties broken by earliest insertion.
    pub fn pop_next(&mut self) -> Option<QueueEntry> {
        let mut best: Option<usize> = None;
        for (idx, entry) in self.queue.iter().enumerate() {
            let better = match best {
                Some(b) => {
                    let current = &self.queue[b];
                    entry.score > current.score
                        || (entry.score == current.score && entry.seq < current.seq)
                }
                None => true,
            };
            if better {
                best = Some(idx);
            }
        }
        best.map(|idx| self.queue.remove(idx))
    }

    pub fn queue_snapshot(&self) -> Vec<QueueEntrySnapshot> {
        self.queue.iter().map(QueueEntry::snapshot).collect()
    }

    pub fn snapshot(&self, code: &str) -> PartySnapshot {
        PartySnapshot {
            code: code.to_string(),
            host: self.host.clone(),
            members: self.members.keys().cloned().collect(),
            queue: self.queue_snapshot(),
            now_playing: self.now_playing.clone(),
        }
    }
}

/// A party record owned by the registry. The state mutex is the per-party
/// serialization point for all mutations.
#[derive(Debug)]
pub struct Party {
    /// Normalized (uppercase) party code.
    pub code: String,
    /// Creation timestamp.
    pub created_at: Instant,
    /// Mutable party state.
    pub state: Mutex<PartyState>,
}

impl Party {
    pub fn new(code: String, host: String) -> Self {
        Self {
            code,
            created_at: Instant::now(),
            state: Mutex::new(PartyState::new(host)),
        }
    }

    /// Lock the party state, recovering from poisoning.
    pub fn lock(&self) -> std::sync::MutexGuard<'_, PartyState> {
        self.state.lock().unwrap_or_else(|err| err.into_inner())
    }
}
