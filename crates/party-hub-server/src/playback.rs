//! Playback coordinator.
//!
//! Reacts to external end-of-track and skip signals by promoting the
//! top-ranked queue entry to now-playing. The engine never measures
//! playback time itself.

use crate::error::EngineError;
use crate::hub::{BroadcastHub, PartyServerMessage};
use crate::models::PlaybackResponse;
use crate::registry::PartyRegistry;

#[derive(Clone)]
pub struct PlaybackCoordinator {
    registry: PartyRegistry,
    hub: BroadcastHub,
}

impl PlaybackCoordinator {
    pub fn new(registry: PartyRegistry, hub: BroadcastHub) -> Self {
        Self { registry, hub }
    }

    /// Advance playback: pop the highest-scored entry (earliest insertion
    /// wins ties) and make it current; with an empty queue the current track
    /// clears.
    ///
    /// `expected_current` guards against racing signals: when it names a
    /// track that is no longer current, another advance already filled the
    /// vacancy and this call is a no-op. The party mutex serializes the
    /// rest, so two signals can never both pop for one vacancy.
    pub fn advance(
        &self,
        code: &str,
        expected_current: Option<&str>,
    ) -> Result<PlaybackResponse, EngineError> {
        let party = self.registry.get(code)?;
        let mut state = party.lock();

        if let Some(expected) = expected_current {
            let current = state.now_playing.as_ref().map(|t| t.id.as_str());
            if current != Some(expected) {
                tracing::debug!(
                    code = %party.code,
                    expected,
                    current = ?current,
                    "stale advance signal ignored"
                );
                return Ok(PlaybackResponse {
                    advanced: false,
                    now_playing: state.now_playing.clone(),
                });
            }
        }

        state.touch();
        let popped = state.pop_next();
        let advanced = popped.is_some();
        state.now_playing = popped.map(|entry| entry.track);
        tracing::debug!(
            code = %party.code,
            advanced,
            now_playing = ?state.now_playing.as_ref().map(|t| t.id.as_str()),
            "playback advanced"
        );
        self.hub.publish(
            &party.code,
            &PartyServerMessage::NowPlaying { track: state.now_playing.clone() },
        );
        if advanced {
            self.hub.publish(
                &party.code,
                &PartyServerMessage::Queue { queue: state.queue_snapshot() },
            );
        }
        Ok(PlaybackResponse {
            advanced,
            now_playing: state.now_playing.clone(),
        })
    }
}
