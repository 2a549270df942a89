//! API models and OpenAPI schemas.
//!
//! Defines request/response structures for the party hub API.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A track returned by the catalog gateway. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Track {
    /// Catalog track id (opaque to the engine).
    pub id: String,
    /// Track title.
    pub name: String,
    /// Artist display string.
    pub artist: String,
    /// Duration in milliseconds.
    pub duration_ms: u64,
    /// Artwork URL if the catalog provides one.
    #[serde(default)]
    pub artwork_url: Option<String>,
}

/// Direction of a vote on a queue entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    /// Score contribution of a single vote in this direction.
    pub fn delta(self) -> i32 {
        match self {
            VoteDirection::Up => 1,
            VoteDirection::Down => -1,
        }
    }
}

/// One queued track as seen by clients.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct QueueEntrySnapshot {
    /// The queued track.
    pub track: Track,
    /// Display name that added the entry.
    pub added_by: String,
    /// Net vote score (#up - #down among recorded voters).
    pub score: i32,
}

/// Full party state pushed to clients and served by the snapshot endpoint.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct PartySnapshot {
    /// Short party code.
    pub code: String,
    /// Host display name.
    pub host: String,
    /// Present member display names (sorted).
    pub members: Vec<String>,
    /// Queue in insertion order. Scores do not reorder this list.
    pub queue: Vec<QueueEntrySnapshot>,
    /// Currently playing track, if any.
    pub now_playing: Option<Track>,
}

fn default_name() -> String {
    "Anonymous".to_string()
}

/// Payload for the create-party endpoint.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatePartyRequest {
    /// Host display name.
    #[serde(default = "default_name")]
    pub host_name: String,
}

/// Response for the create-party endpoint.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatePartyResponse {
    /// Generated party code.
    pub code: String,
    /// Shareable join URL embedding the code.
    pub join_url: String,
}

/// Payload for the join-party endpoint.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct JoinPartyRequest {
    /// Display name of the joining guest.
    #[serde(default = "default_name")]
    pub name: String,
}

/// Payload for adding a track to the queue.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct QueueAddRequest {
    /// Track to enqueue, as returned by search.
    pub track: Track,
    /// Display name of the member adding it.
    #[serde(default = "default_name")]
    pub added_by: String,
}

/// Response for a queue add: the created entry and its current index.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct QueueAddResponse {
    /// Index of the entry in the current queue snapshot.
    pub index: usize,
    /// The created entry.
    pub entry: QueueEntrySnapshot,
}

/// Payload for voting on a queue entry.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct VoteRequest {
    /// Display name of the voter.
    #[serde(default = "default_name")]
    pub voter: String,
    /// Vote direction.
    pub direction: VoteDirection,
}

/// Response for a vote: the entry's updated score.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct VoteResponse {
    /// Net score after the vote was applied.
    pub score: i32,
}

/// Payload for playback signals (`next` / `ended`).
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct PlaybackSignalRequest {
    /// Track id the caller believes is current. When set and the party has
    /// already moved past it, the signal is a no-op instead of a second
    /// advance.
    #[serde(default)]
    pub track_id: Option<String>,
}

/// Response for playback signals.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct PlaybackResponse {
    /// Whether a queue entry was promoted to now-playing.
    pub advanced: bool,
    /// Current track after the signal, if any.
    pub now_playing: Option<Track>,
}

/// Response for catalog search.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SearchResponse {
    /// Candidate tracks for the query.
    pub tracks: Vec<Track>,
}
