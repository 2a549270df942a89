use utoipa::OpenApi;

use crate::api;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health,
        api::party::create_party,
        api::party::get_party,
        api::party::join_party,
        api::party::close_party,
        api::queue::queue_add,
        api::queue::queue_vote,
        api::playback::playback_next,
        api::playback::playback_ended,
        api::search::search,
    ),
    components(
        schemas(
            models::Track,
            models::VoteDirection,
            models::QueueEntrySnapshot,
            models::PartySnapshot,
            models::CreatePartyRequest,
            models::CreatePartyResponse,
            models::JoinPartyRequest,
            models::QueueAddRequest,
            models::QueueAddResponse,
            models::VoteRequest,
            models::VoteResponse,
            models::PlaybackSignalRequest,
            models::PlaybackResponse,
            models::SearchResponse,
            api::health::HealthResponse,
        )
    ),
    tags(
        (name = "party-hub-server", description = "Party session & collaborative queue API")
    )
)]
pub struct ApiDoc;
