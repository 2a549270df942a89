//! Queue-related API handlers.

use actix_web::{post, web, HttpResponse, Responder};

use crate::models::{QueueAddRequest, VoteRequest, VoteResponse};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/parties/{code}/queue",
    params(
        ("code" = String, Path, description = "Party code (case-insensitive)")
    ),
    request_body = QueueAddRequest,
    responses(
        (status = 200, description = "Entry created", body = crate::models::QueueAddResponse),
        (status = 404, description = "Party not found")
    )
)]
#[post("/parties/{code}/queue")]
/// Add a track to the party queue.
pub async fn queue_add(
    state: web::Data<AppState>,
    code: web::Path<String>,
    body: web::Json<QueueAddRequest>,
) -> impl Responder {
    let req = body.into_inner();
    match state.queue.add_track(&code, req.track, req.added_by) {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/parties/{code}/queue/{index}/vote",
    params(
        ("code" = String, Path, description = "Party code (case-insensitive)"),
        ("index" = usize, Path, description = "Queue entry index from the caller's snapshot")
    ),
    request_body = VoteRequest,
    responses(
        (status = 200, description = "Updated score", body = VoteResponse),
        (status = 404, description = "Party or entry not found (stale index)")
    )
)]
#[post("/parties/{code}/queue/{index}/vote")]
/// Vote on a queue entry. Re-voting the same direction is a no-op; the
/// opposite direction flips the vote.
pub async fn queue_vote(
    state: web::Data<AppState>,
    path: web::Path<(String, usize)>,
    body: web::Json<VoteRequest>,
) -> impl Responder {
    let (code, index) = path.into_inner();
    let req = body.into_inner();
    match state.queue.vote(&code, index, &req.voter, req.direction) {
        Ok(score) => HttpResponse::Ok().json(VoteResponse { score }),
        Err(err) => err.into_response(),
    }
}
