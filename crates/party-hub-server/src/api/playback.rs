//! Playback signal API handlers.
//!
//! Both endpoints react to external timing signals; the engine never
//! measures playback duration itself.

use actix_web::{post, web, HttpResponse, Responder};

use crate::models::PlaybackSignalRequest;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/parties/{code}/playback/next",
    params(
        ("code" = String, Path, description = "Party code (case-insensitive)")
    ),
    request_body = PlaybackSignalRequest,
    responses(
        (status = 200, description = "Playback state after the skip", body = crate::models::PlaybackResponse),
        (status = 404, description = "Party not found")
    )
)]
#[post("/parties/{code}/playback/next")]
/// Skip to the top-ranked queued track.
pub async fn playback_next(
    state: web::Data<AppState>,
    code: web::Path<String>,
    body: Option<web::Json<PlaybackSignalRequest>>,
) -> impl Responder {
    let track_id = body.and_then(|b| b.into_inner().track_id);
    match state.playback.advance(&code, track_id.as_deref()) {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/parties/{code}/playback/ended",
    params(
        ("code" = String, Path, description = "Party code (case-insensitive)")
    ),
    request_body = PlaybackSignalRequest,
    responses(
        (status = 200, description = "Playback state after the signal", body = crate::models::PlaybackResponse),
        (status = 404, description = "Party not found")
    )
)]
#[post("/parties/{code}/playback/ended")]
/// End-of-track signal from the playback device.
pub async fn playback_ended(
    state: web::Data<AppState>,
    code: web::Path<String>,
    body: Option<web::Json<PlaybackSignalRequest>>,
) -> impl Responder {
    let track_id = body.and_then(|b| b.into_inner().track_id);
    match state.playback.advance(&code, track_id.as_deref()) {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(err) => err.into_response(),
    }
}
