//! Party lifecycle API handlers.

use actix_web::{delete, get, post, web, HttpResponse, Responder};

use crate::models::{CreatePartyRequest, CreatePartyResponse, JoinPartyRequest};
use crate::registry;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/parties",
    request_body = CreatePartyRequest,
    responses(
        (status = 200, description = "Party created", body = CreatePartyResponse),
        (status = 503, description = "Code space exhausted")
    )
)]
#[post("/parties")]
/// Create a party and return its code and join URL.
pub async fn create_party(
    state: web::Data<AppState>,
    body: web::Json<CreatePartyRequest>,
) -> impl Responder {
    let host_name = body.into_inner().host_name;
    match state.registry.create(host_name) {
        Ok(party) => HttpResponse::Ok().json(CreatePartyResponse {
            join_url: state.join_url(&party.code),
            code: party.code.clone(),
        }),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/parties/{code}",
    params(
        ("code" = String, Path, description = "Party code (case-insensitive)")
    ),
    responses(
        (status = 200, description = "Full party snapshot", body = crate::models::PartySnapshot),
        (status = 404, description = "Party not found")
    )
)]
#[get("/parties/{code}")]
/// Return the full party snapshot. Also the resync path after a missed
/// broadcast.
pub async fn get_party(state: web::Data<AppState>, code: web::Path<String>) -> impl Responder {
    match state.queue.snapshot(&code) {
        Ok(snapshot) => HttpResponse::Ok().json(snapshot),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/parties/{code}/join",
    params(
        ("code" = String, Path, description = "Party code (case-insensitive)")
    ),
    request_body = JoinPartyRequest,
    responses(
        (status = 200, description = "Joined; returns the party snapshot", body = crate::models::PartySnapshot),
        (status = 404, description = "Party not found")
    )
)]
#[post("/parties/{code}/join")]
/// Join a party. Idempotent per display name.
pub async fn join_party(
    state: web::Data<AppState>,
    code: web::Path<String>,
    body: web::Json<JoinPartyRequest>,
) -> impl Responder {
    let name = body.into_inner().name;
    match state.membership.join(&code, &name) {
        Ok(snapshot) => HttpResponse::Ok().json(snapshot),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/parties/{code}",
    params(
        ("code" = String, Path, description = "Party code (case-insensitive)")
    ),
    responses(
        (status = 200, description = "Party closed"),
        (status = 404, description = "Party not found")
    )
)]
#[delete("/parties/{code}")]
/// Tear down a party and notify its subscribers.
pub async fn close_party(state: web::Data<AppState>, code: web::Path<String>) -> impl Responder {
    match registry::teardown(&state.registry, &state.hub, &code) {
        Ok(()) => HttpResponse::Ok().finish(),
        Err(err) => err.into_response(),
    }
}
