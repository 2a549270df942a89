use actix_web::{get, HttpResponse, Responder};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always "ok" while the process is serving requests.
    pub status: &'static str,
}

/// Liveness probe. Projector pages poll this before opening a socket, and
/// it doubles as the load-balancer check.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Server is up and accepting parties", body = HealthResponse)
    )
)]
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse { status: "ok" })
}
