//! Catalog search passthrough.

use actix_web::{get, web, HttpResponse, Responder};
use serde::Deserialize;

use crate::error::EngineError;
use crate::models::SearchResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Free-text search query.
    pub q: String,
}

#[utoipa::path(
    get,
    path = "/search",
    params(
        ("q" = String, Query, description = "Free-text search query")
    ),
    responses(
        (status = 200, description = "Candidate tracks", body = SearchResponse),
        (status = 400, description = "Missing query"),
        (status = 502, description = "Catalog unavailable")
    )
)]
#[get("/search")]
/// Search the track catalog. Delegated upstream; no party lock is held.
pub async fn search(state: web::Data<AppState>, query: web::Query<SearchQuery>) -> impl Responder {
    let q = query.q.trim();
    if q.is_empty() {
        return HttpResponse::BadRequest().body("query parameter required");
    }
    let Some(catalog) = state.catalog.as_ref() else {
        return HttpResponse::BadGateway().body("catalog unavailable: not configured");
    };
    match catalog.search(q).await {
        Ok(tracks) => HttpResponse::Ok().json(SearchResponse { tracks }),
        Err(err) => {
            tracing::warn!(error = %err, "catalog search failed");
            EngineError::Catalog(err).into_response()
        }
    }
}
