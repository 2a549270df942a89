//! Engine error taxonomy.

use actix_web::HttpResponse;

use crate::catalog::CatalogError;

/// Errors surfaced by the engine to API callers.
#[derive(Debug)]
pub enum EngineError {
    /// The party code does not resolve to an active party.
    PartyNotFound { code: String },
    /// The queue index is out of range for the current queue (stale client
    /// snapshot; the caller should refetch and retry).
    EntryNotFound { index: usize },
    /// Every code in the code space is in use.
    CodeSpaceExhausted,
    /// The track catalog failed or timed out.
    Catalog(CatalogError),
}

impl EngineError {
    /// Convert an engine error into an HTTP response.
    ///
    /// Bodies stay distinct so clients can tell "bad code" from
    /// "catalog down".
    pub fn into_response(self) -> HttpResponse {
        match self {
            EngineError::PartyNotFound { code } => {
                HttpResponse::NotFound().body(format!("party not found: {code}"))
            }
            EngineError::EntryNotFound { index } => {
                HttpResponse::NotFound().body(format!("queue entry not found: {index}"))
            }
            EngineError::CodeSpaceExhausted => {
                HttpResponse::ServiceUnavailable().body("party code space exhausted")
            }
            EngineError::Catalog(err) => {
                HttpResponse::BadGateway().body(format!("catalog unavailable: {err}"))
            }
        }
    }
}
