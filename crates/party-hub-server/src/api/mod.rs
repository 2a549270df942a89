//! HTTP API handlers.
//!
//! Defines the Actix routes for party lifecycle, queue, playback, search,
//! and the websocket channel.

pub mod health;
pub mod party;
pub mod playback;
pub mod queue;
pub mod search;
pub mod ws;

pub use party::{close_party, create_party, get_party, join_party};
pub use playback::{playback_ended, playback_next};
pub use queue::{queue_add, queue_vote};
pub use ws::party_ws;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{test, App};
    use async_trait::async_trait;

    use crate::api;
    use crate::catalog::{CatalogError, CatalogGateway};
    use crate::hub::BroadcastHub;
    use crate::models::{
        CreatePartyRequest, CreatePartyResponse, JoinPartyRequest, PartySnapshot,
        PlaybackResponse, QueueAddRequest, QueueAddResponse, SearchResponse, Track,
        VoteDirection, VoteRequest, VoteResponse,
    };
    use crate::registry::PartyRegistry;
    use crate::state::AppState;

    struct StubCatalog {
        tracks: Vec<Track>,
        fail: bool,
    }

    #[async_trait]
    impl CatalogGateway for StubCatalog {
        async fn search(&self, _query: &str) -> Result<Vec<Track>, CatalogError> {
            if self.fail {
                Err(CatalogError::new("connection refused"))
            } else {
                Ok(self.tracks.clone())
            }
        }
    }

    fn track(id: &str) -> Track {
        Track {
            id: id.to_string(),
            name: format!("Track {id}"),
            artist: "Artist".to_string(),
            duration_ms: 180_000,
            artwork_url: None,
        }
    }

    fn make_state(catalog: Option<Arc<dyn CatalogGateway>>) -> actix_web::web::Data<AppState> {
        let registry = PartyRegistry::new(8);
        let hub = BroadcastHub::new();
        actix_web::web::Data::new(AppState::new(
            registry,
            hub,
            catalog,
            "http://localhost:3000".to_string(),
        ))
    }

    #[actix_web::test]
    async fn create_join_add_vote_round_trip() {
        let state = make_state(None);
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .service(api::create_party)
                .service(api::get_party)
                .service(api::join_party)
                .service(api::queue_add)
                .service(api::queue_vote),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/parties")
            .set_json(CreatePartyRequest { host_name: "Alex".to_string() })
            .to_request();
        let created: CreatePartyResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(created.code.len(), 8);
        assert_eq!(
            created.join_url,
            format!("http://localhost:3000/join/{}", created.code)
        );

        let req = test::TestRequest::post()
            .uri(&format!("/parties/{}/join", created.code))
            .set_json(JoinPartyRequest { name: "Sam".to_string() })
            .to_request();
        let joined: PartySnapshot = test::call_and_read_body_json(&app, req).await;
        assert_eq!(joined.members, vec!["Sam".to_string()]);

        let req = test::TestRequest::post()
            .uri(&format!("/parties/{}/queue", created.code))
            .set_json(QueueAddRequest {
                track: track("t1"),
                added_by: "Sam".to_string(),
            })
            .to_request();
        let added: QueueAddResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(added.index, 0);
        assert_eq!(added.entry.score, 0);

        let req = test::TestRequest::post()
            .uri(&format!("/parties/{}/queue/0/vote", created.code))
            .set_json(VoteRequest {
                voter: "Sam".to_string(),
                direction: VoteDirection::Up,
            })
            .to_request();
        let voted: VoteResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(voted.score, 1);

        // Snapshot read immediately after the mutations reflects them all,
        // and a lowercase code resolves the same party.
        let req = test::TestRequest::get()
            .uri(&format!("/parties/{}", created.code.to_lowercase()))
            .to_request();
        let snapshot: PartySnapshot = test::call_and_read_body_json(&app, req).await;
        assert_eq!(snapshot.host, "Alex");
        assert_eq!(snapshot.queue.len(), 1);
        assert_eq!(snapshot.queue[0].score, 1);
        assert!(snapshot.now_playing.is_none());
    }

    #[actix_web::test]
    async fn unknown_party_code_is_404() {
        let state = make_state(None);
        let app = test::init_service(App::new().app_data(state.clone()).service(api::get_party))
            .await;

        let req = test::TestRequest::get().uri("/parties/NOPE1234").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
        let body = test::read_body(resp).await;
        assert_eq!(body, actix_web::web::Bytes::from("party not found: NOPE1234"));
    }

    #[actix_web::test]
    async fn stale_vote_index_is_404() {
        let state = make_state(None);
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .service(api::create_party)
                .service(api::queue_vote),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/parties")
            .set_json(CreatePartyRequest { host_name: "Alex".to_string() })
            .to_request();
        let created: CreatePartyResponse = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::post()
            .uri(&format!("/parties/{}/queue/3/vote", created.code))
            .set_json(VoteRequest {
                voter: "Sam".to_string(),
                direction: VoteDirection::Down,
            })
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn playback_next_promotes_queued_track() {
        let state = make_state(None);
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .service(api::create_party)
                .service(api::queue_add)
                .service(api::playback_next),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/parties")
            .set_json(CreatePartyRequest { host_name: "Alex".to_string() })
            .to_request();
        let created: CreatePartyResponse = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::post()
            .uri(&format!("/parties/{}/queue", created.code))
            .set_json(QueueAddRequest {
                track: track("t1"),
                added_by: "Sam".to_string(),
            })
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let req = test::TestRequest::post()
            .uri(&format!("/parties/{}/playback/next", created.code))
            .to_request();
        let resp: PlaybackResponse = test::call_and_read_body_json(&app, req).await;
        assert!(resp.advanced);
        assert_eq!(resp.now_playing.expect("current").id, "t1");
    }

    #[actix_web::test]
    async fn closed_party_is_gone() {
        let state = make_state(None);
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .service(api::create_party)
                .service(api::close_party)
                .service(api::get_party),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/parties")
            .set_json(CreatePartyRequest { host_name: "Alex".to_string() })
            .to_request();
        let created: CreatePartyResponse = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::delete()
            .uri(&format!("/parties/{}", created.code))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let req = test::TestRequest::get()
            .uri(&format!("/parties/{}", created.code))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn search_passes_through_catalog_results() {
        let catalog: Arc<dyn CatalogGateway> = Arc::new(StubCatalog {
            tracks: vec![track("t1"), track("t2")],
            fail: false,
        });
        let state = make_state(Some(catalog));
        let app =
            test::init_service(App::new().app_data(state.clone()).service(api::search::search)).await;

        let req = test::TestRequest::get().uri("/search?q=daft%20punk").to_request();
        let resp: SearchResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp.tracks.len(), 2);
    }

    #[actix_web::test]
    async fn search_maps_catalog_failure_to_502() {
        let catalog: Arc<dyn CatalogGateway> = Arc::new(StubCatalog { tracks: Vec::new(), fail: true });
        let state = make_state(Some(catalog));
        let app =
            test::init_service(App::new().app_data(state.clone()).service(api::search::search)).await;

        let req = test::TestRequest::get().uri("/search?q=anything").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_GATEWAY);
    }

    #[actix_web::test]
    async fn search_requires_a_query() {
        let state = make_state(None);
        let app =
            test::init_service(App::new().app_data(state.clone()).service(api::search::search)).await;

        let req = test::TestRequest::get().uri("/search?q=%20").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }
}
