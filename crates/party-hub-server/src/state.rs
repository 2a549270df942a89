//! Shared application state.
//!
//! Holds the party registry, broadcast hub, and the services that operate
//! on them. Services share the registry by reference; party state is never
//! copied out from under its lock.

use std::sync::Arc;

use crate::catalog::CatalogGateway;
use crate::hub::BroadcastHub;
use crate::membership::MembershipTracker;
use crate::playback::PlaybackCoordinator;
use crate::queue_service::QueueService;
use crate::registry::PartyRegistry;

/// Shared application state for Actix handlers and background workers.
pub struct AppState {
    /// Party store keyed by code.
    pub registry: PartyRegistry,
    /// Fan-out hub for live connections.
    pub hub: BroadcastHub,
    /// Queue & vote engine.
    pub queue: QueueService,
    /// Playback coordinator.
    pub playback: PlaybackCoordinator,
    /// Roster tracking.
    pub membership: MembershipTracker,
    /// External track catalog, if configured.
    pub catalog: Option<Arc<dyn CatalogGateway>>,
    /// Public base URL used in join URLs.
    pub public_base_url: String,
}

impl AppState {
    pub fn new(
        registry: PartyRegistry,
        hub: BroadcastHub,
        catalog: Option<Arc<dyn CatalogGateway>>,
        public_base_url: String,
    ) -> Self {
        Self {
            queue: QueueService::new(registry.clone(), hub.clone()),
            playback: PlaybackCoordinator::new(registry.clone(), hub.clone()),
            membership: MembershipTracker::new(registry.clone(), hub.clone()),
            registry,
            hub,
            catalog,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Shareable join URL embedding a party code.
    pub fn join_url(&self, code: &str) -> String {
        format!("{}/join/{}", self.public_base_url, code)
    }
}
