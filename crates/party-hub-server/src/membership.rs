//! Membership tracking for party rosters.
//!
//! Roster entries count live connections per display name so a name only
//! leaves when its last connection goes away. Names are not identities;
//! uniqueness is scoped to one party.

use crate::error::EngineError;
use crate::hub::{BroadcastHub, PartyServerMessage};
use crate::models::PartySnapshot;
use crate::registry::PartyRegistry;

#[derive(Clone)]
pub struct MembershipTracker {
    registry: PartyRegistry,
    hub: BroadcastHub,
}

impl MembershipTracker {
    pub fn new(registry: PartyRegistry, hub: BroadcastHub) -> Self {
        Self { registry, hub }
    }

    /// Add a display name to the party roster. Idempotent: rejoining with
    /// the same name does not duplicate membership. Broadcasts the updated
    /// party snapshot and returns it.
    pub fn join(&self, code: &str, name: &str) -> Result<PartySnapshot, EngineError> {
        let party = self.registry.get(code)?;
        let mut state = party.lock();
        state.touch();
        state.members.entry(name.to_string()).or_insert(0);
        let snapshot = state.snapshot(&party.code);
        self.hub
            .publish(&party.code, &PartyServerMessage::Party { party: snapshot.clone() });
        Ok(snapshot)
    }

    /// A live connection attached for `name`. Registers the name if the
    /// guest skipped the REST join.
    pub fn connection_opened(&self, code: &str, name: &str) {
        let Ok(party) = self.registry.get(code) else {
            return;
        };
        let mut state = party.lock();
        let count = state.members.entry(name.to_string()).or_insert(0);
        let newly_present = *count == 0;
        *count += 1;
        if newly_present {
            let snapshot = state.snapshot(&party.code);
            self.hub
                .publish(&party.code, &PartyServerMessage::Party { party: snapshot });
        }
    }

    /// A live connection for `name` went away. The name leaves the roster
    /// only when no other connection uses it.
    pub fn connection_closed(&self, code: &str, name: &str) {
        let Ok(party) = self.registry.get(code) else {
            return;
        };
        let mut state = party.lock();
        let Some(count) = state.members.get_mut(name) else {
            return;
        };
        *count = count.saturating_sub(1);
        if *count == 0 {
            state.members.remove(name);
            let snapshot = state.snapshot(&party.code);
            self.hub
                .publish(&party.code, &PartyServerMessage::Party { party: snapshot });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_tracker() -> (MembershipTracker, PartyRegistry) {
        let registry = PartyRegistry::new(8);
        let hub = BroadcastHub::new();
        (MembershipTracker::new(registry.clone(), hub), registry)
    }

    #[test]
    fn join_is_idempotent() {
        let (tracker, registry) = make_tracker();
        let party = registry.create("Alex".to_string()).expect("create");
        let first = tracker.join(&party.code, "Sam").expect("join");
        let second = tracker.join(&party.code, "Sam").expect("rejoin");
        assert_eq!(first.members, second.members);
        assert_eq!(second.members, vec!["Sam".to_string()]);
    }

    #[test]
    fn join_unknown_code_fails() {
        let (tracker, _registry) = make_tracker();
        assert!(matches!(
            tracker.join("NOPE1234", "Sam"),
            Err(EngineError::PartyNotFound { .. })
        ));
    }

    #[test]
    fn name_leaves_only_after_last_connection_closes() {
        let (tracker, registry) = make_tracker();
        let party = registry.create("Alex".to_string()).expect("create");
        tracker.connection_opened(&party.code, "Sam");
        tracker.connection_opened(&party.code, "Sam");
        tracker.connection_closed(&party.code, "Sam");
        assert!(party.lock().members.contains_key("Sam"));
        tracker.connection_closed(&party.code, "Sam");
        assert!(!party.lock().members.contains_key("Sam"));
    }

    #[test]
    fn roster_changes_do_not_touch_the_queue() {
        let (tracker, registry) = make_tracker();
        let party = registry.create("Alex".to_string()).expect("create");
        party.lock().add_entry(
            crate::models::Track {
                id: "t1".to_string(),
                name: "Track".to_string(),
                artist: "Artist".to_string(),
                duration_ms: 1000,
                artwork_url: None,
            },
            "Alex".to_string(),
        );
        tracker.join(&party.code, "Sam").expect("join");
        tracker.connection_opened(&party.code, "Sam");
        tracker.connection_closed(&party.code, "Sam");
        assert_eq!(party.lock().queue.len(), 1);
    }
}
