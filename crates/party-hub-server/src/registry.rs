//! In-memory party registry.
//!
//! Owns party records keyed by code: creation, lookup, and idle expiry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use uuid::Uuid;

use crate::error::EngineError;
use crate::hub::{BroadcastHub, PartyServerMessage};
use crate::party::Party;

/// Characters allowed in party codes (uppercase alphanumeric).
const CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Normalize a user-typed code: clients uppercase input, lookups must too.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

fn generate_code(len: usize) -> String {
    // UUID bytes are a convenient entropy source already in the stack;
    // one v4 id covers codes up to 16 characters.
    let bytes = *Uuid::new_v4().as_bytes();
    bytes
        .iter()
        .cycle()
        .take(len)
        .map(|b| CODE_CHARSET[(*b as usize) % CODE_CHARSET.len()] as char)
        .collect()
}

/// Registry of active parties keyed by normalized code.
#[derive(Clone)]
pub struct PartyRegistry {
    parties: Arc<Mutex<HashMap<String, Arc<Party>>>>,
    code_len: usize,
}

impl PartyRegistry {
    pub fn new(code_len: usize) -> Self {
        Self {
            parties: Arc::new(Mutex::new(HashMap::new())),
            code_len: code_len.clamp(4, 16),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Arc<Party>>> {
        self.parties.lock().unwrap_or_else(|err| err.into_inner())
    }

    /// Number of combinations the configured code length allows.
    fn code_space(&self) -> usize {
        CODE_CHARSET
            .len()
            .checked_pow(self.code_len as u32)
            .unwrap_or(usize::MAX)
    }

    /// Create a new party with a fresh code.
    ///
    /// Retries on collision; fails with `CodeSpaceExhausted` only when every
    /// code is taken, which the default length makes practically
    /// unreachable.
    pub fn create(&self, host_name: String) -> Result<Arc<Party>, EngineError> {
        let mut parties = self.lock();
        if parties.len() >= self.code_space() {
            return Err(EngineError::CodeSpaceExhausted);
        }
        let code = loop {
            let candidate = generate_code(self.code_len);
            if !parties.contains_key(&candidate) {
                break candidate;
            }
        };
        let party = Arc::new(Party::new(code.clone(), host_name));
        parties.insert(code.clone(), party.clone());
        tracing::info!(code = %code, "party created");
        Ok(party)
    }

    /// Look up an active party; case-insensitive on the code.
    pub fn get(&self, code: &str) -> Result<Arc<Party>, EngineError> {
        let normalized = normalize_code(code);
        self.lock()
            .get(&normalized)
            .cloned()
            .ok_or(EngineError::PartyNotFound { code: normalized })
    }

    /// Remove a party. Subsequent lookups fail with `PartyNotFound`.
    pub fn expire(&self, code: &str) -> Option<Arc<Party>> {
        let normalized = normalize_code(code);
        let removed = self.lock().remove(&normalized);
        if removed.is_some() {
            tracing::info!(code = %normalized, "party expired");
        }
        removed
    }

    pub fn active_count(&self) -> usize {
        self.lock().len()
    }

    /// Expire parties with no mutating activity past `idle_ttl` and no live
    /// subscribers. Returns the reaped codes.
    pub fn reap_idle(&self, idle_ttl: Duration, hub: &BroadcastHub) -> Vec<String> {
        let stale: Vec<(String, Arc<Party>)> = self
            .lock()
            .iter()
            .map(|(code, party)| (code.clone(), party.clone()))
            .collect();
        let mut reaped = Vec::new();
        for (code, party) in stale {
            let idle = party.lock().last_activity.elapsed() >= idle_ttl;
            if idle && hub.subscriber_count(&code) == 0 {
                self.lock().remove(&code);
                hub.close_party(&code);
                reaped.push(code);
            }
        }
        reaped
    }
}

/// Spawn the background reaper that expires idle parties.
pub fn spawn_party_reaper(
    registry: PartyRegistry,
    hub: BroadcastHub,
    idle_ttl: Duration,
    interval: Duration,
) {
    actix_web::rt::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            for code in registry.reap_idle(idle_ttl, &hub) {
                tracing::info!(code = %code, "idle party reaped");
            }
        }
    });
}

/// Explicit teardown: drop the record and tell subscribers before their
/// bindings are removed.
pub fn teardown(
    registry: &PartyRegistry,
    hub: &BroadcastHub,
    code: &str,
) -> Result<(), EngineError> {
    let party = registry
        .expire(code)
        .ok_or(EngineError::PartyNotFound { code: normalize_code(code) })?;
    hub.publish(&party.code, &PartyServerMessage::PartyClosed);
    hub.close_party(&party.code);
    Ok(())
}
