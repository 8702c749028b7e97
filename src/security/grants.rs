//! Player grant table - the host's view of who holds which capability

use super::capability::{Capability, CapabilitySet};
use std::collections::HashMap;
use tracing::debug;

/// Resolves the capabilities of a player. Implemented by the host binding.
pub trait PermissionProvider {
    fn capabilities(&self, player_id: &str) -> CapabilitySet;

    fn has(&self, player_id: &str, capability: Capability) -> bool {
        self.capabilities(player_id).has(capability)
    }
}

/// A known player and the capabilities granted to them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerGrant {
    pub player_id: String,
    pub display_name: String,
    pub capabilities: CapabilitySet,
}

impl PlayerGrant {
    pub fn new(player_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        PlayerGrant {
            player_id: player_id.into(),
            display_name: display_name.into(),
            capabilities: CapabilitySet::new(),
        }
    }

    pub fn with(mut self, capability: Capability) -> Self {
        self.capabilities.grant(capability);
        self
    }
}

/// Grant table keyed by player id, with a fallback set for unknown players
#[derive(Debug, Clone, Default)]
pub struct GrantTable {
    players: HashMap<String, PlayerGrant>,
    default_grants: CapabilitySet,
}

impl GrantTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capabilities applied to players with no entry of their own
    pub fn set_default_grants(&mut self, grants: CapabilitySet) {
        self.default_grants = grants;
    }

    /// Add or replace a player
    pub fn set_player(&mut self, grant: PlayerGrant) {
        debug!(
            player = %grant.player_id,
            capabilities = grant.capabilities.to_sorted_vec().len(),
            "Registered player grants"
        );
        self.players.insert(grant.player_id.clone(), grant);
    }

    pub fn get_player(&self, player_id: &str) -> Option<&PlayerGrant> {
        self.players.get(player_id)
    }

    /// Display name for a player; unknown players are shown by id
    pub fn display_name<'a>(&'a self, player_id: &'a str) -> &'a str {
        self.players
            .get(player_id)
            .map(|p| p.display_name.as_str())
            .unwrap_or(player_id)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

impl PermissionProvider for GrantTable {
    fn capabilities(&self, player_id: &str) -> CapabilitySet {
        self.players
            .get(player_id)
            .map(|p| p.capabilities.clone())
            .unwrap_or_else(|| self.default_grants.clone())
    }
}
