//! Capability flags and capability sets

use std::collections::HashSet;
use std::fmt;

/// Prefix of every registered permission identifier
pub const PERMISSION_PREFIX: &str = "boomboxstations.";

/// A named permission checked before a command runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Capability {
    /// Add streams, verified at creation
    Add,
    /// Add streams as pending
    AddPending,
    /// Ignore the per-player stream limit
    AddUnlimited,
    /// List any stream
    Get,
    /// List own streams
    GetOwner,
    /// Remove any stream
    Remove,
    /// Remove any pending stream
    RemovePending,
    /// Remove own streams
    RemoveOwner,
    /// Remove own pending streams
    RemovePendingOwner,
    /// Approve pending streams
    Approve,
    /// Clear streams of any status
    Clear,
    /// Clear pending streams only
    ClearPending,
    SetStreamLimit,
    GetStreamLimit,
}

impl Capability {
    /// Every capability, in registration order
    pub const ALL: [Capability; 14] = [
        Capability::AddPending,
        Capability::Add,
        Capability::Get,
        Capability::GetOwner,
        Capability::RemoveOwner,
        Capability::RemovePendingOwner,
        Capability::Remove,
        Capability::RemovePending,
        Capability::Approve,
        Capability::Clear,
        Capability::ClearPending,
        Capability::AddUnlimited,
        Capability::SetStreamLimit,
        Capability::GetStreamLimit,
    ];

    /// Short name used in grants files
    pub fn short_name(&self) -> &'static str {
        match self {
            Capability::Add => "add",
            Capability::AddPending => "add-pending",
            Capability::AddUnlimited => "unlimited",
            Capability::Get => "get",
            Capability::GetOwner => "get-owner",
            Capability::Remove => "remove",
            Capability::RemovePending => "remove-pending",
            Capability::RemoveOwner => "remove-owner",
            Capability::RemovePendingOwner => "remove-pending-owner",
            Capability::Approve => "approve",
            Capability::Clear => "clear",
            Capability::ClearPending => "clear-pending",
            Capability::SetStreamLimit => "set-stream-limit",
            Capability::GetStreamLimit => "get-stream-limit",
        }
    }

    /// Identifier registered with the host permission system
    pub fn permission_id(&self) -> &'static str {
        match self {
            Capability::Add => "boomboxstations.add",
            Capability::AddPending => "boomboxstations.addpending",
            Capability::AddUnlimited => "boomboxstations.addunlimited",
            Capability::Get => "boomboxstations.get",
            Capability::GetOwner => "boomboxstations.getowner",
            Capability::Remove => "boomboxstations.remove",
            Capability::RemovePending => "boomboxstations.removepending",
            Capability::RemoveOwner => "boomboxstations.removeowner",
            Capability::RemovePendingOwner => "boomboxstations.removependingowner",
            Capability::Approve => "boomboxstations.approve",
            Capability::Clear => "boomboxstations.clear",
            Capability::ClearPending => "boomboxstations.clearpending",
            Capability::SetStreamLimit => "boomboxstations.setstreamlimit",
            Capability::GetStreamLimit => "boomboxstations.getstreamlimit",
        }
    }

    /// Parse a short name or a full `boomboxstations.*` identifier
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.short_name() == s || c.permission_id() == s)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// The capabilities one player holds
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilitySet {
    granted: HashSet<Capability>,
}

impl CapabilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set holding every capability
    pub fn all() -> Self {
        Capability::ALL.iter().copied().collect()
    }

    pub fn grant(&mut self, capability: Capability) {
        self.granted.insert(capability);
    }

    pub fn revoke(&mut self, capability: Capability) {
        self.granted.remove(&capability);
    }

    pub fn has(&self, capability: Capability) -> bool {
        self.granted.contains(&capability)
    }

    pub fn has_any(&self, capabilities: &[Capability]) -> bool {
        capabilities.iter().any(|c| self.has(*c))
    }

    pub fn is_empty(&self) -> bool {
        self.granted.is_empty()
    }

    /// Sorted list, for stable output
    pub fn to_sorted_vec(&self) -> Vec<Capability> {
        let mut caps: Vec<Capability> = self.granted.iter().copied().collect();
        caps.sort();
        caps
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        CapabilitySet {
            granted: iter.into_iter().collect(),
        }
    }
}
