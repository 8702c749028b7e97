//! Deterministic Simulation Testing for the station manager.
//!
//! Shadow-state harness that enables:
//! - Deterministic random operation generation (add, remove, owner remove,
//!   approve, clear, limit changes)
//! - Invariant checking after each operation
//! - Seed-based reproducibility for debugging
//!
//! The shadow model is the reference: the real `StationManager` must agree
//! with it for every seed.

use super::error::{AddStreamError, RemoveError};
use super::manager::{AddStreamRequest, ManagerOptions, StationManager, DEFAULT_DATA_KEY};
use super::record::{OwnerInfo, StatusFilter, StreamStatus, MAX_NAME_LEN};
use super::store::StationData;
use crate::playback::RecordingPlayback;
use crate::security::{Capability, CapabilitySet};
use crate::simulator::DeterministicRng;
use crate::storage::{InMemoryObjectStore, ObjectStore};

/// Submitted URL and the normalized form it must be stored as (`None` = rejected)
const URL_POOL: &[(&str, Option<&str>)] = &[
    ("example.com/stream", Some("http://example.com/stream")),
    ("http://radio.example/live", Some("http://radio.example/live")),
    ("https://secure.example:8443/a.mp3", Some("https://secure.example:8443/a.mp3")),
    ("ftp://example.com", None),
    ("http://", None),
];

/// Configuration for station DST
#[derive(Debug, Clone)]
pub struct StationDSTConfig {
    /// Random seed for reproducibility
    pub seed: u64,
    /// Number of distinct players
    pub num_players: usize,
    /// Number of distinct stream names
    pub num_names: usize,
    /// Probability of an add operation
    pub add_prob: f64,
    /// Probability of a clear operation
    pub clear_prob: f64,
    /// Probability that a submitted name is one character too long
    pub long_name_prob: f64,
}

impl Default for StationDSTConfig {
    fn default() -> Self {
        StationDSTConfig {
            seed: 0,
            num_players: 6,
            num_names: 20,
            add_prob: 0.5,
            clear_prob: 0.02,
            long_name_prob: 0.05,
        }
    }
}

impl StationDSTConfig {
    pub fn new(seed: u64) -> Self {
        StationDSTConfig {
            seed,
            ..Default::default()
        }
    }

    /// Few players, so quotas are hit constantly
    pub fn crowded(seed: u64) -> Self {
        StationDSTConfig {
            seed,
            num_players: 2,
            add_prob: 0.7,
            ..Default::default()
        }
    }

    /// Lots of removals and clears (ID recycling)
    pub fn high_churn(seed: u64) -> Self {
        StationDSTConfig {
            seed,
            num_players: 10,
            add_prob: 0.4,
            clear_prob: 0.1,
            ..Default::default()
        }
    }
}

/// Operation type for logging
#[derive(Debug, Clone)]
pub enum StationOp {
    Add {
        player: String,
        name: String,
        url: String,
        verified: bool,
        caps: Vec<Capability>,
    },
    Remove { id: u32 },
    RemoveOwned { id: u32, player: String },
    Approve { id: u32 },
    Clear { status: StatusFilter },
    SetLimit { limit: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ShadowRecord {
    id: u32,
    name: String,
    url: String,
    status: StreamStatus,
    owner_id: String,
}

/// Result of a station DST run
#[derive(Debug, Clone)]
pub struct StationDSTResult {
    pub seed: u64,
    pub total_operations: u64,
    pub adds: u64,
    pub rejected_adds: u64,
    pub removes: u64,
    pub approvals: u64,
    pub clears: u64,
    pub invariant_violations: Vec<String>,
    pub last_op: Option<StationOp>,
}

impl StationDSTResult {
    pub fn new(seed: u64) -> Self {
        StationDSTResult {
            seed,
            total_operations: 0,
            adds: 0,
            rejected_adds: 0,
            removes: 0,
            approvals: 0,
            clears: 0,
            invariant_violations: Vec::new(),
            last_op: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.invariant_violations.is_empty()
    }

    pub fn summary(&self) -> String {
        format!(
            "Seed {}: {} ops (adds:{}, rejected:{}, removes:{}, approvals:{}, clears:{}), {} violations",
            self.seed,
            self.total_operations,
            self.adds,
            self.rejected_adds,
            self.removes,
            self.approvals,
            self.clears,
            self.invariant_violations.len()
        )
    }
}

/// DST harness for StationManager
pub struct StationDSTHarness {
    config: StationDSTConfig,
    rng: DeterministicRng,
    manager: StationManager,
    store: InMemoryObjectStore,
    playback: RecordingPlayback,
    shadow: Vec<ShadowRecord>,
    shadow_limit: u32,
    result: StationDSTResult,
}

impl StationDSTHarness {
    pub fn new(config: StationDSTConfig) -> Self {
        let store = InMemoryObjectStore::new();
        let playback = RecordingPlayback::new();
        let options = ManagerOptions::default();
        let shadow_limit = options.default_limit;
        let manager = StationManager::open(
            Box::new(store.clone()),
            Box::new(playback.clone()),
            options,
        );
        StationDSTHarness {
            rng: DeterministicRng::new(config.seed),
            result: StationDSTResult::new(config.seed),
            config,
            manager,
            store,
            playback,
            shadow: Vec::new(),
            shadow_limit,
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::new(StationDSTConfig::new(seed))
    }

    fn random_player(&mut self) -> String {
        format!("player{}", self.rng.gen_range(0, self.config.num_players as u64))
    }

    fn random_name(&mut self) -> String {
        if self.rng.gen_bool(self.config.long_name_prob) {
            return "x".repeat(MAX_NAME_LEN + 1);
        }
        format!("Station {}", self.rng.gen_range(0, self.config.num_names as u64))
    }

    /// An existing id most of the time, occasionally a missing one
    fn random_id(&mut self) -> u32 {
        let ids: Vec<u32> = self.shadow.iter().map(|r| r.id).collect();
        match self.rng.choose(&ids) {
            Some(&id) if !self.rng.gen_bool(0.1) => id,
            _ => self.rng.gen_range(0, 64) as u32,
        }
    }

    fn random_caps(&mut self) -> Vec<Capability> {
        let mut caps = Vec::new();
        match self.rng.gen_range(0, 10) {
            0 => {}
            1..=4 => caps.push(Capability::AddPending),
            _ => caps.push(Capability::Add),
        }
        if self.rng.gen_bool(0.15) {
            caps.push(Capability::AddUnlimited);
        }
        caps
    }

    fn shadow_next_id(&self) -> u32 {
        (0u32..)
            .find(|candidate| !self.shadow.iter().any(|r| r.id == *candidate))
            .unwrap_or(0)
    }

    fn shadow_url_list(&self) -> String {
        self.shadow
            .iter()
            .filter(|r| r.status == StreamStatus::Verified)
            .map(|r| format!("{},{}", r.name, r.url))
            .collect::<Vec<_>>()
            .join(",")
    }

    fn run_single_op(&mut self) {
        let roll = self.rng.gen_range(0, 1000) as f64 / 1000.0;

        let outcome = if roll < self.config.clear_prob {
            self.op_clear()
        } else if roll < self.config.clear_prob + self.config.add_prob {
            self.op_add()
        } else {
            match self.rng.gen_range(0, 7) {
                0 | 1 => self.op_remove(),
                2 | 3 => self.op_remove_owned(),
                4 | 5 => self.op_approve(),
                _ => self.op_set_limit(),
            }
        };

        self.result.total_operations += 1;

        let checked = outcome.and_then(|_| self.check_invariants());
        if let Err(violation) = checked {
            self.result.invariant_violations.push(format!(
                "Op #{}: {:?} - {}",
                self.result.total_operations, self.result.last_op, violation
            ));
        }
    }

    fn op_add(&mut self) -> Result<(), String> {
        let player = self.random_player();
        let name = self.random_name();
        let (url, expected_url) = self.rng.choose(URL_POOL).copied().unwrap_or(URL_POOL[0]);
        let verified = self.rng.gen_bool(0.5);
        let caps = self.random_caps();
        self.result.last_op = Some(StationOp::Add {
            player: player.clone(),
            name: name.clone(),
            url: url.to_string(),
            verified,
            caps: caps.clone(),
        });

        let cap_set: CapabilitySet = caps.iter().copied().collect();
        let can_verify = cap_set.has(Capability::Add);
        let owned = self.shadow.iter().filter(|r| r.owner_id == player).count();

        let expected = if !can_verify && !cap_set.has(Capability::AddPending) {
            Err(AddStreamError::PermissionDenied)
        } else if !cap_set.has(Capability::AddUnlimited) && owned >= self.shadow_limit as usize {
            Err(AddStreamError::QuotaExceeded {
                limit: self.shadow_limit,
            })
        } else if name.chars().count() > MAX_NAME_LEN {
            Err(AddStreamError::NameTooLong {
                length: name.chars().count(),
            })
        } else {
            match expected_url {
                Some(normalized) => Ok(ShadowRecord {
                    id: self.shadow_next_id(),
                    name: name.clone(),
                    url: normalized.to_string(),
                    status: if verified && can_verify {
                        StreamStatus::Verified
                    } else {
                        StreamStatus::Pending
                    },
                    owner_id: player.clone(),
                }),
                None => Err(AddStreamError::InvalidUrl {
                    url: url.to_string(),
                }),
            }
        };

        let actual = self.manager.add_stream(
            AddStreamRequest {
                name,
                url: url.to_string(),
                owner: OwnerInfo::new(player.to_uppercase(), player),
                requested_verified: verified,
            },
            &cap_set,
        );

        match (actual, expected) {
            (Ok(record), Ok(shadow)) => {
                let got = ShadowRecord {
                    id: record.id,
                    name: record.name,
                    url: record.url,
                    status: record.status,
                    owner_id: record.owner.owner_id,
                };
                if got != shadow {
                    return Err(format!("Added {:?}, expected {:?}", got, shadow));
                }
                self.shadow.push(shadow);
                self.result.adds += 1;
                Ok(())
            }
            (Err(actual), Err(expected)) if actual == expected => {
                self.result.rejected_adds += 1;
                Ok(())
            }
            (actual, expected) => Err(format!(
                "Add outcome mismatch: actual={:?}, expected={:?}",
                actual.map(|r| r.id),
                expected.map(|r| r.id)
            )),
        }
    }

    fn op_remove(&mut self) -> Result<(), String> {
        let id = self.random_id();
        self.result.last_op = Some(StationOp::Remove { id });

        let position = self.shadow.iter().position(|r| r.id == id);
        let removed = self.manager.remove_stream(id);
        match (removed, position) {
            (Some(record), Some(index)) => {
                self.shadow.remove(index);
                self.result.removes += 1;
                if record.id != id {
                    return Err(format!("Removed id {} when asked for {}", record.id, id));
                }
                Ok(())
            }
            (None, None) => Ok(()),
            (actual, expected) => Err(format!(
                "Remove mismatch for id {}: actual={:?}, expected index={:?}",
                id,
                actual.map(|r| r.id),
                expected
            )),
        }
    }

    fn op_remove_owned(&mut self) -> Result<(), String> {
        let id = self.random_id();
        let player = self.random_player();
        self.result.last_op = Some(StationOp::RemoveOwned {
            id,
            player: player.clone(),
        });

        let expected = match self.shadow.iter().position(|r| r.id == id) {
            None => Err(RemoveError::NotFound),
            Some(index) if self.shadow[index].owner_id != player => Err(RemoveError::NotOwner),
            Some(index) => Ok(index),
        };
        let actual = self.manager.remove_owned_stream(id, &player);

        match (actual, expected) {
            (Ok(_), Ok(index)) => {
                self.shadow.remove(index);
                self.result.removes += 1;
                Ok(())
            }
            (Err(a), Err(e)) if a == e => Ok(()),
            (actual, expected) => Err(format!(
                "Owner remove mismatch: actual={:?}, expected={:?}",
                actual.map(|r| r.id),
                expected
            )),
        }
    }

    fn op_approve(&mut self) -> Result<(), String> {
        let id = self.random_id();
        self.result.last_op = Some(StationOp::Approve { id });

        let approved = self.manager.approve_stream(id);
        match (approved, self.shadow.iter_mut().find(|r| r.id == id)) {
            (Some(record), Some(shadow)) => {
                shadow.status = StreamStatus::Verified;
                self.result.approvals += 1;
                if record.status != StreamStatus::Verified {
                    return Err(format!("Approved record {} still {:?}", id, record.status));
                }
                Ok(())
            }
            (None, None) => Ok(()),
            (actual, _) => Err(format!(
                "Approve mismatch for id {}: manager found={}",
                id,
                actual.is_some()
            )),
        }
    }

    fn op_clear(&mut self) -> Result<(), String> {
        let status = match self.rng.gen_range(0, 3) {
            0 => StatusFilter::Pending,
            1 => StatusFilter::Verified,
            _ => StatusFilter::Any,
        };
        self.result.last_op = Some(StationOp::Clear { status });

        let before = self.shadow.len();
        self.shadow.retain(|r| !status.matches(r.status));
        let expected = before - self.shadow.len();

        let removed = self.manager.clear_streams(status);
        self.result.clears += 1;
        if removed != expected {
            return Err(format!("Cleared {} records, expected {}", removed, expected));
        }
        Ok(())
    }

    fn op_set_limit(&mut self) -> Result<(), String> {
        let limit = self.rng.gen_range(0, 6) as u32;
        self.result.last_op = Some(StationOp::SetLimit { limit });

        self.manager.set_stream_limit(limit);
        self.shadow_limit = limit;
        Ok(())
    }

    fn check_invariants(&self) -> Result<(), String> {
        let data = self.manager.data();

        // Invariant 1: IDs are unique
        if !data.ids_unique() {
            return Err("Duplicate stream IDs".to_string());
        }

        // Invariant 2: Records match the shadow, in order
        let actual: Vec<ShadowRecord> = data
            .streams
            .iter()
            .map(|r| ShadowRecord {
                id: r.id,
                name: r.name.clone(),
                url: r.url.clone(),
                status: r.status,
                owner_id: r.owner.owner_id.clone(),
            })
            .collect();
        if actual != self.shadow {
            return Err(format!(
                "Record mismatch: actual={} records, expected={} records",
                actual.len(),
                self.shadow.len()
            ));
        }

        // Invariant 3: Quota matches
        if data.quota.max_streams_per_player != self.shadow_limit {
            return Err(format!(
                "Limit mismatch: actual={}, expected={}",
                data.quota.max_streams_per_player, self.shadow_limit
            ));
        }

        // Invariant 4: Persisted aggregate equals memory
        let bytes = self
            .store
            .get(DEFAULT_DATA_KEY)
            .map_err(|e| format!("Persisted data missing: {}", e))?;
        let persisted: StationData = serde_json::from_slice(&bytes)
            .map_err(|e| format!("Persisted data corrupt: {}", e))?;
        if &persisted != data {
            return Err("Persisted aggregate differs from memory".to_string());
        }

        // Invariant 5: Playback saw the current verified projection
        let expected_list = self.shadow_url_list();
        if self.playback.last().as_deref() != Some(expected_list.as_str()) {
            return Err(format!(
                "Playback list mismatch: actual={:?}, expected={:?}",
                self.playback.last(),
                expected_list
            ));
        }

        Ok(())
    }

    pub fn run(&mut self, operations: usize) {
        for _ in 0..operations {
            self.run_single_op();
            if !self.result.invariant_violations.is_empty() {
                break;
            }
        }
    }

    pub fn result(&self) -> &StationDSTResult {
        &self.result
    }

    pub fn manager(&self) -> &StationManager {
        &self.manager
    }
}

/// Run a batch of DST tests
pub fn run_station_batch(
    start_seed: u64,
    num_seeds: usize,
    ops_per_seed: usize,
    config_fn: fn(u64) -> StationDSTConfig,
) -> Vec<StationDSTResult> {
    (0..num_seeds)
        .map(|i| {
            let seed = start_seed + i as u64;
            let mut harness = StationDSTHarness::new(config_fn(seed));
            harness.run(ops_per_seed);
            harness.result().clone()
        })
        .collect()
}

/// Summarize batch results
pub fn summarize_station_batch(results: &[StationDSTResult]) -> String {
    let total = results.len();
    let passed = results.iter().filter(|r| r.is_success()).count();
    let failed = total - passed;
    let total_ops: u64 = results.iter().map(|r| r.total_operations).sum();

    let mut summary = format!(
        "Station DST Summary\n\
         ===================\n\
         Seeds: {} total, {} passed, {} failed\n\
         Total operations: {}\n",
        total, passed, failed, total_ops
    );

    if failed > 0 {
        summary.push_str("\nFailed seeds:\n");
        for result in results.iter().filter(|r| !r.is_success()) {
            summary.push_str(&format!("  Seed {}: {}\n", result.seed, result.summary()));
            for violation in &result.invariant_violations {
                summary.push_str(&format!("    - {}\n", violation));
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_station_dst_single_seed() {
        let mut harness = StationDSTHarness::with_seed(12345);
        harness.run(200);
        let result = harness.result();
        println!("{}", result.summary());
        assert!(result.is_success(), "{:?}", result.invariant_violations);
        assert!(result.adds > 0);
    }

    #[test]
    fn test_station_dst_crowded() {
        let mut harness = StationDSTHarness::new(StationDSTConfig::crowded(42));
        harness.run(500);
        let result = harness.result();
        println!("{}", result.summary());
        assert!(result.is_success(), "{:?}", result.invariant_violations);
        assert!(result.rejected_adds > 0);
    }

    #[test]
    fn test_station_dst_10_seeds() {
        let results = run_station_batch(0, 10, 300, StationDSTConfig::new);
        let summary = summarize_station_batch(&results);
        println!("{}", summary);

        let passed = results.iter().filter(|r| r.is_success()).count();
        assert_eq!(passed, 10, "All 10 seeds should pass");
    }
}
