//! In-memory station aggregate: record list, ID assignment and queries.
//!
//! Everything here is side-effect free with respect to persistence and
//! playback. `StationManager` wraps these primitives and adds save and
//! republish.

use super::record::{QuotaConfig, StatusFilter, StreamRecord, StreamStatus};
use serde::{Deserialize, Serialize};

/// The persisted aggregate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationData {
    #[serde(default)]
    pub streams: Vec<StreamRecord>,
    #[serde(default)]
    pub quota: QuotaConfig,
}

impl StationData {
    /// Empty aggregate with the given quota
    pub fn with_quota(max_streams_per_player: u32) -> Self {
        StationData {
            streams: Vec::new(),
            quota: QuotaConfig {
                max_streams_per_player,
            },
        }
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// Smallest non-negative ID not used by any record.
    pub fn next_id(&self) -> u32 {
        let mut ids: Vec<u32> = self.streams.iter().map(|s| s.id).collect();
        ids.sort_unstable();
        ids.dedup();

        let mut candidate = 0u32;
        for id in ids {
            if id != candidate {
                break;
            }
            candidate += 1;
        }
        candidate
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn by_status(&self, status: StatusFilter) -> Vec<&StreamRecord> {
        self.filtered(status, |_| true)
    }

    pub fn by_owner(&self, status: StatusFilter, owner_id: &str) -> Vec<&StreamRecord> {
        self.filtered(status, |s| s.is_owned_by(owner_id))
    }

    /// Case-insensitive substring match on the stream name
    pub fn by_name(&self, status: StatusFilter, needle: &str) -> Vec<&StreamRecord> {
        let needle = needle.to_lowercase();
        self.filtered(status, |s| s.name.to_lowercase().contains(&needle))
    }

    pub fn by_name_and_owner(
        &self,
        status: StatusFilter,
        needle: &str,
        owner_id: &str,
    ) -> Vec<&StreamRecord> {
        let needle = needle.to_lowercase();
        self.filtered(status, |s| {
            s.is_owned_by(owner_id) && s.name.to_lowercase().contains(&needle)
        })
    }

    /// Case-insensitive substring match on the owner's display name
    pub fn by_owner_name(&self, status: StatusFilter, needle: &str) -> Vec<&StreamRecord> {
        let needle = needle.to_lowercase();
        self.filtered(status, |s| {
            s.owner.display_name.to_lowercase().contains(&needle)
        })
    }

    pub fn by_id(&self, id: u32) -> Option<&StreamRecord> {
        self.streams.iter().find(|s| s.id == id)
    }

    /// Pending + verified records owned by a player
    pub fn owned_count(&self, owner_id: &str) -> usize {
        self.streams.iter().filter(|s| s.is_owned_by(owner_id)).count()
    }

    fn filtered<F>(&self, status: StatusFilter, predicate: F) -> Vec<&StreamRecord>
    where
        F: Fn(&StreamRecord) -> bool,
    {
        self.streams
            .iter()
            .filter(|s| status.matches(s.status) && predicate(s))
            .collect()
    }

    // ------------------------------------------------------------------
    // Raw mutations
    // ------------------------------------------------------------------

    pub(crate) fn push(&mut self, record: StreamRecord) {
        debug_assert!(
            self.by_id(record.id).is_none(),
            "Precondition violated: duplicate stream id {}",
            record.id
        );
        self.streams.push(record);
    }

    pub(crate) fn remove(&mut self, id: u32) -> Option<StreamRecord> {
        let index = self.streams.iter().position(|s| s.id == id)?;
        Some(self.streams.remove(index))
    }

    pub(crate) fn set_status(&mut self, id: u32, status: StreamStatus) -> Option<&StreamRecord> {
        let record = self.streams.iter_mut().find(|s| s.id == id)?;
        record.status = status;
        Some(record)
    }

    /// Remove every record matching the filter, returning how many went
    pub(crate) fn clear(&mut self, status: StatusFilter) -> usize {
        let before = self.streams.len();
        self.streams.retain(|s| !status.matches(s.status));
        before - self.streams.len()
    }

    /// `name,url` pairs of every verified record, in store order, joined by `,`
    pub fn url_list(&self) -> String {
        self.streams
            .iter()
            .filter(|s| s.is_verified())
            .map(|s| format!("{},{}", s.name, s.url))
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn verified_count(&self) -> usize {
        self.streams.iter().filter(|s| s.is_verified()).count()
    }

    /// True when no two records share an ID
    pub fn ids_unique(&self) -> bool {
        let mut ids: Vec<u32> = self.streams.iter().map(|s| s.id).collect();
        ids.sort_unstable();
        ids.windows(2).all(|w| w[0] != w[1])
    }
}

#[cfg(test)]
mod tests {
    use super::super::record::OwnerInfo;
    use super::*;

    fn record(id: u32, name: &str, owner: (&str, &str), status: StreamStatus) -> StreamRecord {
        StreamRecord {
            id,
            name: name.to_string(),
            url: format!("http://{}.example/", name.to_lowercase()),
            status,
            owner: OwnerInfo::new(owner.0, owner.1),
        }
    }

    fn data_with_ids(ids: &[u32]) -> StationData {
        let mut data = StationData::default();
        for &id in ids {
            data.push(record(id, "s", ("p", "1"), StreamStatus::Pending));
        }
        data
    }

    fn sample() -> StationData {
        let mut data = StationData::default();
        data.push(record(0, "Jazz FM", ("Alice", "100"), StreamStatus::Verified));
        data.push(record(1, "Rock Radio", ("Bob", "200"), StreamStatus::Pending));
        data.push(record(2, "Smooth Jazz", ("Bob", "200"), StreamStatus::Verified));
        data.push(record(3, "Talk", ("alicia", "300"), StreamStatus::Pending));
        data
    }

    fn ids(records: Vec<&StreamRecord>) -> Vec<u32> {
        records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_next_id_empty() {
        assert_eq!(StationData::default().next_id(), 0);
    }

    #[test]
    fn test_next_id_fills_gap() {
        assert_eq!(data_with_ids(&[0, 1, 3]).next_id(), 2);
        assert_eq!(data_with_ids(&[3, 0, 1]).next_id(), 2);
    }

    #[test]
    fn test_next_id_contiguous() {
        assert_eq!(data_with_ids(&[0, 1, 2]).next_id(), 3);
    }

    #[test]
    fn test_next_id_zero_free() {
        assert_eq!(data_with_ids(&[1, 2]).next_id(), 0);
        assert_eq!(data_with_ids(&[2]).next_id(), 0);
    }

    #[test]
    fn test_by_status() {
        let data = sample();
        assert_eq!(ids(data.by_status(StatusFilter::Verified)), vec![0, 2]);
        assert_eq!(ids(data.by_status(StatusFilter::Pending)), vec![1, 3]);
        assert_eq!(ids(data.by_status(StatusFilter::Any)), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_by_name_case_insensitive() {
        let data = sample();
        assert_eq!(ids(data.by_name(StatusFilter::Verified, "JAZZ")), vec![0, 2]);
        assert_eq!(ids(data.by_name(StatusFilter::Pending, "jazz")), Vec::<u32>::new());
        assert_eq!(ids(data.by_name(StatusFilter::Any, "O")), vec![1, 2]);
        assert_eq!(ids(data.by_name(StatusFilter::Any, "a")), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_by_owner_and_name() {
        let data = sample();
        assert_eq!(ids(data.by_owner(StatusFilter::Any, "200")), vec![1, 2]);
        assert_eq!(
            ids(data.by_name_and_owner(StatusFilter::Verified, "jazz", "200")),
            vec![2]
        );
    }

    #[test]
    fn test_by_owner_name() {
        let data = sample();
        assert_eq!(ids(data.by_owner_name(StatusFilter::Any, "ALI")), vec![0, 3]);
        assert_eq!(ids(data.by_owner_name(StatusFilter::Pending, "ali")), vec![3]);
    }

    #[test]
    fn test_by_id() {
        let data = sample();
        assert_eq!(data.by_id(2).map(|r| r.name.as_str()), Some("Smooth Jazz"));
        assert!(data.by_id(42).is_none());
    }

    #[test]
    fn test_clear_pending_keeps_verified() {
        let mut data = sample();
        assert_eq!(data.clear(StatusFilter::Pending), 2);
        assert_eq!(ids(data.by_status(StatusFilter::Any)), vec![0, 2]);
    }

    #[test]
    fn test_clear_any_empties() {
        let mut data = sample();
        assert_eq!(data.clear(StatusFilter::Any), 4);
        assert!(data.is_empty());
    }

    #[test]
    fn test_url_list() {
        let mut data = StationData::default();
        data.push(StreamRecord {
            id: 0,
            name: "A".to_string(),
            url: "http://x".to_string(),
            status: StreamStatus::Verified,
            owner: OwnerInfo::new("p", "1"),
        });
        data.push(StreamRecord {
            id: 1,
            name: "Hidden".to_string(),
            url: "http://z".to_string(),
            status: StreamStatus::Pending,
            owner: OwnerInfo::new("p", "1"),
        });
        data.push(StreamRecord {
            id: 2,
            name: "B".to_string(),
            url: "http://y".to_string(),
            status: StreamStatus::Verified,
            owner: OwnerInfo::new("p", "1"),
        });
        assert_eq!(data.url_list(), "A,http://x,B,http://y");
    }

    #[test]
    fn test_url_list_empty() {
        assert_eq!(sample_pending_only().url_list(), "");
        assert_eq!(StationData::default().url_list(), "");
    }

    fn sample_pending_only() -> StationData {
        let mut data = sample();
        data.clear(StatusFilter::Verified);
        data
    }

    #[test]
    fn test_verified_count_ignores_commas_in_names() {
        let mut data = sample();
        data.push(record(4, "Rock, Blues", ("Bob", "200"), StreamStatus::Verified));
        assert_eq!(data.verified_count(), 3);
        assert!(data.url_list().ends_with("Rock, Blues,http://rock, blues.example/"));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let data: StationData = serde_json::from_str("{}").unwrap();
        assert!(data.is_empty());
        assert_eq!(data.quota.max_streams_per_player, 3);
    }
}
