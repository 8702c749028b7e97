//! Chat text for command replies

use crate::stations::{StatusFilter, StreamRecord, StreamStatus};

pub const NO_STREAMS_FOUND: &str = "No streams found";

/// One message per record, or a single "none" message
pub fn listing<'a>(records: impl IntoIterator<Item = &'a StreamRecord>) -> Vec<String> {
    let lines: Vec<String> = records.into_iter().map(record_line).collect();
    if lines.is_empty() {
        vec![NO_STREAMS_FOUND.to_string()]
    } else {
        lines
    }
}

pub fn record_line(record: &StreamRecord) -> String {
    let color = match record.status {
        StreamStatus::Verified => "green",
        StreamStatus::Pending => "red",
    };
    format!(
        "[#{}] Name: {}, \nURL: {}, \nStatus: <color={}>{}</color>, \nQueued By: {}",
        record.id,
        record.name,
        record.url,
        color,
        record.status.label(),
        record.owner.display_name
    )
}

pub fn stream_added(record: &StreamRecord) -> String {
    let awaiting = if record.is_verified() {
        ""
    } else {
        " (awaiting verification from admin)"
    };
    format!("Stream added{} [{}, {}]", awaiting, record.name, record.url)
}

pub fn stream_approved(record: &StreamRecord) -> String {
    format!(
        "Stream ID {} approved successfully! [Name: {}, URL: {}, Queued By: {}]",
        record.id, record.name, record.url, record.owner.display_name
    )
}

pub fn stream_removed(id: u32) -> String {
    format!("Successfully removed stream with ID {}", id)
}

pub fn streams_cleared(status: StatusFilter) -> String {
    let which = match status {
        StatusFilter::Pending => "pending ",
        StatusFilter::Verified => "verified ",
        StatusFilter::Any => "",
    };
    format!("All {}streams removed successfully", which)
}

pub fn limit_set(limit: u32) -> String {
    format!("Max streams per player set to {}", limit)
}

pub fn limit_get(limit: u32) -> String {
    format!("Max streams per player: {}", limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stations::OwnerInfo;

    fn record(status: StreamStatus) -> StreamRecord {
        StreamRecord {
            id: 2,
            name: "Jazz".to_string(),
            url: "http://x.example/".to_string(),
            status,
            owner: OwnerInfo::new("Bob", "76"),
        }
    }

    #[test]
    fn test_record_line() {
        assert_eq!(
            record_line(&record(StreamStatus::Verified)),
            "[#2] Name: Jazz, \nURL: http://x.example/, \nStatus: <color=green>VERIFIED</color>, \nQueued By: Bob"
        );
        assert!(record_line(&record(StreamStatus::Pending))
            .contains("<color=red>PENDING</color>"));
    }

    #[test]
    fn test_empty_listing() {
        assert_eq!(listing(Vec::new()), vec![NO_STREAMS_FOUND.to_string()]);
    }

    #[test]
    fn test_added_message() {
        assert_eq!(
            stream_added(&record(StreamStatus::Pending)),
            "Stream added (awaiting verification from admin) [Jazz, http://x.example/]"
        );
        assert_eq!(
            stream_added(&record(StreamStatus::Verified)),
            "Stream added [Jazz, http://x.example/]"
        );
    }

    #[test]
    fn test_cleared_message() {
        assert_eq!(streams_cleared(StatusFilter::Any), "All streams removed successfully");
        assert_eq!(
            streams_cleared(StatusFilter::Pending),
            "All pending streams removed successfully"
        );
    }
}
