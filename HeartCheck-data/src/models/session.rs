use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Storage model for the latest analysis attached to a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Opaque session identifier issued to the client
    pub session_id: String,

    /// Display name submitted with the analysis
    pub name: String,

    /// Serialized analysis result
    pub result_json: String,

    /// When the analysis was stored, see [`storage_timestamp`]
    pub created_at: String,
}

/// Format a timestamp the way `created_at` is stored.
///
/// Fixed precision and a `Z` suffix keep the text ordering identical to
/// the time ordering, which pruning relies on in SQL and in memory.
pub fn storage_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_storage_timestamp_orders_as_text() {
        let earlier = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();
        let later = earlier + chrono::Duration::milliseconds(500);

        assert_eq!(storage_timestamp(earlier), "2024-05-01T08:30:00.000000Z");
        assert!(storage_timestamp(earlier) < storage_timestamp(later));
    }
}
