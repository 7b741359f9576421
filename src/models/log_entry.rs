//! Audit log model matching the frontend HistoryItem interface.

use serde::{Deserialize, Serialize};

use super::TagPayload;

/// The kind of action recorded by a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Read,
    Write,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Read => "read",
            ActionType::Write => "write",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "read" => Some(ActionType::Read),
            "write" => Some(ActionType::Write),
            _ => None,
        }
    }
}

/// Immutable audit record of one read or write action.
///
/// `data` is a point-in-time copy of the tag payload; later tag mutations do
/// not change it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: String,
    pub tag_uid: String,
    pub action_type: ActionType,
    pub data: TagPayload,
    pub user_id: String,
    pub created_at: String,
}

impl LogEntry {
    /// Case-insensitive substring match against the searchable fields.
    ///
    /// An empty query matches every entry.
    pub fn matches(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let needle = query.to_lowercase();

        let fields = [
            Some(self.tag_uid.as_str()),
            self.data.asset_id.as_deref(),
            self.data.shipment_id.as_deref(),
            self.data.container_id.as_deref(),
        ];
        fields
            .iter()
            .flatten()
            .any(|f| f.to_lowercase().contains(&needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> LogEntry {
        LogEntry {
            id: "1".to_string(),
            tag_uid: "04:A3:2F:12:B8:7C:80".to_string(),
            action_type: ActionType::Read,
            data: TagPayload {
                asset_id: Some("AST-001234".to_string()),
                shipment_id: Some("SHP-567890".to_string()),
                container_id: None,
                description: Some("Compressor Unit".to_string()),
                location: None,
            },
            user_id: "user-1".to_string(),
            created_at: "2024-01-15T14:30:25Z".to_string(),
        }
    }

    #[test]
    fn test_empty_query_matches_all() {
        assert!(entry().matches(""));
    }

    #[test]
    fn test_match_is_case_insensitive() {
        assert!(entry().matches("ast-001"));
        assert!(entry().matches("AST-001"));
        assert!(entry().matches("shp-56"));
    }

    #[test]
    fn test_match_covers_tag_uid() {
        assert!(entry().matches("04:a3"));
    }

    #[test]
    fn test_description_is_not_searched() {
        assert!(!entry().matches("compressor"));
    }

    #[test]
    fn test_no_match() {
        assert!(!entry().matches("zzz"));
    }

    #[test]
    fn test_action_type_round_trip() {
        assert_eq!(ActionType::from_str("read"), Some(ActionType::Read));
        assert_eq!(ActionType::from_str("write"), Some(ActionType::Write));
        assert_eq!(ActionType::from_str("delete"), None);
        assert_eq!(ActionType::Read.as_str(), "read");
    }
}
