//! Tag model matching the frontend Tag interface.

use serde::{Deserialize, Serialize};

/// A logical record of data written to a physical NFC medium.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: String,
    /// Identifier of the physical medium, e.g. "04:A3:2F:12:B8:7C:80"
    pub tag_uid: String,
    pub user_id: String,
    pub written_data: TagPayload,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_scanned: Option<String>,
}

/// The asset record carried by a tag.
///
/// Fixed optional fields rather than an open JSON bag; a tag is identified by
/// at least one of asset/shipment/container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipment_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl TagPayload {
    /// True if at least one of the identifying fields carries content.
    pub fn has_identifier(&self) -> bool {
        [&self.asset_id, &self.shipment_id, &self.container_id]
            .iter()
            .any(|f| f.as_deref().is_some_and(|v| !v.trim().is_empty()))
    }
}

/// Request body for writing a new tag.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteTagRequest {
    /// UID of the physical medium; a simulated UID is generated when absent.
    #[serde(default)]
    pub tag_uid: Option<String>,
    #[serde(default)]
    pub asset_id: Option<String>,
    #[serde(default)]
    pub shipment_id: Option<String>,
    #[serde(default)]
    pub container_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl WriteTagRequest {
    /// The payload to persist; empty and whitespace-only fields are dropped.
    pub fn payload(&self) -> TagPayload {
        fn clean(field: &Option<String>) -> Option<String> {
            field
                .as_deref()
                .filter(|v| !v.trim().is_empty())
                .map(|v| v.to_string())
        }

        TagPayload {
            asset_id: clean(&self.asset_id),
            shipment_id: clean(&self.shipment_id),
            container_id: clean(&self.container_id),
            description: clean(&self.description),
            location: clean(&self.location),
        }
    }
}

/// Display record returned by the scan flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub tag_uid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Timestamp of this scan.
    pub scanned_at: String,
}

impl ScanResult {
    pub fn from_tag(tag: &Tag, scanned_at: String) -> Self {
        Self {
            tag_uid: tag.tag_uid.clone(),
            asset_id: tag.written_data.asset_id.clone(),
            shipment_id: tag.written_data.shipment_id.clone(),
            container_id: tag.written_data.container_id.clone(),
            description: tag.written_data.description.clone(),
            location: tag.written_data.location.clone(),
            scanned_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_identifier_all_empty() {
        let payload = TagPayload::default();
        assert!(!payload.has_identifier());
    }

    #[test]
    fn test_has_identifier_whitespace_only() {
        let payload = TagPayload {
            asset_id: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(!payload.has_identifier());
    }

    #[test]
    fn test_has_identifier_single_field() {
        let payload = TagPayload {
            container_id: Some("CONT-789012".to_string()),
            ..Default::default()
        };
        assert!(payload.has_identifier());
    }

    #[test]
    fn test_payload_drops_empty_fields() {
        let request = WriteTagRequest {
            tag_uid: None,
            asset_id: Some("AST-001234".to_string()),
            shipment_id: Some("".to_string()),
            container_id: None,
            description: Some("  ".to_string()),
            location: Some("Warehouse A, Bay 5".to_string()),
        };

        let payload = request.payload();
        assert_eq!(payload.asset_id.as_deref(), Some("AST-001234"));
        assert!(payload.shipment_id.is_none());
        assert!(payload.container_id.is_none());
        assert!(payload.description.is_none());
        assert_eq!(payload.location.as_deref(), Some("Warehouse A, Bay 5"));
    }
}
