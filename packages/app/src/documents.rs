//! Analyzed-document records, in the backend's wire shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Processing status of an analyzed document.
///
/// Serialized exactly as the backend emits it: `"PENDING"`, `"COMPLETED"`,
/// `"FAILED"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStatus {
    Pending,
    Completed,
    Failed,
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentStatus::Pending => write!(f, "pending"),
            DocumentStatus::Completed => write!(f, "completed"),
            DocumentStatus::Failed => write!(f, "failed"),
        }
    }
}

/// One analyzed document, linked to the user who submitted it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: String,
    pub name: String,
    /// Present once analysis completed.
    #[serde(default)]
    pub summary: Option<String>,
    pub status: DocumentStatus,
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
}

impl DocumentRecord {
    /// A record for a successfully analyzed document.
    pub fn completed(
        id: impl Into<String>,
        name: impl Into<String>,
        summary: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            summary: Some(summary.into()),
            status: DocumentStatus::Completed,
            timestamp: Utc::now(),
            user_id: user_id.into(),
        }
    }

    /// A record for a document whose analysis failed.
    pub fn failed(
        id: impl Into<String>,
        name: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            summary: None,
            status: DocumentStatus::Failed,
            timestamp: Utc::now(),
            user_id: user_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_in_backend_casing() {
        assert_eq!(
            serde_json::to_string(&DocumentStatus::Pending).unwrap(),
            "\"PENDING\""
        );
        assert_eq!(
            serde_json::to_string(&DocumentStatus::Completed).unwrap(),
            "\"COMPLETED\""
        );
        assert_eq!(
            serde_json::to_string(&DocumentStatus::Failed).unwrap(),
            "\"FAILED\""
        );
    }

    #[test]
    fn test_record_round_trips_with_backend_field_names() {
        let record = DocumentRecord::completed("doc-1", "report.pdf", "A summary.", "a@b.com");
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["id"], "doc-1");
        assert_eq!(json["status"], "COMPLETED");
        assert_eq!(json["user_id"], "a@b.com");

        let back: DocumentRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back.summary.as_deref(), Some("A summary."));
    }

    #[test]
    fn test_failed_record_has_no_summary() {
        let record = DocumentRecord::failed("doc-2", "broken.bin", "a@b.com");
        assert_eq!(record.summary, None);
        assert_eq!(record.status, DocumentStatus::Failed);
    }
}
