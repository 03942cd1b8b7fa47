//! Annotation record entity - the locally-authored layer on top of a contract

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Statuses offered when annotating a contract.
///
/// The store keeps the status as a free string; this list only drives CLI
/// prompting and display, so snapshots authored elsewhere with other spellings
/// still merge cleanly.
pub const STATUS_PALETTE: &[&str] = &[
    "ACTIVE",
    "SIGNED",
    "PUBLISHED",
    "EXPIRING",
    "EXPIRED",
    "SUSPENDED",
    "CLOSED",
];

/// Locally-authored annotation for one contract (1:1).
///
/// `recorded_at` is the version marker for cross-machine merges: whichever of
/// two conflicting annotations carries the later timestamp wins, all fields
/// together. Local edits always stamp the current time, so the marker is
/// non-decreasing under any sequence of local saves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    /// Status string, normally one of [`STATUS_PALETTE`]
    #[serde(default)]
    pub status: String,

    /// User-edited description replacing the catalog's wording
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub edited_description: String,

    /// Free-text administrative process reference
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub admin_process: String,

    /// Free-text administrative note
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub admin_note: String,

    /// Opaque per-contract options blob, carried through merges untouched
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub options: Value,

    /// Version marker, `DD/MM/YYYY HH:MM:SS`
    pub recorded_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotation_json_round_trip() {
        let ann = AnnotationRecord {
            status: "SIGNED".to_string(),
            edited_description: "Cleaning services, HQ building".to_string(),
            admin_process: "23480.001234/2025-11".to_string(),
            admin_note: "renewal pending".to_string(),
            options: serde_json::json!({ "highlight": true }),
            recorded_at: "01/01/2025 11:00:00".to_string(),
        };

        let text = serde_json::to_string(&ann).unwrap();
        let back: AnnotationRecord = serde_json::from_str(&text).unwrap();
        assert_eq!(ann, back);
    }

    #[test]
    fn test_empty_fields_are_omitted() {
        let ann = AnnotationRecord {
            status: "ACTIVE".to_string(),
            recorded_at: "02/03/2025 08:00:00".to_string(),
            ..Default::default()
        };

        let text = serde_json::to_string(&ann).unwrap();
        assert!(!text.contains("edited_description"));
        assert!(!text.contains("options"));
    }
}
