//! Document links entity

use serde::{Deserialize, Serialize};

/// Named external document URLs for one contract (1:1).
///
/// Upserted independently of the annotation record but always scoped to the
/// same contract id. Unset slots are `None`, never empty strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinksRecord {
    /// Primary contract document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_url: Option<String>,

    /// Latest amendment document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amendment_url: Option<String>,

    /// Designation ordinance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordinance_url: Option<String>,

    /// Contract-specific page on the transparency portal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portal_ref_url: Option<String>,

    /// Institutional portal reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institutional_url: Option<String>,
}

impl LinksRecord {
    /// True when no slot is set
    pub fn is_empty(&self) -> bool {
        self.contract_url.is_none()
            && self.amendment_url.is_none()
            && self.ordinance_url.is_none()
            && self.portal_ref_url.is_none()
            && self.institutional_url.is_none()
    }

    /// Merge another record into this one, taking the other's set slots
    pub fn merge(&mut self, other: &LinksRecord) {
        if other.contract_url.is_some() {
            self.contract_url = other.contract_url.clone();
        }
        if other.amendment_url.is_some() {
            self.amendment_url = other.amendment_url.clone();
        }
        if other.ordinance_url.is_some() {
            self.ordinance_url = other.ordinance_url.clone();
        }
        if other.portal_ref_url.is_some() {
            self.portal_ref_url = other.portal_ref_url.clone();
        }
        if other.institutional_url.is_some() {
            self.institutional_url = other.institutional_url.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_empty() {
        assert!(LinksRecord::default().is_empty());

        let links = LinksRecord {
            contract_url: Some("https://example.org/ct.pdf".to_string()),
            ..Default::default()
        };
        assert!(!links.is_empty());
    }

    #[test]
    fn test_merge_keeps_existing_slots() {
        let mut base = LinksRecord {
            contract_url: Some("https://example.org/old.pdf".to_string()),
            ordinance_url: Some("https://example.org/ord.pdf".to_string()),
            ..Default::default()
        };
        let incoming = LinksRecord {
            contract_url: Some("https://example.org/new.pdf".to_string()),
            amendment_url: Some("https://example.org/amd.pdf".to_string()),
            ..Default::default()
        };

        base.merge(&incoming);
        assert_eq!(base.contract_url.as_deref(), Some("https://example.org/new.pdf"));
        assert_eq!(base.amendment_url.as_deref(), Some("https://example.org/amd.pdf"));
        assert_eq!(base.ordinance_url.as_deref(), Some("https://example.org/ord.pdf"));
    }
}
