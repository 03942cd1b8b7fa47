//! Fiscal oversight assignment entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Oversight role holders for one contract (1:1).
///
/// Purely local data with plain audit timestamps; unlike annotations there is
/// no cross-machine merge here, the last local save always wins wholesale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FiscalAssignment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deputy_manager: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supervisor: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deputy_supervisor: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technical_officer: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub administrative_officer: Option<String>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,

    /// Set on first save, preserved afterwards
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// Set on every save
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl FiscalAssignment {
    /// True when no role holder and no note is set
    pub fn is_empty(&self) -> bool {
        self.manager.is_none()
            && self.deputy_manager.is_none()
            && self.supervisor.is_none()
            && self.deputy_supervisor.is_none()
            && self.technical_officer.is_none()
            && self.administrative_officer.is_none()
            && self.notes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_empty() {
        assert!(FiscalAssignment::default().is_empty());

        let fiscal = FiscalAssignment {
            supervisor: Some("Maria Souza".to_string()),
            ..Default::default()
        };
        assert!(!fiscal.is_empty());
    }
}
