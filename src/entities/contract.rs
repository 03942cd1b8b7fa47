//! Contract record entity

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Date format used by the catalog payloads
const PAYLOAD_DATE_FORMAT: &str = "%Y-%m-%d";

/// A contract record mirrored from the remote catalog.
///
/// The scalar fields are denormalized out of `raw_snapshot` for querying and
/// display; `raw_snapshot` keeps the fetched payload verbatim so a cached
/// record round-trips byte-identically. The whole record is overwritten on
/// every refresh, so nothing here is user-editable (user edits live in the
/// annotation-layer entities instead).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractRecord {
    /// Catalog-assigned identifier, globally unique and stable across fetches
    pub id: String,

    /// Administrative unit that owns this contract
    pub group_code: String,

    /// Contract number, `00071/2025` style
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,

    /// Administrative process identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_tax_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Contract value in the catalog's currency
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_to: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modality: Option<String>,

    /// The full fetched payload, preserved verbatim
    pub raw_snapshot: Value,
}

impl ContractRecord {
    /// Build a record from a raw catalog payload.
    ///
    /// Every scalar is read from an explicitly named payload key; keys the
    /// payload doesn't carry stay `None`. The payload itself is kept whole in
    /// `raw_snapshot`.
    pub fn from_payload(id: &str, group_code: &str, payload: &Value) -> Self {
        Self {
            id: id.to_string(),
            group_code: group_code.to_string(),
            number: str_field(payload, "number"),
            process_id: str_field(payload, "process_id"),
            supplier_name: payload["supplier"]["name"].as_str().map(String::from),
            supplier_tax_id: payload["supplier"]["tax_id"].as_str().map(String::from),
            description: str_field(payload, "description"),
            value: payload["value"].as_f64(),
            valid_from: date_field(payload, "valid_from"),
            valid_to: date_field(payload, "valid_to"),
            contract_type: str_field(payload, "type"),
            modality: str_field(payload, "modality"),
            raw_snapshot: payload.clone(),
        }
    }
}

fn str_field(payload: &Value, key: &str) -> Option<String> {
    payload[key].as_str().map(String::from)
}

fn date_field(payload: &Value, key: &str) -> Option<NaiveDate> {
    payload[key]
        .as_str()
        .and_then(|s| NaiveDate::parse_from_str(s, PAYLOAD_DATE_FORMAT).ok())
}
