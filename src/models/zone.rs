//! Zone mapping and the derived purge request.

use serde::Deserialize;
use std::fmt;

/// Provider-side zone identifier.
///
/// Opaque to this service: some providers hand out numeric ids, others
/// strings. Deserialized untagged so the operator can write either in the
/// settings file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ZoneId {
    Int(i64),
    Str(String),
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoneId::Int(id) => write!(f, "{}", id),
            ZoneId::Str(id) => write!(f, "{}", id),
        }
    }
}

/// One operator-supplied bucket-to-zone mapping.
///
/// The zone map is an ordered list of these; lookup is first-match by exact
/// bucket-name equality. Duplicate buckets are allowed and the first entry
/// wins.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ZoneMapEntry {
    /// Storage bucket name this entry applies to.
    pub bucket: String,

    /// Zone to purge when an object in `bucket` changes.
    pub zone_id: ZoneId,
}

/// Everything needed for one purge call, derived from a validated record.
///
/// Lives only for the duration of that call; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct PurgeRequest {
    /// Zone from the matched map entry.
    pub zone_id: ZoneId,

    /// Purge timeout in seconds, from configuration.
    pub timeout_secs: f64,

    /// Paths to invalidate. Exactly one element in the current scope
    /// (`/` + unescaped object key); a list so multi-path batching stays
    /// possible without changing the contract.
    pub paths: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_id_accepts_int_or_string() {
        let entries: Vec<ZoneMapEntry> = serde_json::from_value(serde_json::json!([
            { "bucket": "a", "zone_id": 123 },
            { "bucket": "b", "zone_id": "zone-b" }
        ]))
        .unwrap();

        assert_eq!(entries[0].zone_id, ZoneId::Int(123));
        assert_eq!(entries[1].zone_id, ZoneId::Str("zone-b".into()));
        assert_eq!(entries[0].zone_id.to_string(), "123");
        assert_eq!(entries[1].zone_id.to_string(), "zone-b");
    }
}
