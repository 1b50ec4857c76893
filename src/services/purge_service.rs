//! src/services/purge_service.rs
//!
//! PurgeService — the validation-and-purge orchestration core. Validates one
//! change-notification record against the required shape and the loaded
//! settings, maps its bucket to a CDN zone, and issues exactly one outbound
//! invalidation bounded by the configured timeout. Stateless between calls;
//! the only shared resources are the read-only settings and the CDN client.

use crate::{
    config::Settings,
    models::{event::EventRecord, zone::{PurgeRequest, ZoneMapEntry}},
    services::cdn_client::{CdnClient, CdnError},
};
use std::{sync::Arc, time::Duration};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum PurgeError {
    #[error("invalid record structure, missing '{0}'")]
    MissingField(&'static str),
    #[error("invalid configuration for '{0}'")]
    InvalidConfig(&'static str),
    #[error("bucket `{0}` not mapped to zone")]
    ZoneNotMapped(String),
    #[error(transparent)]
    Provider(#[from] CdnError),
    #[error("purge timed out after {0} seconds")]
    Timeout(f64),
}

pub type PurgeResult<T> = Result<T, PurgeError>;

/// PurgeService turns one notification record into one CDN invalidation:
/// - Validate the record shape and the settings document (ordered checks)
/// - Resolve the record's bucket to a zone via the operator-supplied map
/// - Race the CDN call against the configured timeout
/// - Reconcile into a single outcome per record
///
/// Cloneable; all clones share the same settings and client handles, both of
/// which are read-only across concurrent purges.
#[derive(Clone)]
pub struct PurgeService {
    settings: Arc<dyn Settings>,
    client: Arc<dyn CdnClient>,
}

impl PurgeService {
    /// Create a new PurgeService over the loaded settings and a CDN client.
    pub fn new(settings: Arc<dyn Settings>, client: Arc<dyn CdnClient>) -> Self {
        Self { settings, client }
    }

    /// Read-only view of the settings this service was built with.
    /// Used by the readiness probe.
    pub fn settings(&self) -> &dyn Settings {
        self.settings.as_ref()
    }

    /// Validate `record` against the required shape and the settings.
    ///
    /// Check order is part of the contract (error messages must be
    /// deterministic):
    /// 1. `s3.bucket.name` present and non-empty
    /// 2. `s3.object.key` present and non-empty
    /// 3. `zone_map` key exists in settings
    /// 4. `purge_timeout` key exists in settings (never checked before 3)
    /// 5. first zone-map entry matching the bucket, or ZoneNotMapped
    /// 6. timeout value is a positive number
    ///
    /// Pure apart from the settings lookups; performs no network I/O.
    pub fn validate(&self, record: &EventRecord) -> PurgeResult<PurgeRequest> {
        let bucket = record
            .bucket_name()
            .ok_or(PurgeError::MissingField("s3.bucket.name"))?;
        let key = record
            .object_key()
            .ok_or(PurgeError::MissingField("s3.object.key"))?;

        if !self.settings.has("zone_map") {
            return Err(PurgeError::InvalidConfig("zone_map"));
        }
        if !self.settings.has("purge_timeout") {
            return Err(PurgeError::InvalidConfig("purge_timeout"));
        }

        let entries: Vec<ZoneMapEntry> = self
            .settings
            .get("zone_map")
            .and_then(|value| serde_json::from_value(value).ok())
            .ok_or(PurgeError::InvalidConfig("zone_map"))?;

        // First match wins; duplicate buckets are allowed and not warned about.
        let matched = entries
            .into_iter()
            .find(|entry| entry.bucket == bucket)
            .ok_or_else(|| PurgeError::ZoneNotMapped(bucket.to_string()))?;

        let timeout_secs = self
            .settings
            .get("purge_timeout")
            .and_then(|value| value.as_f64())
            .filter(|secs| secs.is_finite() && *secs > 0.0)
            .ok_or(PurgeError::InvalidConfig("purge_timeout"))?;

        Ok(PurgeRequest {
            zone_id: matched.zone_id,
            timeout_secs,
            paths: vec![format!("/{}", unescape_key(key))],
        })
    }

    /// Purge the CDN path affected by `record`.
    ///
    /// Validation failures propagate unchanged with no timeout applied and no
    /// outbound call. For a valid record the CDN call is raced against a
    /// `timeout_secs` timer; whichever settles first decides the single
    /// outcome. The timer is dropped the moment the call settles, and a call
    /// that loses the race is dropped with it — it can never resolve the
    /// outcome a second time.
    pub async fn purge(&self, record: &EventRecord) -> PurgeResult<serde_json::Value> {
        let request = self.validate(record)?;

        debug!(
            zone_id = %request.zone_id,
            paths = ?request.paths,
            timeout_secs = request.timeout_secs,
            "record validated, issuing purge"
        );

        tokio::select! {
            outcome = self.client.invalidate(&request.zone_id, &request.paths) => {
                outcome.map_err(PurgeError::from)
            }
            _ = tokio::time::sleep(Duration::from_secs_f64(request.timeout_secs)) => {
                Err(PurgeError::Timeout(request.timeout_secs))
            }
        }
    }
}

/// Object keys arrive URL-encoded from the event source (`+` for space,
/// percent escapes). Purge paths address the live URL, so undo the encoding.
/// Keys with stray `%` sequences that do not decode are passed through as-is.
fn unescape_key(key: &str) -> String {
    let plus_decoded = key.replace('+', " ");
    match urlencoding::decode(&plus_decoded) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => plus_decoded,
    }
}
