//! CDN client adapter.
//!
//! The purge core only needs one operation: "invalidate these paths in this
//! zone." That operation sits behind the [`CdnClient`] trait so the
//! orchestrator can be exercised with scripted doubles; [`HttpCdnClient`] is
//! the production implementation speaking the provider's REST API.

use crate::{config::ProviderConfig, models::zone::ZoneId};
use async_trait::async_trait;
use thiserror::Error;

/// Failure reported by the CDN provider or the transport underneath it.
///
/// Opaque to the purge core: whatever the provider said is carried through
/// unchanged to the per-record outcome.
#[derive(Debug, Error)]
pub enum CdnError {
    /// Request never produced an HTTP response (connect, TLS, body errors).
    #[error("CDN request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Provider answered with a non-success status.
    #[error("CDN API error ({status}): {body}")]
    Api { status: u16, body: String },
}

/// Asynchronous "delete/invalidate cache entries for a zone" operation.
///
/// No built-in timeout; the orchestrator enforces one externally.
#[async_trait]
pub trait CdnClient: Send + Sync {
    async fn invalidate(
        &self,
        zone_id: &ZoneId,
        paths: &[String],
    ) -> Result<serde_json::Value, CdnError>;
}

/// CDN client speaking the provider's zone-cache REST endpoint.
pub struct HttpCdnClient {
    http: reqwest::Client,
    provider: ProviderConfig,
}

impl HttpCdnClient {
    pub fn new(provider: ProviderConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            provider,
        }
    }

    /// Zone-cache URL for `zone_id`:
    /// `{api_url}/{company_alias}/zones/pull.json/{zone_id}/cache`.
    fn cache_url(&self, zone_id: &ZoneId) -> String {
        format!(
            "{}/{}/zones/pull.json/{}/cache",
            self.provider.api_url.trim_end_matches('/'),
            self.provider.company_alias,
            zone_id
        )
    }
}

#[async_trait]
impl CdnClient for HttpCdnClient {
    async fn invalidate(
        &self,
        zone_id: &ZoneId,
        paths: &[String],
    ) -> Result<serde_json::Value, CdnError> {
        let url = self.cache_url(zone_id);
        tracing::debug!(%url, ?paths, "issuing CDN invalidation");

        let response = self
            .http
            .delete(&url)
            .header("X-Api-Key", &self.provider.key)
            .header("X-Api-Secret", &self.provider.secret)
            .json(&serde_json::json!({ "files": paths }))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            // Some providers answer 200 with a body, some 204 without one.
            let body = response.text().await?;
            let payload = if body.is_empty() {
                serde_json::Value::Null
            } else {
                serde_json::from_str(&body)
                    .unwrap_or(serde_json::Value::String(body))
            };
            Ok(payload)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(CdnError::Api {
                status: status.as_u16(),
                body,
            })
        }
    }
}
