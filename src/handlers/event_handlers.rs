//! Webhook handler for object-storage change notifications.
//!
//! `POST /events` receives one notification batch and fans the purge core out
//! over its records concurrently. Records are isolated from each other: every
//! record is attempted, each outcome is logged, and the response is 200 with
//! per-record counts whenever the fan-out itself completed — individual purge
//! failures do not fail the batch.

use crate::{
    errors::AppError, models::event::NotificationBatch, services::purge_service::PurgeService,
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use futures::future::join_all;
use serde::Serialize;
use uuid::Uuid;

/// Aggregate result of one batch invocation.
#[derive(Debug, Serialize)]
pub struct BatchSummary {
    /// Correlates the response with the per-record log lines.
    pub batch_id: Uuid,
    pub received: usize,
    pub purged: usize,
    pub failed: usize,
}

/// `POST /events`
///
/// A malformed notification document is rejected before any record is
/// attempted, with the same JSON error shape as the rest of the service; a
/// well-formed batch always completes with a summary.
pub async fn handle_events(
    State(service): State<PurgeService>,
    payload: Result<Json<NotificationBatch>, JsonRejection>,
) -> Result<Json<BatchSummary>, AppError> {
    let Json(batch) =
        payload.map_err(|rejection| AppError::new(rejection.status(), rejection.body_text()))?;

    let batch_id = Uuid::new_v4();
    let received = batch.records.len();

    tracing::info!(%batch_id, records = received, "processing notification batch");

    // All records run concurrently; completion order is irrelevant because
    // outcomes are zipped back to their records by position.
    let outcomes = join_all(batch.records.iter().map(|record| service.purge(record))).await;

    let mut purged = 0;
    let mut failed = 0;
    for (record, outcome) in batch.records.iter().zip(outcomes) {
        let bucket = record.bucket_name().unwrap_or("<missing>");
        let key = record.object_key().unwrap_or("<missing>");
        let event = record.event_name.as_deref().unwrap_or("-");

        match outcome {
            Ok(payload) => {
                purged += 1;
                tracing::info!(
                    %batch_id,
                    event,
                    bucket,
                    key,
                    response = %payload,
                    "successfully purged"
                );
            }
            Err(err) => {
                failed += 1;
                tracing::error!(%batch_id, event, bucket, key, error = %err, "purge failed");
            }
        }
    }

    tracing::info!(%batch_id, received, purged, failed, "batch complete");

    Ok(Json(BatchSummary {
        batch_id,
        received,
        purged,
        failed,
    }))
}
