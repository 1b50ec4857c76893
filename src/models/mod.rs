//! Core data models for the CDN purge service.
//!
//! Notification records mirror the S3 bucket-notification shape delivered by
//! the event source; zone types describe the operator-supplied mapping from
//! buckets to CDN zones and the ephemeral purge request derived from both.

pub mod event;
pub mod zone;
