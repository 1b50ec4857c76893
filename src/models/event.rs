//! Object-storage change-notification records, S3 bucket-notification shape.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One notification document as delivered to `POST /events`.
///
/// Carries the batch of records for a single invocation. Unknown fields are
/// ignored so the service tolerates whatever extra metadata the event source
/// attaches.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct NotificationBatch {
    /// Records delivered together in this invocation.
    #[serde(rename = "Records", default)]
    pub records: Vec<EventRecord>,
}

/// A single change notification describing one object-storage mutation.
///
/// Every level is optional at the type level: a record missing `s3` or either
/// leaf field must reach the validator and fail there with a precise
/// missing-field error, rather than being rejected wholesale by the JSON
/// extractor.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct EventRecord {
    /// Event kind, e.g. `ObjectCreated:Put`. Logging only.
    #[serde(rename = "eventName", default)]
    pub event_name: Option<String>,

    /// When the mutation happened, per the event source. Logging only.
    #[serde(rename = "eventTime", default)]
    pub event_time: Option<DateTime<Utc>>,

    /// Storage-side details of the mutation.
    #[serde(default)]
    pub s3: Option<S3Entity>,
}

/// The `s3` envelope of a record.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct S3Entity {
    #[serde(default)]
    pub bucket: Option<BucketRef>,

    #[serde(default)]
    pub object: Option<ObjectRef>,
}

/// Reference to the bucket the mutation happened in.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct BucketRef {
    #[serde(default)]
    pub name: Option<String>,
}

/// Reference to the mutated object.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ObjectRef {
    /// Object key as delivered by the event source (URL-encoded).
    #[serde(default)]
    pub key: Option<String>,
}

impl EventRecord {
    /// Bucket name at `s3.bucket.name`, if present and non-empty.
    pub fn bucket_name(&self) -> Option<&str> {
        self.s3
            .as_ref()?
            .bucket
            .as_ref()?
            .name
            .as_deref()
            .filter(|name| !name.is_empty())
    }

    /// Object key at `s3.object.key`, if present and non-empty.
    pub fn object_key(&self) -> Option<&str> {
        self.s3
            .as_ref()?
            .object
            .as_ref()?
            .key
            .as_deref()
            .filter(|key| !key.is_empty())
    }
}
