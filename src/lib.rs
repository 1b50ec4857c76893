//! CDN purge webhook library.
//!
//! Reacts to object-storage change notifications and issues one CDN
//! cache-invalidation per affected object, bounded by a configured timeout.

pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use config::{AppConfig, FileSettings, ProviderConfig, Settings};
pub use services::cdn_client::{CdnClient, HttpCdnClient};
pub use services::purge_service::{PurgeError, PurgeService};
