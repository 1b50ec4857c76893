//! Service layer: the purge orchestration core and the CDN client adapter
//! it calls through.

pub mod cdn_client;
pub mod purge_service;
