//! HTTP handlers: the notification webhook and the health probes.

pub mod event_handlers;
pub mod health_handlers;
