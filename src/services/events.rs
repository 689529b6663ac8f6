//! Service Events
//!
//! Events pushed from background services to the state layer over a
//! crossbeam channel and drained in batches on the UI thread.

use crate::domain::Notification;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub enum ServiceEvent {
    /// A message arrived on one of the notification topics
    Notification(Notification),

    /// Service connection state changed
    ConnectionState {
        /// Service name (e.g., "notifications")
        service: Arc<str>,
        connected: bool,
        /// Additional detail (e.g., "Reconnecting in 8s (attempt 4/∞)")
        detail: Arc<str>,
    },
}
