//! Service Hub
//!
//! Owns the REST client and the notification socket, and multiplexes their
//! events into one channel for the state layer.

use crate::error::Result;
use crate::services::{ApiClient, NotificationClient, RetryConfig, ServiceEvent};
use crossbeam_channel::Receiver;
use std::sync::Arc;

/// Endpoints and retry policy for all services
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub api_base_url: String,
    pub ws_url: String,
    pub retry: RetryConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_base_url: crate::services::DEFAULT_API_BASE_URL.to_string(),
            ws_url: crate::services::DEFAULT_WS_URL.to_string(),
            retry: RetryConfig::default(),
        }
    }
}

#[derive(Clone)]
pub struct ServiceHub {
    api: ApiClient,
    notifications: Arc<NotificationClient>,
    rx: Receiver<ServiceEvent>,
}

impl ServiceHub {
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let (tx, rx) = crossbeam_channel::unbounded();
        let api = ApiClient::new(&config.api_base_url)?;
        let notifications = Arc::new(NotificationClient::new(
            &config.ws_url,
            config.retry,
            tx,
        ));

        tracing::info!(
            api = %config.api_base_url,
            ws = %config.ws_url,
            "Service hub initialized"
        );

        Ok(Self {
            api,
            notifications,
            rx,
        })
    }

    /// Events from all services, drained by the state layer.
    pub fn events(&self) -> Receiver<ServiceEvent> {
        self.rx.clone()
    }

    pub fn api(&self) -> ApiClient {
        self.api.clone()
    }

    pub fn notifications(&self) -> Arc<NotificationClient> {
        self.notifications.clone()
    }

    // ==================== Session Lifecycle ====================

    /// Attach the bearer token and start listening for the user's notifications.
    pub fn start_session(&self, token: &str, user_id: i64) {
        self.api.set_token(Some(token.to_string()));
        self.notifications.connect(user_id);
    }

    /// Drop the bearer token and close the notification socket.
    pub fn end_session(&self) {
        self.api.set_token(None);
        self.notifications.disconnect();
    }
}

impl std::fmt::Debug for ServiceHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceHub")
            .field("api", &self.api)
            .field("notifications", &self.notifications)
            .finish()
    }
}
