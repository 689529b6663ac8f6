//! Notifications State
//!
//! Drains service events in batches and keeps the most recent notifications,
//! newest first, plus the socket's connection status for the menu.

use crate::constants::{INGEST_BATCH_SIZE, INGEST_INTERVAL_MS, NOTIFICATIONS_CAPACITY};
use crate::domain::Notification;
use crate::helpers::BoundedDeque;
use crate::services::ServiceEvent;
use crossbeam_channel::Receiver;
use gpui::{Context, Task};
use std::sync::Arc;
use std::time::Duration;

pub struct NotificationsState {
    items: BoundedDeque<Notification>,
    connected: bool,
    /// Last connection detail reported by the supervisor
    detail: Arc<str>,
    ingest_task: Option<Task<()>>,
}

impl Default for NotificationsState {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationsState {
    pub fn new() -> Self {
        Self {
            items: BoundedDeque::new(NOTIFICATIONS_CAPACITY),
            connected: false,
            detail: Arc::from(""),
            ingest_task: None,
        }
    }

    /// Start the event ingest loop
    ///
    /// Events are collected every [`INGEST_INTERVAL_MS`] and applied with a
    /// single notify per batch.
    pub fn start_ingest(&mut self, rx: Receiver<ServiceEvent>, cx: &mut Context<Self>) {
        if self.ingest_task.is_some() {
            tracing::warn!("Ingest task already running");
            return;
        }

        let task = cx.spawn(async move |handle, cx| {
            loop {
                cx.background_executor()
                    .timer(Duration::from_millis(INGEST_INTERVAL_MS))
                    .await;

                let mut batch = Vec::with_capacity(INGEST_BATCH_SIZE);
                while let Ok(ev) = rx.try_recv() {
                    batch.push(ev);
                    if batch.len() >= INGEST_BATCH_SIZE {
                        break;
                    }
                }

                if batch.is_empty() {
                    continue;
                }

                if handle
                    .update(cx, |this, cx| this.apply_batch(batch, cx))
                    .is_err()
                {
                    break;
                }
            }
        });

        self.ingest_task = Some(task);
        tracing::info!("Started notification ingest task");
    }

    fn apply_batch(&mut self, batch: Vec<ServiceEvent>, cx: &mut Context<Self>) {
        for event in batch {
            self.apply_event(event);
        }
        cx.notify();
    }

    fn apply_event(&mut self, event: ServiceEvent) {
        match event {
            ServiceEvent::Notification(notification) => self.items.push(notification),
            ServiceEvent::ConnectionState {
                connected, detail, ..
            } => {
                self.connected = connected;
                self.detail = detail;
            }
        }
    }

    // ==================== Getters ====================

    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Newest first
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter_newest()
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    // ==================== Setters ====================

    pub fn clear(&mut self, cx: &mut Context<Self>) {
        self.items.clear();
        self.connected = false;
        cx.notify();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_fold_newest_first() {
        let mut state = NotificationsState::new();
        state.apply_event(ServiceEvent::Notification(Notification::assignment("uno")));
        state.apply_event(ServiceEvent::Notification(Notification::assignment("dos")));
        state.apply_event(ServiceEvent::ConnectionState {
            service: "notifications".into(),
            connected: true,
            detail: "Connected".into(),
        });

        assert_eq!(state.count(), 2);
        let messages: Vec<_> = state.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, ["dos", "uno"]);
        assert!(state.is_connected());
        assert_eq!(state.detail(), "Connected");
    }

    #[test]
    fn test_capacity_is_bounded() {
        let mut state = NotificationsState::new();
        for i in 0..NOTIFICATIONS_CAPACITY + 5 {
            state.apply_event(ServiceEvent::Notification(Notification::assignment(&i.to_string())));
        }
        assert_eq!(state.count(), NOTIFICATIONS_CAPACITY);
        let newest = state.iter().next().map(|n| n.message.clone());
        assert_eq!(newest, Some((NOTIFICATIONS_CAPACITY + 4).to_string()));
    }
}
