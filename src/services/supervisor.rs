//! Connection Supervisor
//!
//! Tracks the notification socket's connection state, computes reconnect
//! delays with exponential backoff, and reports every transition to the
//! state layer.
//!
//! Each socket loop reports through a [`Generation`]. Starting a new one
//! retires the previous, so a loop that is still shutting down can no longer
//! overwrite the state of its replacement.

use crate::constants::{
    RETRY_INITIAL_DELAY_MS, RETRY_JITTER, RETRY_MAX_DELAY_MS, RETRY_MULTIPLIER,
};
use crate::services::events::ServiceEvent;
use crossbeam_channel::Sender;
use std::sync::atomic::{AtomicU8, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Retry configuration for connection recovery
#[derive(Clone, Debug)]
pub struct RetryConfig {
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
    /// Jitter factor (0.0 - 1.0) to randomize delays
    pub jitter: f64,
    /// 0 = unlimited
    pub max_attempts: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(RETRY_INITIAL_DELAY_MS),
            max_delay: Duration::from_millis(RETRY_MAX_DELAY_MS),
            multiplier: RETRY_MULTIPLIER,
            jitter: RETRY_JITTER,
            max_attempts: 0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    /// Waiting before the next attempt
    Backoff,
}

impl ConnectionState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => ConnectionState::Disconnected,
            1 => ConnectionState::Connecting,
            2 => ConnectionState::Connected,
            _ => ConnectionState::Backoff,
        }
    }
}

pub struct Supervisor {
    service_name: Arc<str>,
    config: RetryConfig,
    tx: Sender<ServiceEvent>,
    state: AtomicU8,
    attempt: AtomicU32,
    generation: Mutex<u64>,
}

impl Supervisor {
    pub fn new(
        service_name: impl Into<Arc<str>>,
        config: RetryConfig,
        tx: Sender<ServiceEvent>,
    ) -> Self {
        Self {
            service_name: service_name.into(),
            config,
            tx,
            state: AtomicU8::new(ConnectionState::Disconnected as u8),
            attempt: AtomicU32::new(0),
            generation: Mutex::new(0),
        }
    }

    /// Retire the current generation and start a new one with a fresh
    /// attempt counter.
    pub fn begin(self: &Arc<Self>) -> Generation {
        let id = {
            let mut current = self.generation.lock().unwrap_or_else(PoisonError::into_inner);
            *current += 1;
            *current
        };
        self.reset();
        Generation {
            supervisor: self.clone(),
            id,
        }
    }

    fn is_current(&self, id: u64) -> bool {
        *self.generation.lock().unwrap_or_else(PoisonError::into_inner) == id
    }

    pub fn state(&self) -> ConnectionState {
        ConnectionState::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// Store and report `state` unless `generation` has been retired. The
    /// check and the store happen under one lock.
    fn transition(&self, generation: u64, state: ConnectionState, detail: &str) -> bool {
        let current = self.generation.lock().unwrap_or_else(PoisonError::into_inner);
        if generation != *current {
            return false;
        }
        self.state.store(state as u8, Ordering::SeqCst);

        let _ = self.tx.send(ServiceEvent::ConnectionState {
            service: self.service_name.clone(),
            connected: state == ConnectionState::Connected,
            detail: detail.into(),
        });
        true
    }

    fn retry_delay(&self, generation: u64) -> Option<Duration> {
        let attempt = self.attempt.fetch_add(1, Ordering::SeqCst) + 1;

        if self.config.max_attempts > 0 && attempt > self.config.max_attempts {
            self.transition(
                generation,
                ConnectionState::Disconnected,
                &format!("Max attempts ({}) reached", self.config.max_attempts),
            );
            return None;
        }

        let base_delay = self.config.initial_delay.as_millis() as f64
            * self.config.multiplier.powi((attempt - 1) as i32);
        let capped_delay = base_delay.min(self.config.max_delay.as_millis() as f64);

        let jitter_range = capped_delay * self.config.jitter;
        let jitter = (rand_jitter() * 2.0 - 1.0) * jitter_range;
        let delay = Duration::from_millis((capped_delay + jitter).max(0.0) as u64);

        let detail = format!(
            "Reconnecting in {}s (attempt {}/{})",
            delay.as_secs(),
            attempt,
            if self.config.max_attempts == 0 {
                "∞".to_string()
            } else {
                self.config.max_attempts.to_string()
            }
        );
        if !self.transition(generation, ConnectionState::Backoff, &detail) {
            return None;
        }
        tracing::info!(service = %self.service_name, %detail, "Backing off");

        Some(delay)
    }

    pub fn reset(&self) {
        self.attempt.store(0, Ordering::SeqCst);
    }

    pub fn attempt_count(&self) -> u32 {
        self.attempt.load(Ordering::SeqCst)
    }
}

/// Pseudo-random value in 0.0 - 1.0 from the clock's sub-second nanos
fn rand_jitter() -> f64 {
    use std::time::SystemTime;
    let nanos = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    (nanos % 1000) as f64 / 1000.0
}

impl std::fmt::Debug for Supervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Supervisor")
            .field("service", &self.service_name)
            .field("state", &self.state())
            .field("attempt", &self.attempt_count())
            .finish()
    }
}

/// One socket loop's view of the supervisor. Reports are dropped once a
/// newer generation has begun.
pub struct Generation {
    supervisor: Arc<Supervisor>,
    id: u64,
}

impl Generation {
    pub fn is_current(&self) -> bool {
        self.supervisor.is_current(self.id)
    }

    pub fn on_connecting(&self) {
        if self.supervisor.transition(self.id, ConnectionState::Connecting, "Connecting") {
            tracing::debug!(service = %self.supervisor.service_name, "Connecting");
        }
    }

    pub fn on_connected(&self) {
        if !self.is_current() {
            return;
        }
        self.supervisor.attempt.store(0, Ordering::SeqCst);
        if self.supervisor.transition(self.id, ConnectionState::Connected, "Connected") {
            tracing::info!(service = %self.supervisor.service_name, "Connected");
        }
    }

    pub fn on_disconnected(&self, reason: &str) {
        if self.supervisor.transition(self.id, ConnectionState::Disconnected, reason) {
            tracing::warn!(service = %self.supervisor.service_name, reason, "Disconnected");
        } else {
            tracing::debug!(generation = self.id, reason, "Ignoring report from a retired connection");
        }
    }

    /// Next reconnect delay, or `None` once `max_attempts` is exhausted or
    /// this generation has been retired.
    pub fn next_retry_delay(&self) -> Option<Duration> {
        if !self.is_current() {
            return None;
        }
        self.supervisor.retry_delay(self.id)
    }
}

impl std::fmt::Debug for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generation")
            .field("id", &self.id)
            .field("current", &self.is_current())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    #[test]
    fn test_backoff_grows_and_caps() {
        let (tx, _rx) = unbounded();
        let config = RetryConfig {
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(400),
            jitter: 0.0,
            ..Default::default()
        };
        let supervisor = Arc::new(Supervisor::new("test", config, tx));
        let generation = supervisor.begin();

        let delays: Vec<u128> = (0..4)
            .filter_map(|_| generation.next_retry_delay())
            .map(|d| d.as_millis())
            .collect();
        assert_eq!(delays, vec![100, 200, 400, 400]);
        assert_eq!(supervisor.state(), ConnectionState::Backoff);
    }

    #[test]
    fn test_max_attempts() {
        let (tx, _rx) = unbounded();
        let config = RetryConfig {
            max_attempts: 2,
            ..Default::default()
        };
        let supervisor = Arc::new(Supervisor::new("test", config, tx));
        let generation = supervisor.begin();

        assert!(generation.next_retry_delay().is_some());
        assert!(generation.next_retry_delay().is_some());
        assert!(generation.next_retry_delay().is_none());
        assert_eq!(supervisor.state(), ConnectionState::Disconnected);
    }

    #[test]
    fn test_connected_resets_attempts_and_reports() {
        let (tx, rx) = unbounded();
        let supervisor = Arc::new(Supervisor::new("notifications", RetryConfig::default(), tx));
        let generation = supervisor.begin();
        generation.next_retry_delay();
        generation.on_connected();
        assert_eq!(supervisor.attempt_count(), 0);

        let last = rx.try_iter().last().expect("event");
        match last {
            ServiceEvent::ConnectionState {
                service, connected, ..
            } => {
                assert_eq!(&*service, "notifications");
                assert!(connected);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_retired_generation_cannot_overwrite_state() {
        let (tx, _rx) = unbounded();
        let supervisor = Arc::new(Supervisor::new("notifications", RetryConfig::default(), tx));

        let first = supervisor.begin();
        first.on_connecting();
        first.on_connected();

        let second = supervisor.begin();
        assert!(!first.is_current());
        second.on_connecting();
        second.on_connected();

        // The first loop winds down after its replacement is live
        first.on_disconnected("Closed by client");
        assert!(first.next_retry_delay().is_none());
        assert_eq!(supervisor.state(), ConnectionState::Connected);
        assert_eq!(supervisor.attempt_count(), 0);

        second.on_disconnected("Closed by client");
        assert_eq!(supervisor.state(), ConnectionState::Disconnected);
    }
}
