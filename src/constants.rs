//! Application Constants
//!
//! Window geometry, cache capacities and network tuning in one place.

/// Default window dimensions
pub const DEFAULT_WINDOW_WIDTH: f32 = 1200.0;
pub const DEFAULT_WINDOW_HEIGHT: f32 = 780.0;
pub const MIN_WINDOW_WIDTH: f32 = 820.0;
pub const MIN_WINDOW_HEIGHT: f32 = 520.0;

/// Width of the login / register card
pub const AUTH_CARD_WIDTH: f32 = 380.0;

/// Width of task modals
pub const MODAL_WIDTH: f32 = 560.0;

/// Received notifications kept in memory
pub const NOTIFICATIONS_CAPACITY: usize = 200;

/// Batch processing thresholds
pub const INGEST_BATCH_SIZE: usize = 256;
pub const INGEST_INTERVAL_MS: u64 = 100;

/// Retry configuration
pub const RETRY_INITIAL_DELAY_MS: u64 = 1000;
pub const RETRY_MAX_DELAY_MS: u64 = 30000;
pub const RETRY_MULTIPLIER: f64 = 2.0;
pub const RETRY_JITTER: f64 = 0.1;

/// HTTP request timeout
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// STOMP handshake timeout
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Outgoing STOMP heart-beat interval
pub const STOMP_HEART_BEAT_MS: u64 = 10000;
