//! Service Layer
//!
//! Talks to the task backend and handles async operations, connection
//! management and event streaming.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        ServiceHub                            │
//! │  ┌─────────────┐  ┌────────────────────┐  ┌──────────────┐  │
//! │  │  ApiClient  │  │ NotificationClient │  │  Supervisor  │  │
//! │  │   (REST)    │  │  (STOMP over WS)   │  │   (retry)    │  │
//! │  └─────────────┘  └────────────────────┘  └──────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//!                            │
//!                            ▼ ServiceEvent
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       State Layer                            │
//! │              (NotificationsState, TasksState)                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`SessionStore`] and the export sink are plain filesystem services used
//! directly by the state layer.

mod api;
mod events;
pub mod exporter;
mod hub;
mod notifications;
mod runtime;
mod session;
pub mod stomp;
mod supervisor;

pub use api::*;
pub use events::*;
pub use hub::*;
pub use notifications::*;
pub use runtime::*;
pub use session::*;
pub use supervisor::*;
