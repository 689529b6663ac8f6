//! State Management Layer
//!
//! Centralized application state using GPUI's Entity system.
//! Follows a unidirectional data flow pattern:
//!
//! ```text
//! UI Action → State Method → spawn Service Call → Service Event → State Update → notify → UI Refresh
//! ```

mod app;
mod i18n;
mod notifications;
mod session;
mod table;
mod tasks;
mod ui_event;

pub use app::*;
pub use i18n::*;
pub use notifications::*;
pub use session::*;
pub use table::*;
pub use tasks::*;
pub use ui_event::*;
