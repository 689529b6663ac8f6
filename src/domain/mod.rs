//! Domain Models
//!
//! Typed records exchanged with the task API and the notification broker,
//! plus form validation rules.

mod notification;
mod task;
mod user;
mod validation;

pub use notification::*;
pub use task::*;
pub use user::*;
pub use validation::*;
