//! Helper Utilities
//!
//! Common utilities used across the application.

mod action;
mod bounded;
mod fs;
mod string;

pub use action::*;
pub use bounded::*;
pub use fs::*;
pub use string::*;
