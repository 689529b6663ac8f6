//! UI Events
//!
//! Feedback emitted from the state layer to the views.

use std::sync::Arc;

#[derive(Clone, Debug)]
pub enum UIEvent {
    /// Display a toast
    Toast {
        message: Arc<str>,
        /// Whether this is an error (affects styling)
        is_error: bool,
    },
}

impl UIEvent {
    pub fn info(message: impl Into<Arc<str>>) -> Self {
        Self::Toast {
            message: message.into(),
            is_error: false,
        }
    }

    pub fn error(message: impl Into<Arc<str>>) -> Self {
        Self::Toast {
            message: message.into(),
            is_error: true,
        }
    }
}
