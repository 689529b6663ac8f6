//! Application Layer
//!
//! App initialization, global actions, window management and the workspace
//! shell.

pub mod application;
pub mod workspace;
