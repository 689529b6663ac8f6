//! Components - Reusable UI Components
//!
//! Views and elements with no knowledge of tasks or services.

pub mod data_table;
mod modal;

pub use data_table::{DataTable, PageSizeChanged, Tone};
pub use modal::Modal;
