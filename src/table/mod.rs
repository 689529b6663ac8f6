//! Generic Data Table Engine
//!
//! Toolkit-independent core of the data table: column inference, search
//! filtering, sorting, pagination, export, and CRUD action dispatch.
//!
//! ```text
//! batch ──► TableSchema (once per batch)
//!   │
//!   ▼
//! filter(term) ──► sort(SortState) ──► paginate(page, size) ──► page rows
//!                        │
//!                        └──► export (CSV / print / PDF)
//! ```
//!
//! Nothing in here performs I/O. The GPUI view in
//! [`crate::components::data_table`] renders a [`TableModel`] and the
//! exporter service writes the artifacts produced by [`export`].

mod action;
pub mod export;
mod filter;
mod model;
mod pagination;
mod row;
mod schema;
mod sort;

pub use action::*;
pub use filter::*;
pub use model::*;
pub use pagination::*;
pub use row::*;
pub use schema::*;
pub use sort::*;
