//! DataTable Component
//!
//! Searchable, sortable, paginated table over a [`TableState`] with CSV,
//! print and PDF export and per-row CRUD buttons. Row buttons and the "new"
//! button emit [`RowAction`]s; the owner decides what they mean.
//!
//! [`TableState`]: crate::states::TableState
//! [`RowAction`]: crate::table::RowAction

mod pagination;
mod view;

pub use pagination::Pagination;
pub use view::*;
