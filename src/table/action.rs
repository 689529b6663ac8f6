//! CRUD action dispatch
//!
//! The table only reports which action the user picked; the owner of the
//! table handles modals and persistence.

use super::Row;

#[derive(Clone, Debug, PartialEq)]
pub enum RowAction {
    View(Row),
    Edit(Row),
    Delete(Row),
    Add,
}

impl RowAction {
    pub fn row(&self) -> Option<&Row> {
        match self {
            RowAction::View(row) | RowAction::Edit(row) | RowAction::Delete(row) => Some(row),
            RowAction::Add => None,
        }
    }
}
