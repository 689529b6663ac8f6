//! Table State
//!
//! Entity wrapper around a [`TableModel`] plus its load status, so a data
//! table view can observe it and its owner can feed it rows.

use crate::table::{Row, TableModel};
use gpui::Context;
use serde_json::Value;
use std::sync::Arc;

/// Load status of the rows behind a table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Error(Arc<str>),
}

impl LoadStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }
}

pub struct TableState {
    model: TableModel,
    status: LoadStatus,
}

impl TableState {
    pub fn new(model: TableModel) -> Self {
        Self {
            model,
            status: LoadStatus::Idle,
        }
    }

    // ==================== Getters ====================

    pub fn model(&self) -> &TableModel {
        &self.model
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    // ==================== Setters ====================

    pub fn set_loading(&mut self, cx: &mut Context<Self>) {
        self.status = LoadStatus::Loading;
        cx.notify();
    }

    pub fn set_error(&mut self, message: impl Into<Arc<str>>, cx: &mut Context<Self>) {
        self.status = LoadStatus::Error(message.into());
        cx.notify();
    }

    pub fn set_rows(&mut self, rows: Vec<Row>, cx: &mut Context<Self>) {
        self.model.set_batch(rows);
        self.status = LoadStatus::Loaded;
        cx.notify();
    }

    pub fn replace_row(&mut self, id: &Value, row: Row, cx: &mut Context<Self>) {
        if self.model.replace_row(id, row) {
            cx.notify();
        }
    }

    pub fn push_row(&mut self, row: Row, cx: &mut Context<Self>) {
        self.model.push_row(row);
        cx.notify();
    }

    /// Empty the table and forget the load status
    pub fn reset(&mut self, cx: &mut Context<Self>) {
        self.model.set_batch(Vec::new());
        self.model.set_search("");
        self.model.clear_sort();
        self.status = LoadStatus::Idle;
        cx.notify();
    }

    pub fn set_search(&mut self, term: String, cx: &mut Context<Self>) {
        if self.model.set_search(term) {
            cx.notify();
        }
    }

    pub fn toggle_sort(&mut self, key: &str, cx: &mut Context<Self>) {
        if self.model.toggle_sort(key) {
            cx.notify();
        }
    }

    pub fn set_page(&mut self, page: usize, cx: &mut Context<Self>) {
        self.model.set_page(page);
        cx.notify();
    }

    pub fn set_page_size(&mut self, page_size: usize, cx: &mut Context<Self>) {
        self.model.set_page_size(page_size);
        cx.notify();
    }
}
