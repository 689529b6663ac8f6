//! Table Model
//!
//! Owns one batch of rows and the user's view state over it (search term,
//! sort, page). Every derived view is recomputed from the batch on demand.

use super::export::{self, ReportStyle};
use super::{
    ColumnDescriptor, DEFAULT_PAGE_SIZE, PageSummary, Row, SortState, TableSchema, filter_rows,
    page_window, paginate, sort_rows, total_pages,
};
use crate::error::Result;
use serde_json::Value;
use std::ops::RangeInclusive;

/// Where the column set comes from
#[derive(Clone, Debug, PartialEq, Eq)]
enum SchemaSource {
    /// Re-derived from the first row of every non-empty batch
    Inferred,
    /// Fixed by the owner
    Explicit,
}

/// One page of the processed collection
#[derive(Debug)]
pub struct PageView<'a> {
    pub rows: Vec<&'a Row>,
    /// Effective 1-based page, clamped to the available pages
    pub page: usize,
    pub total_pages: usize,
    /// Rows left after filtering
    pub total_rows: usize,
    pub summary: PageSummary,
    pub window: RangeInclusive<usize>,
}

impl PageView<'_> {
    pub fn can_prev(&self) -> bool {
        self.page > 1
    }

    pub fn can_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Pagination controls only make sense with more than one page.
    pub fn show_pagination(&self) -> bool {
        self.total_pages > 1
    }
}

#[derive(Clone, Debug)]
pub struct TableModel {
    rows: Vec<Row>,
    schema: TableSchema,
    source: SchemaSource,
    crud: bool,
    search: String,
    sort: SortState,
    page: usize,
    page_size: usize,
}

impl Default for TableModel {
    fn default() -> Self {
        Self::new()
    }
}

impl TableModel {
    /// Empty model that infers its columns from each batch
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            schema: TableSchema::default(),
            source: SchemaSource::Inferred,
            crud: false,
            search: String::new(),
            sort: SortState::new(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Empty model with a fixed column set
    pub fn with_schema(schema: TableSchema) -> Self {
        Self {
            schema,
            source: SchemaSource::Explicit,
            ..Self::new()
        }
    }

    /// Enable the actions column
    pub fn crud(mut self, crud: bool) -> Self {
        self.crud = crud;
        self
    }

    pub fn page_size_of(mut self, page_size: usize) -> Self {
        self.set_page_size(page_size);
        self
    }

    // ==================== Getters ====================

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    pub fn is_crud(&self) -> bool {
        self.crud
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Rendered columns, including the actions column in CRUD mode
    pub fn columns(&self) -> Vec<ColumnDescriptor> {
        self.schema.columns(self.crud)
    }

    /// Columns that carry data (used by exports)
    pub fn data_columns(&self) -> Vec<ColumnDescriptor> {
        self.schema.data_columns()
    }

    /// Filtered and sorted rows, not paginated
    pub fn processed(&self) -> Vec<&Row> {
        let mut rows = filter_rows(&self.rows, &self.search);
        sort_rows(&mut rows, &self.sort);
        rows
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.processed().len(), self.page_size)
    }

    /// Current page of the processed rows
    pub fn page_view(&self) -> PageView<'_> {
        let processed = self.processed();
        let total_rows = processed.len();
        let pages = total_pages(total_rows, self.page_size);
        let page = self.page.clamp(1, pages.max(1));
        let (rows, _) = paginate(&processed, page, self.page_size);

        PageView {
            rows: rows.to_vec(),
            page,
            total_pages: pages,
            total_rows,
            summary: PageSummary::new(page, self.page_size, total_rows),
            window: page_window(page, pages),
        }
    }

    // ==================== Setters ====================

    /// Replace the batch.
    ///
    /// An inferred schema is re-derived from the first row; an empty batch
    /// keeps the previous columns. The page goes back to 1.
    pub fn set_batch(&mut self, rows: Vec<Row>) {
        if self.source == SchemaSource::Inferred {
            if let Some(first) = rows.first() {
                self.schema = TableSchema::infer(first);
            }
        }
        self.rows = rows;
        self.page = 1;
    }

    /// Swap the row whose `id` equals `id`, keeping the page. Returns
    /// whether a row matched.
    pub fn replace_row(&mut self, id: &Value, row: Row) -> bool {
        let Some(slot) = self.rows.iter_mut().find(|r| r.id() == Some(id)) else {
            return false;
        };
        *slot = row;
        true
    }

    /// Append one row, keeping the page.
    pub fn push_row(&mut self, row: Row) {
        if self.source == SchemaSource::Inferred && self.rows.is_empty() {
            self.schema = TableSchema::infer(&row);
        }
        self.rows.push(row);
    }

    /// Fix the column set, or go back to inference with `None`.
    pub fn set_schema(&mut self, schema: Option<TableSchema>) {
        match schema {
            Some(schema) => {
                self.schema = schema;
                self.source = SchemaSource::Explicit;
            }
            None => {
                self.source = SchemaSource::Inferred;
                if let Some(first) = self.rows.first() {
                    self.schema = TableSchema::infer(first);
                }
            }
        }
    }

    /// Returns whether the term changed. A new term goes back to page 1.
    pub fn set_search(&mut self, term: impl Into<String>) -> bool {
        let term = term.into();
        if term == self.search {
            return false;
        }
        self.search = term;
        self.page = 1;
        true
    }

    /// Header click. Ignored for unknown or unsortable columns.
    pub fn toggle_sort(&mut self, key: &str) -> bool {
        let sortable = self
            .columns()
            .iter()
            .any(|c| c.key == key && c.sortable);
        if sortable {
            self.sort.toggle(key);
        }
        sortable
    }

    pub fn clear_sort(&mut self) {
        self.sort.clear();
    }

    /// Jump to `page`, clamped to the available pages.
    pub fn set_page(&mut self, page: usize) {
        let pages = self.total_pages().max(1);
        self.page = page.clamp(1, pages);
    }

    pub fn prev_page(&mut self) {
        self.set_page(self.page.saturating_sub(1));
    }

    pub fn next_page(&mut self) {
        self.set_page(self.page + 1);
    }

    /// Zero is ignored. A new size goes back to page 1.
    pub fn set_page_size(&mut self, page_size: usize) {
        if page_size == 0 || page_size == self.page_size {
            return;
        }
        self.page_size = page_size;
        self.page = 1;
    }

    // ==================== Export ====================

    pub fn export_csv(&self) -> Result<String> {
        export::to_csv(&self.processed(), &self.data_columns())
    }

    pub fn export_html(&self, style: ReportStyle, date: &str) -> String {
        export::to_html(&self.processed(), &self.data_columns(), style, date)
    }
}
