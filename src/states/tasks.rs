//! Tasks State
//!
//! The task page: which list is shown, the table fed from the API, the open
//! modal, and the create / update / delete round trips.

use crate::domain::{Task, TaskDraft, User, row_task_id, task_schema};
use crate::services::{TaskScope, run_in_tokio};
use crate::states::{DeskGlobalStore, TableState, UIEvent, sign_out};
use crate::table::{Row, RowAction, TableModel};
use gpui::{App, AppContext, Context, Entity, EventEmitter};
use serde_json::Value;
use tracing::{error, info, warn};

/// Modal currently shown over the task table
#[derive(Debug, Clone, Default, PartialEq)]
pub enum TaskModal {
    #[default]
    None,
    View(Row),
    Delete(Row),
    Form(TaskDraft),
}

/// Users offered by the responsable picker
#[derive(Debug, Clone, Default)]
pub enum UsersStatus {
    #[default]
    Idle,
    Loading,
    Loaded(Vec<User>),
    Error(String),
}

pub struct TasksState {
    table: Entity<TableState>,
    scope: TaskScope,
    modal: TaskModal,
    users: UsersStatus,
    saving: bool,
    /// Bumped on every load so stale responses are dropped
    generation: u64,
}

impl EventEmitter<UIEvent> for TasksState {}

impl TasksState {
    pub fn new(page_size: usize, cx: &mut App) -> Self {
        let model = TableModel::with_schema(task_schema())
            .crud(true)
            .page_size_of(page_size);
        Self {
            table: cx.new(|_| TableState::new(model)),
            scope: TaskScope::default(),
            modal: TaskModal::None,
            users: UsersStatus::Idle,
            saving: false,
            generation: 0,
        }
    }

    // ==================== Getters ====================

    pub fn table(&self) -> Entity<TableState> {
        self.table.clone()
    }

    pub fn scope(&self) -> TaskScope {
        self.scope
    }

    pub fn modal(&self) -> &TaskModal {
        &self.modal
    }

    pub fn users(&self) -> &UsersStatus {
        &self.users
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    // ==================== Modals ====================

    /// Route a table action to its modal
    pub fn handle_action(&mut self, action: &RowAction, cx: &mut Context<Self>) {
        self.modal = match action {
            RowAction::View(row) => TaskModal::View(row.clone()),
            RowAction::Edit(row) => TaskModal::Form(TaskDraft::from_row(row)),
            RowAction::Delete(row) => TaskModal::Delete(row.clone()),
            RowAction::Add => TaskModal::Form(TaskDraft::new(chrono::Local::now().date_naive())),
        };
        cx.notify();
    }

    pub fn close_modal(&mut self, cx: &mut Context<Self>) {
        self.modal = TaskModal::None;
        self.saving = false;
        cx.notify();
    }

    /// Forget everything tied to the signed-out user
    pub fn reset(&mut self, cx: &mut Context<Self>) {
        self.generation += 1;
        self.modal = TaskModal::None;
        self.users = UsersStatus::Idle;
        self.saving = false;
        self.table.update(cx, |table, cx| table.reset(cx));
        cx.notify();
    }

    // ==================== Loading ====================

    /// Switch list and reload it
    pub fn show(&mut self, scope: TaskScope, cx: &mut Context<Self>) {
        self.scope = scope;
        self.modal = TaskModal::None;
        self.load(cx);
    }

    pub fn load(&mut self, cx: &mut Context<Self>) {
        self.generation += 1;
        let generation = self.generation;
        let scope = self.scope;
        let api = cx.global::<DeskGlobalStore>().services().api();
        self.table.update(cx, |table, cx| table.set_loading(cx));

        cx.spawn(async move |this, cx| {
            let result = run_in_tokio(async move { api.tasks(scope).await }).await;
            let _ = this.update(cx, |this, cx| {
                if this.generation != generation {
                    return;
                }
                match result {
                    Ok(tasks) => {
                        info!(?scope, count = tasks.len(), "Tasks loaded");
                        let rows = tasks.iter().map(Task::to_row).collect();
                        this.table.update(cx, |table, cx| table.set_rows(rows, cx));
                    }
                    Err(e) => {
                        error!(?scope, error = %e, "Failed to load tasks");
                        let unauthorized = e.is_unauthorized();
                        this.table
                            .update(cx, |table, cx| table.set_error(e.to_string(), cx));
                        if unauthorized {
                            cx.defer(sign_out);
                        }
                    }
                }
            });
        })
        .detach();
    }

    pub fn load_users(&mut self, cx: &mut Context<Self>) {
        if matches!(self.users, UsersStatus::Loading) {
            return;
        }
        self.users = UsersStatus::Loading;
        cx.notify();

        let api = cx.global::<DeskGlobalStore>().services().api();
        cx.spawn(async move |this, cx| {
            let result = run_in_tokio(async move { api.users().await }).await;
            let _ = this.update(cx, |this, cx| {
                this.users = match result {
                    Ok(users) => UsersStatus::Loaded(users),
                    Err(e) => {
                        error!(error = %e, "Failed to load users");
                        UsersStatus::Error(e.to_string())
                    }
                };
                cx.notify();
            });
        })
        .detach();
    }

    // ==================== Mutations ====================

    /// Delete the task of the open delete modal, then reload
    pub fn confirm_delete(&mut self, cx: &mut Context<Self>) {
        let TaskModal::Delete(row) = &self.modal else {
            return;
        };
        let Some(id) = row_task_id(row) else {
            warn!("Delete requested for a row without id");
            self.close_modal(cx);
            return;
        };
        self.saving = true;
        cx.notify();

        let api = cx.global::<DeskGlobalStore>().services().api();
        cx.spawn(async move |this, cx| {
            let result = run_in_tokio(async move { api.delete_task(id).await }).await;
            let _ = this.update(cx, |this, cx| {
                this.saving = false;
                match result {
                    Ok(()) => {
                        info!(id, "Task deleted");
                        this.modal = TaskModal::None;
                        this.load(cx);
                    }
                    Err(e) => {
                        error!(id, error = %e, "Failed to delete task");
                        cx.emit(UIEvent::error(e.to_string()));
                    }
                }
                cx.notify();
            });
        })
        .detach();
    }

    /// Create or update from a validated draft. Updates replace the row in
    /// place; creations append the task returned by the API.
    pub fn save_draft(&mut self, draft: TaskDraft, cx: &mut Context<Self>) {
        self.saving = true;
        cx.notify();

        let api = cx.global::<DeskGlobalStore>().services().api();
        let payload = draft.to_payload();
        cx.spawn(async move |this, cx| {
            let id = draft.id;
            let result = run_in_tokio(async move {
                match id {
                    Some(id) => api.update_task(id, &payload).await,
                    None => api.create_task(&payload).await,
                }
            })
            .await;

            let _ = this.update(cx, |this, cx| {
                this.saving = false;
                match (result, draft.id) {
                    (Ok(_), Some(id)) => {
                        info!(id, "Task updated");
                        let row = draft.to_row(id);
                        this.table
                            .update(cx, |table, cx| table.replace_row(&Value::from(id), row, cx));
                        this.modal = TaskModal::None;
                    }
                    (Ok(task), None) => {
                        info!(id = task.id, "Task created");
                        let row = task.to_row();
                        this.table.update(cx, |table, cx| table.push_row(row, cx));
                        this.modal = TaskModal::None;
                    }
                    (Err(e), _) => {
                        error!(error = %e, "Failed to save task");
                        cx.emit(UIEvent::error(e.to_string()));
                    }
                }
                cx.notify();
            });
        })
        .detach();
    }
}
