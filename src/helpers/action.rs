//! Keyboard Actions and Shortcuts

use gpui::{Action, KeyBinding};
use schemars::JsonSchema;
use serde::Deserialize;

/// Application-level actions
#[derive(Clone, Copy, PartialEq, Debug, Deserialize, JsonSchema, Action)]
pub enum MenuAction {
    Quit,
}

/// Navigation between the protected pages
#[derive(Clone, Copy, PartialEq, Debug, Deserialize, JsonSchema, Action)]
pub enum NavAction {
    MyTasks,
    AssignedTasks,
    Logout,
}

/// Task page actions
#[derive(Clone, Copy, PartialEq, Debug, Deserialize, JsonSchema, Action)]
pub enum TaskAction {
    /// Reload the task list
    Refresh,
    /// Open the add-task form
    New,
}

/// Key context of the task page
pub const TASKS_CONTEXT: &str = "TasksView";

pub fn new_key_bindings() -> Vec<KeyBinding> {
    vec![
        KeyBinding::new("secondary-q", MenuAction::Quit, None),
        KeyBinding::new("secondary-1", NavAction::MyTasks, None),
        KeyBinding::new("secondary-2", NavAction::AssignedTasks, None),
        KeyBinding::new("secondary-r", TaskAction::Refresh, Some(TASKS_CONTEXT)),
        KeyBinding::new("secondary-n", TaskAction::New, Some(TASKS_CONTEXT)),
    ]
}
