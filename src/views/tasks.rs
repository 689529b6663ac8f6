//! Task Page
//!
//! Heading, the task table and the view / delete / form modals.

use super::TaskFormView;
use crate::components::{DataTable, Modal, PageSizeChanged, Tone};
use crate::domain::{Priority, TaskStatus, fields};
use crate::helpers::{TASKS_CONTEXT, TaskAction};
use crate::services::TaskScope;
use crate::states::{
    DeskGlobalStore, TaskModal, TasksState, UIEvent, i18n_tasks, locale, update_app_state_and_save,
};
use crate::table::{Row, RowAction};
use gpui::{
    AnyElement, App, Context, Entity, FontWeight, SharedString, Subscription, Task, Window, div,
    prelude::*,
};
use gpui_component::{
    ActiveTheme, Disableable, Icon, IconName, Sizable,
    button::{Button, ButtonVariants},
    h_flex,
    label::Label,
    v_flex,
};
use rust_i18n::t;
use std::time::Duration;

/// How long a toast stays on screen
const TOAST_DURATION: Duration = Duration::from_secs(4);

/// Badge colour for the priority and status columns
fn task_badge_tone(key: &str, text: &str) -> Tone {
    match key {
        fields::PRIORIDAD => match Priority::from_label(text) {
            Some(Priority::Baja) => Tone::Success,
            Some(Priority::Media) => Tone::Info,
            Some(Priority::Alta) => Tone::Warning,
            Some(Priority::Critica) => Tone::Danger,
            None => Tone::Neutral,
        },
        fields::ESTADO => match TaskStatus::from_label(text) {
            Some(TaskStatus::Pending) => Tone::Warning,
            Some(TaskStatus::InProgress) => Tone::Info,
            Some(TaskStatus::Completed) => Tone::Success,
            None => Tone::Neutral,
        },
        _ => Tone::Neutral,
    }
}

struct Toast {
    message: SharedString,
    is_error: bool,
}

pub struct TasksView {
    tasks: Entity<TasksState>,
    table: Entity<DataTable>,
    form: Option<Entity<TaskFormView>>,
    toast: Option<Toast>,
    _toast_timer: Option<Task<()>>,
    _subscriptions: Vec<Subscription>,
}

impl TasksView {
    pub fn new(window: &mut Window, cx: &mut Context<Self>) -> Self {
        let tasks = cx.global::<DeskGlobalStore>().tasks();
        let table_state = tasks.read(cx).table();
        let table = cx.new(|cx| DataTable::new(table_state, window, cx).badge_tone(task_badge_tone));

        let mut subscriptions = Vec::new();

        subscriptions.push(cx.observe_in(&tasks, window, |this, tasks, window, cx| {
            this.sync_form(&tasks, window, cx);
            cx.notify();
        }));

        subscriptions.push(cx.subscribe(&table, |this, _, action: &RowAction, cx| {
            this.tasks.update(cx, |tasks, cx| tasks.handle_action(action, cx));
        }));
        subscriptions.push(cx.subscribe(&table, |this, _, event: &UIEvent, cx| {
            this.show_toast(event, cx);
        }));
        subscriptions.push(cx.subscribe(&table, |_, _, event: &PageSizeChanged, cx| {
            let size = event.0;
            update_app_state_and_save(cx, "set_page_size", move |state, _| {
                state.set_page_size(size);
            });
        }));
        subscriptions.push(cx.subscribe(&tasks, |this, _, event: &UIEvent, cx| {
            this.show_toast(event, cx);
        }));

        Self {
            tasks,
            table,
            form: None,
            toast: None,
            _toast_timer: None,
            _subscriptions: subscriptions,
        }
    }

    /// Keep the form view in step with the modal: build it when a draft is
    /// opened and drop it when the modal closes.
    fn sync_form(&mut self, tasks: &Entity<TasksState>, window: &mut Window, cx: &mut Context<Self>) {
        match tasks.read(cx).modal() {
            TaskModal::Form(draft) => {
                if self.form.is_none() {
                    let draft = draft.clone();
                    let tasks = tasks.clone();
                    self.form = Some(cx.new(|cx| TaskFormView::new(tasks, draft, window, cx)));
                }
            }
            _ => self.form = None,
        }
    }

    fn show_toast(&mut self, event: &UIEvent, cx: &mut Context<Self>) {
        let UIEvent::Toast { message, is_error } = event;
        self.toast = Some(Toast {
            message: message.to_string().into(),
            is_error: *is_error,
        });
        self._toast_timer = Some(cx.spawn(async move |this, cx| {
            cx.background_executor().timer(TOAST_DURATION).await;
            let _ = this.update(cx, |this, cx| {
                this.toast = None;
                cx.notify();
            });
        }));
        cx.notify();
    }

    fn close_modal(&mut self, cx: &mut Context<Self>) {
        self.tasks.update(cx, |tasks, cx| tasks.close_modal(cx));
    }

    // ==================== Actions ====================

    fn on_task_action(&mut self, action: &TaskAction, _: &mut Window, cx: &mut Context<Self>) {
        match action {
            TaskAction::Refresh => self.tasks.update(cx, |tasks, cx| tasks.load(cx)),
            TaskAction::New => {
                self.tasks
                    .update(cx, |tasks, cx| tasks.handle_action(&RowAction::Add, cx));
            }
        }
    }

    // ==================== Rendering ====================

    fn close_handler(&self) -> impl Fn(&mut Window, &mut App) + 'static {
        let tasks = self.tasks.clone();
        move |_, cx| tasks.update(cx, |tasks, cx| tasks.close_modal(cx))
    }

    fn render_view_modal(&self, row: &Row, cx: &mut Context<Self>) -> AnyElement {
        let detail = |label_key: &str, key: &str| {
            h_flex()
                .gap_2()
                .items_start()
                .child(
                    Label::new(i18n_tasks(cx, label_key))
                        .text_sm()
                        .font_weight(FontWeight::SEMIBOLD),
                )
                .child(Label::new(row.display(key).into_owned()).text_sm())
        };

        Modal::new(i18n_tasks(cx, "details_title"))
            .on_close(self.close_handler())
            .child(detail("field_id", fields::ID))
            .child(detail("field_name", fields::NOMBRE))
            .child(detail("field_priority", fields::PRIORIDAD))
            .child(detail("field_status", fields::ESTADO))
            .child(detail("field_responsable", fields::RESPONSABLE))
            .child(detail("field_due", fields::FECHA_LIMITE))
            .child(detail("field_description", fields::DESCRIPCION))
            .footer(
                Button::new("details-close")
                    .primary()
                    .label(i18n_tasks(cx, "close"))
                    .on_click(cx.listener(|this, _, _, cx| this.close_modal(cx))),
            )
            .into_any_element()
    }

    fn render_delete_modal(&self, row: &Row, saving: bool, cx: &mut Context<Self>) -> AnyElement {
        let name = row.display(fields::NOMBRE).into_owned();
        let question = t!("tasks.delete_question", name = name, locale = &locale(cx)).to_string();

        Modal::new(i18n_tasks(cx, "delete_title"))
            .on_close(self.close_handler())
            .child(Label::new(question))
            .footer(
                Button::new("delete-cancel")
                    .ghost()
                    .label(i18n_tasks(cx, "cancel"))
                    .on_click(cx.listener(|this, _, _, cx| this.close_modal(cx))),
            )
            .footer(
                Button::new("delete-confirm")
                    .danger()
                    .label(i18n_tasks(cx, "delete"))
                    .loading(saving)
                    .disabled(saving)
                    .on_click(cx.listener(|this, _, _, cx| {
                        this.tasks.update(cx, |tasks, cx| tasks.confirm_delete(cx));
                    })),
            )
            .into_any_element()
    }

    fn render_toast(&self, toast: &Toast, cx: &mut Context<Self>) -> impl IntoElement {
        let color = if toast.is_error { cx.theme().danger } else { cx.theme().success };
        h_flex()
            .w_full()
            .px_4()
            .py_2()
            .gap_2()
            .rounded_md()
            .border_1()
            .border_color(color)
            .bg(color.opacity(0.1))
            .child(
                Icon::new(if toast.is_error { IconName::CircleX } else { IconName::CircleCheck })
                    .text_color(color),
            )
            .child(Label::new(toast.message.clone()).text_sm().flex_1())
            .child(
                Button::new("toast-dismiss")
                    .ghost()
                    .xsmall()
                    .icon(IconName::Close)
                    .on_click(cx.listener(|this, _, _, cx| {
                        this.toast = None;
                        this._toast_timer = None;
                        cx.notify();
                    })),
            )
    }
}

impl Render for TasksView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let tasks = self.tasks.read(cx);
        let modal = tasks.modal().clone();
        let saving = tasks.is_saving();
        let heading = i18n_tasks(
            cx,
            match tasks.scope() {
                TaskScope::Mine => "my_tasks",
                TaskScope::Assigned => "assigned_tasks",
            },
        );

        let overlay = match &modal {
            TaskModal::None => None,
            TaskModal::View(row) => Some(self.render_view_modal(row, cx)),
            TaskModal::Delete(row) => Some(self.render_delete_modal(row, saving, cx)),
            TaskModal::Form(_) => self.form.clone().map(|form| form.into_any_element()),
        };

        div()
            .id("tasks-view")
            .key_context(TASKS_CONTEXT)
            .on_action(cx.listener(Self::on_task_action))
            .relative()
            .size_full()
            .child(
                v_flex()
                    .size_full()
                    .p_4()
                    .gap_3()
                    .child(
                        h_flex()
                            .justify_between()
                            .child(
                                v_flex()
                                    .child(
                                        Label::new(i18n_tasks(cx, "page_title"))
                                            .text_2xl()
                                            .font_weight(FontWeight::BOLD),
                                    )
                                    .child(
                                        Label::new(heading)
                                            .text_sm()
                                            .text_color(cx.theme().muted_foreground),
                                    ),
                            )
                            .child(
                                Button::new("tasks-refresh")
                                    .ghost()
                                    .small()
                                    .icon(IconName::Redo)
                                    .tooltip(i18n_tasks(cx, "refresh"))
                                    .on_click(cx.listener(|this, _, _, cx| {
                                        this.tasks.update(cx, |tasks, cx| tasks.load(cx));
                                    })),
                            ),
                    )
                    .when_some(self.toast.as_ref(), |el, toast| el.child(self.render_toast(toast, cx)))
                    .child(div().flex_1().min_h_0().child(self.table.clone())),
            )
            .children(overlay)
    }
}
