//! Task Form
//!
//! Add / edit dialog for a task, with the responsable picker stacked on top
//! of it.

use crate::components::Modal;
use crate::domain::{AssignedUser, Priority, TaskDraft, TaskField, TaskStatus, User};
use crate::states::{TasksState, UsersStatus, i18n_tasks};
use gpui::{AnyElement, App, Context, Entity, SharedString, Subscription, Window, div, prelude::*};
use gpui_component::{
    ActiveTheme, Disableable, Icon, IconName, Sizable,
    button::{Button, ButtonVariants},
    h_flex,
    input::{Input, InputEvent, InputState},
    label::Label,
    v_flex,
};

const PICKER_WIDTH: f32 = 400.0;

pub struct TaskFormView {
    tasks: Entity<TasksState>,
    draft: TaskDraft,
    nombre_state: Entity<InputState>,
    fecha_state: Entity<InputState>,
    descripcion_state: Entity<InputState>,
    invalid: Vec<TaskField>,
    picker_open: bool,
    /// User highlighted in the picker, not yet confirmed
    picked: Option<i64>,
    _subscriptions: Vec<Subscription>,
}

impl TaskFormView {
    pub fn new(tasks: Entity<TasksState>, draft: TaskDraft, window: &mut Window, cx: &mut Context<Self>) -> Self {
        let nombre_state = cx.new(|cx| InputState::new(window, cx).default_value(draft.nombre.clone()));
        let fecha_state = cx.new(|cx| {
            InputState::new(window, cx)
                .placeholder(i18n_tasks(cx, "due_placeholder"))
                .default_value(draft.fecha_limite.clone())
        });
        let descripcion_state = cx.new(|cx| {
            InputState::new(window, cx)
                .multi_line(true)
                .default_value(draft.descripcion.clone())
        });

        let mut subscriptions = vec![cx.observe(&tasks, |_, _, cx| cx.notify())];
        for (field, state) in [
            (TaskField::Nombre, &nombre_state),
            (TaskField::FechaLimite, &fecha_state),
            (TaskField::Descripcion, &descripcion_state),
        ] {
            subscriptions.push(cx.subscribe(state, move |this, _, event: &InputEvent, cx| {
                if matches!(event, InputEvent::Change) && this.invalid.contains(&field) {
                    this.invalid.retain(|f| *f != field);
                    cx.notify();
                }
            }));
        }

        Self {
            tasks,
            draft,
            nombre_state,
            fecha_state,
            descripcion_state,
            invalid: Vec::new(),
            picker_open: false,
            picked: None,
            _subscriptions: subscriptions,
        }
    }

    /// Draft with the text inputs folded in
    fn current_draft(&self, cx: &App) -> TaskDraft {
        TaskDraft {
            nombre: self.nombre_state.read(cx).value().to_string(),
            fecha_limite: self.fecha_state.read(cx).value().to_string(),
            descripcion: self.descripcion_state.read(cx).value().to_string(),
            ..self.draft.clone()
        }
    }

    fn submit(&mut self, cx: &mut Context<Self>) {
        let draft = self.current_draft(cx);
        self.invalid = draft.validate();
        if !self.invalid.is_empty() {
            cx.notify();
            return;
        }
        self.tasks.update(cx, |tasks, cx| tasks.save_draft(draft, cx));
    }

    fn cancel(&mut self, cx: &mut Context<Self>) {
        self.tasks.update(cx, |tasks, cx| tasks.close_modal(cx));
    }

    // ==================== Picker ====================

    fn open_picker(&mut self, cx: &mut Context<Self>) {
        self.picker_open = true;
        self.picked = self.draft.responsable.as_ref().map(|u| u.id);
        if !matches!(self.tasks.read(cx).users(), UsersStatus::Loaded(_)) {
            self.tasks.update(cx, |tasks, cx| tasks.load_users(cx));
        }
        cx.notify();
    }

    fn close_picker(&mut self, cx: &mut Context<Self>) {
        self.picker_open = false;
        self.picked = None;
        cx.notify();
    }

    fn confirm_picker(&mut self, cx: &mut Context<Self>) {
        let UsersStatus::Loaded(users) = self.tasks.read(cx).users() else {
            return;
        };
        let Some(user) = self.picked.and_then(|id| users.iter().find(|u| u.id == id)) else {
            return;
        };
        self.draft.responsable = Some(AssignedUser {
            id: user.id,
            name: user.display_name().to_string(),
        });
        self.invalid.retain(|f| *f != TaskField::Responsable);
        self.close_picker(cx);
    }

    // ==================== Rendering ====================

    fn error_label(&self, field: TaskField, key: &str, cx: &App) -> Option<AnyElement> {
        self.invalid.contains(&field).then(|| {
            Label::new(i18n_tasks(cx, key))
                .text_xs()
                .text_color(cx.theme().danger)
                .into_any_element()
        })
    }

    fn render_field(
        &self,
        label: SharedString,
        control: impl IntoElement,
        error: Option<AnyElement>,
    ) -> impl IntoElement {
        v_flex()
            .gap_1()
            .child(Label::new(label).text_sm())
            .child(control)
            .children(error)
    }

    fn render_priority(&self, cx: &mut Context<Self>) -> impl IntoElement {
        let current = self.draft.prioridad;
        h_flex().gap_1().children(Priority::ALL.into_iter().enumerate().map(|(ix, priority)| {
            let btn = Button::new(("priority", ix))
                .small()
                .label(priority.label())
                .on_click(cx.listener(move |this, _, _, cx| {
                    this.draft.prioridad = priority;
                    cx.notify();
                }));
            if priority == current { btn.primary() } else { btn.outline() }
        }))
    }

    fn render_status(&self, cx: &mut Context<Self>) -> impl IntoElement {
        let current = self.draft.estado;
        h_flex().gap_1().children(TaskStatus::ALL.into_iter().enumerate().map(|(ix, status)| {
            let btn = Button::new(("status", ix))
                .small()
                .label(status.label())
                .on_click(cx.listener(move |this, _, _, cx| {
                    this.draft.estado = status;
                    cx.notify();
                }));
            if status == current { btn.primary() } else { btn.outline() }
        }))
    }

    fn render_responsable(&self, cx: &mut Context<Self>) -> impl IntoElement + use<> {
        let invalid = self.invalid.contains(&TaskField::Responsable);
        let (text, color) = match &self.draft.responsable {
            Some(user) => (SharedString::from(user.name.clone()), cx.theme().foreground),
            None => (i18n_tasks(cx, "responsable_placeholder"), cx.theme().muted_foreground),
        };

        h_flex()
            .id("responsable-field")
            .w_full()
            .px_3()
            .py_1p5()
            .gap_2()
            .justify_between()
            .rounded_md()
            .border_1()
            .border_color(if invalid { cx.theme().danger } else { cx.theme().border })
            .bg(cx.theme().secondary)
            .cursor_pointer()
            .child(Label::new(text).text_sm().text_color(color))
            .child(Icon::new(IconName::ChevronDown).size_3().text_color(cx.theme().muted_foreground))
            .on_click(cx.listener(|this, _, _, cx| this.open_picker(cx)))
    }

    fn render_user_list(&self, users: &[User], cx: &mut Context<Self>) -> AnyElement {
        if users.is_empty() {
            return Label::new(i18n_tasks(cx, "users_empty"))
                .text_sm()
                .text_color(cx.theme().muted_foreground)
                .into_any_element();
        }
        let selected_bg = cx.theme().accent;
        let hover_bg = cx.theme().accent.opacity(0.5);
        v_flex()
            .gap_1()
            .children(users.iter().map(|user| {
                let id = user.id;
                let selected = self.picked == Some(id);
                h_flex()
                    .id(("user", id as usize))
                    .px_3()
                    .py_1()
                    .gap_2()
                    .rounded_md()
                    .cursor_pointer()
                    .when(selected, |el| el.bg(selected_bg))
                    .hover(|el| el.bg(hover_bg))
                    .child(Icon::new(IconName::CircleUser).size_4())
                    .child(Label::new(user.display_name().to_string()).text_sm())
                    .on_click(cx.listener(move |this, _, _, cx| {
                        this.picked = Some(id);
                        cx.notify();
                    }))
            }))
            .into_any_element()
    }

    fn render_picker(&self, cx: &mut Context<Self>) -> impl IntoElement {
        let users = self.tasks.read(cx).users().clone();
        let body = match &users {
            UsersStatus::Idle | UsersStatus::Loading => h_flex()
                .gap_2()
                .child(Icon::new(IconName::Loader).size_4())
                .child(Label::new(i18n_tasks(cx, "users_loading")).text_sm())
                .into_any_element(),
            UsersStatus::Error(message) => Label::new(message.clone())
                .text_sm()
                .text_color(cx.theme().danger)
                .into_any_element(),
            UsersStatus::Loaded(users) => self.render_user_list(users, cx),
        };

        Modal::new(i18n_tasks(cx, "picker_title"))
            .id("responsable-picker")
            .width(PICKER_WIDTH)
            .on_close({
                let view = cx.entity();
                move |_, cx| view.update(cx, |this, cx| this.close_picker(cx))
            })
            .child(body)
            .footer(
                Button::new("picker-cancel")
                    .ghost()
                    .label(i18n_tasks(cx, "cancel"))
                    .on_click(cx.listener(|this, _, _, cx| this.close_picker(cx))),
            )
            .footer(
                Button::new("picker-select")
                    .primary()
                    .label(i18n_tasks(cx, "select"))
                    .disabled(self.picked.is_none())
                    .on_click(cx.listener(|this, _, _, cx| this.confirm_picker(cx))),
            )
    }
}

impl Render for TaskFormView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let saving = self.tasks.read(cx).is_saving();
        let is_new = self.draft.is_new();
        let title = i18n_tasks(cx, if is_new { "add_title" } else { "edit_title" });
        let submit_label = match (saving, is_new) {
            (true, _) => i18n_tasks(cx, "saving"),
            (false, true) => i18n_tasks(cx, "create"),
            (false, false) => i18n_tasks(cx, "save"),
        };

        let form = Modal::new(title)
            .id("task-form")
            .on_close({
                let view = cx.entity();
                move |_, cx| view.update(cx, |this, cx| this.cancel(cx))
            })
            .child(self.render_field(
                i18n_tasks(cx, "name_label"),
                Input::new(&self.nombre_state).w_full(),
                self.error_label(TaskField::Nombre, "name_required", cx),
            ))
            .child(self.render_field(i18n_tasks(cx, "priority_label"), self.render_priority(cx), None))
            .child(self.render_field(i18n_tasks(cx, "status_label"), self.render_status(cx), None))
            .child(self.render_field(
                i18n_tasks(cx, "responsable_label"),
                self.render_responsable(cx),
                self.error_label(TaskField::Responsable, "responsable_required", cx),
            ))
            .child(self.render_field(
                i18n_tasks(cx, "due_label"),
                Input::new(&self.fecha_state).w_full(),
                self.error_label(TaskField::FechaLimite, "due_invalid", cx),
            ))
            .child(self.render_field(
                i18n_tasks(cx, "description_label"),
                div().h_24().child(Input::new(&self.descripcion_state).h_full()),
                self.error_label(TaskField::Descripcion, "description_required", cx),
            ))
            .footer(
                Button::new("form-cancel")
                    .ghost()
                    .label(i18n_tasks(cx, "cancel"))
                    .on_click(cx.listener(|this, _, _, cx| this.cancel(cx))),
            )
            .footer(
                Button::new("form-submit")
                    .primary()
                    .label(submit_label)
                    .loading(saving)
                    .disabled(saving)
                    .on_click(cx.listener(|this, _, _, cx| this.submit(cx))),
            );

        div()
            .absolute()
            .inset_0()
            .child(form)
            .when(self.picker_open, |el| el.child(self.render_picker(cx)))
    }
}
