//! Main Content Area
//!
//! Routes to the auth pages or the task page based on the current route.
//! Entering a task route (re)loads that list.

use super::{LoginView, RegisterView, TasksView};
use crate::states::{DeskGlobalStore, Route};
use gpui::{AnyView, Context, Entity, Subscription, Window, div, prelude::*};
use tracing::debug;

pub struct DeskContent {
    current_route: Route,
    /// Rebuilt on every visit so the forms start clean
    page: AnyView,
    /// Kept across routes so the table keeps its search and sort
    tasks_view: Option<Entity<TasksView>>,
    _subscriptions: Vec<Subscription>,
}

impl DeskContent {
    pub fn new(window: &mut Window, cx: &mut Context<Self>) -> Self {
        let store = cx.global::<DeskGlobalStore>().clone();
        let current_route = store.read(cx).route();

        let mut subscriptions = Vec::new();
        subscriptions.push(cx.observe_in(&store.app_state(), window, |this, model, window, cx| {
            let route = model.read(cx).route();
            if this.current_route != route {
                this.enter(route, window, cx);
                cx.notify();
            }
        }));

        let mut this = Self {
            current_route,
            page: cx.new(|cx| LoginView::new(window, cx)).into(),
            tasks_view: None,
            _subscriptions: subscriptions,
        };
        if current_route != Route::Login {
            this.enter(current_route, window, cx);
        }
        this
    }

    fn enter(&mut self, route: Route, window: &mut Window, cx: &mut Context<Self>) {
        debug!(?route, "Entering route");
        self.current_route = route;
        self.page = match route {
            Route::Login => cx.new(|cx| LoginView::new(window, cx)).into(),
            Route::Register => cx.new(|cx| RegisterView::new(window, cx)).into(),
            Route::MyTasks | Route::AssignedTasks => {
                let view = self
                    .tasks_view
                    .get_or_insert_with(|| cx.new(|cx| TasksView::new(window, cx)))
                    .clone();
                view.into()
            }
        };

        // Leaving the task pages drops the table view; the state entity keeps
        // the rows until sign-out resets it
        if !route.is_protected() {
            self.tasks_view = None;
        }
        if let Some(scope) = route.task_scope() {
            let tasks = cx.global::<DeskGlobalStore>().tasks();
            tasks.update(cx, |tasks, cx| tasks.show(scope, cx));
        }
    }
}

impl Render for DeskContent {
    fn render(&mut self, _window: &mut Window, _cx: &mut Context<Self>) -> impl IntoElement {
        div().size_full().child(self.page.clone())
    }
}
