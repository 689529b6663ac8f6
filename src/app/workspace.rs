//! Workspace - Main Shell
//!
//! Title bar on top, routed content below. Also persists the window bounds
//! once a resize settles.

use gpui::{Context, Entity, Subscription, Task, Window, div, prelude::*};
use gpui_component::{ActiveTheme, v_flex};
use std::time::Duration;

use crate::states::update_app_state_and_save;
use crate::views::{DeskContent, DeskTitleBar};

/// Quiet period before new window bounds are saved
const BOUNDS_SAVE_DELAY: Duration = Duration::from_millis(500);

pub struct Workspace {
    title_bar: Entity<DeskTitleBar>,
    content: Entity<DeskContent>,
    _save_bounds: Option<Task<()>>,
    _subscriptions: Vec<Subscription>,
}

impl Workspace {
    pub fn new(window: &mut Window, cx: &mut Context<Self>) -> Self {
        let title_bar = cx.new(|cx| DeskTitleBar::new(window, cx));
        let content = cx.new(|cx| DeskContent::new(window, cx));

        let subscriptions = vec![cx.observe_window_bounds(window, |this, window, cx| {
            let bounds = window.bounds();
            this._save_bounds = Some(cx.spawn(async move |_, cx| {
                cx.background_executor().timer(BOUNDS_SAVE_DELAY).await;
                let _ = cx.update(|cx| {
                    update_app_state_and_save(cx, "set_bounds", move |state, _| {
                        state.set_bounds(bounds);
                    });
                });
            }));
        })];

        Self {
            title_bar,
            content,
            _save_bounds: None,
            _subscriptions: subscriptions,
        }
    }
}

impl Render for Workspace {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        v_flex()
            .size_full()
            .bg(cx.theme().background)
            .text_color(cx.theme().foreground)
            .child(self.title_bar.clone())
            .child(div().flex_1().min_h_0().child(self.content.clone()))
    }
}
