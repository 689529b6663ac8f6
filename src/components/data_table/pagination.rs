//! Pagination Component
//!
//! Record summary plus previous / numbered / next page buttons.

use gpui::{App, SharedString, Window, prelude::*};
use gpui_component::{
    ActiveTheme, Disableable, IconName, Sizable,
    button::{Button, ButtonVariants},
    h_flex,
    label::Label,
};
use std::ops::RangeInclusive;
use std::rc::Rc;

type PageHandler = Rc<dyn Fn(usize, &mut Window, &mut App) + 'static>;

#[derive(IntoElement)]
pub struct Pagination {
    page: usize,
    total_pages: usize,
    window: RangeInclusive<usize>,
    summary: SharedString,
    on_change: Option<PageHandler>,
}

impl Pagination {
    pub fn new(page: usize, total_pages: usize, window: RangeInclusive<usize>) -> Self {
        Self {
            page,
            total_pages,
            window,
            summary: SharedString::default(),
            on_change: None,
        }
    }

    pub fn summary(mut self, summary: impl Into<SharedString>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn on_change(mut self, handler: impl Fn(usize, &mut Window, &mut App) + 'static) -> Self {
        self.on_change = Some(Rc::new(handler));
        self
    }

    fn page_button(
        &self,
        id: impl Into<gpui::ElementId>,
        target: usize,
        enabled: bool,
    ) -> Button {
        let handler = self.on_change.clone();
        Button::new(id)
            .small()
            .disabled(!enabled)
            .when_some(handler.filter(|_| enabled), |btn, handler| {
                btn.on_click(move |_, window, cx| handler(target, window, cx))
            })
    }
}

impl RenderOnce for Pagination {
    fn render(self, _window: &mut Window, cx: &mut App) -> impl IntoElement {
        let page = self.page;
        let can_prev = page > 1;
        let can_next = page < self.total_pages;

        let prev = self
            .page_button("page-prev", page.saturating_sub(1), can_prev)
            .ghost()
            .icon(IconName::ChevronLeft);
        let next = self
            .page_button("page-next", page + 1, can_next)
            .ghost()
            .icon(IconName::ChevronRight);

        let numbers: Vec<Button> = self
            .window
            .clone()
            .map(|n| {
                let btn = self.page_button(("page", n), n, true).label(n.to_string());
                if n == page { btn.primary() } else { btn.ghost() }
            })
            .collect();

        h_flex()
            .w_full()
            .px_3()
            .py_2()
            .justify_between()
            .border_t_1()
            .border_color(cx.theme().border)
            .child(
                Label::new(self.summary)
                    .text_sm()
                    .text_color(cx.theme().muted_foreground),
            )
            .child(
                h_flex()
                    .gap_1()
                    .child(prev)
                    .children(numbers)
                    .child(next),
            )
    }
}
