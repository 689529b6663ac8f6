//! Modal Component
//!
//! Centered dialog over a dimmed backdrop. Clicking the backdrop or the
//! close button calls `on_close`.

use gpui::{
    AnyElement, App, ClickEvent, ElementId, FontWeight, SharedString, Window, div, prelude::*, px,
};
use gpui_component::{
    ActiveTheme, IconName, Sizable,
    button::{Button, ButtonVariants},
    h_flex,
    label::Label,
    v_flex,
};
use std::rc::Rc;

type CloseHandler = Rc<dyn Fn(&mut Window, &mut App) + 'static>;

#[derive(IntoElement)]
pub struct Modal {
    id: ElementId,
    title: SharedString,
    width: f32,
    children: Vec<AnyElement>,
    footer: Vec<AnyElement>,
    on_close: Option<CloseHandler>,
}

impl Modal {
    pub fn new(title: impl Into<SharedString>) -> Self {
        Self {
            id: "modal".into(),
            title: title.into(),
            width: crate::constants::MODAL_WIDTH,
            children: Vec::new(),
            footer: Vec::new(),
            on_close: None,
        }
    }

    /// Needed when two modals are stacked
    pub fn id(mut self, id: impl Into<ElementId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    pub fn child(mut self, child: impl IntoElement) -> Self {
        self.children.push(child.into_any_element());
        self
    }

    /// Button row at the bottom right
    pub fn footer(mut self, child: impl IntoElement) -> Self {
        self.footer.push(child.into_any_element());
        self
    }

    pub fn on_close(mut self, handler: impl Fn(&mut Window, &mut App) + 'static) -> Self {
        self.on_close = Some(Rc::new(handler));
        self
    }
}

impl RenderOnce for Modal {
    fn render(self, _window: &mut Window, cx: &mut App) -> impl IntoElement {
        let backdrop_close = self.on_close.clone();
        let button_close = self.on_close;

        div()
            .id(self.id)
            .absolute()
            .inset_0()
            .occlude()
            .bg(gpui::rgba(0x00000080))
            .flex()
            .items_center()
            .justify_center()
            .when_some(backdrop_close, |el, handler| {
                el.on_click(move |_: &ClickEvent, window, cx| handler(window, cx))
            })
            .child(
                v_flex()
                    .id("modal-content")
                    .w(px(self.width))
                    .max_h(px(640.0))
                    .bg(cx.theme().background)
                    .border_1()
                    .border_color(cx.theme().border)
                    .rounded_lg()
                    .shadow_lg()
                    .on_click(|_, _, cx| cx.stop_propagation())
                    // Header
                    .child(
                        h_flex()
                            .px_5()
                            .py_3()
                            .justify_between()
                            .border_b_1()
                            .border_color(cx.theme().border)
                            .child(
                                Label::new(self.title)
                                    .text_lg()
                                    .font_weight(FontWeight::SEMIBOLD),
                            )
                            .when_some(button_close, |el, handler| {
                                el.child(
                                    Button::new("modal-close")
                                        .ghost()
                                        .small()
                                        .icon(IconName::Close)
                                        .on_click(move |_, window, cx| handler(window, cx)),
                                )
                            }),
                    )
                    // Content
                    .child(
                        v_flex()
                            .id("modal-body")
                            .flex_1()
                            .overflow_y_scroll()
                            .px_5()
                            .py_4()
                            .gap_3()
                            .children(self.children),
                    )
                    .when(!self.footer.is_empty(), |el| {
                        el.child(
                            h_flex()
                                .px_5()
                                .py_3()
                                .gap_2()
                                .justify_end()
                                .border_t_1()
                                .border_color(cx.theme().border)
                                .children(self.footer),
                        )
                    }),
            )
    }
}
