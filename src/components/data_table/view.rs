use super::Pagination;
use crate::services::exporter;
use crate::states::{TableState, UIEvent, i18n_table, locale};
use crate::table::export::ReportStyle;
use crate::table::{CellFormat, ColumnDescriptor, PAGE_SIZE_OPTIONS, Row, RowAction, SortDirection};
use gpui::{
    AnyElement, App, Context, Entity, EventEmitter, FontWeight, Hsla, Subscription, Window, div, prelude::*, px,
};
use gpui_component::{
    ActiveTheme, Colorize, Icon, IconName, Sizable,
    button::{Button, ButtonVariants},
    h_flex,
    input::{Input, InputEvent, InputState},
    label::Label,
    v_flex,
};
use rust_i18n::t;
use std::path::PathBuf;

const ACTIONS_WIDTH: f32 = 120.0;
const SEARCH_WIDTH: f32 = 280.0;

/// Colour family of a badge cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tone {
    #[default]
    Neutral,
    Info,
    Success,
    Warning,
    Danger,
}

impl Tone {
    fn color(self, cx: &App) -> Hsla {
        match self {
            Tone::Neutral => cx.theme().muted_foreground,
            Tone::Info => cx.theme().info,
            Tone::Success => cx.theme().success,
            Tone::Warning => cx.theme().warning,
            Tone::Danger => cx.theme().danger,
        }
    }
}

/// Emitted when the user picks another page size
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageSizeChanged(pub usize);

/// Tone for a badge cell from its column key and text
pub type BadgeTone = fn(&str, &str) -> Tone;

pub struct DataTable {
    state: Entity<TableState>,
    search_state: Entity<InputState>,
    badge_tone: BadgeTone,
    _subscriptions: Vec<Subscription>,
}

impl EventEmitter<RowAction> for DataTable {}
impl EventEmitter<UIEvent> for DataTable {}
impl EventEmitter<PageSizeChanged> for DataTable {}

impl DataTable {
    pub fn new(state: Entity<TableState>, window: &mut Window, cx: &mut Context<Self>) -> Self {
        let mut subscriptions = Vec::new();

        subscriptions.push(cx.observe(&state, |_this, _model, cx| {
            cx.notify();
        }));

        let search_state = cx.new(|cx| {
            InputState::new(window, cx)
                .clean_on_escape()
                .placeholder(i18n_table(cx, "search_placeholder"))
        });

        subscriptions.push(cx.subscribe(&search_state, |this, input, event, cx| {
            if matches!(event, InputEvent::Change) {
                let term = input.read(cx).value().to_string();
                this.state.update(cx, |state, cx| state.set_search(term, cx));
            }
        }));

        Self {
            state,
            search_state,
            badge_tone: |_, _| Tone::Neutral,
            _subscriptions: subscriptions,
        }
    }

    pub fn badge_tone(mut self, badge_tone: BadgeTone) -> Self {
        self.badge_tone = badge_tone;
        self
    }

    // ==================== Export ====================

    fn export_csv(&mut self, cx: &mut Context<Self>) {
        let csv = self.state.read(cx).model().export_csv();
        cx.spawn(async move |this, cx| {
            let result = match csv {
                Ok(csv) => {
                    cx.background_executor()
                        .spawn(async move { exporter::save_csv(&csv) })
                        .await
                }
                Err(e) => Err(e),
            };
            let _ = this.update(cx, |_, cx| {
                let event = Self::export_event(result, "csv_saved", cx);
                cx.emit(event);
            });
        })
        .detach();
    }

    fn export_report(&mut self, style: ReportStyle, cx: &mut Context<Self>) {
        let date = chrono::Local::now().format("%d/%m/%Y").to_string();
        let html = self.state.read(cx).model().export_html(style, &date);
        cx.spawn(async move |this, cx| {
            let result = cx
                .background_executor()
                .spawn(async move { exporter::open_report(&html, style) })
                .await;
            let _ = this.update(cx, |_, cx| {
                let event = Self::export_event(result, "report_opened", cx);
                cx.emit(event);
            });
        })
        .detach();
    }

    fn export_event(result: crate::error::Result<PathBuf>, key: &str, cx: &App) -> UIEvent {
        let locale = locale(cx);
        match result {
            Ok(path) => {
                let path = path.display().to_string();
                UIEvent::info(t!(format!("table.{key}"), path = path, locale = &locale).to_string())
            }
            Err(e) => {
                tracing::error!(error = %e, "Export failed");
                UIEvent::error(t!("table.export_failed", error = e, locale = &locale).to_string())
            }
        }
    }

    // ==================== Rendering ====================

    fn render_toolbar(&self, page_size: usize, crud: bool, cx: &mut Context<Self>) -> impl IntoElement {
        let page_sizes = PAGE_SIZE_OPTIONS.iter().map(|&size| {
            let btn = Button::new(("page-size", size))
                .small()
                .label(size.to_string())
                .on_click(cx.listener(move |this, _, _, cx| {
                    this.state.update(cx, |state, cx| state.set_page_size(size, cx));
                    cx.emit(PageSizeChanged(size));
                }));
            if size == page_size { btn.primary() } else { btn.ghost() }
        });

        h_flex()
            .w_full()
            .gap_3()
            .justify_between()
            .child(
                div().w(px(SEARCH_WIDTH)).child(
                    Input::new(&self.search_state)
                        .w_full()
                        .prefix(Icon::new(IconName::Search).text_color(cx.theme().muted_foreground))
                        .cleanable(true),
                ),
            )
            .child(
                h_flex()
                    .gap_2()
                    .child(
                        h_flex()
                            .gap_1()
                            .children(page_sizes)
                            .child(
                                Label::new(i18n_table(cx, "per_page"))
                                    .text_sm()
                                    .text_color(cx.theme().muted_foreground),
                            ),
                    )
                    .child(
                        Button::new("export-csv")
                            .outline()
                            .small()
                            .icon(IconName::ArrowDown)
                            .label("CSV")
                            .tooltip(i18n_table(cx, "export_csv"))
                            .on_click(cx.listener(|this, _, _, cx| this.export_csv(cx))),
                    )
                    .child(
                        Button::new("export-pdf")
                            .outline()
                            .small()
                            .icon(IconName::File)
                            .label("PDF")
                            .tooltip(i18n_table(cx, "export_pdf"))
                            .on_click(cx.listener(|this, _, _, cx| {
                                this.export_report(ReportStyle::Pdf, cx)
                            })),
                    )
                    .child(
                        Button::new("export-print")
                            .outline()
                            .small()
                            .icon(IconName::ExternalLink)
                            .label(i18n_table(cx, "print"))
                            .on_click(cx.listener(|this, _, _, cx| {
                                this.export_report(ReportStyle::Print, cx)
                            })),
                    )
                    .when(crud, |el| {
                        el.child(
                            Button::new("row-add")
                                .primary()
                                .small()
                                .icon(IconName::Plus)
                                .label(i18n_table(cx, "new"))
                                .on_click(cx.listener(|_, _, _, cx| cx.emit(RowAction::Add))),
                        )
                    }),
            )
    }

    fn render_header_cell(
        &self,
        column: &ColumnDescriptor,
        direction: Option<SortDirection>,
        cx: &mut Context<Self>,
    ) -> AnyElement {
        let muted = cx.theme().muted_foreground;
        let active = cx.theme().primary;
        let label = if column.is_actions() {
            i18n_table(cx, "actions")
        } else {
            column.label.clone().into()
        };

        let cell = div()
            .id(gpui::ElementId::Name(format!("col-{}", column.key).into()))
            .px_3()
            .py_2()
            .map(|el| {
                if column.is_actions() {
                    el.w(px(ACTIONS_WIDTH))
                } else {
                    el.flex_1().min_w_0()
                }
            })
            .child(
                h_flex()
                    .gap_1()
                    .child(Label::new(label).text_sm().font_weight(FontWeight::SEMIBOLD))
                    .when(column.sortable, |el| {
                        el.child(
                            v_flex()
                                .child(Icon::new(IconName::ChevronUp).size_3().text_color(
                                    if direction == Some(SortDirection::Asc) { active } else { muted },
                                ))
                                .child(Icon::new(IconName::ChevronDown).size_3().text_color(
                                    if direction == Some(SortDirection::Desc) { active } else { muted },
                                )),
                        )
                    }),
            );

        if !column.sortable {
            return cell.into_any_element();
        }
        let key = column.key.clone();
        cell.cursor_pointer()
            .hover(|el| el.bg(cx.theme().accent.opacity(0.5)))
            .on_click(cx.listener(move |this, _, _, cx| {
                this.state.update(cx, |state, cx| state.toggle_sort(&key, cx));
            }))
            .into_any_element()
    }

    fn render_cell(&self, ix: usize, row: &Row, column: &ColumnDescriptor, cx: &mut Context<Self>) -> AnyElement {
        if column.is_actions() {
            return self.render_actions(ix, row, cx).into_any_element();
        }

        let text = row.display(&column.key).into_owned();
        let content = match column.format {
            CellFormat::Badge if !text.is_empty() => {
                let color = (self.badge_tone)(&column.key, &text).color(cx);
                div()
                    .px_2()
                    .py_px()
                    .rounded_full()
                    .bg(color.opacity(0.15))
                    .child(Label::new(text).text_xs().text_color(color))
                    .into_any_element()
            }
            _ => Label::new(text).text_sm().text_ellipsis().into_any_element(),
        };

        h_flex()
            .flex_1()
            .min_w_0()
            .px_3()
            .py_2()
            .child(content)
            .into_any_element()
    }

    fn render_actions(&self, ix: usize, row: &Row, cx: &mut Context<Self>) -> impl IntoElement {
        let (view_row, edit_row, delete_row) = (row.clone(), row.clone(), row.clone());

        h_flex()
            .w(px(ACTIONS_WIDTH))
            .px_2()
            .gap_1()
            .child(
                Button::new(("row-view", ix))
                    .ghost()
                    .small()
                    .icon(IconName::Eye)
                    .tooltip(i18n_table(cx, "view"))
                    .on_click(cx.listener(move |_, _, _, cx| {
                        cx.emit(RowAction::View(view_row.clone()));
                    })),
            )
            .child(
                Button::new(("row-edit", ix))
                    .ghost()
                    .small()
                    .icon(IconName::Replace)
                    .tooltip(i18n_table(cx, "edit"))
                    .on_click(cx.listener(move |_, _, _, cx| {
                        cx.emit(RowAction::Edit(edit_row.clone()));
                    })),
            )
            .child(
                Button::new(("row-delete", ix))
                    .ghost()
                    .small()
                    .icon(Icon::new(IconName::Delete).text_color(cx.theme().danger))
                    .tooltip(i18n_table(cx, "delete"))
                    .on_click(cx.listener(move |_, _, _, cx| {
                        cx.emit(RowAction::Delete(delete_row.clone()));
                    })),
            )
    }

    fn render_status(&self, message: impl IntoElement, cx: &mut Context<Self>) -> AnyElement {
        div()
            .size_full()
            .p_6()
            .flex()
            .items_center()
            .justify_center()
            .border_1()
            .border_color(cx.theme().border)
            .rounded_lg()
            .child(message)
            .into_any_element()
    }
}

impl Render for DataTable {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let state = self.state.read(cx);

        if state.status().is_loading() {
            let label = h_flex()
                .gap_2()
                .child(Icon::new(IconName::Loader).size_5())
                .child(Label::new(i18n_table(cx, "loading")).text_color(cx.theme().muted_foreground));
            return self.render_status(label, cx);
        }
        if let Some(message) = state.status().error() {
            let text = t!("table.error", message = message, locale = &locale(cx)).to_string();
            let label = h_flex()
                .gap_2()
                .child(Icon::new(IconName::CircleX).size_5().text_color(cx.theme().danger))
                .child(Label::new(text).text_color(cx.theme().danger));
            return self.render_status(label, cx);
        }

        // Collect what the render needs before borrowing cx mutably
        let model = state.model();
        let columns = model.columns();
        let sort = model.sort().clone();
        let page_size = model.page_size();
        let crud = model.is_crud();
        let view = model.page_view();
        let rows: Vec<Row> = view.rows.iter().map(|row| (*row).clone()).collect();
        let (page, total_pages, window) = (view.page, view.total_pages, view.window.clone());
        let show_pagination = view.show_pagination();
        let summary = t!(
            "table.summary",
            start = view.summary.start,
            end = view.summary.end,
            total = view.summary.total,
            locale = &locale(cx)
        )
        .to_string();

        let header: Vec<AnyElement> = columns
            .iter()
            .map(|column| self.render_header_cell(column, sort.direction_for(&column.key), cx))
            .collect();

        let is_dark = cx.theme().is_dark();
        let background = cx.theme().background;
        let hover = cx.theme().accent.opacity(0.3);
        let mut body: Vec<AnyElement> = Vec::with_capacity(rows.len());
        for (ix, row) in rows.iter().enumerate() {
            let cells: Vec<AnyElement> = columns
                .iter()
                .map(|column| self.render_cell(ix, row, column, cx))
                .collect();
            let bg = if ix % 2 == 0 {
                background
            } else if is_dark {
                background.lighten(0.3)
            } else {
                background.darken(0.02)
            };
            body.push(
                h_flex()
                    .id(("row", ix))
                    .w_full()
                    .bg(bg)
                    .hover(|el| el.bg(hover))
                    .border_b_1()
                    .border_color(cx.theme().border)
                    .children(cells)
                    .into_any_element(),
            );
        }
        if body.is_empty() {
            body.push(
                div()
                    .w_full()
                    .p_4()
                    .flex()
                    .justify_center()
                    .child(Label::new(i18n_table(cx, "empty")).text_color(cx.theme().muted_foreground))
                    .into_any_element(),
            );
        }

        v_flex()
            .size_full()
            .gap_3()
            .child(self.render_toolbar(page_size, crud, cx))
            .child(
                v_flex()
                    .flex_1()
                    .min_h_0()
                    .border_1()
                    .border_color(cx.theme().border)
                    .rounded_lg()
                    .overflow_hidden()
                    .child(
                        h_flex()
                            .w_full()
                            .bg(cx.theme().secondary)
                            .border_b_1()
                            .border_color(cx.theme().border)
                            .children(header),
                    )
                    .child(
                        div()
                            .id("table-body")
                            .flex_1()
                            .overflow_y_scroll()
                            .children(body),
                    )
                    .when(show_pagination, |el| {
                        let state = self.state.clone();
                        el.child(
                            Pagination::new(page, total_pages, window)
                                .summary(summary)
                                .on_change(move |page, _, cx| {
                                    state.update(cx, |state, cx| state.set_page(page, cx));
                                }),
                        )
                    }),
            )
            .into_any_element()
    }
}
