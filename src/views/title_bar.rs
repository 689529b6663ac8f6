//! Title Bar Component
//!
//! Brand, page links, notifications, the signed-in user and the settings
//! menu.

use crate::helpers::NavAction;
use crate::states::{DeskGlobalStore, LocaleAction, Route, ThemeAction, i18n_menu, locale};
use gpui::{App, Context, Corner, Subscription, Window, prelude::*};
use gpui_component::{
    ActiveTheme, IconName, Sizable, ThemeMode, TitleBar,
    button::{Button, ButtonVariants},
    h_flex,
    label::Label,
    menu::{DropdownMenu, PopupMenu},
};
use rust_i18n::t;

/// Notifications listed in the dropdown
const MENU_NOTIFICATIONS: usize = 20;

pub struct DeskTitleBar {
    _subscriptions: Vec<Subscription>,
}

impl DeskTitleBar {
    pub fn new(_window: &mut Window, cx: &mut Context<Self>) -> Self {
        let store = cx.global::<DeskGlobalStore>().clone();
        let mut subscriptions = Vec::new();
        subscriptions.push(cx.observe(&store.notifications(), |_, _, cx| cx.notify()));
        subscriptions.push(cx.observe(&store.session(), |_, _, cx| cx.notify()));
        subscriptions.push(cx.observe(&store.app_state(), |_, _, cx| cx.notify()));
        Self {
            _subscriptions: subscriptions,
        }
    }

    fn render_settings_menu(menu: PopupMenu, _window: &mut Window, cx: &App) -> PopupMenu {
        let store = cx.global::<DeskGlobalStore>().read(cx);
        let (locale, theme) = (store.locale(), store.theme());

        menu.label(i18n_menu(cx, "language"))
            .menu_with_check("Español", locale == "es", Box::new(LocaleAction::Es))
            .menu_with_check("English", locale == "en", Box::new(LocaleAction::En))
            .separator()
            .label(i18n_menu(cx, "theme"))
            .menu_with_check(
                i18n_menu(cx, "light"),
                theme == Some(ThemeMode::Light),
                Box::new(ThemeAction::Light),
            )
            .menu_with_check(
                i18n_menu(cx, "dark"),
                theme == Some(ThemeMode::Dark),
                Box::new(ThemeAction::Dark),
            )
            .menu_with_check(
                i18n_menu(cx, "system"),
                theme.is_none(),
                Box::new(ThemeAction::System),
            )
    }

    fn render_notifications_menu(menu: PopupMenu, _window: &mut Window, cx: &App) -> PopupMenu {
        let notifications = cx.global::<DeskGlobalStore>().notifications();
        let messages: Vec<String> = notifications
            .read(cx)
            .iter()
            .take(MENU_NOTIFICATIONS)
            .map(|n| format!("{}  {}", n.received_at.format("%H:%M"), n.message))
            .collect();

        if messages.is_empty() {
            return menu.label(i18n_menu(cx, "no_notifications"));
        }
        messages
            .into_iter()
            .fold(menu, |menu, message| menu.label(message))
    }

    fn render_nav_link(
        id: &'static str,
        label: impl Into<gpui::SharedString>,
        action: NavAction,
        active: bool,
    ) -> Button {
        let btn = Button::new(id)
            .small()
            .label(label)
            .on_click(move |_, window, cx| window.dispatch_action(Box::new(action), cx));
        if active { btn.primary() } else { btn.ghost() }
    }
}

impl Render for DeskTitleBar {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let store = cx.global::<DeskGlobalStore>().clone();
        let route = store.read(cx).route();
        let user_name = store
            .session()
            .read(cx)
            .user()
            .map(|u| u.display_name().to_string());
        let (count, connected) = {
            let state = store.notifications().read(cx);
            (state.count(), state.is_connected())
        };

        let right_actions = h_flex().items_center().justify_end().px_2().gap_2().mr_2();

        let right_actions = match user_name {
            Some(name) => {
                let bell_label =
                    t!("menu.notifications", count = count, locale = &locale(cx)).to_string();
                right_actions
                    .child(Self::render_nav_link(
                        "nav-my-tasks",
                        i18n_menu(cx, "my_tasks"),
                        NavAction::MyTasks,
                        route == Route::MyTasks,
                    ))
                    .child(Self::render_nav_link(
                        "nav-assigned",
                        i18n_menu(cx, "assigned_tasks"),
                        NavAction::AssignedTasks,
                        route == Route::AssignedTasks,
                    ))
                    .child(
                        Button::new("notifications")
                            .ghost()
                            .small()
                            .icon(IconName::Bell)
                            .label(bell_label)
                            .tooltip(if connected {
                                i18n_menu(cx, "live")
                            } else {
                                i18n_menu(cx, "offline")
                            })
                            .dropdown_menu(move |menu, window, cx| {
                                Self::render_notifications_menu(menu, window, cx)
                            })
                            .anchor(Corner::TopRight),
                    )
                    .child(
                        Button::new("user")
                            .ghost()
                            .small()
                            .icon(IconName::CircleUser)
                            .label(name)
                            .dropdown_menu(|menu, _, cx| {
                                menu.menu(i18n_menu(cx, "logout"), Box::new(NavAction::Logout))
                            })
                            .anchor(Corner::TopRight),
                    )
            }
            None => right_actions,
        };

        TitleBar::new()
            .child(
                h_flex()
                    .flex_1()
                    .items_center()
                    .pl_4()
                    .gap_2()
                    .child(Label::new(i18n_menu(cx, "brand")).text_sm())
                    .when(!connected && route.is_protected(), |el| {
                        el.child(
                            Label::new(i18n_menu(cx, "offline"))
                                .text_xs()
                                .text_color(cx.theme().muted_foreground),
                        )
                    }),
            )
            .child(
                right_actions.child(
                    Button::new("settings")
                        .tooltip(i18n_menu(cx, "settings"))
                        .icon(IconName::Settings2)
                        .small()
                        .ghost()
                        .dropdown_menu(move |menu, window, cx| {
                            Self::render_settings_menu(menu, window, cx)
                        })
                        .anchor(Corner::TopRight),
                ),
            )
    }
}
