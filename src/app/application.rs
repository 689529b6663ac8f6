//! Application - App Initialization and Window Management
//!
//! Main entry point for the GPUI application.

use gpui::{
    App, AppContext, Application, Bounds, SharedString, TitlebarOptions, WindowBounds, WindowOptions, point, px,
    size,
};
use gpui_component::{Root, Theme, ThemeMode};
use tracing::{error, info, warn};

use crate::app::workspace::Workspace;
use crate::constants::{DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH, MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH};
use crate::helpers::{MenuAction, NavAction, new_key_bindings};
use crate::services::{ServiceConfig, ServiceHub, SessionStore};
use crate::states::{
    AppSettings, DeskGlobalStore, LocaleAction, NotificationsState, Route, SessionState, TasksState,
    ThemeAction, navigate, resume_session, sign_out, update_app_state_and_save,
};

/// Run the TaskDesk application
pub fn run_app() {
    Application::new()
        .with_assets(gpui_component_assets::Assets)
        .run(|cx: &mut App| {
            gpui_component::init(cx);
            cx.bind_keys(new_key_bindings());
            register_actions(cx);

            // Quit the app when all windows are closed
            cx.on_window_closed(|cx| {
                if cx.windows().is_empty() {
                    cx.quit();
                }
            })
            .detach();

            let Some(store) = init_store(cx) else {
                cx.quit();
                return;
            };
            apply_theme(store.read(cx).theme(), cx);
            cx.set_global(store.clone());

            let rx = store.services().events();
            store
                .notifications()
                .update(cx, |state, cx| state.start_ingest(rx, cx));

            open_main_window(cx);
            resume_session(cx);
            cx.activate(true);
        });
}

/// Build the state entities and the service hub
fn init_store(cx: &mut App) -> Option<DeskGlobalStore> {
    let settings = AppSettings::try_load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load settings, using defaults");
        AppSettings::new()
    });

    let mut session = match SessionStore::open_default() {
        Ok(session) => session,
        Err(e) => {
            error!(error = %e, "Failed to open session store");
            return None;
        }
    };
    if let Err(e) = session.hydrate() {
        warn!(error = %e, path = ?session.path(), "Failed to restore session");
    }

    let services = ServiceHub::new(settings.service_config())
        .or_else(|e| {
            warn!(error = %e, "Invalid service endpoints, falling back to defaults");
            ServiceHub::new(ServiceConfig::default())
        })
        .inspect_err(|e| error!(error = %e, "Failed to start services"))
        .ok()?;

    let page_size = settings.page_size();
    let app_state = cx.new(|_| settings);
    let session = cx.new(|_| SessionState::new(session));
    let tasks = cx.new(|cx| TasksState::new(page_size, cx));
    let notifications = cx.new(|_| NotificationsState::new());

    Some(DeskGlobalStore::new(
        app_state,
        session,
        tasks,
        notifications,
        services,
    ))
}

fn register_actions(cx: &mut App) {
    cx.on_action(|action: &MenuAction, cx: &mut App| match action {
        MenuAction::Quit => cx.quit(),
    });

    cx.on_action(|action: &NavAction, cx: &mut App| match action {
        NavAction::MyTasks => navigate(cx, Route::MyTasks),
        NavAction::AssignedTasks => navigate(cx, Route::AssignedTasks),
        NavAction::Logout => sign_out(cx),
    });

    cx.on_action(|action: &ThemeAction, cx: &mut App| {
        let mode = match action {
            ThemeAction::Light => Some(ThemeMode::Light),
            ThemeAction::Dark => Some(ThemeMode::Dark),
            ThemeAction::System => None,
        };
        apply_theme(mode, cx);
        update_app_state_and_save(cx, "set_theme", move |state, _| {
            state.set_theme(mode);
        });
    });

    cx.on_action(|action: &LocaleAction, cx: &mut App| {
        let locale = match action {
            LocaleAction::Es => "es",
            LocaleAction::En => "en",
        };
        info!(locale, "Switching locale");
        update_app_state_and_save(cx, "set_locale", move |state, _| {
            state.set_locale(locale.to_string());
        });
    });
}

/// A fixed mode, or follow the system appearance when `None`
fn apply_theme(mode: Option<ThemeMode>, cx: &mut App) {
    match mode {
        Some(mode) => Theme::change(mode, None, cx),
        None => Theme::sync_system_appearance(None, cx),
    }
}

fn open_main_window(cx: &mut App) {
    let store = cx.global::<DeskGlobalStore>().clone();
    let bounds = store.read(cx).bounds().cloned().unwrap_or_else(|| {
        Bounds::centered(
            None,
            size(px(DEFAULT_WINDOW_WIDTH), px(DEFAULT_WINDOW_HEIGHT)),
            cx,
        )
    });

    let window_options = WindowOptions {
        window_bounds: Some(WindowBounds::Windowed(bounds)),
        window_min_size: Some(size(px(MIN_WINDOW_WIDTH), px(MIN_WINDOW_HEIGHT))),
        titlebar: Some(TitlebarOptions {
            title: Some(SharedString::from("TaskDesk")),
            appears_transparent: true,
            traffic_light_position: Some(point(px(9.0), px(9.0))),
        }),
        ..Default::default()
    };

    let opened = cx.open_window(window_options, |window, cx| {
        let workspace = cx.new(|cx| Workspace::new(window, cx));
        cx.new(|cx| Root::new(workspace, window, cx))
    });
    if let Err(e) = opened {
        error!(error = %e, "Failed to open main window");
        cx.quit();
    }
}
