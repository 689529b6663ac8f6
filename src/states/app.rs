//! Application State
//!
//! Persisted settings (endpoints, locale, theme, page size, window bounds),
//! the current route, and the global store that hands out every state entity.

use crate::error::Result;
use crate::helpers::get_or_create_config_dir;
use crate::services::{
    DEFAULT_API_BASE_URL, DEFAULT_WS_URL, RetryConfig, ServiceConfig, ServiceHub, TaskScope,
};
use crate::states::{NotificationsState, SessionState, TasksState};
use crate::table::DEFAULT_PAGE_SIZE;
use gpui::{Action, App, AppContext, Bounds, Context, Entity, Global, Pixels};
use gpui_component::ThemeMode;
use locale_config::Locale;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Application routes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    #[default]
    Login,
    Register,
    /// Tasks created by the signed-in user
    MyTasks,
    /// Tasks assigned to the signed-in user
    AssignedTasks,
}

impl Route {
    /// Routes that need a session
    pub fn is_protected(self) -> bool {
        matches!(self, Route::MyTasks | Route::AssignedTasks)
    }

    pub fn task_scope(self) -> Option<TaskScope> {
        match self {
            Route::MyTasks => Some(TaskScope::Mine),
            Route::AssignedTasks => Some(TaskScope::Assigned),
            _ => None,
        }
    }

    /// Route actually shown for a request: protected pages fall back to
    /// Login without a session, and the auth pages forward to MyTasks with one.
    pub fn guard(self, authenticated: bool) -> Route {
        match (self.is_protected(), authenticated) {
            (true, false) => Route::Login,
            (false, true) => Route::MyTasks,
            _ => self,
        }
    }
}

// ==================== Actions ====================

/// Theme selection action
#[derive(Clone, Copy, PartialEq, Debug, Deserialize, JsonSchema, Action)]
pub enum ThemeAction {
    Light,
    Dark,
    System,
}

/// Locale selection action
#[derive(Clone, Copy, PartialEq, Debug, Deserialize, JsonSchema, Action)]
pub enum LocaleAction {
    Es,
    En,
}

// ==================== Persisted State ====================

const LIGHT_THEME_MODE: &str = "light";
const DARK_THEME_MODE: &str = "dark";
const SUPPORTED_LOCALES: [&str; 2] = ["es", "en"];
const DEFAULT_LOCALE: &str = "es";

fn get_config_path() -> Result<PathBuf> {
    Ok(get_or_create_config_dir()?.join("taskdesk.toml"))
}

/// Persisted application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(skip)]
    route: Route,
    api_base_url: Option<String>,
    ws_url: Option<String>,
    page_size: Option<usize>,
    locale: Option<String>,
    theme: Option<String>,
    bounds: Option<Bounds<Pixels>>,
}

impl AppSettings {
    /// Load settings from the config directory
    pub fn try_load() -> Result<Self> {
        Self::load_from(&get_config_path()?)
    }

    /// Load settings from `path`. A missing or empty file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        info!(path = ?path, "Loading config file");
        let value = match std::fs::read_to_string(path) {
            Ok(value) => value,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        };

        let mut state: Self = if value.trim().is_empty() {
            Self::new()
        } else {
            toml::from_str(&value).map_err(|e| {
                error!(error = %e, path = ?path, "Failed to parse config file");
                e
            })?
        };

        // Detect system locale if not set
        if state.locale.as_ref().is_none_or(|l| l.is_empty()) {
            let current = Locale::current().to_string();
            let lang = current.split(['-', '_']).next().unwrap_or_default();
            if SUPPORTED_LOCALES.contains(&lang) {
                state.locale = Some(lang.to_string());
            }
        }

        Ok(state)
    }

    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Getters ====================

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn bounds(&self) -> Option<&Bounds<Pixels>> {
        self.bounds.as_ref()
    }

    pub fn theme(&self) -> Option<ThemeMode> {
        match self.theme.as_deref() {
            Some(LIGHT_THEME_MODE) => Some(ThemeMode::Light),
            Some(DARK_THEME_MODE) => Some(ThemeMode::Dark),
            _ => None,
        }
    }

    pub fn locale(&self) -> &str {
        self.locale.as_deref().unwrap_or(DEFAULT_LOCALE)
    }

    pub fn api_base_url(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL)
    }

    pub fn ws_url(&self) -> &str {
        self.ws_url.as_deref().unwrap_or(DEFAULT_WS_URL)
    }

    pub fn page_size(&self) -> usize {
        self.page_size.filter(|n| *n > 0).unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            api_base_url: self.api_base_url().to_string(),
            ws_url: self.ws_url().to_string(),
            retry: RetryConfig::default(),
        }
    }

    // ==================== Setters ====================

    /// Navigate, applying the session guard
    pub fn go_to(&mut self, route: Route, authenticated: bool, cx: &mut Context<Self>) {
        let route = route.guard(authenticated);
        if self.route != route {
            info!(from = ?self.route, to = ?route, "Navigate");
            self.route = route;
            cx.notify();
        }
    }

    pub fn set_bounds(&mut self, bounds: Bounds<Pixels>) {
        self.bounds = Some(bounds);
    }

    pub fn set_theme(&mut self, theme: Option<ThemeMode>) {
        self.theme = match theme {
            Some(ThemeMode::Light) => Some(LIGHT_THEME_MODE.to_string()),
            Some(ThemeMode::Dark) => Some(DARK_THEME_MODE.to_string()),
            _ => None,
        };
    }

    pub fn set_locale(&mut self, locale: String) {
        self.locale = Some(locale);
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = Some(page_size);
    }

    /// Write settings to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, toml::to_string(self)?)?;
        Ok(())
    }
}

// ==================== Global Store ====================

/// Global store accessible via `cx.global::<DeskGlobalStore>()`
#[derive(Clone)]
pub struct DeskGlobalStore {
    app_state: Entity<AppSettings>,
    session: Entity<SessionState>,
    tasks: Entity<TasksState>,
    notifications: Entity<NotificationsState>,
    services: ServiceHub,
}

impl DeskGlobalStore {
    pub fn new(
        app_state: Entity<AppSettings>,
        session: Entity<SessionState>,
        tasks: Entity<TasksState>,
        notifications: Entity<NotificationsState>,
        services: ServiceHub,
    ) -> Self {
        Self {
            app_state,
            session,
            tasks,
            notifications,
            services,
        }
    }

    pub fn app_state(&self) -> Entity<AppSettings> {
        self.app_state.clone()
    }

    pub fn session(&self) -> Entity<SessionState> {
        self.session.clone()
    }

    pub fn tasks(&self) -> Entity<TasksState> {
        self.tasks.clone()
    }

    pub fn notifications(&self) -> Entity<NotificationsState> {
        self.notifications.clone()
    }

    pub fn services(&self) -> &ServiceHub {
        &self.services
    }

    /// Read app state
    pub fn read<'a>(&self, cx: &'a App) -> &'a AppSettings {
        self.app_state.read(cx)
    }

    /// Update app state
    pub fn update<R, C: AppContext>(
        &self,
        cx: &mut C,
        update: impl FnOnce(&mut AppSettings, &mut Context<AppSettings>) -> R,
    ) -> C::Result<R> {
        self.app_state.update(cx, update)
    }

    pub fn is_authenticated(&self, cx: &App) -> bool {
        self.session.read(cx).is_authenticated()
    }
}

impl Global for DeskGlobalStore {}

/// Navigate to `route` through the session guard
pub fn navigate(cx: &mut App, route: Route) {
    let store = cx.global::<DeskGlobalStore>().clone();
    let authenticated = store.is_authenticated(cx);
    store.update(cx, |state, cx| state.go_to(route, authenticated, cx));
}

// ==================== Persistence ====================

/// Save app state to disk
pub fn save_app_state(state: &AppSettings) -> Result<()> {
    state.save_to(&get_config_path()?)
}

/// Update app state and save to disk asynchronously
pub fn update_app_state_and_save<F>(cx: &App, action_name: &'static str, mutation: F)
where
    F: FnOnce(&mut AppSettings, &App) + Send + 'static + Clone,
{
    let store = cx.global::<DeskGlobalStore>().clone();

    cx.spawn(async move |cx| {
        let current_state = store.update(cx, |state, cx| {
            mutation(state, cx);
            state.clone()
        });

        if let Ok(state) = current_state {
            cx.background_executor()
                .spawn(async move {
                    if let Err(e) = save_app_state(&state) {
                        error!(error = %e, action = action_name, "Failed to save state");
                    } else {
                        info!(action = action_name, "State saved successfully");
                    }
                })
                .await;
        }

        cx.update(|cx| cx.refresh_windows()).ok();
    })
    .detach();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_guard() {
        assert_eq!(Route::MyTasks.guard(false), Route::Login);
        assert_eq!(Route::AssignedTasks.guard(false), Route::Login);
        assert_eq!(Route::Register.guard(false), Route::Register);
        assert_eq!(Route::Login.guard(true), Route::MyTasks);
        assert_eq!(Route::Register.guard(true), Route::MyTasks);
        assert_eq!(Route::AssignedTasks.guard(true), Route::AssignedTasks);
    }

    #[test]
    fn test_task_scope_per_route() {
        assert_eq!(Route::MyTasks.task_scope(), Some(TaskScope::Mine));
        assert_eq!(Route::AssignedTasks.task_scope(), Some(TaskScope::Assigned));
        assert_eq!(Route::Login.task_scope(), None);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let settings = AppSettings::load_from(&dir.path().join("taskdesk.toml")).expect("load");
        assert_eq!(settings.api_base_url(), DEFAULT_API_BASE_URL);
        assert_eq!(settings.ws_url(), DEFAULT_WS_URL);
        assert_eq!(settings.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(settings.route(), Route::Login);
    }

    #[test]
    fn test_settings_survive_a_save() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("taskdesk.toml");

        let mut settings = AppSettings::new();
        settings.set_locale("en".to_string());
        settings.set_page_size(25);
        settings.set_theme(Some(ThemeMode::Dark));
        settings.save_to(&path).expect("save");

        let loaded = AppSettings::load_from(&path).expect("load");
        assert_eq!(loaded.locale(), "en");
        assert_eq!(loaded.page_size(), 25);
        assert_eq!(loaded.theme(), Some(ThemeMode::Dark));
    }

    #[test]
    fn test_endpoints_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("taskdesk.toml");
        std::fs::write(
            &path,
            "api_base_url = \"http://tasks.local/api\"\nws_url = \"ws://tasks.local/ws\"\nlocale = \"es\"\npage_size = 0\n",
        )
        .expect("write");

        let settings = AppSettings::load_from(&path).expect("load");
        assert_eq!(settings.api_base_url(), "http://tasks.local/api");
        assert_eq!(settings.service_config().ws_url, "ws://tasks.local/ws");
        assert_eq!(settings.page_size(), DEFAULT_PAGE_SIZE);
    }
}
