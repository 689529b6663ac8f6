//! Internationalization Helpers
//!
//! Translate a key of one namespace in the current locale.

use super::DeskGlobalStore;
use gpui::{App, SharedString};
use rust_i18n::t;

/// Current locale
pub fn locale(cx: &App) -> String {
    cx.global::<DeskGlobalStore>().read(cx).locale().to_string()
}

/// Get translated string from "auth" namespace
pub fn i18n_auth(cx: &App, key: &str) -> SharedString {
    let locale = cx.global::<DeskGlobalStore>().read(cx).locale();
    t!(format!("auth.{key}"), locale = locale).into()
}

/// Get translated string from "tasks" namespace
pub fn i18n_tasks(cx: &App, key: &str) -> SharedString {
    let locale = cx.global::<DeskGlobalStore>().read(cx).locale();
    t!(format!("tasks.{key}"), locale = locale).into()
}

/// Get translated string from "table" namespace
pub fn i18n_table(cx: &App, key: &str) -> SharedString {
    let locale = cx.global::<DeskGlobalStore>().read(cx).locale();
    t!(format!("table.{key}"), locale = locale).into()
}

/// Get translated string from "menu" namespace
pub fn i18n_menu(cx: &App, key: &str) -> SharedString {
    let locale = cx.global::<DeskGlobalStore>().read(cx).locale();
    t!(format!("menu.{key}"), locale = locale).into()
}
