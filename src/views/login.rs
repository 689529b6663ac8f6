//! Login Page
//!
//! Email / password form with a "remember me" option. A successful login
//! starts the session and lands on the task page.

use crate::constants::AUTH_CARD_WIDTH;
use crate::domain::{AuthField, Credentials, FieldError, validate_login};
use crate::error::Error;
use crate::services::run_in_tokio;
use crate::states::{DeskGlobalStore, Route, i18n_auth, navigate, sign_in};
use gpui::{AnyElement, App, Context, Entity, SharedString, Subscription, Window, div, prelude::*, px};
use gpui_component::{
    ActiveTheme, Disableable, StyledExt, Icon, IconName,
    button::{Button, ButtonVariants},
    checkbox::Checkbox,
    h_flex,
    input::{Input, InputEvent, InputState},
    label::Label,
    v_flex,
};
use tracing::{info, warn};

pub struct LoginView {
    email_state: Entity<InputState>,
    password_state: Entity<InputState>,
    remember: bool,
    errors: Vec<FieldError>,
    server_error: Option<SharedString>,
    loading: bool,
    _subscriptions: Vec<Subscription>,
}

impl LoginView {
    pub fn new(window: &mut Window, cx: &mut Context<Self>) -> Self {
        let remembered = cx
            .global::<DeskGlobalStore>()
            .session()
            .read(cx)
            .remembered_email()
            .map(str::to_string);

        let email_state = cx.new(|cx| {
            InputState::new(window, cx)
                .placeholder(i18n_auth(cx, "email_placeholder"))
                .default_value(remembered.clone().unwrap_or_default())
        });
        let password_state = cx.new(|cx| {
            InputState::new(window, cx)
                .masked(true)
                .placeholder(i18n_auth(cx, "password_placeholder"))
        });

        let subscriptions = vec![
            cx.subscribe_in(&email_state, window, |this, _, event, window, cx| {
                this.on_input(AuthField::Email, event, window, cx);
            }),
            cx.subscribe_in(&password_state, window, |this, _, event, window, cx| {
                this.on_input(AuthField::Password, event, window, cx);
            }),
        ];

        Self {
            email_state,
            password_state,
            remember: remembered.is_some(),
            errors: Vec::new(),
            server_error: None,
            loading: false,
            _subscriptions: subscriptions,
        }
    }

    fn on_input(&mut self, field: AuthField, event: &InputEvent, window: &mut Window, cx: &mut Context<Self>) {
        match event {
            InputEvent::Change => {
                let before = self.errors.len();
                self.errors.retain(|(f, _)| *f != field);
                if before != self.errors.len() || self.server_error.is_some() {
                    self.server_error = None;
                    cx.notify();
                }
            }
            InputEvent::PressEnter { .. } => self.submit(window, cx),
            _ => {}
        }
    }

    fn submit(&mut self, _window: &mut Window, cx: &mut Context<Self>) {
        if self.loading {
            return;
        }
        let credentials = Credentials {
            email: self.email_state.read(cx).value().trim().to_string(),
            password: self.password_state.read(cx).value().to_string(),
        };
        self.errors = validate_login(&credentials);
        self.server_error = None;
        if !self.errors.is_empty() {
            cx.notify();
            return;
        }

        self.loading = true;
        cx.notify();

        let api = cx.global::<DeskGlobalStore>().services().api();
        let remember = self.remember.then(|| credentials.email.clone());
        cx.spawn(async move |this, cx| {
            let email = credentials.email.clone();
            let result = run_in_tokio(async move { api.login(&credentials).await }).await;
            let _ = this.update(cx, |this, cx| {
                this.loading = false;
                match result {
                    Ok(response) => {
                        info!(%email, "Login succeeded");
                        let session = response.into_session();
                        cx.defer(move |cx| sign_in(cx, session, remember));
                    }
                    Err(e) => {
                        warn!(%email, error = %e, "Login failed");
                        this.server_error = Some(auth_error_message(&e, "login_failed", cx));
                    }
                }
                cx.notify();
            });
        })
        .detach();
    }

    fn error_for(&self, field: AuthField, cx: &App) -> Option<SharedString> {
        field_error(&self.errors, field, cx)
    }
}

/// Message for a failed auth request. The API's own message wins; a bare
/// 401 reads as wrong credentials and transport failures get `fallback`.
pub(super) fn auth_error_message(error: &Error, fallback: &str, cx: &App) -> SharedString {
    match error {
        Error::Api { status, message } => {
            let canonical = reqwest::StatusCode::from_u16(*status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or_default();
            if error.is_unauthorized() && (message.is_empty() || message == canonical) {
                i18n_auth(cx, "invalid_credentials")
            } else {
                message.clone().into()
            }
        }
        _ => i18n_auth(cx, fallback),
    }
}

pub(super) fn field_error(errors: &[FieldError], field: AuthField, cx: &App) -> Option<SharedString> {
    errors
        .iter()
        .find(|(f, _)| *f == field)
        .map(|(_, key)| i18n_auth(cx, key))
}

/// Labelled input with its validation message
pub(super) fn auth_field(
    label: SharedString,
    input: &Entity<InputState>,
    icon: IconName,
    error: Option<SharedString>,
    cx: &App,
) -> AnyElement {
    let invalid = error.is_some();
    v_flex()
        .gap_1()
        .child(Label::new(label).text_sm())
        .child(
            div()
                .rounded_md()
                .when(invalid, |el| el.border_1().border_color(cx.theme().danger))
                .child(
                    Input::new(input)
                        .w_full()
                        .prefix(Icon::new(icon).text_color(cx.theme().muted_foreground)),
                ),
        )
        .when_some(error, |el, error| {
            el.child(Label::new(error).text_xs().text_color(cx.theme().danger))
        })
        .into_any_element()
}

/// Centered card used by both auth pages
pub(super) fn auth_card(title: SharedString, body: impl IntoElement, cx: &App) -> impl IntoElement {
    div()
        .size_full()
        .flex()
        .items_center()
        .justify_center()
        .bg(cx.theme().background)
        .child(
            v_flex()
                .w(px(AUTH_CARD_WIDTH))
                .p_6()
                .gap_4()
                .bg(cx.theme().secondary)
                .border_1()
                .border_color(cx.theme().border)
                .rounded_lg()
                .shadow_lg()
                .child(Label::new(title).text_xl().font_semibold())
                .child(body),
        )
}

impl Render for LoginView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let body = v_flex()
            .gap_3()
            .child(auth_field(
                i18n_auth(cx, "email"),
                &self.email_state,
                IconName::CircleUser,
                self.error_for(AuthField::Email, cx),
                cx,
            ))
            .child(auth_field(
                i18n_auth(cx, "password"),
                &self.password_state,
                IconName::EyeOff,
                self.error_for(AuthField::Password, cx),
                cx,
            ))
            .child(
                Checkbox::new("remember-me")
                    .label(i18n_auth(cx, "remember_me"))
                    .checked(self.remember)
                    .on_click(cx.listener(|this, checked: &bool, _, cx| {
                        this.remember = *checked;
                        cx.notify();
                    })),
            )
            .child(
                Button::new("login-submit")
                    .primary()
                    .w_full()
                    .label(if self.loading {
                        i18n_auth(cx, "signing_in")
                    } else {
                        i18n_auth(cx, "sign_in")
                    })
                    .loading(self.loading)
                    .disabled(self.loading)
                    .on_click(cx.listener(|this, _, window, cx| this.submit(window, cx))),
            )
            .when_some(self.server_error.clone(), |el, message| {
                el.child(Label::new(message).text_sm().text_color(cx.theme().danger))
            })
            .child(
                h_flex()
                    .gap_1()
                    .justify_center()
                    .child(
                        Label::new(i18n_auth(cx, "no_account"))
                            .text_sm()
                            .text_color(cx.theme().muted_foreground),
                    )
                    .child(
                        Button::new("go-register")
                            .link()
                            .label(i18n_auth(cx, "register_link"))
                            .on_click(|_, _, cx| navigate(cx, Route::Register)),
                    ),
            );

        auth_card(i18n_auth(cx, "login_title"), body, cx)
    }
}
