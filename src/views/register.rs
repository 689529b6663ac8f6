//! Register Page

use super::login::{auth_card, auth_error_message, auth_field, field_error};
use crate::domain::{AuthField, FieldError, RegisterRequest, validate_register};
use crate::services::run_in_tokio;
use crate::states::{DeskGlobalStore, Route, i18n_auth, navigate, sign_in};
use gpui::{Context, Entity, SharedString, Subscription, Window, prelude::*};
use gpui_component::{
    ActiveTheme, Disableable, IconName,
    button::{Button, ButtonVariants},
    h_flex,
    input::{InputEvent, InputState},
    label::Label,
    v_flex,
};
use tracing::{info, warn};

pub struct RegisterView {
    name_state: Entity<InputState>,
    email_state: Entity<InputState>,
    password_state: Entity<InputState>,
    errors: Vec<FieldError>,
    server_error: Option<SharedString>,
    loading: bool,
    _subscriptions: Vec<Subscription>,
}

impl RegisterView {
    pub fn new(window: &mut Window, cx: &mut Context<Self>) -> Self {
        let name_state = cx.new(|cx| InputState::new(window, cx).placeholder(i18n_auth(cx, "name_placeholder")));
        let email_state = cx.new(|cx| InputState::new(window, cx).placeholder(i18n_auth(cx, "email_placeholder")));
        let password_state = cx.new(|cx| {
            InputState::new(window, cx)
                .masked(true)
                .placeholder(i18n_auth(cx, "password_placeholder"))
        });

        let mut subscriptions = Vec::new();
        for (field, state) in [
            (AuthField::Name, &name_state),
            (AuthField::Email, &email_state),
            (AuthField::Password, &password_state),
        ] {
            subscriptions.push(cx.subscribe_in(state, window, move |this, _, event: &InputEvent, window, cx| {
                match event {
                    InputEvent::Change => {
                        this.errors.retain(|(f, _)| *f != field);
                        this.server_error = None;
                        cx.notify();
                    }
                    InputEvent::PressEnter { .. } => this.submit(window, cx),
                    _ => {}
                }
            }));
        }

        Self {
            name_state,
            email_state,
            password_state,
            errors: Vec::new(),
            server_error: None,
            loading: false,
            _subscriptions: subscriptions,
        }
    }

    fn submit(&mut self, _window: &mut Window, cx: &mut Context<Self>) {
        if self.loading {
            return;
        }
        let request = RegisterRequest {
            name: self.name_state.read(cx).value().trim().to_string(),
            email: self.email_state.read(cx).value().trim().to_string(),
            password: self.password_state.read(cx).value().to_string(),
        };
        self.errors = validate_register(&request);
        self.server_error = None;
        if !self.errors.is_empty() {
            cx.notify();
            return;
        }

        self.loading = true;
        cx.notify();

        let api = cx.global::<DeskGlobalStore>().services().api();
        cx.spawn(async move |this, cx| {
            let result = run_in_tokio(async move { api.register(&request).await }).await;
            let _ = this.update(cx, |this, cx| {
                this.loading = false;
                match result {
                    Ok(response) => {
                        info!(user_id = response.id, "Registration succeeded");
                        // A fresh account is remembered for the next login
                        let remember = Some(response.email.clone());
                        let session = response.into_session();
                        cx.defer(move |cx| sign_in(cx, session, remember));
                    }
                    Err(e) => {
                        warn!(error = %e, "Registration failed");
                        this.server_error = Some(auth_error_message(&e, "register_failed", cx));
                    }
                }
                cx.notify();
            });
        })
        .detach();
    }
}

impl Render for RegisterView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let body = v_flex()
            .gap_3()
            .child(auth_field(
                i18n_auth(cx, "name"),
                &self.name_state,
                IconName::User,
                field_error(&self.errors, AuthField::Name, cx),
                cx,
            ))
            .child(auth_field(
                i18n_auth(cx, "email"),
                &self.email_state,
                IconName::CircleUser,
                field_error(&self.errors, AuthField::Email, cx),
                cx,
            ))
            .child(auth_field(
                i18n_auth(cx, "password"),
                &self.password_state,
                IconName::EyeOff,
                field_error(&self.errors, AuthField::Password, cx),
                cx,
            ))
            .child(
                Button::new("register-submit")
                    .primary()
                    .w_full()
                    .label(if self.loading {
                        i18n_auth(cx, "registering")
                    } else {
                        i18n_auth(cx, "register")
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
                        Label::new(i18n_auth(cx, "have_account"))
                            .text_sm()
                            .text_color(cx.theme().muted_foreground),
                    )
                    .child(
                        Button::new("go-login")
                            .link()
                            .label(i18n_auth(cx, "login_link"))
                            .on_click(|_, _, cx| navigate(cx, Route::Login)),
                    ),
            );

        auth_card(i18n_auth(cx, "register_title"), body, cx)
    }
}
