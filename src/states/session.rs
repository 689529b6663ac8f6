//! Session State
//!
//! Holds the persisted session and drives sign-in / sign-out across the
//! services and the other state entities.

use crate::domain::{Session, User};
use crate::services::SessionStore;
use crate::states::{DeskGlobalStore, Route};
use gpui::{App, Context};
use tracing::{error, info};

pub struct SessionState {
    store: SessionStore,
}

impl SessionState {
    pub fn new(store: SessionStore) -> Self {
        Self { store }
    }

    // ==================== Getters ====================

    pub fn session(&self) -> Option<&Session> {
        self.store.session()
    }

    pub fn user(&self) -> Option<&User> {
        self.store.user()
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.is_authenticated()
    }

    pub fn remembered_email(&self) -> Option<&str> {
        self.store.remembered_email()
    }

    // ==================== Setters ====================

    fn save(&mut self, session: Session, remember: Option<String>, cx: &mut Context<Self>) {
        if let Err(e) = self.store.save(session, remember) {
            error!(error = %e, path = ?self.store.path(), "Failed to persist session");
        }
        cx.notify();
    }

    fn clear(&mut self, cx: &mut Context<Self>) {
        if let Err(e) = self.store.clear() {
            error!(error = %e, path = ?self.store.path(), "Failed to clear session");
        }
        cx.notify();
    }
}

/// Start a session: bearer token, notification socket, persisted session,
/// then the task page. `remember` keeps the email for the next login form.
pub fn sign_in(cx: &mut App, session: Session, remember: Option<String>) {
    let store = cx.global::<DeskGlobalStore>().clone();
    info!(user_id = session.user.id, "Signing in");

    store
        .services()
        .start_session(&session.token, session.user.id);
    store
        .session()
        .update(cx, |state, cx| state.save(session, remember, cx));
    store.update(cx, |state, cx| state.go_to(Route::MyTasks, true, cx));
}

/// End the session and return to the login page.
pub fn sign_out(cx: &mut App) {
    let store = cx.global::<DeskGlobalStore>().clone();
    info!("Signing out");

    store.services().end_session();
    store.session().update(cx, |state, cx| state.clear(cx));
    store
        .notifications()
        .update(cx, |state, cx| state.clear(cx));
    store.tasks().update(cx, |state, cx| state.reset(cx));
    store.update(cx, |state, cx| state.go_to(Route::Login, false, cx));
}

/// Resume a session restored from disk
pub fn resume_session(cx: &mut App) {
    let store = cx.global::<DeskGlobalStore>().clone();
    let Some(session) = store.session().read(cx).session().cloned() else {
        return;
    };
    info!(user_id = session.user.id, "Resuming session");
    store
        .services()
        .start_session(&session.token, session.user.id);
    store.update(cx, |state, cx| state.go_to(Route::MyTasks, true, cx));
}
