//! Real-time notifications

use chrono::{DateTime, Local};
use serde_json::Value;
use uuid::Uuid;

/// Which subscription delivered a notification
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationSource {
    /// Broadcast topic for task assignments (plain-text bodies)
    Assignment,
    /// Per-user topic (JSON bodies with a `message` field)
    Personal,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    pub id: Uuid,
    pub source: NotificationSource,
    pub message: String,
    /// Decoded JSON body of personal notifications
    pub payload: Option<Value>,
    pub received_at: DateTime<Local>,
}

impl Notification {
    /// Assignment bodies are shown verbatim.
    pub fn assignment(body: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            source: NotificationSource::Assignment,
            message: body.to_string(),
            payload: None,
            received_at: Local::now(),
        }
    }

    /// Personal bodies are JSON `{ "message": ..., ... }`.
    ///
    /// Bodies that are not JSON, or lack a string `message`, fall back to the
    /// raw text.
    pub fn personal(body: &str) -> Self {
        let payload = serde_json::from_str::<Value>(body).ok();
        let message = payload
            .as_ref()
            .and_then(|v| v.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| body.to_string());

        Self {
            id: Uuid::new_v4(),
            source: NotificationSource::Personal,
            message,
            payload,
            received_at: Local::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_personal_uses_message_field() {
        let n = Notification::personal(r#"{"message":"Nueva tarea asignada","taskId":5}"#);
        assert_eq!(n.message, "Nueva tarea asignada");
        assert_eq!(n.source, NotificationSource::Personal);
        assert_eq!(
            n.payload.as_ref().and_then(|p| p.get("taskId")).and_then(Value::as_i64),
            Some(5)
        );
    }

    #[test]
    fn test_personal_falls_back_to_raw_body() {
        assert_eq!(Notification::personal("hola").message, "hola");
        assert_eq!(Notification::personal(r#"{"other":1}"#).message, r#"{"other":1}"#);
    }

    #[test]
    fn test_assignment_is_verbatim() {
        let n = Notification::assignment("Tarea 3 asignada a Ana");
        assert_eq!(n.message, "Tarea 3 asignada a Ana");
        assert!(n.payload.is_none());
    }
}
