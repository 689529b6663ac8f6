//! Users and authentication payloads

use serde::{Deserialize, Serialize};

/// Fallback display name when a user has neither name nor email
pub const ANONYMOUS_USER: &str = "Usuario";

/// A user as returned by the API
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl User {
    /// Name, else email, else [`ANONYMOUS_USER`]
    pub fn display_name(&self) -> &str {
        if !self.name.trim().is_empty() {
            &self.name
        } else if !self.email.trim().is_empty() {
            &self.email
        } else {
            ANONYMOUS_USER
        }
    }
}

/// `POST /auth/login` body
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// `POST /auth/register` body
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Successful login or registration
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl AuthResponse {
    pub fn into_session(self) -> Session {
        Session {
            token: self.token,
            user: User {
                id: self.id,
                name: self.name,
                email: self.email,
                roles: self.roles,
            },
        }
    }
}

/// Bearer token plus the signed-in user
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_fallbacks() {
        let mut user = User {
            id: 1,
            name: "Ana".into(),
            email: "ana@example.com".into(),
            roles: vec![],
        };
        assert_eq!(user.display_name(), "Ana");
        user.name.clear();
        assert_eq!(user.display_name(), "ana@example.com");
        user.email.clear();
        assert_eq!(user.display_name(), "Usuario");
    }

    #[test]
    fn test_auth_response_into_session() {
        let response: AuthResponse = serde_json::from_str(
            r#"{"token":"t0k","id":9,"name":"Luis","email":"l@x.co","roles":["USER"]}"#,
        )
        .expect("parse");
        let session = response.into_session();
        assert_eq!(session.token, "t0k");
        assert_eq!(session.user.id, 9);
        assert_eq!(session.user.roles, vec!["USER".to_string()]);
    }
}
