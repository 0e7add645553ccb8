//! Types exchanged with the authentication endpoints of the backend
//!
//! This crate does not implement any authentication scheme. It only calls the backend, and carries the token it returns.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The minimum password length the backend accepts
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// A signed-in user
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl User {
    /// The name to greet the user with
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() == false {
            &self.name
        } else if self.email.is_empty() == false {
            &self.email
        } else {
            "User"
        }
    }
}

/// What the backend returns on a successful sign-in or registration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    #[serde(flatten)]
    pub user: User,
}

#[derive(Clone, Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterRequest {
    /// Check what can be checked before bothering the server
    pub fn validate(&self) -> Result<()> {
        if self.password != self.confirm_password {
            return Err(Error::InvalidInput("Passwords do not match!".to_string()));
        }
        if self.name.trim().is_empty() {
            return Err(Error::InvalidInput("Name is required".to_string()));
        }
        if self.email.trim().is_empty() {
            return Err(Error::InvalidInput("Email is required".to_string()));
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(Error::InvalidInput(format!("Password must be at least {} characters long", MIN_PASSWORD_LENGTH)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(password: &str, confirm: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[test]
    fn register_validation() {
        assert!(request("secret1", "secret1").validate().is_ok());
        assert!(request("secret1", "secret2").validate().is_err());
        assert!(request("abc", "abc").validate().is_err());

        let mut nameless = request("secret1", "secret1");
        nameless.name = "  ".to_string();
        assert!(nameless.validate().is_err());
    }

    #[test]
    fn auth_response_is_flat() {
        let json = r#"{"token": "abc.def", "id": 3, "name": "Ada", "email": "ada@example.com"}"#;
        let session: AuthSession = serde_json::from_str(json).unwrap();
        assert_eq!(session.token, "abc.def");
        assert_eq!(session.user.id, 3);
        assert_eq!(session.user.display_name(), "Ada");

        let request = serde_json::to_value(&request("a", "a")).unwrap();
        assert_eq!(request["confirmPassword"], "a");
    }
}
