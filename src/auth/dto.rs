use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::users::User;

/// Request body for registration. Fields are optional so missing ones can be
/// reported as a 400 rather than a body-deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub message: String,
    pub user: PublicUser,
}

/// Public projection of a user; the credential hash stays server-side.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        PublicUser {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_deserialize_as_none() {
        let req: LoginRequest = serde_json::from_str(r#"{"email":"a@b.c"}"#).unwrap();
        assert_eq!(req.email.as_deref(), Some("a@b.c"));
        assert!(req.password.is_none());
    }

    #[test]
    fn login_response_shape() {
        let response = LoginResponse {
            token: "jwt".into(),
            message: "Login successful".into(),
            user: PublicUser {
                id: Uuid::new_v4(),
                username: "alice".into(),
                email: "alice@example.com".into(),
            },
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["token"], "jwt");
        assert_eq!(json["message"], "Login successful");
        assert_eq!(json["user"]["email"], "alice@example.com");
        assert!(json["user"].get("password_hash").is_none());
    }
}
