use axum::{
    extract::{FromRef, State},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    Json,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, MessageResponse, PublicUser, RegisterRequest},
        jwt::JwtKeys,
        password::{hash_password, verify_password},
    },
    error::{ApiError, ApiResult},
    state::AppState,
    users::User,
};

const TOKEN_COOKIE: &str = "token";

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let (username, email, password) = match (payload.username, payload.email, payload.password) {
        (Some(u), Some(e), Some(p)) if !u.is_empty() && !e.is_empty() && !p.is_empty() => {
            (u, e, p)
        }
        _ => {
            return Err(ApiError::bad_request(
                "Username, email and password are required",
            ))
        }
    };

    let existing = User::find_by_email(&state.db, &email)
        .await
        .map_err(|e| ApiError::upstream("Server error", e))?;
    if existing.is_some() {
        warn!(email = %email, "registration for an existing email");
        return Err(ApiError::Conflict("User already exists".into()));
    }

    let hash = hash_password(&password).map_err(|e| ApiError::upstream("Server error", e))?;

    let user = User::create(&state.db, &username, &email, &hash)
        .await
        .map_err(|e| ApiError::upstream("Server error", e))?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User registered successfully".into(),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<(HeaderMap, Json<LoginResponse>)> {
    let (email, password) = match (payload.email, payload.password) {
        (Some(e), Some(p)) if !e.is_empty() && !p.is_empty() => (e, p),
        _ => return Err(ApiError::bad_request("Email and password are required")),
    };

    // Unknown email and wrong password take the same exit.
    let user = User::find_by_email(&state.db, &email)
        .await
        .map_err(|e| ApiError::upstream("Server error", e))?
        .ok_or(ApiError::InvalidCredentials)?;

    if !verify_password(&password, &user.password_hash) {
        warn!(user_id = %user.id, "login with wrong password");
        return Err(ApiError::InvalidCredentials);
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys
        .sign(user.id)
        .map_err(|e| ApiError::upstream("Server error", e))?;

    let mut headers = HeaderMap::new();
    headers.insert(
        SET_COOKIE,
        format!("{TOKEN_COOKIE}={token}; HttpOnly; Secure; Path=/")
            .parse()
            .map_err(|e: axum::http::header::InvalidHeaderValue| {
                ApiError::upstream("Server error", anyhow::Error::new(e))
            })?,
    );

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok((
        headers,
        Json(LoginResponse {
            token,
            message: "Login successful".into(),
            user: PublicUser::from(&user),
        }),
    ))
}

#[instrument]
pub async fn logout() -> (HeaderMap, Json<MessageResponse>) {
    let mut headers = HeaderMap::new();
    headers.insert(
        SET_COOKIE,
        format!("{TOKEN_COOKIE}=; HttpOnly; Secure; Path=/; Max-Age=0")
            .parse()
            .expect("static cookie value is a valid header"),
    );
    (
        headers,
        Json(MessageResponse {
            message: "Logged out successfully".into(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[tokio::test]
    async fn logout_clears_the_token_cookie() {
        let (headers, body) = logout().await;
        let cookie = headers.get(SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cookie.starts_with("token=;"));
        assert!(cookie.contains("Max-Age=0"));
        assert_eq!(body.0.message, "Logged out successfully");
    }

    #[test]
    fn missing_login_fields_yield_bad_request() {
        // Presence is the only validation applied to credentials.
        let err = ApiError::bad_request("Email and password are required").into_response();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
