//! Login, logout and session endpoints.
//!
//! The gateway never verifies tokens. It decodes them to learn the caller's
//! role for navigation; the backend re-authorizes every API call.

pub mod middleware;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, HeaderValue},
    Extension, Json,
};
use pitchside_session::{Session, TOKEN_KEY};
use serde::{Deserialize, Serialize};

use crate::backend_client::LoginRequest;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Login response body
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub session: Session,
    /// Bearer token for direct backend calls
    pub token: String,
}

/// Session response body
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub session: Session,
}

/// Exchange credentials for a token and persist it in the `token` cookie.
///
/// `POST /api/auth/login`
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<(HeaderMap, Json<LoginResponse>)> {
    let Json(req) = payload?;
    if req.username.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::BadRequest("username and password are required".to_string()));
    }

    tracing::info!(username = %req.username, "Auth login request");
    let token = state.backend.login(&req).await?;

    let session = Session::from_token(Some(&token));
    if !session.is_authenticated {
        return Err(AppError::Backend(
            "Backend issued a token without a usable role claim".to_string(),
        ));
    }

    tracing::info!(username = %req.username, role = ?session.role, "Authenticated");

    let mut headers = HeaderMap::new();
    headers.insert(header::SET_COOKIE, token_cookie(&token, state.config.session.cookie_secure)?);

    Ok((headers, Json(LoginResponse { session, token })))
}

/// Drop the `token` cookie.
///
/// `POST /api/auth/logout`
pub async fn logout(State(state): State<AppState>) -> AppResult<(HeaderMap, Json<SessionResponse>)> {
    let mut headers = HeaderMap::new();
    headers.insert(header::SET_COOKIE, cleared_cookie(state.config.session.cookie_secure));

    Ok((
        headers,
        Json(SessionResponse {
            session: Session::anonymous(),
        }),
    ))
}

/// Session derived from the request's credential.
///
/// `GET /api/auth/session`
pub async fn session(Extension(session): Extension<Session>) -> Json<SessionResponse> {
    Json(SessionResponse { session })
}

fn token_cookie(token: &str, secure: bool) -> AppResult<HeaderValue> {
    let mut cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", TOKEN_KEY, token);
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
        .map_err(|_| AppError::Backend("Token contains characters not allowed in a cookie".to_string()))
}

fn cleared_cookie(secure: bool) -> HeaderValue {
    let cookie = if secure {
        "token=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax; Secure"
    } else {
        "token=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax"
    };
    HeaderValue::from_static(cookie)
}
