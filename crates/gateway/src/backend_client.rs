//! HTTP client for the tournament backend.
//!
//! The backend owns accounts, tournaments and all business rules. The gateway
//! only talks to it to exchange credentials for a bearer token; every other
//! call goes from the browser straight to the backend with that token.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

#[derive(Clone, Debug)]
pub struct BackendClient {
    base_url: String,
    http: reqwest::Client,
}

/// Credentials accepted by the backend login endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response. Backends have shipped the token under several names.
#[derive(Debug, Clone, Deserialize)]
struct LoginResponse {
    #[serde(alias = "accessToken", alias = "access_token", alias = "jwt")]
    token: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Exchange credentials for a bearer token.
    /// POST /api/auth/login with { username, password }
    pub async fn login(&self, credentials: &LoginRequest) -> AppResult<String> {
        let url = format!("{}/api/auth/login", self.base_url.trim_end_matches('/'));

        let res = self.http.post(&url).json(credentials).send().await?;

        let status = res.status();
        let body = res.text().await.unwrap_or_default();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            tracing::info!(username = %credentials.username, %status, "Backend rejected credentials");
            return Err(AppError::Auth("Invalid credentials".to_string()));
        }
        if !status.is_success() {
            tracing::warn!(username = %credentials.username, %status, body = %body, "Backend login failed");
            return Err(AppError::Backend(format!("Login failed with backend status {}", status.as_u16())));
        }

        parse_login_response(&body)
    }
}

fn parse_login_response(body: &str) -> AppResult<String> {
    let parsed: LoginResponse = serde_json::from_str(body)
        .map_err(|e| AppError::Backend(format!("Unexpected login response: {}", e)))?;

    let token = parsed.token.trim();
    let token = token.strip_prefix("Bearer ").unwrap_or(token).trim();
    if token.is_empty() {
        return Err(AppError::Backend("Login response carried an empty token".to_string()));
    }
    Ok(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_token_field_names() {
        for body in [
            r#"{"token":"a.b.c"}"#,
            r#"{"accessToken":"a.b.c","user":{"id":1}}"#,
            r#"{"access_token":"a.b.c"}"#,
            r#"{"jwt":"a.b.c"}"#,
        ] {
            assert_eq!(parse_login_response(body).unwrap(), "a.b.c", "body {}", body);
        }
    }

    #[test]
    fn test_parse_strips_bearer_prefix() {
        assert_eq!(parse_login_response(r#"{"token":"Bearer a.b.c"}"#).unwrap(), "a.b.c");
    }

    #[test]
    fn test_parse_rejects_missing_or_empty_token() {
        assert!(matches!(parse_login_response(r#"{"message":"ok"}"#), Err(AppError::Backend(_))));
        assert!(matches!(parse_login_response(r#"{"token":"  "}"#), Err(AppError::Backend(_))));
        assert!(matches!(parse_login_response("<html>"), Err(AppError::Backend(_))));
    }

    #[tokio::test]
    async fn test_login_unreachable_backend() {
        let client = BackendClient::new("http://127.0.0.1:1", Duration::from_secs(2));
        let credentials = LoginRequest {
            username: "organizer".to_string(),
            password: "secret".to_string(),
        };
        let err = client.login(&credentials).await.unwrap_err();
        assert!(matches!(err, AppError::Unavailable(_) | AppError::Backend(_)));
    }
}
