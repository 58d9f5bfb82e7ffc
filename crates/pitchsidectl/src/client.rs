use std::time::Duration;

use anyhow::{Context as AnyhowContext, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(alias = "accessToken", alias = "access_token", alias = "jwt")]
    token: String,
}

/// Thin client for the backend login endpoint.
pub struct BackendClient {
    base_url: String,
    client: Client,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    /// POST /api/auth/login and return the issued token.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<String> {
        let url = format!("{}/api/auth/login", self.base_url.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .json(credentials)
            .send()
            .await
            .context("Failed to send login request")?;

        let status = response.status();
        let text = response.text().await?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            anyhow::bail!("Invalid credentials");
        }
        if !status.is_success() {
            tracing::debug!(%status, body = %text, "Backend login failed");
            anyhow::bail!("Login failed: {}", status);
        }

        parse_token(&text)
    }
}

fn parse_token(body: &str) -> Result<String> {
    let parsed: LoginResponse = serde_json::from_str(body).context("Unexpected login response")?;
    let token = parsed.token.trim();
    let token = token.strip_prefix("Bearer ").unwrap_or(token).trim();
    if token.is_empty() {
        anyhow::bail!("Login response carried an empty token");
    }
    Ok(token.to_string())
}
