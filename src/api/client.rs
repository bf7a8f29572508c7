//! API client for communicating with the bank backend REST API.
//!
//! This module provides the `ApiClient` struct for authenticating and
//! making bearer-token requests for account, transaction, user, and
//! audit data.

use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::{header, Client};
use serde::Deserialize;
use tracing::debug;

use crate::auth::SessionData;
use crate::models::{Account, AuditEntry, Transaction, User};
use crate::utils::format_cents;

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// 30s allows for slow backend responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
    #[serde(default)]
    roles: Vec<String>,
}

/// API client for the bank backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client for the given backend base URL
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Set the bearer token for authenticated requests
    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    /// Drop the bearer token (after logout)
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// Authenticate against the backend and return session data.
    ///
    /// Accounts with MFA enabled are rejected with `ApiError::MfaRequired`
    /// until an OTP is supplied.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        otp: Option<&str>,
    ) -> Result<SessionData> {
        let url = format!("{}/api/auth/login", self.base_url);

        let mut body = serde_json::json!({
            "username": username,
            "password": password,
        });
        if let Some(otp) = otp {
            body["otp"] = serde_json::Value::String(otp.to_string());
        }

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(ApiError::NetworkError)?;

        let response = Self::check_response(response).await?;

        let login: LoginResponse = response
            .json()
            .await
            .context("Failed to parse login response")?;

        Ok(SessionData {
            token: login.token,
            username: username.to_string(),
            roles: login.roles,
            created_at: Utc::now(),
        })
    }

    /// Ask the backend to revoke the current token. Best-effort: the
    /// local session is cleared regardless of the outcome.
    pub async fn logout(&self) -> Result<()> {
        let url = format!("{}/api/auth/logout", self.base_url);

        let response = self
            .client
            .post(&url)
            .headers(self.auth_headers()?)
            .send()
            .await
            .map_err(ApiError::NetworkError)?;

        Self::check_response(response).await?;
        Ok(())
    }

    // =========================================================================
    // Accounts and transactions
    // =========================================================================

    pub async fn fetch_accounts(&self) -> Result<Vec<Account>> {
        let url = format!("{}/api/accounts", self.base_url);
        self.get_json(&url, "accounts").await
    }

    pub async fn fetch_transactions(&self, account_id: i64) -> Result<Vec<Transaction>> {
        let url = format!("{}/api/accounts/{}/transactions", self.base_url, account_id);
        self.get_json(&url, "transactions").await
    }

    /// Submit a transfer between two accounts. The amount travels as a
    /// decimal string, matching what the backend stores.
    pub async fn submit_transfer(
        &self,
        from_account: i64,
        to_account: i64,
        amount_cents: i64,
    ) -> Result<Transaction> {
        let url = format!("{}/api/transactions", self.base_url);
        let body = serde_json::json!({
            "from_account": from_account,
            "to_account": to_account,
            "amount": format_cents(amount_cents),
        });

        let response = self
            .client
            .post(&url)
            .headers(self.auth_headers()?)
            .json(&body)
            .send()
            .await
            .map_err(ApiError::NetworkError)?;

        let response = Self::check_response(response).await?;

        let tx: Transaction = response
            .json()
            .await
            .context("Failed to parse transfer response")?;

        debug!(id = tx.id, "Transfer submitted");
        Ok(tx)
    }

    // =========================================================================
    // Admin data
    // =========================================================================

    pub async fn fetch_users(&self) -> Result<Vec<User>> {
        let url = format!("{}/api/admin/users", self.base_url);
        self.get_json(&url, "users").await
    }

    pub async fn fetch_audit_log(&self) -> Result<Vec<AuditEntry>> {
        let url = format!("{}/api/admin/audit-logs", self.base_url);
        self.get_json(&url, "audit logs").await
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str, what: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .headers(self.auth_headers()?)
            .send()
            .await
            .map_err(ApiError::NetworkError)?;

        let response = Self::check_response(response).await?;

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse {} response", what))
    }

    fn auth_headers(&self) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        if let Some(ref token) = self.token {
            let value = header::HeaderValue::from_str(&format!("Bearer {}", token))
                .context("Invalid token for Authorization header")?;
            headers.insert(header::AUTHORIZATION, value);
        }
        Ok(headers)
    }

    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let api = ApiClient::new("http://localhost:5000/").unwrap();
        assert_eq!(api.base_url, "http://localhost:5000");
    }

    #[test]
    fn test_auth_headers_without_token_is_empty() {
        let api = ApiClient::new("http://localhost:5000").unwrap();
        let headers = api.auth_headers().unwrap();
        assert!(headers.get(header::AUTHORIZATION).is_none());
    }

    #[test]
    fn test_auth_headers_with_token() {
        let mut api = ApiClient::new("http://localhost:5000").unwrap();
        api.set_token("tok123".to_string());
        let headers = api.auth_headers().unwrap();
        assert_eq!(
            headers.get(header::AUTHORIZATION).unwrap(),
            "Bearer tok123"
        );
    }

    #[test]
    fn test_login_response_parses_without_roles() {
        let parsed: LoginResponse =
            serde_json::from_str(r#"{"token": "abc"}"#).unwrap();
        assert_eq!(parsed.token, "abc");
        assert!(parsed.roles.is_empty());
    }
}
