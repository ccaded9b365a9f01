//! Thin typed client for the revenue-cycle backend.
//!
//! One request per call: no retries, no caching, no de-duplication. Views
//! wrap calls in [`LoadState`](crate::load::LoadState).

pub mod models;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use claimdesk_auth::{validate_activation, PasswordRule, User};

use models::{ActivationRequest, ClaimSummary, Encounter, MonthlyTrend, PayerPerformance, RevenueMetrics};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("not authorized")]
    Unauthorized,
    #[error("API error ({0}): {1}")]
    Api(u16, String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("invalid password: {0:?}")]
    InvalidPassword(Vec<PasswordRule>),
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            http: reqwest::Client::new(),
        }
    }

    pub fn with_token(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Self::new(base_url)
        }
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn list_claims(&self, limit: u32) -> Result<Vec<ClaimSummary>, ApiError> {
        self.get("/claims", &[("limit", limit)]).await
    }

    pub async fn list_encounters(&self, limit: u32) -> Result<Vec<Encounter>, ApiError> {
        self.get("/encounters", &[("limit", limit)]).await
    }

    pub async fn revenue_metrics(&self) -> Result<RevenueMetrics, ApiError> {
        self.get("/metrics/revenue", &[]).await
    }

    pub async fn payer_performance(&self) -> Result<Vec<PayerPerformance>, ApiError> {
        self.get("/metrics/payers", &[]).await
    }

    pub async fn monthly_trends(&self) -> Result<Vec<MonthlyTrend>, ApiError> {
        self.get("/metrics/monthly", &[]).await
    }

    /// Profile of the token's owner.
    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.get("/auth/me", &[]).await
    }

    /// Activate an invited account. Password rules are checked locally first;
    /// nothing is sent if they fail.
    pub async fn activate_account(
        &self,
        activation_token: &str,
        password: &str,
        confirmation: &str,
    ) -> Result<(), ApiError> {
        validate_activation(password, confirmation).map_err(ApiError::InvalidPassword)?;

        let body = ActivationRequest {
            activation_token: activation_token.to_string(),
            password: password.to_string(),
        };
        let resp = self.post("/auth/activate", &body).await?;
        Self::check(resp).await?;
        Ok(())
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, u32)]) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.http.get(&url);
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        tracing::debug!(%url, "GET");
        let resp = req.send().await.map_err(|e| ApiError::Network(e.to_string()))?;
        let resp = Self::check(resp).await?;
        resp.json().await.map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<reqwest::Response, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.http.post(&url).json(body);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        tracing::debug!(%url, "POST");
        req.send().await.map_err(|e| ApiError::Network(e.to_string()))
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            return Err(ApiError::Api(status.as_u16(), resp.text().await.unwrap_or_default()));
        }
        Ok(resp)
    }
}
