//! Fred REST client
//!
//! Application failures (non-success statuses) come back as
//! `RestOutcome::Failure` values; only transport and setup problems are
//! errors.

use crate::auth::BasicCredentials;
use crate::config::RuntimeConfig;
use crate::http::build_client;
use crate::model::PoDetails;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use std::time::Duration;
use thiserror::Error;

pub const CREATE_PURCH_ORDER_PATH: &str = "PO/CreatePurchOrder";
pub const GET_ALL_USER_STORES_PATH: &str = "Users/GetAllUserStores";

/// REST client errors
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to serialize request body: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result of a REST call that reached the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestOutcome {
    /// Success status; the raw response body
    Success(String),
    /// Non-success status and the error message body
    Failure { status: StatusCode, body: String },
}

impl RestOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RestOutcome::Success(_))
    }

    pub fn body(&self) -> &str {
        match self {
            RestOutcome::Success(body) => body,
            RestOutcome::Failure { body, .. } => body,
        }
    }
}

/// Client for the Fred REST API
#[derive(Debug)]
pub struct ApiClient {
    base_url: Url,
    credentials: Option<BasicCredentials>,
    http_client: Client,
}

impl ApiClient {
    pub fn new(
        base_url: Url,
        credentials: Option<BasicCredentials>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        // Ensure base URL ends with /
        let base_url = if base_url.path().ends_with('/') {
            base_url
        } else {
            Url::parse(&format!("{}/", base_url)).map_err(|e| ApiError::InvalidUrl(e.to_string()))?
        };

        Ok(Self {
            base_url,
            credentials,
            http_client: build_client(timeout)?,
        })
    }

    pub fn from_config(config: &RuntimeConfig) -> Result<Self, ApiError> {
        Self::new(
            config.api_base_url.clone(),
            config.credentials(),
            config.http_timeout,
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", path, e)))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.credentials {
            Some(ref credentials) => credentials.apply(request),
            None => request,
        }
    }

    /// Post a purchase order; on success the body is the new order id
    pub async fn create_purchase_order(&self, details: &PoDetails) -> Result<RestOutcome, ApiError> {
        let url = self.url(CREATE_PURCH_ORDER_PATH)?;
        let body = serde_json::to_string(details)?;

        tracing::info!(
            "Creating purchase order for {} with {} lines",
            details.header.vend_account,
            details.lines.len()
        );
        tracing::debug!("POST {} {}", url, body);

        let request = self.authorize(self.http_client.post(url)).body(body);
        self.send(request).await
    }

    /// Stores the current user is associated with, as returned by the server
    pub async fn get_all_user_stores(&self) -> Result<RestOutcome, ApiError> {
        let url = self.url(GET_ALL_USER_STORES_PATH)?;
        tracing::debug!("GET {}", url);

        let request = self.authorize(self.http_client.get(url));
        self.send(request).await
    }

    async fn send(&self, request: RequestBuilder) -> Result<RestOutcome, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            Ok(RestOutcome::Success(body))
        } else {
            tracing::warn!("REST call failed ({}): {}", status, body);
            Ok(RestOutcome::Failure { status, body })
        }
    }
}
